//! Criterion benchmarks for retouch-core.
//!
//! ## Benchmark groups
//!
//! 1. **brace_scan** — Definition-span recovery at various source sizes.
//! 2. **collect** — Virtual-element collection over deep/wide ancestries.
//! 3. **scan_reconcile** — Switch scanning plus plan construction.
//! 4. **edit_batch** — Building and rendering multi-edit batches.
//!
//! ## Running
//!
//! ```sh
//! cargo bench --manifest-path crates/retouch-core/Cargo.toml
//! # Run only the brace scanner group:
//! cargo bench --manifest-path crates/retouch-core/Cargo.toml -- brace_scan
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use indexmap::IndexMap;
use std::path::PathBuf;

use retouch_core::engine::braces::find_definition_span;
use retouch_core::engine::collect::{collect_virtuals, ElementState};
use retouch_core::engine::edits::{EditBatch, TextEdit};
use retouch_core::engine::reconcile::{reconcile, ReconcileOptions, RequiredElement};
use retouch_core::engine::scan::scan_switch;
use retouch_core::models::{
    CaseArm, DeclKind, Declaration, Member, MemberKind, Snapshot, SourceFile, SourceRange,
    SwitchSite, SyntaxNode,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A function definition of roughly `body_lines` lines, peppered with the
/// constructs the scanner has to skip: comments, strings, char literals.
fn synthetic_definition(body_lines: usize) -> String {
    let mut out = String::from("int Widget::process(const std::string& input) {\n");
    for i in 0..body_lines {
        match i % 4 {
            0 => out.push_str("    log(\"brace } in a string\"); // close } here\n"),
            1 => out.push_str("    if (input[0] == '}') { count += 1; }\n"),
            2 => out.push_str("    /* block { comment } */ buffer.push_back(input);\n"),
            _ => out.push_str("    total += compute(i, charges[i % n]);\n"),
        }
    }
    out.push_str("    return total;\n}\n");
    out
}

/// Linear class chain of `depth` classes, each contributing `methods` virtual
/// methods, plus one diamond edge from the target back to the root.
fn hierarchy_snapshot(depth: usize, methods: usize) -> Snapshot {
    let mut text = String::new();
    let mut decls = Vec::new();
    for level in 0..depth {
        let mut members = Vec::new();
        for m in 0..methods {
            let decl = format!("virtual void handle_{level}_{m}()");
            let start = text.len();
            text.push_str(&decl);
            text.push_str(" = 0;\n");
            members.push(Member {
                name: format!("handle_{level}_{m}"),
                signature: "()".to_string(),
                kind: MemberKind::Method {
                    is_virtual: true,
                    has_body: level % 3 == 0,
                    inline_body: false,
                },
                range: SourceRange::new(0, start, start + decl.len() - 1),
                definition: None,
            });
        }
        let bases = if level == 0 {
            Vec::new()
        } else if level == depth - 1 {
            vec![level - 1, 0]
        } else {
            vec![level - 1]
        };
        decls.push(Declaration {
            name: format!("Layer{level}"),
            kind: DeclKind::Class,
            file: 0,
            range: SourceRange::new(0, 0, 0),
            namespaces: Vec::new(),
            bases,
            members,
        });
    }
    Snapshot {
        files: vec![SourceFile {
            path: PathBuf::from("hierarchy.h"),
            text,
            includes: Vec::new(),
        }],
        decls,
        switches: Vec::new(),
    }
}

/// An enum of `constants` values and a switch already covering every other
/// one of them.
fn switch_snapshot(constants: usize) -> Snapshot {
    let mut text = String::from("switch (value) {\n");
    let mut arms = Vec::new();
    for i in (0..constants).step_by(2) {
        let arm_text = format!("case Value{i}:\n    break;\n");
        let start = text.len();
        text.push_str(&arm_text);
        arms.push(CaseArm {
            range: SourceRange::new(0, start, start + arm_text.len() - 2),
            expr: SyntaxNode::parent_of(vec![SyntaxNode::reference(&format!("Value{i}"))]),
            is_default: false,
        });
    }
    let body_end = text.len();
    text.push('}');
    Snapshot {
        files: vec![SourceFile {
            path: PathBuf::from("dispatch.cpp"),
            text,
            includes: Vec::new(),
        }],
        decls: vec![Declaration {
            name: "Value".to_string(),
            kind: DeclKind::Enum { scoped: false },
            file: 0,
            range: SourceRange::new(0, 0, 0),
            namespaces: Vec::new(),
            bases: Vec::new(),
            members: (0..constants)
                .map(|i| Member {
                    name: format!("Value{i}"),
                    signature: String::new(),
                    kind: MemberKind::Enumerator,
                    range: SourceRange::new(0, 0, 0),
                    definition: None,
                })
                .collect(),
        }],
        switches: vec![SwitchSite {
            file: 0,
            range: SourceRange::new(0, 0, body_end),
            body: SourceRange::new(0, "switch (value) ".len(), body_end),
            subject: Some(0),
            namespaces: Vec::new(),
            arms,
        }],
    }
}

// ---------------------------------------------------------------------------
// Benchmark: brace-balanced definition scanning
// ---------------------------------------------------------------------------

fn bench_brace_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("brace_scan");

    for &lines in &[10, 100, 1000] {
        let code = synthetic_definition(lines);
        group.bench_with_input(BenchmarkId::new("find_span", lines), &code, |b, code| {
            b.iter(|| find_definition_span(black_box(code), 0).unwrap());
        });
    }

    // Definition buried at the end of a large file.
    let mut file = String::new();
    for _ in 0..500 {
        file.push_str("void other() { /* filler { } */ }\n");
    }
    let target = file.len();
    file.push_str(&synthetic_definition(50));
    group.bench_function("find_span_at_offset", |b| {
        b.iter(|| find_definition_span(black_box(&file), black_box(target)).unwrap());
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: virtual-element collection
// ---------------------------------------------------------------------------

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect");

    for &depth in &[4, 16, 64] {
        let snapshot = hierarchy_snapshot(depth, 8);
        let target = snapshot.decls.len() - 1;
        group.bench_with_input(
            BenchmarkId::new("collect_virtuals", depth),
            &snapshot,
            |b, snapshot| {
                b.iter(|| collect_virtuals(black_box(snapshot), black_box(target)));
            },
        );
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: presence scanning + reconciliation
// ---------------------------------------------------------------------------

fn bench_scan_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_reconcile");

    for &constants in &[16, 128] {
        let snapshot = switch_snapshot(constants);
        let site = &snapshot.switches[0];
        let subject = snapshot.decl(0);

        group.bench_with_input(
            BenchmarkId::new("scan_switch", constants),
            &constants,
            |b, _| {
                b.iter(|| scan_switch(black_box(site), black_box(subject)));
            },
        );

        let found = scan_switch(site, subject);
        let required: Vec<RequiredElement> = (0..constants)
            .map(|i| RequiredElement {
                key: (format!("Value{i}"), String::new()),
                state: ElementState::RequiresImplementation,
                template: format!("case Value{i}:\n\tbreak;"),
            })
            .collect();
        group.bench_with_input(
            BenchmarkId::new("reconcile", constants),
            &constants,
            |b, _| {
                b.iter(|| {
                    reconcile(
                        black_box(&snapshot),
                        black_box(&required),
                        black_box(&found),
                        ReconcileOptions::default(),
                    )
                });
            },
        );
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: edit batch construction and rendering
// ---------------------------------------------------------------------------

fn bench_edit_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_batch");

    let base = "int field_placeholder_line;\n".repeat(2000);
    let path = PathBuf::from("wide.cpp");
    let line = "int field_placeholder_line;\n".len();

    group.bench_function("add_100_edits", |b| {
        b.iter(|| {
            let mut batch = EditBatch::new();
            for i in 0..100 {
                batch
                    .add(
                        &path,
                        &base,
                        TextEdit::replace(i * 20 * line, 3, format!("long long_{i}")),
                    )
                    .unwrap();
            }
            black_box(batch);
        });
    });

    group.bench_function("render_100_edits", |b| {
        let mut batch = EditBatch::new();
        for i in 0..100 {
            batch
                .add(
                    &path,
                    &base,
                    TextEdit::replace(i * 20 * line, 3, format!("long long_{i}")),
                )
                .unwrap();
        }
        b.iter(|| {
            let rendered: IndexMap<PathBuf, String> = batch.preview();
            black_box(rendered);
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Register all benchmark groups
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_brace_scan,
    bench_collect,
    bench_scan_reconcile,
    bench_edit_batch,
);
criterion_main!(benches);
