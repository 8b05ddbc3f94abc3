//! Snapshot data model shared by all refactoring actions.
//!
//! The compiler front-end parses source into its own tree and hands this core
//! a read-only, caller-owned `Snapshot`: files with their full text, the
//! declarations relevant to refactoring, and the switch sites found in them.
//! Nothing in this crate mutates a snapshot; every transformation is computed
//! against it and returned as an edit batch.

use std::path::{Path, PathBuf};

use serde::Serialize;

pub type FileId = usize;
pub type DeclId = usize;

// ---------------------------------------------------------------------------
// Positions and ranges
// ---------------------------------------------------------------------------

/// Zero-based line/character position, as an editor front-end reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Byte range into one file's original text.
///
/// `end` is the offset of the *start* of the range's final token, following
/// the front-end's convention. The helpers in [`crate::engine::text`] extend
/// it to the end of that token when materializing text or lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceRange {
    pub file: FileId,
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(file: FileId, start: usize, end: usize) -> Self {
        Self { file, start, end }
    }

    /// Raw containment check against the un-extended boundaries.
    pub fn contains(&self, file: FileId, offset: usize) -> bool {
        self.file == file && self.start <= offset && offset <= self.end
    }
}

/// A declaration's position in the project, used as the symbol-index key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub position: Position,
}

/// One definition location reported by the symbol index.
#[derive(Clone, Debug)]
pub struct DefinitionLocation {
    pub path: PathBuf,
    pub start: Position,
    pub end: Position,
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    /// An enumeration; `scoped` selects `Enum::Value` qualification.
    Enum { scoped: bool },
    Class,
}

/// A named declaration in the parsed snapshot.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub file: FileId,
    /// Range from the introducing keyword to the closing brace token.
    pub range: SourceRange,
    /// Enclosing namespace path, outermost first.
    pub namespaces: Vec<String>,
    /// Direct base declarations (inheritance), resolved by the front-end.
    pub bases: Vec<DeclId>,
    /// Child elements in declared order.
    pub members: Vec<Member>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Enumerator,
    Method {
        is_virtual: bool,
        /// A body exists somewhere: inline, out-of-line, or in another unit.
        has_body: bool,
        /// The body is written inside the class itself.
        inline_body: bool,
    },
    Field,
}

/// A single child element of a declaration.
#[derive(Clone, Debug)]
pub struct Member {
    pub name: String,
    /// Normalized parameter/qualifier signature, e.g. `"(int, const double&)"`.
    /// Empty for enumerators and fields.
    pub signature: String,
    pub kind: MemberKind,
    /// Declarator range (without body) in the declaration's file.
    pub range: SourceRange,
    /// Out-of-line definition range when it lives in the same snapshot file.
    pub definition: Option<SourceRange>,
}

impl Member {
    pub fn is_enumerator(&self) -> bool {
        self.kind == MemberKind::Enumerator
    }
}

// ---------------------------------------------------------------------------
// Dependent constructs
// ---------------------------------------------------------------------------

/// Minimal expression tree under one case label. The front-end marks nodes
/// that reference a named constant; everything else is opaque structure.
#[derive(Clone, Debug, Default)]
pub struct SyntaxNode {
    /// Referenced constant name when this node is a declaration reference.
    pub constant_ref: Option<String>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn reference(name: &str) -> Self {
        Self {
            constant_ref: Some(name.to_string()),
            children: Vec::new(),
        }
    }

    pub fn parent_of(children: Vec<SyntaxNode>) -> Self {
        Self {
            constant_ref: None,
            children,
        }
    }

    /// First descendant (self included, preorder) matching `pred`.
    pub fn find_descendant(&self, pred: &dyn Fn(&SyntaxNode) -> bool) -> Option<&SyntaxNode> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_descendant(pred))
    }
}

/// One slot of a branching construct: a case arm with its full source range.
#[derive(Clone, Debug)]
pub struct CaseArm {
    /// Full slot range, label through trailing statement.
    pub range: SourceRange,
    pub expr: SyntaxNode,
    pub is_default: bool,
}

/// A `switch` over some declaration's elements.
#[derive(Clone, Debug)]
pub struct SwitchSite {
    pub file: FileId,
    /// Range of the whole statement, keyword through closing brace token.
    pub range: SourceRange,
    /// Range of the body, `start` at the opening brace, `end` at the closing.
    pub body: SourceRange,
    /// The enum the condition resolves to, when the front-end could tell.
    pub subject: Option<DeclId>,
    /// Enclosing namespace path of the statement, outermost first.
    pub namespaces: Vec<String>,
    pub arms: Vec<CaseArm>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One file of the parsed snapshot.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    /// Structured include directives of this file, as written.
    pub includes: Vec<String>,
}

/// Read-only parsed view of the compilation unit(s) under refactoring.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub files: Vec<SourceFile>,
    pub decls: Vec<Declaration>,
    pub switches: Vec<SwitchSite>,
}

/// Reference to the syntax node found under a cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRef {
    Decl(DeclId),
    Switch(usize),
}

impl Snapshot {
    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id]
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id]
    }

    /// Smallest declaration or switch site containing the cursor.
    pub fn node_at(&self, file: FileId, offset: usize) -> Option<NodeRef> {
        let mut best: Option<(usize, NodeRef)> = None;
        let mut consider = |range: &SourceRange, node: NodeRef| {
            if range.contains(file, offset) {
                let span = range.end - range.start;
                if best.map_or(true, |(best_span, _)| span < best_span) {
                    best = Some((span, node));
                }
            }
        };
        for (id, decl) in self.decls.iter().enumerate() {
            consider(&decl.range, NodeRef::Decl(id));
        }
        for (id, site) in self.switches.iter().enumerate() {
            consider(&site.range, NodeRef::Switch(id));
        }
        best.map(|(_, node)| node)
    }
}

// ---------------------------------------------------------------------------
// External collaborators
// ---------------------------------------------------------------------------

/// Project-wide symbol index, owned by the caller.
///
/// Given a declaration's location, returns zero or more definition locations
/// anywhere in the project. Zero results is not an error; the definition may
/// live in a binary unit.
pub trait SymbolIndex {
    fn resolve_definition(&self, declaration: &SourceLocation) -> Vec<DefinitionLocation>;
}

/// File access used by the cross-file extractor. Injected so tests and
/// non-disk front-ends can supply their own content.
pub trait FileStore {
    fn read(&self, path: &Path) -> std::io::Result<String>;
    fn exists(&self, path: &Path) -> bool;
    fn len(&self, path: &Path) -> std::io::Result<u64>;
}

/// `FileStore` over the real filesystem.
pub struct OsFileStore;

impl FileStore for OsFileStore {
    fn read(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn len(&self, path: &Path) -> std::io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
