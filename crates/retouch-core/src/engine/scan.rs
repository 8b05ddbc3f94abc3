//! Presence scanning: which required elements a dependent construct already
//! covers, and where.
//!
//! The scanner walks the construct's slots (case arms), finds the first
//! reference to a named constant inside each slot with a generic descendant
//! query, and records the full slot range under that constant's key. When
//! the same key shows up in more than one slot the most recently encountered
//! mapping wins; this is a deliberate, simple tie-break.

use indexmap::IndexMap;
use tracing::trace;

use crate::models::{Declaration, DeclKind, MemberKind, SourceRange, SwitchSite};

/// Map each enumerator referenced in `site`'s arms to the full slot range
/// that represents it. Last match wins.
pub fn scan_switch(site: &SwitchSite, subject: &Declaration) -> IndexMap<String, SourceRange> {
    let mut found: IndexMap<String, SourceRange> = IndexMap::new();
    for arm in &site.arms {
        if arm.is_default {
            continue;
        }
        let hit = arm.expr.find_descendant(&|node| {
            node.constant_ref.as_deref().is_some_and(|name| {
                subject
                    .members
                    .iter()
                    .any(|m| m.kind == MemberKind::Enumerator && m.name == name)
            })
        });
        if let Some(node) = hit {
            let name = node.constant_ref.clone().unwrap_or_default();
            trace!(%name, start = arm.range.start, "found case slot");
            found.insert(name, arm.range);
        }
    }
    found
}

/// Minimal qualification needed to name `subject`'s elements from inside the
/// scope given by `site_namespaces`: the subject's namespace path with the
/// common prefix stripped, plus the enum's own name for scoped enums.
pub fn qualification(site_namespaces: &[String], subject: &Declaration) -> String {
    let common = site_namespaces
        .iter()
        .zip(&subject.namespaces)
        .take_while(|(a, b)| a == b)
        .count();
    let mut prefix = String::new();
    for ns in &subject.namespaces[common..] {
        prefix.push_str(ns);
        prefix.push_str("::");
    }
    if let DeclKind::Enum { scoped: true } = subject.kind {
        prefix.push_str(&subject.name);
        prefix.push_str("::");
    }
    prefix
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
