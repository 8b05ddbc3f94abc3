//! Element collection: the canonical ordered, deduplicated set of elements a
//! dependent construct is required to cover.
//!
//! For enumerations the required set is simply the enumerators in declared
//! order. For classes with ancestry the collector walks the whole base graph
//! (a reachability problem, cycles included) and accumulates every virtual
//! method under the monotone state policy: a body found anywhere in the
//! ancestry upgrades the element, a matching member on the target itself
//! marks it fully implemented, and nothing ever downgrades.

use std::collections::HashSet;

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::trace;

use crate::models::{DeclId, FileId, Member, MemberKind, Snapshot, SourceRange};

/// Identity of a required or found element: name plus normalized signature.
/// Equality is structural; the signature is empty for enumerators.
pub type ElementKey = (String, String);

/// Implementation state of one collected element. Ordered so that promotion
/// is a plain `max`; states only ever strengthen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ElementState {
    Unset,
    RequiresImplementation,
    HasDefaultImplementation,
    FullyImplemented,
}

impl ElementState {
    /// Monotone combination; never weakens an established state.
    pub fn promote(self, other: ElementState) -> ElementState {
        self.max(other)
    }
}

/// One virtual method accumulated from the ancestor graph.
#[derive(Clone, Debug)]
pub struct VirtualElement {
    pub key: ElementKey,
    pub state: ElementState,
    /// Declarator range of the contributing ancestor declaration.
    pub decl: SourceRange,
    /// File holding that declarator.
    pub file: FileId,
}

/// Required element names of a flat enumeration, in declared order. Names
/// are unique by construction, so no dedup is needed.
pub fn required_enumerators(snapshot: &Snapshot, enum_id: DeclId) -> Vec<String> {
    snapshot
        .decl(enum_id)
        .members
        .iter()
        .filter(|m| m.is_enumerator())
        .map(|m| m.name.clone())
        .collect()
}

fn method_key(member: &Member) -> ElementKey {
    (member.name.clone(), member.signature.clone())
}

/// Collect every virtual method reachable through `class_id`'s ancestry,
/// keyed by (name, signature), then promote elements the class itself
/// implements to [`ElementState::FullyImplemented`].
///
/// The returned map's insertion order is the canonical element order; running
/// the collection again on an unchanged snapshot yields the identical map.
pub fn collect_virtuals(
    snapshot: &Snapshot,
    class_id: DeclId,
) -> IndexMap<ElementKey, VirtualElement> {
    let mut table = IndexMap::new();
    let mut visited: HashSet<DeclId> = HashSet::new();
    visited.insert(class_id);
    collect_ancestors(snapshot, class_id, &mut visited, &mut table);

    for member in &snapshot.decl(class_id).members {
        if let MemberKind::Method { .. } = member.kind {
            if let Some(element) = table.get_mut(&method_key(member)) {
                element.state = element.state.promote(ElementState::FullyImplemented);
                trace!(name = %member.name, "member implemented by target class");
            }
        }
    }
    table
}

/// Exhaustive traversal over the base graph; the visited set makes cyclic
/// ancestry terminate. The accumulator is threaded explicitly so concurrent
/// invocations cannot interfere.
fn collect_ancestors(
    snapshot: &Snapshot,
    decl_id: DeclId,
    visited: &mut HashSet<DeclId>,
    table: &mut IndexMap<ElementKey, VirtualElement>,
) {
    for &base_id in &snapshot.decl(decl_id).bases {
        if !visited.insert(base_id) {
            continue;
        }
        let base = snapshot.decl(base_id);
        for member in &base.members {
            let MemberKind::Method {
                is_virtual: true,
                has_body,
                ..
            } = member.kind
            else {
                continue;
            };
            let state = if has_body {
                ElementState::HasDefaultImplementation
            } else {
                ElementState::RequiresImplementation
            };
            match table.entry(method_key(member)) {
                Entry::Vacant(slot) => {
                    trace!(name = %member.name, ?state, base = %base.name, "new virtual");
                    slot.insert(VirtualElement {
                        key: method_key(member),
                        state,
                        decl: member.range,
                        file: base.file,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let element = slot.get_mut();
                    if state > element.state {
                        // A definition found anywhere in the ancestry
                        // satisfies the "not pure" condition.
                        element.state = state;
                        element.decl = member.range;
                        element.file = base.file;
                    }
                }
            }
        }
        collect_ancestors(snapshot, base_id, visited, table);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
