// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scope lookups derived from a layout pass.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::layout::MAX_SIBLINGS;
use crate::types::NodeId;

/// Direct members of one scope, in layout order.
pub type Members = SmallVec<[NodeId; MAX_SIBLINGS]>;

/// Two-way mapping between scopes and their direct members.
///
/// Built by [`layout`](crate::layout) and never edited afterwards: a mutation
/// of the tree produces a fresh index with the next layout pass.
///
/// - `members(scope)` lists the direct children laid out under `scope`.
/// - `scope_of(member)` is the inverse.
///
/// [`NodeId::ROOT`] always has an entry, possibly empty. A node only gets an
/// entry of its own when it had children to lay out.
#[derive(Clone, Debug)]
pub struct ScopeIndex {
    root_to_members: HashMap<NodeId, Members>,
    member_to_root: HashMap<NodeId, NodeId>,
}

impl Default for ScopeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeIndex {
    /// Creates an index holding only the empty root scope.
    pub fn new() -> Self {
        let mut root_to_members = HashMap::new();
        root_to_members.insert(NodeId::ROOT, Members::new());
        Self {
            root_to_members,
            member_to_root: HashMap::new(),
        }
    }

    /// Opens an (empty) entry for `scope`.
    pub(crate) fn open_scope(&mut self, scope: NodeId) {
        self.root_to_members.entry(scope).or_default();
    }

    /// Records `member` as a direct child of `scope`.
    pub(crate) fn register(&mut self, scope: NodeId, member: NodeId) {
        self.root_to_members.entry(scope).or_default().push(member);
        if let Some(previous) = self.member_to_root.insert(member, scope) {
            tracing::warn!(?member, ?previous, ?scope, "id laid out twice");
        }
    }

    /// Direct members of `scope`; empty for unknown scopes and leaves.
    pub fn members(&self, scope: NodeId) -> &[NodeId] {
        self.root_to_members
            .get(&scope)
            .map(|m| m.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `scope` has at least one laid-out member.
    pub fn has_members(&self, scope: NodeId) -> bool {
        !self.members(scope).is_empty()
    }

    /// Scope owning `member`, if `member` was laid out.
    pub fn scope_of(&self, member: NodeId) -> Option<NodeId> {
        self.member_to_root.get(&member).copied()
    }

    /// Returns true if `member` belongs directly to `scope`.
    pub fn is_member_of(&self, member: NodeId, scope: NodeId) -> bool {
        self.scope_of(member) == Some(scope)
    }

    /// Scopes that have an entry, in no particular order.
    pub fn scopes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.root_to_members.keys().copied()
    }

    /// Number of laid-out members across all scopes.
    pub fn member_count(&self) -> usize {
        self.member_to_root.len()
    }
}

#[cfg(test)]
mod tests {
    use super::ScopeIndex;
    use crate::types::NodeId;

    #[test]
    fn new_index_has_empty_root() {
        let index = ScopeIndex::new();
        assert!(index.members(NodeId::ROOT).is_empty(), "root has no members");
        assert_eq!(index.scopes().count(), 1, "only the root scope");
    }

    #[test]
    fn register_keeps_both_directions_consistent() {
        let mut index = ScopeIndex::new();
        let (a, b, c) = (NodeId::new(1), NodeId::new(2), NodeId::new(3));
        index.register(NodeId::ROOT, a);
        index.register(a, b);
        index.register(a, c);

        assert_eq!(index.members(a), &[b, c], "layout order kept");
        assert_eq!(index.scope_of(c), Some(a), "inverse lookup");
        assert!(index.is_member_of(a, NodeId::ROOT), "a is top-level");
        assert!(!index.has_members(b), "leaf has no entry");
        assert_eq!(index.member_count(), 3, "one entry per member");
    }
}
