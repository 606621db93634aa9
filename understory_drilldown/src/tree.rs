// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned hierarchy with stable ids and scoped structural edits.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::types::NodeId;

/// One node of the input hierarchy.
///
/// `children` may be empty. With the `serde` feature enabled this type reads
/// the usual JSON shape `{ "name", "weight", "level", "children"? }`, with an
/// optional `id`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Stable id, assigned by the owning [`Tree`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<NodeId>,
    /// Display name; also the lookup key for name-scoped edits.
    pub name: String,
    /// Positive weight, scaled into a radius by the level factor.
    pub weight: f64,
    /// Depth from the implicit root; root's direct children are level 1.
    pub level: u32,
    /// Ordered children.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Self>,
}

impl Node {
    /// Creates a childless level-1 node without an id.
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            weight,
            level: 1,
            children: Vec::new(),
        }
    }

    /// Builder: set the level.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Builder: append children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns the assigned id, ignoring the reserved root value.
    pub(crate) fn assigned_id(&self) -> Option<NodeId> {
        self.id.filter(|id| !id.is_root())
    }

    fn relevel(&mut self, level: u32) {
        self.level = level;
        for child in &mut self.children {
            child.relevel(level + 1);
        }
    }
}

/// Returns true for weights the store accepts: finite and strictly positive.
pub(crate) fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

/// Owner of a weighted hierarchy.
///
/// The tree assigns ids depth-first, pre-order, from a counter starting at 1.
/// Ids are never reassigned or reused. Structural edits are scoped either by
/// node name (first depth-first match) or by id; unresolved scopes fall back
/// to the root list.
#[derive(Clone, Debug)]
pub struct Tree {
    roots: Vec<Node>,
    next_id: u32,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            next_id: 1,
        }
    }

    /// Takes ownership of `roots` and assigns ids to every node lacking one.
    ///
    /// - Nodes with a non-finite or non-positive weight are dropped along
    ///   with their subtrees.
    /// - Ids already present are kept; the counter starts above the largest
    ///   of them so fresh ids never collide.
    /// - A repeated id is kept on its first pre-order occurrence only; later
    ///   holders get fresh ids.
    /// - If the input ids leave too little room above them for the nodes
    ///   still lacking one, the whole tree is renumbered from 1.
    pub fn from_nodes(mut roots: Vec<Node>) -> Self {
        drop_invalid_weights(&mut roots);
        clear_duplicate_ids(&mut roots, &mut HashSet::new());
        let max = max_id(&roots);
        let missing = count_where(&roots, &|n| n.assigned_id().is_none());
        let next_id = match max.checked_add(1) {
            Some(next) if next.checked_add(missing).is_some() => next,
            _ => {
                tracing::debug!(max, "input ids exhaust the id space, renumbering");
                clear_ids(&mut roots);
                1
            }
        };
        let mut tree = Self { roots, next_id };
        tree.assign_ids();
        tree
    }

    /// Root-level nodes in stored order.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }

    /// Number of ids still available to new nodes.
    pub fn ids_remaining(&self) -> u32 {
        u32::MAX - self.next_id
    }

    /// Returns true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Assigns the next counter value to every node without an id.
    ///
    /// Walks depth-first, pre-order. Nodes that already have an id are left
    /// untouched, so calling this repeatedly is a no-op. Once the id space
    /// is exhausted, remaining nodes stay without an id.
    pub fn assign_ids(&mut self) {
        fn walk(nodes: &mut [Node], next: &mut u32) {
            for node in nodes {
                if node.assigned_id().is_none() {
                    node.id = take_id(next);
                }
                walk(&mut node.children, next);
            }
        }
        walk(&mut self.roots, &mut self.next_id);
    }

    /// Depth-first search by name; returns the first match.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        find_in(&self.roots, &|n| n.name == name)
    }

    /// Looks up a node by id.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if id.is_root() {
            return None;
        }
        find_in(&self.roots, &|n| n.id == Some(id))
    }

    /// Children of `scope`, or the root list for `None`/unknown ids.
    pub fn children_of(&self, scope: Option<NodeId>) -> &[Node] {
        match scope.and_then(|id| self.find(id)) {
            Some(node) => &node.children,
            None => &self.roots,
        }
    }

    /// Inserts `node` under the first node named `under`, or at the root.
    ///
    /// Returns the new node's id, or `None` if the weight was rejected.
    pub fn insert(&mut self, node: Node, under: Option<&str>) -> Option<NodeId> {
        let parent = under.and_then(|name| self.find_by_name(name).and_then(Node::assigned_id));
        self.insert_under(node, parent)
    }

    /// Inserts `node` as the last child of `parent`, or at the root when
    /// `parent` is `None` or does not resolve.
    ///
    /// Non-finite or non-positive weights are rejected without touching the
    /// tree, as is a subtree too large for the remaining id space. The
    /// inserted subtree is re-leveled relative to its new parent.
    pub fn insert_under(&mut self, mut node: Node, parent: Option<NodeId>) -> Option<NodeId> {
        if !is_valid_weight(node.weight) {
            tracing::debug!(name = %node.name, weight = node.weight, "rejected insert");
            return None;
        }
        drop_invalid_weights(&mut node.children);
        let needed = count_where(core::slice::from_ref(&node), &|_| true);
        if needed > self.ids_remaining() {
            tracing::warn!(needed, remaining = self.ids_remaining(), "id space exhausted");
            return None;
        }
        // Pre-existing ids on incoming nodes would break uniqueness.
        clear_ids(core::slice::from_mut(&mut node));

        let (list, parent_level) = scope_list_mut(&mut self.roots, parent);
        match parent_level {
            Some(level) => node.relevel(level + 1),
            None => {
                if parent.is_some() {
                    tracing::debug!(?parent, "insert scope not found, using root");
                }
                node.relevel(1);
            }
        }
        list.push(node);
        let index = list.len() - 1;
        assign_from(core::slice::from_mut(&mut list[index]), &mut self.next_id);
        list[index].id
    }

    /// Removes the child at `index` of the first node named `within`, or of
    /// the root list.
    ///
    /// Out-of-range indices are a no-op and return `None`.
    pub fn remove_at(&mut self, index: usize, within: Option<&str>) -> Option<Node> {
        let scope = within.and_then(|name| self.find_by_name(name).and_then(Node::assigned_id));
        self.remove_at_in(index, scope)
    }

    /// Removes the child at `index` of `scope`, or of the root list when
    /// `scope` is `None` or does not resolve.
    pub fn remove_at_in(&mut self, index: usize, scope: Option<NodeId>) -> Option<Node> {
        let (list, _) = scope_list_mut(&mut self.roots, scope);
        if index >= list.len() {
            tracing::debug!(index, len = list.len(), "remove index out of range");
            return None;
        }
        Some(list.remove(index))
    }
}

/// Child list of `scope` plus the scope node's level, or the root list and
/// `None` when `scope` is absent or unknown.
fn scope_list_mut(roots: &mut Vec<Node>, scope: Option<NodeId>) -> (&mut Vec<Node>, Option<u32>) {
    let path = scope.and_then(|id| path_to(roots, id));
    let mut list = roots;
    let mut level = None;
    for i in path.unwrap_or_default() {
        level = Some(list[i].level);
        list = &mut list[i].children;
    }
    (list, level)
}

fn max_id(nodes: &[Node]) -> u32 {
    nodes
        .iter()
        .map(|n| {
            let own = n.assigned_id().map_or(0, NodeId::get);
            own.max(max_id(&n.children))
        })
        .max()
        .unwrap_or(0)
}

fn clear_duplicate_ids(nodes: &mut [Node], seen: &mut HashSet<NodeId>) {
    for node in nodes {
        if let Some(id) = node.assigned_id() {
            if !seen.insert(id) {
                node.id = None;
            }
        }
        clear_duplicate_ids(&mut node.children, seen);
    }
}

fn clear_ids(nodes: &mut [Node]) {
    for node in nodes {
        node.id = None;
        clear_ids(&mut node.children);
    }
}

fn assign_from(nodes: &mut [Node], next: &mut u32) {
    for node in nodes {
        node.id = take_id(next);
        assign_from(&mut node.children, next);
    }
}

/// Hands out `next` and advances it. `u32::MAX` is never handed out, so the
/// counter cannot wrap onto [`NodeId::ROOT`].
fn take_id(next: &mut u32) -> Option<NodeId> {
    let id = *next;
    if id == u32::MAX {
        return None;
    }
    *next = id + 1;
    Some(NodeId(id))
}

/// Saturating count of nodes matching `pred`.
fn count_where(nodes: &[Node], pred: &dyn Fn(&Node) -> bool) -> u32 {
    nodes.iter().fold(0_u32, |acc, n| {
        acc.saturating_add(u32::from(pred(n)))
            .saturating_add(count_where(&n.children, pred))
    })
}

fn drop_invalid_weights(nodes: &mut Vec<Node>) {
    nodes.retain(|n| {
        let keep = is_valid_weight(n.weight);
        if !keep {
            tracing::debug!(name = %n.name, weight = n.weight, "dropped node with invalid weight");
        }
        keep
    });
    for node in nodes {
        drop_invalid_weights(&mut node.children);
    }
}

fn find_in<'a>(nodes: &'a [Node], pred: &dyn Fn(&Node) -> bool) -> Option<&'a Node> {
    // Current level first, then descend: matches the lookup order callers
    // rely on for duplicate names.
    if let Some(found) = nodes.iter().find(|n| pred(n)) {
        return Some(found);
    }
    nodes.iter().find_map(|n| find_in(&n.children, pred))
}

fn path_to(nodes: &[Node], id: NodeId) -> Option<Vec<usize>> {
    for (i, node) in nodes.iter().enumerate() {
        if node.id == Some(id) {
            return Some(alloc::vec![i]);
        }
        if let Some(mut rest) = path_to(&node.children, id) {
            rest.insert(0, i);
            return Some(rest);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{Node, Tree};
    use crate::types::NodeId;

    fn sample() -> Tree {
        Tree::from_nodes(vec![
            Node::new("a", 5.0).with_children([
                Node::new("a1", 3.0).with_level(2),
                Node::new("a2", 2.0).with_level(2),
            ]),
            Node::new("b", 4.0),
        ])
    }

    fn ids(nodes: &[Node]) -> Vec<u32> {
        let mut out = Vec::new();
        fn walk(nodes: &[Node], out: &mut Vec<u32>) {
            for n in nodes {
                out.push(n.id.map_or(0, NodeId::get));
                walk(&n.children, out);
            }
        }
        walk(nodes, &mut out);
        out
    }

    #[test]
    fn ids_are_preorder_from_one() {
        let tree = sample();
        assert_eq!(ids(tree.roots()), vec![1, 2, 3, 4], "pre-order ids");
    }

    #[test]
    fn assign_ids_is_idempotent() {
        let mut tree = sample();
        tree.assign_ids();
        assert_eq!(ids(tree.roots()), vec![1, 2, 3, 4], "no reassignment");
    }

    #[test]
    fn existing_ids_are_kept_and_counter_skips_past_them() {
        let mut seeded = Node::new("x", 1.0);
        seeded.id = Some(NodeId::new(10));
        let tree = Tree::from_nodes(vec![seeded, Node::new("y", 1.0)]);
        assert_eq!(ids(tree.roots()), vec![10, 11], "fresh id follows max");
    }

    #[test]
    fn duplicate_input_ids_are_reassigned() {
        let mut first = Node::new("x", 1.0);
        first.id = Some(NodeId::new(3));
        let mut second = Node::new("y", 1.0);
        second.id = Some(NodeId::new(3));
        let tree = Tree::from_nodes(vec![first, second]);
        assert_eq!(ids(tree.roots()), vec![3, 4], "second holder renumbered");
    }

    #[test]
    fn insert_under_name_sets_child_level() {
        let mut tree = sample();
        let id = tree.insert(Node::new("new", 1.0), Some("a1"));
        assert_eq!(id, Some(NodeId::new(5)), "next counter value");
        let a1 = tree.find_by_name("a1").expect("a1 exists");
        assert_eq!(a1.children.len(), 1, "appended under a1");
        assert_eq!(a1.children[0].level, 3, "one below the parent");
    }

    #[test]
    fn insert_unresolved_name_falls_back_to_root() {
        let mut tree = sample();
        tree.insert(Node::new("new", 1.0).with_level(7), Some("missing"));
        let last = tree.roots().last().expect("root list non-empty");
        assert_eq!(last.name, "new", "appended at root");
        assert_eq!(last.level, 1, "root level");
    }

    #[test]
    fn insert_rejects_bad_weights() {
        let mut tree = sample();
        for w in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(tree.insert(Node::new("bad", w), None), None, "weight {w}");
        }
        assert_eq!(tree.node_count(), 4, "tree unchanged");
    }

    #[test]
    fn insert_relevels_subtree_and_replaces_ids() {
        let mut tree = sample();
        let mut sub = Node::new("s", 1.0).with_children([Node::new("s1", 1.0)]);
        sub.id = Some(NodeId::new(2));
        let id = tree.insert_under(sub, Some(NodeId::new(1)));
        assert_eq!(id, Some(NodeId::new(5)), "incoming id is not trusted");
        let s1 = tree.find_by_name("s1").expect("s1 exists");
        assert_eq!(s1.level, 3, "grandchild of a level-1 node");
        assert_eq!(s1.id, Some(NodeId::new(6)), "pre-order continues");
    }

    #[test]
    fn duplicate_names_resolve_to_first_depth_first_match() {
        let mut tree = Tree::from_nodes(vec![
            Node::new("p", 1.0).with_children([Node::new("dup", 1.0).with_level(2)]),
            Node::new("dup", 1.0),
        ]);
        // Root-level "dup" is seen before descending into "p".
        tree.insert(Node::new("c", 1.0), Some("dup"));
        assert_eq!(tree.roots()[1].children.len(), 1, "root-level dup wins");
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut tree = sample();
        assert!(tree.remove_at(5, None).is_none(), "out of range");
        assert!(tree.remove_at(2, Some("a")).is_none(), "out of range in scope");
        assert_eq!(tree.node_count(), 4, "tree unchanged");
    }

    #[test]
    fn remove_within_named_scope() {
        let mut tree = sample();
        let removed = tree.remove_at(0, Some("a")).expect("a has children");
        assert_eq!(removed.name, "a1", "first child removed");
        assert_eq!(tree.children_of(Some(NodeId::new(1))).len(), 1, "one left");
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut tree = sample();
        tree.remove_at(1, None);
        let id = tree.insert(Node::new("c", 1.0), None);
        assert_eq!(id, Some(NodeId::new(5)), "counter keeps climbing");
    }

    fn with_id(name: &str, raw: u32) -> Node {
        let mut node = Node::new(name, 1.0);
        node.id = Some(NodeId::new(raw));
        node
    }

    #[test]
    fn maximal_input_id_renumbers_instead_of_overflowing() {
        let tree = Tree::from_nodes(vec![with_id("a", u32::MAX), Node::new("b", 1.0)]);
        assert_eq!(ids(tree.roots()), vec![1, 2], "renumbered from one");
    }

    #[test]
    fn ids_near_the_limit_are_used_then_inserts_are_refused() {
        let mut tree = Tree::from_nodes(vec![with_id("a", u32::MAX - 2), Node::new("b", 1.0)]);
        assert_eq!(
            ids(tree.roots()),
            vec![u32::MAX - 2, u32::MAX - 1],
            "last usable id handed out"
        );
        assert_eq!(tree.ids_remaining(), 0, "id space used up");
        assert!(
            tree.insert(Node::new("c", 1.0), None).is_none(),
            "no id left for c"
        );
        assert_eq!(tree.node_count(), 2, "tree unchanged");
        let all = ids(tree.roots());
        assert!(!all.contains(&u32::MAX), "u32::MAX never handed out");
        assert!(!all.contains(&0), "root id never handed out");
    }

    #[test]
    fn subtree_larger_than_remaining_ids_is_refused() {
        let mut tree = Tree::from_nodes(vec![with_id("a", u32::MAX - 2)]);
        assert_eq!(tree.ids_remaining(), 1, "one id left");
        let sub = Node::new("s", 1.0).with_children([Node::new("s1", 1.0)]);
        assert!(tree.insert(sub, None).is_none(), "needs two ids");
        assert!(tree.insert(Node::new("t", 1.0), None).is_some(), "one fits");
    }

    #[test]
    fn loading_drops_nodes_with_invalid_weights() {
        let tree = Tree::from_nodes(vec![
            Node::new("neg", -1.0).with_children([Node::new("orphan", 1.0).with_level(2)]),
            Node::new("ok", 2.0).with_children([
                Node::new("zero", 0.0).with_level(2),
                Node::new("nan", f64::NAN).with_level(2),
                Node::new("kept", 1.0).with_level(2),
            ]),
        ]);
        assert_eq!(tree.node_count(), 2, "ok and kept remain");
        assert!(tree.find_by_name("orphan").is_none(), "subtree dropped too");
        assert!(tree.find_by_name("kept").is_some(), "valid child kept");
    }
}
