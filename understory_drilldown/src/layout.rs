// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive nested-circle layout.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::error::LayoutError;
use crate::scope::ScopeIndex;
use crate::tree::Node;
use crate::types::{Circle, NodeId, PALETTE_LEN};

/// Most siblings a single scope can show; heavier ones win.
pub const MAX_SIBLINGS: usize = 9;

/// Default canvas extent on each axis, in world units.
pub const DEFAULT_EXTENT: f64 = 90_000.0;

/// `(column, row)` of each slot in the 3×3 partition, in binding order:
/// center, the four corners, then the four edge midpoints.
const SLOT_CELLS: [(usize, usize); MAX_SIBLINGS] = [
    (1, 1),
    (0, 0),
    (2, 2),
    (0, 2),
    (2, 0),
    (0, 1),
    (2, 1),
    (1, 0),
    (1, 2),
];

/// Radius multiplier per level.
///
/// Only levels given a factor are mapped; any other level (including level
/// 0 and gaps between configured levels) fails the layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelFactors {
    // Sorted by level, one entry per level.
    factors: SmallVec<[(u32, f64); 4]>,
}

impl Default for LevelFactors {
    /// `1 → 1000`, `2 → 100`, `3 → 10`.
    fn default() -> Self {
        Self::new([1000.0, 100.0, 10.0])
    }
}

impl LevelFactors {
    /// Factors for levels `1..=n`, in order.
    pub fn new(factors: impl IntoIterator<Item = f64>) -> Self {
        Self {
            factors: (1..).zip(factors).collect(),
        }
    }

    /// Builder: set the factor for `level`, replacing any previous one.
    ///
    /// Other levels are untouched. Level 0 is ignored.
    #[must_use]
    pub fn with_factor(mut self, level: u32, factor: f64) -> Self {
        if level == 0 {
            return self;
        }
        match self.factors.binary_search_by_key(&level, |&(l, _)| l) {
            Ok(idx) => self.factors[idx].1 = factor,
            Err(idx) => self.factors.insert(idx, (level, factor)),
        }
        self
    }

    /// Factor for `level`, if mapped.
    pub fn get(&self, level: u32) -> Option<f64> {
        self.factors
            .binary_search_by_key(&level, |&(l, _)| l)
            .ok()
            .map(|idx| self.factors[idx].1)
    }

    /// Deepest mapped level, or 0 when nothing is mapped.
    pub fn max_level(&self) -> u32 {
        self.factors.last().map_or(0, |&(level, _)| level)
    }
}

/// Inputs of a layout pass other than the tree itself.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Canvas extent the top level is partitioned into.
    pub extent: Rect,
    /// Radius multiplier per level.
    pub level_factors: LevelFactors,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            extent: Rect::new(0.0, 0.0, DEFAULT_EXTENT, DEFAULT_EXTENT),
            level_factors: LevelFactors::default(),
        }
    }
}

impl LayoutConfig {
    /// Builder: set the canvas extent.
    #[must_use]
    pub fn with_extent(mut self, extent: Rect) -> Self {
        self.extent = extent;
        self
    }

    /// Builder: set the level factor table.
    #[must_use]
    pub fn with_level_factors(mut self, level_factors: LevelFactors) -> Self {
        self.level_factors = level_factors;
        self
    }
}

/// One target region of the partition template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    /// Where the circle is centered.
    pub center: Point,
    /// Region handed to the circle's children.
    pub bounds: Rect,
}

/// Partitions `bounds` into the nine slots of the fixed template.
///
/// The box is cut into thirds on each axis (grid lines at 2/6 and 4/6); slot
/// points fall on the 1/6, 3/6 and 5/6 lines. Slots tile `bounds` exactly and
/// never overlap.
pub fn slots(bounds: Rect) -> [Slot; MAX_SIBLINGS] {
    let xs = thirds(bounds.x0, bounds.x1);
    let ys = thirds(bounds.y0, bounds.y1);
    SLOT_CELLS.map(|(col, row)| {
        let cell = Rect::new(xs[col], ys[row], xs[col + 1], ys[row + 1]);
        Slot {
            center: cell.center(),
            bounds: cell,
        }
    })
}

fn thirds(lo: f64, hi: f64) -> [f64; 4] {
    let sixth = (hi - lo) / 6.0;
    [lo, lo + sixth * 2.0, lo + sixth * 4.0, hi]
}

/// Siblings cut from one scope because it had more than [`MAX_SIBLINGS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Truncation {
    /// Scope whose children were cut.
    pub scope: NodeId,
    /// Number of children (with their subtrees) left out of the pass.
    pub dropped: usize,
}

/// Result of one layout pass.
///
/// Circles are listed pre-order: every circle precedes its descendants, and
/// siblings appear heaviest first.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    circles: Vec<Circle>,
    scopes: ScopeIndex,
    truncations: Vec<Truncation>,
    by_id: HashMap<NodeId, usize>,
}

impl Layout {
    /// All circles across all depths.
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// Scope lookups built alongside the circles.
    pub fn scopes(&self) -> &ScopeIndex {
        &self.scopes
    }

    /// Scopes that lost children to the sibling cap.
    pub fn truncations(&self) -> &[Truncation] {
        &self.truncations
    }

    /// Total number of nodes dropped directly by the sibling cap.
    pub fn dropped_count(&self) -> usize {
        self.truncations.iter().map(|t| t.dropped).sum()
    }

    /// Circle for `id`, if it was laid out.
    pub fn circle(&self, id: NodeId) -> Option<&Circle> {
        self.by_id.get(&id).map(|&idx| &self.circles[idx])
    }

    /// Number of circles.
    pub fn len(&self) -> usize {
        self.circles.len()
    }

    /// Returns true if nothing was laid out.
    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }
}

/// Lays out `nodes` (the root list) inside `config.extent`.
///
/// The whole tree is laid out in one pass; nothing is incremental. Per scope,
/// siblings are ordered by descending weight (ties keep input order), cut to
/// [`MAX_SIBLINGS`], and bound to the [`slots`] of the scope's region in that
/// order. Children recurse into their parent's slot with the next palette
/// entry.
///
/// # Errors
///
/// - [`LayoutError::UnmappedLevel`] if a laid-out node's level has no factor.
/// - [`LayoutError::UnassignedId`] if a laid-out node has no id.
pub fn layout(nodes: &[Node], config: &LayoutConfig) -> Result<Layout, LayoutError> {
    let mut out = Layout::default();
    place(nodes, NodeId::ROOT, config.extent, 0, config, &mut out)?;
    tracing::debug!(
        circles = out.circles.len(),
        scopes = out.scopes.scopes().count(),
        dropped = out.dropped_count(),
        "layout pass"
    );
    Ok(out)
}

fn place(
    nodes: &[Node],
    scope: NodeId,
    bounds: Rect,
    color: usize,
    config: &LayoutConfig,
    out: &mut Layout,
) -> Result<(), LayoutError> {
    out.scopes.open_scope(scope);

    let mut order: Vec<&Node> = nodes.iter().collect();
    order.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    if order.len() > MAX_SIBLINGS {
        let dropped = order.len() - MAX_SIBLINGS;
        tracing::warn!(scope = scope.get(), dropped, "sibling cap reached");
        out.truncations.push(Truncation { scope, dropped });
        order.truncate(MAX_SIBLINGS);
    }

    for (node, slot) in order.into_iter().zip(slots(bounds)) {
        let id = node.assigned_id().ok_or_else(|| LayoutError::UnassignedId {
            name: node.name.clone(),
        })?;
        let factor = config
            .level_factors
            .get(node.level)
            .ok_or(LayoutError::UnmappedLevel {
                id,
                level: node.level,
            })?;

        out.scopes.register(scope, id);
        out.by_id.insert(id, out.circles.len());
        out.circles.push(Circle {
            id,
            name: node.name.clone(),
            level: node.level,
            parent: scope,
            center: slot.center,
            radius: node.weight * factor,
            bounds: slot.bounds,
            fill_index: color % PALETTE_LEN,
        });

        if !node.children.is_empty() {
            place(&node.children, id, slot.bounds, color + 1, config, out)?;
        }
    }
    Ok(())
}
