// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared by the layout and navigation layers: identifiers,
//! circle records, and visibility flags.

use alloc::string::String;

use kurbo::{Point, Rect};

/// Identifier for a node in a [`Tree`](crate::Tree).
///
/// Ids are assigned by the owning tree from a monotonically increasing
/// counter and are never reused, even after the node is removed.
///
/// ## Root scope
///
/// [`NodeId::ROOT`] (`0`) is reserved for the implicit top-level scope. It is
/// never assigned to a node; a node that arrives carrying it is treated as
/// unassigned.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The implicit top-level scope.
    pub const ROOT: Self = Self(0);

    /// Construct an id from its raw value.
    ///
    /// Mostly useful for tests and for input that already carries ids.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Return the raw value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns true for [`NodeId::ROOT`].
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

/// Number of entries in [`PALETTE`].
pub const PALETTE_LEN: usize = 9;

/// Fixed fill palette as `0xRRGGBB`, indexed by [`Circle::fill_index`].
///
/// Each depth of the hierarchy advances one entry, wrapping after the last.
pub const PALETTE: [u32; PALETTE_LEN] = [
    0x90EE90, // light green
    0x0000FF, // blue
    0xFF0000, // red
    0xFAFAD2, // light goldenrod yellow
    0xFFB6C1, // light pink
    0xD3D3D3, // light gray
    0xADD8E6, // light blue
    0xFFA500, // orange
    0xDDA0DD, // plum
];

/// A positioned circle produced by one layout pass.
///
/// Circles are transient: every pass recomputes the whole list, and a circle
/// is never mutated in place afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    /// Node this circle represents.
    pub id: NodeId,
    /// Display name copied from the node.
    pub name: String,
    /// Depth of the node (root's direct children are level 1).
    pub level: u32,
    /// Scope the circle belongs to: its parent's id, or [`NodeId::ROOT`].
    pub parent: NodeId,
    /// Center of the circle in world coordinates.
    pub center: Point,
    /// `weight * level_factor(level)`.
    pub radius: f64,
    /// Region reserved for this circle and all of its descendants.
    pub bounds: Rect,
    /// Index into [`PALETTE`]; one step per depth.
    pub fill_index: usize,
}

impl Circle {
    /// Resolve [`Circle::fill_index`] against [`PALETTE`].
    #[must_use]
    pub fn fill(&self) -> u32 {
        PALETTE[self.fill_index % PALETTE_LEN]
    }

    /// Returns true if `pt` lies inside the disc (boundary included).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let d = pt - self.center;
        d.hypot2() <= self.radius * self.radius
    }
}

bitflags::bitflags! {
    /// Per-circle flags derived from the active scope.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CircleFlags: u8 {
        /// Circle should be drawn.
        const VISIBLE  = 0b0000_0001;
        /// Circle participates in hit testing.
        const PICKABLE = 0b0000_0010;
    }
}

impl CircleFlags {
    /// Flags for a member of the active scope.
    pub const ACTIVE: Self = Self::VISIBLE.union(Self::PICKABLE);
}
