// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drilldown --heading-base-level=0

//! Understory Drilldown: nested-circle layout and zoom navigation for weighted hierarchies.
//!
//! This crate turns a tree of weighted nodes (entities grouped into categories
//! grouped into super-categories) into a flat list of positioned circles, and
//! drives a drill-down camera over them one level at a time. It is headless:
//!
//! - It does **not** draw, bind input events, or animate.
//! - It produces circle records, per-circle visibility flags, and a camera
//!   target (scale + translate + recommended duration) for a renderer.
//! - It consumes a hierarchy, clicks, and add/remove commands.
//!
//! ## Pipeline
//!
//! - [`Tree`]: owns the hierarchy and assigns stable [`NodeId`]s.
//! - [`layout`]: pure function from the tree to a [`Layout`]: every circle
//!   across all depths, plus a [`ScopeIndex`] mapping scopes to their direct
//!   members.
//! - [`NavigationController`]: the zoom stack; decides what a click does,
//!   which circles are visible, and emits [`CameraTransform`]s via [`Camera`].
//! - [`Scene`]: ties the three together. Every edit re-runs the whole layout.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_drilldown::{Node, NodeId, Scene, SceneConfig};
//!
//! let mut scene = Scene::new(
//!     vec![
//!         Node::new("vehicles", 8.0).with_children([
//!             Node::new("cars", 5.0).with_level(2),
//!             Node::new("bikes", 2.0).with_level(2),
//!         ]),
//!         Node::new("tools", 3.0),
//!     ],
//!     SceneConfig::default(),
//! )?;
//!
//! // At the root only level-1 circles are visible.
//! assert_eq!(scene.visible_ids(), &[NodeId::new(1), NodeId::new(4)]);
//!
//! // Drill into "vehicles"; the renderer animates toward `step.transform`.
//! let step = scene.click(NodeId::new(1)).expect("vehicles has children");
//! assert_eq!(step.scope, NodeId::new(1));
//! assert_eq!(scene.visible_ids(), &[NodeId::new(2), NodeId::new(3)]);
//!
//! // Clicking empty canvas backs out one level.
//! scene.click_background();
//! assert!(scene.scope().is_root());
//! # Ok::<(), understory_drilldown::LayoutError>(())
//! ```
//!
//! ## Layout rules
//!
//! - Siblings are ordered by descending weight and cut to [`MAX_SIBLINGS`];
//!   the cut is reported through [`Layout::truncations`].
//! - Each scope's region is split into the nine fixed [`slots`]; children
//!   recurse into their parent's slot.
//! - `radius = weight * factor(level)` using [`LevelFactors`]. An unmapped
//!   level fails the pass with [`LayoutError::UnmappedLevel`].
//!
//! ## Overlapping transitions
//!
//! Clicks are never queued or dropped. Each emitted [`CameraTransform`]
//! carries a strictly increasing `generation`; a renderer should abandon an
//! animation toward an older generation as soon as a newer one arrives.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod camera;
mod error;
mod layout;
mod nav;
mod scene;
mod scope;
mod tree;
mod types;

pub use camera::{Camera, CameraTransform, DEFAULT_DURATION, DEFAULT_PADDING};
pub use error::LayoutError;
pub use layout::{
    DEFAULT_EXTENT, Layout, LayoutConfig, LevelFactors, MAX_SIBLINGS, Slot, Truncation, layout,
    slots,
};
pub use nav::{NavAction, NavState, Navigation, NavigationController, StackEntry};
pub use scene::{FrameCircle, Scene, SceneConfig};
pub use scope::{Members, ScopeIndex};
pub use tree::{Node, Tree};
pub use types::{Circle, CircleFlags, NodeId, PALETTE, PALETTE_LEN};
