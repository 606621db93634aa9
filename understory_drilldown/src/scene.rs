// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orchestration: one tree, its latest layout, and the navigation state.

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::{Point, Rect};

use crate::camera::{Camera, CameraTransform, DEFAULT_DURATION, DEFAULT_PADDING};
use crate::error::LayoutError;
use crate::layout::{Layout, LayoutConfig, layout};
use crate::nav::{Navigation, NavigationController};
use crate::tree::{Node, Tree};
use crate::types::{Circle, CircleFlags, NodeId};

/// Configuration for a [`Scene`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Layout inputs (canvas extent and level factors).
    pub layout: LayoutConfig,
    /// View rectangle in device pixels.
    pub view_rect: Rect,
    /// Fraction of the view a framed scope may fill.
    pub padding: f64,
    /// Recommended camera animation length.
    pub duration: Duration,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            view_rect: Rect::new(0.0, 0.0, 800.0, 600.0),
            padding: DEFAULT_PADDING,
            duration: DEFAULT_DURATION,
        }
    }
}

impl SceneConfig {
    /// Builder: set the layout inputs.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Builder: set the view rectangle.
    #[must_use]
    pub fn with_view_rect(mut self, view_rect: Rect) -> Self {
        self.view_rect = view_rect;
        self
    }

    /// Builder: set the animation length.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// A circle paired with its flags under the active scope.
#[derive(Clone, Copy, Debug)]
pub struct FrameCircle<'a> {
    /// Laid-out circle.
    pub circle: &'a Circle,
    /// Visibility and picking under the active scope.
    pub flags: CircleFlags,
}

/// The drill-down core as seen by a renderer and a control surface.
///
/// Every edit runs the full pipeline: tree mutation, complete layout, fresh
/// scope index. Navigation state survives edits untouched; if the active
/// scope disappears, nothing is visible until the user backs out.
///
/// Edits are scoped by the active node's id. A layout failure rolls the tree
/// back, so the scene always reflects the last tree that laid out cleanly.
#[derive(Clone, Debug)]
pub struct Scene {
    tree: Tree,
    config: LayoutConfig,
    layout: Layout,
    nav: NavigationController,
}

impl Scene {
    /// Builds a scene from the input hierarchy.
    ///
    /// # Errors
    ///
    /// Returns the [`LayoutError`] of the initial layout pass.
    pub fn new(nodes: Vec<Node>, config: SceneConfig) -> Result<Self, LayoutError> {
        Self::from_tree(Tree::from_nodes(nodes), config)
    }

    /// Builds a scene around an existing tree.
    ///
    /// # Errors
    ///
    /// Returns the [`LayoutError`] of the initial layout pass.
    pub fn from_tree(tree: Tree, config: SceneConfig) -> Result<Self, LayoutError> {
        let layout = layout(tree.roots(), &config.layout)?;
        let camera = Camera::new(config.view_rect, config.layout.extent)
            .with_padding(config.padding)
            .with_duration(config.duration);
        Ok(Self {
            tree,
            config: config.layout,
            layout,
            nav: NavigationController::new(camera),
        })
    }

    /// The owned hierarchy.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Result of the latest layout pass.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Navigation state.
    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    /// Active scope id.
    pub fn scope(&self) -> NodeId {
        self.nav.scope()
    }

    /// Last emitted camera target (the root framing before any navigation).
    pub fn camera_transform(&self) -> &CameraTransform {
        self.nav.current_transform()
    }

    /// Resizes the view. Takes effect on the next navigation step.
    pub fn set_view_rect(&mut self, rect: Rect) {
        self.nav.camera_mut().set_view_rect(rect);
    }

    /// Ids visible and interactive under the active scope.
    pub fn visible_ids(&self) -> &[NodeId] {
        self.nav.visible_ids(self.layout.scopes())
    }

    /// Every laid-out circle with its flags, in draw order.
    pub fn frame(&self) -> impl Iterator<Item = FrameCircle<'_>> + '_ {
        let scopes = self.layout.scopes();
        self.layout.circles().iter().map(move |circle| FrameCircle {
            circle,
            flags: self.nav.flags(circle.id, scopes),
        })
    }

    /// Adds a node under the active scope, or at the root.
    ///
    /// Returns the new id, or `None` if the weight was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnmappedLevel`] if the new node lands on a
    /// level without a radius factor; the tree is left as it was.
    pub fn add_node(
        &mut self,
        weight: f64,
        name: impl Into<String>,
    ) -> Result<Option<NodeId>, LayoutError> {
        let scope = self.active_node();
        let node = Node::new(name, weight);
        self.edit(|tree| tree.insert_under(node, scope))
    }

    /// Removes the child at `index` of the active scope, or of the root list.
    ///
    /// Returns the removed subtree, or `None` if `index` was out of range.
    ///
    /// # Errors
    ///
    /// Removal can let a previously cut sibling into the layout; if that
    /// node's level has no factor the edit is rolled back.
    pub fn remove_node(&mut self, index: usize) -> Result<Option<Node>, LayoutError> {
        let scope = self.active_node();
        self.edit(|tree| tree.remove_at_in(index, scope))
    }

    /// Handles a click on the circle `id`.
    ///
    /// Only circles visible under the active scope can be clicked; anything
    /// else is ignored like a click on a leaf.
    pub fn click(&mut self, id: NodeId) -> Option<Navigation> {
        if !self.nav.is_visible(id, self.layout.scopes()) {
            tracing::trace!(?id, "click on hidden circle");
            return None;
        }
        let circle = self.layout.circle(id)?;
        self.nav.click(circle, &self.layout)
    }

    /// Handles a click on empty canvas.
    pub fn click_background(&mut self) -> Navigation {
        self.nav.click_background(&self.layout)
    }

    /// Finds the visible circle under a view-space point.
    ///
    /// Uses the last emitted camera target. Where discs overlap, the one drawn
    /// last wins.
    pub fn hit_test(&self, view_pt: Point) -> Option<NodeId> {
        let nav = &self.nav;
        let world = nav
            .camera()
            .view_to_world_point(nav.current_transform(), view_pt);
        self.visible_ids()
            .iter()
            .rev()
            .copied()
            .find(|&id| self.layout.circle(id).is_some_and(|c| c.contains(world)))
    }

    /// Routes a pointer click at a view-space point: a hit is a circle
    /// click, a miss is a background click.
    pub fn click_at(&mut self, view_pt: Point) -> Option<Navigation> {
        match self.hit_test(view_pt) {
            Some(id) => self.click(id),
            None => Some(self.click_background()),
        }
    }

    fn active_node(&self) -> Option<NodeId> {
        let scope = self.nav.scope();
        (!scope.is_root()).then_some(scope)
    }

    fn edit<T>(
        &mut self,
        op: impl FnOnce(&mut Tree) -> Option<T>,
    ) -> Result<Option<T>, LayoutError> {
        let backup = self.tree.clone();
        let Some(result) = op(&mut self.tree) else {
            return Ok(None);
        };
        match layout(self.tree.roots(), &self.config) {
            Ok(layout) => {
                self.layout = layout;
                Ok(Some(result))
            }
            Err(err) => {
                tracing::warn!(%err, "edit rolled back");
                self.tree = backup;
                Err(err)
            }
        }
    }
}
