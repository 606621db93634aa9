// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom-stack navigation over a laid-out hierarchy.

use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::camera::{Camera, CameraTransform};
use crate::layout::Layout;
use crate::scope::ScopeIndex;
use crate::types::{Circle, CircleFlags, NodeId};

/// One entry of the drill path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackEntry {
    /// Active node.
    pub id: NodeId,
    /// Its level, captured when it was entered.
    pub level: u32,
}

/// Coarse navigation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    /// Stack is empty; the root scope is active.
    AtRoot,
    /// At least one node has been drilled into.
    Drilled,
}

/// What a click resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    /// Nothing changes.
    Ignore,
    /// Push the node and make it the active scope.
    ZoomToChild(NodeId),
    /// Pop once; the previous entry (or the root) becomes active.
    ZoomToParent,
    /// Replace the top entry with the node.
    ///
    /// Clicks never produce this: an equal-level click already backs out via
    /// [`NavAction::ZoomToParent`]. It is available to callers that navigate
    /// programmatically, for example from a breadcrumb or sibling list.
    ZoomToSibling(NodeId),
}

/// Result of a navigation step, handed to the rendering layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Navigation {
    /// The action that was applied.
    pub action: NavAction,
    /// Active scope after the step.
    pub scope: NodeId,
    /// Camera target framing the new scope.
    pub transform: CameraTransform,
}

/// Stack-based drill-down state machine.
///
/// The controller holds the drill path and the camera, but no tree data: the
/// current [`Layout`] (and its [`ScopeIndex`]) is passed in on every call, so
/// decisions and visibility can be checked against any layout in isolation.
///
/// Transitions are fire-and-forget. Each one emits a [`CameraTransform`] with
/// a fresh generation and returns immediately.
#[derive(Clone, Debug)]
pub struct NavigationController {
    stack: SmallVec<[StackEntry; 4]>,
    camera: Camera,
    current: CameraTransform,
    generation: u64,
}

impl NavigationController {
    /// Starts at the root with the camera fitted to the world extent.
    ///
    /// The initial transform has generation `0` and is not emitted.
    pub fn new(camera: Camera) -> Self {
        let current = camera.fit_extent();
        Self {
            stack: SmallVec::new(),
            camera,
            current,
            generation: 0,
        }
    }

    /// Current coarse state.
    pub fn state(&self) -> NavState {
        if self.stack.is_empty() {
            NavState::AtRoot
        } else {
            NavState::Drilled
        }
    }

    /// Drill path, innermost last.
    pub fn stack(&self) -> &[StackEntry] {
        &self.stack
    }

    /// Active scope: the top of the stack, or [`NodeId::ROOT`].
    pub fn scope(&self) -> NodeId {
        self.stack.last().map_or(NodeId::ROOT, |e| e.id)
    }

    /// Last emitted camera target.
    pub fn current_transform(&self) -> &CameraTransform {
        &self.current
    }

    /// The camera used for fitting.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the camera, e.g. to resize the view.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Decides how a click on `clicked` would change the stack.
    ///
    /// - A circle without laid-out children is ignored.
    /// - The current top is ignored.
    /// - At the root, the circle is entered.
    /// - At or above the top's level, navigation backs out one step,
    ///   whichever circle was hit.
    /// - Deeper than the top, the circle is entered.
    pub fn decide(&self, clicked: &Circle, scopes: &ScopeIndex) -> NavAction {
        if !scopes.has_members(clicked.id) {
            return NavAction::Ignore;
        }
        let Some(top) = self.stack.last() else {
            return NavAction::ZoomToChild(clicked.id);
        };
        if top.id == clicked.id {
            return NavAction::Ignore;
        }
        match clicked.level.cmp(&top.level) {
            Ordering::Less | Ordering::Equal => NavAction::ZoomToParent,
            Ordering::Greater => NavAction::ZoomToChild(clicked.id),
        }
    }

    /// Handles a click on `clicked`.
    ///
    /// Returns `None` when the click changes nothing.
    pub fn click(&mut self, clicked: &Circle, layout: &Layout) -> Option<Navigation> {
        let action = self.decide(clicked, layout.scopes());
        self.apply(action, layout)
    }

    /// Handles a click on empty canvas: always backs out one step.
    ///
    /// At the root the stack stays empty, but the root framing is emitted
    /// again.
    pub fn click_background(&mut self, layout: &Layout) -> Navigation {
        self.stack.pop();
        self.emit(NavAction::ZoomToParent, layout)
    }

    /// Applies `action` and emits the new camera target.
    ///
    /// Actions naming a node that is not in `layout` are ignored.
    pub fn apply(&mut self, action: NavAction, layout: &Layout) -> Option<Navigation> {
        match action {
            NavAction::Ignore => {
                tracing::trace!("click ignored");
                return None;
            }
            NavAction::ZoomToParent => {
                self.stack.pop();
            }
            NavAction::ZoomToChild(id) | NavAction::ZoomToSibling(id) => {
                let Some(circle) = layout.circle(id) else {
                    tracing::debug!(?id, "navigation target not laid out");
                    return None;
                };
                if matches!(action, NavAction::ZoomToSibling(_)) {
                    self.stack.pop();
                }
                self.stack.push(StackEntry {
                    id,
                    level: circle.level,
                });
            }
        }
        Some(self.emit(action, layout))
    }

    /// Direct members of the active scope, in layout order.
    pub fn visible_ids<'a>(&self, scopes: &'a ScopeIndex) -> &'a [NodeId] {
        scopes.members(self.scope())
    }

    /// Returns true if `id` is a direct member of the active scope.
    pub fn is_visible(&self, id: NodeId, scopes: &ScopeIndex) -> bool {
        scopes.is_member_of(id, self.scope())
    }

    /// Flags for `id` under the active scope.
    pub fn flags(&self, id: NodeId, scopes: &ScopeIndex) -> CircleFlags {
        if self.is_visible(id, scopes) {
            CircleFlags::ACTIVE
        } else {
            CircleFlags::empty()
        }
    }

    fn emit(&mut self, action: NavAction, layout: &Layout) -> Navigation {
        let scope = self.scope();
        // A scope removed by a mutation has no circle; frame the canvas then.
        let target = layout
            .circle(scope)
            .map_or(self.camera.world_extent(), |c| c.bounds);
        self.generation += 1;
        let transform = CameraTransform {
            generation: self.generation,
            ..self.camera.fit(target)
        };
        self.current = transform;
        tracing::debug!(
            ?action,
            scope = scope.get(),
            depth = self.stack.len(),
            scale = transform.scale,
            generation = transform.generation,
            "navigate"
        );
        Navigation {
            action,
            scope,
            transform,
        }
    }
}
