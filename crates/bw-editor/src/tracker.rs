//! Drag and drop trackers.
//!
//! A tracker is the short-lived state machine for one open gesture. It is
//! produced by a controller's accept call and from then on owned by the
//! [`ToolBox`](crate::toolbox::ToolBox), which forwards every move/up event
//! to it until it finishes or is cancelled.

use bw_core::{InputState, RenderBatch, RenderContext};

/// Outcome of forwarding an event to an open tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStatus {
    /// Keep the gesture open.
    Continue,
    /// The gesture is complete; the tool box calls `finish` and releases it.
    Finish,
}

/// One in-progress pointer drag.
pub trait DragTracker {
    /// Pointer moved while the gesture is open.
    fn update(&mut self, state: &InputState) -> DragStatus;

    /// Button released while the gesture is open. Multi-click gestures may
    /// return `Continue` to stay open across releases.
    fn mouse_up(&mut self, _state: &InputState) -> DragStatus {
        DragStatus::Finish
    }

    /// Commit the gesture. Called exactly once, right before the tracker is
    /// dropped.
    fn finish(&mut self, state: &InputState);

    /// Abandon the gesture and revert any preview state.
    fn cancel(&mut self);

    fn modifier_key_change(&mut self, _state: &InputState) {}

    fn mouse_scroll(&mut self, _state: &InputState) {}

    fn set_render_options(&self, _state: &InputState, _ctx: &mut RenderContext) {}

    fn render(&self, _state: &InputState, _ctx: &RenderContext, _batch: &mut RenderBatch) {}
}

/// One in-progress drop of an external payload onto the view.
pub trait DropTracker {
    /// The payload moved over the view. Returning `Finish` gives the payload
    /// up: the tool box cancels the tracker and a later drop is not consumed.
    fn update(&mut self, state: &InputState) -> DragStatus;

    /// The payload was dropped. Returns whether it was consumed.
    fn finish(&mut self, state: &InputState) -> bool;

    /// The payload left the view or the drop was aborted.
    fn cancel(&mut self);
}
