//! Ordered tool chains.
//!
//! Chain order is priority order: callers append higher-priority controllers
//! first and no other tie-break exists. Claim-style operations stop at the
//! first live controller that claims; passive operations reach every live
//! controller.

use crate::controller::ToolController;
use crate::tracker::{DragTracker, DropTracker};
use bw_core::{InputState, PickResult, RenderBatch, RenderContext, ToolId};

/// An ordered sequence of controllers, owned by the chain.
#[derive(Default)]
pub struct ToolChain {
    controllers: Vec<Box<dyn ToolController>>,
}

impl ToolChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a controller at the lowest priority. The chain takes
    /// ownership, so an entry can never appear twice.
    pub fn append(&mut self, controller: impl ToolController + 'static) {
        log::trace!("chain: appending controller for {}", controller.tool().id());
        self.controllers.push(Box::new(controller));
    }

    pub fn with(mut self, controller: impl ToolController + 'static) -> Self {
        self.append(controller);
        self
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Tool IDs in priority order.
    pub fn tool_ids(&self) -> impl Iterator<Item = ToolId> + '_ {
        self.controllers.iter().map(|c| c.tool().id())
    }

    /// Whether any controller contributes to `pick` while its tool is
    /// inactive.
    pub fn any_picks_when_inactive(&self) -> bool {
        self.controllers.iter().any(|c| c.picks_when_inactive())
    }

    fn live(&self) -> impl Iterator<Item = &Box<dyn ToolController>> {
        self.controllers.iter().filter(|c| c.tool_active())
    }

    fn live_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn ToolController>> {
        self.controllers.iter_mut().filter(|c| c.tool_active())
    }

    // ─── Passive fan-out ─────────────────────────────────────────────────

    pub fn pick(&self, state: &InputState, pick_result: &mut PickResult) {
        for controller in self
            .controllers
            .iter()
            .filter(|c| c.tool_active() || c.picks_when_inactive())
        {
            controller.pick(state, pick_result);
        }
    }

    pub fn modifier_key_change(&mut self, state: &InputState) {
        for controller in self.live_mut() {
            controller.modifier_key_change(state);
        }
    }

    pub fn mouse_down(&mut self, state: &InputState) {
        for controller in self.live_mut() {
            controller.mouse_down(state);
        }
    }

    pub fn mouse_up(&mut self, state: &InputState) {
        for controller in self.live_mut() {
            controller.mouse_up(state);
        }
    }

    pub fn mouse_move(&mut self, state: &InputState) {
        for controller in self.live_mut() {
            controller.mouse_move(state);
        }
    }

    pub fn mouse_scroll(&mut self, state: &InputState) {
        for controller in self.live_mut() {
            controller.mouse_scroll(state);
        }
    }

    pub fn set_render_options(&self, state: &InputState, ctx: &mut RenderContext) {
        for controller in self.live() {
            controller.set_render_options(state, ctx);
        }
    }

    pub fn render(&self, state: &InputState, ctx: &RenderContext, batch: &mut RenderBatch) {
        for controller in self.live() {
            controller.render(state, ctx, batch);
        }
    }

    // ─── Consumed-style ──────────────────────────────────────────────────

    pub fn mouse_click(&mut self, state: &InputState) -> bool {
        self.live_mut().any(|c| c.mouse_click(state))
    }

    pub fn mouse_double_click(&mut self, state: &InputState) -> bool {
        self.live_mut().any(|c| c.mouse_double_click(state))
    }

    // ─── Claim-style ─────────────────────────────────────────────────────

    /// Offer a drag-start to each live controller in order; the first
    /// tracker returned wins and later controllers are not asked.
    pub fn start_mouse_drag(&mut self, state: &InputState) -> Option<Box<dyn DragTracker>> {
        self.live_mut().find_map(|c| {
            let tracker = c.accept_mouse_drag(state);
            if tracker.is_some() {
                log::debug!("drag claimed by {}", c.tool().id());
            }
            tracker
        })
    }

    /// Offer a drop payload to each live controller in order.
    pub fn drag_enter(&mut self, state: &InputState, payload: &str) -> Option<Box<dyn DropTracker>> {
        self.live_mut().find_map(|c| {
            let tracker = c.accept_drop(state, payload);
            if tracker.is_some() {
                log::debug!("drop {payload:?} claimed by {}", c.tool().id());
            }
            tracker
        })
    }

    pub fn any_tool_dragging(&self, state: &InputState) -> bool {
        self.live().any(|c| c.any_tool_dragging(state))
    }

    /// Ask every live controller to cancel; no short-circuit. Returns whether
    /// any of them had something to cancel.
    pub fn cancel(&mut self) -> bool {
        self.live_mut().fold(false, |cancelled, c| c.cancel() || cancelled)
    }
}
