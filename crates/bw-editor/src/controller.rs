//! The tool controller contract and its composite.
//!
//! A controller converts `InputState` events into actions of the tool it is
//! bound to. It is live only while that tool is active; the chain skips it
//! otherwise. Every operation has a "not interested" default, so a concrete
//! controller implements only what it handles.
//!
//! ## Dispatch semantics
//!
//! | Operation | Routing |
//! |-----------|---------|
//! | `mouse_click`, `mouse_double_click` | first live controller returning `true` consumes |
//! | `accept_mouse_drag`, `accept_drop` | first live controller returning a tracker claims |
//! | `pick`, `render`, `mouse_move`, `mouse_scroll`, `modifier_key_change` | every live controller |

use crate::chain::ToolChain;
use crate::tool::Tool;
use crate::tracker::{DragTracker, DropTracker};
use bw_core::{InputState, PickResult, RenderBatch, RenderContext};

/// Routes input events for one tool.
pub trait ToolController {
    /// The tool this controller is bound to.
    fn tool(&self) -> &Tool;

    fn tool_active(&self) -> bool {
        self.tool().active()
    }

    /// Opt out of activation gating for [`pick`](Self::pick) only, for
    /// controllers that render always-visible affordances.
    fn picks_when_inactive(&self) -> bool {
        false
    }

    /// Contribute tool-owned geometry to the shared pick result.
    /// Must be idempotent.
    fn pick(&self, _state: &InputState, _pick_result: &mut PickResult) {}

    /// The set of held modifier keys changed since the last event.
    fn modifier_key_change(&mut self, _state: &InputState) {}

    fn mouse_down(&mut self, _state: &InputState) {}

    fn mouse_up(&mut self, _state: &InputState) {}

    /// A press and release that did not become a drag. Return `true` to
    /// consume it.
    fn mouse_click(&mut self, _state: &InputState) -> bool {
        false
    }

    fn mouse_double_click(&mut self, _state: &InputState) -> bool {
        false
    }

    fn mouse_move(&mut self, _state: &InputState) {}

    fn mouse_scroll(&mut self, _state: &InputState) {}

    /// A press followed by motion beyond the drag threshold. Returning a
    /// tracker claims all move/up events until the gesture ends.
    fn accept_mouse_drag(&mut self, _state: &InputState) -> Option<Box<dyn DragTracker>> {
        None
    }

    /// Whether a drag is currently open anywhere in scope.
    fn any_tool_dragging(&self, state: &InputState) -> bool {
        state.any_tool_dragging()
    }

    /// An external payload entered the view. Returning a tracker claims the
    /// drop gesture.
    fn accept_drop(&mut self, _state: &InputState, _payload: &str) -> Option<Box<dyn DropTracker>> {
        None
    }

    fn set_render_options(&self, _state: &InputState, _ctx: &mut RenderContext) {}

    fn render(&self, _state: &InputState, _ctx: &RenderContext, _batch: &mut RenderBatch) {}

    /// Abandon any in-progress gesture state. Returns whether there was
    /// anything to cancel.
    fn cancel(&mut self) -> bool {
        false
    }
}

// ─── Group ───────────────────────────────────────────────────────────────

type DragGate = Box<dyn Fn(&InputState) -> bool>;
type DropGate = Box<dyn Fn(&InputState, &str) -> bool>;

/// A controller that fans out to a nested chain of sub-controllers.
///
/// Lets a high-level tool appear as one entry in the outer chain while its
/// sub-controllers (edge handles, face handles …) stay private. The gates
/// decide whether the nested chain may claim a drag or a drop; when a gate
/// declines, the group reports no interest and siblings in the outer chain
/// compete for the event. Passive operations always reach the nested chain.
pub struct ToolControllerGroup {
    tool: Tool,
    chain: ToolChain,
    drag_gate: Option<DragGate>,
    drop_gate: Option<DropGate>,
}

impl ToolControllerGroup {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            chain: ToolChain::new(),
            drag_gate: None,
            drop_gate: None,
        }
    }

    pub fn add_controller(&mut self, controller: impl ToolController + 'static) {
        self.chain.append(controller);
    }

    pub fn with_controller(mut self, controller: impl ToolController + 'static) -> Self {
        self.add_controller(controller);
        self
    }

    pub fn with_drag_gate(mut self, gate: impl Fn(&InputState) -> bool + 'static) -> Self {
        self.drag_gate = Some(Box::new(gate));
        self
    }

    pub fn with_drop_gate(mut self, gate: impl Fn(&InputState, &str) -> bool + 'static) -> Self {
        self.drop_gate = Some(Box::new(gate));
        self
    }

    pub fn chain(&self) -> &ToolChain {
        &self.chain
    }

    fn should_handle_mouse_drag(&self, state: &InputState) -> bool {
        self.drag_gate.as_ref().is_none_or(|gate| gate(state))
    }

    fn should_handle_drop(&self, state: &InputState, payload: &str) -> bool {
        self.drop_gate.as_ref().is_none_or(|gate| gate(state, payload))
    }
}

impl ToolController for ToolControllerGroup {
    fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Inherited from the nested chain, so sub-controllers with
    /// always-visible affordances keep picking while the group is inactive.
    fn picks_when_inactive(&self) -> bool {
        self.chain.any_picks_when_inactive()
    }

    fn pick(&self, state: &InputState, pick_result: &mut PickResult) {
        self.chain.pick(state, pick_result);
    }

    fn modifier_key_change(&mut self, state: &InputState) {
        self.chain.modifier_key_change(state);
    }

    fn mouse_down(&mut self, state: &InputState) {
        self.chain.mouse_down(state);
    }

    fn mouse_up(&mut self, state: &InputState) {
        self.chain.mouse_up(state);
    }

    fn mouse_click(&mut self, state: &InputState) -> bool {
        self.chain.mouse_click(state)
    }

    fn mouse_double_click(&mut self, state: &InputState) -> bool {
        self.chain.mouse_double_click(state)
    }

    fn mouse_move(&mut self, state: &InputState) {
        self.chain.mouse_move(state);
    }

    fn mouse_scroll(&mut self, state: &InputState) {
        self.chain.mouse_scroll(state);
    }

    fn accept_mouse_drag(&mut self, state: &InputState) -> Option<Box<dyn DragTracker>> {
        if !self.should_handle_mouse_drag(state) {
            log::trace!("group {} declined drag", self.tool.id());
            return None;
        }
        self.chain.start_mouse_drag(state)
    }

    fn any_tool_dragging(&self, state: &InputState) -> bool {
        state.any_tool_dragging() || self.chain.any_tool_dragging(state)
    }

    fn accept_drop(&mut self, state: &InputState, payload: &str) -> Option<Box<dyn DropTracker>> {
        if !self.should_handle_drop(state, payload) {
            log::trace!("group {} declined drop {payload:?}", self.tool.id());
            return None;
        }
        self.chain.drag_enter(state, payload)
    }

    fn set_render_options(&self, state: &InputState, ctx: &mut RenderContext) {
        self.chain.set_render_options(state, ctx);
    }

    fn render(&self, state: &InputState, ctx: &RenderContext, batch: &mut RenderBatch) {
        self.chain.render(state, ctx, batch);
    }

    fn cancel(&mut self) -> bool {
        self.chain.cancel()
    }
}
