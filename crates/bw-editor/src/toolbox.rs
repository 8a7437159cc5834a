//! The tool box: top-level dispatcher.
//!
//! The tool box owns the single open-tracker slot. While a drag or drop
//! tracker is open, move/up events go to it instead of the chain, and no
//! accept call is evaluated anywhere. It also owns tool activation
//! bookkeeping: modal tools, suppression rules, and the notifications the
//! host drains after each dispatch.
//!
//! Chains are passed in per call, so one tool box can serve several views
//! while still guaranteeing that at most one gesture is open across them.

use crate::chain::ToolChain;
use crate::tool::Tool;
use crate::tracker::{DragStatus, DragTracker, DropTracker};
use bw_core::{InputState, RenderBatch, RenderContext, ToolId};
use smallvec::SmallVec;

/// Notification for the host; drained with [`ToolBox::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEvent {
    Activated(ToolId),
    Deactivated(ToolId),
    /// The tool asked for its views to be redrawn.
    RefreshViews(ToolId),
}

/// The gesture currently owning move/up events.
enum OpenTracker {
    Drag(Box<dyn DragTracker>),
    Drop(Box<dyn DropTracker>),
}

struct RegisteredTool {
    tool: Tool,
    modal: bool,
}

pub struct ToolBox {
    open: Option<OpenTracker>,
    tools: Vec<RegisteredTool>,
    /// Primary tool → tools deactivated while it is active.
    suppressions: Vec<(Tool, SmallVec<[Tool; 2]>)>,
    enabled: bool,
    events: Vec<ToolEvent>,
}

impl Default for ToolBox {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolBox {
    pub fn new() -> Self {
        Self {
            open: None,
            tools: Vec::new(),
            suppressions: Vec::new(),
            enabled: true,
            events: Vec::new(),
        }
    }

    // ─── Tracker slot ────────────────────────────────────────────────────

    pub fn dragging(&self) -> bool {
        matches!(self.open, Some(OpenTracker::Drag(_)))
    }

    pub fn dropping(&self) -> bool {
        matches!(self.open, Some(OpenTracker::Drop(_)))
    }

    pub fn has_open_tracker(&self) -> bool {
        self.open.is_some()
    }

    fn cancel_open_tracker(&mut self) -> bool {
        match self.open.take() {
            Some(OpenTracker::Drag(mut tracker)) => {
                log::debug!("drag cancelled");
                tracker.cancel();
                true
            }
            Some(OpenTracker::Drop(mut tracker)) => {
                log::debug!("drop cancelled");
                tracker.cancel();
                true
            }
            None => false,
        }
    }

    // ─── Simple events ───────────────────────────────────────────────────

    pub fn mouse_down(&mut self, chain: &mut ToolChain, state: &InputState) {
        if self.enabled {
            chain.mouse_down(state);
        }
    }

    pub fn mouse_up(&mut self, chain: &mut ToolChain, state: &InputState) {
        if self.enabled {
            chain.mouse_up(state);
        }
    }

    pub fn mouse_click(&mut self, chain: &mut ToolChain, state: &InputState) -> bool {
        self.enabled && chain.mouse_click(state)
    }

    pub fn mouse_double_click(&mut self, chain: &mut ToolChain, state: &InputState) -> bool {
        self.enabled && chain.mouse_double_click(state)
    }

    /// Pointer motion outside of a drag. Ignored while a drag tracker owns
    /// the gesture; use [`mouse_drag`](Self::mouse_drag) then.
    pub fn mouse_move(&mut self, chain: &mut ToolChain, state: &InputState) {
        if !self.enabled {
            return;
        }
        if self.dragging() {
            log::trace!("mouse move while dragging; not offered to the chain");
            return;
        }
        chain.mouse_move(state);
    }

    pub fn mouse_scroll(&mut self, chain: &mut ToolChain, state: &InputState) {
        if !self.enabled {
            return;
        }
        match &mut self.open {
            Some(OpenTracker::Drag(tracker)) => tracker.mouse_scroll(state),
            _ => chain.mouse_scroll(state),
        }
    }

    pub fn modifier_key_change(&mut self, chain: &mut ToolChain, state: &InputState) {
        if !self.enabled {
            return;
        }
        chain.modifier_key_change(state);
        if let Some(OpenTracker::Drag(tracker)) = &mut self.open {
            tracker.modifier_key_change(state);
        }
    }

    // ─── Drag gestures ───────────────────────────────────────────────────

    /// Offer a drag-start to the chain. Returns whether a tracker claimed it.
    ///
    /// # Panics
    /// If a tracker is already open. Callers must end or cancel the open
    /// gesture first.
    pub fn start_mouse_drag(&mut self, chain: &mut ToolChain, state: &InputState) -> bool {
        if !self.enabled {
            return false;
        }
        assert!(
            self.open.is_none(),
            "drag-start offered while another gesture is open"
        );
        self.open = chain.start_mouse_drag(state).map(OpenTracker::Drag);
        if self.open.is_none() {
            log::trace!("drag-start not claimed");
        }
        self.open.is_some()
    }

    /// Forward pointer motion to the open drag tracker. Returns whether a
    /// drag tracker received it.
    pub fn mouse_drag(&mut self, state: &InputState) -> bool {
        let Some(OpenTracker::Drag(tracker)) = &mut self.open else {
            return false;
        };
        if tracker.update(state) == DragStatus::Finish {
            self.finish_mouse_drag(state);
        }
        true
    }

    /// Forward a button release to the open drag tracker, which finishes
    /// unless it asks to continue. Returns whether a drag tracker received it.
    pub fn end_mouse_drag(&mut self, state: &InputState) -> bool {
        let Some(OpenTracker::Drag(tracker)) = &mut self.open else {
            return false;
        };
        if tracker.mouse_up(state) == DragStatus::Finish {
            self.finish_mouse_drag(state);
        }
        true
    }

    fn finish_mouse_drag(&mut self, state: &InputState) {
        if let Some(OpenTracker::Drag(mut tracker)) = self.open.take() {
            log::debug!("drag finished");
            tracker.finish(state);
        }
    }

    /// Cancel the open drag tracker, if any.
    pub fn cancel_mouse_drag(&mut self) -> bool {
        if self.dragging() {
            self.cancel_open_tracker()
        } else {
            false
        }
    }

    // ─── Drop gestures ───────────────────────────────────────────────────

    /// An external payload entered the view. Any open gesture is closed
    /// first (some platforms deliver repeated enters). Returns whether a
    /// drop tracker claimed the payload.
    pub fn drag_enter(&mut self, chain: &mut ToolChain, state: &InputState, payload: &str) -> bool {
        if !self.enabled {
            return false;
        }
        if self.cancel_open_tracker() {
            log::debug!("drop {payload:?} entered while a gesture was open; closed it");
        }
        self.open = chain.drag_enter(state, payload).map(OpenTracker::Drop);
        self.open.is_some()
    }

    /// Returns whether a drop tracker is still open afterwards.
    pub fn drag_move(&mut self, state: &InputState) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(OpenTracker::Drop(tracker)) = &mut self.open else {
            log::trace!("drag move without an open drop tracker");
            return false;
        };
        if tracker.update(state) == DragStatus::Finish {
            log::debug!("drop tracker gave up its payload");
            self.cancel_open_tracker();
            return false;
        }
        true
    }

    pub fn drag_leave(&mut self) {
        if self.dropping() {
            self.cancel_open_tracker();
        }
    }

    /// The payload was dropped. Returns whether it was consumed.
    pub fn drag_drop(&mut self, state: &InputState) -> bool {
        if !self.enabled || !self.dropping() {
            return false;
        }
        match self.open.take() {
            Some(OpenTracker::Drop(mut tracker)) => {
                let consumed = tracker.finish(state);
                log::debug!("drop finished (consumed: {consumed})");
                consumed
            }
            other => {
                self.open = other;
                false
            }
        }
    }

    // ─── Cancellation ────────────────────────────────────────────────────

    /// User cancel: closes the open gesture if there is one, otherwise asks
    /// the chain. Returns whether anything was cancelled.
    pub fn cancel(&mut self, chain: &mut ToolChain) -> bool {
        if !self.enabled {
            return false;
        }
        self.cancel_open_tracker() || chain.cancel()
    }

    /// Forced teardown (document reload, tool switch): closes the open
    /// gesture and routes `cancel()` through every live controller.
    pub fn teardown(&mut self, chain: &mut ToolChain) {
        let had_tracker = self.cancel_open_tracker();
        let had_gesture = chain.cancel();
        log::debug!("teardown (tracker: {had_tracker}, controller state: {had_gesture})");
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn set_render_options(&self, chain: &ToolChain, state: &InputState, ctx: &mut RenderContext) {
        chain.set_render_options(state, ctx);
        if let Some(OpenTracker::Drag(tracker)) = &self.open {
            tracker.set_render_options(state, ctx);
        }
    }

    pub fn render_tools(
        &self,
        chain: &ToolChain,
        state: &InputState,
        ctx: &RenderContext,
        batch: &mut RenderBatch,
    ) {
        chain.render(state, ctx, batch);
        if let Some(OpenTracker::Drag(tracker)) = &self.open {
            tracker.render(state, ctx, batch);
        }
    }

    // ─── Enable / disable ────────────────────────────────────────────────

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable dispatch; an open gesture is cancelled.
    pub fn disable(&mut self) {
        self.cancel_open_tracker();
        self.enabled = false;
    }

    // ─── Tool activation ─────────────────────────────────────────────────

    /// Track an always-on tool (for refresh notifications).
    pub fn add_tool(&mut self, tool: &Tool) {
        self.register(tool, false);
    }

    /// Track a modal tool: one the user toggles on and off from the palette.
    pub fn add_modal_tool(&mut self, tool: &Tool) {
        self.register(tool, true);
    }

    fn register(&mut self, tool: &Tool, modal: bool) {
        match self.tools.iter_mut().find(|r| r.tool == *tool) {
            Some(existing) => existing.modal |= modal,
            None => self.tools.push(RegisteredTool {
                tool: tool.clone(),
                modal,
            }),
        }
    }

    /// While `primary` is active, `suppressed` is kept inactive.
    pub fn suppress_while_active(&mut self, suppressed: &Tool, primary: &Tool) {
        match self.suppressions.iter_mut().find(|(p, _)| p == primary) {
            Some((_, list)) => {
                if !list.contains(suppressed) {
                    list.push(suppressed.clone());
                }
            }
            None => {
                let mut list = SmallVec::new();
                list.push(suppressed.clone());
                self.suppressions.push((primary.clone(), list));
            }
        }
    }

    fn suppressed_by(&self, primary: &Tool) -> SmallVec<[Tool; 2]> {
        self.suppressions
            .iter()
            .find(|(p, _)| p == primary)
            .map(|(_, list)| list.clone())
            .unwrap_or_default()
    }

    pub fn any_tool_active(&self) -> bool {
        self.tools.iter().any(|r| r.modal && r.tool.active())
    }

    /// Activate `tool`, tearing down any open gesture first. Returns whether
    /// the tool is active afterwards.
    pub fn activate_tool(&mut self, chain: &mut ToolChain, tool: &Tool) -> bool {
        if tool.active() {
            return true;
        }
        self.teardown(chain);
        if !tool.activate() {
            log::debug!("tool {} refused activation", tool.id());
            return false;
        }
        log::debug!("tool {} activated", tool.id());
        self.events.push(ToolEvent::Activated(tool.id()));
        for suppressed in self.suppressed_by(tool) {
            if suppressed.active() && suppressed.deactivate() {
                log::debug!("tool {} suppressed by {}", suppressed.id(), tool.id());
                self.events.push(ToolEvent::Deactivated(suppressed.id()));
            }
        }
        true
    }

    /// Deactivate `tool`, tearing down any open gesture first. Returns
    /// whether the tool is inactive afterwards.
    pub fn deactivate_tool(&mut self, chain: &mut ToolChain, tool: &Tool) -> bool {
        if !tool.active() {
            return true;
        }
        self.teardown(chain);
        if !tool.deactivate() {
            log::debug!("tool {} refused deactivation", tool.id());
            return false;
        }
        log::debug!("tool {} deactivated", tool.id());
        self.events.push(ToolEvent::Deactivated(tool.id()));
        for suppressed in self.suppressed_by(tool) {
            if !suppressed.active() && suppressed.activate() {
                log::debug!("tool {} restored after {}", suppressed.id(), tool.id());
                self.events.push(ToolEvent::Activated(suppressed.id()));
            }
        }
        true
    }

    /// Flip `tool`. Returns whether the requested transition happened.
    pub fn toggle_tool(&mut self, chain: &mut ToolChain, tool: &Tool) -> bool {
        if tool.active() {
            self.deactivate_tool(chain, tool)
        } else {
            self.activate_tool(chain, tool)
        }
    }

    pub fn deactivate_all_tools(&mut self, chain: &mut ToolChain) {
        let active: Vec<Tool> = self
            .tools
            .iter()
            .filter(|r| r.modal && r.tool.active())
            .map(|r| r.tool.clone())
            .collect();
        for tool in &active {
            self.deactivate_tool(chain, tool);
        }
    }

    /// Drain pending notifications, including refresh requests made by
    /// tracked tools since the last call.
    pub fn take_events(&mut self) -> Vec<ToolEvent> {
        for registered in &self.tools {
            if registered.tool.take_refresh_request() {
                self.events.push(ToolEvent::RefreshViews(registered.tool.id()));
            }
        }
        std::mem::take(&mut self.events)
    }
}
