//! Connector: host events → tool box dispatch.
//!
//! The connector sits between the host window and the tool box. For every
//! host event it builds a fresh [`InputState`], computes the pick result once
//! (scene geometry first, then the chain's pick phase), and turns raw presses,
//! moves and releases into clicks, double clicks and drag gestures using the
//! thresholds from [`DispatchConfig`].
//!
//! ## Gesture detection
//!
//! | Host sequence | Dispatch |
//! |---------------|----------|
//! | down, up | `mouse_down`, `mouse_up`, `mouse_click` |
//! | down, up, down, up (within interval) | … second up: `mouse_up`, `mouse_double_click` |
//! | down, move past threshold | `mouse_down`, `start_mouse_drag` at the press position |
//! | … while a drag tracker is open | moves, and the release of the starting button, go only to the tracker |
//! | … while any tracker is open | further presses (and their releases) are ignored |

use crate::chain::ToolChain;
use crate::input::HostEvent;
use crate::tool::Tool;
use crate::toolbox::{ToolBox, ToolEvent};
use bw_core::{
    DispatchConfig, InputState, ModifierKeys, MouseButton, MouseButtons, RenderBatch, RenderContext,
    ScenePicker,
};

#[derive(Debug, Clone, Copy)]
struct Press {
    x: f32,
    y: f32,
    button: MouseButton,
    /// Set once the press has been offered as a drag-start (or cancelled);
    /// the release then no longer counts as a click.
    drag_offered: bool,
}

impl Press {
    fn exceeds(&self, x: f32, y: f32, threshold: f32) -> bool {
        (x - self.x).abs().max((y - self.y).abs()) > threshold
    }
}

#[derive(Debug, Clone, Copy)]
struct Click {
    x: f32,
    y: f32,
    button: MouseButton,
    time_ms: u64,
}

/// Owns the tool box and the top-level chain of one view.
pub struct ToolBoxConnector<P: ScenePicker> {
    toolbox: ToolBox,
    chain: ToolChain,
    picker: P,
    config: DispatchConfig,
    modifiers: ModifierKeys,
    buttons: MouseButtons,
    /// The state built for the most recent event.
    state: InputState,
    press: Option<Press>,
    last_click: Option<Click>,
    /// Button whose press started the open drag.
    drag_button: Option<MouseButton>,
    /// An external drag is over the view (between enter and leave/drop).
    drag_entered: bool,
}

impl<P: ScenePicker> ToolBoxConnector<P> {
    pub fn new(chain: ToolChain, picker: P, config: DispatchConfig) -> Self {
        Self {
            toolbox: ToolBox::new(),
            chain,
            picker,
            config,
            modifiers: ModifierKeys::NONE,
            buttons: MouseButtons::NONE,
            state: InputState::default(),
            press: None,
            last_click: None,
            drag_button: None,
            drag_entered: false,
        }
    }

    pub fn toolbox(&self) -> &ToolBox {
        &self.toolbox
    }

    pub fn toolbox_mut(&mut self) -> &mut ToolBox {
        &mut self.toolbox
    }

    pub fn chain(&self) -> &ToolChain {
        &self.chain
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DispatchConfig) {
        self.config = config;
    }

    /// The input state built for the most recent event.
    pub fn input_state(&self) -> &InputState {
        &self.state
    }

    // ─── Event entry point ───────────────────────────────────────────────

    /// Dispatch one host event. Returns whether a tool consumed it: a
    /// consumed click, a claimed or routed gesture, an accepted drop, or a
    /// cancel that cancelled something.
    pub fn handle(&mut self, event: HostEvent) -> bool {
        log::trace!("host event: {event:?}");
        match event {
            HostEvent::PointerDown { x, y, button, .. } => self.pointer_down(x, y, button),
            HostEvent::PointerMove { x, y } => self.pointer_move(x, y),
            HostEvent::PointerUp {
                x,
                y,
                button,
                time_ms,
            } => self.pointer_up(x, y, button, time_ms),
            HostEvent::Scroll { dx, dy } => self.scroll(dx, dy),
            HostEvent::ModifiersChanged(modifiers) => self.modifiers_changed(modifiers),
            HostEvent::DragEnter { x, y, payload } => {
                self.press = None;
                self.drag_entered = true;
                let state = self.build_state(x, y);
                let accepted = self.toolbox.drag_enter(&mut self.chain, &state, &payload);
                self.state = state;
                accepted
            }
            HostEvent::DragMove { x, y } => {
                if !self.drag_entered {
                    log::warn!("drag move at ({x}, {y}) without a preceding drag enter; ignored");
                    return false;
                }
                let state = self.build_state(x, y);
                let open = self.toolbox.drag_move(&state);
                self.state = state;
                open
            }
            HostEvent::DragLeave => {
                self.drag_entered = false;
                self.toolbox.drag_leave();
                false
            }
            HostEvent::Drop { x, y } => {
                if !std::mem::take(&mut self.drag_entered) {
                    log::warn!("drop at ({x}, {y}) without a preceding drag enter; ignored");
                    return false;
                }
                let state = self.build_state(x, y);
                let consumed = self.toolbox.drag_drop(&state);
                self.state = state;
                consumed
            }
            HostEvent::Cancel => {
                // A cancelled press must not turn into a click or a new drag.
                if let Some(press) = &mut self.press {
                    press.drag_offered = true;
                }
                self.toolbox.cancel(&mut self.chain)
            }
            HostEvent::CaptureLost => {
                self.press = None;
                self.buttons = MouseButtons::NONE;
                self.toolbox.cancel_mouse_drag()
            }
        }
    }

    /// Forced teardown, e.g. before the document is reloaded.
    pub fn teardown(&mut self) {
        self.press = None;
        self.last_click = None;
        self.toolbox.teardown(&mut self.chain);
    }

    /// Run the tool render pass with the most recent input state.
    pub fn render(&self, ctx: &mut RenderContext, batch: &mut RenderBatch) {
        self.toolbox.set_render_options(&self.chain, &self.state, ctx);
        self.toolbox.render_tools(&self.chain, &self.state, ctx, batch);
    }

    // ─── Tool activation ─────────────────────────────────────────────────

    pub fn activate_tool(&mut self, tool: &Tool) -> bool {
        self.toolbox.activate_tool(&mut self.chain, tool)
    }

    pub fn deactivate_tool(&mut self, tool: &Tool) -> bool {
        self.toolbox.deactivate_tool(&mut self.chain, tool)
    }

    pub fn toggle_tool(&mut self, tool: &Tool) -> bool {
        self.toolbox.toggle_tool(&mut self.chain, tool)
    }

    pub fn deactivate_all_tools(&mut self) {
        self.toolbox.deactivate_all_tools(&mut self.chain);
    }

    pub fn take_events(&mut self) -> Vec<ToolEvent> {
        self.toolbox.take_events()
    }

    // ─── Input state ─────────────────────────────────────────────────────

    fn build_state(&self, x: f32, y: f32) -> InputState {
        let mut state = InputState {
            mouse_x: x,
            mouse_y: y,
            mouse_dx: x - self.state.mouse_x,
            mouse_dy: y - self.state.mouse_y,
            modifiers: self.modifiers,
            buttons: self.buttons,
            pick_ray: self.picker.pick_ray(x, y),
            any_tool_dragging: self.toolbox.dragging(),
            ..InputState::default()
        };
        let mut pick_result = self.picker.pick(&state.pick_ray);
        self.chain.pick(&state, &mut pick_result);
        state.pick_result = pick_result;
        state
    }

    // ─── Pointer handling ────────────────────────────────────────────────

    fn pointer_down(&mut self, x: f32, y: f32, button: MouseButton) -> bool {
        self.buttons = self.buttons.with(button);
        if self.toolbox.has_open_tracker() {
            log::trace!("{button:?} pressed during an open gesture; ignored");
            return false;
        }
        let state = self.build_state(x, y);
        self.press = Some(Press {
            x,
            y,
            button,
            drag_offered: false,
        });
        self.toolbox.mouse_down(&mut self.chain, &state);
        self.state = state;
        false
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if self.toolbox.dragging() {
            let state = self.build_state(x, y);
            let routed = self.toolbox.mouse_drag(&state);
            self.state = state;
            return routed;
        }

        let threshold = self.config.drag_threshold;
        let idle = !self.toolbox.has_open_tracker();
        let drag_origin = self
            .press
            .as_mut()
            .filter(|p| idle && !p.drag_offered && p.exceeds(x, y, threshold))
            .map(|p| {
                p.drag_offered = true;
                (p.x, p.y, p.button)
            });

        if let Some((px, py, button)) = drag_origin {
            // Tools decide on the drag from where the press happened.
            let mut origin = self.build_state(px, py);
            origin.mouse_dx = 0.0;
            origin.mouse_dy = 0.0;
            if self.toolbox.start_mouse_drag(&mut self.chain, &origin) {
                self.drag_button = Some(button);
                self.state = origin;
                let state = self.build_state(x, y);
                self.toolbox.mouse_drag(&state);
                self.state = state;
                return true;
            }
        }

        let state = self.build_state(x, y);
        self.toolbox.mouse_move(&mut self.chain, &state);
        self.state = state;
        false
    }

    fn pointer_up(&mut self, x: f32, y: f32, button: MouseButton, time_ms: u64) -> bool {
        self.buttons = self.buttons.without(button);
        let press = match self.press {
            Some(p) if p.button == button => self.press.take(),
            _ => None,
        };

        if self.toolbox.dragging() {
            if self.drag_button != Some(button) {
                log::trace!("{button:?} released during a drag it did not start; ignored");
                return false;
            }
            let state = self.build_state(x, y);
            let routed = self.toolbox.end_mouse_drag(&state);
            self.last_click = None;
            self.state = state;
            return routed;
        }
        if self.toolbox.dropping() {
            log::trace!("{button:?} released during a drop; ignored");
            return false;
        }

        let state = self.build_state(x, y);
        self.toolbox.mouse_up(&mut self.chain, &state);
        let consumed = match press {
            Some(p) if !p.drag_offered => self.click(&state, button, time_ms),
            _ => false,
        };
        self.state = state;
        consumed
    }

    fn click(&mut self, state: &InputState, button: MouseButton, time_ms: u64) -> bool {
        let (x, y) = state.mouse_pos();
        let is_double = self.last_click.is_some_and(|c| {
            c.button == button
                && time_ms.saturating_sub(c.time_ms) <= self.config.double_click_interval_ms
                && (x - c.x).hypot(y - c.y) <= self.config.double_click_distance
        });
        if is_double {
            self.last_click = None;
            self.toolbox.mouse_double_click(&mut self.chain, state)
        } else {
            self.last_click = Some(Click {
                x,
                y,
                button,
                time_ms,
            });
            self.toolbox.mouse_click(&mut self.chain, state)
        }
    }

    fn scroll(&mut self, dx: f32, dy: f32) -> bool {
        let (x, y) = self.state.mouse_pos();
        let mut state = self.build_state(x, y);
        state.scroll_x = dx;
        state.scroll_y = dy;
        self.toolbox.mouse_scroll(&mut self.chain, &state);
        self.state = state;
        false
    }

    fn modifiers_changed(&mut self, modifiers: ModifierKeys) -> bool {
        if modifiers == self.modifiers {
            return false;
        }
        self.modifiers = modifiers;
        let (x, y) = self.state.mouse_pos();
        let state = self.build_state(x, y);
        self.toolbox.modifier_key_change(&mut self.chain, &state);
        self.state = state;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ToolController;
    use bw_core::{PickRay, PickResult, ToolId, Vec3};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct FlatPicker;

    impl ScenePicker for FlatPicker {
        fn pick_ray(&self, x: f32, y: f32) -> PickRay {
            PickRay::new(Vec3::new(x, y, 100.0), Vec3::NEG_Z)
        }

        fn pick(&self, _ray: &PickRay) -> PickResult {
            PickResult::new()
        }
    }

    struct Clicker {
        tool: Tool,
        log: Log,
    }

    impl ToolController for Clicker {
        fn tool(&self) -> &Tool {
            &self.tool
        }

        fn mouse_down(&mut self, _state: &InputState) {
            self.log.borrow_mut().push("down".into());
        }

        fn mouse_up(&mut self, _state: &InputState) {
            self.log.borrow_mut().push("up".into());
        }

        fn mouse_click(&mut self, state: &InputState) -> bool {
            self.log
                .borrow_mut()
                .push(format!("click {:?}", state.mouse_pos()));
            true
        }

        fn mouse_double_click(&mut self, _state: &InputState) -> bool {
            self.log.borrow_mut().push("double".into());
            true
        }

        fn mouse_move(&mut self, state: &InputState) {
            self.log
                .borrow_mut()
                .push(format!("move {:?}", state.mouse_delta()));
        }

        fn accept_mouse_drag(
            &mut self,
            state: &InputState,
        ) -> Option<Box<dyn crate::tracker::DragTracker>> {
            self.log
                .borrow_mut()
                .push(format!("drag? {:?}", state.mouse_pos()));
            None
        }

        fn modifier_key_change(&mut self, state: &InputState) {
            self.log
                .borrow_mut()
                .push(format!("modifiers shift={}", state.modifiers.shift));
        }
    }

    fn connector(log: &Log) -> ToolBoxConnector<FlatPicker> {
        let chain = ToolChain::new().with(Clicker {
            tool: Tool::new(ToolId::intern("connector_clicker"), true),
            log: log.clone(),
        });
        ToolBoxConnector::new(chain, FlatPicker, DispatchConfig::default())
    }

    fn down(x: f32, y: f32, time_ms: u64) -> HostEvent {
        HostEvent::PointerDown {
            x,
            y,
            button: MouseButton::Left,
            time_ms,
        }
    }

    fn up(x: f32, y: f32, time_ms: u64) -> HostEvent {
        HostEvent::PointerUp {
            x,
            y,
            button: MouseButton::Left,
            time_ms,
        }
    }

    fn drain(log: &Log) -> Vec<String> {
        log.borrow_mut().drain(..).collect()
    }

    #[test]
    fn press_release_is_a_click() {
        let log = Log::default();
        let mut conn = connector(&log);
        assert!(!conn.handle(down(10.0, 10.0, 0)));
        assert!(conn.handle(up(11.0, 10.0, 50)));
        assert_eq!(drain(&log), vec!["down", "up", "click (11.0, 10.0)"]);
    }

    #[test]
    fn movement_within_threshold_is_still_a_click() {
        let log = Log::default();
        let mut conn = connector(&log);
        conn.handle(down(10.0, 10.0, 0));
        conn.handle(HostEvent::PointerMove { x: 13.0, y: 7.0 });
        conn.handle(up(13.0, 7.0, 80));
        assert_eq!(
            drain(&log),
            vec!["down", "move (3.0, -3.0)", "up", "click (13.0, 7.0)"]
        );
    }

    #[test]
    fn second_click_in_time_is_a_double_click() {
        let log = Log::default();
        let mut conn = connector(&log);
        conn.handle(down(10.0, 10.0, 0));
        conn.handle(up(10.0, 10.0, 60));
        conn.handle(down(11.0, 10.0, 150));
        assert!(conn.handle(up(11.0, 11.0, 200)));
        assert_eq!(
            drain(&log),
            vec!["down", "up", "click (10.0, 10.0)", "down", "up", "double"]
        );
    }

    #[test]
    fn slow_second_click_is_a_plain_click() {
        let log = Log::default();
        let mut conn = connector(&log);
        conn.handle(down(10.0, 10.0, 0));
        conn.handle(up(10.0, 10.0, 60));
        conn.handle(down(10.0, 10.0, 1000));
        conn.handle(up(10.0, 10.0, 1060));
        assert_eq!(
            drain(&log),
            vec!["down", "up", "click (10.0, 10.0)", "down", "up", "click (10.0, 10.0)"]
        );
    }

    #[test]
    fn unclaimed_drag_is_offered_once_at_the_press_position() {
        let log = Log::default();
        let mut conn = connector(&log);
        conn.handle(down(10.0, 10.0, 0));
        assert!(!conn.handle(HostEvent::PointerMove { x: 20.0, y: 10.0 }));
        conn.handle(HostEvent::PointerMove { x: 30.0, y: 10.0 });
        assert!(!conn.handle(up(30.0, 10.0, 300)));
        assert_eq!(
            drain(&log),
            vec![
                "down",
                "drag? (10.0, 10.0)",
                "move (10.0, 0.0)",
                "move (10.0, 0.0)",
                "up"
            ]
        );
    }

    #[test]
    fn configured_threshold_is_honoured() {
        let log = Log::default();
        let mut conn = connector(&log);
        conn.set_config(DispatchConfig {
            drag_threshold: 20.0,
            ..DispatchConfig::default()
        });
        conn.handle(down(0.0, 0.0, 0));
        conn.handle(HostEvent::PointerMove { x: 15.0, y: 0.0 });
        conn.handle(up(15.0, 0.0, 100));
        assert_eq!(drain(&log), vec!["down", "move (15.0, 0.0)", "up", "click (15.0, 0.0)"]);
    }

    #[test]
    fn cancel_during_press_suppresses_the_click() {
        let log = Log::default();
        let mut conn = connector(&log);
        conn.handle(down(10.0, 10.0, 0));
        assert!(!conn.handle(HostEvent::Cancel));
        conn.handle(up(10.0, 10.0, 50));
        assert_eq!(drain(&log), vec!["down", "up"]);
    }

    #[test]
    fn repeated_modifier_state_is_not_redispatched() {
        let log = Log::default();
        let mut conn = connector(&log);
        conn.handle(HostEvent::ModifiersChanged(ModifierKeys::SHIFT));
        conn.handle(HostEvent::ModifiersChanged(ModifierKeys::SHIFT));
        conn.handle(HostEvent::ModifiersChanged(ModifierKeys::NONE));
        assert_eq!(drain(&log), vec!["modifiers shift=true", "modifiers shift=false"]);
        assert!(!conn.input_state().modifiers.shift);
    }

    #[test]
    fn host_event_positions() {
        assert_eq!(down(1.0, 2.0, 0).position(), Some((1.0, 2.0)));
        assert_eq!(HostEvent::Cancel.position(), None);
    }
}
