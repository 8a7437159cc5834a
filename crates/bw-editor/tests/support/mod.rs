//! Shared fixtures for the bw-editor integration tests: a recording
//! controller, recording trackers, and a flat fake scene.

#![allow(dead_code)]

use bw_core::{
    DispatchConfig, Hit, HitTarget, HitType, InputState, PickRay, PickResult, RenderBatch,
    RenderCommand, RenderContext, ScenePicker, ToolId, Vec3,
};
use bw_editor::{DragStatus, DragTracker, DropTracker, Tool, ToolBoxConnector, ToolChain, ToolController};
use std::cell::RefCell;
use std::rc::Rc;

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn drain(log: &Log) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}

// ─── Trackers ────────────────────────────────────────────────────────────

pub struct RecordingDrag {
    name: String,
    log: Log,
}

impl DragTracker for RecordingDrag {
    fn update(&mut self, state: &InputState) -> DragStatus {
        self.log
            .borrow_mut()
            .push(format!("{}:update {:?}", self.name, state.mouse_pos()));
        DragStatus::Continue
    }

    fn mouse_up(&mut self, _state: &InputState) -> DragStatus {
        self.log.borrow_mut().push(format!("{}:tracker_up", self.name));
        DragStatus::Finish
    }

    fn finish(&mut self, _state: &InputState) {
        self.log.borrow_mut().push(format!("{}:finish", self.name));
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().push(format!("{}:tracker_cancel", self.name));
    }

    fn render(&self, _state: &InputState, _ctx: &RenderContext, batch: &mut RenderBatch) {
        batch.add(
            ToolId::intern(&self.name),
            RenderCommand::Points {
                positions: vec![Vec3::ZERO],
                color: [1.0, 1.0, 0.0, 1.0],
            },
        );
    }
}

pub struct RecordingDrop {
    name: String,
    log: Log,
    /// Give the payload up on the first update.
    gives_up: bool,
}

impl DropTracker for RecordingDrop {
    fn update(&mut self, state: &InputState) -> DragStatus {
        self.log
            .borrow_mut()
            .push(format!("{}:drop_update {:?}", self.name, state.mouse_pos()));
        if self.gives_up {
            DragStatus::Finish
        } else {
            DragStatus::Continue
        }
    }

    fn finish(&mut self, _state: &InputState) -> bool {
        self.log.borrow_mut().push(format!("{}:drop_finish", self.name));
        true
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().push(format!("{}:drop_cancel", self.name));
    }
}

// ─── Controller ──────────────────────────────────────────────────────────

/// A controller that logs every call as `name:operation`.
pub struct Recorder {
    pub tool: Tool,
    name: String,
    log: Log,
    pub consumes_click: bool,
    pub claims_drag: bool,
    /// Payload this controller accepts drops for.
    pub accepts_payload: Option<&'static str>,
    pub drop_gives_up: bool,
    pub picks_when_inactive: bool,
    /// Hit contributed during the pick phase.
    pub pick_hit: Option<(HitType, f32)>,
}

impl Recorder {
    pub fn new(name: &str, active: bool, log: &Log) -> Self {
        Self::with_tool(name, Tool::new(ToolId::intern(name), active), log)
    }

    pub fn with_tool(name: &str, tool: Tool, log: &Log) -> Self {
        Self {
            tool,
            name: name.to_string(),
            log: log.clone(),
            consumes_click: false,
            claims_drag: false,
            accepts_payload: None,
            drop_gives_up: false,
            picks_when_inactive: false,
            pick_hit: None,
        }
    }

    pub fn claiming_drag(mut self) -> Self {
        self.claims_drag = true;
        self
    }

    pub fn consuming_click(mut self) -> Self {
        self.consumes_click = true;
        self
    }

    pub fn accepting(mut self, payload: &'static str) -> Self {
        self.accepts_payload = Some(payload);
        self
    }

    fn record(&self, what: impl AsRef<str>) {
        self.log
            .borrow_mut()
            .push(format!("{}:{}", self.name, what.as_ref()));
    }
}

impl ToolController for Recorder {
    fn tool(&self) -> &Tool {
        &self.tool
    }

    fn picks_when_inactive(&self) -> bool {
        self.picks_when_inactive
    }

    fn pick(&self, _state: &InputState, pick_result: &mut PickResult) {
        self.record("pick");
        if let Some((hit_type, distance)) = self.pick_hit {
            pick_result.add_hit(Hit::new(
                hit_type,
                distance,
                Vec3::new(0.0, 0.0, distance),
                HitTarget(0),
            ));
        }
    }

    fn modifier_key_change(&mut self, _state: &InputState) {
        self.record("modifiers");
    }

    fn mouse_down(&mut self, _state: &InputState) {
        self.record("down");
    }

    fn mouse_up(&mut self, _state: &InputState) {
        self.record("up");
    }

    fn mouse_click(&mut self, _state: &InputState) -> bool {
        self.record("click");
        self.consumes_click
    }

    fn mouse_double_click(&mut self, _state: &InputState) -> bool {
        self.record("double_click");
        self.consumes_click
    }

    fn mouse_move(&mut self, _state: &InputState) {
        self.record("move");
    }

    fn mouse_scroll(&mut self, state: &InputState) {
        self.record(format!("scroll {}", state.scroll_y));
    }

    fn accept_mouse_drag(&mut self, state: &InputState) -> Option<Box<dyn DragTracker>> {
        self.record(format!("accept_drag {:?}", state.mouse_pos()));
        self.claims_drag.then(|| {
            Box::new(RecordingDrag {
                name: self.name.clone(),
                log: self.log.clone(),
            }) as Box<dyn DragTracker>
        })
    }

    fn accept_drop(&mut self, _state: &InputState, payload: &str) -> Option<Box<dyn DropTracker>> {
        self.record(format!("accept_drop {payload}"));
        if self.accepts_payload != Some(payload) {
            return None;
        }
        Some(Box::new(RecordingDrop {
            name: self.name.clone(),
            log: self.log.clone(),
            gives_up: self.drop_gives_up,
        }))
    }

    fn set_render_options(&self, _state: &InputState, _ctx: &mut RenderContext) {
        self.record("render_options");
    }

    fn render(&self, _state: &InputState, _ctx: &RenderContext, batch: &mut RenderBatch) {
        self.record("render");
        batch.add(
            self.tool.id(),
            RenderCommand::Lines {
                vertices: vec![Vec3::ZERO, Vec3::X],
                color: [1.0, 0.0, 0.0, 1.0],
            },
        );
    }

    fn cancel(&mut self) -> bool {
        self.record("cancel");
        false
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// A scene whose geometry is a fixed set of hits, independent of the ray.
#[derive(Default)]
pub struct FakeScene {
    pub hits: Vec<Hit>,
}

impl ScenePicker for FakeScene {
    fn pick_ray(&self, x: f32, y: f32) -> PickRay {
        PickRay::new(Vec3::new(x, y, 1000.0), Vec3::NEG_Z)
    }

    fn pick(&self, _ray: &PickRay) -> PickResult {
        let mut result = PickResult::new();
        for hit in &self.hits {
            result.add_hit(hit.clone());
        }
        result
    }
}

pub fn connect(chain: ToolChain) -> ToolBoxConnector<FakeScene> {
    ToolBoxConnector::new(chain, FakeScene::default(), DispatchConfig::default())
}
