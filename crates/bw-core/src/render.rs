//! Render contributions from tools.
//!
//! Controllers adjust per-frame options on a [`RenderContext`] and append
//! primitives to a [`RenderBatch`]. The renderer composites the batch; this
//! crate only collects it, in chain order.

use crate::id::ToolId;
use glam::Vec3;

/// Pointer cursor requested for the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Arrow,
    Crosshair,
    Move,
    Resize,
    Rotate,
}

/// Per-frame render options.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub show_selection_guide: bool,
    pub hide_selection: bool,
    pub show_mouse_indicators: bool,
    pub cursor: Cursor,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            show_selection_guide: false,
            hide_selection: false,
            show_mouse_indicators: true,
            cursor: Cursor::Arrow,
        }
    }
}

/// A single tool-side drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Line segments; `vertices` holds pairs of endpoints.
    Lines { vertices: Vec<Vec3>, color: [f32; 4] },
    Points { positions: Vec<Vec3>, color: [f32; 4] },
    /// A spherical handle, e.g. a vertex or rotation-center affordance.
    Handle {
        position: Vec3,
        radius: f32,
        highlighted: bool,
    },
}

/// Ordered render contributions for one frame.
#[derive(Debug, Clone, Default)]
pub struct RenderBatch {
    commands: Vec<(ToolId, RenderCommand)>,
}

impl RenderBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tool: ToolId, command: RenderCommand) {
        self.commands.push((tool, command));
    }

    pub fn commands(&self) -> &[(ToolId, RenderCommand)] {
        &self.commands
    }

    /// Tools that contributed, in contribution order (with repeats).
    pub fn contributors(&self) -> impl Iterator<Item = ToolId> + '_ {
        self.commands.iter().map(|(tool, _)| *tool)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
