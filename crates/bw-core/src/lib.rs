pub mod config;
pub mod id;
pub mod input;
pub mod pick;
pub mod render;

pub use config::{ConfigError, DispatchConfig};
pub use id::ToolId;
pub use input::{InputState, KeyCheck, ModifierKeys, MouseButton, MouseButtons, PickRay};
pub use pick::{Hit, HitTarget, HitType, PickResult, ScenePicker};
pub use render::{Cursor, RenderBatch, RenderCommand, RenderContext};

// Re-export glam so downstream crates don't need a direct dependency
pub use glam::Vec3;
