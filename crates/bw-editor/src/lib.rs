pub mod chain;
pub mod connector;
pub mod controller;
pub mod input;
pub mod tool;
pub mod toolbox;
pub mod tracker;

pub use chain::ToolChain;
pub use connector::ToolBoxConnector;
pub use controller::{ToolController, ToolControllerGroup};
pub use input::HostEvent;
pub use tool::{Tool, ToolHooks};
pub use toolbox::{ToolBox, ToolEvent};
pub use tracker::{DragStatus, DragTracker, DropTracker};
