//! Host event abstraction.
//!
//! Normalizes the window toolkit's pointer, keyboard and drag-and-drop
//! callbacks into a `HostEvent` enum consumed by the connector. Positions are
//! view coordinates in pixels; timestamps are milliseconds on any monotonic
//! clock.

use bw_core::{ModifierKeys, MouseButton};

/// A normalized event from the host window.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: MouseButton,
        time_ms: u64,
    },

    PointerMove { x: f32, y: f32 },

    PointerUp {
        x: f32,
        y: f32,
        button: MouseButton,
        time_ms: u64,
    },

    /// Wheel or trackpad scroll.
    Scroll { dx: f32, dy: f32 },

    /// The set of held modifier keys changed.
    ModifiersChanged(ModifierKeys),

    /// An external drag carrying `payload` entered the view.
    DragEnter { x: f32, y: f32, payload: String },

    DragMove { x: f32, y: f32 },

    DragLeave,

    Drop { x: f32, y: f32 },

    /// User cancel (usually the Escape key).
    Cancel,

    /// The view lost pointer capture, e.g. a modal dialog opened mid-drag.
    CaptureLost,
}

impl HostEvent {
    /// Extract position if this event carries one.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y, .. }
            | Self::DragEnter { x, y, .. }
            | Self::DragMove { x, y }
            | Self::Drop { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}
