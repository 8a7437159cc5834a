//! Per-event input snapshot.
//!
//! An `InputState` is built by the connector for every host event and handed
//! to controllers and trackers as `&InputState`. It carries the pointer
//! position and motion, held modifier keys and mouse buttons, the pick ray
//! for the pointer position, and the pick result computed once for the event.

use crate::pick::PickResult;
use glam::Vec3;
use std::ops::BitOr;

// ─── Modifier keys ───────────────────────────────────────────────────────

/// Set of held modifier keys.
///
/// `ctrl_cmd` is Ctrl on Windows/Linux and ⌘ on macOS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierKeys {
    pub shift: bool,
    pub ctrl_cmd: bool,
    pub alt: bool,
}

impl ModifierKeys {
    pub const NONE: Self = Self {
        shift: false,
        ctrl_cmd: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    pub const CTRL_CMD: Self = Self {
        ctrl_cmd: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// True if every key held in `other` is also held in `self`.
    pub fn contains(self, other: Self) -> bool {
        (!other.shift || self.shift) && (!other.ctrl_cmd || self.ctrl_cmd) && (!other.alt || self.alt)
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl BitOr for ModifierKeys {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            shift: self.shift || rhs.shift,
            ctrl_cmd: self.ctrl_cmd || rhs.ctrl_cmd,
            alt: self.alt || rhs.alt,
        }
    }
}

/// Tri-state expectation for a single modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCheck {
    /// The key must be held.
    Yes,
    /// The key must not be held.
    No,
    /// Either is fine.
    DontCare,
}

impl KeyCheck {
    fn accepts(self, held: bool) -> bool {
        match self {
            KeyCheck::Yes => held,
            KeyCheck::No => !held,
            KeyCheck::DontCare => true,
        }
    }
}

// ─── Mouse buttons ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Set of held mouse buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl MouseButtons {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        middle: false,
    };
    pub const LEFT: Self = Self {
        left: true,
        ..Self::NONE
    };
    pub const RIGHT: Self = Self {
        right: true,
        ..Self::NONE
    };
    pub const MIDDLE: Self = Self {
        middle: true,
        ..Self::NONE
    };

    /// Copy of this set with `button` held.
    pub fn with(self, button: MouseButton) -> Self {
        self | Self::from(button)
    }

    /// Copy of this set with `button` released.
    pub fn without(self, button: MouseButton) -> Self {
        let mut out = self;
        match button {
            MouseButton::Left => out.left = false,
            MouseButton::Right => out.right = false,
            MouseButton::Middle => out.middle = false,
        }
        out
    }

    pub fn contains(self, other: Self) -> bool {
        (!other.left || self.left) && (!other.right || self.right) && (!other.middle || self.middle)
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
        }
    }
}

impl BitOr for MouseButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            left: self.left || rhs.left,
            right: self.right || rhs.right,
            middle: self.middle || rhs.middle,
        }
    }
}

// ─── Pick ray ────────────────────────────────────────────────────────────

/// World-space ray through the pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    /// Normalized direction.
    pub direction: Vec3,
}

impl PickRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at `distance` along the ray.
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

impl Default for PickRay {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}

// ─── Input state ─────────────────────────────────────────────────────────

/// Snapshot of the input for one host event.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Pointer position in view coordinates.
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Pointer motion since the previous event.
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    /// Scroll deltas; zero unless this is a scroll event.
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub modifiers: ModifierKeys,
    pub buttons: MouseButtons,
    pub pick_ray: PickRay,
    pub pick_result: PickResult,
    /// Whether a drag tracker was open when this event was delivered.
    pub any_tool_dragging: bool,
}

impl InputState {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            mouse_x: x,
            mouse_y: y,
            ..Self::default()
        }
    }

    pub fn mouse_pos(&self) -> (f32, f32) {
        (self.mouse_x, self.mouse_y)
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        (self.mouse_dx, self.mouse_dy)
    }

    /// All of `keys` are held; other keys may be held too.
    pub fn modifier_keys_down(&self, keys: ModifierKeys) -> bool {
        self.modifiers.contains(keys)
    }

    /// Exactly `keys` are held.
    pub fn modifier_keys_pressed(&self, keys: ModifierKeys) -> bool {
        self.modifiers == keys
    }

    pub fn check_modifier_keys(&self, shift: KeyCheck, ctrl_cmd: KeyCheck, alt: KeyCheck) -> bool {
        shift.accepts(self.modifiers.shift)
            && ctrl_cmd.accepts(self.modifiers.ctrl_cmd)
            && alt.accepts(self.modifiers.alt)
    }

    /// All of `buttons` are held; other buttons may be held too.
    pub fn mouse_buttons_down(&self, buttons: MouseButtons) -> bool {
        self.buttons.contains(buttons)
    }

    /// Exactly `buttons` are held.
    pub fn mouse_buttons_pressed(&self, buttons: MouseButtons) -> bool {
        self.buttons == buttons
    }

    pub fn pick_ray(&self) -> &PickRay {
        &self.pick_ray
    }

    pub fn pick_result(&self) -> &PickResult {
        &self.pick_result
    }

    pub fn any_tool_dragging(&self) -> bool {
        self.any_tool_dragging
    }
}
