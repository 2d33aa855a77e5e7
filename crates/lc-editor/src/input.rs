//! Input abstraction layer.
//!
//! Normalizes host keyboard and pointer events into plain structs so the
//! editor never touches DOM types directly.

use lc_core::Point;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// ⌘ on macOS, the Windows key elsewhere.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Platform command key: Ctrl, or ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// What kind of element had keyboard focus when the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Canvas,
    /// `<input>`.
    TextInput,
    /// `<textarea>`.
    TextArea,
    /// A `contenteditable` region (inline text editing).
    ContentEditable,
    Other,
}

impl FocusTarget {
    /// Map a DOM `tagName` (any case) plus the `isContentEditable` flag.
    pub fn from_dom(tag_name: &str, content_editable: bool) -> Self {
        if content_editable {
            return FocusTarget::ContentEditable;
        }
        match tag_name.to_ascii_lowercase().as_str() {
            "input" => FocusTarget::TextInput,
            "textarea" => FocusTarget::TextArea,
            "canvas" | "body" | "div" | "" => FocusTarget::Canvas,
            _ => FocusTarget::Other,
        }
    }

    /// Typing targets swallow every editor shortcut.
    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            FocusTarget::TextInput | FocusTarget::TextArea | FocusTarget::ContentEditable
        )
    }
}

/// A keyboard event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// `KeyboardEvent.key` value, e.g. `"z"`, `"ArrowLeft"`, `"Delete"`.
    pub key: String,
    pub modifiers: Modifiers,
    pub target: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            target: FocusTarget::Canvas,
        }
    }

    pub fn on(mut self, target: FocusTarget) -> Self {
        self.target = target;
        self
    }
}

/// A normalized pointer event in slide coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { at: Point, modifiers: Modifiers },
    Move { at: Point, modifiers: Modifiers },
    Up { at: Point, modifiers: Modifiers },
    /// Pointer left the canvas mid-gesture.
    Leave,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Down { at, .. } | Self::Move { at, .. } | Self::Up { at, .. } => Some(*at),
            Self::Leave => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Down { modifiers, .. }
            | Self::Move { modifiers, .. }
            | Self::Up { modifiers, .. } => *modifiers,
            Self::Leave => Modifiers::NONE,
        }
    }
}
