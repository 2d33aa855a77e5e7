//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Platform
//! command key handling: on macOS `meta` is ⌘, elsewhere `ctrl` plays the
//! same role, and either is accepted on every platform.

use crate::input::Modifiers;
use serde::Serialize;

/// Arrow-key nudge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit offset in slide coordinates (y grows downwards).
    pub fn unit(self) -> (f32, f32) {
        match self {
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
        }
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "direction", rename_all = "camelCase")]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    SelectAll,
    Duplicate,
    Copy,
    Cut,
    Paste,
    Nudge(Direction),

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    // ── UI ──
    /// Cancel the active gesture, else clear the selection.
    Deselect,
}

impl ShortcutAction {
    /// Layer actions act on exactly one selected element.
    pub fn is_layer_op(self) -> bool {
        matches!(
            self,
            ShortcutAction::SendBackward
                | ShortcutAction::BringForward
                | ShortcutAction::SendToBack
                | ShortcutAction::BringToFront
        )
    }
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"ArrowLeft"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        // ── Modifier combos first (most specific) ──
        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                // Shift+[ reports "{" on US layouts.
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        if modifiers.any() {
            return None;
        }

        // ── Single keys (no modifiers) ──
        match key {
            "ArrowLeft" => Some(ShortcutAction::Nudge(Direction::Left)),
            "ArrowRight" => Some(ShortcutAction::Nudge(Direction::Right)),
            "ArrowUp" => Some(ShortcutAction::Nudge(Direction::Up)),
            "ArrowDown" => Some(ShortcutAction::Nudge(Direction::Down)),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };

    #[test]
    fn resolve_undo_redo() {
        assert_eq!(ShortcutMap::resolve("z", Modifiers::CTRL), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutMap::resolve("z", META), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutMap::resolve("Z", CTRL_SHIFT), Some(ShortcutAction::Redo));
        assert_eq!(ShortcutMap::resolve("y", Modifiers::CTRL), Some(ShortcutAction::Redo));
    }

    #[test]
    fn resolve_clipboard() {
        assert_eq!(ShortcutMap::resolve("c", Modifiers::CTRL), Some(ShortcutAction::Copy));
        assert_eq!(ShortcutMap::resolve("x", META), Some(ShortcutAction::Cut));
        assert_eq!(ShortcutMap::resolve("v", Modifiers::CTRL), Some(ShortcutAction::Paste));
        assert_eq!(ShortcutMap::resolve("d", Modifiers::CTRL), Some(ShortcutAction::Duplicate));
        assert_eq!(ShortcutMap::resolve("a", Modifiers::CTRL), Some(ShortcutAction::SelectAll));
    }

    #[test]
    fn resolve_z_order() {
        assert_eq!(
            ShortcutMap::resolve("]", Modifiers::CTRL),
            Some(ShortcutAction::BringForward)
        );
        assert_eq!(
            ShortcutMap::resolve("[", Modifiers::CTRL),
            Some(ShortcutAction::SendBackward)
        );
        assert_eq!(ShortcutMap::resolve("}", CTRL_SHIFT), Some(ShortcutAction::BringToFront));
        assert_eq!(ShortcutMap::resolve("[", CTRL_SHIFT), Some(ShortcutAction::SendToBack));
    }

    #[test]
    fn arrows_only_without_modifiers() {
        assert_eq!(
            ShortcutMap::resolve("ArrowRight", Modifiers::NONE),
            Some(ShortcutAction::Nudge(Direction::Right))
        );
        assert_eq!(ShortcutMap::resolve("ArrowRight", Modifiers::SHIFT), None);
        assert_eq!(ShortcutMap::resolve("ArrowRight", Modifiers::CTRL), None);
    }

    #[test]
    fn bare_keys() {
        assert_eq!(ShortcutMap::resolve("Delete", Modifiers::NONE), Some(ShortcutAction::Delete));
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(ShortcutMap::resolve("Escape", Modifiers::NONE), Some(ShortcutAction::Deselect));
        assert_eq!(ShortcutMap::resolve("q", Modifiers::NONE), None);
        assert_eq!(ShortcutMap::resolve("z", Modifiers::NONE), None);
    }

    #[test]
    fn action_serializes_for_the_host() {
        let json = serde_json::to_string(&ShortcutAction::Nudge(Direction::Left)).unwrap();
        assert_eq!(json, r#"{"action":"nudge","direction":"left"}"#);
        let json = serde_json::to_string(&ShortcutAction::Undo).unwrap();
        assert_eq!(json, r#"{"action":"undo"}"#);
    }
}
