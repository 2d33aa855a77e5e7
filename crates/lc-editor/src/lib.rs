pub mod clipboard;
pub mod config;
pub mod editor;
pub mod history;
pub mod input;
pub mod resize;
pub mod selection;
pub mod shortcuts;

pub use clipboard::Clipboard;
pub use config::EditorConfig;
pub use editor::{Editor, KeyOutcome};
pub use history::{History, HistoryEntry, Scope};
pub use input::{FocusTarget, KeyEvent, Modifiers, PointerEvent};
pub use resize::{Handle, ResizeLimits, ResizeSession, ResizeTarget};
pub use selection::{Marquee, Selection, SelectionEvent, elements_in_rect};
pub use shortcuts::{Direction, ShortcutAction, ShortcutMap};
