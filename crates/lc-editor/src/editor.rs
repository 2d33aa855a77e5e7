//! The editing session.
//!
//! `Editor` owns the document together with the transient editor state
//! (selection, history, clipboard, active gesture) and routes keyboard and
//! pointer input to document mutations. Every mutation made through the
//! editor lands in history as exactly one entry per gesture.
//!
//! ## Pointer behaviour
//!
//! | Pointer-down on            | Drag                          | Shift            |
//! |----------------------------|-------------------------------|------------------|
//! | resize handle (1 selected) | resize                        | aspect lock      |
//! | element                    | move unlocked selection       | toggle / axis lock |
//! | empty canvas               | marquee                       | add to selection |

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::history::{History, Scope};
use crate::input::{KeyEvent, Modifiers, PointerEvent};
use crate::resize::{self, ResizeLimits, ResizeSession, ResizeTarget};
use crate::selection::{self, Selection};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use lc_core::{
    Document, Element, ElementId, ElementPatch, Point, Rect, SlideId, Template, TemplateError,
    ZOrder, bounding_box, resolve_template,
};
use serde::Serialize;
use serde_json::Value;

/// Result of routing one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOutcome {
    /// The bound action, if the key is a shortcut and was not suppressed.
    pub action: Option<ShortcutAction>,
    /// The host should call `preventDefault()`.
    pub handled: bool,
    /// The document or selection changed.
    pub changed: bool,
}

#[derive(Debug)]
enum Gesture {
    Idle,
    Move {
        slide: SlideId,
        origin: Point,
        start: Vec<(ElementId, Rect)>,
    },
    Resize {
        slide: SlideId,
        origin: Point,
        session: Box<ResizeSession>,
    },
    Marquee {
        additive: bool,
    },
}

#[derive(Debug)]
pub struct Editor {
    document: Document,
    selection: Selection,
    history: History,
    clipboard: Clipboard,
    config: EditorConfig,
    gesture: Gesture,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::default(), EditorConfig::default())
    }
}

impl Editor {
    pub fn new(document: Document, config: EditorConfig) -> Self {
        let mut selection = Selection::new();
        selection.select_slide(document.current_slide_id());
        Self {
            document,
            selection,
            history: History::new(config.history_depth),
            clipboard: Clipboard::new(),
            config,
            gesture: Gesture::Idle,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access. Changes made here bypass history.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Replace the document wholesale (load). History is reset; the
    /// clipboard survives.
    pub fn load(&mut self, document: Document) {
        self.cancel_gesture();
        self.document = document;
        self.history.clear();
        self.selection.clear();
        self.selection.select_slide(self.document.current_slide_id());
    }

    /// The slide element operations act on.
    fn working_slide(&self) -> Option<SlideId> {
        self.selection.slide().or(self.document.current_slide_id())
    }

    /// Bounding box of the selected elements, for the selection overlay.
    pub fn selection_bounds(&self) -> Option<Rect> {
        let slide = self.document.slide(self.working_slide()?)?;
        let bounds: Vec<Rect> = self
            .selection
            .elements()
            .iter()
            .filter_map(|id| slide.element(*id))
            .map(Element::bounds)
            .collect();
        bounding_box(&bounds)
    }

    /// Topmost visible element under `at` on the working slide.
    pub fn hit_test(&self, at: Point) -> Option<ElementId> {
        selection::hit_test(&self.document, self.working_slide()?, at)
    }

    // ─── Slides ──────────────────────────────────────────────────────────

    pub fn go_to_slide(&mut self, slide: SlideId) -> bool {
        self.cancel_gesture();
        if !self.document.set_current_slide(Some(slide)) {
            return false;
        }
        self.selection.select_slide(Some(slide));
        true
    }

    pub fn add_slide(&mut self, index: Option<usize>) -> SlideId {
        self.cancel_gesture();
        let id = self
            .history
            .record(&mut self.document, Scope::Presentation, "add slide", |doc| {
                doc.add_slide(index)
            });
        self.go_to_slide(id);
        id
    }

    pub fn duplicate_slide(&mut self, slide: SlideId) -> Option<SlideId> {
        self.cancel_gesture();
        let id = self
            .history
            .record(&mut self.document, Scope::Presentation, "duplicate slide", |doc| {
                doc.duplicate_slide(slide)
            })?;
        self.go_to_slide(id);
        Some(id)
    }

    pub fn delete_slide(&mut self, slide: SlideId) -> bool {
        self.cancel_gesture();
        let deleted = self
            .history
            .record(&mut self.document, Scope::Presentation, "delete slide", |doc| {
                doc.delete_slide(slide)
            });
        if deleted {
            self.selection.select_slide(self.document.current_slide_id());
        }
        deleted
    }

    pub fn move_slide(&mut self, slide: SlideId, index: usize) -> bool {
        self.cancel_gesture();
        self.history
            .record(&mut self.document, Scope::Presentation, "move slide", |doc| {
                doc.move_slide(slide, index)
            })
    }

    /// Instantiate a template as a new slide at `index` and switch to it.
    pub fn apply_template(
        &mut self,
        template: &Template,
        data: &Value,
        index: Option<usize>,
    ) -> Result<SlideId, TemplateError> {
        let slide = resolve_template(template, data)?;
        self.cancel_gesture();
        let id = self
            .history
            .record(&mut self.document, Scope::Presentation, "apply template", |doc| {
                doc.insert_slide(slide, index)
            });
        self.go_to_slide(id);
        Ok(id)
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Add an element on top of the working slide and select it.
    pub fn add_element(&mut self, element: Element) -> Option<ElementId> {
        let slide = self.working_slide()?;
        self.cancel_gesture();
        let id = self
            .history
            .record(&mut self.document, Scope::Slide(slide), "add element", |doc| {
                doc.add_element(slide, element)
            })?;
        self.selection.select_element(id, false);
        Some(id)
    }

    /// Property-panel style edit: one history entry.
    pub fn update_element(&mut self, element: ElementId, patch: &ElementPatch) -> bool {
        let Some(slide) = self.working_slide() else {
            return false;
        };
        self.cancel_gesture();
        self.history
            .record(&mut self.document, Scope::Slide(slide), "edit element", |doc| {
                doc.update_element(slide, element, patch)
            })
    }

    pub fn set_locked(&mut self, element: ElementId, locked: bool) -> bool {
        self.update_element(
            element,
            &ElementPatch {
                locked: Some(locked),
                ..ElementPatch::default()
            },
        )
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_element(&mut self, element: ElementId, additive: bool) {
        if self.selection.slide().is_none() {
            self.selection.select_slide(self.document.current_slide_id());
        }
        self.selection.select_element(element, additive);
    }

    pub fn select_all(&mut self) -> bool {
        if self.selection.slide().is_none() {
            self.selection.select_slide(self.document.current_slide_id());
        }
        self.selection.select_all(&self.document);
        !self.selection.is_empty()
    }

    pub fn clear_selection(&mut self) -> bool {
        let had = self.selection.slide().is_some() || !self.selection.is_empty();
        self.selection.clear();
        had
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Move every unlocked selected element by `(dx, dy)`.
    pub fn nudge(&mut self, dx: f32, dy: f32) -> bool {
        let Some(slide) = self.working_slide() else {
            return false;
        };
        self.cancel_gesture();
        let patches = self.translated(slide, &self.selection.movable(&self.document), dx, dy);
        if patches.is_empty() {
            return false;
        }
        self.history
            .record(&mut self.document, Scope::Slide(slide), "nudge", |doc| {
                doc.batch_update_elements(slide, &patches)
            })
            > 0
    }

    fn translated(
        &self,
        slide: SlideId,
        ids: &[ElementId],
        dx: f32,
        dy: f32,
    ) -> Vec<(ElementId, ElementPatch)> {
        ids.iter()
            .filter_map(|id| {
                let frame = self.document.element(slide, *id)?.frame;
                Some((*id, ElementPatch::position(frame.x + dx, frame.y + dy)))
            })
            .collect()
    }

    /// Delete the unlocked selected elements, or the selected slide when no
    /// element is selected.
    pub fn delete_selection(&mut self) -> bool {
        let Some(slide) = self.selection.slide() else {
            return false;
        };
        self.cancel_gesture();
        if self.selection.is_empty() {
            return self.delete_slide(slide);
        }

        let doomed = self.selection.movable(&self.document);
        if doomed.is_empty() {
            log::debug!("delete: every selected element is locked");
            return false;
        }
        let removed = self
            .history
            .record(&mut self.document, Scope::Slide(slide), "delete", |doc| {
                doc.delete_elements(slide, &doomed)
            });
        self.selection.retain_existing(&self.document);
        if self.selection.is_empty() {
            self.selection.clear();
        }
        removed > 0
    }

    /// Copy the selected elements (z-order) to the clipboard.
    pub fn copy(&mut self) -> usize {
        let Some(slide) = self.working_slide().and_then(|id| self.document.slide(id)) else {
            return 0;
        };
        let selected: Vec<&Element> = slide
            .elements
            .iter()
            .filter(|el| self.selection.is_selected(el.id))
            .collect();
        if selected.is_empty() {
            return 0;
        }
        self.clipboard.copy(selected)
    }

    pub fn cut(&mut self) -> bool {
        self.copy() > 0 && self.delete_selection()
    }

    /// Paste onto the working slide and select the pasted elements.
    pub fn paste(&mut self) -> bool {
        let Some(slide) = self.working_slide() else {
            return false;
        };
        if !self.clipboard.can_paste() {
            log::debug!("paste: clipboard empty");
            return false;
        }
        self.cancel_gesture();
        let elements = self.clipboard.paste(self.config.paste_offset);
        self.insert_all(slide, elements, "paste")
    }

    /// Clone the selected elements next to their originals.
    pub fn duplicate(&mut self) -> bool {
        let Some(slide) = self.working_slide() else {
            return false;
        };
        self.cancel_gesture();
        let offset = self.config.duplicate_offset;
        let Some(source) = self.document.slide(slide) else {
            return false;
        };
        let copies: Vec<Element> = source
            .elements
            .iter()
            .filter(|el| self.selection.is_selected(el.id))
            .map(|el| {
                let mut copy = el.with_fresh_id();
                copy.translate(offset, offset);
                copy
            })
            .collect();
        if copies.is_empty() {
            return false;
        }
        self.insert_all(slide, copies, "duplicate")
    }

    fn insert_all(&mut self, slide: SlideId, elements: Vec<Element>, label: &str) -> bool {
        let ids: Vec<ElementId> = self
            .history
            .record(&mut self.document, Scope::Slide(slide), label, |doc| {
                elements
                    .into_iter()
                    .filter_map(|el| doc.add_element(slide, el))
                    .collect()
            });
        if ids.is_empty() {
            return false;
        }
        if self.selection.slide() != Some(slide) {
            self.selection.select_slide(Some(slide));
        }
        self.selection.set_elements(ids);
        true
    }

    /// Reorder the single selected element.
    pub fn reorder_selected(&mut self, op: ZOrder) -> bool {
        let (Some(slide), Some(element)) = (self.working_slide(), self.selection.single()) else {
            log::debug!("reorder: needs exactly one selected element");
            return false;
        };
        self.cancel_gesture();
        self.history
            .record(&mut self.document, Scope::Slide(slide), "reorder", |doc| {
                doc.reorder_element(slide, element, op)
            })
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let undone = self.history.undo(&mut self.document);
        self.after_history(undone)
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let redone = self.history.redo(&mut self.document);
        self.after_history(redone)
    }

    fn after_history(&mut self, label: Option<String>) -> bool {
        let Some(label) = label else {
            return false;
        };
        log::debug!("history: applied {label:?}");
        if let Some(slide) = self.selection.slide()
            && self.document.slide(slide).is_none()
        {
            self.selection.select_slide(self.document.current_slide_id());
        }
        self.selection.retain_existing(&self.document);
        true
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Route one key event. Events aimed at text-entry targets are left
    /// alone so typing never triggers editor commands.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if event.target.accepts_text() {
            return KeyOutcome::default();
        }
        let Some(action) = ShortcutMap::resolve(&event.key, event.modifiers) else {
            return KeyOutcome::default();
        };
        let changed = self.run(action);
        KeyOutcome {
            action: Some(action),
            handled: true,
            changed,
        }
    }

    /// Execute a shortcut action.
    pub fn run(&mut self, action: ShortcutAction) -> bool {
        if action.is_layer_op() && self.selection.single().is_none() {
            log::debug!("{action:?} ignored: needs exactly one selected element");
            return false;
        }
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selection(),
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Duplicate => self.duplicate(),
            ShortcutAction::Copy => self.copy() > 0,
            ShortcutAction::Cut => self.cut(),
            ShortcutAction::Paste => self.paste(),
            ShortcutAction::Nudge(direction) => {
                let (ux, uy) = direction.unit();
                let step = self.config.nudge_step;
                self.nudge(ux * step, uy * step)
            }
            ShortcutAction::BringForward => self.reorder_selected(ZOrder::BringForward),
            ShortcutAction::SendBackward => self.reorder_selected(ZOrder::SendBackward),
            ShortcutAction::BringToFront => self.reorder_selected(ZOrder::BringToFront),
            ShortcutAction::SendToBack => self.reorder_selected(ZOrder::SendToBack),
            ShortcutAction::Deselect => {
                if self.is_gesture_active() {
                    self.cancel_gesture()
                } else {
                    self.clear_selection()
                }
            }
        }
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    /// Route one pointer event. Returns whether anything visible changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { at, modifiers } => self.pointer_down(at, modifiers),
            PointerEvent::Move { at, modifiers } => self.pointer_move(at, modifiers),
            PointerEvent::Up { at, modifiers } => self.pointer_up(at, modifiers),
            PointerEvent::Leave => self.cancel_gesture(),
        }
    }

    fn pointer_down(&mut self, at: Point, modifiers: Modifiers) -> bool {
        self.cancel_gesture();
        let Some(slide) = self.working_slide() else {
            return false;
        };
        if self.selection.slide() != Some(slide) {
            self.selection.select_slide(Some(slide));
        }

        // Handles of a single selected element win over everything else.
        let tolerance = self.config.handle_tolerance;
        let handle = self.selection.single().and_then(|id| {
            let el = self.document.element(slide, id)?;
            Some((id, resize::target_at(el, at, tolerance)?))
        });
        if let Some((id, target)) = handle
            && self.begin_resize_at(id, target, at)
        {
            return true;
        }

        match selection::hit_test(&self.document, slide, at) {
            Some(hit) => {
                if modifiers.shift {
                    self.selection.select_element(hit, true);
                    if !self.selection.is_selected(hit) {
                        // Toggled off: nothing to drag.
                        return true;
                    }
                } else if !self.selection.is_selected(hit) {
                    self.selection.select_element(hit, false);
                }
                // Clicking an already-selected element keeps the group for dragging.
                self.begin_move(slide, at);
                true
            }
            None => {
                if !modifiers.shift {
                    self.selection.clear_elements();
                }
                self.selection.begin_marquee(at);
                self.gesture = Gesture::Marquee {
                    additive: modifiers.shift,
                };
                true
            }
        }
    }

    fn begin_move(&mut self, slide: SlideId, origin: Point) {
        let start: Vec<(ElementId, Rect)> = self
            .selection
            .movable(&self.document)
            .into_iter()
            .filter_map(|id| Some((id, self.document.element(slide, id)?.frame)))
            .collect();
        if start.is_empty() {
            return;
        }
        self.history
            .snapshot_before_change(&self.document, Scope::Slide(slide), "move");
        self.gesture = Gesture::Move { slide, origin, start };
    }

    fn pointer_move(&mut self, at: Point, modifiers: Modifiers) -> bool {
        if matches!(self.gesture, Gesture::Resize { .. }) {
            return self.drag_resize(at, modifiers);
        }
        match &mut self.gesture {
            Gesture::Idle | Gesture::Resize { .. } => false,
            Gesture::Marquee { .. } => {
                self.selection.update_marquee(at);
                true
            }
            Gesture::Move { slide, origin, start } => {
                let mut dx = at.x - origin.x;
                let mut dy = at.y - origin.y;
                // Shift: constrain to dominant axis
                if modifiers.shift {
                    if dx.abs() > dy.abs() {
                        dy = 0.0;
                    } else {
                        dx = 0.0;
                    }
                }
                let patches: Vec<(ElementId, ElementPatch)> = start
                    .iter()
                    .map(|(id, frame)| (*id, ElementPatch::position(frame.x + dx, frame.y + dy)))
                    .collect();
                let slide = *slide;
                log::trace!("move {} elements by ({dx}, {dy})", patches.len());
                self.document.batch_update_elements(slide, &patches) > 0
            }
        }
    }

    fn pointer_up(&mut self, at: Point, modifiers: Modifiers) -> bool {
        if matches!(self.gesture, Gesture::Resize { .. }) {
            self.drag_resize(at, modifiers);
            return self.end_resize();
        }
        if matches!(self.gesture, Gesture::Move { .. }) {
            self.pointer_move(at, modifiers);
        }
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle | Gesture::Resize { .. } => false,
            Gesture::Marquee { additive } => {
                self.selection.update_marquee(at);
                self.selection
                    .finish_marquee(&self.document, additive, self.config.min_marquee_extent);
                true
            }
            Gesture::Move { .. } => self.history.commit(&self.document),
        }
    }

    /// Start a resize drag on `element` from pointer position `origin`.
    /// Hosts that hit-test their own handle overlay call this directly.
    pub fn begin_resize_at(
        &mut self,
        element: ElementId,
        target: ResizeTarget,
        origin: Point,
    ) -> bool {
        let Some(slide) = self.working_slide() else {
            return false;
        };
        let Some(el) = self.document.element(slide, element) else {
            return false;
        };
        let limits = ResizeLimits::from(&self.config);
        let Some(session) = ResizeSession::begin(el, target, limits) else {
            return false;
        };
        self.cancel_gesture();
        self.history
            .snapshot_before_change(&self.document, Scope::Slide(slide), "resize");
        self.gesture = Gesture::Resize {
            slide,
            origin,
            session: Box::new(session),
        };
        true
    }

    /// Live resize to pointer position `at`, without history.
    pub fn drag_resize(&mut self, at: Point, modifiers: Modifiers) -> bool {
        let Gesture::Resize { slide, origin, session } = &mut self.gesture else {
            return false;
        };
        let patch = session.update(at.x - origin.x, at.y - origin.y, modifiers);
        let (slide, element) = (*slide, session.element());
        self.document.update_element(slide, element, &patch)
    }

    /// Release the resize drag: one history entry if the geometry changed.
    pub fn end_resize(&mut self) -> bool {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Resize { slide, session, .. } => {
                let element = session.element();
                if let Some(patch) = session.finish() {
                    self.document.update_element(slide, element, &patch);
                }
                self.history.commit(&self.document)
            }
            other => {
                self.gesture = other;
                false
            }
        }
    }

    /// Abort the active gesture, restoring pre-drag geometry. Nothing is
    /// recorded. Returns whether a gesture was active.
    pub fn cancel_gesture(&mut self) -> bool {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => false,
            Gesture::Marquee { .. } => {
                self.selection.cancel_marquee();
                true
            }
            Gesture::Move { slide, start, .. } => {
                let restore: Vec<(ElementId, ElementPatch)> = start
                    .into_iter()
                    .map(|(id, frame)| (id, ElementPatch::position(frame.x, frame.y)))
                    .collect();
                self.document.batch_update_elements(slide, &restore);
                self.history.discard();
                true
            }
            Gesture::Resize { slide, session, .. } => {
                let element = session.element();
                let restore = session.cancel();
                self.document.update_element(slide, element, &restore);
                self.history.discard();
                true
            }
        }
    }
}
