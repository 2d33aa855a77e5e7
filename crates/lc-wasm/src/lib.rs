//! WASM bridge for Lesson Canvas: exposes the slide editor to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. Structured values cross the
//! boundary as JSON strings; rendering stays on the JS side.

use lc_core::template::unresolved_placeholders;
use lc_core::{
    Document, Element, ElementId, ElementPatch, Point, Slide, SlideId, Template, resolve_template,
};
use lc_editor::{Editor, EditorConfig, FocusTarget, KeyEvent, Modifiers, PointerEvent};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
///
/// All interaction from the page goes through this struct: pointer and key
/// events in, JSON snapshots of document and selection out.
#[wasm_bindgen]
pub struct LessonCanvas {
    editor: Editor,
}

impl Default for LessonCanvas {
    fn default() -> Self {
        Self::new("")
    }
}

#[wasm_bindgen]
impl LessonCanvas {
    /// Create an editor over an empty deck. `config_json` may be empty for
    /// the defaults; an invalid config is logged and ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        // Set up panic hook for better error messages in console
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("invalid editor config, using defaults: {e}");
                EditorConfig::default()
            })
        };
        Self {
            editor: Editor::new(Document::default(), config),
        }
    }

    // ─── Document I/O ────────────────────────────────────────────────────

    /// Replace the document. Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn load_json(&mut self, json: &str) -> String {
        match Document::from_json(json) {
            Ok(doc) => {
                self.editor.load(doc);
                ok_json()
            }
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// Serialize the whole document, or `""` on failure.
    pub fn to_json(&self) -> String {
        self.editor.document().to_json().unwrap_or_else(|e| {
            log::error!("document serialization failed: {e}");
            String::new()
        })
    }

    /// Slide ids in presentation order, as a JSON array.
    pub fn slide_ids(&self) -> String {
        let ids: Vec<&str> = self.editor.document().slides().map(|s| s.id.as_str()).collect();
        to_json_or(&ids, "[]")
    }

    /// Current slide id, or empty string.
    pub fn current_slide_id(&self) -> String {
        self.editor
            .document()
            .current_slide_id()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// One slide as JSON, or `""` if unknown.
    pub fn slide_json(&self, slide_id: &str) -> String {
        self.editor
            .document()
            .slide(SlideId::intern(slide_id))
            .and_then(|slide| serde_json::to_string(slide).ok())
            .unwrap_or_default()
    }

    // ─── Slides ──────────────────────────────────────────────────────────

    pub fn go_to_slide(&mut self, slide_id: &str) -> bool {
        self.editor.go_to_slide(SlideId::intern(slide_id))
    }

    /// Append a blank slide (or insert at `index` when non-negative) and
    /// return its id.
    pub fn add_slide(&mut self, index: i32) -> String {
        let index = usize::try_from(index).ok();
        self.editor.add_slide(index).as_str().to_string()
    }

    /// Returns the new slide id, or empty string.
    pub fn duplicate_slide(&mut self, slide_id: &str) -> String {
        self.editor
            .duplicate_slide(SlideId::intern(slide_id))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn move_slide(&mut self, slide_id: &str, index: usize) -> bool {
        self.editor.move_slide(SlideId::intern(slide_id), index)
    }

    /// Instantiate a template with lesson data as a new slide.
    /// Returns `{"ok":true,"slide":"<id>","unresolved":[...]}` or an error.
    pub fn apply_template(&mut self, template_json: &str, data_json: &str, index: i32) -> String {
        let template = match Template::from_json(template_json) {
            Ok(t) => t,
            Err(e) => return error_json(&e.to_string()),
        };
        let data: Value = match serde_json::from_str(data_json) {
            Ok(v) => v,
            Err(e) => return error_json(&format!("lesson data: {e}")),
        };
        match self
            .editor
            .apply_template(&template, &data, usize::try_from(index).ok())
        {
            Ok(id) => {
                let unresolved = self
                    .editor
                    .document()
                    .slide(id)
                    .map(missing_paths)
                    .unwrap_or_default();
                let applied = TemplateResult {
                    ok: true,
                    slide: id.as_str(),
                    unresolved,
                };
                to_json_or(&applied, r#"{"ok":false,"error":"serialization"}"#)
            }
            Err(e) => error_json(&e.to_string()),
        }
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Add an element (JSON) on the working slide. Returns its id, or
    /// empty string when the JSON is invalid or the id is taken.
    pub fn add_element(&mut self, element_json: &str) -> String {
        let element: Element = match serde_json::from_str(element_json) {
            Ok(el) => el,
            Err(e) => {
                log::warn!("add_element: {e}");
                return String::new();
            }
        };
        self.editor
            .add_element(element)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Apply a partial update (JSON patch object) to one element.
    pub fn update_element(&mut self, element_id: &str, patch_json: &str) -> bool {
        match serde_json::from_str::<ElementPatch>(patch_json) {
            Ok(patch) => self.editor.update_element(ElementId::intern(element_id), &patch),
            Err(e) => {
                log::warn!("update_element: {e}");
                false
            }
        }
    }

    pub fn set_locked(&mut self, element_id: &str, locked: bool) -> bool {
        self.editor.set_locked(ElementId::intern(element_id), locked)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select by id (e.g. from a layers panel). Empty id clears.
    pub fn select_by_id(&mut self, element_id: &str, additive: bool) -> bool {
        if element_id.is_empty() {
            return self.editor.clear_selection();
        }
        let id = ElementId::intern(element_id);
        let Some(slide) = self.editor.document().current_slide_id() else {
            return false;
        };
        if self.editor.document().element(slide, id).is_none() {
            return false;
        }
        self.editor.select_element(id, additive);
        true
    }

    /// Selected element ids in click order, as a JSON array.
    pub fn selected_ids(&self) -> String {
        let ids: Vec<&str> = self
            .editor
            .selection()
            .elements()
            .iter()
            .map(|id| id.as_str())
            .collect();
        to_json_or(&ids, "[]")
    }

    /// `{"x":..,"y":..,"width":..,"height":..}` around the selection, or `{}`.
    pub fn selection_bounds(&self) -> String {
        self.editor
            .selection_bounds()
            .map(|r| to_json_or(&r, "{}"))
            .unwrap_or_else(|| "{}".to_string())
    }

    /// Normalized marquee rectangle while dragging, or `{}`.
    pub fn marquee_rect(&self) -> String {
        self.editor
            .selection()
            .marquee()
            .map(|m| to_json_or(&m.rect(), "{}"))
            .unwrap_or_else(|| "{}".to_string())
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selection()
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.history().can_redo()
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keydown. `tag_name` and `content_editable` describe the
    /// focused DOM element. Returns the [`KeyOutcome`](lc_editor::KeyOutcome)
    /// as JSON: `{"action":..,"handled":bool,"changed":bool}`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        tag_name: &str,
        content_editable: bool,
    ) -> String {
        let event = KeyEvent::new(key, modifiers(shift, ctrl, alt, meta))
            .on(FocusTarget::from_dom(tag_name, content_editable));
        let outcome = self.editor.handle_key(&event);
        to_json_or(&outcome, r#"{"action":null,"handled":false,"changed":false}"#)
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Handle pointer down in slide coordinates. Returns true if anything
    /// visible changed.
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.editor.handle_pointer(PointerEvent::Down {
            at: Point::new(x, y),
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    pub fn pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.editor.handle_pointer(PointerEvent::Move {
            at: Point::new(x, y),
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    pub fn pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.editor.handle_pointer(PointerEvent::Up {
            at: Point::new(x, y),
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    /// Pointer left the canvas: abort any drag.
    pub fn pointer_leave(&mut self) -> bool {
        self.editor.handle_pointer(PointerEvent::Leave)
    }

    pub fn is_gesture_active(&self) -> bool {
        self.editor.is_gesture_active()
    }
}

#[derive(Serialize)]
struct TemplateResult<S: Serialize> {
    ok: bool,
    slide: S,
    unresolved: Vec<String>,
}

fn missing_paths(slide: &Slide) -> Vec<String> {
    unresolved_placeholders(slide)
        .into_iter()
        .map(|(_, path)| path)
        .collect()
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn to_json_or<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

fn ok_json() -> String {
    r#"{"ok":true}"#.to_string()
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Lesson Canvas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no editor needed) ─────────────────────────────

/// Validate a document. Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_document(json: &str) -> String {
    match Document::from_json(json) {
        Ok(_) => ok_json(),
        Err(e) => error_json(&e.to_string()),
    }
}

/// Validate an editor config. Same result shape as [`validate_document`].
#[wasm_bindgen]
pub fn validate_config(json: &str) -> String {
    match EditorConfig::from_json(json) {
        Ok(_) => ok_json(),
        Err(e) => error_json(&e.to_string()),
    }
}

/// Resolve a template against lesson data without touching any document.
/// Returns `{"ok":true,"slide":{...},"unresolved":[...]}` or an error.
#[wasm_bindgen]
pub fn preview_template(template_json: &str, data_json: &str) -> String {
    let template = match Template::from_json(template_json) {
        Ok(t) => t,
        Err(e) => return error_json(&e.to_string()),
    };
    let data: Value = match serde_json::from_str(data_json) {
        Ok(v) => v,
        Err(e) => return error_json(&format!("lesson data: {e}")),
    };
    match resolve_template(&template, &data) {
        Ok(slide) => {
            let preview = TemplateResult {
                ok: true,
                unresolved: missing_paths(&slide),
                slide: &slide,
            };
            to_json_or(&preview, r#"{"ok":false,"error":"serialization"}"#)
        }
        Err(e) => error_json(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DECK: &str = r#"{
        "presentation": {"id": "wasm_deck", "title": "Colores", "slideOrder": ["wasm_s1"]},
        "slides": [{"id": "wasm_s1", "elements": [
            {"id": "wasm_a", "frame": {"x": 0, "y": 0, "width": 60, "height": 30},
             "kind": {"type": "text", "content": "rojo"}}
        ]}],
        "currentSlide": "wasm_s1"
    }"#;

    fn loaded() -> LessonCanvas {
        let mut canvas = LessonCanvas::default();
        assert_eq!(canvas.load_json(DECK), r#"{"ok":true}"#);
        canvas
    }

    #[test]
    fn pointer_selects_and_key_nudges() {
        let mut canvas = loaded();
        assert!(canvas.pointer_down(10.0, 10.0, false, false, false, false));
        canvas.pointer_up(10.0, 10.0, false, false, false, false);
        assert_eq!(canvas.selected_ids(), r#"["wasm_a"]"#);

        let out = canvas.handle_key("ArrowRight", false, false, false, false, "canvas", false);
        let out: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["handled"], true);
        assert_eq!(out["changed"], true);
        assert_eq!(out["action"]["action"], "nudge");

        let bounds: Value = serde_json::from_str(&canvas.selection_bounds()).unwrap();
        assert_eq!(bounds["x"], 4.0);
        assert!(canvas.undo());
        assert!(canvas.can_redo());
    }

    #[test]
    fn typing_in_inputs_is_ignored() {
        let mut canvas = loaded();
        canvas.select_by_id("wasm_a", false);
        let out = canvas.handle_key("Backspace", false, false, false, false, "INPUT", false);
        let out: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["handled"], false);
        assert_eq!(canvas.selected_ids(), r#"["wasm_a"]"#);
    }

    #[test]
    fn bad_input_reports_errors() {
        let mut canvas = loaded();
        let out: Value = serde_json::from_str(&canvas.load_json("{")).unwrap();
        assert_eq!(out["ok"], false);
        // The previous document is kept.
        assert_eq!(canvas.current_slide_id(), "wasm_s1");
        assert!(!canvas.update_element("wasm_a", "not json"));
        assert_eq!(canvas.add_element("{}"), "");
    }

    #[test]
    fn template_preview_lists_missing_paths() {
        let template = r#"{"name": "card", "elements": [
            {"id": "wasm_tpl", "frame": {"x": 0, "y": 0, "width": 100, "height": 40},
             "kind": {"type": "text", "content": "{{word}} / {{meaning}}"}}
        ]}"#;
        let data = r#"{"word": "azul"}"#;
        let out: Value = serde_json::from_str(&preview_template(template, data)).unwrap();
        assert_eq!(out["ok"], true);
        assert_eq!(out["unresolved"], serde_json::json!(["meaning"]));

        let mut canvas = loaded();
        let applied = canvas.apply_template(template, data, -1);
        let applied: Value = serde_json::from_str(&applied).unwrap();
        assert_eq!(applied["ok"], true);
        assert_eq!(canvas.current_slide_id(), applied["slide"].as_str().unwrap());
        let ids: Vec<String> = serde_json::from_str(&canvas.slide_ids()).unwrap();
        assert_eq!(ids.len(), 2);
    }
}
