//! Integration tests: marquee selection + keyboard commands (lc-editor).
//!
//! Drives the `Editor` the way a browser host would: pointer events for the
//! marquee, key events for everything else.

use lc_core::{Document, Element, ElementId, Point, Rect, SlideId};
use lc_editor::{Editor, EditorConfig, FocusTarget, KeyEvent, Modifiers, PointerEvent};
use pretty_assertions::assert_eq;

fn two_text_slide() -> (Editor, SlideId, ElementId, ElementId) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut doc = Document::default();
    let slide = doc.add_slide(None);
    let a = ElementId::intern("kb_a");
    let b = ElementId::intern("kb_b");
    doc.add_element(slide, Element::text(a, Rect::new(0.0, 0.0, 60.0, 30.0), "A"));
    doc.add_element(slide, Element::text(b, Rect::new(100.0, 0.0, 50.0, 30.0), "B"));
    (Editor::new(doc, EditorConfig::default()), slide, a, b)
}

fn marquee(editor: &mut Editor, from: Point, to: Point) {
    editor.handle_pointer(PointerEvent::Down {
        at: from,
        modifiers: Modifiers::NONE,
    });
    editor.handle_pointer(PointerEvent::Move {
        at: to,
        modifiers: Modifiers::NONE,
    });
    editor.handle_pointer(PointerEvent::Up {
        at: to,
        modifiers: Modifiers::NONE,
    });
}

fn key(editor: &mut Editor, key: &str, modifiers: Modifiers) -> bool {
    editor.handle_key(&KeyEvent::new(key, modifiers)).changed
}

fn x(editor: &Editor, slide: SlideId, id: ElementId) -> f32 {
    editor.document().element(slide, id).unwrap().frame.x
}

// ─── Scenario ───────────────────────────────────────────────────────────

#[test]
fn marquee_nudge_then_undo() {
    let (mut editor, slide, a, b) = two_text_slide();

    marquee(&mut editor, Point::new(-10.0, -10.0), Point::new(150.0, 50.0));
    assert_eq!(editor.selection().elements(), &[a, b]);

    assert!(key(&mut editor, "ArrowRight", Modifiers::NONE));
    assert_eq!(x(&editor, slide, a), 4.0);
    assert_eq!(x(&editor, slide, b), 104.0);

    assert!(key(&mut editor, "z", Modifiers::CTRL));
    assert_eq!(x(&editor, slide, a), 0.0);
    assert_eq!(x(&editor, slide, b), 100.0);
}

#[test]
fn reverse_marquee_selects_the_same_set() {
    let (mut editor, _, a, b) = two_text_slide();
    marquee(&mut editor, Point::new(150.0, 50.0), Point::new(-10.0, -10.0));
    assert_eq!(editor.selection().elements(), &[a, b]);
}

#[test]
fn each_arrow_press_is_one_undo_step() {
    let (mut editor, slide, a, _) = two_text_slide();
    editor.select_element(a, false);
    for _ in 0..3 {
        key(&mut editor, "ArrowDown", Modifiers::NONE);
    }
    key(&mut editor, "ArrowLeft", Modifiers::NONE);
    assert_eq!(editor.history().undo_len(), 4);
    assert_eq!(x(&editor, slide, a), -4.0);

    key(&mut editor, "z", Modifiers::CTRL);
    assert_eq!(x(&editor, slide, a), 0.0);
    let y = editor.document().element(slide, a).unwrap().frame.y;
    assert_eq!(y, 12.0);

    // Redo via both chords.
    assert!(key(&mut editor, "y", Modifiers::CTRL));
    assert_eq!(x(&editor, slide, a), -4.0);
    key(&mut editor, "z", Modifiers::CTRL);
    let cmd_shift = Modifiers {
        meta: true,
        shift: true,
        ..Modifiers::NONE
    };
    assert!(key(&mut editor, "z", cmd_shift));
    assert_eq!(x(&editor, slide, a), -4.0);
}

#[test]
fn arrows_with_modifiers_do_nothing() {
    let (mut editor, slide, a, _) = two_text_slide();
    editor.select_element(a, false);
    assert!(!key(&mut editor, "ArrowRight", Modifiers::SHIFT));
    assert!(!key(&mut editor, "ArrowRight", Modifiers::CTRL));
    assert_eq!(x(&editor, slide, a), 0.0);
}

#[test]
fn typing_targets_swallow_shortcuts() {
    let (mut editor, slide, a, _) = two_text_slide();
    editor.select_element(a, false);
    for target in [FocusTarget::TextInput, FocusTarget::TextArea, FocusTarget::ContentEditable] {
        let outcome = editor.handle_key(&KeyEvent::new("Delete", Modifiers::NONE).on(target));
        assert!(!outcome.handled);
    }
    assert!(editor.document().element(slide, a).is_some());
}

// ─── Clipboard & layers ─────────────────────────────────────────────────

#[test]
fn cut_paste_and_duplicate() {
    let (mut editor, slide, a, b) = two_text_slide();
    editor.select_element(a, false);

    assert!(key(&mut editor, "x", Modifiers::CTRL));
    assert!(editor.document().element(slide, a).is_none());

    assert!(key(&mut editor, "v", Modifiers::CTRL));
    let pasted = editor.selection().single().unwrap();
    assert_ne!(pasted, a);
    assert_eq!(x(&editor, slide, pasted), 20.0);

    assert!(key(&mut editor, "d", Modifiers::CTRL));
    let dup = editor.selection().single().unwrap();
    assert_eq!(x(&editor, slide, dup), 40.0);

    let ids: Vec<ElementId> = editor
        .document()
        .slide(slide)
        .unwrap()
        .elements
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![b, pasted, dup]);
}

#[test]
fn layer_chords_reorder_single_selection() {
    let (mut editor, slide, a, b) = two_text_slide();
    editor.select_element(a, false);
    let ctrl_shift = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };
    assert!(key(&mut editor, "}", ctrl_shift));
    let order = |e: &Editor| -> Vec<ElementId> {
        e.document().slide(slide).unwrap().elements.iter().map(|el| el.id).collect()
    };
    assert_eq!(order(&editor), vec![b, a]);
    // Already on top.
    assert!(!key(&mut editor, "]", Modifiers::CTRL));
    assert!(key(&mut editor, "[", ctrl_shift));
    assert_eq!(order(&editor), vec![a, b]);
}

#[test]
fn select_all_then_delete_then_slide_delete() {
    let (mut editor, slide, _, _) = two_text_slide();
    let other = editor.add_slide(None);
    editor.go_to_slide(slide);

    assert!(key(&mut editor, "a", Modifiers::CTRL));
    assert_eq!(editor.selection().elements().len(), 2);
    assert!(key(&mut editor, "Delete", Modifiers::NONE));
    assert!(editor.document().slide(slide).unwrap().elements.is_empty());

    // The selection is gone; Backspace has no target.
    assert!(!key(&mut editor, "Backspace", Modifiers::NONE));

    // Focusing the slide makes it the delete target.
    editor.go_to_slide(slide);
    assert!(key(&mut editor, "Backspace", Modifiers::NONE));
    assert!(editor.document().slide(slide).is_none());
    assert_eq!(editor.document().current_slide_id(), Some(other));
}
