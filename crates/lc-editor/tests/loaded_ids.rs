//! Integration tests: ids minted after loading a saved deck never clash
//! with the ids the deck already carries (lc-editor).

use lc_core::*;
use lc_editor::{Editor, EditorConfig, KeyEvent, Modifiers};
use pretty_assertions::assert_eq;
use serde_json::json;

const SAVED_ELEMENTS: usize = 40;
const SAVED_SLIDES: usize = 4;

/// A deck saved by an earlier session: generated-looking ids throughout.
fn saved_deck() -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    let slides: Vec<Slide> = (0..SAVED_SLIDES)
        .map(|s| {
            let mut slide = Slide::new(SlideId::intern(&format!("slide_{s}")));
            if s == 0 {
                slide.elements = (0..SAVED_ELEMENTS)
                    .map(|n| {
                        let frame = Rect::new(n as f32 * 10.0, 0.0, 8.0, 8.0);
                        Element::text(ElementId::intern(&format!("el_{n}")), frame, "x")
                    })
                    .collect();
            }
            slide
        })
        .collect();
    let snapshot = DocumentSnapshot {
        presentation: Presentation {
            id: PresentationId::intern("deck_0"),
            title: "Saved".into(),
            slide_order: slides.iter().map(|s| s.id).collect(),
            language: LanguageMeta::default(),
        },
        current_slide: Some(slides[0].id),
        slides,
    };
    let json = serde_json::to_string(&snapshot).unwrap();
    Document::from_json(&json).unwrap()
}

fn assert_valid(editor: &Editor) {
    let order = &editor.document().presentation().slide_order;
    let mut seen = order.clone();
    seen.sort_by_key(|id| id.as_str().to_string());
    seen.dedup();
    assert_eq!(seen.len(), order.len(), "slide order has duplicates");
    for slide in editor.document().slides() {
        assert!(slide.validate().is_ok(), "{:?}", slide.validate());
    }
}

fn key(editor: &mut Editor, k: &str) -> bool {
    editor.handle_key(&KeyEvent::new(k, Modifiers::CTRL)).changed
}

#[test]
fn copy_paste_duplicate_after_load_keeps_ids_unique() {
    let mut editor = Editor::new(saved_deck(), EditorConfig::default());
    let slide = SlideId::intern("slide_0");
    editor.select_element(ElementId::intern("el_3"), false);
    editor.select_element(ElementId::intern("el_4"), true);

    assert!(key(&mut editor, "c"));
    assert!(key(&mut editor, "v"));
    assert!(key(&mut editor, "d"));
    assert!(key(&mut editor, "v"));

    let count = editor.document().slide(slide).unwrap().elements.len();
    assert_eq!(count, SAVED_ELEMENTS + 6);
    assert_valid(&editor);
}

#[test]
fn new_and_duplicated_slides_after_load_keep_ids_unique() {
    let mut editor = Editor::new(saved_deck(), EditorConfig::default());
    let added = editor.add_slide(None);
    let copy = editor.duplicate_slide(SlideId::intern("slide_0")).unwrap();

    assert_eq!(editor.document().slide_count(), SAVED_SLIDES + 2);
    assert!((0..SAVED_SLIDES).all(|s| added.as_str() != format!("slide_{s}")));
    assert_eq!(editor.document().slide(copy).unwrap().elements.len(), SAVED_ELEMENTS);
    // The source slide is still intact.
    assert_eq!(
        editor.document().slide(SlideId::intern("slide_0")).unwrap().elements.len(),
        SAVED_ELEMENTS
    );
    assert_valid(&editor);
}

#[test]
fn template_instantiation_after_load_keeps_ids_unique() {
    let mut editor = Editor::new(saved_deck(), EditorConfig::default());
    let template = Template {
        name: "card".into(),
        background: Background::default(),
        elements: (0..3)
            .map(|n| {
                let frame = Rect::new(0.0, n as f32 * 40.0, 200.0, 30.0);
                Element::text(ElementId::intern(&format!("el_{n}")), frame, "{{word}}")
            })
            .collect(),
        notes: String::new(),
    };
    for _ in 0..3 {
        editor.apply_template(&template, &json!({"word": "gato"}), None).unwrap();
    }
    assert_eq!(editor.document().slide_count(), SAVED_SLIDES + 3);
    assert_valid(&editor);
}
