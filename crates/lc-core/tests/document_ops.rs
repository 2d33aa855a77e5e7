//! Integration tests: loading, slide operations and z-order (lc-core).

use lc_core::*;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn load_lesson() -> Document {
    Document::from_json(include_str!("fixtures/lesson.json")).unwrap()
}

fn element_order(doc: &Document, slide: SlideId) -> Vec<&str> {
    doc.slide(slide)
        .unwrap()
        .elements
        .iter()
        .map(|e| e.id.as_str())
        .collect()
}

// ─── Loading ────────────────────────────────────────────────────────────

#[test]
fn fixture_loads_in_presentation_order() {
    let doc = load_lesson();
    let order: Vec<&str> = doc.slides().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec!["intro", "practice"]);
    assert_eq!(doc.current_slide_id(), Some(SlideId::intern("intro")));
    assert_eq!(doc.presentation().language.target, "es");

    let intro = SlideId::intern("intro");
    assert_eq!(element_order(&doc, intro), vec!["title", "star", "underline"]);
    assert!(doc.element(intro, ElementId::intern("star")).unwrap().locked);

    let title = doc.element(intro, ElementId::intern("title")).unwrap();
    let text = title.as_text().unwrap();
    assert_eq!(text.style.font_size, 40.0);
    assert_eq!(text.style.font_family, "Inter");
}

#[test]
fn shadow_spread_survives_a_save() {
    let doc = load_lesson();
    let back = Document::from_json(&doc.to_json().unwrap()).unwrap();
    let bubble = back
        .element(SlideId::intern("practice"), ElementId::intern("bubble"))
        .unwrap();
    match &bubble.kind {
        ElementKind::Shape(shape) => {
            let shadow = shape.style.shadow.as_ref().unwrap();
            assert_eq!(shadow.spread, 2.0);
            assert_eq!(shape.shape, ShapeKind::Blurb { tail: BlurbTail::BottomRight });
        }
        other => panic!("expected shape, got {}", other.name()),
    }
    assert_eq!(back.to_snapshot(), doc.to_snapshot());
}

#[test]
fn load_rejects_duplicate_element_ids() {
    let json = r#"{
        "presentation": {"id": "d", "title": "t", "slideOrder": ["s"]},
        "slides": [{"id": "s", "elements": [
            {"id": "x", "frame": {"x": 0, "y": 0, "width": 1, "height": 1},
             "kind": {"type": "text", "content": ""}},
            {"id": "x", "frame": {"x": 0, "y": 0, "width": 1, "height": 1},
             "kind": {"type": "text", "content": ""}}
        ]}]
    }"#;
    assert!(matches!(
        Document::from_json(json),
        Err(LoadError::Model(ModelError::DuplicateElementId { .. }))
    ));
}

#[test]
fn load_rejects_ragged_tables() {
    let json = r#"{
        "presentation": {"id": "d", "title": "t", "slideOrder": ["s"]},
        "slides": [{"id": "s", "elements": [
            {"id": "t", "frame": {"x": 0, "y": 0, "width": 200, "height": 40},
             "kind": {"type": "table", "rows": 1, "columns": 2, "cells": [[{}, {}]],
                      "columnWidths": [200], "rowHeights": [40]}}
        ]}]
    }"#;
    assert!(matches!(
        Document::from_json(json),
        Err(LoadError::Model(ModelError::TableShape { .. }))
    ));
}

#[test]
fn malformed_json_is_a_load_error() {
    assert!(matches!(Document::from_json("{"), Err(LoadError::Json(_))));
}

// ─── Slides ─────────────────────────────────────────────────────────────

#[test]
fn slide_events_are_typed() {
    let mut doc = load_lesson();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    doc.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let intro = SlideId::intern("intro");
    let practice = SlideId::intern("practice");
    let added = doc.add_slide(Some(1));
    doc.move_slide(added, 0);
    doc.delete_slide(intro);

    assert_eq!(
        seen.borrow().as_slice(),
        &[
            DocumentEvent::SlideAdded { slide: added, index: 1 },
            DocumentEvent::SlideMoved { slide: added, index: 0 },
            DocumentEvent::SlideRemoved { slide: intro },
            DocumentEvent::CurrentSlideChanged { slide: Some(practice) },
        ]
    );
}

#[test]
fn notes_and_background_are_slide_changes() {
    let mut doc = load_lesson();
    let intro = SlideId::intern("intro");
    assert!(doc.set_notes(intro, "Warm-up"));
    assert!(doc.set_background(intro, Background::Solid { color: Color::BLACK }));
    let slide = doc.slide(intro).unwrap();
    assert_eq!(slide.notes, "Warm-up");
    assert_eq!(slide.background, Background::Solid { color: Color::BLACK });
}

// ─── Z-order ────────────────────────────────────────────────────────────

#[test]
fn z_order_extremes_leave_array_untouched() {
    let mut doc = load_lesson();
    let intro = SlideId::intern("intro");
    let before = doc.slide(intro).unwrap().elements.clone();

    assert!(!doc.reorder_element(intro, ElementId::intern("underline"), ZOrder::BringToFront));
    assert!(!doc.reorder_element(intro, ElementId::intern("title"), ZOrder::SendToBack));
    assert_eq!(doc.slide(intro).unwrap().elements, before);

    assert!(doc.reorder_element(intro, ElementId::intern("title"), ZOrder::BringToFront));
    assert_eq!(element_order(&doc, intro), vec!["star", "underline", "title"]);
}

// ─── Patches ────────────────────────────────────────────────────────────

#[test]
fn table_patch_via_document_keeps_tracks_consistent() {
    let mut doc = load_lesson();
    let practice = SlideId::intern("practice");
    let pairs = ElementId::intern("pairs");
    assert!(doc.update_element(practice, pairs, &ElementPatch::size(450.0, 120.0)));

    let el = doc.element(practice, pairs).unwrap();
    let table = el.as_table().unwrap();
    assert!((table.total_width() - 450.0).abs() < 1e-4);
    assert!((table.total_height() - 120.0).abs() < 1e-4);
    assert_eq!(table.cell(0, 0).unwrap().text, "rojo");
}

#[test]
fn patch_deserializes_from_host_json() {
    let patch: ElementPatch = serde_json::from_str(
        r#"{"x": 12, "opacity": 0.5, "content": {"type": "text", "content": "Hola"}}"#,
    )
    .unwrap();
    let mut doc = load_lesson();
    let intro = SlideId::intern("intro");
    let title = ElementId::intern("title");
    doc.update_element(intro, title, &patch);
    let el = doc.element(intro, title).unwrap();
    assert_eq!(el.frame.x, 12.0);
    assert_eq!(el.opacity, 0.5);
    assert_eq!(el.as_text().unwrap().content, "Hola");
    // Style untouched by a content-only patch.
    assert_eq!(el.as_text().unwrap().style.font_size, 40.0);
}
