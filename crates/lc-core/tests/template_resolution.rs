//! Integration tests: template instantiation (lc-core).

use lc_core::template::{placeholders_in, resolve_text, unresolved_placeholders};
use lc_core::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn vocab_template() -> Template {
    Template::from_json(include_str!("fixtures/vocab_template.json")).unwrap()
}

fn full_data() -> Value {
    json!({
        "lesson": {"title": "Animales", "level": "A1"},
        "vocabulary": [
            {"word": "gato", "meaning": "cat"},
            {"word": "perro", "meaning": "dog"},
            {"word": "pájaro", "meaning": "bird"}
        ]
    })
}

fn texts(slide: &Slide) -> Vec<String> {
    slide
        .elements
        .iter()
        .filter_map(|el| el.as_text().map(|t| t.content.clone()))
        .collect()
}

// ─── Placeholder resolution ─────────────────────────────────────────────

#[test]
fn indexed_path_resolves_or_stays_literal() {
    let template = "{{vocabulary[1].word}}";
    let data = json!({"vocabulary": [{"word": "uno"}, {"word": "dos"}]});
    assert_eq!(resolve_text(template, &data), "dos");

    let short = json!({"vocabulary": [{"word": "uno"}]});
    assert_eq!(resolve_text(template, &short), "{{vocabulary[1].word}}");
}

#[test]
fn full_template_resolves_text_tables_and_notes() {
    let slide = resolve_template(&vocab_template(), &full_data()).unwrap();
    assert_eq!(texts(&slide), vec!["Animales (A1)", "gato", "cat"]);

    let grid = slide.elements[3].as_table().unwrap();
    assert_eq!(grid.cell(0, 0).unwrap().text, "perro");
    assert_eq!(grid.cell(1, 1).unwrap().text, "bird");
    assert_eq!(slide.notes, "Say gato twice.");
    assert!(unresolved_placeholders(&slide).is_empty());
}

#[test]
fn image_sources_are_not_templated() {
    let slide = resolve_template(&vocab_template(), &full_data()).unwrap();
    match &slide.elements[4].kind {
        ElementKind::Image(image) => {
            assert_eq!(image.source, "https://example.org/{{vocabulary[0].word}}.png");
        }
        other => panic!("expected image, got {}", other.name()),
    }
}

#[test]
fn partial_data_leaves_tokens_for_the_ui() {
    let data = json!({
        "lesson": {"title": "Animales"},
        "vocabulary": [{"word": "gato", "meaning": "cat"}]
    });
    let slide = resolve_template(&vocab_template(), &data).unwrap();
    assert_eq!(texts(&slide)[0], "Animales ({{lesson.level}})");

    let missing: Vec<String> = unresolved_placeholders(&slide)
        .into_iter()
        .map(|(_, path)| path)
        .collect();
    assert_eq!(
        missing,
        vec![
            "lesson.level",
            "vocabulary[1].word",
            "vocabulary[1].meaning",
            "vocabulary[2].word",
            "vocabulary[2].meaning",
        ]
    );
}

// ─── Instantiation ──────────────────────────────────────────────────────

#[test]
fn every_instantiation_gets_fresh_ids() {
    let template = vocab_template();
    let original = template.clone();
    let a = resolve_template(&template, &full_data()).unwrap();
    let b = resolve_template(&template, &full_data()).unwrap();

    assert_ne!(a.id, b.id);
    for (x, y) in a.elements.iter().zip(&b.elements) {
        assert_ne!(x.id, y.id);
    }
    assert!(
        a.elements
            .iter()
            .all(|el| template.elements.iter().all(|t| t.id != el.id))
    );
    assert_eq!(template, original);
}

#[test]
fn template_lists_its_placeholders() {
    assert_eq!(
        vocab_template().placeholders(),
        vec![
            "lesson.title",
            "lesson.level",
            "vocabulary[0].word",
            "vocabulary[0].meaning",
            "vocabulary[1].word",
            "vocabulary[1].meaning",
            "vocabulary[2].word",
            "vocabulary[2].meaning",
            "vocabulary[0].word",
        ]
    );
    assert_eq!(placeholders_in("no tokens here"), Vec::<String>::new());
}

#[test]
fn malformed_template_fails_fast() {
    let json = r#"{
        "name": "broken",
        "elements": [
            {"id": "a", "frame": {"x": 0, "y": 0, "width": 1, "height": 1},
             "kind": {"type": "text", "content": ""}},
            {"id": "a", "frame": {"x": 0, "y": 0, "width": 1, "height": 1},
             "kind": {"type": "text", "content": ""}}
        ]
    }"#;
    let template = Template::from_json(json).unwrap();
    assert!(matches!(
        resolve_template(&template, &json!({})),
        Err(TemplateError::Model(ModelError::DuplicateElementId { .. }))
    ));
    assert!(matches!(Template::from_json("[]"), Err(TemplateError::Json(_))));
}

#[test]
fn resolved_slide_inserts_into_document() {
    let mut doc = Document::default();
    doc.add_slide(None);
    let slide = resolve_template(&vocab_template(), &full_data()).unwrap();
    let id = doc.insert_slide(slide, Some(0));
    assert_eq!(doc.slide_index(id), Some(0));
    assert_eq!(doc.slide(id).unwrap().elements.len(), 5);
}
