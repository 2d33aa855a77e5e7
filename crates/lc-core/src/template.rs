//! Template instantiation: `{{path}}` placeholder resolution.
//!
//! A template is a static slide layout whose text carries placeholder
//! tokens. Resolving it against a JSON data context produces a brand-new
//! slide: every element is deep-cloned and given a fresh id, so one template
//! can be instantiated any number of times.
//!
//! Path grammar (parsed with `winnow`):
//!
//! ```text
//! token   = "{{" ws path ws "}}"
//! path    = key ( "." key | "[" digits "]" )*
//! key     = [A-Za-z0-9_]+
//! ```
//!
//! A path that does not resolve to a string, number or boolean leaves the
//! token text in place so the editor can flag it as unfilled.

use crate::error::ModelError;
use crate::id::ElementId;
use crate::model::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use winnow::ascii::{digit1, space0};
use winnow::combinator::{delimited, preceded};
use winnow::prelude::*;
use winnow::token::take_while;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template has no name")]
    Unnamed,

    #[error("malformed template: {0}")]
    Model(#[from] ModelError),

    #[error("invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A reusable slide layout with placeholder tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub background: Background,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub notes: String,
}

impl Template {
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(json)?)
    }

    fn validate(&self) -> Result<(), TemplateError> {
        if self.name.trim().is_empty() {
            return Err(TemplateError::Unnamed);
        }
        let probe = Slide {
            elements: self.elements.clone(),
            ..Slide::blank()
        };
        probe.validate()?;
        Ok(())
    }

    /// Every placeholder path referenced by the template, in document order.
    pub fn placeholders(&self) -> Vec<String> {
        let mut out = Vec::new();
        for el in &self.elements {
            for text in element_texts(&el.kind) {
                out.extend(placeholders_in(text));
            }
        }
        out.extend(placeholders_in(&self.notes));
        out
    }
}

/// One step of a placeholder path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A parsed placeholder path such as `vocabulary[2].meaning`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPath(pub Vec<PathSegment>);

impl fmt::Display for PlaceholderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSegment::Key(k) if i == 0 => write!(f, "{k}")?,
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

impl PlaceholderPath {
    /// Parse a bare path (no braces).
    pub fn parse(s: &str) -> Option<Self> {
        parse_path.parse(s).ok()
    }

    /// Walk `data` along the path.
    pub fn lookup<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(data, |value, seg| match seg {
            PathSegment::Key(k) => value.get(k.as_str()),
            PathSegment::Index(i) => value.get(*i),
        })
    }
}

// ─── Resolution ─────────────────────────────────────────────────────────

/// Instantiate `template` against `data`.
///
/// Fails only when the template itself is malformed (unnamed, duplicate
/// element ids, inconsistent tables). Missing data is not an error.
pub fn resolve_template(template: &Template, data: &Value) -> Result<Slide, TemplateError> {
    template.validate()?;

    let elements = template
        .elements
        .iter()
        .map(|el| {
            let mut copy = el.with_fresh_id();
            resolve_kind(&mut copy.kind, data);
            copy
        })
        .collect();

    let slide = Slide {
        background: template.background.clone(),
        elements,
        notes: resolve_text(&template.notes, data),
        ..Slide::blank()
    };
    log::debug!(
        "instantiated template {:?} as {} ({} elements)",
        template.name,
        slide.id,
        slide.elements.len()
    );
    Ok(slide)
}

fn resolve_kind(kind: &mut ElementKind, data: &Value) {
    match kind {
        ElementKind::Text(t) => t.content = resolve_text(&t.content, data),
        ElementKind::Table(t) => {
            for cell in t.cells.iter_mut().flatten() {
                cell.text = resolve_text(&cell.text, data);
            }
        }
        ElementKind::Shape(_)
        | ElementKind::Image(_)
        | ElementKind::Line(_)
        | ElementKind::Icon(_) => {}
    }
}

fn element_texts(kind: &ElementKind) -> Vec<&str> {
    match kind {
        ElementKind::Text(t) => vec![t.content.as_str()],
        ElementKind::Table(t) => t.cells.iter().flatten().map(|c| c.text.as_str()).collect(),
        ElementKind::Shape(_)
        | ElementKind::Image(_)
        | ElementKind::Line(_)
        | ElementKind::Icon(_) => Vec::new(),
    }
}

/// Replace every resolvable `{{path}}` token in `text`.
pub fn resolve_text(text: &str, data: &Value) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let mut cursor = &rest[start..];
        match parse_token.parse_next(&mut cursor) {
            Ok(path) => {
                let token = &rest[start..rest.len() - cursor.len()];
                match path.lookup(data).and_then(render_value) {
                    Some(value) => out.push_str(&value),
                    None => {
                        log::trace!("placeholder {path} unresolved");
                        out.push_str(token);
                    }
                }
                rest = cursor;
            }
            Err(_) => {
                out.push_str("{{");
                rest = &rest[start + 2..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Placeholder paths appearing in `text`, in order.
pub fn placeholders_in(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let mut cursor = &rest[start..];
        match parse_token.parse_next(&mut cursor) {
            Ok(path) => {
                out.push(path.to_string());
                rest = cursor;
            }
            Err(_) => rest = &rest[start + 2..],
        }
    }
    out
}

/// Placeholders still present in a resolved slide, per element.
pub fn unresolved_placeholders(slide: &Slide) -> Vec<(ElementId, String)> {
    slide
        .elements
        .iter()
        .flat_map(|el| {
            element_texts(&el.kind)
                .into_iter()
                .flat_map(placeholders_in)
                .map(move |p| (el.id, p))
        })
        .collect()
}

// ─── Token parser ───────────────────────────────────────────────────────

fn parse_key<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn parse_index(input: &mut &str) -> ModalResult<usize> {
    delimited('[', digit1, ']')
        .try_map(str::parse::<usize>)
        .parse_next(input)
}

fn parse_path(input: &mut &str) -> ModalResult<PlaceholderPath> {
    let first = parse_key.parse_next(input)?;
    let mut segments = vec![PathSegment::Key(first.to_string())];
    loop {
        if input.starts_with('.') {
            let key = preceded('.', parse_key).parse_next(input)?;
            segments.push(PathSegment::Key(key.to_string()));
        } else if input.starts_with('[') {
            segments.push(PathSegment::Index(parse_index.parse_next(input)?));
        } else {
            break;
        }
    }
    Ok(PlaceholderPath(segments))
}

fn parse_token(input: &mut &str) -> ModalResult<PlaceholderPath> {
    delimited(("{{", space0), parse_path, (space0, "}}")).parse_next(input)
}
