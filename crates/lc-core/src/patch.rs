//! Typed partial updates for elements.
//!
//! Top-level fields are shallow-merged: every `Some` overwrites, every
//! `None` leaves the current value. Content is patched per element kind;
//! inside a content patch, style objects replace the old style wholesale
//! (callers hand in the complete style they want).

use crate::geometry::{Point, Rect};
use crate::model::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub opacity: Option<f32>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub content: Option<ContentPatch>,
}

/// Per-kind content patch. Applying a patch of the wrong kind is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentPatch {
    Text {
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        style: Option<TextStyle>,
    },
    Shape {
        #[serde(default)]
        shape: Option<ShapeKind>,
        #[serde(default)]
        style: Option<ShapeStyle>,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        fit: Option<ObjectFit>,
        /// `Some(None)` clears the crop.
        #[serde(default)]
        crop: Option<Option<Crop>>,
        #[serde(default)]
        offset_x: Option<f32>,
        #[serde(default)]
        offset_y: Option<f32>,
        #[serde(default)]
        scale: Option<f32>,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        #[serde(default)]
        points: Option<Vec<Point>>,
        #[serde(default)]
        stroke: Option<Color>,
        #[serde(default)]
        stroke_width: Option<f32>,
        #[serde(default)]
        start_cap: Option<LineCap>,
        #[serde(default)]
        end_cap: Option<LineCap>,
    },
    #[serde(rename_all = "camelCase")]
    Table {
        /// Replaces the whole grid; `rows`/`columns` follow its shape.
        #[serde(default)]
        cells: Option<Vec<Vec<TableCell>>>,
        #[serde(default)]
        column_widths: Option<Vec<f32>>,
        #[serde(default)]
        row_heights: Option<Vec<f32>>,
        #[serde(default)]
        header_row: Option<bool>,
        #[serde(default)]
        header_column: Option<bool>,
        #[serde(default)]
        style: Option<TableStyle>,
    },
    #[serde(rename_all = "camelCase")]
    Icon {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        icon_set: Option<String>,
        #[serde(default)]
        color: Option<Color>,
    },
}

impl ContentPatch {
    /// Patch that sets every content field to the values in `kind`.
    pub fn from_kind(kind: &ElementKind) -> Self {
        match kind.clone() {
            ElementKind::Text(t) => ContentPatch::Text {
                content: Some(t.content),
                style: Some(t.style),
            },
            ElementKind::Shape(s) => ContentPatch::Shape {
                shape: Some(s.shape),
                style: Some(s.style),
            },
            ElementKind::Image(i) => ContentPatch::Image {
                source: Some(i.source),
                fit: Some(i.fit),
                crop: Some(i.crop),
                offset_x: Some(i.offset_x),
                offset_y: Some(i.offset_y),
                scale: Some(i.scale),
            },
            ElementKind::Line(l) => ContentPatch::Line {
                points: Some(l.points),
                stroke: Some(l.stroke),
                stroke_width: Some(l.stroke_width),
                start_cap: Some(l.start_cap),
                end_cap: Some(l.end_cap),
            },
            ElementKind::Table(t) => ContentPatch::Table {
                cells: Some(t.cells),
                column_widths: Some(t.column_widths),
                row_heights: Some(t.row_heights),
                header_row: Some(t.header_row),
                header_column: Some(t.header_column),
                style: Some(t.style),
            },
            ElementKind::Icon(i) => ContentPatch::Icon {
                name: Some(i.name),
                icon_set: Some(i.icon_set),
                color: Some(i.color),
            },
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        ContentPatch::Text {
            content: Some(content.into()),
            style: None,
        }
    }

    /// Table track sizes only.
    pub fn table_tracks(column_widths: Vec<f32>, row_heights: Vec<f32>) -> Self {
        ContentPatch::Table {
            cells: None,
            column_widths: Some(column_widths),
            row_heights: Some(row_heights),
            header_row: None,
            header_column: None,
            style: None,
        }
    }

    pub fn line_points(points: Vec<Point>) -> Self {
        ContentPatch::Line {
            points: Some(points),
            stroke: None,
            stroke_width: None,
            start_cap: None,
            end_cap: None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ContentPatch::Text { .. } => "text",
            ContentPatch::Shape { .. } => "shape",
            ContentPatch::Image { .. } => "image",
            ContentPatch::Line { .. } => "line",
            ContentPatch::Table { .. } => "table",
            ContentPatch::Icon { .. } => "icon",
        }
    }

    /// Whether this patch sets explicit table track sizes.
    fn sets_table_tracks(&self) -> bool {
        matches!(
            self,
            ContentPatch::Table {
                column_widths: Some(_),
                ..
            } | ContentPatch::Table {
                row_heights: Some(_),
                ..
            }
        )
    }

    /// Apply to `kind`. Returns `false` (leaving `kind` untouched) on a kind
    /// mismatch or when the result would break the table shape invariant.
    fn apply(&self, kind: &mut ElementKind) -> bool {
        match (self, kind) {
            (ContentPatch::Text { content, style }, ElementKind::Text(t)) => {
                if let Some(c) = content {
                    t.content = c.clone();
                }
                if let Some(s) = style {
                    t.style = s.clone();
                }
                true
            }
            (ContentPatch::Shape { shape, style }, ElementKind::Shape(s)) => {
                if let Some(k) = shape {
                    s.shape = k.clone();
                }
                if let Some(st) = style {
                    s.style = st.clone();
                }
                true
            }
            (
                ContentPatch::Image {
                    source,
                    fit,
                    crop,
                    offset_x,
                    offset_y,
                    scale,
                },
                ElementKind::Image(i),
            ) => {
                if let Some(v) = source {
                    i.source = v.clone();
                }
                if let Some(v) = fit {
                    i.fit = *v;
                }
                if let Some(v) = crop {
                    i.crop = *v;
                }
                if let Some(v) = offset_x {
                    i.offset_x = *v;
                }
                if let Some(v) = offset_y {
                    i.offset_y = *v;
                }
                if let Some(v) = scale {
                    i.scale = v.max(0.0);
                }
                true
            }
            (
                ContentPatch::Line {
                    points,
                    stroke,
                    stroke_width,
                    start_cap,
                    end_cap,
                },
                ElementKind::Line(l),
            ) => {
                if let Some(v) = points {
                    l.points = v.clone();
                }
                if let Some(v) = stroke {
                    l.stroke = *v;
                }
                if let Some(v) = stroke_width {
                    l.stroke_width = v.max(0.0);
                }
                if let Some(v) = start_cap {
                    l.start_cap = *v;
                }
                if let Some(v) = end_cap {
                    l.end_cap = *v;
                }
                true
            }
            (
                ContentPatch::Table {
                    cells,
                    column_widths,
                    row_heights,
                    header_row,
                    header_column,
                    style,
                },
                ElementKind::Table(t),
            ) => {
                let mut next = t.clone();
                if let Some(grid) = cells {
                    next.rows = grid.len();
                    next.columns = grid.first().map_or(0, Vec::len);
                    next.cells = grid.clone();
                }
                if let Some(v) = column_widths {
                    next.column_widths = v.clone();
                }
                if let Some(v) = row_heights {
                    next.row_heights = v.clone();
                }
                if let Some(v) = header_row {
                    next.header_row = *v;
                }
                if let Some(v) = header_column {
                    next.header_column = *v;
                }
                if let Some(v) = style {
                    next.style = v.clone();
                }
                if let Err(e) = next.validate() {
                    log::warn!("rejected table patch: {e}");
                    return false;
                }
                *t = next;
                true
            }
            (
                ContentPatch::Icon {
                    name,
                    icon_set,
                    color,
                },
                ElementKind::Icon(i),
            ) => {
                if let Some(v) = name {
                    i.name = v.clone();
                }
                if let Some(v) = icon_set {
                    i.icon_set = v.clone();
                }
                if let Some(v) = color {
                    i.color = *v;
                }
                true
            }
            (patch, kind) => {
                log::warn!(
                    "ignoring {} content patch on {} element",
                    patch.kind_name(),
                    kind.name()
                );
                false
            }
        }
    }
}

impl ElementPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn frame(frame: Rect) -> Self {
        Self {
            x: Some(frame.x),
            y: Some(frame.y),
            width: Some(frame.width),
            height: Some(frame.height),
            ..Self::default()
        }
    }

    pub fn content(content: ContentPatch) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    /// Patch that returns an element to exactly `el`'s state (id excluded).
    pub fn restore(el: &Element) -> Self {
        Self {
            rotation: Some(el.rotation),
            opacity: Some(el.opacity),
            visible: Some(el.visible),
            locked: Some(el.locked),
            content: Some(ContentPatch::from_kind(&el.kind)),
            ..Self::frame(el.frame)
        }
    }

    pub fn with_content(mut self, content: ContentPatch) -> Self {
        self.content = Some(content);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `el`. Sizes are clamped at zero and opacity into
    /// `[0, 1]`. A table whose frame size changes without explicit track
    /// sizes gets its tracks rescaled to the new frame.
    pub fn apply(&self, el: &mut Element) {
        let old_size = (el.frame.width, el.frame.height);

        if let Some(v) = self.x {
            el.frame.x = v;
        }
        if let Some(v) = self.y {
            el.frame.y = v;
        }
        if let Some(v) = self.width {
            el.frame.width = v.max(0.0);
        }
        if let Some(v) = self.height {
            el.frame.height = v.max(0.0);
        }
        if let Some(v) = self.rotation {
            el.rotation = v;
        }
        if let Some(v) = self.opacity {
            el.opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.visible {
            el.visible = v;
        }
        if let Some(v) = self.locked {
            el.locked = v;
        }

        let explicit_tracks = self
            .content
            .as_ref()
            .is_some_and(ContentPatch::sets_table_tracks);
        if let Some(content) = &self.content {
            content.apply(&mut el.kind);
        }

        let resized = old_size != (el.frame.width, el.frame.height);
        if resized
            && !explicit_tracks
            && let ElementKind::Table(table) = &mut el.kind
        {
            table.rescale(el.frame.width, el.frame.height);
        }
    }
}
