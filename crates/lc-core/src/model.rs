//! Slide document data model.
//!
//! A presentation is an ordered list of slides; each slide holds an ordered
//! list of positioned elements. Array order is z-order: index 0 is painted
//! first (bottom), the last element is on top. Elements are a tagged union
//! over the six content kinds the canvas knows how to edit.

use crate::error::ModelError;
use crate::geometry::{Point, Rect};
use crate::id::{ElementId, PresentationId, SlideId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;

// ─── Colors & Paint ──────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair = |i: usize| -> Option<f32> {
            Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0)
        };

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgba(
                    (r * 17) as f32 / 255.0,
                    (g * 17) as f32 / 255.0,
                    (b * 17) as f32 / 255.0,
                    1.0,
                ))
            }
            6 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, 1.0)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if c(self.a) == 255 {
            format!("#{:02X}{:02X}{:02X}", c(self.r), c(self.g), c(self.b))
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                c(self.r),
                c(self.g),
                c(self.b),
                c(self.a)
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32, // 0.0 .. 1.0
    pub color: Color,
}

/// Most gradients have two stops.
pub type GradientStops = SmallVec<[GradientStop; 2]>;

/// Fill paint for shapes and table cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Paint {
    Solid { color: Color },
    LinearGradient { angle: f32, stops: GradientStops },
    RadialGradient { stops: GradientStops },
}

/// Slide background: a solid color or a gradient descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Background {
    Solid { color: Color },
    Gradient { angle: f32, stops: GradientStops },
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid {
            color: Color::WHITE,
        }
    }
}

// ─── Text ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStyle {
    #[default]
    None,
    Bullet,
    Numbered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16, // 100..900
    pub italic: bool,
    pub underline: bool,
    pub color: Color,
    pub align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub list_style: ListStyle,
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".into(),
            font_size: 24.0,
            font_weight: 400,
            italic: false,
            underline: false,
            color: Color::BLACK,
            align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            list_style: ListStyle::None,
            line_height: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// May contain unresolved `{{path}}` placeholder tokens.
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

// ─── Shape ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlurbTail {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ShapeKind {
    Rectangle {
        #[serde(default)]
        corner_radius: f32,
    },
    Circle,
    /// Speech bubble with a pointer tail.
    Blurb {
        #[serde(default)]
        tail: BlurbTail,
    },
    /// Arbitrary SVG path data drawn inside `view_box`.
    SvgPath { path: String, view_box: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: Color,
    pub width: f32,
    #[serde(default)]
    pub style: BorderStyle,
}

/// Drop shadow. `spread` is stored as authored; approximating it is left
/// to whichever renderer draws the slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    #[serde(default)]
    pub spread: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub fill: Option<Paint>,
    pub border: Option<Border>,
    pub shadow: Option<Shadow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeContent {
    pub shape: ShapeKind,
    #[serde(default)]
    pub style: ShapeStyle,
}

// ─── Image ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

/// Crop window in source-image fractions (0.0 .. 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    /// URL or data URI.
    pub source: String,
    #[serde(default)]
    pub fit: ObjectFit,
    #[serde(default)]
    pub crop: Option<Crop>,
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    #[serde(default = "one")]
    pub scale: f32,
}

fn one() -> f32 {
    1.0
}

// ─── Line ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineCap {
    #[default]
    None,
    Arrow,
    Circle,
    Square,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineContent {
    /// Polyline vertices, relative to the element's top-left corner.
    pub points: Vec<Point>,
    pub stroke: Color,
    pub stroke_width: f32,
    #[serde(default)]
    pub start_cap: LineCap,
    #[serde(default)]
    pub end_cap: LineCap,
}

// ─── Table ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    pub text: String,
    pub background: Option<Color>,
    pub bold: bool,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableStyle {
    pub border_color: Color,
    pub border_width: f32,
    pub header_fill: Option<Color>,
    pub text: TextStyle,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            border_color: Color::BLACK,
            border_width: 1.0,
            header_fill: None,
            text: TextStyle {
                font_size: 16.0,
                ..TextStyle::default()
            },
        }
    }
}

/// Grid content. `column_widths` / `row_heights` always have exactly
/// `columns` / `rows` entries and sum to the element's frame size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableContent {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Vec<TableCell>>,
    pub column_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    #[serde(default)]
    pub header_row: bool,
    #[serde(default)]
    pub header_column: bool,
    #[serde(default)]
    pub style: TableStyle,
}

impl TableContent {
    /// Empty grid with evenly distributed tracks filling `width` × `height`.
    pub fn new(rows: usize, columns: usize, width: f32, height: f32) -> Self {
        let rows = rows.max(1);
        let columns = columns.max(1);
        Self {
            rows,
            columns,
            cells: vec![vec![TableCell::default(); columns]; rows],
            column_widths: vec![width / columns as f32; columns],
            row_heights: vec![height / rows as f32; rows],
            header_row: false,
            header_column: false,
            style: TableStyle::default(),
        }
    }

    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn total_height(&self) -> f32 {
        self.row_heights.iter().sum()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.cells.get(row)?.get(column)
    }

    pub fn set_cell_text(&mut self, row: usize, column: usize, text: impl Into<String>) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(column)) {
            Some(cell) => {
                cell.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Rescale every track so the widths sum to `width` and the heights to
    /// `height`.
    pub fn rescale(&mut self, width: f32, height: f32) {
        rescale_tracks(&mut self.column_widths, width);
        rescale_tracks(&mut self.row_heights, height);
    }

    /// Insert an empty row before `at` (clamped to the end). The new row
    /// copies the height of its neighbour.
    pub fn insert_row(&mut self, at: usize) {
        let at = at.min(self.rows);
        let height = self
            .row_heights
            .get(at)
            .or_else(|| self.row_heights.last())
            .copied()
            .unwrap_or(40.0);
        self.cells.insert(at, vec![TableCell::default(); self.columns]);
        self.row_heights.insert(at, height);
        self.rows += 1;
    }

    /// Remove row `at`. The last remaining row is never removed.
    pub fn remove_row(&mut self, at: usize) -> bool {
        if self.rows <= 1 || at >= self.rows {
            return false;
        }
        self.cells.remove(at);
        self.row_heights.remove(at);
        self.rows -= 1;
        true
    }

    pub fn insert_column(&mut self, at: usize) {
        let at = at.min(self.columns);
        let width = self
            .column_widths
            .get(at)
            .or_else(|| self.column_widths.last())
            .copied()
            .unwrap_or(100.0);
        for row in &mut self.cells {
            row.insert(at, TableCell::default());
        }
        self.column_widths.insert(at, width);
        self.columns += 1;
    }

    pub fn remove_column(&mut self, at: usize) -> bool {
        if self.columns <= 1 || at >= self.columns {
            return false;
        }
        for row in &mut self.cells {
            row.remove(at);
        }
        self.column_widths.remove(at);
        self.columns -= 1;
        true
    }

    /// Check the track/cell shape invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.column_widths.len() != self.columns {
            return Err(format!(
                "{} column widths for {} columns",
                self.column_widths.len(),
                self.columns
            ));
        }
        if self.row_heights.len() != self.rows {
            return Err(format!(
                "{} row heights for {} rows",
                self.row_heights.len(),
                self.rows
            ));
        }
        if self.cells.len() != self.rows {
            return Err(format!("{} cell rows for {} rows", self.cells.len(), self.rows));
        }
        if let Some((i, row)) = self
            .cells
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.columns)
        {
            return Err(format!(
                "row {i} has {} cells for {} columns",
                row.len(),
                self.columns
            ));
        }
        Ok(())
    }
}

/// Scale `tracks` proportionally so they sum to `total`. The last track
/// absorbs the floating-point remainder so the sum is exact.
pub fn rescale_tracks(tracks: &mut [f32], total: f32) {
    let Some(last) = tracks.len().checked_sub(1) else {
        return;
    };
    let current: f32 = tracks.iter().sum();
    if current <= f32::EPSILON {
        let even = total / tracks.len() as f32;
        tracks.iter_mut().for_each(|t| *t = even);
    } else {
        let ratio = total / current;
        tracks.iter_mut().for_each(|t| *t *= ratio);
    }
    let head: f32 = tracks[..last].iter().sum();
    tracks[last] = total - head;
}

// ─── Icon ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconContent {
    pub name: String,
    pub icon_set: String,
    #[serde(default = "default_icon_color")]
    pub color: Color,
}

fn default_icon_color() -> Color {
    Color::BLACK
}

// ─── Element ─────────────────────────────────────────────────────────────

/// Variant-specific element content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Text(TextContent),
    Shape(ShapeContent),
    Image(ImageContent),
    Line(LineContent),
    Table(TableContent),
    Icon(IconContent),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Shape(_) => "shape",
            ElementKind::Image(_) => "image",
            ElementKind::Line(_) => "line",
            ElementKind::Table(_) => "table",
            ElementKind::Icon(_) => "icon",
        }
    }
}

/// A positioned object on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub frame: Rect,
    /// Degrees clockwise about the frame center.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "one")]
    pub opacity: f32,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    pub kind: ElementKind,
}

fn yes() -> bool {
    true
}

impl Element {
    pub fn new(id: ElementId, frame: Rect, kind: ElementKind) -> Self {
        Self {
            id,
            frame,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            locked: false,
            kind,
        }
    }

    pub fn text(id: ElementId, frame: Rect, content: impl Into<String>) -> Self {
        Self::new(
            id,
            frame,
            ElementKind::Text(TextContent {
                content: content.into(),
                style: TextStyle::default(),
            }),
        )
    }

    pub fn shape(id: ElementId, frame: Rect, shape: ShapeKind) -> Self {
        Self::new(
            id,
            frame,
            ElementKind::Shape(ShapeContent {
                shape,
                style: ShapeStyle::default(),
            }),
        )
    }

    pub fn image(id: ElementId, frame: Rect, source: impl Into<String>) -> Self {
        Self::new(
            id,
            frame,
            ElementKind::Image(ImageContent {
                source: source.into(),
                fit: ObjectFit::Cover,
                crop: None,
                offset_x: 0.0,
                offset_y: 0.0,
                scale: 1.0,
            }),
        )
    }

    /// A straight line from the frame's top-left to bottom-right corner.
    pub fn line(id: ElementId, frame: Rect) -> Self {
        Self::new(
            id,
            frame,
            ElementKind::Line(LineContent {
                points: vec![Point::new(0.0, 0.0), Point::new(frame.width, frame.height)],
                stroke: Color::BLACK,
                stroke_width: 2.0,
                start_cap: LineCap::None,
                end_cap: LineCap::None,
            }),
        )
    }

    /// An empty table whose tracks exactly fill `frame`.
    pub fn table(id: ElementId, frame: Rect, rows: usize, columns: usize) -> Self {
        Self::new(
            id,
            frame,
            ElementKind::Table(TableContent::new(rows, columns, frame.width, frame.height)),
        )
    }

    pub fn icon(
        id: ElementId,
        frame: Rect,
        name: impl Into<String>,
        icon_set: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            frame,
            ElementKind::Icon(IconContent {
                name: name.into(),
                icon_set: icon_set.into(),
                color: Color::BLACK,
            }),
        )
    }

    /// Axis-aligned bounding box, accounting for rotation.
    pub fn bounds(&self) -> Rect {
        self.frame.rotated_bounds(self.rotation)
    }

    /// Whether resizing must preserve the width/height ratio regardless of
    /// modifier keys.
    pub fn keeps_aspect_ratio(&self) -> bool {
        matches!(
            &self.kind,
            ElementKind::Icon(_)
                | ElementKind::Shape(ShapeContent {
                    shape: ShapeKind::SvgPath { .. },
                    ..
                })
        )
    }

    /// Deep copy carrying a newly generated id.
    pub fn with_fresh_id(&self) -> Self {
        Self {
            id: ElementId::generate(),
            ..self.clone()
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.frame = self.frame.translate(dx, dy);
    }

    pub fn as_table(&self) -> Option<&TableContent> {
        match &self.kind {
            ElementKind::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }
}

// ─── Slide & Presentation ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    #[serde(default)]
    pub background: Background,
    /// Z-ordered, bottom first.
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub notes: String,
}

impl Slide {
    pub fn new(id: SlideId) -> Self {
        Self {
            id,
            background: Background::default(),
            elements: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn blank() -> Self {
        Self::new(SlideId::generate())
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Deep copy with a fresh slide id and fresh element ids.
    pub fn deep_clone_fresh(&self) -> Slide {
        Slide {
            id: SlideId::generate(),
            background: self.background.clone(),
            elements: self.elements.iter().map(Element::with_fresh_id).collect(),
            notes: self.notes.clone(),
        }
    }

    /// Unique element ids and well-formed tables.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for el in &self.elements {
            if !seen.insert(el.id) {
                return Err(ModelError::DuplicateElementId {
                    slide: self.id.to_string(),
                    element: el.id.to_string(),
                });
            }
            if let ElementKind::Table(table) = &el.kind {
                table.validate().map_err(|detail| ModelError::TableShape {
                    element: el.id.to_string(),
                    detail,
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageMeta {
    /// Language being taught, e.g. `"es"`.
    pub target: String,
    /// Learner's language, e.g. `"en"`.
    pub native: String,
    /// CEFR-style level label, e.g. `"A2"`.
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: PresentationId,
    pub title: String,
    pub slide_order: Vec<SlideId>,
    #[serde(default)]
    pub language: LanguageMeta,
}

impl Presentation {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: PresentationId::generate(),
            title: title.into(),
            slide_order: Vec::new(),
            language: LanguageMeta::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#3366FF").unwrap();
        assert_eq!(c.to_hex(), "#3366FF");
        let c = Color::from_hex("fff").unwrap();
        assert_eq!(c, Color::WHITE);
        let c = Color::from_hex("#00000080").unwrap();
        assert_eq!(c.to_hex(), "#00000080");
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn new_table_fills_frame() {
        let t = TableContent::new(2, 3, 300.0, 80.0);
        assert_eq!(t.column_widths, vec![100.0, 100.0, 100.0]);
        assert_eq!(t.row_heights, vec![40.0, 40.0]);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn rescale_tracks_hits_exact_total() {
        let mut tracks = vec![33.3, 33.3, 33.4];
        rescale_tracks(&mut tracks, 451.7);
        let sum: f32 = tracks.iter().sum();
        assert!((sum - 451.7).abs() < 1e-3);
        assert!((tracks[0] - tracks[1]).abs() < 1e-4);
    }

    #[test]
    fn rescale_zero_tracks_distributes_evenly() {
        let mut tracks = vec![0.0, 0.0];
        rescale_tracks(&mut tracks, 50.0);
        assert_eq!(tracks, vec![25.0, 25.0]);
    }

    #[test]
    fn table_row_and_column_edits_keep_shape() {
        let mut t = TableContent::new(2, 2, 200.0, 80.0);
        t.insert_row(1);
        t.insert_column(5);
        assert_eq!((t.rows, t.columns), (3, 3));
        assert!(t.validate().is_ok());
        assert!(t.remove_row(0));
        assert!(t.remove_column(2));
        assert!(t.validate().is_ok());
        assert_eq!((t.rows, t.columns), (2, 2));
    }

    #[test]
    fn last_row_is_never_removed() {
        let mut t = TableContent::new(1, 1, 100.0, 40.0);
        assert!(!t.remove_row(0));
        assert!(!t.remove_column(0));
    }

    #[test]
    fn validate_reports_stale_tracks() {
        let mut t = TableContent::new(2, 2, 100.0, 100.0);
        t.columns = 3;
        assert!(t.validate().is_err());
    }

    #[test]
    fn duplicate_element_ids_rejected() {
        let mut slide = Slide::new(SlideId::intern("dup"));
        let id = ElementId::intern("same");
        slide
            .elements
            .push(Element::text(id, Rect::new(0.0, 0.0, 10.0, 10.0), "a"));
        slide
            .elements
            .push(Element::text(id, Rect::new(0.0, 0.0, 10.0, 10.0), "b"));
        assert!(matches!(
            slide.validate(),
            Err(ModelError::DuplicateElementId { .. })
        ));
    }

    #[test]
    fn icons_keep_aspect_ratio() {
        let icon = Element::icon(
            ElementId::generate(),
            Rect::new(0.0, 0.0, 32.0, 32.0),
            "star",
            "lucide",
        );
        assert!(icon.keeps_aspect_ratio());
        let rect = Element::shape(
            ElementId::generate(),
            Rect::new(0.0, 0.0, 32.0, 32.0),
            ShapeKind::Circle,
        );
        assert!(!rect.keeps_aspect_ratio());
    }

    #[test]
    fn element_json_uses_type_tag() {
        let el = Element::text(
            ElementId::intern("t1"),
            Rect::new(1.0, 2.0, 3.0, 4.0),
            "Hola",
        );
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["kind"]["type"], "text");
        assert_eq!(json["kind"]["content"], "Hola");
        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, el);
    }
}
