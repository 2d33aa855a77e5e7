//! Resize and transform handlers.
//!
//! A [`ResizeSession`] captures an element at pointer-down and turns the
//! total pointer delta since then into an [`ElementPatch`]. Working from the
//! drag-start state (not the previous frame) keeps the result independent
//! of how many move events the host delivers.

use crate::config::EditorConfig;
use crate::input::Modifiers;
use lc_core::{
    ContentPatch, Element, ElementId, ElementKind, ElementPatch, Point, Rect, rescale_tracks,
};

// ─── Handles ──────────────────────────────────────────────────────────────

/// The eight grab points around an element's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomRight | Handle::BottomLeft
        )
    }

    pub fn affects_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Left | Handle::BottomLeft)
    }

    pub fn affects_right(self) -> bool {
        matches!(self, Handle::TopRight | Handle::Right | Handle::BottomRight)
    }

    pub fn affects_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Top | Handle::TopRight)
    }

    pub fn affects_bottom(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::Bottom | Handle::BottomRight)
    }

    /// Where the handle sits on `frame`.
    pub fn position(self, frame: &Rect) -> Point {
        let x = if self.affects_left() {
            frame.x
        } else if self.affects_right() {
            frame.right()
        } else {
            frame.x + frame.width / 2.0
        };
        let y = if self.affects_top() {
            frame.y
        } else if self.affects_bottom() {
            frame.bottom()
        } else {
            frame.y + frame.height / 2.0
        };
        Point::new(x, y)
    }
}

/// What a resize drag grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    Frame(Handle),
    /// Boundary on the right of table column `i`.
    TableColumn(usize),
    /// Boundary below table row `i`.
    TableRow(usize),
}

/// Find the resize target under `at` for `element`, frame handles first,
/// then interior table boundaries. Rotation is ignored.
pub fn target_at(element: &Element, at: Point, tolerance: f32) -> Option<ResizeTarget> {
    let near = |p: Point| (p.x - at.x).abs() <= tolerance && (p.y - at.y).abs() <= tolerance;
    if let Some(handle) = Handle::ALL.into_iter().find(|h| near(h.position(&element.frame))) {
        return Some(ResizeTarget::Frame(handle));
    }

    let table = element.as_table()?;
    let frame = element.frame;
    let within_y = at.y >= frame.y && at.y <= frame.bottom();
    let within_x = at.x >= frame.x && at.x <= frame.right();

    if within_y {
        let mut edge = frame.x;
        for (i, w) in table.column_widths.iter().enumerate().take(table.columns.saturating_sub(1)) {
            edge += w;
            if (edge - at.x).abs() <= tolerance {
                return Some(ResizeTarget::TableColumn(i));
            }
        }
    }
    if within_x {
        let mut edge = frame.y;
        for (i, h) in table.row_heights.iter().enumerate().take(table.rows.saturating_sub(1)) {
            edge += h;
            if (edge - at.y).abs() <= tolerance {
                return Some(ResizeTarget::TableRow(i));
            }
        }
    }
    None
}

// ─── Limits ───────────────────────────────────────────────────────────────

/// Size floors applied during a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    pub min_width: f32,
    pub min_height: f32,
    pub min_table_width: f32,
    pub min_table_height: f32,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for ResizeLimits {
    fn from(config: &EditorConfig) -> Self {
        Self {
            min_width: config.min_element_width,
            min_height: config.min_element_height,
            min_table_width: config.min_table_width,
            min_table_height: config.min_table_height,
        }
    }
}

impl ResizeLimits {
    fn floor_for(&self, kind: &ElementKind) -> (f32, f32) {
        match kind {
            ElementKind::Table(_) => (self.min_table_width, self.min_table_height),
            // A straight line is legitimately zero-thick on one axis.
            ElementKind::Line(_) => (0.0, 0.0),
            _ => (self.min_width, self.min_height),
        }
    }
}

// ─── Session ──────────────────────────────────────────────────────────────

/// One resize drag, from pointer-down to release or cancel.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    target: ResizeTarget,
    start: Element,
    limits: ResizeLimits,
    last: Option<ElementPatch>,
}

impl ResizeSession {
    /// Start a drag. Returns `None` for locked elements and for table
    /// boundary targets that the element does not have.
    pub fn begin(element: &Element, target: ResizeTarget, limits: ResizeLimits) -> Option<Self> {
        if element.locked {
            log::debug!("resize refused: {} is locked", element.id);
            return None;
        }
        let valid = match target {
            ResizeTarget::Frame(_) => true,
            ResizeTarget::TableColumn(i) => element.as_table().is_some_and(|t| i < t.columns),
            ResizeTarget::TableRow(i) => element.as_table().is_some_and(|t| i < t.rows),
        };
        if !valid {
            log::debug!("resize refused: {target:?} does not apply to {}", element.id);
            return None;
        }
        Some(Self {
            target,
            start: element.clone(),
            limits,
            last: None,
        })
    }

    pub fn element(&self) -> ElementId {
        self.start.id
    }

    pub fn target(&self) -> ResizeTarget {
        self.target
    }

    /// Element state at drag start.
    pub fn start(&self) -> &Element {
        &self.start
    }

    /// Geometry for a pointer that has moved `(dx, dy)` since drag start.
    pub fn update(&mut self, dx: f32, dy: f32, modifiers: Modifiers) -> ElementPatch {
        let patch = match self.target {
            ResizeTarget::Frame(handle) => self.frame_patch(handle, dx, dy, modifiers),
            ResizeTarget::TableColumn(i) => self.column_patch(i, dx),
            ResizeTarget::TableRow(i) => self.row_patch(i, dy),
        };
        log::trace!("resize {} {:?} -> {:?}", self.start.id, self.target, patch);
        self.last = Some(patch.clone());
        patch
    }

    /// Final geometry, or `None` when the pointer never moved.
    pub fn finish(self) -> Option<ElementPatch> {
        self.last
    }

    /// Patch restoring the drag-start state.
    pub fn cancel(self) -> ElementPatch {
        ElementPatch::restore(&self.start)
    }

    fn frame_patch(&self, handle: Handle, dx: f32, dy: f32, modifiers: Modifiers) -> ElementPatch {
        let s = self.start.frame;
        let mut width = s.width;
        let mut height = s.height;
        if handle.affects_left() {
            width -= dx;
        } else if handle.affects_right() {
            width += dx;
        }
        if handle.affects_top() {
            height -= dy;
        } else if handle.affects_bottom() {
            height += dy;
        }

        let (min_w, min_h) = self.limits.floor_for(&self.start.kind);
        // Icons and SVG paths hold their ratio on every handle; Shift locks
        // any other element on corners only.
        let keep_ratio = self.start.keeps_aspect_ratio() || (handle.is_corner() && modifiers.shift);
        let lock = keep_ratio && s.width > 0.0 && s.height > 0.0;

        if lock {
            let ratio = s.width / s.height;
            let width_drives = if handle.is_corner() {
                dx.abs() >= dy.abs()
            } else {
                handle.affects_left() || handle.affects_right()
            };
            if width_drives {
                height = width / ratio;
            } else {
                width = height * ratio;
            }
            // Scale up uniformly until both floors hold.
            let grow = (min_w / width.max(f32::EPSILON))
                .max(min_h / height.max(f32::EPSILON))
                .max(1.0);
            width *= grow;
            height *= grow;
        } else {
            width = width.max(min_w);
            height = height.max(min_h);
        }

        let x = if handle.affects_left() { s.right() - width } else { s.x };
        let y = if handle.affects_top() { s.bottom() - height } else { s.y };
        let frame = Rect::new(x, y, width, height);

        let mut patch = ElementPatch::frame(frame);
        match &self.start.kind {
            ElementKind::Table(table) => {
                let mut columns = table.column_widths.clone();
                let mut rows = table.row_heights.clone();
                rescale_tracks(&mut columns, width);
                rescale_tracks(&mut rows, height);
                patch.content = Some(ContentPatch::table_tracks(columns, rows));
            }
            ElementKind::Line(line) => {
                let sx = if s.width > 0.0 { width / s.width } else { 1.0 };
                let sy = if s.height > 0.0 { height / s.height } else { 1.0 };
                let points = line
                    .points
                    .iter()
                    .map(|p| Point::new(p.x * sx, p.y * sy))
                    .collect();
                patch.content = Some(ContentPatch::line_points(points));
            }
            ElementKind::Text(_)
            | ElementKind::Shape(_)
            | ElementKind::Image(_)
            | ElementKind::Icon(_) => {}
        }
        patch
    }

    fn column_patch(&self, index: usize, dx: f32) -> ElementPatch {
        let Some(table) = self.start.as_table() else {
            return ElementPatch::default();
        };
        let mut columns = table.column_widths.clone();
        let original = columns[index];
        columns[index] = (original + dx).max(original / 2.0);
        let width: f32 = columns.iter().sum();
        ElementPatch {
            width: Some(width),
            ..ElementPatch::default()
        }
        .with_content(ContentPatch::table_tracks(columns, table.row_heights.clone()))
    }

    fn row_patch(&self, index: usize, dy: f32) -> ElementPatch {
        let Some(table) = self.start.as_table() else {
            return ElementPatch::default();
        };
        let mut rows = table.row_heights.clone();
        let original = rows[index];
        rows[index] = (original + dy).max(original / 2.0);
        let height: f32 = rows.iter().sum();
        ElementPatch {
            height: Some(height),
            ..ElementPatch::default()
        }
        .with_content(ContentPatch::table_tracks(table.column_widths.clone(), rows))
    }
}
