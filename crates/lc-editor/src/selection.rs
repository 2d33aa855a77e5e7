//! Selection state and marquee hit testing.
//!
//! The selection is transient editor state: which slide the user is working
//! on, which of its elements are selected (in click order, not z-order) and
//! the live marquee rectangle while rubber-band dragging.

use lc_core::{Document, ElementId, Point, Rect, SlideId, SubscriptionId};
use smallvec::SmallVec;

/// Live rubber-band rectangle, stored as the raw drag corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub origin: Point,
    pub current: Point,
}

impl Marquee {
    /// Normalized rectangle between the two drag corners.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.origin, self.current)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    SlideSelected { slide: Option<SlideId> },
    ElementsChanged { elements: Vec<ElementId> },
    MarqueeChanged { rect: Option<Rect> },
}

type Listener = Box<dyn FnMut(&SelectionEvent)>;

#[derive(Default)]
pub struct Selection {
    slide: Option<SlideId>,
    elements: SmallVec<[ElementId; 8]>,
    marquee: Option<Marquee>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("slide", &self.slide)
            .field("elements", &self.elements)
            .field("marquee", &self.marquee)
            .finish_non_exhaustive()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SelectionEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId::next(&mut self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    fn emit(&mut self, event: SelectionEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    fn emit_elements(&mut self) {
        let elements = self.elements.to_vec();
        self.emit(SelectionEvent::ElementsChanged { elements });
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn slide(&self) -> Option<SlideId> {
        self.slide
    }

    /// Selected element ids in click order.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.elements.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The only selected element, when exactly one is selected.
    pub fn single(&self) -> Option<ElementId> {
        match self.elements.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn marquee(&self) -> Option<Marquee> {
        self.marquee
    }

    /// Selected elements that may be mutated in bulk: still present on the
    /// selected slide and not locked. Click order is preserved.
    pub fn movable(&self, doc: &Document) -> Vec<ElementId> {
        let Some(slide) = self.slide.and_then(|id| doc.slide(id)) else {
            return Vec::new();
        };
        self.elements
            .iter()
            .copied()
            .filter(|id| slide.element(*id).is_some_and(|el| !el.locked))
            .collect()
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Focus a slide. Element selection and any marquee are reset.
    pub fn select_slide(&mut self, id: Option<SlideId>) {
        let slide_changed = self.slide != id;
        self.slide = id;
        self.marquee = None;
        if !self.elements.is_empty() {
            self.elements.clear();
            self.emit_elements();
        }
        if slide_changed {
            self.emit(SelectionEvent::SlideSelected { slide: id });
        }
    }

    /// Plain click replaces the selection; additive (shift) click toggles
    /// `id`, keeping the order of the remaining ids.
    pub fn select_element(&mut self, id: ElementId, additive: bool) {
        if additive {
            if let Some(pos) = self.elements.iter().position(|e| *e == id) {
                self.elements.remove(pos);
            } else {
                self.elements.push(id);
            }
        } else {
            if self.elements.as_slice() == [id] {
                return;
            }
            self.elements.clear();
            self.elements.push(id);
        }
        self.emit_elements();
    }

    /// Replace the element selection wholesale (duplicates dropped).
    pub fn set_elements(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.elements.clear();
        for id in ids {
            if !self.elements.contains(&id) {
                self.elements.push(id);
            }
        }
        self.emit_elements();
    }

    /// Add ids not yet selected, keeping existing order.
    pub fn extend_elements(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        let before = self.elements.len();
        for id in ids {
            if !self.elements.contains(&id) {
                self.elements.push(id);
            }
        }
        if self.elements.len() != before {
            self.emit_elements();
        }
    }

    pub fn clear_elements(&mut self) {
        if !self.elements.is_empty() {
            self.elements.clear();
            self.emit_elements();
        }
    }

    /// Full reset: no slide, no elements, no marquee.
    pub fn clear(&mut self) {
        self.cancel_marquee();
        self.clear_elements();
        if self.slide.take().is_some() {
            self.emit(SelectionEvent::SlideSelected { slide: None });
        }
    }

    /// Select every visible, unlocked element of the selected slide.
    pub fn select_all(&mut self, doc: &Document) {
        let Some(slide) = self.slide.and_then(|id| doc.slide(id)) else {
            return;
        };
        let ids: Vec<ElementId> = slide
            .elements
            .iter()
            .filter(|el| el.visible && !el.locked)
            .map(|el| el.id)
            .collect();
        self.set_elements(ids);
    }

    /// Drop ids that no longer exist on the selected slide (after undo,
    /// delete or a reload).
    pub fn retain_existing(&mut self, doc: &Document) {
        let slide = self.slide.and_then(|id| doc.slide(id));
        let before = self.elements.len();
        match slide {
            Some(slide) => self.elements.retain(|id| slide.element(*id).is_some()),
            None => self.elements.clear(),
        }
        if self.elements.len() != before {
            self.emit_elements();
        }
    }

    // ─── Marquee ─────────────────────────────────────────────────────────

    pub fn begin_marquee(&mut self, at: Point) {
        self.marquee = Some(Marquee {
            origin: at,
            current: at,
        });
        self.emit(SelectionEvent::MarqueeChanged {
            rect: Some(Rect::new(at.x, at.y, 0.0, 0.0)),
        });
    }

    pub fn update_marquee(&mut self, at: Point) {
        if let Some(m) = &mut self.marquee {
            m.current = at;
            let rect = m.rect();
            self.emit(SelectionEvent::MarqueeChanged { rect: Some(rect) });
        }
    }

    /// Close the marquee and select what it overlaps. Drags smaller than
    /// `min_extent` on both axes select nothing. Returns the hit ids.
    pub fn finish_marquee(
        &mut self,
        doc: &Document,
        additive: bool,
        min_extent: f32,
    ) -> Vec<ElementId> {
        let Some(marquee) = self.marquee.take() else {
            return Vec::new();
        };
        self.emit(SelectionEvent::MarqueeChanged { rect: None });

        let rect = marquee.rect();
        if rect.width < min_extent && rect.height < min_extent {
            return Vec::new();
        }
        let Some(slide) = self.slide else {
            return Vec::new();
        };
        let hits = elements_in_rect(doc, slide, rect);
        if additive {
            self.extend_elements(hits.iter().copied());
        } else {
            self.set_elements(hits.iter().copied());
        }
        hits
    }

    pub fn cancel_marquee(&mut self) {
        if self.marquee.take().is_some() {
            self.emit(SelectionEvent::MarqueeChanged { rect: None });
        }
    }
}

/// Elements of `slide` whose bounds overlap `rect`, bottom to top.
///
/// `rect` may come straight from a drag with negative extents; it is
/// normalized first. Touching edges do not count as overlap. Locked and
/// hidden elements are never returned.
pub fn elements_in_rect(doc: &Document, slide: SlideId, rect: Rect) -> Vec<ElementId> {
    let Some(slide) = doc.slide(slide) else {
        return Vec::new();
    };
    let rect = rect.normalized();
    slide
        .elements
        .iter()
        .filter(|el| el.visible && !el.locked && el.bounds().overlaps(&rect))
        .map(|el| el.id)
        .collect()
}

/// Topmost visible element under `at`, if any.
pub fn hit_test(doc: &Document, slide: SlideId, at: Point) -> Option<ElementId> {
    doc.slide(slide)?
        .elements
        .iter()
        .rev()
        .find(|el| el.visible && el.bounds().contains_point(at))
        .map(|el| el.id)
}
