//! The document store: the single shared, mutable presentation model.
//!
//! All reads hand out shared references; all writes go through the methods
//! below so observers and the history manager see every change. Operations
//! naming a slide or element that no longer exists are no-ops that return
//! `false` / `None`; interactive UIs routinely race stale ids against
//! deletes.

use crate::error::{LoadError, ModelError};
use crate::geometry::Rect;
use crate::id::{ElementId, SlideId};
use crate::model::*;
use crate::patch::ElementPatch;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Layer reorder operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZOrder {
    /// Move to the last index (topmost).
    BringToFront,
    /// Move to index 0 (bottommost).
    SendToBack,
    /// Swap with the next higher element.
    BringForward,
    /// Swap with the next lower element.
    SendBackward,
}

/// Change notifications delivered to subscribers after a mutation commits.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    SlideAdded { slide: SlideId, index: usize },
    SlideRemoved { slide: SlideId },
    SlideMoved { slide: SlideId, index: usize },
    /// Element list, element content or slide properties changed.
    SlideChanged { slide: SlideId },
    CurrentSlideChanged { slide: Option<SlideId> },
    PresentationChanged,
    /// The whole document was replaced (load, presentation-level undo).
    Reloaded,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Take the next handle from an observable's own counter.
    pub fn next(counter: &mut u64) -> Self {
        let id = Self(*counter);
        *counter += 1;
        id
    }
}

type Listener = Box<dyn FnMut(&DocumentEvent)>;

/// Plain serializable form of the whole document, used for persistence
/// and presentation-level history snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub presentation: Presentation,
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub current_slide: Option<SlideId>,
}

pub struct Document {
    presentation: Presentation,
    slides: HashMap<SlideId, Slide>,
    current_slide: Option<SlideId>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Presentation::new("Untitled lesson"))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("presentation", &self.presentation)
            .field("slides", &self.slides.len())
            .field("current_slide", &self.current_slide)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Document {
    /// Empty document. Any `slide_order` in `presentation` is discarded.
    pub fn new(mut presentation: Presentation) -> Self {
        presentation.slide_order.clear();
        Self {
            presentation,
            slides: HashMap::new(),
            current_slide: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ─── Observers ───────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId::next(&mut self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    fn emit(&mut self, event: DocumentEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    // ─── Read views ──────────────────────────────────────────────────────

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn slide_count(&self) -> usize {
        self.presentation.slide_order.len()
    }

    pub fn slide(&self, id: SlideId) -> Option<&Slide> {
        self.slides.get(&id)
    }

    pub fn slide_index(&self, id: SlideId) -> Option<usize> {
        self.presentation.slide_order.iter().position(|s| *s == id)
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> impl Iterator<Item = &Slide> {
        self.presentation
            .slide_order
            .iter()
            .filter_map(|id| self.slides.get(id))
    }

    pub fn element(&self, slide: SlideId, element: ElementId) -> Option<&Element> {
        self.slides.get(&slide)?.element(element)
    }

    /// Axis-aligned bounding box of an element (rotation-aware).
    pub fn element_bounds(&self, slide: SlideId, element: ElementId) -> Option<Rect> {
        self.element(slide, element).map(Element::bounds)
    }

    pub fn current_slide_id(&self) -> Option<SlideId> {
        self.current_slide
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.current_slide.and_then(|id| self.slides.get(&id))
    }

    pub fn set_current_slide(&mut self, id: Option<SlideId>) -> bool {
        if let Some(id) = id
            && !self.slides.contains_key(&id)
        {
            log::debug!("set_current_slide: unknown slide {id}");
            return false;
        }
        if self.current_slide != id {
            self.current_slide = id;
            self.emit(DocumentEvent::CurrentSlideChanged { slide: id });
        }
        true
    }

    // ─── Presentation ────────────────────────────────────────────────────

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.presentation.title = title.into();
        self.emit(DocumentEvent::PresentationChanged);
    }

    pub fn set_language(&mut self, language: LanguageMeta) {
        self.presentation.language = language;
        self.emit(DocumentEvent::PresentationChanged);
    }

    // ─── Slides ──────────────────────────────────────────────────────────

    /// Insert a blank slide at `index` (end when `None` or out of range).
    pub fn add_slide(&mut self, index: Option<usize>) -> SlideId {
        let slide = Slide::blank();
        let id = slide.id;
        self.insert_slide(slide, index);
        id
    }

    /// Insert a prepared slide. A slide whose id is already present is
    /// given a fresh id. The first slide added becomes current.
    pub fn insert_slide(&mut self, mut slide: Slide, index: Option<usize>) -> SlideId {
        while self.slides.contains_key(&slide.id) {
            slide.id = SlideId::generate();
        }
        let id = slide.id;
        let order = &mut self.presentation.slide_order;
        let index = index.map_or(order.len(), |i| i.min(order.len()));
        order.insert(index, id);
        self.slides.insert(id, slide);
        self.emit(DocumentEvent::SlideAdded { slide: id, index });
        if self.current_slide.is_none() {
            self.set_current_slide(Some(id));
        }
        id
    }

    /// Remove a slide. When it was current, the slide now at the same index
    /// becomes current, else the last slide, else none.
    pub fn delete_slide(&mut self, id: SlideId) -> bool {
        let Some(index) = self.slide_index(id) else {
            log::debug!("delete_slide: unknown slide {id}");
            return false;
        };
        self.presentation.slide_order.remove(index);
        self.slides.remove(&id);
        self.emit(DocumentEvent::SlideRemoved { slide: id });

        if self.current_slide == Some(id) {
            let order = &self.presentation.slide_order;
            let next = order.get(index).or_else(|| order.last()).copied();
            self.current_slide = next;
            self.emit(DocumentEvent::CurrentSlideChanged { slide: next });
        }
        true
    }

    /// Deep-copy a slide (fresh slide and element ids) and insert the copy
    /// right after the source.
    pub fn duplicate_slide(&mut self, id: SlideId) -> Option<SlideId> {
        let index = self.slide_index(id)?;
        let copy = self.slides.get(&id)?.deep_clone_fresh();
        Some(self.insert_slide(copy, Some(index + 1)))
    }

    pub fn move_slide(&mut self, id: SlideId, index: usize) -> bool {
        let Some(from) = self.slide_index(id) else {
            log::debug!("move_slide: unknown slide {id}");
            return false;
        };
        let order = &mut self.presentation.slide_order;
        let to = index.min(order.len() - 1);
        if from == to {
            return false;
        }
        let slide = order.remove(from);
        order.insert(to, slide);
        self.emit(DocumentEvent::SlideMoved { slide: id, index: to });
        true
    }

    pub fn set_background(&mut self, id: SlideId, background: Background) -> bool {
        self.with_slide(id, |slide| {
            slide.background = background;
            true
        })
    }

    pub fn set_notes(&mut self, id: SlideId, notes: impl Into<String>) -> bool {
        let notes = notes.into();
        self.with_slide(id, |slide| {
            slide.notes = notes;
            true
        })
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Append an element on top of the slide. A colliding id is replaced
    /// by a fresh one; the id actually used is returned.
    pub fn add_element(&mut self, slide: SlideId, mut element: Element) -> Option<ElementId> {
        let target = self.slides.get_mut(&slide)?;
        while target.index_of(element.id).is_some() {
            element.id = ElementId::generate();
        }
        let id = element.id;
        target.elements.push(element);
        self.emit(DocumentEvent::SlideChanged { slide });
        Some(id)
    }

    pub fn update_element(
        &mut self,
        slide: SlideId,
        element: ElementId,
        patch: &ElementPatch,
    ) -> bool {
        self.with_slide(slide, |s| match s.element_mut(element) {
            Some(el) => {
                patch.apply(el);
                true
            }
            None => {
                log::debug!("update_element: unknown element {element} on {slide}");
                false
            }
        })
    }

    /// Apply several patches in one step (one change notification).
    /// Unknown ids are skipped. Returns how many elements were patched.
    pub fn batch_update_elements(
        &mut self,
        slide: SlideId,
        patches: &[(ElementId, ElementPatch)],
    ) -> usize {
        let Some(target) = self.slides.get_mut(&slide) else {
            log::debug!("batch_update_elements: unknown slide {slide}");
            return 0;
        };
        let mut applied = 0;
        for (id, patch) in patches {
            if let Some(el) = target.element_mut(*id) {
                patch.apply(el);
                applied += 1;
            }
        }
        if applied > 0 {
            self.emit(DocumentEvent::SlideChanged { slide });
        }
        applied
    }

    pub fn delete_element(&mut self, slide: SlideId, element: ElementId) -> bool {
        self.delete_elements(slide, &[element]) > 0
    }

    /// Remove every listed element. Returns how many were removed.
    pub fn delete_elements(&mut self, slide: SlideId, elements: &[ElementId]) -> usize {
        let Some(target) = self.slides.get_mut(&slide) else {
            return 0;
        };
        let doomed: HashSet<ElementId> = elements.iter().copied().collect();
        let before = target.elements.len();
        target.elements.retain(|e| !doomed.contains(&e.id));
        let removed = before - target.elements.len();
        if removed > 0 {
            self.emit(DocumentEvent::SlideChanged { slide });
        }
        removed
    }

    /// Reorder one element. Returns `false` (array untouched) when the
    /// element is already at the requested extreme.
    pub fn reorder_element(&mut self, slide: SlideId, element: ElementId, op: ZOrder) -> bool {
        let Some(target) = self.slides.get(&slide) else {
            return false;
        };
        let Some(from) = target.index_of(element) else {
            log::debug!("reorder_element: unknown element {element} on {slide}");
            return false;
        };
        let last = target.elements.len() - 1;
        let to = match op {
            ZOrder::BringToFront => last,
            ZOrder::SendToBack => 0,
            ZOrder::BringForward => (from + 1).min(last),
            ZOrder::SendBackward => from.saturating_sub(1),
        };
        self.move_element_to(slide, element, to)
    }

    /// Move an element to `index` in the z-order (clamped to the top).
    pub fn move_element_to(&mut self, slide: SlideId, element: ElementId, index: usize) -> bool {
        let Some(target) = self.slides.get_mut(&slide) else {
            return false;
        };
        let Some(from) = target.index_of(element) else {
            return false;
        };
        let to = index.min(target.elements.len() - 1);
        if from == to {
            return false;
        }
        let el = target.elements.remove(from);
        target.elements.insert(to, el);
        self.emit(DocumentEvent::SlideChanged { slide });
        true
    }

    /// Replace a slide's whole element list (history restore).
    pub fn replace_elements(&mut self, slide: SlideId, elements: Vec<Element>) -> bool {
        self.with_slide(slide, |s| {
            s.elements = elements;
            true
        })
    }

    fn with_slide(&mut self, id: SlideId, f: impl FnOnce(&mut Slide) -> bool) -> bool {
        let Some(slide) = self.slides.get_mut(&id) else {
            log::debug!("unknown slide {id}");
            return false;
        };
        let changed = f(slide);
        if changed {
            self.emit(DocumentEvent::SlideChanged { slide: id });
        }
        changed
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn to_snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            presentation: self.presentation.clone(),
            slides: self.slides().cloned().collect(),
            current_slide: self.current_slide,
        }
    }

    /// Replace the whole document with `snapshot`. Subscribers are kept.
    pub fn restore_snapshot(&mut self, snapshot: DocumentSnapshot) -> Result<(), ModelError> {
        let DocumentSnapshot {
            mut presentation,
            slides,
            current_slide,
        } = snapshot;

        let mut by_id = HashMap::with_capacity(slides.len());
        for slide in slides {
            slide.validate()?;
            by_id.insert(slide.id, slide);
        }
        let mut seen = HashSet::new();
        for id in &presentation.slide_order {
            if !by_id.contains_key(id) {
                return Err(ModelError::UnknownSlide(id.to_string()));
            }
            if !seen.insert(*id) {
                return Err(ModelError::DuplicateSlide(id.to_string()));
            }
        }
        // Slides persisted without an order entry are appended.
        let mut orphans: Vec<SlideId> = by_id
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();
        orphans.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        presentation.slide_order.extend(orphans);

        let current = current_slide
            .filter(|id| by_id.contains_key(id))
            .or_else(|| presentation.slide_order.first().copied());

        self.presentation = presentation;
        self.slides = by_id;
        self.current_slide = current;
        self.emit(DocumentEvent::Reloaded);
        Ok(())
    }

    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Result<Self, ModelError> {
        let mut doc = Document::default();
        doc.restore_snapshot(snapshot)?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_snapshot())
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let snapshot: DocumentSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot)?)
    }
}
