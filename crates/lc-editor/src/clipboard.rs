//! In-editor clipboard.
//!
//! Holds deep copies of elements with their source ids stripped: copies
//! are re-keyed at copy time, and every paste hands out fresh ids again, so
//! the same clipboard can be pasted repeatedly onto any slide. Successive
//! pastes cascade by a fixed offset.

use lc_core::Element;

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    items: Vec<Element>,
    paste_count: u32,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents. Returns how many elements were copied.
    pub fn copy<'a>(&mut self, elements: impl IntoIterator<Item = &'a Element>) -> usize {
        self.items = elements.into_iter().map(Element::with_fresh_id).collect();
        self.paste_count = 0;
        log::debug!("clipboard: copied {} elements", self.items.len());
        self.items.len()
    }

    /// The buffered copies, in copy order.
    pub fn items(&self) -> &[Element] {
        &self.items
    }

    pub fn can_paste(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fresh copies for the next paste, shifted by `offset` times the
    /// number of pastes so far (including this one).
    pub fn paste(&mut self, offset: f32) -> Vec<Element> {
        if self.items.is_empty() {
            return Vec::new();
        }
        self.paste_count += 1;
        let shift = offset * self.paste_count as f32;
        self.items
            .iter()
            .map(|el| {
                let mut copy = el.with_fresh_id();
                copy.translate(shift, shift);
                copy
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.paste_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_core::{ElementId, Rect};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_paste_is_noop() {
        let mut clipboard = Clipboard::new();
        assert!(!clipboard.can_paste());
        assert!(clipboard.paste(20.0).is_empty());
    }

    #[test]
    fn pastes_cascade_with_fresh_ids() {
        let frame = Rect::new(10.0, 10.0, 80.0, 30.0);
        let source = Element::text(ElementId::intern("clip_src"), frame, "hi");
        let mut clipboard = Clipboard::new();
        assert_eq!(clipboard.copy([&source]), 1);

        let first = clipboard.paste(20.0);
        let second = clipboard.paste(20.0);
        assert_eq!(first[0].frame.x, 30.0);
        assert_eq!(second[0].frame.x, 50.0);
        assert_ne!(first[0].id, source.id);
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(first[0].kind, source.kind);
    }

    #[test]
    fn copy_strips_source_ids() {
        let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        let source = Element::text(ElementId::intern("clip_strip"), frame, "x");
        let mut clipboard = Clipboard::new();
        clipboard.copy([&source]);
        assert_ne!(clipboard.items()[0].id, source.id);
        assert_eq!(clipboard.items()[0].frame, source.frame);
        assert_ne!(clipboard.paste(20.0)[0].id, source.id);
    }

    #[test]
    fn new_copy_resets_cascade() {
        let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        let el = Element::text(ElementId::intern("clip_reset"), frame, "x");
        let mut clipboard = Clipboard::new();
        clipboard.copy([&el]);
        clipboard.paste(20.0);
        clipboard.copy([&el]);
        assert_eq!(clipboard.paste(20.0)[0].frame.x, 20.0);
    }
}
