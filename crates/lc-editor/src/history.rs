//! Undo/redo history.
//!
//! History is **snapshot based**: before a gesture mutates the document the
//! affected state is captured, and when the gesture ends the capture is
//! pushed as one entry if anything actually changed. A whole drag (dozens
//! of live updates) therefore undoes in a single step.
//!
//! ```text
//! Idle --snapshot_before_change--> Recording --commit/discard--> Idle
//! ```

use lc_core::{Document, DocumentSnapshot, Element, SlideId};
use std::collections::VecDeque;

/// What a history entry captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The element list of one slide.
    Slide(SlideId),
    /// Slide set, slide order, current slide and presentation metadata.
    Presentation,
}

#[derive(Debug, Clone, PartialEq)]
enum Snapshot {
    Slide { slide: SlideId, elements: Vec<Element> },
    Presentation(Box<DocumentSnapshot>),
}

impl Snapshot {
    fn capture(doc: &Document, scope: Scope) -> Option<Self> {
        match scope {
            Scope::Slide(slide) => Some(Snapshot::Slide {
                slide,
                elements: doc.slide(slide)?.elements.clone(),
            }),
            Scope::Presentation => Some(Snapshot::Presentation(Box::new(doc.to_snapshot()))),
        }
    }

    fn scope(&self) -> Scope {
        match self {
            Snapshot::Slide { slide, .. } => Scope::Slide(*slide),
            Snapshot::Presentation(_) => Scope::Presentation,
        }
    }

    fn restore(self, doc: &mut Document) -> bool {
        match self {
            Snapshot::Slide { slide, elements } => doc.replace_elements(slide, elements),
            Snapshot::Presentation(snapshot) => match doc.restore_snapshot(*snapshot) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("history snapshot failed to restore: {e}");
                    false
                }
            },
        }
    }
}

/// One undoable step: the state before the change (on the undo stack) or
/// after it (on the redo stack).
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    label: String,
    snapshot: Snapshot,
}

impl HistoryEntry {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn scope(&self) -> Scope {
        self.snapshot.scope()
    }
}

#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
    /// Capture taken at gesture start; `Some` while recording.
    pending: Option<HistoryEntry>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            pending: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.pending.is_some()
    }

    /// Begin recording a gesture. Nested calls while already recording are
    /// ignored so the outermost gesture owns the entry; returns whether a
    /// new recording started.
    pub fn snapshot_before_change(&mut self, doc: &Document, scope: Scope, label: &str) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let Some(snapshot) = Snapshot::capture(doc, scope) else {
            log::debug!("history: nothing to capture for {scope:?}");
            return false;
        };
        self.pending = Some(HistoryEntry {
            label: label.to_string(),
            snapshot,
        });
        true
    }

    /// Close the recording. Pushes an entry only when the captured state
    /// differs from the document now; returns whether one was pushed.
    pub fn commit(&mut self, doc: &Document) -> bool {
        let Some(entry) = self.pending.take() else {
            return false;
        };
        let now = Snapshot::capture(doc, entry.snapshot.scope());
        if now.as_ref() == Some(&entry.snapshot) {
            log::trace!("history: {:?} changed nothing", entry.label);
            return false;
        }
        log::debug!("history: push {:?}", entry.label);
        self.undo_stack.push_back(entry);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        true
    }

    /// Drop the recording without pushing anything. Restoring the
    /// document is the caller's job.
    pub fn discard(&mut self) {
        self.pending = None;
    }

    /// Snapshot, run `f`, commit.
    pub fn record<R>(
        &mut self,
        doc: &mut Document,
        scope: Scope,
        label: &str,
        f: impl FnOnce(&mut Document) -> R,
    ) -> R {
        let started = self.snapshot_before_change(doc, scope, label);
        let out = f(doc);
        if started {
            self.commit(doc);
        }
        out
    }

    /// Revert the most recent entry. Returns its label.
    pub fn undo(&mut self, doc: &mut Document) -> Option<String> {
        self.discard();
        while let Some(entry) = self.undo_stack.pop_back() {
            match swap(doc, entry) {
                Some((label, inverse)) => {
                    self.redo_stack.push(inverse);
                    return Some(label);
                }
                None => continue,
            }
        }
        None
    }

    /// Re-apply the most recently undone entry. Returns its label.
    pub fn redo(&mut self, doc: &mut Document) -> Option<String> {
        self.discard();
        while let Some(entry) = self.redo_stack.pop() {
            match swap(doc, entry) {
                Some((label, inverse)) => {
                    self.undo_stack.push_back(inverse);
                    return Some(label);
                }
                None => continue,
            }
        }
        None
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the entry `undo` would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(HistoryEntry::label)
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(HistoryEntry::label)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }
}

/// Restore `entry` and return the capture it replaced. Entries whose slide
/// has since disappeared are dropped.
fn swap(doc: &mut Document, entry: HistoryEntry) -> Option<(String, HistoryEntry)> {
    let HistoryEntry { label, snapshot } = entry;
    let Some(current) = Snapshot::capture(doc, snapshot.scope()) else {
        log::debug!("history: dropping {label:?}, its slide is gone");
        return None;
    };
    if !snapshot.restore(doc) {
        return None;
    }
    let inverse = HistoryEntry {
        label: label.clone(),
        snapshot: current,
    };
    Some((label, inverse))
}
