//! Linear undo/redo over whole-layout snapshots.
//!
//! Entries are recorded *before* a mutation runs, so undoing restores exactly
//! what existed before the undone action. The first undo from the tip also
//! stores the live state, which is what redo returns to.

use crate::layout::LayoutState;

#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<LayoutState>,
    /// Index of the entry matching the live state, or `entries.len()` when the
    /// live state is newer than every entry.
    cursor: usize,
    max_entries: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that forgets its oldest entries beyond `max_entries`.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::default()
        }
    }

    /// Record a deep copy of `live` as the pre-image of the next mutation.
    pub fn snapshot(&mut self, live: &LayoutState) {
        self.push(live.clone());
    }

    /// Record `pre_image`, discarding every entry after the cursor.
    pub fn push(&mut self, pre_image: LayoutState) {
        self.entries.truncate(self.cursor);
        self.entries.push(pre_image);
        self.cursor = self.entries.len();

        if let Some(max) = self.max_entries {
            while self.entries.len() > max {
                self.entries.remove(0);
                self.cursor -= 1;
            }
        }
    }

    /// Step back one entry. Returns `false` at the oldest entry.
    pub fn undo(&mut self, live: &mut LayoutState) -> bool {
        if self.cursor == 0 {
            return false;
        }
        if self.cursor == self.entries.len() {
            self.entries.push(live.clone());
        }
        self.cursor -= 1;
        *live = self.entries[self.cursor].clone();
        true
    }

    /// Step forward one entry. Returns `false` at the newest entry.
    pub fn redo(&mut self, live: &mut LayoutState) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        *live = self.entries[self.cursor].clone();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
