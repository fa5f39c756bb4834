//! Undo/redo stacks of full state snapshots.
//!
//! A `History` is owned by the application root and handed to the
//! dispatcher, so two editors never share stacks.

use std::collections::VecDeque;

/// Default number of undo snapshots to keep.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Bounded undo/redo stacks plus a single side slot for the tour snapshot.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: VecDeque<T>,
    redo_stack: VecDeque<T>,
    max_depth: usize,
    pre_tour: Option<T>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl<T> History<T> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
            pre_tour: None,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the depth, dropping the oldest snapshots that no longer fit.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        Self::trim(&mut self.undo_stack, max_depth);
        Self::trim(&mut self.redo_stack, max_depth);
    }

    fn trim(stack: &mut VecDeque<T>, max_depth: usize) {
        while stack.len() > max_depth {
            stack.pop_front();
        }
    }

    /// Record `snapshot` before a reversible change. Clears the redo stack.
    pub fn push(&mut self, snapshot: T) {
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
        Self::trim(&mut self.undo_stack, self.max_depth);
    }

    /// Step back. `current` moves onto the redo stack and the most recent
    /// snapshot is returned; `None` when there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        Self::trim(&mut self.redo_stack, self.max_depth);
        Some(previous)
    }

    /// Step forward again; the inverse of [`History::undo`].
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current);
        Self::trim(&mut self.undo_stack, self.max_depth);
        Some(next)
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

    /// Forget every snapshot (the tour slot included).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pre_tour = None;
    }

    /// Keep the state from before a tour, replacing any earlier one.
    pub fn stash_tour(&mut self, snapshot: T) {
        self.pre_tour = Some(snapshot);
    }

    /// Take the stored pre-tour state, leaving the slot empty.
    pub fn take_tour(&mut self) -> Option<T> {
        self.pre_tour.take()
    }

    pub fn in_tour(&self) -> bool {
        self.pre_tour.is_some()
    }
}
