//! Order-stable display list filled by the scheduler
//!
//! Rows start as `Loading` placeholders. Filled rows always form a prefix of
//! the list: a result is written at the cursor (the first placeholder) and
//! the cursor advances, so a fill is O(1) and the relative order of results
//! follows commit order. Compaction drops the remaining placeholders.

use crate::domain::{Resolution, SuggestionSet};

/// One row of the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRow {
    /// Placeholder for a result that has not been committed yet
    Loading,
    /// A committed suggestion set
    Ready(SuggestionSet),
}

impl DisplayRow {
    pub fn as_set(&self) -> Option<&SuggestionSet> {
        match self {
            DisplayRow::Ready(set) => Some(set),
            DisplayRow::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayRow::Loading)
    }
}

/// Lifecycle of one candidate inside a scheduling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    Empty,
    Loading,
    Filled,
    Dropped,
}

/// Rows, cursor and per-candidate state of a scheduling run
#[derive(Debug, Clone)]
pub struct DisplayList {
    rows: Vec<DisplayRow>,
    states: Vec<CandidateState>,
    cursor: usize,
}

impl DisplayList {
    /// Create a list with one placeholder per candidate
    pub fn new(len: usize) -> Self {
        Self {
            rows: vec![DisplayRow::Loading; len],
            states: vec![CandidateState::Empty; len],
            cursor: 0,
        }
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    /// Index of the first placeholder
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self, index: usize) -> Option<CandidateState> {
        self.states.get(index).copied()
    }

    /// Number of placeholders still waiting for a result
    pub fn pending(&self) -> usize {
        self.rows.len() - self.cursor
    }

    /// Record that a candidate's resolution started
    pub fn mark_loading(&mut self, index: usize) {
        if let Some(state) = self.states.get_mut(index) {
            if *state == CandidateState::Empty {
                *state = CandidateState::Loading;
            }
        }
    }

    /// Commit one resolution; returns true if a row was filled
    pub fn fill(&mut self, index: usize, resolution: Resolution) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        if matches!(state, CandidateState::Filled | CandidateState::Dropped) {
            return false;
        }

        match resolution {
            Resolution::Ready(set) if self.cursor < self.rows.len() => {
                *state = CandidateState::Filled;
                self.rows[self.cursor] = DisplayRow::Ready(set);
                self.cursor += 1;
                true
            }
            _ => {
                *state = CandidateState::Dropped;
                false
            }
        }
    }

    /// Commit a whole group at once, in group order; returns the number of
    /// rows filled
    pub fn splice(&mut self, group: Vec<(usize, Resolution)>) -> usize {
        group
            .into_iter()
            .map(|(index, resolution)| self.fill(index, resolution))
            .filter(|filled| *filled)
            .count()
    }

    /// Remove the placeholders that were never filled
    pub fn compact(&mut self) {
        self.rows.truncate(self.cursor);
    }

    /// The committed suggestion sets, in display order
    pub fn into_sets(self) -> Vec<SuggestionSet> {
        self.rows
            .into_iter()
            .filter_map(|row| match row {
                DisplayRow::Ready(set) => Some(set),
                DisplayRow::Loading => None,
            })
            .collect()
    }
}
