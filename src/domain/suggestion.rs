//! Suggestion options, suggestion sets and user selections

use super::{CandidateId, DependencyCandidate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One upgrade option offered for a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionOption {
    /// Range to write when chosen; `None` means "no change"
    pub value: Option<String>,
    /// Presentation string (possibly colorized); carries no semantics
    pub label: String,
}

impl SuggestionOption {
    /// The always-present "keep current" option
    pub fn current(range: impl Into<String>) -> Self {
        Self {
            value: None,
            label: range.into(),
        }
    }

    /// An option that changes the declared range
    pub fn upgrade(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            label: label.into(),
        }
    }

    /// Placeholder for a slot with nothing to offer
    pub fn empty() -> Self {
        Self {
            value: None,
            label: String::new(),
        }
    }

    /// Returns true if the option has something to show
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }
}

/// The three options (current, compatible, latest) of one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub candidate: DependencyCandidate,
    pub options: [SuggestionOption; 3],
}

impl SuggestionSet {
    pub const CURRENT: usize = 0;
    pub const COMPATIBLE: usize = 1;
    pub const LATEST: usize = 2;

    pub fn new(candidate: DependencyCandidate, options: [SuggestionOption; 3]) -> Self {
        Self { candidate, options }
    }

    pub fn current(&self) -> &SuggestionOption {
        &self.options[Self::CURRENT]
    }

    pub fn compatible(&self) -> &SuggestionOption {
        &self.options[Self::COMPATIBLE]
    }

    pub fn latest(&self) -> &SuggestionOption {
        &self.options[Self::LATEST]
    }

    /// Number of options with a non-empty label
    pub fn labeled_options(&self) -> usize {
        self.options.iter().filter(|o| o.has_label()).count()
    }

    /// A set is worth showing only if something besides "current" is labeled
    pub fn has_upgrade(&self) -> bool {
        self.labeled_options() >= 2
    }
}

/// Outcome of resolving one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A set with at least one upgrade option
    Ready(SuggestionSet),
    /// Nothing to offer; never shown
    Dropped,
}

impl Resolution {
    /// Wraps a set, dropping it when it offers no upgrade
    pub fn from_set(set: SuggestionSet) -> Self {
        if set.has_upgrade() {
            Resolution::Ready(set)
        } else {
            Resolution::Dropped
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Resolution::Dropped)
    }

    pub fn into_set(self) -> Option<SuggestionSet> {
        match self {
            Resolution::Ready(set) => Some(set),
            Resolution::Dropped => None,
        }
    }
}

/// The user's choices, keyed by candidate identity
///
/// A missing entry and an entry holding `None` both mean "unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    choices: HashMap<CandidateId, Option<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the chosen value for a candidate
    pub fn choose(&mut self, id: CandidateId, value: Option<String>) {
        self.choices.insert(id, value);
    }

    /// Builder variant of [`Selection::choose`]
    pub fn with_choice(mut self, id: CandidateId, value: impl Into<String>) -> Self {
        self.choose(id, Some(value.into()));
        self
    }

    /// Returns the chosen range if the candidate should change
    pub fn chosen_range(&self, id: &CandidateId) -> Option<&str> {
        self.choices.get(id).and_then(|v| v.as_deref())
    }

    /// Number of candidates with a non-null choice
    pub fn change_count(&self) -> usize {
        self.choices.values().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyKind, WorkspaceIdent};

    fn candidate() -> DependencyCandidate {
        DependencyCandidate::new(
            "lodash",
            "^4.0.0",
            WorkspaceIdent::new("app"),
            DependencyKind::Dependencies,
        )
    }

    #[test]
    fn test_set_without_upgrade_is_dropped() {
        let set = SuggestionSet::new(
            candidate(),
            [
                SuggestionOption::current("^4.0.0"),
                SuggestionOption::empty(),
                SuggestionOption::empty(),
            ],
        );
        assert_eq!(set.labeled_options(), 1);
        assert!(Resolution::from_set(set).is_dropped());
    }

    #[test]
    fn test_set_with_latest_only_is_ready() {
        let set = SuggestionSet::new(
            candidate(),
            [
                SuggestionOption::current("^4.0.0"),
                SuggestionOption::empty(),
                SuggestionOption::upgrade("^5.0.0", "^5.0.0"),
            ],
        );
        let resolution = Resolution::from_set(set);
        assert!(!resolution.is_dropped());
        let set = resolution.into_set().unwrap();
        assert_eq!(set.latest().value.as_deref(), Some("^5.0.0"));
        assert!(set.current().value.is_none());
    }

    #[test]
    fn test_selection_null_choice_means_unchanged() {
        let id = CandidateId::new("lodash", "^4.0.0");
        let mut selection = Selection::new();
        selection.choose(id.clone(), None);
        assert!(selection.is_empty());
        assert_eq!(selection.chosen_range(&id), None);

        selection.choose(id.clone(), Some("^4.17.21".to_string()));
        assert_eq!(selection.chosen_range(&id), Some("^4.17.21"));
        assert_eq!(selection.change_count(), 1);
    }
}
