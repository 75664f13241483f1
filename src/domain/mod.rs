//! Core domain models for upgrade-interactive
//!
//! This module contains the fundamental types used throughout the application:
//! - Workspace identifiers and their declared dependency entries
//! - Dependency candidates offered for upgrade
//! - Suggestion options, suggestion sets and user selections

mod candidate;
mod suggestion;
mod workspace;

pub use candidate::{CandidateId, DependencyCandidate};
pub use suggestion::{Resolution, Selection, SuggestionOption, SuggestionSet};
pub use workspace::{DependencyEntry, DependencyKind, Workspace, WorkspaceIdent};
