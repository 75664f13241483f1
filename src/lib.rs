//! upgrade-interactive - interactive dependency upgrades for Node.js workspaces
//!
//! This library provides the decision engine behind the interactive upgrade:
//! - Exclusion rules (`[<workspace-or-dir>#]<name-glob>[@<range-or-glob>]`)
//!   and their matcher
//! - Progressive resolution of upgrade suggestions (current, compatible,
//!   latest) with bounded work-ahead and an order-stable display list
//! - Folding the user's choices back into the workspace manifests

pub mod cli;
pub mod domain;
pub mod error;
pub mod exclusion;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod project;
pub mod range;
pub mod registry;
pub mod select;
pub mod settings;
pub mod suggest;
