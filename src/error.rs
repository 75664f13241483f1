//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ExclusionError: Malformed `--exclude` tokens (usage errors)
//! - WorkspaceError: Unknown workspace names requested on the command line
//! - ManifestError: Issues reading or parsing package.json manifests
//! - RegistryError: Issues with package registry communication
//! - ConfigError: Issues with the invocation environment or settings
//! - PromptError: Unusable answers typed at the selection prompt

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Exclusion rule related errors
    #[error(transparent)]
    Exclusion(#[from] ExclusionError),

    /// Workspace selection related errors
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced while parsing exclusion rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExclusionError {
    /// The token has the wrong number of `#` or `@` separated segments
    #[error("invalid exclusion format: '{token}' (expected [<workspace-or-dir>#]<name>[@<range>])")]
    InvalidExclusionFormat { token: String },

    /// A glob could not be compiled into a matcher
    #[error("invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors related to workspace selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// A workspace named on the command line does not exist in the project
    #[error("workspace '{name}' not found in project")]
    UnknownWorkspace { name: String },
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// A `workspaces` glob in the root manifest is malformed
    #[error("invalid workspace pattern '{pattern}' in {path}: {message}")]
    InvalidWorkspacePattern {
        path: PathBuf,
        pattern: String,
        message: String,
    },
}

/// Errors related to package registry communication
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration and environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The command needs a terminal on both stdin and stdout
    #[error("this command can only be run in an interactive terminal")]
    NonInteractive,

    /// Invalid viewport size
    #[error("invalid viewport size '{value}': expected a positive integer")]
    InvalidViewportSize { value: String },

    /// Invalid project settings
    #[error("invalid upgradeInteractive settings in {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },
}

/// Errors in a line typed at the selection prompt; the prompt asks again
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// The token is not `<row>[c|l|k]`
    #[error("cannot understand '{token}' (expected e.g. 3, 3c or 3l)")]
    InvalidToken { token: String },

    /// The row number is not on the list
    #[error("there is no row {row} (rows 1-{rows})")]
    RowOutOfRange { row: usize, rows: usize },

    /// The chosen option is not offered for the row
    #[error("row {row} has no {option} upgrade")]
    OptionUnavailable { row: usize, option: &'static str },
}

impl ExclusionError {
    /// Creates a new InvalidExclusionFormat error
    pub fn invalid_format(token: impl Into<String>) -> Self {
        ExclusionError::InvalidExclusionFormat {
            token: token.into(),
        }
    }
}

impl WorkspaceError {
    /// Creates a new UnknownWorkspace error
    pub fn unknown(name: impl Into<String>) -> Self {
        WorkspaceError::UnknownWorkspace { name: name.into() }
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}
