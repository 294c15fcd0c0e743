//! Error types for Stagehand
//!
//! Library code returns [`StagehandError`] so callers can match on the exact
//! failure. The CLI wraps errors in an [`ErrorContext`] that adds details and a
//! suggested next step before printing.
//!
//! # Error Categories
//!
//! Errors follow the taxonomy of the engine:
//! - **Configuration**: [`StagehandError::DescriptorParse`], [`StagehandError::DescriptorInvalid`],
//!   [`StagehandError::ConfigError`]. Discovery logs and skips these per theme.
//! - **Lifecycle preconditions**: [`StagehandError::ThemeNotFound`],
//!   [`StagehandError::ThemeNotInstalled`], [`StagehandError::ThemeIsActive`],
//!   [`StagehandError::ThemeFilesMissing`], [`StagehandError::DirectoryConflict`].
//!   The boolean lifecycle operations turn these into `false`.
//! - **I/O**: [`StagehandError::AssetPublishFailed`], [`StagehandError::FileSystemError`],
//!   [`StagehandError::RegistryError`].
//!
//! Resolution misses are not errors at all; they are `None` results that drive
//! the fallback chain. Rendering-engine errors live in
//! [`crate::templating::TemplateError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use stagehand_cli::core::{StagehandError, ErrorContext, user_friendly_error};
//!
//! let error = StagehandError::ThemeIsActive {
//!     slug: "aurora".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for Stagehand operations
#[derive(Error, Debug, Clone)]
pub enum StagehandError {
    /// No registry record exists for the slug
    #[error("Theme '{slug}' is not registered")]
    ThemeNotFound {
        /// Slug that was looked up
        slug: String,
    },

    /// A record exists but is not flagged as installed
    #[error("Theme '{slug}' is not installed")]
    ThemeNotInstalled {
        /// Slug of the theme
        slug: String,
    },

    /// The operation is not allowed on the active theme
    #[error("Theme '{slug}' is the active theme")]
    ThemeIsActive {
        /// Slug of the active theme
        slug: String,
    },

    /// The theme's directory disappeared from the themes root
    #[error("Theme '{slug}' files are missing: {path}")]
    ThemeFilesMissing {
        /// Slug of the theme
        slug: String,
        /// Directory that was expected to exist
        path: String,
    },

    /// Two slugs claim the same theme directory
    #[error("Theme directory '{directory}' already belongs to theme '{existing}'")]
    DirectoryConflict {
        /// Directory name under the themes root
        directory: String,
        /// Slug that already owns the directory
        existing: String,
        /// Slug that tried to claim it
        incoming: String,
    },

    /// A theme descriptor could not be read or parsed
    #[error("Invalid theme descriptor {path}: {reason}")]
    DescriptorParse {
        /// Descriptor file path
        path: String,
        /// Parser message
        reason: String,
    },

    /// A theme descriptor parsed but failed validation
    #[error("Theme descriptor {path} failed validation: {reason}")]
    DescriptorInvalid {
        /// Descriptor file path
        path: String,
        /// What was wrong
        reason: String,
    },

    /// The theme registry could not be read or written
    #[error("Theme registry error at {path}: {reason}")]
    RegistryError {
        /// Registry location
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// Copying or removing published assets failed
    #[error("Failed to publish assets for theme '{slug}': {reason}")]
    AssetPublishFailed {
        /// Slug of the theme
        slug: String,
        /// Underlying failure
        reason: String,
    },

    /// Engine configuration could not be loaded
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What went wrong
        message: String,
    },

    /// Generic file system failure
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// Operation being performed
        operation: String,
        /// Path involved
        path: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl From<std::io::Error> for StagehandError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystemError {
            operation: err.kind().to_string(),
            path: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StagehandError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other {
            message: format!("JSON error: {err}"),
        }
    }
}

impl From<toml::de::Error> for StagehandError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// # Display Format
///
/// ```text
/// error: Theme 'aurora' is the active theme
/// details: The active theme cannot be removed while it is serving pages
/// suggestion: Activate another theme first with 'stagehand themes activate <slug>'
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: StagehandError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`StagehandError`]
    #[must_use]
    pub const fn new(error: StagehandError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`StagehandError`] (directly or wrapped in an [`ErrorContext`]),
/// [`std::io::Error`], and TOML parse errors; anything else is reported with
/// its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(stagehand_error) = error.downcast_ref::<StagehandError>() {
        return create_error_context(stagehand_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(StagehandError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check ownership of the themes, public, and registry directories")
                .with_details(format!("{error:#}"));
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(StagehandError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(format!("{error:#}"));
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(StagehandError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion(
            "Check the TOML syntax in stagehand.toml. Verify quotes, brackets, and section names",
        );
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(StagehandError::Other {
        message,
    })
}

/// Map each [`StagehandError`] variant to a context with tailored suggestions.
fn create_error_context(error: StagehandError) -> ErrorContext {
    match &error {
        StagehandError::ThemeNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'stagehand themes discover' to see available themes, then 'stagehand themes install <slug>'"),

        StagehandError::ThemeNotInstalled { .. } => ErrorContext::new(error)
            .with_suggestion("Install the theme first with 'stagehand themes install <slug>'"),

        StagehandError::ThemeIsActive { .. } => ErrorContext::new(error)
            .with_suggestion("Activate another theme first with 'stagehand themes activate <slug>'")
            .with_details("The active theme cannot be removed while it is serving pages"),

        StagehandError::ThemeFilesMissing { path, .. } => {
            let details = format!("Expected a theme directory at {path}");
            ErrorContext::new(error)
                .with_suggestion("Restore the theme directory or reinstall the theme from its new location")
                .with_details(details)
        }

        StagehandError::DirectoryConflict { existing, .. } => {
            let suggestion =
                format!("Uninstall '{existing}' first or give the theme its own directory");
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Published assets are keyed by directory, so one directory can back only one theme")
        }

        StagehandError::DescriptorParse { .. } | StagehandError::DescriptorInvalid { .. } => {
            ErrorContext::new(error)
                .with_suggestion("Fix theme.json: it must be valid JSON with at least 'slug' and 'name'")
        }

        StagehandError::RegistryError { .. } => ErrorContext::new(error)
            .with_suggestion("Check that the registry path in stagehand.toml is writable")
            .with_details("The registry records installed themes and which one is active"),

        StagehandError::AssetPublishFailed { .. } => ErrorContext::new(error)
            .with_suggestion("Check permissions on the public directory and retry 'stagehand themes publish <slug>'"),

        StagehandError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check stagehand.toml or the path given with --config / STAGEHAND_CONFIG"),

        StagehandError::FileSystemError { .. } | StagehandError::Other { .. } => {
            ErrorContext::new(error)
        }
    }
}
