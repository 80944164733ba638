//! Error types and user-facing diagnostic messages.
//!
//! Every fatal error carries the requirement that failed, and the CLI
//! renders it with context lines and suggested fixes.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::compiler::CompilerVersion;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no link mode is selected.
    pub const NO_LINK_MODE: &str = "help: Pass `--static true` or `--shared true`";

    /// Suggestion when an option value is not recognized.
    pub const INVALID_OPTION: &str =
        "help: Run `cafpack info` to see the recognized option values";

    /// Suggestion when the compiler is too old.
    pub const UPGRADE_COMPILER: &str =
        "help: Install a newer compiler or select one with `--compiler`";

    /// Suggestion when the native build fails.
    pub const BUILD_FAILED: &str = "help: Run `cafpack build --verbose` for more details";
}

/// Errors raised by the configuration and packaging logic.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum RecipeError {
    /// The compiler or link mode cannot build the library.
    #[error("unsupported toolchain: {reason}{}", requirement(.minimum, .found))]
    #[diagnostic(code(cafpack::toolchain::unsupported))]
    UnsupportedToolchain {
        reason: String,
        minimum: Option<CompilerVersion>,
        found: Option<String>,
    },

    /// A user option has an unrecognized value.
    #[error("invalid value `{value}` for option `{field}`")]
    #[diagnostic(code(cafpack::options::invalid))]
    InvalidOptions { field: String, value: String },

    /// A compiler version string is not numeric.
    #[error("invalid compiler version `{0}`")]
    #[diagnostic(code(cafpack::toolchain::invalid_version))]
    InvalidVersion(String),

    /// Two define rules assigned different values to one key.
    #[error("define `{name}` already set to `{existing}`, refusing to overwrite with `{attempted}`")]
    #[diagnostic(code(cafpack::defines::conflict))]
    DefineConflict {
        name: String,
        existing: String,
        attempted: String,
    },

    /// The native build collaborator failed. Output is passed through verbatim.
    #[error("native build failed during {stage}:\n{output}")]
    #[diagnostic(code(cafpack::build::failed))]
    NativeBuildFailure { stage: String, output: String },
}

fn requirement(minimum: &Option<CompilerVersion>, found: &Option<String>) -> String {
    match (minimum, found) {
        (Some(min), Some(found)) => format!(" (requires >= {}, found {})", min, found),
        (Some(min), None) => format!(" (requires >= {})", min),
        _ => String::new(),
    }
}

impl RecipeError {
    /// Shorthand for a version-gate failure.
    pub fn too_old(family: &str, minimum: CompilerVersion, found: &CompilerVersion) -> Self {
        RecipeError::UnsupportedToolchain {
            reason: format!("{} too old", family),
            minimum: Some(minimum),
            found: Some(found.to_string()),
        }
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m".to_string(),
            (true, Severity::Warning) => "\x1b[1;33mwarning\x1b[0m".to_string(),
            (false, severity) => severity.to_string(),
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            for suggestion in &self.suggestions {
                output.push_str(&format!("{}\n", suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

impl From<&RecipeError> for Diagnostic {
    fn from(err: &RecipeError) -> Self {
        let diag = Diagnostic::error(err.to_string());
        match err {
            RecipeError::UnsupportedToolchain { minimum: None, .. } => {
                diag.with_suggestion(suggestions::NO_LINK_MODE)
            }
            RecipeError::UnsupportedToolchain { .. } | RecipeError::InvalidVersion(_) => {
                diag.with_suggestion(suggestions::UPGRADE_COMPILER)
            }
            RecipeError::InvalidOptions { field, .. } => diag
                .with_context(format!("`{}` was rejected before any build step ran", field))
                .with_suggestion(suggestions::INVALID_OPTION),
            RecipeError::DefineConflict { .. } => diag,
            RecipeError::NativeBuildFailure { .. } => {
                diag.with_suggestion(suggestions::BUILD_FAILED)
            }
        }
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
