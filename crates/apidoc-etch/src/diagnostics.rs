//! Error types and diagnostics
//!
//! This module provides error handling and the leveled diagnostic sink
//! the generation pipeline hands back to its caller.

use std::io;
use std::path::PathBuf;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use thiserror::Error;

/// Result type for apidoc-etch operations
pub type DocResult<T> = Result<T, DocError>;

/// Main error type for apidoc-etch
#[derive(Debug, Error)]
pub enum DocError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Doc-comment markup is not well-formed
    #[error("Markup error: {0}")]
    Markup(String),

    /// Declaration dump could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML dataset or configuration could not be decoded
    #[error("TOML error in {file}: {message}")]
    Toml { file: PathBuf, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input path does not exist
    #[error("Unknown file or directory: {0}")]
    InvalidInputPath(PathBuf),

    /// Input file type is not a declaration dump
    #[error("Only declaration dumps (*.json) are supported: {0}")]
    UnsupportedInput(PathBuf),

    /// Options class has no entry in the classification table
    #[error("Options class '{0}' is not categorized.")]
    Unclassified(String),

    /// Classification table references a category it does not define
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Rendering of a single entity failed
    #[error("Render error: {0}")]
    Render(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl DocError {
    /// Create a markup error
    pub fn markup(message: impl Into<String>) -> Self {
        DocError::Markup(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        DocError::Config(message.into())
    }

    /// Create a TOML error for a file
    pub fn toml(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DocError::Toml {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        DocError::Render(message.into())
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        DocError::Other(message.into())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Error - the entity is left out of the documentation
    Error,
    /// Warning - doc generation continues
    Warning,
    /// Info - informational message
    Info,
    /// Hint - suggestion for improvement
    Hint,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
            DiagnosticSeverity::Hint => "hint",
        }
    }

    /// Terminal color for this severity
    pub fn color(&self) -> Color {
        match self {
            DiagnosticSeverity::Error => Color::Red,
            DiagnosticSeverity::Warning => Color::Yellow,
            DiagnosticSeverity::Info => Color::Blue,
            DiagnosticSeverity::Hint => Color::Cyan,
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Source file
    pub file: Option<PathBuf>,
    /// Diagnostic code (for categorization)
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    /// Create a hint diagnostic
    pub fn hint(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Hint, message)
    }

    /// Set the source file
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = String::new();

        if let Some(ref file) = self.file {
            result.push_str(&file.display().to_string());
            result.push_str(": ");
        }

        result.push_str(self.severity.display());

        if let Some(ref code) = self.code {
            result.push('[');
            result.push_str(code);
            result.push(']');
        }

        result.push_str(": ");
        result.push_str(&self.message);

        result
    }

    /// Write with colors to a WriteColor implementor
    pub fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        if let Some(ref file) = self.file {
            w.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(w, "{}", file.display())?;
            w.reset()?;
            write!(w, ": ")?;
        }

        w.set_color(ColorSpec::new().set_fg(Some(self.severity.color())).set_bold(true))?;
        write!(w, "{}", self.severity.display())?;
        w.reset()?;

        if let Some(ref code) = self.code {
            w.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(w, "[{}]", code)?;
            w.reset()?;
        }

        writeln!(w, ": {}", self.message)
    }
}

/// Collector for diagnostics during doc generation
///
/// Every diagnostic is also emitted as a `tracing` event so a subscriber
/// sees the run as it happens; the collected list is the audit trail.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        let code = diagnostic.code.as_deref().unwrap_or("");
        match diagnostic.severity {
            DiagnosticSeverity::Error => {
                tracing::error!(code, "{}", diagnostic.message)
            }
            DiagnosticSeverity::Warning => {
                tracing::warn!(code, "{}", diagnostic.message)
            }
            DiagnosticSeverity::Info => tracing::info!(code, "{}", diagnostic.message),
            DiagnosticSeverity::Hint => tracing::debug!(code, "{}", diagnostic.message),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Add an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::error(message));
    }

    /// Add a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::warning(message));
    }

    /// Add an info message
    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::info(message));
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics carrying the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics
            .iter()
            .filter(move |d| d.code.as_deref() == Some(code))
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .count()
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Print all diagnostics to stderr
    pub fn print(&self, use_color: bool) {
        let choice = if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);
        for diagnostic in &self.diagnostics {
            if let Err(e) = diagnostic.write_colored(&mut stderr) {
                eprintln!("Error printing diagnostics: {}", e);
                return;
            }
        }
    }

    /// Print summary
    pub fn print_summary(&self) {
        let errors = self.error_count();
        let warnings = self.warning_count();

        if errors > 0 || warnings > 0 {
            eprintln!("\n{} error(s), {} warning(s)", errors, warnings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    #[test]
    fn test_doc_error() {
        let err = DocError::Unclassified("FooOptions".into());
        assert_eq!(err.to_string(), "Options class 'FooOptions' is not categorized.");

        let err = DocError::toml("categories.toml", "expected a table");
        assert!(err.to_string().contains("categories.toml"));
    }

    #[test]
    fn test_diagnostic() {
        let diag = Diagnostic::error("duplicated section")
            .in_file("src/Options.cs")
            .with_code("section-conflict");

        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert!(diag.format().starts_with("src/Options.cs: error[section-conflict]"));
    }

    #[test]
    fn test_write_colored_without_color() {
        let diag = Diagnostic::warning("missing summary").with_code("W1");
        let mut out = NoColor::new(Vec::new());
        diag.write_colored(&mut out).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text, "warning[W1]: missing summary\n");
    }

    #[test]
    fn test_diagnostics_collector() {
        let mut collector = DiagnosticsCollector::new();
        collector.error("error 1");
        collector.warning("warning 1");
        collector.info("info 1");
        collector.add(Diagnostic::info("dup").with_code("duplicate-type"));

        assert!(collector.has_errors());
        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 1);
        assert_eq!(collector.diagnostics().len(), 4);
        assert_eq!(collector.with_code("duplicate-type").count(), 1);
    }
}
