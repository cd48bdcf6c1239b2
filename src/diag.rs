//! Diagnostics collected while processing a document.
//!
//! The pipeline never aborts on a recoverable problem; it records a
//! diagnostic and keeps going, so one bad marker cannot lose the whole
//! rendered index. Callers (the CLI, tests) decide what to do with the
//! accumulated reports.

use std::fmt;

/// How noteworthy a diagnostic is.
///
/// `Warning`s indicate degraded output (a placeholder left literal, an
/// entry skipped); `Info` records progress detail shown only at higher
/// verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// One recorded problem or progress note.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based input line number, when known.
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        match self.line {
            Some(line) => write!(f, "{}: line {}: {}", tag, line, self.message),
            None => write!(f, "{}: {}", tag, self.message),
        }
    }
}

/// Accumulating diagnostics sink, threaded through the pipeline.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reports: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.reports.push(Diagnostic {
            severity: Severity::Warning,
            line,
            message: message.into(),
        });
    }

    pub fn info(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.reports.push(Diagnostic {
            severity: Severity::Info,
            line,
            message: message.into(),
        });
    }

    /// All recorded diagnostics, in recording order.
    pub fn reports(&self) -> &[Diagnostic] {
        &self.reports
    }

    /// Only the warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reports
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
