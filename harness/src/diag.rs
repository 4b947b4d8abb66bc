// diag.rs — Per-component diagnostics
//
// Findings produced while checking, compiling and validating components.
// A diagnostic never stops the run on its own; the harness decides which
// ones count as a component failure.
//
// Preconditions: none (types only).
// Postconditions: none (types only).
// Failure modes: none.
// Side effects: none.

use std::fmt;

use serde::Serialize;

// ── Diagnostic code ──────────────────────────────────────────────────────

/// A stable diagnostic code (e.g., `H0001`).
///
/// Codes are `&'static str` constants defined in the [`codes`] module and
/// keep their meaning once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DiagCode(pub &'static str);

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod codes {
    use super::DiagCode;

    /// Source file missing or not a regular file.
    pub const H0001: DiagCode = DiagCode("H0001");
    /// Expected compiler output missing or not a regular file.
    pub const H0002: DiagCode = DiagCode("H0002");
    /// Compiler exited with a non-zero status.
    pub const H0003: DiagCode = DiagCode("H0003");
    /// Compiler terminated by a signal.
    pub const H0004: DiagCode = DiagCode("H0004");
    /// Compiler could not be started.
    pub const H0005: DiagCode = DiagCode("H0005");
}

// ── Severity level ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagLevel {
    Error,
    Warning,
}

// ── Diagnostic ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: Option<DiagCode>,
    pub level: DiagLevel,
    pub component: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with no code, component or hint.
    pub fn new(level: DiagLevel, message: impl Into<String>) -> Self {
        Self {
            code: None,
            level,
            component: None,
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a stable diagnostic code.
    pub fn with_code(mut self, code: DiagCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the component this finding concerns.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagLevel::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagLevel::Error => "error",
            DiagLevel::Warning => "warning",
        };
        match &self.code {
            Some(code) => write!(f, "{}[{}]: ", level, code)?,
            None => write!(f, "{}: ", level)?,
        }
        if let Some(component) = &self.component {
            write!(f, "{}: ", component)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}
