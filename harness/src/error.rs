// error.rs — Fatal harness errors
//
// Everything that stops a run before it reaches the validate phase. Per-
// component findings that only affect the report are `Diagnostic`s instead
// (see diag.rs).

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum HarnessError {
    /// A component name that cannot be used as a path segment.
    InvalidComponent { name: String, reason: &'static str },
    /// The same component listed twice.
    DuplicateComponent(String),
    /// A component list with no entries.
    EmptyComponentList,
    /// The configured root is missing or not a directory.
    InvalidRoot(PathBuf),
    /// Existence check failed; the run stops before cleanup.
    MissingSource { component: String },
    /// Writing progress or the report failed.
    Output(io::Error),
    /// The JSON report could not be serialized.
    Report(serde_json::Error),
}

impl HarnessError {
    /// Process exit status the binary uses for this error.
    ///
    /// A missing source ends the run normally (status 0) unless `strict`.
    pub fn exit_code(&self, strict: bool) -> i32 {
        match self {
            HarnessError::MissingSource { .. } if strict => 1,
            HarnessError::MissingSource { .. } => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::InvalidComponent { name, reason } => {
                write!(f, "invalid component name '{}': {}", name, reason)
            }
            HarnessError::DuplicateComponent(name) => {
                write!(f, "component '{}' listed more than once", name)
            }
            HarnessError::EmptyComponentList => write!(f, "no components to test"),
            HarnessError::InvalidRoot(path) => {
                write!(f, "root '{}' is not a directory", path.display())
            }
            HarnessError::MissingSource { component } => write!(
                f,
                "test component `{}` does not exist or is not a file",
                component
            ),
            HarnessError::Output(e) => write!(f, "cannot write output: {}", e),
            HarnessError::Report(e) => write!(f, "cannot serialize report: {}", e),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Output(e) => Some(e),
            HarnessError::Report(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(e: io::Error) -> Self {
        HarnessError::Output(e)
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        HarnessError::Report(e)
    }
}
