// report.rs — Final run report: console summary and JSON document
//
// Collects per-component results after validation. The text form is the
// classic summary (` failed to compile ...` lines, then one verdict line);
// the JSON form carries the same verdict plus compiler outcomes, diagnostics
// and a SHA-256 fingerprint of each source so runs can be compared.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::compile::{CompileOutcome, EmitMode};
use crate::component::{format_name_list, Component, ComponentList, Layout};
use crate::diag::Diagnostic;
use crate::error::HarnessError;
use crate::validate::{CompileRecord, ValidateOptions, ValidateTarget, Validation};

pub const SUCCESS_MESSAGE: &str = "successfully compiled all components";

/// Output format of the final summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentEntry {
    pub name: Component,
    pub source: String,
    pub source_sha256: Option<String>,
    pub outcome: Option<CompileOutcome>,
    pub failed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub harness_version: &'static str,
    pub compiler: String,
    pub emit: EmitMode,
    pub validate: ValidateTarget,
    pub check_status: bool,
    pub components: Vec<ComponentEntry>,
    pub failed: Vec<Component>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn build(
        components: &ComponentList,
        layout: &Layout,
        compiler: &Path,
        records: &[CompileRecord],
        validation: Validation,
        opts: &ValidateOptions,
    ) -> Self {
        let entries = components
            .iter()
            .map(|component| {
                let source = layout.paths(component).source;
                ComponentEntry {
                    name: component.clone(),
                    source_sha256: file_sha256(&layout.resolve(&source)),
                    source: source.display().to_string(),
                    outcome: records
                        .iter()
                        .find(|r| &r.component == component)
                        .map(|r| r.outcome.clone()),
                    failed: validation.has_failed(component),
                }
            })
            .collect();

        Report {
            harness_version: env!("CARGO_PKG_VERSION"),
            compiler: compiler.display().to_string(),
            emit: opts.emit,
            validate: opts.target,
            check_status: opts.check_status,
            components: entries,
            failed: validation.failed,
            diagnostics: validation.diagnostics,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// The single verdict line.
    pub fn summary_line(&self) -> String {
        if self.is_success() {
            SUCCESS_MESSAGE.to_string()
        } else {
            format!(
                "failed to compile components: {}",
                format_name_list(&self.failed)
            )
        }
    }

    /// One failure line per failed component, in list order. Under
    /// `check_status`, the compiler's stderr follows, indented.
    pub fn write_failures(&self, out: &mut dyn Write) -> io::Result<()> {
        for entry in self.components.iter().filter(|e| e.failed) {
            writeln!(out, " failed to compile `{}`", entry.name)?;
            if !self.check_status {
                continue;
            }
            if let Some(outcome) = &entry.outcome {
                for line in outcome.detail().trim().lines() {
                    writeln!(out, "    {}", line)?;
                }
            }
        }
        Ok(())
    }

    pub fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        self.write_failures(out)?;
        writeln!(out, "{}", self.summary_line())
    }

    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, format: ReportFormat, out: &mut dyn Write) -> Result<(), HarnessError> {
        match format {
            ReportFormat::Text => self.write_text(out)?,
            ReportFormat::Json => {
                self.write_failures(out)?;
                writeln!(out, "{}", self.to_json()?)?;
            }
        }
        Ok(())
    }
}

/// Hex SHA-256 of a file's contents, `None` if it cannot be read.
pub fn file_sha256(path: &Path) -> Option<String> {
    use sha2::{Digest, Sha256};

    let bytes = fs::read(path).ok()?;
    let digest = Sha256::digest(&bytes);
    let mut s = String::with_capacity(64);
    for b in digest.iter() {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
    }
    Some(s)
}
