// validate.rs — Post-compile verdict per component
//
// The default target re-checks the `.ly` source, exactly like the existence
// check. That does not prove the compiler produced anything; `Outputs`
// checks the artifact the emission mode should have produced, and
// `check_status` also fails components whose compiler run did not exit 0.
//
// Preconditions: `records`, if non-empty, is in component-list order.
// Postconditions: `failed` preserves component-list order, no duplicates.
// Side effects: none (metadata reads only).

use std::path::PathBuf;

use serde::Serialize;

use crate::check::is_regular_file;
use crate::compile::{CompileOutcome, EmitMode};
use crate::component::{Component, ComponentList, Layout};
use crate::diag::{codes, DiagLevel, Diagnostic};

/// Which file the validator requires to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ValidateTarget {
    /// `<tests>/<name>.ly`
    #[default]
    Sources,
    /// `<tests>/<name>.ll` for llvm-ir, `<tests>/<name>` for exe.
    Outputs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidateOptions {
    pub target: ValidateTarget,
    pub emit: EmitMode,
    pub check_status: bool,
}

/// The compiler outcome observed for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileRecord {
    pub component: Component,
    pub outcome: CompileOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct Validation {
    pub failed: Vec<Component>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Validation {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn has_failed(&self, component: &Component) -> bool {
        self.failed.contains(component)
    }
}

/// Root-relative path the validator inspects for `component`.
pub fn validated_path(component: &Component, layout: &Layout, opts: &ValidateOptions) -> PathBuf {
    let paths = layout.paths(component);
    match (opts.target, opts.emit) {
        (ValidateTarget::Sources, _) => paths.source,
        (ValidateTarget::Outputs, EmitMode::LlvmIr) => paths.llvm_ir,
        (ValidateTarget::Outputs, EmitMode::Exe) => paths.output,
    }
}

pub fn validate(
    components: &ComponentList,
    layout: &Layout,
    records: &[CompileRecord],
    opts: &ValidateOptions,
) -> Validation {
    let mut result = Validation::default();

    for component in components {
        let mut failed = false;

        let rel = validated_path(component, layout, opts);
        if !is_regular_file(&layout.resolve(&rel)) {
            let code = match opts.target {
                ValidateTarget::Sources => codes::H0001,
                ValidateTarget::Outputs => codes::H0002,
            };
            result.diagnostics.push(
                Diagnostic::new(
                    DiagLevel::Error,
                    format!("{} does not exist or is not a file", rel.display()),
                )
                .with_code(code)
                .with_component(component.name()),
            );
            failed = true;
        }

        if let Some(record) = records.iter().find(|r| &r.component == component) {
            if let Some(diag) = outcome_diagnostic(component, &record.outcome, opts.check_status) {
                failed |= diag.is_error();
                result.diagnostics.push(diag);
            }
        }

        if failed {
            result.failed.push(component.clone());
        }
    }

    result
}

/// A non-successful outcome is an error under `check_status`, a warning
/// otherwise.
fn outcome_diagnostic(
    component: &Component,
    outcome: &CompileOutcome,
    check_status: bool,
) -> Option<Diagnostic> {
    let code = match outcome {
        CompileOutcome::Exited { code: 0, .. } => return None,
        CompileOutcome::Exited { .. } => codes::H0003,
        CompileOutcome::Signalled { .. } => codes::H0004,
        CompileOutcome::SpawnFailed { .. } => codes::H0005,
    };
    let level = if check_status {
        DiagLevel::Error
    } else {
        DiagLevel::Warning
    };
    let mut diag = Diagnostic::new(level, format!("compiler {}", outcome.describe()))
        .with_code(code)
        .with_component(component.name());
    if !check_status {
        diag = diag.with_hint("pass --check-status to count this as a failure");
    }
    Some(diag)
}
