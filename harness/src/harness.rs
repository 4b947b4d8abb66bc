// harness.rs — Run orchestration
//
// Sequences check → clean → compile → validate over the configured component
// list and writes progress and the final report to the given writer.
//
// Preconditions: `config.layout.root` is a directory.
// Postconditions: on Ok, every component was compiled exactly once, in list
//   order, and the report has been written.
// Failure modes: a missing source in the check phase ends the run before
//   cleanup (`HarnessError::MissingSource`); write failures on `out`.
// Side effects: deletes artifacts, runs the compiler, writes to `out`, logs
//   to stderr when `verbose` is set.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::check::check_sources;
use crate::clean::clean_artifacts;
use crate::compile::{Compiler, Invocation, DEFAULT_COMPILER};
use crate::component::{ComponentList, Layout};
use crate::error::HarnessError;
use crate::phase::{Phase, RunState};
use crate::report::{Report, ReportFormat};
use crate::validate::{validate, CompileRecord, ValidateOptions};

/// Everything a run needs. `Default` reproduces the stock setup: the six
/// built-in components under `./tests`, compiled by `bin/lygosc` to LLVM IR,
/// validated by source existence.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub layout: Layout,
    pub compiler: PathBuf,
    pub components: ComponentList,
    pub validate: ValidateOptions,
    pub format: ReportFormat,
    pub verbose: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            compiler: PathBuf::from(DEFAULT_COMPILER),
            components: ComponentList::default(),
            validate: ValidateOptions::default(),
            format: ReportFormat::default(),
            verbose: false,
        }
    }
}

struct Progress {
    state: RunState,
    verbose: bool,
}

impl Progress {
    fn finish(&mut self, phase: Phase, elapsed: Duration) {
        // Phases are driven in a fixed order below; a miss here is a bug.
        debug_assert!(self.state.after(phase).is_some(), "{phase} out of order");
        if let Some(next) = self.state.after(phase) {
            self.state = next;
        }
        if self.verbose {
            eprintln!(
                "lyharness: {} complete, {:.1}ms",
                phase,
                elapsed.as_secs_f64() * 1000.0
            );
        }
    }

    fn close(&mut self) {
        debug_assert!(self.state.finish().is_some(), "closing unvalidated run");
        if let Some(done) = self.state.finish() {
            self.state = done;
        }
    }
}

/// Run the harness once.
pub fn run(
    config: &HarnessConfig,
    compiler: &mut dyn Compiler,
    out: &mut dyn Write,
) -> Result<Report, HarnessError> {
    let layout = &config.layout;
    let verbose = config.verbose;

    if !layout.root.is_dir() {
        return Err(HarnessError::InvalidRoot(layout.root.clone()));
    }

    let mut progress = Progress {
        state: RunState::Start,
        verbose,
    };

    if verbose {
        eprintln!("lyharness: root     = {}", layout.root.display());
        eprintln!("lyharness: compiler = {}", config.compiler.display());
        eprintln!("lyharness: {} components", config.components.len());
    }

    // ── Check ──
    let t = Instant::now();
    if let Err(e) = check_sources(&config.components, layout) {
        writeln!(out, "{}", e)?;
        progress.state = RunState::Terminated;
        if verbose {
            eprintln!("lyharness: check failed, stopping before cleanup");
        }
        return Err(e);
    }
    progress.finish(Phase::Check, t.elapsed());

    // ── Clean ──
    let t = Instant::now();
    let cleaned = clean_artifacts(&config.components, layout);
    if verbose {
        for path in &cleaned.removed {
            eprintln!("lyharness: removed {}", path.display());
        }
    }
    progress.finish(Phase::Clean, t.elapsed());

    // ── Compile ──
    let t = Instant::now();
    let mut records = Vec::with_capacity(config.components.len());
    for component in &config.components {
        writeln!(out, "[compiling]: {}", component)?;
        out.flush()?;
        let invocation = Invocation::for_component(component, layout, config.validate.emit);
        let outcome = compiler.compile(&invocation);
        if verbose {
            eprintln!("lyharness: {}: compiler {}", component, outcome.describe());
        }
        records.push(CompileRecord {
            component: component.clone(),
            outcome,
        });
    }
    progress.finish(Phase::Compile, t.elapsed());

    // ── Validate ──
    let t = Instant::now();
    let validation = validate(&config.components, layout, &records, &config.validate);
    if verbose {
        for diag in &validation.diagnostics {
            eprintln!("lyharness: {}", diag);
        }
    }
    let report = Report::build(
        &config.components,
        layout,
        &config.compiler,
        &records,
        validation,
        &config.validate,
    );
    report.write(config.format, out)?;
    progress.finish(Phase::Validate, t.elapsed());

    progress.close();
    debug_assert_eq!(progress.state, RunState::Done);
    Ok(report)
}
