// compile.rs — Driving the external lygos compiler
//
// One synchronous invocation per component:
//
//     <compiler> <tests>/<name>.ly -o <tests>/<name> -e llvm-ir
//
// The compiler runs with the harness root as its working directory, so the
// paths it receives are root-relative. Its exit status and stderr are always
// captured into a `CompileOutcome`; whether that outcome affects the verdict
// is decided later by the validator.
//
// Failure modes: a compiler that cannot be spawned yields
//   `CompileOutcome::SpawnFailed`, never an error.
// Side effects: runs a subprocess that writes artifacts under `<tests>/`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::component::{Component, Layout};

/// Default compiler location, relative to the harness root.
pub const DEFAULT_COMPILER: &str = "bin/lygosc";

// ── Emission mode ───────────────────────────────────────────────────────────

/// What the compiler is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmitMode {
    /// `-e llvm-ir`: LLVM IR text in `<name>.ll`.
    #[default]
    LlvmIr,
    /// No `-e` flag: the compiler's default native executable.
    Exe,
}

impl EmitMode {
    /// The flag value passed after `-e`, if any.
    pub fn flag_value(self) -> Option<&'static str> {
        match self {
            EmitMode::LlvmIr => Some("llvm-ir"),
            EmitMode::Exe => None,
        }
    }
}

// ── Invocation ──────────────────────────────────────────────────────────────

/// A fully-specified compiler call for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub component: Component,
    pub source: PathBuf,
    pub output: PathBuf,
    pub emit: EmitMode,
}

impl Invocation {
    pub fn for_component(component: &Component, layout: &Layout, emit: EmitMode) -> Self {
        let paths = layout.paths(component);
        Self {
            component: component.clone(),
            source: paths.source,
            output: paths.output,
            emit,
        }
    }

    /// Arguments after the program name.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![
            self.source.clone().into_os_string(),
            OsString::from("-o"),
            self.output.clone().into_os_string(),
        ];
        if let Some(value) = self.emit.flag_value() {
            args.push(OsString::from("-e"));
            args.push(OsString::from(value));
        }
        args
    }
}

// ── Outcome ─────────────────────────────────────────────────────────────────

/// What happened when the compiler ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompileOutcome {
    Exited { code: i32, stderr: String },
    Signalled { stderr: String },
    SpawnFailed { error: String },
}

impl CompileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompileOutcome::Exited { code: 0, .. })
    }

    /// Captured stderr, or the spawn error.
    pub fn detail(&self) -> &str {
        match self {
            CompileOutcome::Exited { stderr, .. } | CompileOutcome::Signalled { stderr } => stderr,
            CompileOutcome::SpawnFailed { error } => error,
        }
    }

    /// One-line status for verbose logs.
    pub fn describe(&self) -> String {
        match self {
            CompileOutcome::Exited { code, .. } => format!("exited with status {}", code),
            CompileOutcome::Signalled { .. } => "terminated by signal".to_string(),
            CompileOutcome::SpawnFailed { error } => format!("could not be started: {}", error),
        }
    }
}

// ── Compiler seam ───────────────────────────────────────────────────────────

/// Anything that can carry out an `Invocation`.
///
/// The harness only ever calls this sequentially, one component at a time.
pub trait Compiler {
    fn compile(&mut self, invocation: &Invocation) -> CompileOutcome;
}

/// The real compiler binary, run as a subprocess.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    program: PathBuf,
    workdir: PathBuf,
}

impl ExternalCompiler {
    /// A relative `workdir` is made absolute against the current directory,
    /// so the program path stays valid after `Command` switches into it.
    pub fn new(program: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        let workdir = workdir.into();
        Self {
            program: program.into(),
            workdir: std::path::absolute(&workdir).unwrap_or(workdir),
        }
    }

    /// Program path to hand to `Command`.
    ///
    /// A path with a directory part is anchored at the working directory; a
    /// bare name is left for `PATH` lookup.
    pub fn program(&self) -> PathBuf {
        resolve_program(&self.program, &self.workdir)
    }
}

fn resolve_program(program: &Path, workdir: &Path) -> PathBuf {
    if program.is_absolute() || program.components().count() <= 1 {
        program.to_path_buf()
    } else {
        workdir.join(program)
    }
}

impl Compiler for ExternalCompiler {
    fn compile(&mut self, invocation: &Invocation) -> CompileOutcome {
        let output = Command::new(self.program())
            .args(invocation.args())
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
                match out.status.code() {
                    Some(code) => CompileOutcome::Exited { code, stderr },
                    None => CompileOutcome::Signalled { stderr },
                }
            }
            Err(e) => CompileOutcome::SpawnFailed {
                error: e.to_string(),
            },
        }
    }
}
