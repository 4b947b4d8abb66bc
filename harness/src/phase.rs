// phase.rs — Harness phases and the run state machine
//
// A run walks START → CHECKED → CLEANED → COMPILED → VALIDATED → DONE.
// The only abnormal edge leaves the check phase: a missing source ends the
// run in TERMINATED before anything is cleaned or compiled.

use std::fmt;

/// One step of a harness run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Check,
    Clean,
    Compile,
    Validate,
}

/// All phases, in execution order.
pub const PHASES: [Phase; 4] = [Phase::Check, Phase::Clean, Phase::Compile, Phase::Validate];

impl Phase {
    /// Human-readable name for verbose output.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Check => "check",
            Phase::Clean => "clean",
            Phase::Compile => "compile",
            Phase::Validate => "validate",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Checked,
    Cleaned,
    Compiled,
    Validated,
    Done,
    Terminated,
}

impl RunState {
    /// State reached after `phase` completes from `self`, or `None` if the
    /// phase is out of order.
    pub fn after(self, phase: Phase) -> Option<RunState> {
        match (self, phase) {
            (RunState::Start, Phase::Check) => Some(RunState::Checked),
            (RunState::Checked, Phase::Clean) => Some(RunState::Cleaned),
            (RunState::Cleaned, Phase::Compile) => Some(RunState::Compiled),
            (RunState::Compiled, Phase::Validate) => Some(RunState::Validated),
            _ => None,
        }
    }

    /// Close a validated run. `None` from any other state.
    pub fn finish(self) -> Option<RunState> {
        match self {
            RunState::Validated => Some(RunState::Done),
            _ => None,
        }
    }

    pub fn is_final(self) -> bool {
        matches!(self, RunState::Done | RunState::Terminated)
    }
}
