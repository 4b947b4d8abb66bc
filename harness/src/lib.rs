// lyharness — test harness for the lygos compiler
//
// Library root. The binary in main.rs is a thin clap front end over
// `harness::run`.

pub mod check;
pub mod clean;
pub mod compile;
pub mod component;
pub mod diag;
pub mod error;
pub mod harness;
pub mod phase;
pub mod report;
pub mod validate;

pub use compile::{Compiler, ExternalCompiler};
pub use error::HarnessError;
pub use harness::{run, HarnessConfig};
