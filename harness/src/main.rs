use clap::Parser;
use std::path::PathBuf;

use lyharness::compile::{EmitMode, DEFAULT_COMPILER};
use lyharness::component::{ComponentList, Layout};
use lyharness::report::ReportFormat;
use lyharness::validate::{ValidateOptions, ValidateTarget};
use lyharness::{ExternalCompiler, HarnessConfig, HarnessError};

#[derive(Parser, Debug)]
#[command(
    name = "lyharness",
    version,
    about = "Compiles the ly test components with lygosc and reports which ones failed"
)]
struct Cli {
    /// Directory all other paths are relative to
    #[arg(short = 'C', long, default_value = ".")]
    root: PathBuf,

    /// Compiler binary
    #[arg(long, default_value = DEFAULT_COMPILER)]
    compiler: PathBuf,

    /// Directory holding the <component>.ly sources
    #[arg(long, default_value = "tests")]
    tests_dir: PathBuf,

    /// Component to test (repeatable; defaults to the built-in list)
    #[arg(long = "component", value_name = "NAME")]
    components: Vec<String>,

    /// What the compiler should emit
    #[arg(long, value_enum, default_value_t = EmitMode::LlvmIr)]
    emit: EmitMode,

    /// Which file must exist after compiling
    #[arg(long, value_enum, default_value_t = ValidateTarget::Sources)]
    validate: ValidateTarget,

    /// Count a non-zero compiler exit as a failure
    #[arg(long)]
    check_status: bool,

    /// Final report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Exit with status 1 when a source is missing or a component fails
    #[arg(long)]
    strict: bool,

    /// Print phases and timing
    #[arg(long)]
    verbose: bool,
}

fn config_from(cli: &Cli) -> Result<HarnessConfig, HarnessError> {
    let components = if cli.components.is_empty() {
        ComponentList::default()
    } else {
        ComponentList::new(cli.components.iter().cloned())?
    };
    Ok(HarnessConfig {
        layout: Layout::new(&cli.root, &cli.tests_dir),
        compiler: cli.compiler.clone(),
        components,
        validate: ValidateOptions {
            target: cli.validate,
            emit: cli.emit,
            check_status: cli.check_status,
        },
        format: cli.format,
        verbose: cli.verbose,
    })
}

fn main() {
    let cli = Cli::parse();

    let config = match config_from(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("lyharness: error: {}", e);
            std::process::exit(e.exit_code(cli.strict));
        }
    };

    let mut compiler = ExternalCompiler::new(&config.compiler, &config.layout.root);
    if cli.verbose {
        eprintln!("lyharness: program  = {}", compiler.program().display());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match lyharness::run(&config, &mut compiler, &mut out) {
        Ok(report) => {
            if cli.strict && !report.is_success() {
                std::process::exit(1);
            }
        }
        // Already printed to stdout by the check phase.
        Err(e @ HarnessError::MissingSource { .. }) => {
            std::process::exit(e.exit_code(cli.strict));
        }
        Err(e) => {
            eprintln!("lyharness: error: {}", e);
            std::process::exit(e.exit_code(cli.strict));
        }
    }
}
