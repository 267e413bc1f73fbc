//! dbusgen CLI.
//!
//! Generates typed Rust proxies from D-Bus interface models.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};

use dbusgen::{Generator, GeneratorConfig};

mod ui;

#[derive(Parser)]
#[command(name = "dbusgen")]
#[command(about = "dbusgen - generates typed Rust proxies for D-Bus interfaces")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate proxies from an interface model
    Generate(GenerateArgs),

    /// Validate a model and its generated code without writing anything
    Check {
        /// Model file, or a directory of *.json models
        input: PathBuf,

        /// Name of the generated module
        #[arg(short, long, default_value = "dbus")]
        unit: String,
    },

    /// Watch the model and regenerate on every change
    Watch(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Model file, or a directory of *.json models
    input: PathBuf,

    /// Output Rust file
    #[arg(short, long)]
    output: PathBuf,

    /// Name of the generated module (default: output file stem)
    #[arg(short, long)]
    unit: Option<String>,

    /// Path the generated code imports the runtime crate from
    #[arg(long, default_value = dbusgen::codegen::DEFAULT_RUNTIME_CRATE)]
    runtime_crate: String,
}

impl GenerateArgs {
    fn into_config(self) -> GeneratorConfig {
        GeneratorConfig {
            input: self.input,
            output: self.output,
            unit: self.unit,
            runtime_crate: self.runtime_crate,
        }
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => generate(args.into_config())?,

        Commands::Check { input, unit } => {
            let spinner = ui::spinner("Checking interface model...");
            let config = GeneratorConfig {
                input,
                unit: Some(unit),
                ..GeneratorConfig::default()
            };

            match Generator::new(config).check() {
                Ok(result) => {
                    spinner.finish_and_clear();
                    ui::looking_good();
                    println!();
                    println!("    {}", ui::summary_line(&result));
                }
                Err(e) => {
                    spinner.finish_and_clear();
                    ui::nope_header();
                    return Err(e.into());
                }
            }
        }

        Commands::Watch(args) => run_watch_mode(args.into_config())?,
    }

    Ok(())
}

/// Generate once and report.
fn generate(config: GeneratorConfig) -> miette::Result<()> {
    let start = Instant::now();
    let spinner = ui::spinner("Generating proxies...");

    let output = config.output.clone();
    let result = Generator::new(config).run();
    spinner.finish_and_clear();
    let result = result?;

    ui::print_compact_header(env!("CARGO_PKG_VERSION"));
    println!();
    ui::success(&ui::summary_line(&result));
    if result.written {
        ui::info(&format!("Wrote {}", output.display()));
    } else {
        ui::dim(&format!("{} is up to date", output.display()));
    }
    ui::timing("Done", start.elapsed().as_millis());

    Ok(())
}

/// Regenerate on every debounced change of the input.
fn run_watch_mode(config: GeneratorConfig) -> miette::Result<()> {
    let (tx, rx) = mpsc::channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx).into_diagnostic()?;

    let (watch_path, mode) = watch_target(&config.input);
    debouncer
        .watcher()
        .watch(&watch_path, mode)
        .into_diagnostic()?;

    ui::info(&format!("Watching {} for changes", config.input.display()));
    println!();

    let generator = Generator::new(config);
    regenerate(&generator);

    for result in rx {
        match result {
            Ok(events) => {
                let output = &generator.config().output;
                let relevant = events.iter().any(|event| !same_file(&event.path, output));
                tracing::debug!(events = events.len(), relevant, "debounced file events");
                if relevant {
                    println!();
                    regenerate(&generator);
                }
            }
            Err(e) => ui::error(&format!("Watch error: {e}")),
        }
    }

    ui::dim("Stopping watch mode.");
    Ok(())
}

/// A complete run; failures are reported and watching continues.
fn regenerate(generator: &Generator) {
    let start = Instant::now();
    match generator.run() {
        Ok(result) => {
            let duration = start.elapsed().as_millis();
            ui::success(&format!("{} in {}ms", ui::summary_line(&result), duration));
        }
        Err(e) => ui::error(&format!("{:?}", miette::Report::new(e))),
    }
    ui::info("Ready! Waiting for changes...");
}

/// Directories are watched recursively; a single file is watched through its
/// parent so that editors replacing the file are noticed.
fn watch_target(input: &Path) -> (PathBuf, RecursiveMode) {
    if input.is_dir() {
        return (input.to_path_buf(), RecursiveMode::Recursive);
    }
    let parent = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    (parent.to_path_buf(), RecursiveMode::NonRecursive)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
