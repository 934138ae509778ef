//! Command-line interface for the exchange class transpiler

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use transpile_compiler::{BatchReport, TranspileConfig, TranspilePipeline};
use transpile_core::Target;

#[derive(Parser)]
#[command(name = "transpile")]
#[command(about = "Render canonical exchange classes into Python and PHP")]
#[command(version)]
#[command(
    long_about = "Transpiles the canonical exchange classes under js/ into asynchronous Python, synchronous Python and PHP, keeps the generated trees free of stale files, and regenerates the type-declaration manifest"
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable quiet mode (suppress non-error output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Set log level
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile every eligible class, prune stale files and export the manifest
    Run {
        /// Source tree root
        #[arg(long)]
        root: Option<PathBuf>,
        /// Substring a source file name must contain
        #[arg(long)]
        pattern: Option<String>,
        /// Keep generated files that have no source
        #[arg(long)]
        no_prune: bool,
        /// Skip the error hierarchy, fixtures and sync test driver
        #[arg(long)]
        no_auxiliary: bool,
        /// Fail when a collection literal nests past the rewrite bound
        #[arg(long)]
        strict_nesting: bool,
    },
    /// Render one class and print it
    Class {
        /// Canonical source file
        file: PathBuf,
        /// Output target
        #[arg(long, value_enum, default_value = "python3")]
        target: TargetArg,
    },
    /// Derive the synchronous Python test driver from the asynchronous one
    SyncTest {
        /// Source tree root
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Decompose a source file and list its methods without rendering
    Check {
        /// Canonical source file
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TargetArg {
    Python2,
    Python3,
    Php,
}

impl From<TargetArg> for Target {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Python2 => Target::Python2,
            TargetArg::Python3 => Target::Python3,
            TargetArg::Php => Target::Php,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = execute(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            root,
            pattern,
            no_prune,
            no_auxiliary,
            strict_nesting,
        } => {
            let mut config = with_root(config, root);
            if let Some(pattern) = pattern {
                config.pattern = pattern;
            }
            if no_prune {
                config.prune.enabled = false;
            }
            if no_auxiliary {
                config.auxiliary.enabled = false;
            }
            if strict_nesting {
                config.strict_nesting = true;
            }
            handle_run_command(config)
        }
        Commands::Class { file, target } => handle_class_command(config, &file, target.into()),
        Commands::SyncTest { root } => handle_sync_test_command(with_root(config, root)),
        Commands::Check { file } => handle_check_command(config, &file),
    }
}

fn init_logging(cli: &Cli) {
    let log_level = if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        match &cli.log_level {
            Some(LogLevel::Error) => log::LevelFilter::Error,
            Some(LogLevel::Warn) => log::LevelFilter::Warn,
            Some(LogLevel::Info) => log::LevelFilter::Info,
            Some(LogLevel::Debug) => log::LevelFilter::Debug,
            Some(LogLevel::Trace) => log::LevelFilter::Trace,
            None => log::LevelFilter::Info,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<TranspileConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            TranspileConfig::from_file(path)
                .with_context(|| format!("invalid configuration in {}", path.display()))
        }
        None => Ok(TranspileConfig::default()),
    }
}

fn with_root(config: TranspileConfig, root: Option<PathBuf>) -> TranspileConfig {
    match root {
        Some(root) => TranspileConfig { root, ..config },
        None => config,
    }
}

fn handle_run_command(config: TranspileConfig) -> Result<()> {
    let root = config.root.clone();
    let pipeline = TranspilePipeline::new(config).context("failed to build the transpilation pipeline")?;
    let report = pipeline.run().map_err(|e| {
        let context = match e.source_file() {
            Some(file) => format!("failed to transpile {}", file),
            None => format!("transpilation of {} stopped", root.display()),
        };
        anyhow::Error::new(e).context(context)
    })?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &BatchReport) {
    for diagnostic in report.diagnostics.diagnostics() {
        if diagnostic.is_warning() {
            warn!("{}", diagnostic);
        }
    }

    if report.is_empty() {
        println!("No classes transpiled");
        return;
    }

    println!(
        "✅ {} classes transpiled, {} files written, {} stale files deleted",
        report.transpiled_count(),
        report.written.len(),
        report.deleted.len()
    );
    if report.diagnostics.has_warnings() {
        println!("⚠️  {} warnings", report.diagnostics.warning_count());
    }
}

fn handle_class_command(mut config: TranspileConfig, file: &Path, target: Target) -> Result<()> {
    match target {
        Target::Python2 => config.targets.python2 = true,
        Target::Python3 => config.targets.python3 = true,
        Target::Php => config.targets.php = true,
    }

    let pipeline = TranspilePipeline::new(config)?;
    let transpiled = pipeline
        .transpile_file(file)
        .with_context(|| format!("failed to transpile {}", file.display()))?;

    for diagnostic in &transpiled.diagnostics {
        warn!("{}", diagnostic);
    }

    let artifact = transpiled
        .artifacts
        .into_iter()
        .find(|artifact| artifact.target == target)
        .ok_or_else(|| anyhow!("no {} output produced for {}", target, file.display()))?;

    print!("{}", artifact.text);
    Ok(())
}

fn handle_sync_test_command(config: TranspileConfig) -> Result<()> {
    let pipeline = TranspilePipeline::new(config)?;
    let mut report = BatchReport::default();
    pipeline
        .derive_sync_driver(&mut report)
        .context("failed to derive the synchronous test driver")?;

    match report.written.first() {
        Some(path) => println!("✅ Wrote {}", path.display()),
        None => println!("No asynchronous test driver found"),
    }
    Ok(())
}

fn handle_check_command(config: TranspileConfig, file: &Path) -> Result<()> {
    info!("Checking {}", file.display());

    let pipeline = TranspilePipeline::new(config)?;
    let class = pipeline
        .check_file(file)
        .with_context(|| format!("{} is not a well-formed class file", file.display()))?;

    println!("{} extends {}", class.name, class.base_class);
    for method in &class.methods {
        let params: Vec<_> = method.parameter_names().collect();
        println!(
            "  {}{} ({})",
            if method.is_async { "async " } else { "" },
            method.name,
            params.join(", ")
        );
    }
    println!("✅ {} methods", class.methods.len());
    Ok(())
}
