/*!
 * Livery CLI - Command Line Interface
 *
 * Author: Shane Wall <shaneawall@gmail.com>
 */

use clap::{Args, Parser, Subcommand, ValueEnum};
use livery::{
    build,
    commands::init::run_init,
    config::{LogLevel, PublishConfig},
    error::{LiveryError, Result, EXIT_SUCCESS},
    logging,
    output::OutputWriter,
    Manifest,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "livery")]
#[command(version, about = "Build the livery catalog manifest from per-livery metadata files", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./livery.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long = "log-level", value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long = "log", value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    /// Verbose logging (same as --log-level debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Machine-readable JSON output on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every metadata file and write the manifest
    Build(BuildArgs),

    /// Validate every metadata file without writing anything
    Check(SourceArgs),

    /// Print the items of an existing manifest
    Show {
        /// Manifest to read (defaults to the configured output)
        #[arg(value_name = "MANIFEST")]
        manifest: Option<PathBuf>,
    },

    /// Write a default livery.toml and create the metadata directory
    Init {
        /// Overwrite an existing livery.toml
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Directory holding the metadata files
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    input: Option<PathBuf>,

    /// File-name glob for metadata files
    #[arg(long, value_name = "GLOB")]
    pattern: Option<String>,

    /// Reject metadata files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_file_bytes: Option<u64>,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Manifest output path
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Omit generated_at so identical input gives identical bytes
    #[arg(long)]
    no_timestamp: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

impl SourceArgs {
    fn apply(self, config: &mut PublishConfig) {
        if let Some(input) = self.input {
            config.input_dir = input;
        }
        if let Some(pattern) = self.pattern {
            config.pattern = pattern;
        }
        if let Some(max) = self.max_file_bytes {
            config.max_file_bytes = max;
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    let code = match run(cli, &output) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            output.error(&e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, output: &OutputWriter) -> Result<()> {
    let cwd = std::env::current_dir()?;

    // Completions and init must work without a valid config
    match cli.command {
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "livery", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Init { force } => {
            run_init(&cwd, force)
                .map_err(|e| LiveryError::Config(format!("Initialization failed: {:#}", e)))?;
            return Ok(());
        }
        _ => {}
    }

    let mut config = PublishConfig::resolve(cli.config.as_deref(), &cwd)?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    config.verbose |= cli.verbose;

    if let Err(e) = logging::init_logging(&config, output.is_json()) {
        livery::cli_style::print_warning(&format!("Failed to initialize logging: {}", e));
    }
    debug!("Resolved configuration: {:?}", config);

    match cli.command {
        Commands::Build(args) => {
            args.source.apply(&mut config);
            if let Some(path) = args.output {
                config.output = path;
            }
            if args.no_timestamp {
                config.stamp_time = false;
            }
            let report = build(&config.build_options())?;
            output.build_result("build", &report);
        }
        Commands::Check(args) => {
            args.apply(&mut config);
            let report = build(&config.check_options())?;
            output.build_result("check", &report);
        }
        Commands::Show { manifest } => {
            let path = manifest.unwrap_or_else(|| config.output.clone());
            let loaded = Manifest::load(&path)?;
            output.manifest_listing(&loaded);
        }
        Commands::Init { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
