//! Command-line interface for `sparkify-etl`.
//!
//! Stage subcommands (`run`, `songs`, `logs`) resolve the configuration,
//! apply path overrides, build an [`EtlContext`] and hand it to the
//! pipeline. `config` subcommands inspect configuration without touching
//! data.

use crate::context::EtlContext;
use crate::error::{PipelineError, Result};
use crate::exit_codes::ExitCode;
use crate::pipeline::{run_stage, Stage};
use crate::source::JsonDirSource;
use crate::summary::RunSummary;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sf_common::OutputFormat;
use sf_config::resolve::load_file;
use sf_config::{resolve_config, validate, ConfigError, ConfigPaths, EtlConfig};
use sf_store::ParquetDirSink;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Error from installing the global subscriber.
pub type TryInitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Sparkify star-schema ETL.
#[derive(Parser, Debug)]
#[command(name = "sparkify-etl", version, about)]
pub struct Cli {
    /// Config file (otherwise $SPARKIFY_ETL_CONFIG, then the XDG config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build all five tables
    Run(StageArgs),
    /// Build the songs and artists tables only
    Songs(StageArgs),
    /// Build users, time and songplays against previously written songs
    Logs(StageArgs),
    /// Inspect configuration
    Config(ConfigArgs),
}

/// Arguments shared by the stage subcommands.
#[derive(Args, Debug, Default)]
pub struct StageArgs {
    /// Input root, overriding `input.root`
    #[arg(long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Output root, overriding `output.root`
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Report format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration as TOML
    Show,
    /// Print the JSON schema of the configuration file
    Schema,
    /// Parse and validate a config file
    Validate {
        /// File to check
        path: PathBuf,
    },
}

/// Install the global tracing subscriber. Logs go to stderr.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(format: LogFormat, verbose: u8) -> std::result::Result<(), TryInitError> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

/// Execute a parsed command line.
pub fn run_cli(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Commands::Run(args) => run_stage_command(cli.config, Stage::All, &args),
        Commands::Songs(args) => run_stage_command(cli.config, Stage::Songs, &args),
        Commands::Logs(args) => run_stage_command(cli.config, Stage::Logs, &args),
        Commands::Config(args) => run_config_command(cli.config, &args.command),
    };
    match outcome {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            error!(error = %err, code = code.as_i32(), "run failed");
            eprintln!("sparkify-etl: {err}");
            code
        }
    }
}

fn resolve(cli_config: Option<PathBuf>) -> Result<sf_config::ResolvedConfig> {
    let paths = ConfigPaths::discover(cli_config.as_deref());
    Ok(resolve_config(&paths)?)
}

fn run_stage_command(
    cli_config: Option<PathBuf>,
    stage: Stage,
    args: &StageArgs,
) -> Result<ExitCode> {
    let mut resolved = resolve(cli_config)?;
    apply_overrides(&mut resolved.config, args)?;
    let ctx = EtlContext::new(resolved);
    info!(
        run_id = %ctx.run_id,
        config = %ctx.config_source,
        input = %ctx.config.input.root.display(),
        output = %ctx.config.output.root.display(),
        "configuration resolved"
    );

    let input = &ctx.config.input;
    let source = JsonDirSource::new(&input.root, &input.song_glob, &input.log_glob);
    let mut sink = ParquetDirSink::new(&ctx.config.output.root, ctx.writer_config().compression);

    let report = run_stage(&ctx, stage, &source, &mut sink)?;
    let summary = RunSummary::new(&ctx, stage, &report);
    if ctx.config.output.write_summary {
        let path = summary.save(&ctx.config.output.root)?;
        info!(path = %path.display(), "run summary written");
    }
    print!("{}", with_newline(summary.render(args.format)?));
    Ok(ExitCode::Clean)
}

/// Apply `--input/--output` and re-validate.
pub fn apply_overrides(config: &mut EtlConfig, args: &StageArgs) -> Result<()> {
    if let Some(input) = &args.input {
        config.input.root = input.clone();
    }
    if let Some(output) = &args.output {
        config.output.root = output.clone();
    }
    validate(config).map_err(|errors| PipelineError::Config(ConfigError::Invalid(errors)))
}

fn run_config_command(cli_config: Option<PathBuf>, command: &ConfigCommands) -> Result<ExitCode> {
    match command {
        ConfigCommands::Show => {
            let resolved = resolve(cli_config)?;
            println!("# source: {}", resolved.source);
            print!("{}", resolved.config.to_toml().map_err(ConfigError::from)?);
        }
        ConfigCommands::Schema => {
            println!("{}", serde_json::to_string_pretty(&EtlConfig::json_schema()?)?);
        }
        ConfigCommands::Validate { path } => {
            let config = load_file(path)?;
            if let Err(errors) = validate(&config) {
                for e in &errors {
                    println!("{e}");
                }
                return Err(ConfigError::Invalid(errors).into());
            }
            println!("{}: ok", path.display());
        }
    }
    Ok(ExitCode::Clean)
}

fn with_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
