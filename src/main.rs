//! Binary entry point for feedcl.
//!
//! This binary provides the CLI interface for feed services.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use feedcl::cli::{OutputArgs, TargetArgs, cmd_delete, cmd_get, cmd_list, cmd_tag, cmd_tasks};
use feedcl::config::{FeedclConfig, ServiceSettings};
use feedcl::observability::{self, LoggingConfig};
use feedcl::services::{CommandDispatcher, TaskRegistry};
use feedcl::{EntryMutator, FeedSource, HttpFeedSource, MemoryFeedSource, TerminalPrompt};
use secrecy::{ExposeSecret, SecretString};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// feedcl - list, fetch, delete, and tag entries in feed services.
#[derive(Parser)]
#[command(name = "feedcl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Config section with per-service overrides.
    #[arg(long, global = true)]
    service: Option<String>,

    /// Match titles as regular expressions.
    #[arg(long, global = true, overrides_with = "no_regex")]
    regex: bool,

    /// Match titles exactly.
    #[arg(long, global = true)]
    no_regex: bool,

    /// Stop after the first page of results.
    #[arg(long, global = true)]
    cap_results: bool,

    /// Page size requested from the service.
    #[arg(long, global = true)]
    max_results: Option<u32>,

    /// Read pages from a JSON file instead of the network.
    #[arg(long, global = true)]
    offline: Option<PathBuf>,

    /// Bearer token for the feed service.
    #[arg(long, env = "FEEDCL_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List entries in a feed.
    List {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show a single entry.
    Get {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete matching entries.
    Delete {
        #[command(flatten)]
        target: TargetArgs,

        /// What the entries are, used in the confirmation question.
        #[arg(short, long, default_value = "entry")]
        kind: String,

        /// Delete without asking.
        #[arg(long)]
        force: bool,
    },

    /// Add, remove, or replace tags on matching entries.
    Tag {
        #[command(flatten)]
        target: TargetArgs,

        /// Tag edit, e.g. "tag1, -removed, \-literal, --".
        #[arg(long, allow_hyphen_values = true)]
        tags: Option<String>,
    },

    /// Show every task and its requirements.
    Tasks,

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => match FeedclConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return ExitCode::FAILURE;
            },
        },
        None => FeedclConfig::load_default(),
    };

    let logging = LoggingConfig::from_settings(config.logging.as_ref(), cli.verbose);
    if let Err(e) = observability::init(logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli, config: &FeedclConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Tasks => {
            let registry = TaskRegistry::standard()?;
            cmd_tasks(&registry, &mut io::stdout().lock())?;
            return Ok(());
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "feedcl", &mut io::stdout());
            return Ok(());
        },
        _ => {},
    }

    let settings = effective_settings(&cli, config);

    if let Some(ref path) = cli.offline {
        let source = MemoryFeedSource::from_json_file(path)
            .with_context(|| format!("loading offline feed {}", path.display()))?;
        return dispatch(cli, &settings, &source);
    }

    let mut source = HttpFeedSource::new();
    if let Some(token) = cli.token.clone() {
        source = source.with_token(SecretString::from(token));
    } else if let Some(ref token) = settings.token {
        source = source.with_token(SecretString::from(token.expose_secret().to_string()));
    }
    dispatch(cli, &settings, &source)
}

/// Applies command-line overrides on top of the configured service settings.
fn effective_settings(cli: &Cli, config: &FeedclConfig) -> ServiceSettings {
    let mut settings = config.service(cli.service.as_deref());
    if cli.regex {
        settings.use_regex = true;
    }
    if cli.no_regex {
        settings.use_regex = false;
    }
    if cli.cap_results {
        settings.cap_results = true;
    }
    if let Some(max) = cli.max_results {
        settings.max_results = max;
    }
    if let Commands::Delete { force: true, .. } = cli.command {
        settings.delete_prompt = false;
    }
    settings.normalized()
}

fn dispatch<S>(cli: Cli, settings: &ServiceSettings, source: &S) -> anyhow::Result<()>
where
    S: FeedSource + EntryMutator,
{
    let prompt = TerminalPrompt;
    let dispatcher = CommandDispatcher::new(TaskRegistry::standard()?, source, &prompt)
        .with_settings(settings.dispatch_settings());
    let format = settings.format_settings();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::List { target, output } => {
            let count = cmd_list(&dispatcher, &target, &output, &format, &mut out)?;
            tracing::debug!(count, "Listed entries");
        },
        Commands::Get { target, output } => {
            if !cmd_get(&dispatcher, &target, &output, &format, &mut out)? {
                eprintln!("No matching entry");
            }
        },
        Commands::Delete { target, kind, .. } => {
            cmd_delete(&dispatcher, &target, &kind, &mut out)?;
        },
        Commands::Tag { target, tags } => {
            cmd_tag(&dispatcher, &target, tags.as_deref(), &mut out)?;
        },
        Commands::Tasks | Commands::Completions { .. } => {},
    }
    Ok(())
}
