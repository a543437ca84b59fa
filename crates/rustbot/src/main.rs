//! rustbot command line entry point

mod bootstrap;
mod handlers;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rustbot_config::{ApplicationConfig, ConfigurationLoader, EnvironmentSource, TomlFileSource};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Answer questions about Rust from a local knowledge base
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(long, short = 'c', default_value = "rustbot.toml")]
    config_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the vector index and ingest the knowledge base
    Setup {
        /// Drop and recreate the index before ingesting
        #[arg(long)]
        recreate: bool,

        /// Knowledge-base directory (overrides `indexing.knowledge_base_dir`)
        #[arg(long)]
        kb_dir: Option<PathBuf>,
    },

    /// Start an interactive conversation
    Chat,

    /// Answer a single question and exit
    Ask {
        /// The question to answer
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Print the chunks a document splits into
    Chunk {
        /// Markdown file to split
        file: PathBuf,

        /// Soft threshold in words (overrides `chunking.token_target`)
        #[arg(long)]
        token_target: Option<usize>,

        /// Hard ceiling in words (overrides `chunking.max_tokens`)
        #[arg(long)]
        max_tokens: Option<usize>,
    },

    /// Print the knowledge-base chunks nearest to a query
    Search {
        query: String,

        /// Number of hits (overrides `search.num_hits`)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn load_config(path: &std::path::Path) -> anyhow::Result<ApplicationConfig> {
    ConfigurationLoader::new()
        .add_source(Box::new(TomlFileSource::new(path)))
        .add_source(Box::new(EnvironmentSource))
        .load()
        .with_context(|| format!("Failed to load configuration from '{}'", path.display()))
}

/// Install the JSON subscriber writing to a daily log file and stderr
///
/// The returned guards flush both writers when dropped.
fn init_tracing(config: &ApplicationConfig) -> anyhow::Result<(WorkerGuard, WorkerGuard)> {
    let log_dir = config.telemetry.resolved_log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory '{}'", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "rustbot.log");
    let (file_writer, file_guard): (NonBlocking, WorkerGuard) =
        tracing_appender::non_blocking(file_appender);
    let (stderr_writer, stderr_guard): (NonBlocking, WorkerGuard) =
        tracing_appender::non_blocking(std::io::stderr());

    // stderr only carries warnings so streamed answers on stdout stay readable
    let multi_writer = file_writer.and(stderr_writer.with_max_level(tracing::Level::WARN));

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.telemetry.tracing_level));

    tracing_subscriber::fmt()
        .json()
        .with_writer(multi_writer)
        .with_env_filter(filter)
        .init();

    Ok((file_guard, stderr_guard))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustbot_common::initialize_environment();

    let args = Args::parse();
    let config = load_config(&args.config_file)?;

    // Keep both guards alive for the whole run so buffered logs are flushed
    let (_file_guard, _stderr_guard) = init_tracing(&config)?;
    tracing::debug!(command = ?args.command, "Starting rustbot");

    let mut stdout = std::io::stdout();
    match args.command {
        Command::Setup { recreate, kb_dir } => {
            let indexer = bootstrap::setup_indexer(&config)?;
            let dir = kb_dir.unwrap_or_else(|| config.indexing.knowledge_base_dir.clone());
            handlers::setup::run(
                &indexer,
                &dir,
                &config.indexing.extension,
                recreate,
                &mut stdout,
            )
            .await
        }
        Command::Chat => {
            let mut assistant = bootstrap::setup_assistant(&config)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            handlers::chat::run(&mut assistant, stdin, &mut stdout, &config.chat.chats_dir).await
        }
        Command::Ask { question } => {
            let mut assistant = bootstrap::setup_assistant(&config)?;
            handlers::ask::run(&mut assistant, &question.join(" "), &mut stdout).await
        }
        Command::Chunk {
            file,
            token_target,
            max_tokens,
        } => {
            let mut chunking = config.chunking;
            if let Some(token_target) = token_target {
                chunking.token_target = token_target;
            }
            if let Some(max_tokens) = max_tokens {
                chunking.max_tokens = max_tokens;
            }
            handlers::chunk::run(&file, chunking, &mut stdout)
        }
        Command::Search { query, limit } => {
            let search = bootstrap::setup_search_service(&config)?;
            let limit = limit.unwrap_or(config.search.num_hits);
            handlers::search::run(search.as_ref(), &query, limit, &mut stdout).await
        }
        Command::Config => handlers::config::run(&config, &mut stdout),
    }
}
