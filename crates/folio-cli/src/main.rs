//! Folio CLI
//!
//! Command-line interface for building document trees and running aggregate
//! queries over them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use folio_core::{Backend, DocumentPredicate, Engine, EngineConfig, QueryKind, QueryResult};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio - Parallel document tree queries")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.folio/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Coordinator backend
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    /// Worker threads for the pool backend
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Timeout for the whole operation, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Skip dot-files and dot-directories
    #[arg(long, global = true)]
    skip_hidden: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Pool,
    EventLoop,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Pool => Backend::Pool,
            BackendArg::EventLoop => Backend::EventLoop,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Count documents under a path
    Count {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Count every entry under a path, folders included
    Entries {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Count lines across all documents
    Lines {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Count whole-word occurrences of a word
    Words { path: PathBuf, word: String },

    /// List documents containing a word
    Find { path: PathBuf, word: String },

    /// Print the tree skeleton
    Tree {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!(
        backend = ?config.backend,
        workers = config.worker_threads,
        timeout_ms = config.timeout_ms,
        skip_hidden = config.skip_hidden,
        "Resolved config"
    );

    let engine = Engine::from_config(&config).context("Failed to start engine")?;

    match cli.command {
        Commands::Tree { path } => cmd_tree(&engine, path, cli.json),
        Commands::Count { path } => cmd_query(&engine, path, QueryKind::DocumentCount, cli.json),
        Commands::Entries { path } => cmd_query(&engine, path, QueryKind::EntryCount, cli.json),
        Commands::Lines { path } => cmd_query(&engine, path, QueryKind::LineCount, cli.json),
        Commands::Words { path, word } => {
            cmd_query(&engine, path, QueryKind::WordCount(word), cli.json)
        }
        Commands::Find { path, word } => {
            let predicate = DocumentPredicate::containing_word(&word);
            cmd_query(&engine, path, QueryKind::Find(predicate), cli.json)
        }
    }
}

/// Config file first, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::load(),
    };

    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    if let Some(workers) = cli.workers {
        config.worker_threads = workers;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if cli.skip_hidden {
        config.skip_hidden = true;
    }

    Ok(config)
}

fn cmd_query(engine: &Engine, path: PathBuf, query: QueryKind, json: bool) -> Result<()> {
    let description = query.describe();
    let start = Instant::now();
    let result = engine
        .build_and_query(&path, query)
        .with_context(|| format!("Failed to compute {} for {}", description, path.display()))?;
    let elapsed = start.elapsed();
    debug!(
        avg_latency_ms = engine.metrics().average_latency_ms(),
        "Query finished"
    );

    if json {
        let output = serde_json::json!({
            "path": path,
            "query": description,
            "result": result,
            "elapsed_ms": elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match result {
        QueryResult::Count(n) => {
            println!("{}: {}", capitalize(&description), n);
        }
        QueryResult::Documents(docs) => {
            for doc in &docs {
                println!("{}", doc.path().display());
            }
            println!();
            println!("{} document(s)", docs.len());
        }
    }
    println!("({})", format_elapsed(elapsed));

    Ok(())
}

fn cmd_tree(engine: &Engine, path: PathBuf, json: bool) -> Result<()> {
    let tree = engine
        .build_tree(&path)
        .with_context(|| format!("Failed to build tree for {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    print!("{}", tree.to_skeleton_string());
    println!();
    println!("({})", format_elapsed(tree.build_time()));

    Ok(())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_secs_f64() * 1000.0;
    if ms < 1000.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}
