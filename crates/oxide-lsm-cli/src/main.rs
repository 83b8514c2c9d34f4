//! oxide-lsm CLI
//!
//! Command-line front-end for the SQL analysis engine.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_lsm::analysis::{AnalysisError, Scheduler, SchedulerConfig};
use oxide_lsm::ast::{
    CreateTableStatement, DeleteStatement, Expr, InsertStatement, PragmaStatement, Script,
    SelectStatement, Statement, UpdateStatement,
};
use oxide_lsm::dialect::{builtin_registry, dialect_for, Dialect, ModelKind, StatementModel};
use oxide_lsm::lexer::TokenKind;
use oxide_lsm::source::Source;

/// Multi-dialect SQL lexical and syntax analysis.
#[derive(Parser)]
#[command(name = "oxide-lsm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL dialect (name or alias).
    #[arg(short, long, env = "OXIDE_LSM_DIALECT", default_value = "sql92")]
    dialect: String,

    /// Worker threads and concurrent analyses (defaults to available parallelism).
    #[arg(short, long, env = "OXIDE_LSM_WORKERS")]
    workers: Option<usize>,

    /// Give up on an analysis after this many milliseconds.
    #[arg(short, long, env = "OXIDE_LSM_TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse SQL into a statement model.
    Parse {
        /// Model to produce (statement, select, insert, update, delete,
        /// create-table, pragma, script, expression).
        #[arg(short, long, default_value = "script")]
        model: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Debug)]
        format: Format,

        /// SQL file to read (`-` or nothing for stdin).
        input: Option<PathBuf>,
    },

    /// Print the token stream.
    Tokens {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Debug)]
        format: Format,

        /// SQL file to read (`-` or nothing for stdin).
        input: Option<PathBuf>,
    },

    /// List the available dialects.
    Dialects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Debug,
    Json,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // The CLI runtime doubles as the scheduler's, so it takes the same settings.
    let config = scheduler_config(cli.workers);
    let runtime = config
        .runtime_builder()
        .build()
        .context("failed to start the runtime")?;
    runtime.block_on(execute(cli, config))
}

fn scheduler_config(workers: Option<usize>) -> SchedulerConfig {
    let config = SchedulerConfig::default();
    match workers {
        Some(workers) => config
            .with_worker_threads(workers)
            .with_max_concurrent_analyses(workers),
        None => config,
    }
}

async fn execute(cli: Cli, config: SchedulerConfig) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Dialects => {
            list_dialects();
            Ok(ExitCode::SUCCESS)
        }

        Commands::Tokens { format, input } => {
            let dialect = dialect_for(&cli.dialect)?;
            let source = read_source(input.as_ref())?;
            match dialect.tokenize(source.text()) {
                Ok(tokens) => {
                    print_tokens(&tokens, format)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => report(&AnalysisError::from(err), format),
            }
        }

        Commands::Parse {
            model,
            format,
            input,
        } => {
            let Some(kind) = ModelKind::from_name(&model) else {
                let known: Vec<&str> = ModelKind::ALL.iter().map(ModelKind::as_str).collect();
                bail!("unknown model '{model}', expected one of: {}", known.join(", "));
            };

            let dialect = dialect_for(&cli.dialect)?;
            let source = read_source(input.as_ref())?;
            let scheduler = Scheduler::with_runtime(Handle::current(), config);
            let run = Run {
                dialect,
                scheduler: &scheduler,
                source: &source,
                timeout: Duration::from_millis(cli.timeout_ms),
                format,
            };

            match kind {
                ModelKind::Statement => run.analyse::<Statement>().await,
                ModelKind::Select => run.analyse::<SelectStatement>().await,
                ModelKind::Insert => run.analyse::<InsertStatement>().await,
                ModelKind::Update => run.analyse::<UpdateStatement>().await,
                ModelKind::Delete => run.analyse::<DeleteStatement>().await,
                ModelKind::CreateTable => run.analyse::<CreateTableStatement>().await,
                ModelKind::Pragma => run.analyse::<PragmaStatement>().await,
                ModelKind::Script => run.analyse::<Script>().await,
                ModelKind::Expression => run.analyse::<Expr>().await,
            }
        }
    }
}

struct Run<'a> {
    dialect: &'static Dialect,
    scheduler: &'a Scheduler,
    source: &'a Source,
    timeout: Duration,
    format: Format,
}

impl Run<'_> {
    async fn analyse<M: StatementModel + Serialize>(&self) -> anyhow::Result<ExitCode> {
        let case = self.dialect.find_analysis_case::<M>()?;
        let mut analysis = self.dialect.prepare_analysis(self.source, &case)?;
        let handle = analysis.start(self.scheduler);

        let Some(outcome) = handle.result_timeout(self.timeout).await else {
            handle.cancel();
            bail!("analysis timed out after {:?}", self.timeout);
        };
        debug!(id = handle.id(), "analysis settled");

        match outcome {
            Ok(model) => {
                match self.format {
                    Format::Debug => println!("{model:#?}"),
                    Format::Json => println!("{}", serde_json::to_string_pretty(&*model)?),
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => report(&err, self.format),
        }
    }
}

fn read_source(input: Option<&PathBuf>) -> anyhow::Result<Source> {
    let source = match input {
        Some(path) if path.as_os_str() != "-" => Source::from_path(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => Source::from_reader(io::stdin().lock()).context("failed to read stdin")?,
    };
    Ok(source)
}

fn report(err: &AnalysisError, format: Format) -> anyhow::Result<ExitCode> {
    match format {
        Format::Debug => {
            eprintln!("error: {err}");
            if let Some(found) = &err.found {
                eprintln!("  found: {found}");
            }
            if !err.expected.is_empty() {
                eprintln!("  expected: {}", err.expected.join(", "));
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(err)?),
    }
    Ok(ExitCode::FAILURE)
}

fn print_tokens(tokens: &[oxide_lsm::lexer::Token], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(tokens)?),
        Format::Debug => {
            for token in tokens.iter().filter(|token| token.kind != TokenKind::Eof) {
                let start = token.span.start;
                let category = format!("{:?}", token.kind.category());
                println!("{:>4}:{:<4} {category:<12} {}", start.line, start.column, token.text);
            }
        }
    }
    Ok(())
}

fn list_dialects() {
    for dialect in builtin_registry().iter() {
        let aliases = if dialect.aliases().is_empty() {
            String::new()
        } else {
            format!(" (alias: {})", dialect.aliases().join(", "))
        };
        println!("{}{aliases} - {}", dialect.name(), dialect.description());

        let models: Vec<&str> = dialect
            .supported_models()
            .iter()
            .map(ModelKind::as_str)
            .collect();
        println!("    models: {}", models.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workers_flag_sizes_runtime_and_pool() {
        let cli = Cli::try_parse_from(["oxide-lsm", "--workers", "3", "dialects"]).unwrap();
        let config = scheduler_config(cli.workers);
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.max_concurrent_analyses, 3);

        let runtime = config.runtime_builder().build().unwrap();
        assert_eq!(runtime.metrics().num_workers(), 3);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["oxide-lsm", "parse", "-"]).unwrap();
        assert_eq!(cli.dialect, "sql92");
        assert_eq!(cli.timeout_ms, 10_000);
        assert_eq!(scheduler_config(cli.workers), SchedulerConfig::default());
        assert!(matches!(cli.command, Commands::Parse { ref model, .. } if model == "script"));
    }
}
