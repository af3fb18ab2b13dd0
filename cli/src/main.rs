//! CLI entrypoint for MAGI
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use magi_application::{
    AskMagiUseCase, DecisionProgressNotifier, HistoryRepository, MagiError, NoProgress,
};
use magi_domain::{OutputFormat, Question};
use magi_infrastructure::{
    ConfigLoader, FileConfig, FileConfigProvider, HttpLlmGateway, JsonHistoryStore,
    JsonlConversationLogger, ProviderOverrides,
};
use magi_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, HistoryAction, OutputFormatter, ProgressReporter,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose);

    info!("Starting MAGI");

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    if let Some(Command::History { action }) = &cli.command {
        let store = open_history(&config)?.context("History is disabled in the configuration")?;
        return run_history(action, &store, output_format(&cli, &config));
    }

    // === Dependency Injection ===
    let use_case = build_use_case(&cli, &config)?;

    if let Some(Command::Health) = &cli.command {
        let health = use_case.check_service_health().await;
        print!("{}", ConsoleFormatter::format_health(&health));
        if !health.available {
            bail!("provider health check failed");
        }
        return Ok(());
    }

    let history: Option<Arc<dyn HistoryRepository>> = if cli.no_history {
        None
    } else {
        match open_history(&config) {
            Ok(store) => store.map(|s| Arc::new(s) as Arc<dyn HistoryRepository>),
            Err(e) => {
                warn!("History unavailable: {}", e);
                None
            }
        }
    };
    let format = output_format(&cli, &config);

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case)
            .with_output_format(format)
            .with_progress(!cli.quiet);
        if let Some(history) = history {
            repl = repl.with_history(history);
        }
        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let Some(text) = cli.question.as_deref() else {
        bail!("Question is required. Use --chat for interactive mode.");
    };
    let question = Question::new(text)?;

    // Ctrl-C cancels the in-flight requests instead of killing the process
    let cancel = CancellationToken::new();
    let use_case = use_case.with_cancellation(cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let show_progress = !cli.quiet && format != OutputFormat::Json;
    if show_progress {
        println!();
        println!("+============================================================+");
        println!("|                 MAGI SYSTEM - Deliberation                 |");
        println!("+============================================================+");
        println!();
        println!("Question: {}", question);
        println!();
    }

    let progress: Box<dyn DecisionProgressNotifier> = if show_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(NoProgress)
    };

    let decision = use_case
        .execute_with_progress(question, progress.as_ref())
        .await
        .map_err(describe_error)?;

    if let Some(history) = &history
        && let Err(e) = history.add(&decision)
    {
        warn!("Could not save decision to history: {}", e);
    }

    println!("{}", ConsoleFormatter.render(&decision, format));

    Ok(())
}

fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    }
}

/// Operational logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(verbose)));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .init();

    guard
}

fn output_format(cli: &Cli, config: &FileConfig) -> OutputFormat {
    cli.output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default()
}

fn build_use_case(cli: &Cli, config: &FileConfig) -> Result<AskMagiUseCase<HttpLlmGateway>> {
    let provider = if cli.no_config {
        FileConfigProvider::defaults_only()
    } else {
        FileConfigProvider::new(cli.config.clone())
    }
    .with_overrides(ProviderOverrides {
        provider: cli.provider,
        model: cli.model.clone(),
        api_base: cli.api_base.clone(),
    });

    let mut params = config.decision_params();
    if let Some(policy) = cli.policy {
        params = params.with_policy(policy.into());
    }

    let gateway = Arc::new(HttpLlmGateway::new(params.request_timeout)?);
    let mut use_case = AskMagiUseCase::new(gateway, Arc::new(provider)).with_params(params);

    let transcript = cli
        .log_file
        .clone()
        .or_else(|| config.logging.conversation_log.clone());
    if let Some(path) = transcript {
        match JsonlConversationLogger::new(&path) {
            Some(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                use_case = use_case.with_conversation_logger(Arc::new(logger));
            }
            None => warn!("Transcript disabled: could not open {}", path.display()),
        }
    }

    Ok(use_case)
}

fn open_history(config: &FileConfig) -> Result<Option<JsonHistoryStore>> {
    if !config.history.enabled {
        return Ok(None);
    }
    let Some(path) = config.history.resolved_path() else {
        warn!("No data directory available; history disabled");
        return Ok(None);
    };
    let store = JsonHistoryStore::open(path, config.history.max_records)?;
    Ok(Some(store))
}

fn run_history(action: &HistoryAction, store: &JsonHistoryStore, format: OutputFormat) -> Result<()> {
    match action {
        HistoryAction::List { limit } => {
            print!("{}", ConsoleFormatter::format_history_list(&store.list(Some(*limit))?));
        }
        HistoryAction::Search { query } => {
            print!("{}", ConsoleFormatter::format_history_list(&store.search(query)?));
        }
        HistoryAction::Show { id } => {
            let decision = store
                .get(id)?
                .with_context(|| format!("No decision with id {}", id))?;
            println!("{}", ConsoleFormatter.render(&decision, format));
        }
        HistoryAction::Delete { id } => {
            store.delete(id)?;
            println!("Deleted {}", id);
        }
        HistoryAction::Clear => {
            store.clear()?;
            println!("History cleared");
        }
        HistoryAction::Stats => {
            print!("{}", ConsoleFormatter::format_stats(&store.stats()?));
        }
        HistoryAction::Export { output } => {
            let json = store.export()?;
            match output {
                Some(path) => {
                    std::fs::write(path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        HistoryAction::Import { path } => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let added = store.import(&json)?;
            println!("Imported {} decision(s)", added);
        }
    }
    Ok(())
}

fn describe_error(error: MagiError) -> anyhow::Error {
    anyhow!("{}\n{}", error.user_message(), error.suggestion())
}
