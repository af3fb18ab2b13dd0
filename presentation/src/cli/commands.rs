//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use magi_domain::{DecisionPolicy, ProviderKind};
use std::path::PathBuf;

/// Output format for MAGI decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every persona's answer followed by the collective decision
    Full,
    /// Only the collective verdict
    Verdict,
    /// JSON output
    Json,
}

impl From<OutputFormat> for magi_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => magi_domain::OutputFormat::Full,
            OutputFormat::Verdict => magi_domain::OutputFormat::Verdict,
            OutputFormat::Json => magi_domain::OutputFormat::Json,
        }
    }
}

/// Aggregation policy selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// CASPER holds a veto; ties broken by priority
    Veto,
    /// Plain two-out-of-three majority
    Majority,
}

impl From<PolicyArg> for DecisionPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Veto => DecisionPolicy::VetoWithTieBreak,
            PolicyArg::Majority => DecisionPolicy::Majority,
        }
    }
}

fn parse_provider(value: &str) -> Result<ProviderKind, String> {
    value.parse::<ProviderKind>().map_err(|e| {
        let known: Vec<&str> = ProviderKind::ALL.iter().map(|p| p.as_str()).collect();
        format!("{} (known: {})", e, known.join(", "))
    })
}

/// CLI arguments for magi
#[derive(Parser, Debug)]
#[command(name = "magi")]
#[command(author, version, about = "MAGI - three personas deliberate and reach a verdict")]
#[command(long_about = r#"
MAGI puts your question to three personas and aggregates their answers.

  MELCHIOR-1  the scientist: logic and evidence
  BALTHASAR-2 the mother: responsibility and long-term care
  CASPER-3    the woman: intuition, and a veto on yes/no questions

Yes/no questions are put to a vote; open questions collect three perspectives.

Configuration files are loaded from (in priority order):
1. MAGI_* environment variables (nested keys with __, e.g. MAGI_PROVIDER__MODEL)
2. --config <path>              Explicit config file
3. ./magi.toml or ./.magi.toml  Project-level config
4. ~/.config/magi/config.toml   Global config

Example:
  magi "Should we deploy on Friday?"
  magi -p openai -m gpt-4o-mini -o json "Is Rust a good fit for a CLI?"
  magi --chat
  magi history list --limit 5
"#)]
pub struct Cli {
    /// The question to put to MAGI (not required in chat mode)
    pub question: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Provider name (openrouter, openai, anthropic, ...)
    #[arg(short, long, value_name = "PROVIDER", value_parser = parse_provider)]
    pub provider: Option<ProviderKind>,

    /// Model identifier sent to the provider
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Override the provider's chat-completions URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Aggregation policy for yes/no questions
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Output format (defaults to the configured format, else full)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append a JSONL transcript of every decision to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Do not record decisions in the history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Browse and manage past decisions
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Check that the configured provider answers
    Health,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    /// Most recent decisions
    List {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Find decisions whose question or answers contain QUERY
    Search { query: String },
    /// Show one decision in full
    Show { id: String },
    /// Remove one decision
    Delete { id: String },
    /// Remove every decision
    Clear,
    /// Totals, average response time and result distribution
    Stats,
    /// Print the whole history as JSON (or write it to a file)
    Export {
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Merge decisions from an exported JSON file
    Import { path: PathBuf },
}
