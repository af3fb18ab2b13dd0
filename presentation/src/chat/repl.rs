//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::console::ConsoleFormatter;
use crate::output::formatter::OutputFormatter;
use crate::progress::reporter::ProgressReporter;
use colored::Colorize;
use magi_application::{AskMagiUseCase, HistoryRepository, LlmGateway, NoProgress};
use magi_domain::{OutputFormat, Question};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const HISTORY_PREVIEW: usize = 10;
const LINE_HISTORY_CAPACITY: usize = 500;

/// One line of user input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Empty,
    Question(String),
    Help,
    History,
    Quit,
    Unknown(String),
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ChatInput::Empty;
        }
        if !line.starts_with('/') {
            return ChatInput::Question(line.to_string());
        }
        match line {
            "/quit" | "/exit" | "/q" => ChatInput::Quit,
            "/help" | "/h" | "/?" => ChatInput::Help,
            "/history" => ChatInput::History,
            other => ChatInput::Unknown(other.to_string()),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl<G: LlmGateway + 'static> {
    use_case: AskMagiUseCase<G>,
    history: Option<Arc<dyn HistoryRepository>>,
    format: OutputFormat,
    show_progress: bool,
    line_history: Option<PathBuf>,
}

impl<G: LlmGateway + 'static> ChatRepl<G> {
    pub fn new(use_case: AskMagiUseCase<G>) -> Self {
        Self {
            use_case,
            history: None,
            format: OutputFormat::Full,
            show_progress: true,
            line_history: dirs::data_dir().map(|p| p.join("magi").join("chat_history.txt")),
        }
    }

    /// Record every decision in `history`
    pub fn with_history(mut self, history: Arc<dyn HistoryRepository>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Where the typed-line history is kept (`None` disables it)
    pub fn with_line_history(mut self, path: Option<PathBuf>) -> Self {
        self.line_history = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> std::io::Result<()> {
        let mut editor = Reedline::create();

        if let Some(path) = &self.line_history {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(LINE_HISTORY_CAPACITY, path.clone()) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => eprintln!("Line history unavailable: {}", e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("MAGI".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => match ChatInput::parse(&line) {
                    ChatInput::Empty => continue,
                    ChatInput::Quit => {
                        println!("Bye!");
                        break;
                    }
                    ChatInput::Help => Self::print_help(),
                    ChatInput::History => println!("{}", self.recent_history()),
                    ChatInput::Unknown(cmd) => {
                        println!("Unknown command: {}", cmd);
                        println!("Type /help for available commands");
                    }
                    ChatInput::Question(question) => {
                        println!();
                        println!("{}", self.answer(&question).await);
                    }
                },
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                _ => println!("^C"),
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            MAGI SYSTEM - Chat Mode          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("MELCHIOR-1, BALTHASAR-2 and CASPER-3 are standing by.");
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /history         - Show recent decisions");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
    }

    fn recent_history(&self) -> String {
        let Some(history) = &self.history else {
            return "History is disabled.".to_string();
        };
        match history.list(Some(HISTORY_PREVIEW)) {
            Ok(decisions) => ConsoleFormatter::format_history_list(&decisions),
            Err(e) => format!("{} {}", "Could not read history:".red(), e),
        }
    }

    /// Deliberate on one question; Ctrl-C aborts it and keeps the session
    async fn answer(&self, text: &str) -> String {
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            }
        });

        let output = self.deliberate(text, cancel).await;
        watcher.abort();
        output
    }

    /// Run one decision cycle under `cancel` and render the result
    async fn deliberate(&self, text: &str, cancel: CancellationToken) -> String {
        let question = match Question::new(text) {
            Ok(q) => q,
            Err(e) => return format!("{} {}", "Error:".red().bold(), e),
        };

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case
                .execute_cancellable(question, &progress, cancel)
                .await
        } else {
            self.use_case
                .execute_cancellable(question, &NoProgress, cancel)
                .await
        };

        match result {
            Ok(decision) => {
                if let Some(history) = &self.history
                    && let Err(e) = history.add(&decision)
                {
                    eprintln!("{} {}", "Could not save to history:".yellow(), e);
                }
                ConsoleFormatter.render(&decision, self.format)
            }
            Err(e) => format!(
                "{} {}\n{}",
                "Error:".red().bold(),
                e.user_message(),
                e.suggestion().dimmed()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use magi_application::{GatewayError, MagiError, RetryPolicy, StaticConfigProvider};
    use magi_application::DecisionParams;
    use magi_domain::{ChatRequest, ProviderConfig, ProviderKind};

    /// Classifier says "open"; every persona answers with prose
    struct OpenGateway;

    #[async_trait]
    impl LlmGateway for OpenGateway {
        async fn complete(
            &self,
            _config: &ProviderConfig,
            request: &ChatRequest,
        ) -> Result<String, GatewayError> {
            if request.max_tokens.is_some() {
                Ok("false".to_string())
            } else {
                Ok("Thin air and red dust.".to_string())
            }
        }
    }

    fn repl(api_key: &str) -> ChatRepl<OpenGateway> {
        let config = ProviderConfig::new(ProviderKind::OpenRouter, "test-model", api_key);
        let use_case = AskMagiUseCase::new(
            Arc::new(OpenGateway),
            Arc::new(StaticConfigProvider::new(config)),
        )
        .with_params(DecisionParams::default().with_retry(RetryPolicy::none()));
        ChatRepl::new(use_case)
            .with_progress(false)
            .with_line_history(None)
            .with_output_format(OutputFormat::Verdict)
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(ChatInput::parse("   "), ChatInput::Empty);
        assert_eq!(ChatInput::parse("/q"), ChatInput::Quit);
        assert_eq!(ChatInput::parse("/exit"), ChatInput::Quit);
        assert_eq!(ChatInput::parse(" /help "), ChatInput::Help);
        assert_eq!(ChatInput::parse("/history"), ChatInput::History);
        assert_eq!(
            ChatInput::parse("/models"),
            ChatInput::Unknown("/models".to_string())
        );
        assert_eq!(
            ChatInput::parse(" Should we deploy on Friday? "),
            ChatInput::Question("Should we deploy on Friday?".to_string())
        );
    }

    #[tokio::test]
    async fn test_answer_renders_decision() {
        colored::control::set_override(false);
        let output = repl("sk-test").answer("What is the weather like on Mars?").await;
        assert!(output.starts_with("ℹ INFO"));
        assert!(output.contains("Thin air and red dust."));
    }

    #[tokio::test]
    async fn test_answer_reports_config_error() {
        colored::control::set_override(false);
        let output = repl("").answer("Anything?").await;
        assert!(output.starts_with("Error: Configuration problem"));
    }

    #[tokio::test]
    async fn test_cancelled_question_keeps_session() {
        colored::control::set_override(false);
        let repl = repl("sk-test");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let output = repl.deliberate("Should we deploy on Friday?", cancel).await;
        assert!(output.starts_with("Error: "));
        assert!(output.contains(&MagiError::Cancelled.user_message()));

        let output = repl
            .deliberate("What is the weather like on Mars?", CancellationToken::new())
            .await;
        assert!(output.starts_with("ℹ INFO"));
    }

    #[test]
    fn test_history_disabled() {
        assert_eq!(repl("sk-test").recent_history(), "History is disabled.");
    }
}
