//! Ask MAGI use case
//!
//! Orchestrates one decision cycle:
//!
//! 1. classify the question as yes/no or open (fails open to "open")
//! 2. ask the three personas concurrently
//! 3. parse each reply into a verdict
//! 4. aggregate the verdicts into a [`FinalDecision`]
//!
//! Every provider call goes through the retry wrapper and a per-request
//! timeout. Persona failures become `error` verdicts; only configuration
//! problems, a concurrent submission, or cancellation reach the caller.

use crate::config::DecisionParams;
use crate::error::MagiError;
use crate::ports::config_provider::ConfigProvider;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{DecisionProgressNotifier, NoProgress};
use crate::retry::{RetryPolicy, retry_with_backoff};
use magi_domain::{
    ChatRequest, FinalDecision, PersonaId, PersonaVerdict, PromptTemplate, ProviderConfig,
    Question, QuestionMode, aggregate,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of [`AskMagiUseCase::check_service_health`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Sends single requests with timeout, cancellation and retry.
///
/// Cheap to clone so each persona task owns one.
struct Dispatcher<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    retry: RetryPolicy,
    timeout: Duration,
    cancel: CancellationToken,
}

impl<G: LlmGateway + 'static> Clone for Dispatcher<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            retry: self.retry.clone(),
            timeout: self.timeout,
            cancel: self.cancel.clone(),
        }
    }
}

impl<G: LlmGateway + 'static> Dispatcher<G> {
    fn with_cancel(&self, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..self.clone()
        }
    }

    async fn send(
        &self,
        config: &ProviderConfig,
        request: &ChatRequest,
        name: &str,
    ) -> Result<String, MagiError> {
        retry_with_backoff(
            &self.retry,
            name,
            || self.attempt(config, request),
            MagiError::is_retryable,
        )
        .await
    }

    async fn attempt(
        &self,
        config: &ProviderConfig,
        request: &ChatRequest,
    ) -> Result<String, MagiError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(MagiError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.gateway.complete(config, request)) => {
                match result {
                    Ok(Ok(content)) => Ok(content),
                    Ok(Err(e)) => Err(e.into()),
                    Err(_) => Err(GatewayError::Timeout.into()),
                }
            }
        }
    }
}

/// Clears the in-flight flag when the cycle ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, MagiError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| MagiError::Busy)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Use case for putting a question to the MAGI
///
/// One instance processes at most one question at a time.
pub struct AskMagiUseCase<G: LlmGateway + 'static> {
    dispatcher: Dispatcher<G>,
    config: Arc<dyn ConfigProvider>,
    params: DecisionParams,
    logger: Arc<dyn ConversationLogger>,
    in_flight: AtomicBool,
}

impl<G: LlmGateway + 'static> AskMagiUseCase<G> {
    pub fn new(gateway: Arc<G>, config: Arc<dyn ConfigProvider>) -> Self {
        let params = DecisionParams::default();
        Self {
            dispatcher: Dispatcher {
                gateway,
                retry: params.retry.clone(),
                timeout: params.request_timeout,
                cancel: CancellationToken::new(),
            },
            config,
            params,
            logger: Arc::new(NoConversationLogger),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_params(mut self, params: DecisionParams) -> Self {
        self.dispatcher.retry = params.retry.clone();
        self.dispatcher.timeout = params.request_timeout;
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Cancelling `token` aborts in-flight requests with [`MagiError::Cancelled`]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.dispatcher.cancel = token;
        self
    }

    pub fn params(&self) -> &DecisionParams {
        &self.params
    }

    /// Whether a question is currently being processed
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Current provider settings, rejected before any network call if unusable
    fn provider_config(&self) -> Result<ProviderConfig, MagiError> {
        let config = self.config.provider_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Ask the classifier whether `question` is a yes/no question.
    ///
    /// Provider failures fail open to `false`; only a configuration problem
    /// or cancellation is returned as an error.
    pub async fn is_yes_no_question(&self, question: &Question) -> Result<bool, MagiError> {
        let config = self.provider_config()?;
        self.classify(&self.dispatcher, &config, question).await
    }

    async fn classify(
        &self,
        dispatcher: &Dispatcher<G>,
        config: &ProviderConfig,
        question: &Question,
    ) -> Result<bool, MagiError> {
        let request = ChatRequest::build(
            &config.model,
            &self.params.prompts.yes_no,
            question.query(),
            Some(1),
        );

        match dispatcher.send(config, &request, "classify").await {
            Ok(content) => {
                let is_yes_no = content.trim().to_lowercase() == "yes";
                debug!(reply = %content.trim(), is_yes_no, "Classifier replied");
                Ok(is_yes_no)
            }
            Err(MagiError::Cancelled) => Err(MagiError::Cancelled),
            Err(e) => {
                warn!("Classification failed, treating question as open: {}", e);
                Ok(false)
            }
        }
    }

    /// Ask all three personas and return their verdicts in persona order.
    pub async fn fetch_persona_answers(
        &self,
        question: &Question,
        mode: QuestionMode,
    ) -> Result<[PersonaVerdict; 3], MagiError> {
        let config = self.provider_config()?;
        self.fan_out(&self.dispatcher, &config, question, mode, &NoProgress)
            .await
    }

    async fn fan_out(
        &self,
        dispatcher: &Dispatcher<G>,
        config: &ProviderConfig,
        question: &Question,
        mode: QuestionMode,
        progress: &dyn DecisionProgressNotifier,
    ) -> Result<[PersonaVerdict; 3], MagiError> {
        let user_content = PromptTemplate::persona_query(mode, question.query());
        let mut join_set = JoinSet::new();

        for persona in PersonaId::ALL {
            let dispatcher = dispatcher.clone();
            let config = config.clone();
            let request = ChatRequest::build(
                &config.model,
                self.params.prompts.for_persona(persona),
                &user_content,
                None,
            );

            progress.on_persona_start(persona);
            join_set.spawn(async move {
                let name = format!("persona {}", persona.display_name());
                let result = dispatcher.send(&config, &request, &name).await;
                (persona, result)
            });
        }

        let mut slots: [Option<PersonaVerdict>; 3] = [None, None, None];
        let mut cancelled = false;

        while let Some(joined) = join_set.join_next().await {
            let (persona, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Persona task join error: {}", e);
                    continue;
                }
            };

            let verdict = match result {
                Ok(content) => {
                    info!("{} replied", persona);
                    PersonaVerdict::from_reply(persona, content, mode.is_yes_no())
                }
                Err(MagiError::Cancelled) => {
                    cancelled = true;
                    continue;
                }
                Err(e) => {
                    warn!("{} failed: {}", persona, e);
                    PersonaVerdict::failure(persona, e.diagnostic())
                }
            };

            self.logger.log(ConversationEvent::new(
                "persona_reply",
                json!({
                    "question_id": question.id(),
                    "persona": persona.as_str(),
                    "status": verdict.status.as_str(),
                    "raw_text": verdict.raw_text,
                    "parse_error": verdict.parse_error,
                }),
            ));
            progress.on_persona_complete(&verdict);
            slots[persona.index()] = Some(verdict);
        }

        if cancelled {
            return Err(MagiError::Cancelled);
        }

        Ok(std::array::from_fn(|i| {
            slots[i]
                .take()
                .unwrap_or_else(|| PersonaVerdict::failure(PersonaId::ALL[i], "Task aborted"))
        }))
    }

    /// Execute one decision cycle with default (no-op) progress
    pub async fn execute(&self, question: Question) -> Result<FinalDecision, MagiError> {
        self.execute_with_progress(question, &NoProgress).await
    }

    /// Execute one decision cycle with progress callbacks
    pub async fn execute_with_progress(
        &self,
        question: Question,
        progress: &dyn DecisionProgressNotifier,
    ) -> Result<FinalDecision, MagiError> {
        self.run_cycle(&self.dispatcher, question, progress).await
    }

    /// Execute one decision cycle that `cancel` can abort.
    ///
    /// `cancel` stands in for the instance-wide token for this cycle only,
    /// so a long-lived instance can take a fresh token per question.
    pub async fn execute_cancellable(
        &self,
        question: Question,
        progress: &dyn DecisionProgressNotifier,
        cancel: CancellationToken,
    ) -> Result<FinalDecision, MagiError> {
        let dispatcher = self.dispatcher.with_cancel(cancel);
        self.run_cycle(&dispatcher, question, progress).await
    }

    async fn run_cycle(
        &self,
        dispatcher: &Dispatcher<G>,
        question: Question,
        progress: &dyn DecisionProgressNotifier,
    ) -> Result<FinalDecision, MagiError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let started = Instant::now();

        let config = self.provider_config()?;
        info!(
            provider = %config.provider,
            model = %config.model,
            endpoint = %config.endpoint(),
            "Deliberating on {}",
            question.id()
        );

        let is_yes_no = self.classify(dispatcher, &config, &question).await?;
        let mode = QuestionMode::from_classification(is_yes_no);
        info!("Question classified as {}", mode);
        self.logger.log(ConversationEvent::new(
            "classification",
            json!({
                "question_id": question.id(),
                "question": question.query(),
                "mode": mode.label(),
            }),
        ));
        progress.on_classified(mode);

        let verdicts = self
            .fan_out(dispatcher, &config, &question, mode, progress)
            .await?;
        let outcome = aggregate(&verdicts, mode, self.params.policy);
        let decision = FinalDecision::new(
            &question,
            mode,
            verdicts,
            outcome,
            started.elapsed().as_millis() as u64,
        );

        info!(
            result = %decision.result,
            confidence = decision.confidence,
            consensus = %decision.consensus_level,
            "Decision reached in {}ms",
            decision.processing_time_ms
        );
        self.logger.log(ConversationEvent::new(
            "decision",
            json!({
                "question_id": decision.question_id,
                "result": decision.result.as_str(),
                "confidence": decision.confidence,
                "consensus_level": decision.consensus_level.as_str(),
                "reasoning": decision.reasoning,
                "processing_time_ms": decision.processing_time_ms,
            }),
        ));
        progress.on_decision(&decision);

        Ok(decision)
    }

    /// Probe the provider with a single-token classification request.
    pub async fn check_service_health(&self) -> ServiceHealth {
        let config = match self.provider_config() {
            Ok(config) => config,
            Err(e) => return unhealthy(&e),
        };

        let request = ChatRequest::build(
            &config.model,
            &self.params.prompts.yes_no,
            "Is the service available?",
            Some(1),
        );

        match self.dispatcher.send(&config, &request, "health").await {
            Ok(_) => ServiceHealth {
                available: true,
                error: None,
                suggestion: None,
            },
            Err(e) => {
                warn!("Health check failed: {}", e);
                unhealthy(&e)
            }
        }
    }
}

fn unhealthy(error: &MagiError) -> ServiceHealth {
    ServiceHealth {
        available: false,
        error: Some(error.user_message()),
        suggestion: Some(error.suggestion().to_string()),
    }
}
