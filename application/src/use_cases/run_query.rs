//! Run Query use case
//!
//! Sends one prompt to every selected target concurrently and collects a
//! response plus a status record per target.

use crate::config::ExecutionParams;
use crate::ports::api_keys::ApiKeyResolver;
use crate::ports::llm_gateway::{
    GatewayError, GenerateRequest, Generation, ProviderClient, ProviderRegistry,
};
use crate::ports::progress::{NoProgress, QueryProgressNotifier};
use chrono::{DateTime, Utc};
use prism_domain::{
    ClassifyContext, ErrorCategory, LlmResponse, ModelTarget, PromptContent, QueryStatusRecord,
    RunResult, Timing, elapsed_ms,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Input for the RunQuery use case
#[derive(Debug, Clone)]
pub struct RunQueryInput {
    /// Targets in selection order
    pub targets: Vec<ModelTarget>,
    /// Prompt, already enriched with context files
    pub prompt: PromptContent,
    /// Run-level system prompt; wins over any group prompt
    pub system_prompt_override: Option<String>,
    pub params: ExecutionParams,
    pub classify_context: ClassifyContext,
}

impl RunQueryInput {
    pub fn new(targets: Vec<ModelTarget>, prompt: PromptContent) -> Self {
        Self {
            targets,
            prompt,
            system_prompt_override: None,
            params: ExecutionParams::default(),
            classify_context: ClassifyContext::default(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt_override = Some(system_prompt.into());
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_classify_context(mut self, context: ClassifyContext) -> Self {
        self.classify_context = context;
        self
    }

    /// System prompt for one target: run override, then group prompt.
    fn system_prompt_for(&self, target: &ModelTarget) -> Option<String> {
        self.system_prompt_override.clone().or_else(|| {
            target
                .group
                .as_ref()
                .and_then(|g| g.system_prompt.clone())
        })
    }
}

/// Messages from in-flight calls back to the ledger owner
enum QueryEvent {
    Started {
        index: usize,
        at: DateTime<Utc>,
    },
    Finished {
        index: usize,
        at: DateTime<Utc>,
        outcome: Result<Generation, GatewayError>,
    },
}

/// Use case for fanning a prompt out to many models
pub struct RunQueryUseCase {
    registry: Arc<ProviderRegistry>,
    keys: Arc<dyn ApiKeyResolver>,
}

impl RunQueryUseCase {
    pub fn new(registry: Arc<ProviderRegistry>, keys: Arc<dyn ApiKeyResolver>) -> Self {
        Self { registry, keys }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunQueryInput) -> RunResult {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case, reporting every status transition.
    ///
    /// Never fails as a whole: every target ends in `success` or `error`,
    /// and the result lists targets in the order they were given.
    pub async fn execute_with_progress(
        &self,
        input: RunQueryInput,
        progress: &dyn QueryProgressNotifier,
    ) -> RunResult {
        let total = input.targets.len();
        info!("Querying {} model(s)", total);
        progress.on_run_start(total);

        let mut ledger = Ledger::new(&input, progress);
        for record in &ledger.records {
            progress.on_query_status(record);
        }

        let semaphore = input
            .params
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit)));
        let call_timeout = input.params.call_timeout;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut join_set = JoinSet::new();

        for (index, target) in input.targets.iter().enumerate() {
            let (client, api_key) = match self.prepare(target) {
                Ok(prepared) => prepared,
                Err(e) => {
                    warn!("Cannot dispatch {}: {}", target, e);
                    let now = Utc::now();
                    ledger.start(index, now);
                    ledger.finish(index, now, Err(e));
                    continue;
                }
            };

            let request = GenerateRequest {
                prompt: input.prompt.rendered().to_string(),
                model_id: target.model_id.clone(),
                system_prompt: input.system_prompt_for(target),
                api_key,
            };
            let semaphore = semaphore.clone();
            let tx = tx.clone();

            join_set.spawn(async move {
                // Held until the call resolves so the next queued target can start
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let _ = tx.send(QueryEvent::Started {
                    index,
                    at: Utc::now(),
                });
                let outcome = Self::call(client.as_ref(), &request, call_timeout).await;
                let _ = tx.send(QueryEvent::Finished {
                    index,
                    at: Utc::now(),
                    outcome,
                });
            });
        }
        drop(tx);

        while let Some(event) = rx.recv().await {
            match event {
                QueryEvent::Started { index, at } => ledger.start(index, at),
                QueryEvent::Finished { index, at, outcome } => ledger.finish(index, at, outcome),
            }
        }

        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                warn!("Query task join error: {}", e);
            }
        }

        let result = ledger.into_result();
        info!(
            "Query phase complete: {} succeeded, {} failed in {}ms",
            result.success_count(),
            result.failure_count(),
            result.timing.duration_ms
        );
        progress.on_run_complete(&result);
        result
    }

    fn prepare(
        &self,
        target: &ModelTarget,
    ) -> Result<(Arc<dyn ProviderClient>, String), GatewayError> {
        let client = self.registry.get(&target.provider)?;
        let api_key = self
            .keys
            .api_key(target)
            .ok_or_else(|| GatewayError::MissingApiKey(target.config_key()))?;
        Ok((client, api_key))
    }

    async fn call(
        client: &dyn ProviderClient,
        request: &GenerateRequest,
        call_timeout: Option<Duration>,
    ) -> Result<Generation, GatewayError> {
        match call_timeout {
            Some(limit) => match tokio::time::timeout(limit, client.generate(request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(GatewayError::Timeout(limit)),
            },
            None => client.generate(request).await,
        }
    }
}

/// Status records and responses, owned by the executor loop
struct Ledger<'a> {
    input: &'a RunQueryInput,
    progress: &'a dyn QueryProgressNotifier,
    records: Vec<QueryStatusRecord>,
    responses: Vec<Option<LlmResponse>>,
}

impl<'a> Ledger<'a> {
    fn new(input: &'a RunQueryInput, progress: &'a dyn QueryProgressNotifier) -> Self {
        Self {
            input,
            progress,
            records: input
                .targets
                .iter()
                .map(|t| QueryStatusRecord::pending(t.config_key()))
                .collect(),
            responses: vec![None; input.targets.len()],
        }
    }

    fn start(&mut self, index: usize, at: DateTime<Utc>) {
        let record = &mut self.records[index];
        if let Err(e) = record.start(at) {
            warn!("{}", e);
            return;
        }
        debug!("{} running", record.config_key);
        self.progress.on_query_status(record);
    }

    fn finish(
        &mut self,
        index: usize,
        at: DateTime<Utc>,
        outcome: Result<Generation, GatewayError>,
    ) {
        let target = &self.input.targets[index];
        let system_prompt = self.input.system_prompt_for(target);
        let record = &mut self.records[index];

        let (transition, response) = match outcome {
            Ok(generation) => {
                let response_time = record.start_time.map_or(0, |start| elapsed_ms(start, at));
                let metadata = generation
                    .metadata
                    .unwrap_or_default()
                    .with_response_time(response_time);
                info!("{} responded in {}ms", record.config_key, response_time);
                (
                    record.succeed(at),
                    LlmResponse::success(target, generation.text)
                        .with_system_prompt(system_prompt)
                        .with_metadata(metadata),
                )
            }
            Err(e) => {
                let classified = e.classify(&self.input.classify_context);
                warn!(
                    "{} failed ({}): {}",
                    record.config_key,
                    classified.category(),
                    classified.message()
                );
                (
                    record.fail_classified(at, &classified),
                    LlmResponse::failure(target, classified.message())
                        .with_system_prompt(system_prompt),
                )
            }
        };

        if let Err(e) = transition {
            warn!("{}", e);
            return;
        }
        self.responses[index] = Some(response);
        self.progress.on_query_status(record);
    }

    /// Close out anything a vanished task left open and assemble the result.
    fn into_result(mut self) -> RunResult {
        const LOST: &str = "Query task ended without reporting a result";

        let now = Utc::now();
        for index in 0..self.records.len() {
            let record = &mut self.records[index];
            if record.is_terminal() {
                continue;
            }
            if record.start_time.is_none() {
                let _ = record.start(now);
            }
            if record.fail(now, LOST, ErrorCategory::Unknown).is_ok() {
                self.responses[index] =
                    Some(LlmResponse::failure(&self.input.targets[index], LOST));
                self.progress.on_query_status(record);
            }
        }

        let timing = Timing::spanning(
            self.records
                .iter()
                .filter_map(|r| Some((r.start_time?, r.end_time?))),
        )
        .unwrap_or_else(|| Timing::instant(now));

        let responses = self
            .responses
            .into_iter()
            .zip(&self.input.targets)
            .map(|(response, target)| {
                response.unwrap_or_else(|| LlmResponse::failure(target, LOST))
            })
            .collect();

        RunResult {
            responses,
            statuses: self.records,
            timing,
        }
    }
}
