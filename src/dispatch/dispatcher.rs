//! Concurrent submission dispatcher
//!
//! A run pre-loads a FIFO queue with one token per submission and spawns a
//! fixed pool of worker tasks. Each worker claims a token, synthesizes a
//! payload, and drives it through the retry state machine until it reaches
//! a terminal state. The run ends when every worker has drained the queue.

use super::observer::{Outcome, ProgressObserver};
use super::retry::{RetryPolicy, SubmitError};
use super::stats::{RunStats, StatsRecorder};
use crate::answers::OverrideMap;
use crate::config::{Config, UserAgentConfig};
use crate::http::build_http_client;
use crate::schema::FormSchema;
use crate::synth::{SubmissionPayload, Synthesizer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::{Client, StatusCode};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;

/// Failure reason for submissions whose worker died before finishing them
const WORKER_ABORTED: &str = "worker aborted";

/// Worker pool and request settings
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Concurrent workers
    pub workers: usize,

    pub retry: RetryPolicy,

    /// Whole-request timeout
    pub request_timeout: Duration,

    /// Fixed pause before every request, retries included
    pub request_delay: Duration,

    pub user_agent: UserAgentConfig,
}

impl DispatchConfig {
    /// Derives dispatch settings from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            workers: config.dispatch.workers as usize,
            retry: RetryPolicy::with_max_retries(config.dispatch.max_retries),
            request_timeout: Duration::from_secs(config.dispatch.request_timeout_secs),
            request_delay: Duration::from_millis(config.dispatch.request_delay_ms),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Sends synthesized submissions for one schema
pub struct Dispatcher {
    schema: Arc<FormSchema>,
    config: DispatchConfig,
    clients: Vec<Client>,
    overrides: Option<Arc<OverrideMap>>,
    default_text: Option<Arc<str>>,
    seed: Option<u64>,
    observer: Option<Arc<dyn ProgressObserver>>,
}

/// State shared by the workers of one run
struct RunContext {
    schema: Arc<FormSchema>,
    retry: RetryPolicy,
    request_delay: Duration,
    overrides: Option<Arc<OverrideMap>>,
    default_text: Option<Arc<str>>,
    observer: Option<Arc<dyn ProgressObserver>>,
    queue: Mutex<VecDeque<u64>>,
    stats: StatsRecorder,
    /// Tokens of this run that reached a terminal state
    finished: AtomicU64,
}

impl Dispatcher {
    /// Creates a dispatcher with one private HTTP client per worker
    ///
    /// # Returns
    ///
    /// * `Ok(Dispatcher)` - Ready to run
    /// * `Err(reqwest::Error)` - An HTTP client could not be built
    pub fn new(schema: Arc<FormSchema>, config: DispatchConfig) -> Result<Self, reqwest::Error> {
        let workers = config.workers.max(1);
        let clients = (0..workers)
            .map(|_| build_http_client(&config.user_agent, config.request_timeout))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            schema,
            config,
            clients,
            overrides: None,
            default_text: None,
            seed: None,
            observer: None,
        })
    }

    /// Fixed answers that replace synthesis for their questions
    pub fn with_overrides(mut self, overrides: OverrideMap) -> Self {
        self.overrides = (!overrides.is_empty()).then(|| Arc::new(overrides));
        self
    }

    /// Answer for every free-text question instead of generated text
    pub fn with_default_text(mut self, text: Option<String>) -> Self {
        self.default_text = text.map(Arc::from);
        self
    }

    /// Makes synthesized answers reproducible; worker `i` uses `seed + i`
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Observer notified once per terminal submission
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Sends `count` submissions and returns the final counters
    pub async fn run(&self, count: u64) -> RunStats {
        self.run_with_stats(count, StatsRecorder::new()).await
    }

    /// Like `run`, recording into a caller-held `StatsRecorder`
    ///
    /// Dropping the returned future aborts all workers; counters already
    /// recorded in `stats` stay valid, so the caller can report a partial run.
    pub async fn run_with_stats(&self, count: u64, stats: StatsRecorder) -> RunStats {
        let ctx = Arc::new(RunContext {
            schema: self.schema.clone(),
            retry: self.config.retry.clone(),
            request_delay: self.config.request_delay,
            overrides: self.overrides.clone(),
            default_text: self.default_text.clone(),
            observer: self.observer.clone(),
            queue: Mutex::new((0..count).collect()),
            stats: stats.clone(),
            finished: AtomicU64::new(0),
        });

        let worker_count = self.clients.len().min(count as usize);
        tracing::info!(
            "Dispatching {} submissions to {} with {} workers",
            count,
            self.schema.submission_url,
            worker_count
        );

        let mut workers = JoinSet::new();
        for (index, client) in self.clients.iter().take(worker_count).enumerate() {
            let synthesizer = match self.seed {
                Some(seed) => Synthesizer::seeded(seed.wrapping_add(index as u64)),
                None => Synthesizer::from_entropy(),
            };
            workers.spawn(run_worker(index, ctx.clone(), client.clone(), synthesizer));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }
        ctx.abandon_unfinished(count);

        let final_stats = stats.snapshot();
        tracing::info!(
            "Dispatch finished: {} succeeded, {} failed, {} retries",
            final_stats.success,
            final_stats.failed,
            final_stats.retries
        );
        final_stats
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("submission_url", &self.schema.submission_url)
            .field("config", &self.config)
            .field("has_overrides", &self.overrides.is_some())
            .field("seed", &self.seed)
            .finish()
    }
}

impl RunContext {
    fn claim(&self) -> Option<u64> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    /// Records one terminal outcome and notifies the observer
    ///
    /// A panicking observer is logged and does not take the worker down.
    fn finish(&self, result: Result<(), String>) {
        let outcome = match result {
            Ok(()) => {
                self.stats.record_success();
                Outcome::Success
            }
            Err(reason) => {
                self.stats.record_failure(reason);
                Outcome::Failure
            }
        };
        self.finished.fetch_add(1, Ordering::SeqCst);

        if let Some(observer) = &self.observer {
            if catch_unwind(AssertUnwindSafe(|| observer.recorded(outcome))).is_err() {
                tracing::error!("Progress observer panicked on {:?}", outcome);
            }
        }
    }

    /// Fails every token no worker brought to a terminal state
    ///
    /// Covers tokens left in the queue and tokens held by a worker that died
    /// mid-submission, so `success + failed` always reaches `count`.
    fn abandon_unfinished(&self, count: u64) {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();

        let unfinished = count.saturating_sub(self.finished.load(Ordering::SeqCst));
        if unfinished > 0 {
            tracing::warn!("{} submissions abandoned by dead workers", unfinished);
        }
        for _ in 0..unfinished {
            self.finish(Err(WORKER_ABORTED.to_string()));
        }
    }
}

async fn run_worker(index: usize, ctx: Arc<RunContext>, client: Client, mut synthesizer: Synthesizer) {
    let mut jitter_rng = StdRng::from_entropy();

    while let Some(token) = ctx.claim() {
        let mut payload = synthesizer.synthesize(
            &ctx.schema,
            ctx.overrides.as_deref(),
            ctx.default_text.as_deref(),
        );
        payload.merge_hidden(&ctx.schema.hidden_fields);

        let result = submit(&ctx, &client, &payload, &mut jitter_rng).await;
        if let Err(reason) = &result {
            tracing::warn!("Submission {} failed: {}", token, reason);
        } else {
            tracing::debug!("Submission {} accepted (worker {})", token, index);
        }
        ctx.finish(result);
    }

    tracing::debug!("Worker {} found the queue empty", index);
}

/// Sends one payload until it succeeds, fails terminally or runs out of retries
async fn submit(
    ctx: &RunContext,
    client: &Client,
    payload: &SubmissionPayload,
    rng: &mut StdRng,
) -> Result<(), String> {
    let mut attempt: u32 = 0;

    loop {
        if !ctx.request_delay.is_zero() {
            tokio::time::sleep(ctx.request_delay).await;
        }

        let error = match client
            .post(&ctx.schema.submission_url)
            .form(payload.fields())
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => return Ok(()),
            Ok(response) => SubmitError::Status(response.status().as_u16()),
            Err(e) => SubmitError::Network(e.to_string()),
        };

        if !error.is_retryable() {
            return Err(error.to_string());
        }
        if attempt >= ctx.retry.max_retries {
            return Err(error.exhausted_reason());
        }

        ctx.stats.record_retry();
        let wait = ctx.retry.delay_for(&error, attempt, rng);
        tracing::debug!(
            "Attempt {} got {}, retrying in {:.2}s",
            attempt + 1,
            error,
            wait.as_secs_f64()
        );
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}
