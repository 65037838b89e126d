use super::clock::RunClock;
use super::metrics::RunMetrics;
use crate::error::HammerError;
use crate::output::time_series_log::TimeSeriesLog;
use crate::utils::finish_condition::RunFinishCondition;
use hammer_report::sample_record::SampleRecord;
use hammer_report::summary::RunSummary;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Time-series log shared between the coordinator and the sampler.
pub type SharedLog<W> = Arc<Mutex<TimeSeriesLog<W>>>;

pub const DEFAULT_SAMPLING_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_ECHO_INTERVAL: Duration = Duration::from_secs(100);

/// What the sampler hands back once it is stopped.
#[derive(Debug, Default)]
pub struct SamplerOutput {
    pub samples: Vec<SampleRecord>,
    /// Progress summaries printed, at most one per echo interval.
    pub echoes: u32,
}

/// Periodic task appending a [`SampleRecord`] to the time-series log.
pub struct Sampler<W> {
    metrics: Arc<RunMetrics>,
    clock: Arc<RunClock>,
    finish_condition: Arc<RunFinishCondition>,
    log: SharedLog<W>,
    sampling_interval: Duration,
    echo_interval: Duration,
    samples: Vec<SampleRecord>,
    echoes: u32,
    last_echo_bucket: u128,
    log_failed: bool,
}

pub struct SamplerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<SamplerOutput>,
}

impl<W: AsyncWrite + Unpin + Send + 'static> Sampler<W> {
    pub fn new(
        metrics: Arc<RunMetrics>,
        clock: Arc<RunClock>,
        finish_condition: Arc<RunFinishCondition>,
        log: SharedLog<W>,
    ) -> Self {
        Self {
            metrics,
            clock,
            finish_condition,
            log,
            sampling_interval: DEFAULT_SAMPLING_INTERVAL,
            echo_interval: DEFAULT_ECHO_INTERVAL,
            samples: Vec::new(),
            echoes: 0,
            last_echo_bucket: 0,
            log_failed: false,
        }
    }

    pub fn with_intervals(mut self, sampling_interval: Duration, echo_interval: Duration) -> Self {
        self.sampling_interval = sampling_interval;
        self.echo_interval = echo_interval;
        self
    }

    pub fn spawn(self) -> SamplerHandle {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(shutdown_rx));
        SamplerHandle { shutdown, task }
    }

    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> SamplerOutput {
        let period = self.sampling_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => self.sample().await,
            }
        }

        debug!(
            "Sampler stopped after {} samples and {} echoes",
            self.samples.len(),
            self.echoes
        );
        SamplerOutput {
            samples: self.samples,
            echoes: self.echoes,
        }
    }

    async fn sample(&mut self) {
        if self.finish_condition.check() {
            return;
        }

        let elapsed = self.clock.elapsed();
        let record = self.metrics.snapshot().to_sample(elapsed);
        if !self.log_failed {
            if let Err(error) = self.log.lock().await.append_sample(&record).await {
                warn!("Cannot append sample to the time-series log, further samples are kept in memory only: {error}");
                self.log_failed = true;
            }
        }
        self.samples.push(record);

        let echo_nanos = self.echo_interval.as_nanos().max(1);
        let bucket = elapsed.as_nanos() / echo_nanos;
        if bucket > self.last_echo_bucket {
            self.last_echo_bucket = bucket;
            self.echoes += 1;
            RunSummary::from(&record).print_progress();
            debug!("Progress: {}", self.finish_condition.status());
        }
    }
}

impl SamplerHandle {
    /// Stops the sampler and waits until its last tick has finished.
    pub async fn stop(self) -> Result<SamplerOutput, HammerError> {
        // The task may already be gone if it panicked, the join reports that.
        let _ = self.shutdown.send(());
        Ok(self.task.await?)
    }
}
