use crate::actors::inserter::Inserter;
use crate::actors::selector::Selector;
use crate::actors::MAX_WARMUP_JITTER;
use crate::analytics::clock::RunClock;
use crate::analytics::metrics::RunMetrics;
use crate::analytics::report_builder::RunReportBuilder;
use crate::analytics::sampler::{
    Sampler, SamplerOutput, SharedLog, DEFAULT_ECHO_INTERVAL, DEFAULT_SAMPLING_INTERVAL,
};
use crate::configs::run::RunConfig;
use crate::error::HammerError;
use crate::invoker::SessionFactory;
use crate::output::time_series_log::TimeSeriesLog;
use crate::utils::finish_condition::RunFinishCondition;
use chrono::Local;
use futures::future::select_all;
use hammer_report::actor_failure::ActorFailure;
use hammer_report::actor_kind::ActorKind;
use hammer_report::actor_stats::ActorStats;
use hammer_report::report::RunReport;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

type ActorHandle = JoinHandle<Result<ActorStats, HammerError>>;

/// Result of a finished run together with the log, so callers can keep appending.
pub struct RunOutcome<W> {
    pub report: RunReport,
    pub log: TimeSeriesLog<W>,
}

/// Owns the worker pool of a run: launches inserters, selectors and the
/// sampler, joins them and produces the final report.
pub struct RunCoordinator {
    config: Arc<RunConfig>,
    session_factory: Arc<dyn SessionFactory>,
    sampling_interval: Duration,
    echo_interval: Duration,
    warmup_jitter: Duration,
}

impl RunCoordinator {
    pub fn new(config: RunConfig, session_factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            config: Arc::new(config),
            session_factory,
            sampling_interval: DEFAULT_SAMPLING_INTERVAL,
            echo_interval: DEFAULT_ECHO_INTERVAL,
            warmup_jitter: MAX_WARMUP_JITTER,
        }
    }

    pub fn with_sampling(mut self, sampling_interval: Duration, echo_interval: Duration) -> Self {
        self.sampling_interval = sampling_interval;
        self.echo_interval = echo_interval;
        self
    }

    pub fn with_warmup_jitter(mut self, warmup_jitter: Duration) -> Self {
        self.warmup_jitter = warmup_jitter;
        self
    }

    /// Calls the configured setup operation on a dedicated session.
    pub async fn run_setup(&self) -> Result<(), HammerError> {
        let Some(operation) = self.config.setup_operation.as_deref() else {
            return Ok(());
        };
        info!("Running setup operation '{operation}'");
        let mut session = self.session_factory.create_session().await?;
        session
            .invoke(operation, self.config.query_timeout(), None)
            .await
            .map_err(|e| HammerError::operation_failed(operation, e))
    }

    /// Appends the table of the configured diagnostics operation to the log.
    pub async fn collect_diagnostics<W: AsyncWrite + Unpin + Send>(
        &self,
        log: &mut TimeSeriesLog<W>,
    ) -> Result<(), HammerError> {
        let Some(operation) = self.config.diagnostics_operation.as_deref() else {
            return Ok(());
        };
        info!("Collecting diagnostics from '{operation}'");
        let mut session = self.session_factory.create_session().await?;
        let table = session
            .fetch_table(operation, self.config.query_timeout())
            .await
            .map_err(|e| HammerError::operation_failed(operation, e))?;
        log.write_diagnostics("Diagnostics", &table).await?;
        Ok(())
    }

    pub async fn run<W: AsyncWrite + Unpin + Send + 'static>(
        &self,
        mut log: TimeSeriesLog<W>,
    ) -> Result<RunOutcome<W>, HammerError> {
        if self.config.insert_threads > 0 && self.config.insert_batch_size == 0 {
            return Err(HammerError::InvalidConfiguration(
                "insert_batch_size must be at least 1".to_owned(),
            ));
        }
        log.write_header().await?;
        let log: SharedLog<W> = Arc::new(Mutex::new(log));

        let metrics = Arc::new(RunMetrics::new());
        let finish_condition = RunFinishCondition::new(self.config.inserts, metrics.clone());
        let clock = Arc::new(RunClock::new());

        let started_at = Local::now();
        clock.start();

        let (mut actors, mut handles) = self.spawn_actors(&metrics, &finish_condition);
        let sampler = Sampler::new(
            metrics.clone(),
            clock.clone(),
            finish_condition.clone(),
            log.clone(),
        )
        .with_intervals(self.sampling_interval, self.echo_interval)
        .spawn();

        let mut inserters_left = self.config.insert_threads;
        if inserters_left == 0 {
            warn!("No insert workers configured, stopping selectors right away");
            finish_condition.halt();
        }

        info!("Waiting for workers to complete");
        let mut actor_stats = Vec::new();
        let mut failures = Vec::new();
        while !handles.is_empty() {
            let (result, index, remaining) = select_all(handles).await;
            handles = remaining;
            // select_all swap-removes the finished future
            let (actor_kind, actor_id) = actors.swap_remove(index);
            if actor_kind == ActorKind::Inserter {
                inserters_left -= 1;
            }

            match result.map_err(HammerError::from).and_then(|r| r) {
                Ok(stats) => actor_stats.push(stats),
                Err(error) => {
                    let failure = ActorFailure::new(
                        actor_kind,
                        actor_id,
                        error.kind().to_owned(),
                        error.to_string(),
                    );
                    error!("{}", failure.formatted_string());
                    failures.push(failure);
                }
            }

            if inserters_left == 0 && !finish_condition.check() {
                warn!(
                    "All inserters stopped at {}, stopping selectors",
                    finish_condition.status()
                );
                finish_condition.halt();
            }
        }

        clock.stop();
        let finished_at = Local::now();
        info!("All workers finished, waiting for the sampler to stop");
        let SamplerOutput { samples, .. } = match sampler.stop().await {
            Ok(output) => output,
            Err(error) => {
                error!("Sampler failed, reporting without samples: {error}");
                SamplerOutput::default()
            }
        };
        let mut log = Arc::try_unwrap(log)
            .map_err(|_| HammerError::LogStillShared)?
            .into_inner();

        let summary = metrics.snapshot().to_summary(clock.elapsed());
        let completed = finish_condition.is_target_reached();
        let params = self.config.to_params(self.session_factory.describe());
        let report = RunReportBuilder::build(
            params,
            started_at,
            finished_at,
            completed,
            summary,
            samples,
            actor_stats,
            failures,
        );

        report.print_summary();
        log.write_summary(&report.summary).await?;

        Ok(RunOutcome { report, log })
    }

    fn spawn_actors(
        &self,
        metrics: &Arc<RunMetrics>,
        finish_condition: &Arc<RunFinishCondition>,
    ) -> (Vec<(ActorKind, u32)>, Vec<ActorHandle>) {
        let inserters = self.config.insert_threads;
        let selectors = self.config.select_threads;
        let mut actors = Vec::with_capacity((inserters + selectors) as usize);
        let mut handles = Vec::with_capacity((inserters + selectors) as usize);

        info!(
            "Starting {} insert workers with {} ms cycle time",
            inserters, self.config.insert_batch_delay_ms
        );
        for inserter_id in 1..=inserters {
            let inserter = Inserter::new(
                self.session_factory.clone(),
                inserter_id,
                self.config.clone(),
                metrics.clone(),
                finish_condition.clone(),
                self.warmup_jitter,
            );
            actors.push((ActorKind::Inserter, inserter_id));
            handles.push(tokio::spawn(async move { inserter.run().await }));
        }

        info!(
            "Starting {} select workers with {} ms cycle time",
            selectors, self.config.select_delay_ms
        );
        for selector_id in 1..=selectors {
            let selector = Selector::new(
                self.session_factory.clone(),
                selector_id,
                self.config.clone(),
                metrics.clone(),
                finish_condition.clone(),
                self.warmup_jitter,
            );
            actors.push((ActorKind::Selector, selector_id));
            handles.push(tokio::spawn(async move { selector.run().await }));
        }

        (actors, handles)
    }
}
