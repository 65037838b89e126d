use super::{pause, warmup_jitter};
use crate::analytics::metrics::RunMetrics;
use crate::configs::run::RunConfig;
use crate::error::{HammerError, OperationError};
use crate::invoker::{Session, SessionFactory, Transaction};
use crate::utils::finish_condition::RunFinishCondition;
use hammer_report::actor_kind::ActorKind;
use hammer_report::actor_stats::ActorStats;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchOutcome {
    Completed,
    Stopped,
}

pub struct Inserter {
    session_factory: Arc<dyn SessionFactory>,
    inserter_id: u32,
    config: Arc<RunConfig>,
    metrics: Arc<RunMetrics>,
    finish_condition: Arc<RunFinishCondition>,
    warmup_jitter: Duration,
}

impl Inserter {
    pub fn new(
        session_factory: Arc<dyn SessionFactory>,
        inserter_id: u32,
        config: Arc<RunConfig>,
        metrics: Arc<RunMetrics>,
        finish_condition: Arc<RunFinishCondition>,
        warmup_jitter: Duration,
    ) -> Self {
        Self {
            session_factory,
            inserter_id,
            config,
            metrics,
            finish_condition,
            warmup_jitter,
        }
    }

    pub async fn run(&self) -> Result<ActorStats, HammerError> {
        warmup_jitter(self.warmup_jitter).await;

        let mut session = self.session_factory.create_session().await?;
        let batch_size = self.config.insert_batch_size;
        let target = self.finish_condition.total();
        let mut report = ActorStats::new(ActorKind::Inserter, self.inserter_id);

        info!(
            "Inserter #{} → calling '{}' in batches of {} until {}...",
            self.inserter_id,
            self.config.insert_operation,
            batch_size,
            self.finish_condition.total_str()
        );

        loop {
            let transaction = if self.config.use_transaction_for_insert_batch {
                let transaction = session
                    .begin_transaction()
                    .await
                    .map_err(|e| HammerError::operation_failed("begin transaction", e))?;
                Some(transaction)
            } else {
                None
            };

            let batch_start = Instant::now();
            let outcome = self
                .run_batch(session.as_mut(), transaction.as_ref(), &mut report)
                .await;
            match outcome {
                Ok(BatchOutcome::Completed) => {}
                Ok(BatchOutcome::Stopped) => {
                    self.release(session.as_mut(), transaction).await;
                    break;
                }
                Err(error) => {
                    self.release(session.as_mut(), transaction).await;
                    return Err(error);
                }
            }

            if let Some(transaction) = transaction {
                match session.commit(transaction).await {
                    Ok(()) => {}
                    Err(OperationError::Timeout) => {
                        self.metrics.increment_timeouts();
                        report.timeouts += 1;
                        warn!("Inserter #{} → batch commit timed out", self.inserter_id);
                    }
                    Err(error) => return Err(HammerError::operation_failed("commit", error)),
                }
            }

            let elapsed = batch_start.elapsed();
            if !self
                .metrics
                .record_insert_batch(elapsed, batch_size, target)
            {
                debug!(
                    "Inserter #{} → target already reached, last batch not counted",
                    self.inserter_id
                );
                break;
            }
            report.batches += 1;

            pause(self.config.insert_batch_delay()).await;
        }

        report.print_finished();
        Ok(report)
    }

    async fn run_batch(
        &self,
        session: &mut dyn Session,
        transaction: Option<&Transaction>,
        report: &mut ActorStats,
    ) -> Result<BatchOutcome, HammerError> {
        let operation = self.config.insert_operation.as_str();
        let timeout = self.config.query_timeout();

        for _ in 0..self.config.insert_batch_size {
            if self.finish_condition.check() {
                return Ok(BatchOutcome::Stopped);
            }

            report.units += 1;
            match session.invoke(operation, timeout, transaction).await {
                Ok(()) => {}
                Err(OperationError::Timeout) => {
                    self.metrics.increment_timeouts();
                    report.timeouts += 1;
                }
                Err(error) => return Err(HammerError::operation_failed(operation, error)),
            }
        }
        Ok(BatchOutcome::Completed)
    }

    /// Rolls back a batch that will never be committed.
    async fn release(&self, session: &mut dyn Session, transaction: Option<Transaction>) {
        let Some(transaction) = transaction else {
            return;
        };
        if let Err(error) = session.rollback(transaction).await {
            warn!(
                "Inserter #{} → cannot roll back unfinished batch: {error}",
                self.inserter_id
            );
        }
    }
}
