use super::{pause, warmup_jitter};
use crate::analytics::metrics::RunMetrics;
use crate::configs::run::RunConfig;
use crate::error::{HammerError, OperationError};
use crate::invoker::SessionFactory;
use crate::utils::finish_condition::RunFinishCondition;
use hammer_report::actor_kind::ActorKind;
use hammer_report::actor_stats::ActorStats;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

pub struct Selector {
    session_factory: Arc<dyn SessionFactory>,
    selector_id: u32,
    config: Arc<RunConfig>,
    metrics: Arc<RunMetrics>,
    finish_condition: Arc<RunFinishCondition>,
    warmup_jitter: Duration,
}

impl Selector {
    pub fn new(
        session_factory: Arc<dyn SessionFactory>,
        selector_id: u32,
        config: Arc<RunConfig>,
        metrics: Arc<RunMetrics>,
        finish_condition: Arc<RunFinishCondition>,
        warmup_jitter: Duration,
    ) -> Self {
        Self {
            session_factory,
            selector_id,
            config,
            metrics,
            finish_condition,
            warmup_jitter,
        }
    }

    pub async fn run(&self) -> Result<ActorStats, HammerError> {
        warmup_jitter(self.warmup_jitter).await;

        let mut session = self.session_factory.create_session().await?;
        let operation = self.config.select_operation.as_str();
        let timeout = self.config.query_timeout();
        let recompile_after = self.config.recompile_select_after;
        let mut report = ActorStats::new(ActorKind::Selector, self.selector_id);

        info!(
            "Selector #{} → calling '{}' every {} ms until {}...",
            self.selector_id,
            operation,
            self.config.select_delay_ms,
            self.finish_condition.total_str()
        );

        while !self.finish_condition.check() {
            let before_call = Instant::now();
            report.units += 1;
            match session.invoke(operation, timeout, None).await {
                Ok(()) => {}
                Err(OperationError::Timeout) => {
                    self.metrics.increment_timeouts();
                    report.timeouts += 1;
                }
                Err(error) => return Err(HammerError::operation_failed(operation, error)),
            }
            let selects = self.metrics.record_select(before_call.elapsed());

            if recompile_after > 0 && selects % recompile_after == 0 {
                if let Err(error) = session
                    .force_recompile(&self.config.insert_operation)
                    .await
                {
                    debug!(
                        "Selector #{} → recompile of '{}' after {} selects failed: {error}",
                        self.selector_id, self.config.insert_operation, selects
                    );
                }
            }

            pause(self.config.select_delay()).await;
        }

        report.print_finished();
        Ok(report)
    }
}
