use crate::analytics::metrics::RunMetrics;
use human_repr::HumanCount;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Shared stop predicate: the run is over once the insert counter reaches
/// the target, or once the coordinator halted it.
pub struct RunFinishCondition {
    target: u64,
    metrics: Arc<RunMetrics>,
    halted: AtomicBool,
}

impl RunFinishCondition {
    pub fn new(target: u64, metrics: Arc<RunMetrics>) -> Arc<Self> {
        Arc::new(Self {
            target,
            metrics,
            halted: AtomicBool::new(false),
        })
    }

    pub fn check(&self) -> bool {
        self.is_target_reached() || self.halted.load(Ordering::Acquire)
    }

    pub fn is_target_reached(&self) -> bool {
        self.metrics.inserts() >= self.target
    }

    /// Makes every later [`check`](Self::check) succeed regardless of progress.
    pub fn halt(&self) {
        self.halted.store(true, Ordering::Release);
    }

    pub fn total(&self) -> u64 {
        self.target
    }

    pub fn left(&self) -> u64 {
        self.target.saturating_sub(self.metrics.inserts())
    }

    pub fn total_str(&self) -> String {
        format!("{} inserts", self.target.human_count_bare())
    }

    pub fn status(&self) -> String {
        format!(
            "{}/{} ({} left)",
            self.metrics.inserts().human_count_bare(),
            self.target.human_count_bare(),
            self.left().human_count_bare()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_finish_when_inserts_reach_target() {
        let metrics = Arc::new(RunMetrics::new());
        let condition = RunFinishCondition::new(100, metrics.clone());

        metrics.increment_inserts(90);
        assert!(!condition.check());
        assert_eq!(condition.left(), 10);

        metrics.increment_inserts(10);
        assert!(condition.check());
        assert!(condition.is_target_reached());
        assert_eq!(condition.left(), 0);
    }

    #[test]
    fn halt_should_finish_without_reaching_target() {
        let metrics = Arc::new(RunMetrics::new());
        let condition = RunFinishCondition::new(100, metrics);

        condition.halt();

        assert!(condition.check());
        assert!(!condition.is_target_reached());
    }
}
