use super::{Session, SessionFactory, Table, Transaction};
use crate::error::{HammerError, OperationError};
use async_trait::async_trait;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

/// Behaviour of the in-process store.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedStoreConfig {
    pub min_latency: Duration,
    pub max_latency: Duration,
    /// Share of calls that stall until the caller's timeout expires.
    pub timeout_ratio: f64,
    /// Share of calls that fail outright.
    pub failure_ratio: f64,
}

impl Default for SimulatedStoreConfig {
    fn default() -> Self {
        Self {
            min_latency: Duration::from_millis(1),
            max_latency: Duration::from_millis(5),
            timeout_ratio: 0.0,
            failure_ratio: 0.0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct OperationStats {
    calls: u64,
    timeouts: u64,
    failures: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    operations: Mutex<BTreeMap<String, OperationStats>>,
    next_transaction_id: AtomicU64,
    commits: AtomicU64,
    rollbacks: AtomicU64,
    recompiles: AtomicU64,
    sessions: AtomicU64,
}

enum Fate {
    Complete(Duration),
    Stall,
    Fail,
}

/// Store living inside the process, useful for dry runs of a settings file
/// and for exercising the harness without a real backend.
#[derive(Debug, Clone, Default)]
pub struct SimulatedStore {
    config: SimulatedStoreConfig,
    state: Arc<StoreState>,
}

impl SimulatedStore {
    pub fn new(config: SimulatedStoreConfig) -> Self {
        Self {
            config,
            state: Arc::new(StoreState::default()),
        }
    }

    pub fn calls(&self, operation: &str) -> u64 {
        self.stats(operation).calls
    }

    pub fn commits(&self) -> u64 {
        self.state.commits.load(Ordering::Acquire)
    }

    pub fn rollbacks(&self) -> u64 {
        self.state.rollbacks.load(Ordering::Acquire)
    }

    pub fn recompiles(&self) -> u64 {
        self.state.recompiles.load(Ordering::Acquire)
    }

    pub fn sessions(&self) -> u64 {
        self.state.sessions.load(Ordering::Acquire)
    }

    fn stats(&self, operation: &str) -> OperationStats {
        self.operations()
            .get(operation)
            .copied()
            .unwrap_or_default()
    }

    fn operations(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, OperationStats>> {
        self.state
            .operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn update_stats(&self, operation: &str, update: impl FnOnce(&mut OperationStats)) {
        let mut operations = self.operations();
        update(operations.entry(operation.to_owned()).or_default());
    }

    // The thread-local generator is not `Send`, so it never lives across an await.
    fn draw_fate(&self) -> Fate {
        let mut rng = rand::thread_rng();
        let roll: f64 = rng.gen();
        if roll < self.config.failure_ratio {
            return Fate::Fail;
        }
        if roll < self.config.failure_ratio + self.config.timeout_ratio {
            return Fate::Stall;
        }
        let latency = if self.config.max_latency > self.config.min_latency {
            rng.gen_range(self.config.min_latency..=self.config.max_latency)
        } else {
            self.config.min_latency
        };
        Fate::Complete(latency)
    }

    async fn execute(&self, operation: &str, timeout: Duration) -> Result<(), OperationError> {
        self.update_stats(operation, |stats| stats.calls += 1);
        let outcome = match self.draw_fate() {
            Fate::Fail => Err(OperationError::Other(format!(
                "Simulated failure of operation '{operation}'"
            ))),
            Fate::Stall => {
                sleep(timeout).await;
                Err(OperationError::Timeout)
            }
            Fate::Complete(latency) => tokio::time::timeout(timeout, sleep(latency))
                .await
                .map_err(|_| OperationError::Timeout),
        };
        match &outcome {
            Err(OperationError::Timeout) => self.update_stats(operation, |stats| stats.timeouts += 1),
            Err(OperationError::Other(_)) => {
                self.update_stats(operation, |stats| stats.failures += 1)
            }
            Ok(()) => {}
        }
        outcome
    }
}

#[async_trait]
impl SessionFactory for SimulatedStore {
    async fn create_session(&self) -> Result<Box<dyn Session>, HammerError> {
        self.state.sessions.fetch_add(1, Ordering::AcqRel);
        Ok(Box::new(SimulatedSession {
            store: self.clone(),
        }))
    }

    fn describe(&self) -> String {
        format!(
            "simulated store (latency {:?}..{:?}, timeout ratio {}, failure ratio {})",
            self.config.min_latency,
            self.config.max_latency,
            self.config.timeout_ratio,
            self.config.failure_ratio
        )
    }
}

pub struct SimulatedSession {
    store: SimulatedStore,
}

#[async_trait]
impl Session for SimulatedSession {
    async fn invoke(
        &mut self,
        operation: &str,
        timeout: Duration,
        _transaction: Option<&Transaction>,
    ) -> Result<(), OperationError> {
        self.store.execute(operation, timeout).await
    }

    async fn begin_transaction(&mut self) -> Result<Transaction, OperationError> {
        let id = self
            .store
            .state
            .next_transaction_id
            .fetch_add(1, Ordering::AcqRel);
        Ok(Transaction::new(id + 1))
    }

    async fn commit(&mut self, _transaction: Transaction) -> Result<(), OperationError> {
        self.store.state.commits.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn rollback(&mut self, _transaction: Transaction) -> Result<(), OperationError> {
        self.store.state.rollbacks.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn force_recompile(&mut self, _operation: &str) -> Result<(), OperationError> {
        self.store.state.recompiles.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn fetch_table(
        &mut self,
        _operation: &str,
        _timeout: Duration,
    ) -> Result<Table, OperationError> {
        let mut rows: Vec<Vec<String>> = self
            .store
            .operations()
            .iter()
            .map(|(name, stats)| {
                vec![
                    name.clone(),
                    stats.calls.to_string(),
                    stats.timeouts.to_string(),
                    stats.failures.to_string(),
                ]
            })
            .collect();
        rows.push(vec![
            "<transactions>".to_owned(),
            self.store.commits().to_string(),
            "0".to_owned(),
            self.store.rollbacks().to_string(),
        ]);
        Ok(Table {
            columns: vec![
                "operation".to_owned(),
                "calls".to_owned(),
                "timeouts".to_owned(),
                "failures".to_owned(),
            ],
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_store(timeout_ratio: f64, failure_ratio: f64) -> SimulatedStore {
        SimulatedStore::new(SimulatedStoreConfig {
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
            timeout_ratio,
            failure_ratio,
        })
    }

    #[tokio::test]
    async fn healthy_store_should_complete_every_call() {
        let store = instant_store(0.0, 0.0);
        let mut session = store.create_session().await.unwrap();

        for _ in 0..5 {
            session
                .invoke("insert", Duration::from_secs(1), None)
                .await
                .unwrap();
        }

        assert_eq!(store.calls("insert"), 5);
        assert_eq!(store.sessions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_call_should_time_out_after_the_given_timeout() {
        let store = instant_store(1.0, 0.0);
        let mut session = store.create_session().await.unwrap();
        let started = tokio::time::Instant::now();

        let result = session.invoke("insert", Duration::from_secs(3), None).await;

        assert_eq!(result, Err(OperationError::Timeout));
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn failing_store_should_report_other_error() {
        let store = instant_store(0.0, 1.0);
        let mut session = store.create_session().await.unwrap();

        let result = session.invoke("select", Duration::from_secs(1), None).await;

        assert!(matches!(result, Err(OperationError::Other(_))));
    }

    #[tokio::test]
    async fn transactions_and_recompiles_should_show_in_diagnostics() {
        let store = instant_store(0.0, 0.0);
        let mut session = store.create_session().await.unwrap();

        let first = session.begin_transaction().await.unwrap();
        let second = session.begin_transaction().await.unwrap();
        assert_ne!(first, second);
        session.commit(first).await.unwrap();
        session.rollback(second).await.unwrap();
        session.force_recompile("insert").await.unwrap();
        session
            .invoke("insert", Duration::from_secs(1), None)
            .await
            .unwrap();

        let table = session
            .fetch_table("diagnostics", Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(store.commits(), 1);
        assert_eq!(store.rollbacks(), 1);
        assert_eq!(store.recompiles(), 1);
        assert_eq!(table.rows[0], vec!["insert", "1", "0", "0"]);
        assert_eq!(table.rows[1], vec!["<transactions>", "1", "0", "1"]);
    }
}
