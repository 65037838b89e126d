use async_trait::async_trait;
use hammer::configs::run::RunConfig;
use hammer::error::{HammerError, OperationError};
use hammer::invoker::{Session, SessionFactory, Table, Transaction};
use hammer::output::time_series_log::TimeSeriesLog;
use hammer::runner::{RunCoordinator, RunOutcome};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::time::sleep;

pub const INSERT_OPERATION: &str = "insert_order";
pub const SELECT_OPERATION: &str = "select_orders";
pub const CALL_LATENCY: Duration = Duration::from_millis(2);

/// How a [`ScriptedStore`] answers calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Script {
    Succeed,
    AlwaysTimeout,
    /// Every call of the named operation fails.
    FailOperation(&'static str),
    /// Every call made through the n-th opened session (1-based) fails.
    FailSession(u64),
}

#[derive(Debug, Default)]
struct Counters {
    sessions: AtomicU64,
    calls: AtomicU64,
    recompiles: AtomicU64,
    transactions: AtomicU64,
    commits: AtomicU64,
    rollbacks: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct ScriptedStore {
    script: Script,
    counters: Arc<Counters>,
}

impl ScriptedStore {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn sessions(&self) -> u64 {
        self.counters.sessions.load(Ordering::Acquire)
    }

    pub fn recompiles(&self) -> u64 {
        self.counters.recompiles.load(Ordering::Acquire)
    }

    pub fn commits(&self) -> u64 {
        self.counters.commits.load(Ordering::Acquire)
    }

    pub fn rollbacks(&self) -> u64 {
        self.counters.rollbacks.load(Ordering::Acquire)
    }
}

#[async_trait]
impl SessionFactory for ScriptedStore {
    async fn create_session(&self) -> Result<Box<dyn Session>, HammerError> {
        let index = self.counters.sessions.fetch_add(1, Ordering::AcqRel) + 1;
        Ok(Box::new(ScriptedSession {
            index,
            store: self.clone(),
        }))
    }

    fn describe(&self) -> String {
        format!("scripted store ({:?})", self.script)
    }
}

struct ScriptedSession {
    index: u64,
    store: ScriptedStore,
}

#[async_trait]
impl Session for ScriptedSession {
    async fn invoke(
        &mut self,
        operation: &str,
        timeout: Duration,
        _transaction: Option<&Transaction>,
    ) -> Result<(), OperationError> {
        self.store.counters.calls.fetch_add(1, Ordering::AcqRel);
        match &self.store.script {
            Script::AlwaysTimeout => {
                sleep(timeout).await;
                return Err(OperationError::Timeout);
            }
            Script::FailOperation(failing) if *failing == operation => {
                return Err(OperationError::Other(format!("{operation} rejected")));
            }
            Script::FailSession(index) if *index == self.index => {
                return Err(OperationError::Other(format!(
                    "session {index} lost its connection"
                )));
            }
            _ => {}
        }
        sleep(CALL_LATENCY).await;
        Ok(())
    }

    async fn begin_transaction(&mut self) -> Result<Transaction, OperationError> {
        let id = self.store.counters.transactions.fetch_add(1, Ordering::AcqRel) + 1;
        Ok(Transaction::new(id))
    }

    async fn commit(&mut self, _transaction: Transaction) -> Result<(), OperationError> {
        self.store.counters.commits.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn rollback(&mut self, _transaction: Transaction) -> Result<(), OperationError> {
        self.store.counters.rollbacks.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn force_recompile(&mut self, _operation: &str) -> Result<(), OperationError> {
        self.store.counters.recompiles.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn fetch_table(
        &mut self,
        operation: &str,
        _timeout: Duration,
    ) -> Result<Table, OperationError> {
        Ok(Table {
            columns: vec!["operation".to_owned(), "calls".to_owned()],
            rows: vec![vec![
                operation.to_owned(),
                self.store.counters.calls.load(Ordering::Acquire).to_string(),
            ]],
        })
    }
}

pub fn run_config(inserts: u64, insert_threads: u32, batch: u32, select_threads: u32) -> RunConfig {
    RunConfig {
        run_name: Some("integration".to_owned()),
        inserts,
        insert_threads,
        insert_batch_size: batch,
        select_threads,
        insert_operation: INSERT_OPERATION.to_owned(),
        select_operation: SELECT_OPERATION.to_owned(),
        query_timeout_secs: 1,
        ..RunConfig::default()
    }
}

pub fn coordinator(config: RunConfig, factory: Arc<dyn SessionFactory>) -> RunCoordinator {
    RunCoordinator::new(config, factory)
        .with_warmup_jitter(Duration::ZERO)
        .with_sampling(Duration::from_millis(100), Duration::from_secs(10))
}

pub async fn run_in_memory(coordinator: &RunCoordinator) -> RunOutcome<Vec<u8>> {
    coordinator
        .run(TimeSeriesLog::new(Vec::new()))
        .await
        .expect("run should produce a report")
}

/// Log sink that panics on the first sample row it receives, then keeps
/// accepting writes.
#[derive(Debug, Default)]
pub struct FailingRowWriter {
    pub written: Vec<u8>,
    tripped: bool,
}

impl AsyncWrite for FailingRowWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if !self.tripped && buf.first().is_some_and(u8::is_ascii_digit) {
            self.tripped = true;
            panic!("disk detached while writing a sample row");
        }
        self.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
