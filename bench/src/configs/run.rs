use hammer_report::params::RunParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings of a single run, immutable once the workers are started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Name used to identify the run, taken from the settings file name when missing.
    pub run_name: Option<String>,
    /// Number of inserts to perform before stopping.
    pub inserts: u64,
    pub insert_threads: u32,
    /// Number of inserts executed between two metric updates.
    pub insert_batch_size: u32,
    pub insert_batch_delay_ms: u64,
    /// Wrap every insert batch in its own transaction.
    pub use_transaction_for_insert_batch: bool,
    pub select_threads: u32,
    pub select_delay_ms: u64,
    /// Operation called once before the workers start.
    pub setup_operation: Option<String>,
    pub insert_operation: String,
    pub select_operation: String,
    /// Operation whose table is appended to the log after the run.
    pub diagnostics_operation: Option<String>,
    /// Force a plan recompilation of the insert operation every N selects, 0 disables it.
    pub recompile_select_after: u64,
    pub query_timeout_secs: u64,
    /// Log file path, generated from the start time and run name when missing.
    pub output_path: Option<String>,
}

impl RunConfig {
    pub fn insert_batch_delay(&self) -> Duration {
        Duration::from_millis(self.insert_batch_delay_ms)
    }

    pub fn select_delay(&self) -> Duration {
        Duration::from_millis(self.select_delay_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn run_name(&self) -> &str {
        self.run_name.as_deref().unwrap_or("run")
    }

    /// Fills the run name from the settings file stem and the output path
    /// from `started_at` and the run name, keeping values already set.
    pub fn resolve_names(&mut self, settings_path: &Path, started_at: &str) {
        if self.run_name.as_deref().map_or(true, str::is_empty) {
            self.run_name = settings_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        if self.output_path.as_deref().map_or(true, str::is_empty) {
            self.output_path = Some(format!("{started_at}_{}.log", self.run_name()));
        }
    }

    pub fn to_params(&self, target: String) -> RunParams {
        RunParams {
            run_name: self.run_name().to_owned(),
            target,
            inserts: self.inserts,
            insert_threads: self.insert_threads,
            insert_batch_size: self.insert_batch_size,
            insert_batch_delay_ms: self.insert_batch_delay_ms,
            use_transaction_for_insert_batch: self.use_transaction_for_insert_batch,
            select_threads: self.select_threads,
            select_delay_ms: self.select_delay_ms,
            recompile_select_after: self.recompile_select_after,
            query_timeout_secs: self.query_timeout_secs,
            insert_operation: self.insert_operation.clone(),
            select_operation: self.select_operation.clone(),
        }
    }
}
