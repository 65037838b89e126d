use crate::actor_kind::ActorKind;
use serde::{Deserialize, Serialize};

/// Run parameters recorded alongside the results.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RunParams {
    pub run_name: String,
    pub target: String,
    pub inserts: u64,
    pub insert_threads: u32,
    pub insert_batch_size: u32,
    pub insert_batch_delay_ms: u64,
    pub use_transaction_for_insert_batch: bool,
    pub select_threads: u32,
    pub select_delay_ms: u64,
    pub recompile_select_after: u64,
    pub query_timeout_secs: u64,
    pub insert_operation: String,
    pub select_operation: String,
}

impl RunParams {
    pub fn format_actors_info(&self) -> String {
        match (self.insert_threads, self.select_threads) {
            (inserters, 0) => format!("{inserters} {}", ActorKind::Inserter.plural()),
            (inserters, selectors) => format!(
                "{inserters} {}/{selectors} {}",
                ActorKind::Inserter.plural(),
                ActorKind::Selector.plural()
            ),
        }
    }
}
