use crate::actor_failure::ActorFailure;
use crate::actor_stats::ActorStats;
use crate::params::RunParams;
use crate::sample_record::SampleRecord;
use crate::summary::RunSummary;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RunReport {
    /// Run unique identifier
    pub uuid: Uuid,

    /// Timestamp when the workers were launched
    pub started_at: String,

    /// Timestamp when the last worker was joined
    pub finished_at: String,

    /// Whether the insert target was reached
    pub completed: bool,

    pub params: RunParams,

    /// Final totals taken after every worker and the sampler stopped
    pub summary: RunSummary,

    /// Time-series rows in the order the sampler produced them
    pub samples: Vec<SampleRecord>,

    /// Tallies of the workers that stopped without an error
    pub actors: Vec<ActorStats>,

    /// Workers terminated by non-timeout errors
    pub failures: Vec<ActorFailure>,
}

impl RunReport {
    pub fn dump_to_json(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let report_json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, report_json)
    }
}
