use chrono::{DateTime, Local};
use hammer_report::{
    actor_failure::ActorFailure, actor_stats::ActorStats, params::RunParams, report::RunReport,
    sample_record::SampleRecord, summary::RunSummary,
};

pub struct RunReportBuilder;

impl RunReportBuilder {
    pub fn build(
        params: RunParams,
        started_at: DateTime<Local>,
        finished_at: DateTime<Local>,
        completed: bool,
        summary: RunSummary,
        samples: Vec<SampleRecord>,
        mut actors: Vec<ActorStats>,
        mut failures: Vec<ActorFailure>,
    ) -> RunReport {
        let uuid = uuid::Uuid::new_v4();

        // Sort tallies and failures by actor type and ID
        actors.sort_by_key(|a| (a.actor_kind, a.actor_id));
        failures.sort_by_key(|f| (f.actor_kind, f.actor_id));

        RunReport {
            uuid,
            started_at: started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            completed,
            params,
            summary,
            samples,
            actors,
            failures,
        }
    }
}
