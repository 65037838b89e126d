use colored::{ColoredString, Colorize};
use human_repr::HumanCount;
use tracing::{error, info};

use crate::{
    actor_failure::ActorFailure, actor_kind::ActorKind, actor_stats::ActorStats,
    report::RunReport, summary::RunSummary,
};

impl RunReport {
    pub fn print_summary(&self) {
        let params = &self.params;
        let params_print = format!(
            "Run: {}, target: {}, {} inserts, {}, batches of {} inserts every {} ms (transactional: {}), select every {} ms, timeout: {} s\n",
            params.run_name,
            params.target,
            params.inserts.human_count_bare(),
            params.format_actors_info(),
            params.insert_batch_size,
            params.insert_batch_delay_ms,
            params.use_transaction_for_insert_batch,
            params.select_delay_ms,
            params.query_timeout_secs,
        )
        .blue();

        info!("{}", params_print);

        if !self.failures.is_empty() {
            error!(
                "{}",
                format!("{} worker(s) failed:", self.failures.len()).red()
            );
            self.failures.iter().for_each(|f| error!("{}", f.formatted_string()));
        }

        info!("Final results:{}", self.summary);
        info!("{}\n", self.summary.formatted_string());
    }
}

impl RunSummary {
    pub fn formatted_string(&self) -> ColoredString {
        let inserts_per_sec = format!("{:.2}", self.inserts_per_second());
        let selects_per_sec = format!("{:.2}", self.selects_per_second());
        let insert_ms = format!("{:.3}", self.insert_secs_average * 1000.0);
        let select_ms = format!("{:.3}", self.select_secs_average * 1000.0);

        format!(
            "Throughput: {} inserts/s, {} selects/s, moving average latency: {} ms/insert, {} ms/select, timeouts: {}",
            inserts_per_sec, selects_per_sec, insert_ms, select_ms, self.timeouts,
        )
        .green()
    }

    pub fn print_progress(&self) {
        info!("Progress after {:.0} s:{}", self.elapsed_secs, self);
    }
}

impl ActorFailure {
    pub fn formatted_string(&self) -> ColoredString {
        self.to_string().red()
    }
}

impl ActorStats {
    pub fn print_finished(&self) {
        match self.actor_kind {
            ActorKind::Inserter => info!(
                "Inserter #{} → stopped after {} inserts in {} batches, {} timeouts",
                self.actor_id, self.units, self.batches, self.timeouts
            ),
            ActorKind::Selector => info!(
                "Selector #{} → stopped after {} selects, {} timeouts",
                self.actor_id, self.units, self.timeouts
            ),
        }
    }
}
