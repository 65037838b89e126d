use super::run::RunConfig;
use std::fmt::{Display, Formatter};

impl Display for RunConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ run_name: {}, inserts: {}, insert_threads: {}, insert_batch_size: {}, insert_batch_delay_ms: {}, use_transaction_for_insert_batch: {}, select_threads: {}, select_delay_ms: {}, setup_operation: {:?}, insert_operation: {}, select_operation: {}, diagnostics_operation: {:?}, recompile_select_after: {}, query_timeout_secs: {}, output_path: {:?} }}",
            self.run_name(),
            self.inserts,
            self.insert_threads,
            self.insert_batch_size,
            self.insert_batch_delay_ms,
            self.use_transaction_for_insert_batch,
            self.select_threads,
            self.select_delay_ms,
            self.setup_operation,
            self.insert_operation,
            self.select_operation,
            self.diagnostics_operation,
            self.recompile_select_after,
            self.query_timeout_secs,
            self.output_path
        )
    }
}
