use super::run::RunConfig;

pub const DEFAULT_INSERTS: u64 = 1000;
pub const DEFAULT_INSERT_THREADS: u32 = 1;
pub const DEFAULT_INSERT_BATCH_SIZE: u32 = 10;
pub const DEFAULT_SELECT_THREADS: u32 = 1;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig {
            run_name: None,
            inserts: DEFAULT_INSERTS,
            insert_threads: DEFAULT_INSERT_THREADS,
            insert_batch_size: DEFAULT_INSERT_BATCH_SIZE,
            insert_batch_delay_ms: 0,
            use_transaction_for_insert_batch: false,
            select_threads: DEFAULT_SELECT_THREADS,
            select_delay_ms: 0,
            setup_operation: None,
            insert_operation: String::new(),
            select_operation: String::new(),
            diagnostics_operation: None,
            recompile_select_after: 0,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            output_path: None,
        }
    }
}
