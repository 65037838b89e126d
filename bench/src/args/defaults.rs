pub const DEFAULT_SIMULATED_MIN_LATENCY_MS: u64 = 1;
pub const DEFAULT_SIMULATED_MAX_LATENCY_MS: u64 = 5;
pub const DEFAULT_SIMULATED_TIMEOUT_RATIO: f64 = 0.0;
pub const DEFAULT_SIMULATED_FAILURE_RATIO: f64 = 0.0;

pub const DEFAULT_HTTP_SERVER_URL: &str = "http://127.0.0.1:8080";
