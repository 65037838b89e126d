use super::ewma::AtomicEwma;
use hammer_report::sample_record::SampleRecord;
use hammer_report::summary::RunSummary;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Counters and latency averages shared by every worker and the sampler.
///
/// Every mutation is a single atomic operation, a snapshot is a set of
/// independent loads and may be momentarily inconsistent across fields.
#[derive(Debug, Default)]
pub struct RunMetrics {
    inserts: AtomicU64,
    selects: AtomicU64,
    timeouts: AtomicU64,
    insert_secs_average: AtomicEwma,
    select_secs_average: AtomicEwma,
    insert_nanos_total: AtomicU64,
    select_nanos_total: AtomicU64,
}

/// Point-in-time copy of [`RunMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub insert_secs_average: f64,
    pub insert_nanos_total: u64,
    pub selects: u64,
    pub select_secs_average: f64,
    pub select_nanos_total: u64,
    pub timeouts: u64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` inserts and returns the new total.
    pub fn increment_inserts(&self, count: u64) -> u64 {
        self.inserts.fetch_add(count, Ordering::AcqRel) + count
    }

    /// Adds `count` inserts only while the total is still below `limit`.
    ///
    /// Returns the new total, or `None` when the limit had already been
    /// reached and nothing was added. A successful add can overshoot `limit`
    /// by at most `count - 1`.
    pub fn increment_inserts_within(&self, count: u64, limit: u64) -> Option<u64> {
        self.inserts
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current < limit).then(|| current + count)
            })
            .ok()
            .map(|previous| previous + count)
    }

    /// Adds one select and returns the new total.
    pub fn increment_selects(&self) -> u64 {
        self.selects.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn increment_timeouts(&self) -> u64 {
        self.timeouts.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn record_insert_batch_latency(&self, secs_per_insert: f64) {
        self.insert_secs_average.record(secs_per_insert);
    }

    pub fn record_select_latency(&self, secs: f64) {
        self.select_secs_average.record(secs);
    }

    pub fn add_insert_time(&self, elapsed: Duration) {
        self.insert_nanos_total
            .fetch_add(as_nanos(elapsed), Ordering::AcqRel);
    }

    pub fn add_select_time(&self, elapsed: Duration) {
        self.select_nanos_total
            .fetch_add(as_nanos(elapsed), Ordering::AcqRel);
    }

    /// Publishes a finished insert batch unless the run already reached `limit`.
    ///
    /// Returns `false` when the batch was not counted.
    pub fn record_insert_batch(&self, elapsed: Duration, batch_size: u32, limit: u64) -> bool {
        if self
            .increment_inserts_within(batch_size as u64, limit)
            .is_none()
        {
            return false;
        }
        self.add_insert_time(elapsed);
        self.record_insert_batch_latency(elapsed.as_secs_f64() / batch_size as f64);
        true
    }

    /// Publishes one finished select and returns the new select total.
    pub fn record_select(&self, elapsed: Duration) -> u64 {
        let selects = self.increment_selects();
        self.add_select_time(elapsed);
        self.record_select_latency(elapsed.as_secs_f64());
        selects
    }

    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Acquire)
    }

    pub fn selects(&self) -> u64 {
        self.selects.load(Ordering::Acquire)
    }

    pub fn timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts(),
            insert_secs_average: self.insert_secs_average.get_or_zero(),
            insert_nanos_total: self.insert_nanos_total.load(Ordering::Acquire),
            selects: self.selects(),
            select_secs_average: self.select_secs_average.get_or_zero(),
            select_nanos_total: self.select_nanos_total.load(Ordering::Acquire),
            timeouts: self.timeouts(),
        }
    }
}

impl MetricsSnapshot {
    pub fn insert_secs_total(&self) -> f64 {
        self.insert_nanos_total as f64 / NANOS_PER_SECOND
    }

    pub fn select_secs_total(&self) -> f64 {
        self.select_nanos_total as f64 / NANOS_PER_SECOND
    }

    pub fn to_sample(&self, elapsed: Duration) -> SampleRecord {
        SampleRecord::new(
            elapsed.as_secs_f64(),
            self.inserts,
            self.insert_secs_average,
            self.insert_secs_total(),
            self.selects,
            self.select_secs_average,
            self.select_secs_total(),
            self.timeouts,
        )
    }

    pub fn to_summary(&self, elapsed: Duration) -> RunSummary {
        RunSummary::new(
            elapsed.as_secs_f64(),
            self.inserts,
            self.insert_secs_average,
            self.selects,
            self.select_secs_average,
            self.timeouts,
        )
    }
}

fn as_nanos(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}
