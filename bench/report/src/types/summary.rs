use crate::sample_record::SampleRecord;
use crate::utils::round_float;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Aggregated totals of a run, printed periodically and once after shutdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, derive_new::new)]
pub struct RunSummary {
    #[serde(serialize_with = "round_float")]
    pub elapsed_secs: f64,
    pub inserts: u64,
    #[serde(serialize_with = "round_float")]
    pub insert_secs_average: f64,
    pub selects: u64,
    #[serde(serialize_with = "round_float")]
    pub select_secs_average: f64,
    pub timeouts: u64,
}

impl RunSummary {
    pub fn inserts_per_second(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.inserts as f64 / self.elapsed_secs
    }

    pub fn selects_per_second(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.selects as f64 / self.elapsed_secs
    }
}

impl From<&SampleRecord> for RunSummary {
    fn from(record: &SampleRecord) -> Self {
        Self {
            elapsed_secs: record.elapsed_secs,
            inserts: record.inserts,
            insert_secs_average: record.insert_secs_average,
            selects: record.selects,
            select_secs_average: record.select_secs_average,
            timeouts: record.timeouts,
        }
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Elapsed sec: {:.2}", self.elapsed_secs)?;
        writeln!(f, "  Inserts: {}", self.inserts)?;
        writeln!(f, "  Sec/insert: {:.8}", self.insert_secs_average)?;
        writeln!(f, "  Selects: {}", self.selects)?;
        writeln!(f, "  Sec/select: {:.4}", self.select_secs_average)?;
        writeln!(f, "  Timeouts: {}", self.timeouts)?;
        writeln!(f)
    }
}
