use crate::utils::round_float;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Column header of the time-series log, matching the field order of [`SampleRecord`].
pub const SAMPLE_HEADER: &str =
    "time\tinserts\tsecPerIns\tinsSecTotal\tselects\tsecPerSel\tselSecTot\ttimeouts";

/// One row of the time-series log, taken by the sampler on every tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, derive_new::new)]
pub struct SampleRecord {
    #[serde(serialize_with = "round_float")]
    pub elapsed_secs: f64,
    pub inserts: u64,
    #[serde(serialize_with = "round_float")]
    pub insert_secs_average: f64,
    #[serde(serialize_with = "round_float")]
    pub insert_secs_total: f64,
    pub selects: u64,
    #[serde(serialize_with = "round_float")]
    pub select_secs_average: f64,
    #[serde(serialize_with = "round_float")]
    pub select_secs_total: f64,
    pub timeouts: u64,
}

impl Display for SampleRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.2}\t{}\t{:.8}\t{:.6}\t{}\t{:.6}\t{:.6}\t{}",
            self.elapsed_secs,
            self.inserts,
            self.insert_secs_average,
            self.insert_secs_total,
            self.selects,
            self.select_secs_average,
            self.select_secs_total,
            self.timeouts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_should_have_one_field_per_header_column() {
        let record = SampleRecord::new(12.5, 120, 0.0012, 1.5, 7, 0.25, 1.75, 3);
        let row = record.to_string();

        assert_eq!(
            row.split('\t').count(),
            SAMPLE_HEADER.split('\t').count()
        );
        assert_eq!(
            row,
            "12.50\t120\t0.00120000\t1.500000\t7\t0.250000\t1.750000\t3"
        );
    }
}
