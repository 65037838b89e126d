use std::sync::atomic::{AtomicU64, Ordering};

/// Weight kept from the previous average on every update.
pub const HISTORY_WEIGHT: f64 = 0.75;

/// Bit pattern marking an average that has not seen any sample yet.
/// It is a NaN payload that arithmetic on finite samples never produces.
const UNSET: u64 = u64::MAX;

/// Exponentially weighted moving average that many tasks can feed at once.
///
/// The value is stored as the bit pattern of an `f64` so every update can be
/// published with a single compare-and-swap. A sample read from a stale value
/// is recomputed instead of overwriting a concurrent contribution.
#[derive(Debug)]
pub struct AtomicEwma {
    bits: AtomicU64,
}

impl Default for AtomicEwma {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicEwma {
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(UNSET),
        }
    }

    pub fn record(&self, sample: f64) {
        if !sample.is_finite() {
            return;
        }

        let mut current = self.bits.load(Ordering::Acquire);
        loop {
            let next = if current == UNSET {
                sample
            } else {
                blend(f64::from_bits(current), sample)
            };
            match self.bits.compare_exchange_weak(
                current,
                next.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Current average, `None` until the first sample arrives.
    pub fn get(&self) -> Option<f64> {
        match self.bits.load(Ordering::Acquire) {
            UNSET => None,
            bits => Some(f64::from_bits(bits)),
        }
    }

    pub fn get_or_zero(&self) -> f64 {
        self.get().unwrap_or(0.0)
    }
}

fn blend(average: f64, sample: f64) -> f64 {
    average * HISTORY_WEIGHT + sample * (1.0 - HISTORY_WEIGHT)
}
