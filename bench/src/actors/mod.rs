pub mod inserter;
pub mod selector;

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Upper bound of the random delay spreading out worker start times.
pub const MAX_WARMUP_JITTER: Duration = Duration::from_millis(200);

/// Sleeps a random share of `max` so workers do not hit the store in lockstep.
pub async fn warmup_jitter(max: Duration) {
    if max.is_zero() {
        return;
    }
    let jitter = rand::thread_rng().gen_range(Duration::ZERO..max);
    sleep(jitter).await;
}

/// Sleeps `delay` unless it is zero, in which case it only yields.
pub async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        sleep(delay).await;
    }
}
