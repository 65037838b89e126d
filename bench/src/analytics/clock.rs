use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct ClockState {
    running_since: Option<Instant>,
    accumulated: Duration,
}

/// Run-wide stopwatch.
///
/// Start, stop and reads go through one lock so a read never observes a
/// clock that is half way through stopping.
#[derive(Debug, Default)]
pub struct RunClock {
    state: Mutex<ClockState>,
}

impl RunClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        let mut state = self.lock();
        if state.running_since.is_none() {
            state.running_since = Some(Instant::now());
        }
    }

    pub fn stop(&self) {
        let mut state = self.lock();
        if let Some(since) = state.running_since.take() {
            state.accumulated += since.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        let state = self.lock();
        match state.running_since {
            Some(since) => state.accumulated + since.elapsed(),
            None => state.accumulated,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
