use crate::actor_kind::ActorKind;
use serde::{Deserialize, Serialize};

/// Tally of a worker that stopped on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorStats {
    pub actor_kind: ActorKind,
    pub actor_id: u32,
    /// Remote calls issued, timed out ones included.
    pub units: u64,
    pub timeouts: u64,
    /// Batches published to the run metrics, always 0 for selectors.
    pub batches: u64,
}

impl ActorStats {
    pub fn new(actor_kind: ActorKind, actor_id: u32) -> Self {
        Self {
            actor_kind,
            actor_id,
            units: 0,
            timeouts: 0,
            batches: 0,
        }
    }
}
