use crate::actor_kind::ActorKind;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A worker that stopped because of a non-timeout error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, derive_new::new)]
pub struct ActorFailure {
    pub actor_kind: ActorKind,
    pub actor_id: u32,
    /// Stable name of the error variant, e.g. `OperationFailed`.
    pub kind: String,
    pub message: String,
}

impl Display for ActorFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} #{} → ({}) {}",
            self.actor_kind, self.actor_id, self.kind, self.message
        )
    }
}
