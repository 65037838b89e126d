use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, Display)]
pub enum ActorKind {
    #[display("Inserter")]
    #[serde(rename = "inserter")]
    Inserter,
    #[display("Selector")]
    #[serde(rename = "selector")]
    Selector,
}

impl ActorKind {
    pub fn plural(&self) -> &str {
        match self {
            ActorKind::Inserter => "Inserters",
            ActorKind::Selector => "Selectors",
        }
    }
}
