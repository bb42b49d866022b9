use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeCardId(pub Uuid);

impl TimeCardId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TimeCardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimeCardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakId(pub Uuid);

impl BreakId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BreakId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BreakId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
