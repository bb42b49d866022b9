// Ports define what the core needs from the outside world, without implementing it.
//
// Purpose
// - Describe abstract capabilities as traits: Clock, TimeCardRepository and its listeners.
//
// Responsibilities
// - Keep the time card core independent of wall-clock time and of any storage by coding
//   against traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the adapters layer.
//
// Testing guidance
// - Use ManualClock and InMemoryTimeCardRepository for tests and local development.

use crate::core::time_card::entity::TimeCard;
use crate::core::time_card::interest::InterestType;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Source of "now" shared by every entity that computes a duration or stamps a transition.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("time card not found")]
    NotFound,

    #[error("a listener must be registered with at least one interest")]
    NoInterests,

    #[error("backend error: {0}")]
    Backend(String),
}

/// Stable identity of a repository listener. Also used as the `sender` of a save or remove,
/// so that a listener never hears back about its own change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub trait TimeCardRepositoryListener: Send + Sync {
    fn id(&self) -> ListenerId;
    fn did_save(&self, time_card: &TimeCard);
    fn did_remove(&self, time_card: &TimeCard);
}

#[async_trait]
pub trait TimeCardRepository: Send + Sync {
    /// The card a "today" view shows for `date`: the latest card started on or before that
    /// calendar day, provided it is still open or was started on that same day.
    async fn get(&self, date: DateTime<Utc>) -> Result<TimeCard, RepositoryError>;

    /// Every stored card, newest start first.
    async fn list(&self) -> Result<Vec<TimeCard>, RepositoryError>;

    /// Finished cards only, newest start first, keeping at most `limit` of them.
    async fn list_finished(&self, limit: Option<usize>) -> Result<Vec<TimeCard>, RepositoryError>;

    async fn save(
        &self,
        time_card: &TimeCard,
        sender: Option<ListenerId>,
    ) -> Result<(), RepositoryError>;

    async fn remove(
        &self,
        time_card: &TimeCard,
        sender: Option<ListenerId>,
    ) -> Result<(), RepositoryError>;

    /// Registers `listener`, or replaces its interests when its id is already registered.
    /// Only a weak handle is kept.
    async fn add_listener(
        &self,
        listener: &Arc<dyn TimeCardRepositoryListener>,
        interests: HashSet<InterestType>,
    ) -> Result<(), RepositoryError>;

    async fn remove_listener(&self, listener_id: ListenerId) -> Result<(), RepositoryError>;
}
