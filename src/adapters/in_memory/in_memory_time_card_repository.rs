// In memory implementation of the TimeCardRepository port.
//
// Purpose
// - Back the application and its tests without a database.
//
// Responsibilities
// - Store one record per time card id. Saving replaces the whole value.
// - Rehydrate cards with the repository clock on every read.
// - Fan out save and remove notifications to the listeners that want them, skipping the sender.
//
// Concurrency
// - Records and listeners live behind tokio RwLocks. Locks are released before any listener
//   is called, so a listener may call back into the repository.
// - Listeners are held weakly. Dropped listeners are pruned on the next fan-out.

use crate::core::ports::{
    Clock, ListenerId, RepositoryError, TimeCardRepository, TimeCardRepositoryListener,
};
use crate::core::time_card::entity::TimeCard;
use crate::core::time_card::id::TimeCardId;
use crate::core::time_card::interest::{InterestType, is_wanted_by};
use crate::core::time_card::record::TimeCardRecord;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::RwLock;

struct ListenerEntry {
    id: ListenerId,
    listener: Weak<dyn TimeCardRepositoryListener>,
    interests: HashSet<InterestType>,
}

#[derive(Debug, Clone, Copy)]
enum Change {
    Saved,
    Removed,
}

pub struct InMemoryTimeCardRepository {
    records: RwLock<HashMap<TimeCardId, TimeCardRecord>>,
    listeners: RwLock<Vec<ListenerEntry>>,
    clock: Arc<dyn Clock>,
    calendar_offset: FixedOffset,
    is_offline: AtomicBool,
}

impl InMemoryTimeCardRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
            clock,
            calendar_offset: Utc.fix(),
            is_offline: AtomicBool::new(false),
        }
    }

    /// Offset used to decide which calendar day an instant falls on.
    pub fn with_calendar_offset(mut self, offset: FixedOffset) -> Self {
        self.calendar_offset = offset;
        self
    }

    pub fn with_time_cards<'a>(mut self, time_cards: impl IntoIterator<Item = &'a TimeCard>) -> Self {
        let records = self.records.get_mut();
        for time_card in time_cards {
            records.insert(time_card.id(), TimeCardRecord::from(time_card));
        }
        self
    }

    /// Takes `&self` so a repository shared behind an `Arc` can be switched.
    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::Relaxed);
    }

    fn ensure_online(&self) -> Result<(), RepositoryError> {
        if self.is_offline.load(Ordering::Relaxed) {
            return Err(RepositoryError::Backend(
                "Time card repository offline".to_string(),
            ));
        }
        Ok(())
    }

    fn calendar_day(&self, date: DateTime<Utc>) -> NaiveDate {
        date.with_timezone(&self.calendar_offset).date_naive()
    }

    async fn sorted_newest_first(&self, finished_only: bool) -> Vec<TimeCard> {
        let guard = self.records.read().await;
        let mut time_cards: Vec<TimeCard> = guard
            .values()
            .cloned()
            .map(|record| record.into_time_card(self.clock.clone()))
            .filter(|time_card| !finished_only || time_card.is_finished())
            .collect();
        time_cards.sort_by(|lhs, rhs| {
            rhs.start_date()
                .cmp(&lhs.start_date())
                .then_with(|| rhs.id().cmp(&lhs.id()))
        });
        time_cards
    }

    async fn notify(&self, time_card: &TimeCard, sender: Option<ListenerId>, change: Change) {
        let targets: Vec<Arc<dyn TimeCardRepositoryListener>> = {
            let mut guard = self.listeners.write().await;
            guard.retain(|entry| {
                let alive = entry.listener.strong_count() > 0;
                if !alive {
                    tracing::debug!(listener_id = %entry.id, "pruning dropped listener");
                }
                alive
            });
            guard
                .iter()
                .filter(|entry| Some(entry.id) != sender)
                .filter(|entry| is_wanted_by(time_card, &entry.interests))
                .filter_map(|entry| entry.listener.upgrade())
                .collect()
        };

        tracing::debug!(
            time_card_id = %time_card.id(),
            ?change,
            listeners = targets.len(),
            "notifying time card listeners"
        );
        for listener in targets {
            match change {
                Change::Saved => listener.did_save(time_card),
                Change::Removed => listener.did_remove(time_card),
            }
        }
    }
}

#[async_trait::async_trait]
impl TimeCardRepository for InMemoryTimeCardRepository {
    async fn get(&self, date: DateTime<Utc>) -> Result<TimeCard, RepositoryError> {
        self.ensure_online()?;
        let day = self.calendar_day(date);
        let latest = {
            let guard = self.records.read().await;
            guard
                .values()
                .filter(|record| self.calendar_day(record.start_date) <= day)
                .max_by_key(|record| (record.start_date, record.id))
                .cloned()
        };

        let Some(record) = latest else {
            return Err(RepositoryError::NotFound);
        };
        let time_card = record.into_time_card(self.clock.clone());
        if !time_card.is_finished() || self.calendar_day(time_card.start_date()) == day {
            Ok(time_card)
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    async fn list(&self) -> Result<Vec<TimeCard>, RepositoryError> {
        self.ensure_online()?;
        Ok(self.sorted_newest_first(false).await)
    }

    async fn list_finished(&self, limit: Option<usize>) -> Result<Vec<TimeCard>, RepositoryError> {
        self.ensure_online()?;
        let mut time_cards = self.sorted_newest_first(true).await;
        if let Some(limit) = limit {
            time_cards.truncate(limit);
        }
        Ok(time_cards)
    }

    async fn save(
        &self,
        time_card: &TimeCard,
        sender: Option<ListenerId>,
    ) -> Result<(), RepositoryError> {
        self.ensure_online()?;
        self.records
            .write()
            .await
            .insert(time_card.id(), TimeCardRecord::from(time_card));
        tracing::debug!(time_card_id = %time_card.id(), state = %time_card.state(), "time card saved");

        self.notify(time_card, sender, Change::Saved).await;
        Ok(())
    }

    async fn remove(
        &self,
        time_card: &TimeCard,
        sender: Option<ListenerId>,
    ) -> Result<(), RepositoryError> {
        self.ensure_online()?;
        if self.records.write().await.remove(&time_card.id()).is_none() {
            return Err(RepositoryError::NotFound);
        }
        tracing::debug!(time_card_id = %time_card.id(), "time card removed");

        self.notify(time_card, sender, Change::Removed).await;
        Ok(())
    }

    async fn add_listener(
        &self,
        listener: &Arc<dyn TimeCardRepositoryListener>,
        interests: HashSet<InterestType>,
    ) -> Result<(), RepositoryError> {
        let id = listener.id();
        if interests.is_empty() {
            tracing::warn!(listener_id = %id, "refusing to register a listener without interests");
            return Err(RepositoryError::NoInterests);
        }

        let mut guard = self.listeners.write().await;
        match guard.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.listener = Arc::downgrade(listener);
                entry.interests = interests;
            }
            None => guard.push(ListenerEntry {
                id,
                listener: Arc::downgrade(listener),
                interests,
            }),
        }
        Ok(())
    }

    async fn remove_listener(&self, listener_id: ListenerId) -> Result<(), RepositoryError> {
        self.listeners
            .write()
            .await
            .retain(|entry| entry.id != listener_id);
        Ok(())
    }
}
