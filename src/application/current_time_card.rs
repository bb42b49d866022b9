// Headless coordinator for "today's" time card.
//
// Purpose
// - Hold the card a today view shows, drive clock-in, breaks and clock-out on it,
//   and keep it in sync with the repository.
//
// Responsibilities
// - Save every real change with the session as sender. Unchanged values are not saved.
// - Listen to the repository: replace the held card when another sender saves a newer value
//   of it, adopt a card started after the remembered date, and drop the held card when removed.
//
// Concurrency
// - Listener callbacks are synchronous, so the held state sits behind a std Mutex that is never
//   held across an await.

use crate::application::errors::ApplicationError;
use crate::application::ticker::CurrentTimeCardSource;
use crate::core::ports::{
    Clock, ListenerId, RepositoryError, TimeCardRepository, TimeCardRepositoryListener,
};
use crate::core::time_card::entity::{TimeCard, TimeCardObserver};
use crate::core::time_card::errors::TimeCardError;
use crate::core::time_card::interest::InterestType;
use crate::core::time_card::state::TimeCardState;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Default)]
struct SessionState {
    time_card: Option<TimeCard>,
    listening_from: Option<DateTime<Utc>>,
    observer: Option<Weak<dyn TimeCardObserver>>,
}

pub struct CurrentTimeCardSession {
    id: ListenerId,
    repository: Arc<dyn TimeCardRepository>,
    clock: Arc<dyn Clock>,
    state: Mutex<SessionState>,
    me: Weak<CurrentTimeCardSession>,
}

impl CurrentTimeCardSession {
    pub fn new(repository: Arc<dyn TimeCardRepository>, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            id: ListenerId::new(),
            repository,
            clock,
            state: Mutex::new(SessionState::default()),
            me: me.clone(),
        })
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn time_card(&self) -> Option<TimeCard> {
        self.lock().time_card.clone()
    }

    /// Reports state changes of the held card, whichever sender made them. Held weakly.
    pub fn set_observer(&self, observer: &Arc<dyn TimeCardObserver>) {
        self.lock().observer = Some(Arc::downgrade(observer));
    }

    /// Loads today's card. `Ok(None)` means nothing to show yet; the session then waits for a
    /// card started from now on.
    pub async fn fetch(&self) -> Result<Option<TimeCard>, ApplicationError> {
        let now = self.clock.now();
        match self.repository.get(now).await {
            Ok(time_card) => {
                {
                    let mut state = self.lock();
                    state.time_card = Some(time_card.clone());
                    state.listening_from = Some(time_card.start_date());
                }
                self.listen(&time_card).await?;
                tracing::info!(time_card_id = %time_card.id(), state = %time_card.state(), "current time card loaded");
                Ok(Some(time_card))
            }
            Err(RepositoryError::NotFound) => {
                self.lock().listening_from = Some(now);
                self.listen_from(now).await?;
                tracing::info!(%now, "no current time card");
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    pub async fn clock_in(&self) -> Result<TimeCard, ApplicationError> {
        if self.lock().time_card.is_some() {
            return Err(ApplicationError::AlreadyClockedIn);
        }

        let time_card = TimeCard::new(self.clock.now(), self.clock.clone());
        self.repository.save(&time_card, Some(self.id)).await?;
        {
            let mut state = self.lock();
            state.time_card = Some(time_card.clone());
            state.listening_from = Some(time_card.start_date());
        }

        self.notify_state(None, &time_card);
        self.listen(&time_card).await?;
        tracing::info!(time_card_id = %time_card.id(), start = %time_card.start_date(), "clocked in");
        Ok(time_card)
    }

    pub async fn start_break(&self) -> Result<TimeCard, ApplicationError> {
        self.update("start_break", TimeCard::start_break).await
    }

    pub async fn resume(&self) -> Result<TimeCard, ApplicationError> {
        self.update("resume", TimeCard::finish_break).await
    }

    pub async fn clock_out(&self) -> Result<TimeCard, ApplicationError> {
        self.update("clock_out", TimeCard::finish).await
    }

    /// Applies `mutate` to a copy of the held card. The held card only changes once the
    /// repository accepted the new value.
    async fn update(
        &self,
        action: &'static str,
        mutate: impl FnOnce(&mut TimeCard) -> Result<(), TimeCardError>,
    ) -> Result<TimeCard, ApplicationError> {
        let Some(held) = self.time_card() else {
            return Err(ApplicationError::NotClockedIn);
        };
        let mut time_card = held.clone();
        if let Err(error) = mutate(&mut time_card) {
            tracing::warn!(time_card_id = %time_card.id(), action, %error, "time card change rejected");
            return Err(error.into());
        }
        if held.is_completely_equal(&time_card) {
            return Ok(time_card);
        }

        self.repository.save(&time_card, Some(self.id)).await?;
        {
            let mut state = self.lock();
            // A removal may have landed while saving.
            if state.time_card.as_ref() == Some(&time_card) {
                state.time_card = Some(time_card.clone());
            }
        }
        self.notify_state(Some(held.state()), &time_card);
        tracing::info!(time_card_id = %time_card.id(), action, state = %time_card.state(), "time card updated");
        Ok(time_card)
    }

    async fn listen(&self, time_card: &TimeCard) -> Result<(), ApplicationError> {
        self.register(HashSet::from([
            InterestType::TimeCard(time_card.id()),
            InterestType::FromDate(time_card.start_date()),
        ]))
        .await
    }

    async fn listen_from(&self, date: DateTime<Utc>) -> Result<(), ApplicationError> {
        self.register(HashSet::from([InterestType::FromDate(date)])).await
    }

    async fn register(&self, interests: HashSet<InterestType>) -> Result<(), ApplicationError> {
        let Some(me) = self.me.upgrade() else {
            return Ok(());
        };
        let listener: Arc<dyn TimeCardRepositoryListener> = me;
        self.repository.add_listener(&listener, interests).await?;
        Ok(())
    }

    fn notify_state(&self, previous: Option<TimeCardState>, time_card: &TimeCard) {
        let state = time_card.state();
        if previous == Some(state) {
            return;
        }
        let observer = self.lock().observer.as_ref().and_then(Weak::upgrade);
        if let Some(observer) = observer {
            observer.time_card_did_update_state(time_card, state);
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimeCardRepositoryListener for CurrentTimeCardSession {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn did_save(&self, saved: &TimeCard) {
        let previous = {
            let mut state = self.lock();
            let held = state.time_card.as_ref().filter(|current| *current == saved);
            if let Some(current) = held {
                if current.is_completely_equal(saved) {
                    return;
                }
            } else if !state
                .listening_from
                .is_some_and(|from| saved.start_date() > from)
            {
                return;
            }
            let previous = held.map(TimeCard::state);

            tracing::debug!(time_card_id = %saved.id(), "current time card replaced by a saved value");
            let mut adopted = saved.clone();
            adopted.clear_observer();
            state.listening_from = Some(adopted.start_date());
            state.time_card = Some(adopted);
            previous
        };
        self.notify_state(previous, saved);
    }

    fn did_remove(&self, removed: &TimeCard) {
        let mut state = self.lock();
        if state.time_card.as_ref() == Some(removed) {
            tracing::debug!(time_card_id = %removed.id(), "current time card removed");
            state.time_card = None;
        }
    }
}

impl CurrentTimeCardSource for CurrentTimeCardSession {
    fn current_time_card(&self) -> Option<TimeCard> {
        self.time_card()
    }
}
