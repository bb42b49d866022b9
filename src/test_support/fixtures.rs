// Shared test fixtures.
// Included in the crate only during tests, exposed under `crate::test_support::fixtures`.

use crate::core::ports::{ListenerId, TimeCardRepositoryListener};
use crate::core::time_card::entity::{TimeCard, TimeCardObserver};
use crate::core::time_card::state::TimeCardState;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Mutex;

/// Parses "dd/mm/yy HH:MM" as a UTC instant, e.g. "02/01/97 15:00".
pub fn date(value: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(value, "%d/%m/%y %H:%M")
        .unwrap_or_else(|error| panic!("failed to convert {value:?} to a date: {error}"))
        .and_utc()
}

#[derive(Default)]
pub struct RecordingListener {
    id: ListenerId,
    saved: Mutex<Vec<TimeCard>>,
    removed: Mutex<Vec<TimeCard>>,
}

impl RecordingListener {
    pub fn saved(&self) -> Vec<TimeCard> {
        self.saved.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<TimeCard> {
        self.removed.lock().unwrap().clone()
    }
}

impl TimeCardRepositoryListener for RecordingListener {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn did_save(&self, time_card: &TimeCard) {
        self.saved.lock().unwrap().push(time_card.clone());
    }

    fn did_remove(&self, time_card: &TimeCard) {
        self.removed.lock().unwrap().push(time_card.clone());
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    states: Mutex<Vec<TimeCardState>>,
}

impl RecordingObserver {
    pub fn states(&self) -> Vec<TimeCardState> {
        self.states.lock().unwrap().clone()
    }
}

impl TimeCardObserver for RecordingObserver {
    fn time_card_did_update_state(&self, _time_card: &TimeCard, state: TimeCardState) {
        self.states.lock().unwrap().push(state);
    }
}
