// Shared fixtures for the integration tests. Each test binary includes this with `mod fixtures;`.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::{Arc, Mutex};
use time_cards::adapters::clock::manual_clock::ManualClock;
use time_cards::core::ports::{ListenerId, TimeCardRepositoryListener};
use time_cards::core::time_card::entity::TimeCard;

/// Parses "dd/mm/yy HH:MM" as a UTC instant, e.g. "02/01/97 15:00".
pub fn date(value: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(value, "%d/%m/%y %H:%M")
        .unwrap_or_else(|error| panic!("failed to convert {value:?} to a date: {error}"))
        .and_utc()
}

pub fn clock_at(value: &str) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(date(value)))
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
