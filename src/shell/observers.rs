// Logging hooks for the binary: repository notifications and card state transitions.

use crate::core::ports::{ListenerId, TimeCardRepositoryListener};
use crate::core::time_card::entity::{TimeCard, TimeCardObserver};
use crate::core::time_card::state::TimeCardState;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct TracingListener {
    id: ListenerId,
    notifications: AtomicUsize,
}

impl TracingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::Relaxed)
    }
}

impl TimeCardRepositoryListener for TracingListener {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn did_save(&self, time_card: &TimeCard) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            time_card_id = %time_card.id(),
            state = %time_card.state(),
            breaks = time_card.breaks().len(),
            "time card saved"
        );
    }

    fn did_remove(&self, time_card: &TimeCard) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
        tracing::info!(time_card_id = %time_card.id(), "time card removed");
    }
}

impl TimeCardObserver for TracingListener {
    fn time_card_did_update_state(&self, time_card: &TimeCard, state: TimeCardState) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
        tracing::info!(time_card_id = %time_card.id(), %state, "time card state changed");
    }
}
