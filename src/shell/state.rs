use crate::adapters::clock::system_clock::SystemClock;
use crate::adapters::in_memory::in_memory_time_card_repository::InMemoryTimeCardRepository;
use crate::application::current_time_card::CurrentTimeCardSession;
use crate::core::ports::{Clock, TimeCardRepository};
use crate::shell::config::Settings;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub clock: Arc<dyn Clock>,
    pub repository: Arc<dyn TimeCardRepository>,
    pub session: Arc<CurrentTimeCardSession>,
}

impl AppState {
    pub fn build(settings: &Settings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(settings: &Settings, clock: Arc<dyn Clock>) -> Self {
        let repository: Arc<dyn TimeCardRepository> = Arc::new(
            InMemoryTimeCardRepository::new(clock.clone()).with_calendar_offset(settings.utc_offset),
        );
        let session = CurrentTimeCardSession::new(repository.clone(), clock.clone());
        Self {
            clock,
            repository,
            session,
        }
    }
}
