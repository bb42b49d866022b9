// TimeCard is the aggregate for one clock-in to clock-out work session.
//
// Purpose
// - Own the break list and the end date, and guard every change through the state machine.
// - Compute the worked duration net of breaks on every read.
//
// Transitions
// - Ongoing  --start_break-->  OnABreak
// - OnABreak --finish_break--> Ongoing
// - Ongoing  --finish-->       Finished
// Every other (state, operation) pair is rejected with a TimeCardError and leaves the card untouched.
//
// Invariants
// - At most one break is open, and only the last one.
// - The state is derived, see state.rs.

use crate::core::ports::Clock;
use crate::core::time_card::errors::TimeCardError;
use crate::core::time_card::id::TimeCardId;
use crate::core::time_card::state::TimeCardState;
use crate::core::time_card::work_break::Break;
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Receives state transitions of a single time card, synchronously, right after they happen.
pub trait TimeCardObserver: Send + Sync {
    fn time_card_did_update_state(&self, time_card: &TimeCard, state: TimeCardState);
}

#[derive(Clone)]
pub struct TimeCard {
    id: TimeCardId,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    breaks: Vec<Break>,
    clock: Arc<dyn Clock>,
    observer: Option<Weak<dyn TimeCardObserver>>,
}

impl TimeCard {
    /// Clocks in at `start`.
    pub fn new(start: DateTime<Utc>, clock: Arc<dyn Clock>) -> Self {
        Self::with_parts(TimeCardId::new(), start, None, Vec::new(), clock)
    }

    /// Rebuilds a card from stored parts. The initial state follows from `end` and `breaks`.
    pub fn with_parts(
        id: TimeCardId,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        breaks: Vec<Break>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            id,
            start_date: start,
            end_date: end,
            breaks,
            clock,
            observer: None,
        }
    }

    pub fn id(&self) -> TimeCardId {
        self.id
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn breaks(&self) -> &[Break] {
        &self.breaks
    }

    pub fn state(&self) -> TimeCardState {
        TimeCardState::derive(self.end_date, self.breaks.last().map(Break::end_date))
    }

    pub fn is_finished(&self) -> bool {
        self.state() == TimeCardState::Finished
    }

    /// Worked time: elapsed since clock-in (up to now while open) minus every break.
    pub fn duration(&self) -> TimeDelta {
        let reference = self.end_date.unwrap_or_else(|| self.clock.now());
        let break_time = self
            .breaks
            .iter()
            .map(Break::duration)
            .fold(TimeDelta::zero(), |total, duration| total + duration);
        reference - self.start_date - break_time
    }

    pub fn set_observer(&mut self, observer: &Arc<dyn TimeCardObserver>) {
        self.observer = Some(Arc::downgrade(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn start_break(&mut self) -> Result<(), TimeCardError> {
        match self.state() {
            TimeCardState::Ongoing => {
                let work_break = Break::new(self.clock.now(), None, self.clock.clone());
                self.breaks.push(work_break);
                self.notify_state();
                Ok(())
            }
            TimeCardState::OnABreak => Err(TimeCardError::AlreadyOnABreak),
            TimeCardState::Finished => Err(TimeCardError::AlreadyFinished),
        }
    }

    /// The single open break, if any.
    pub fn current_break(&self) -> Result<Option<&Break>, TimeCardError> {
        Ok(self
            .current_break_index()?
            .map(|index| &self.breaks[index]))
    }

    pub fn current_break_index(&self) -> Result<Option<usize>, TimeCardError> {
        let mut open = self
            .breaks
            .iter()
            .enumerate()
            .filter(|(_, work_break)| work_break.is_open())
            .map(|(index, _)| index);
        let first = open.next();
        if open.next().is_some() {
            tracing::error!(time_card_id = %self.id, "time card has multiple unfinished breaks");
            return Err(TimeCardError::MultipleUnfinishedBreaks);
        }
        Ok(first)
    }

    pub fn finish_break(&mut self) -> Result<(), TimeCardError> {
        let open = self.current_break_index()?;
        let Some(index) = open.filter(|_| self.state() == TimeCardState::OnABreak) else {
            return Err(TimeCardError::NotOnABreak);
        };
        self.breaks[index].finish()?;
        self.notify_state();
        Ok(())
    }

    pub fn finish(&mut self) -> Result<(), TimeCardError> {
        match self.state() {
            TimeCardState::Ongoing => {
                self.end_date = Some(self.clock.now());
                self.notify_state();
                Ok(())
            }
            TimeCardState::OnABreak => Err(TimeCardError::OnABreak),
            TimeCardState::Finished => Err(TimeCardError::AlreadyFinished),
        }
    }

    /// Field by field comparison, used to tell a real change from a no-op save.
    pub fn is_completely_equal(&self, other: &TimeCard) -> bool {
        self.id == other.id
            && self.start_date == other.start_date
            && self.end_date == other.end_date
            && self.breaks.len() == other.breaks.len()
            && self
                .breaks
                .iter()
                .zip(&other.breaks)
                .all(|(lhs, rhs)| lhs.is_completely_equal(rhs))
            && self.state() == other.state()
    }

    fn notify_state(&self) {
        let state = self.state();
        tracing::debug!(time_card_id = %self.id, %state, "time card state updated");
        if let Some(observer) = self.observer.as_ref().and_then(Weak::upgrade) {
            observer.time_card_did_update_state(self, state);
        }
    }
}

impl PartialEq for TimeCard {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TimeCard {}

impl Hash for TimeCard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TimeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeCard")
            .field("id", &self.id)
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("breaks", &self.breaks)
            .field("state", &self.state())
            .finish()
    }
}
