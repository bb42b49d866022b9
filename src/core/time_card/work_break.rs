// A single pause interval nested in a time card.
//
// Lifecycle
// - Created open when its time card moves into the on-break state.
// - Closed exactly once by `finish`, which stamps the clock's current instant.
//
// Equality
// - `==` compares identifiers. `is_completely_equal` also compares the dates.

use crate::core::ports::Clock;
use crate::core::time_card::errors::BreakError;
use crate::core::time_card::id::BreakId;
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone)]
pub struct Break {
    id: BreakId,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl Break {
    /// `end`, when given, is trusted to be after `start`.
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>, clock: Arc<dyn Clock>) -> Self {
        Self::with_id(BreakId::new(), start, end, clock)
    }

    pub fn with_id(
        id: BreakId,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            id,
            start_date: start,
            end_date: end,
            clock,
        }
    }

    pub fn id(&self) -> BreakId {
        self.id
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Elapsed pause time, up to now while the break is still open.
    pub fn duration(&self) -> TimeDelta {
        let reference = self.end_date.unwrap_or_else(|| self.clock.now());
        reference - self.start_date
    }

    pub fn finish(&mut self) -> Result<(), BreakError> {
        if self.end_date.is_some() {
            return Err(BreakError::AlreadyFinished);
        }
        self.end_date = Some(self.clock.now());
        Ok(())
    }

    pub fn is_completely_equal(&self, other: &Break) -> bool {
        self.id == other.id && self.start_date == other.start_date && self.end_date == other.end_date
    }
}

impl PartialEq for Break {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Break {}

impl Hash for Break {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Break {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Break")
            .field("id", &self.id)
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .finish()
    }
}
