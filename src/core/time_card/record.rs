// Plain value form of a time card.
//
// Purpose
// - Carry only the stored fields (no clock, no observer), so a repository can keep values
//   keyed by id and hand out fresh cards bound to its own clock.
//
// Inputs and outputs
// - TimeCard -> TimeCardRecord on save.
// - TimeCardRecord -> TimeCard on every read, through the same constructor used for clock-in.
//
// Timestamps
// - RFC 3339 in UTC when serialized.

use crate::core::ports::Clock;
use crate::core::time_card::entity::TimeCard;
use crate::core::time_card::id::{BreakId, TimeCardId};
use crate::core::time_card::work_break::Break;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRecord {
    pub id: BreakId,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCardRecord {
    pub id: TimeCardId,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub breaks: Vec<BreakRecord>,
}

impl From<&Break> for BreakRecord {
    fn from(work_break: &Break) -> Self {
        Self {
            id: work_break.id(),
            start_date: work_break.start_date(),
            end_date: work_break.end_date(),
        }
    }
}

impl From<&TimeCard> for TimeCardRecord {
    fn from(time_card: &TimeCard) -> Self {
        Self {
            id: time_card.id(),
            start_date: time_card.start_date(),
            end_date: time_card.end_date(),
            breaks: time_card.breaks().iter().map(BreakRecord::from).collect(),
        }
    }
}

impl TimeCardRecord {
    pub fn into_time_card(self, clock: Arc<dyn Clock>) -> TimeCard {
        let breaks = self
            .breaks
            .into_iter()
            .map(|record| Break::with_id(record.id, record.start_date, record.end_date, clock.clone()))
            .collect();
        TimeCard::with_parts(self.id, self.start_date, self.end_date, breaks, clock)
    }
}
