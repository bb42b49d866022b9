// What a repository listener wants to hear about.
//
// A card is wanted when the interests contain `All` or `TimeCard(card.id)`,
// or when any `FromDate(d)` has the card starting strictly after `d`.

use crate::core::time_card::entity::TimeCard;
use crate::core::time_card::id::TimeCardId;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterestType {
    TimeCard(TimeCardId),
    FromDate(DateTime<Utc>),
    All,
}

pub fn is_wanted_by(time_card: &TimeCard, interests: &HashSet<InterestType>) -> bool {
    if interests.contains(&InterestType::All)
        || interests.contains(&InterestType::TimeCard(time_card.id()))
    {
        return true;
    }
    interests.iter().any(|interest| match interest {
        InterestType::FromDate(date) => time_card.start_date() > *date,
        _ => false,
    })
}
