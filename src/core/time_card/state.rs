// Lifecycle of a time card.
//
// There is no "not started" variant: a time card only exists once clocked in.
// The state is never stored. It is derived from the end date and the last break on every read,
// so it cannot drift from the fields it describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeCardState {
    Ongoing,
    OnABreak,
    Finished,
}

impl TimeCardState {
    pub fn derive(
        end_date: Option<DateTime<Utc>>,
        last_break_end_date: Option<Option<DateTime<Utc>>>,
    ) -> Self {
        match (end_date, last_break_end_date) {
            (Some(_), _) => Self::Finished,
            (None, Some(None)) => Self::OnABreak,
            (None, _) => Self::Ongoing,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::OnABreak => "on_a_break",
            Self::Finished => "finished",
        }
    }
}

impl std::fmt::Display for TimeCardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod time_card_state_tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1997, 1, 2, hour, minute, 0).unwrap()
    }

    #[rstest]
    #[case(None, None, TimeCardState::Ongoing)]
    #[case(None, Some(Some(at(15, 20))), TimeCardState::Ongoing)]
    #[case(None, Some(None), TimeCardState::OnABreak)]
    #[case(Some(at(16, 0)), None, TimeCardState::Finished)]
    #[case(Some(at(16, 0)), Some(Some(at(15, 20))), TimeCardState::Finished)]
    fn it_should_derive_the_state_from_end_date_and_last_break(
        #[case] end_date: Option<DateTime<Utc>>,
        #[case] last_break_end_date: Option<Option<DateTime<Utc>>>,
        #[case] expected: TimeCardState,
    ) {
        assert_eq!(TimeCardState::derive(end_date, last_break_end_date), expected);
    }

    #[rstest]
    fn it_should_serialize_in_snake_case() {
        let json = serde_json::to_value(TimeCardState::OnABreak).unwrap();
        assert_eq!(json, serde_json::json!("on_a_break"));
        assert_eq!(TimeCardState::OnABreak.to_string(), "on_a_break");
    }
}
