// Periodic duration ticks for the card a today view shows.
//
// Purpose
// - Publish worked and break durations while a card is open, so a view can refresh without
//   polling the repository.
//
// Lifecycle
// - `spawn` starts a background task; `stop` shuts it down and waits for it.
// - The task also ends by itself after the final tick of a finished card, or when the
//   receiving side is dropped.

use crate::core::ports::Clock;
use crate::core::time_card::entity::TimeCard;
use crate::core::time_card::id::TimeCardId;
use crate::core::time_card::state::TimeCardState;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time;

pub trait CurrentTimeCardSource: Send + Sync {
    fn current_time_card(&self) -> Option<TimeCard>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationTick {
    pub time_card_id: TimeCardId,
    pub state: TimeCardState,
    pub worked: TimeDelta,
    pub current_break: Option<TimeDelta>,
    pub at: DateTime<Utc>,
}

impl DurationTick {
    fn of(time_card: &TimeCard, at: DateTime<Utc>) -> Self {
        let current_break = match time_card.current_break() {
            Ok(current) => current.map(|work_break| work_break.duration()),
            Err(error) => {
                tracing::warn!(time_card_id = %time_card.id(), %error, "break duration unavailable");
                None
            }
        };
        Self {
            time_card_id: time_card.id(),
            state: time_card.state(),
            worked: time_card.duration(),
            current_break,
            at,
        }
    }
}

pub struct DurationTicker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl DurationTicker {
    pub fn spawn(
        source: Arc<dyn CurrentTimeCardSource>,
        clock: Arc<dyn Clock>,
        period: Duration,
        sender: mpsc::Sender<DurationTick>,
    ) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = interval.tick() => {}
                }

                let Some(time_card) = source.current_time_card() else {
                    continue;
                };
                let tick = DurationTick::of(&time_card, clock.now());
                let finished = tick.state == TimeCardState::Finished;

                if sender.send(tick).await.is_err() {
                    tracing::debug!("duration receiver dropped");
                    break;
                }
                if finished {
                    tracing::debug!(time_card_id = %time_card.id(), "time card finished, ticker done");
                    break;
                }
            }
        });

        Self { shutdown, handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Waits for the task to end on its own.
    pub async fn join(self) {
        if let Err(error) = self.handle.await {
            tracing::error!(%error, "duration ticker task failed");
        }
    }

    pub async fn stop(self) {
        // The task may already be gone, in which case nobody listens.
        let _ = self.shutdown.send(true);
        self.join().await;
    }
}

#[cfg(test)]
mod duration_ticker_tests {
    use super::*;
    use crate::adapters::clock::manual_clock::ManualClock;
    use crate::test_support::fixtures::date;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    #[derive(Default)]
    struct HeldTimeCard {
        time_card: Mutex<Option<TimeCard>>,
    }

    impl HeldTimeCard {
        fn hold(&self, time_card: Option<TimeCard>) {
            *self.time_card.lock().unwrap() = time_card;
        }
    }

    impl CurrentTimeCardSource for HeldTimeCard {
        fn current_time_card(&self) -> Option<TimeCard> {
            self.time_card.lock().unwrap().clone()
        }
    }

    type BeforeEachReturn = (Arc<ManualClock>, Arc<HeldTimeCard>);

    #[fixture]
    fn before_each() -> BeforeEachReturn {
        (
            Arc::new(ManualClock::new(date("02/01/97 15:30"))),
            Arc::new(HeldTimeCard::default()),
        )
    }

    fn spawn(
        clock: &Arc<ManualClock>,
        source: &Arc<HeldTimeCard>,
    ) -> (DurationTicker, mpsc::Receiver<DurationTick>) {
        let (sender, receiver) = mpsc::channel(8);
        let ticker = DurationTicker::spawn(
            source.clone(),
            clock.clone(),
            Duration::from_secs(1),
            sender,
        );
        (ticker, receiver)
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn it_should_tick_worked_time_for_an_ongoing_card(before_each: BeforeEachReturn) {
        let (clock, source) = before_each;
        source.hold(Some(TimeCard::new(date("02/01/97 15:00"), clock.clone())));
        let (ticker, mut receiver) = spawn(&clock, &source);

        let first = receiver.recv().await.expect("no tick");
        clock.advance(TimeDelta::minutes(1));
        let second = receiver.recv().await.expect("no tick");

        assert_eq!(first.state, TimeCardState::Ongoing);
        assert_eq!(first.worked, TimeDelta::minutes(30));
        assert_eq!(first.current_break, None);
        assert_eq!(second.worked, TimeDelta::minutes(31));
        assert_eq!(second.at, date("02/01/97 15:31"));

        ticker.stop().await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn it_should_report_the_running_break(before_each: BeforeEachReturn) {
        let (clock, source) = before_each;
        let mut time_card = TimeCard::new(date("02/01/97 15:00"), clock.clone());
        clock.set(date("02/01/97 15:20"));
        time_card.start_break().unwrap();
        clock.set(date("02/01/97 15:30"));
        source.hold(Some(time_card));
        let (ticker, mut receiver) = spawn(&clock, &source);

        let tick = receiver.recv().await.expect("no tick");

        assert_eq!(tick.state, TimeCardState::OnABreak);
        assert_eq!(tick.worked, TimeDelta::minutes(20));
        assert_eq!(tick.current_break, Some(TimeDelta::minutes(10)));

        ticker.stop().await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn it_should_send_a_final_tick_and_end_once_finished(before_each: BeforeEachReturn) {
        let (clock, source) = before_each;
        let mut time_card = TimeCard::new(date("02/01/97 15:00"), clock.clone());
        time_card.finish().unwrap();
        source.hold(Some(time_card));
        let (ticker, mut receiver) = spawn(&clock, &source);

        let last = receiver.recv().await.expect("no tick");

        assert_eq!(last.state, TimeCardState::Finished);
        assert_eq!(receiver.recv().await, None);
        ticker.join().await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn it_should_skip_ticks_without_a_card(before_each: BeforeEachReturn) {
        let (clock, source) = before_each;
        let (ticker, mut receiver) = spawn(&clock, &source);

        let waited = time::timeout(Duration::from_secs(5), receiver.recv()).await;

        assert!(waited.is_err());
        assert!(ticker.is_running());
        ticker.stop().await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn it_should_end_when_the_receiver_is_dropped(before_each: BeforeEachReturn) {
        let (clock, source) = before_each;
        source.hold(Some(TimeCard::new(date("02/01/97 15:00"), clock.clone())));
        let (ticker, receiver) = spawn(&clock, &source);
        drop(receiver);

        let joined = time::timeout(Duration::from_secs(5), ticker.join()).await;

        assert!(joined.is_ok());
    }
}
