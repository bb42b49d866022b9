// End to end in memory tests for a working day.
//
// - Drive a time card through clock-in, breaks and clock-out against the in memory repository.
// - Assert what the repository hands back on the same day, the next day, and in the history.

mod fixtures;

use chrono::TimeDelta;
use fixtures::{RecordingListener, clock_at, date};
use rstest::rstest;
use std::collections::HashSet;
use std::sync::Arc;
use time_cards::adapters::in_memory::in_memory_time_card_repository::InMemoryTimeCardRepository;
use time_cards::core::ports::{Clock, RepositoryError, TimeCardRepository, TimeCardRepositoryListener};
use time_cards::core::time_card::entity::TimeCard;
use time_cards::core::time_card::errors::TimeCardError;
use time_cards::core::time_card::interest::InterestType;
use time_cards::core::time_card::state::TimeCardState;

#[rstest]
#[tokio::test]
async fn it_should_store_a_full_day_and_hand_it_back() {
    let clock = clock_at("02/01/97 09:00");
    let repository = InMemoryTimeCardRepository::new(clock.clone());

    let mut time_card = TimeCard::new(clock.now(), clock.clone());
    repository.save(&time_card, None).await.unwrap();

    clock.set(date("02/01/97 12:00"));
    time_card.start_break().unwrap();
    repository.save(&time_card, None).await.unwrap();
    assert_eq!(
        repository.get(clock.now()).await.unwrap().state(),
        TimeCardState::OnABreak
    );

    clock.set(date("02/01/97 12:45"));
    time_card.finish_break().unwrap();
    clock.set(date("02/01/97 17:00"));
    time_card.finish().unwrap();
    repository.save(&time_card, None).await.unwrap();

    let stored = repository.get(date("02/01/97 20:00")).await.unwrap();
    assert!(stored.is_completely_equal(&time_card));
    assert_eq!(stored.duration(), TimeDelta::hours(8) - TimeDelta::minutes(45));
    assert_eq!(stored.breaks().len(), 1);
}

#[rstest]
#[tokio::test]
async fn it_should_start_a_fresh_day_after_clocking_out() {
    let clock = clock_at("02/01/97 17:00");
    let repository = InMemoryTimeCardRepository::new(clock.clone());
    let mut yesterday = TimeCard::new(date("02/01/97 09:00"), clock.clone());
    yesterday.finish().unwrap();
    repository.save(&yesterday, None).await.unwrap();

    clock.set(date("03/01/97 08:00"));

    assert_eq!(
        repository.get(clock.now()).await,
        Err(RepositoryError::NotFound)
    );
}

#[rstest]
#[tokio::test]
async fn it_should_carry_an_unfinished_card_over_midnight() {
    let clock = clock_at("02/01/97 22:00");
    let repository = InMemoryTimeCardRepository::new(clock.clone());
    let night_shift = TimeCard::new(clock.now(), clock.clone());
    repository.save(&night_shift, None).await.unwrap();

    clock.set(date("03/01/97 02:00"));
    let current = repository.get(clock.now()).await.unwrap();

    assert_eq!(current, night_shift);
    assert_eq!(current.duration(), TimeDelta::hours(4));
}

#[rstest]
#[tokio::test]
async fn it_should_reject_transitions_without_touching_the_stored_value() {
    let clock = clock_at("02/01/97 09:00");
    let repository = InMemoryTimeCardRepository::new(clock.clone());
    let mut time_card = TimeCard::new(clock.now(), clock.clone());
    time_card.start_break().unwrap();
    repository.save(&time_card, None).await.unwrap();

    assert_eq!(time_card.finish(), Err(TimeCardError::OnABreak));
    assert_eq!(time_card.start_break(), Err(TimeCardError::AlreadyOnABreak));

    let stored = repository.get(clock.now()).await.unwrap();
    assert!(stored.is_completely_equal(&time_card));
}

#[rstest]
#[tokio::test]
async fn it_should_keep_a_week_of_history_newest_first() {
    let clock = clock_at("10/01/97 09:00");
    let repository = InMemoryTimeCardRepository::new(clock.clone());
    for day in 1..=9 {
        let start = date(&format!("{day:02}/01/97 09:00"));
        let time_card = TimeCard::with_parts(
            Default::default(),
            start,
            Some(start + TimeDelta::hours(8)),
            Vec::new(),
            clock.clone(),
        );
        repository.save(&time_card, None).await.unwrap();
    }
    repository
        .save(&TimeCard::new(clock.now(), clock.clone()), None)
        .await
        .unwrap();

    let history = repository.list_finished(Some(7)).await.unwrap();

    let starts: Vec<_> = history.iter().map(TimeCard::start_date).collect();
    assert_eq!(starts.len(), 7);
    assert_eq!(starts.first(), Some(&date("09/01/97 09:00")));
    assert_eq!(starts.last(), Some(&date("03/01/97 09:00")));
    assert!(history.iter().all(TimeCard::is_finished));
}

#[rstest]
#[tokio::test]
async fn it_should_notify_every_step_of_the_day() {
    let clock = clock_at("02/01/97 09:00");
    let repository = InMemoryTimeCardRepository::new(clock.clone());
    let recorder = Arc::new(RecordingListener::default());
    let listener: Arc<dyn TimeCardRepositoryListener> = recorder.clone();
    repository
        .add_listener(&listener, HashSet::from([InterestType::FromDate(date("01/01/97 00:00"))]))
        .await
        .unwrap();

    let mut time_card = TimeCard::new(clock.now(), clock.clone());
    repository.save(&time_card, None).await.unwrap();
    time_card.start_break().unwrap();
    repository.save(&time_card, None).await.unwrap();
    time_card.finish_break().unwrap();
    time_card.finish().unwrap();
    repository.save(&time_card, None).await.unwrap();
    repository.remove(&time_card, None).await.unwrap();

    let states: Vec<_> = recorder.saved().iter().map(TimeCard::state).collect();
    assert_eq!(
        states,
        vec![
            TimeCardState::Ongoing,
            TimeCardState::OnABreak,
            TimeCardState::Finished
        ]
    );
    assert_eq!(recorder.removed(), vec![time_card]);
}
