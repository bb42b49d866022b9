use anyhow::Context;
use std::collections::HashSet;
use std::sync::Arc;
use time_cards::application::ticker::{CurrentTimeCardSource, DurationTicker};
use time_cards::core::ports::{TimeCardRepository, TimeCardRepositoryListener};
use time_cards::core::time_card::entity::TimeCardObserver;
use time_cards::core::time_card::interest::InterestType;
use time_cards::core::time_card::record::TimeCardRecord;
use time_cards::core::time_card::state::TimeCardState;
use time_cards::shell::config::Settings;
use time_cards::shell::observers::TracingListener;
use time_cards::shell::state::AppState;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::from_env().context("loading settings")?;
    let state = AppState::build(&settings);

    let tracing_listener = Arc::new(TracingListener::new());
    let listener: Arc<dyn TimeCardRepositoryListener> = tracing_listener.clone();
    state
        .repository
        .add_listener(&listener, HashSet::from([InterestType::All]))
        .await?;
    let observer: Arc<dyn TimeCardObserver> = tracing_listener.clone();
    state.session.set_observer(&observer);

    let time_card = match state.session.fetch().await? {
        Some(time_card) => time_card,
        None => state.session.clock_in().await?,
    };

    if time_card.is_finished() {
        tracing::info!(time_card_id = %time_card.id(), "already clocked out today");
    } else {
        track_until_interrupted(&state, &settings).await?;
        clock_out(&state).await?;
    }

    log_history(state.repository.as_ref(), settings.history_limit).await?;
    tracing::info!(notifications = tracing_listener.notifications(), "bye");
    Ok(())
}

async fn track_until_interrupted(state: &AppState, settings: &Settings) -> anyhow::Result<()> {
    let (sender, mut ticks) = mpsc::channel(16);
    let source: Arc<dyn CurrentTimeCardSource> = state.session.clone();
    let ticker = DurationTicker::spawn(source, state.clock.clone(), settings.tick_interval, sender);

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            signal = &mut interrupted => {
                signal.context("listening for ctrl-c")?;
                tracing::info!("interrupted, clocking out");
                break;
            }
            tick = ticks.recv() => {
                let Some(tick) = tick else { break };
                tracing::info!(
                    time_card_id = %tick.time_card_id,
                    state = %tick.state,
                    worked_seconds = tick.worked.num_seconds(),
                    break_seconds = tick.current_break.map(|duration| duration.num_seconds()),
                    "tick"
                );
            }
        }
    }

    ticker.stop().await;
    Ok(())
}

async fn clock_out(state: &AppState) -> anyhow::Result<()> {
    let Some(time_card) = state.session.time_card() else {
        return Ok(());
    };
    match time_card.state() {
        TimeCardState::Finished => return Ok(()),
        TimeCardState::OnABreak => {
            state.session.resume().await?;
        }
        TimeCardState::Ongoing => {}
    }
    let finished = state.session.clock_out().await?;
    tracing::info!(
        time_card_id = %finished.id(),
        worked_seconds = finished.duration().num_seconds(),
        "clocked out"
    );
    Ok(())
}

async fn log_history(repository: &dyn TimeCardRepository, limit: usize) -> anyhow::Result<()> {
    let history: Vec<TimeCardRecord> = repository
        .list_finished(Some(limit))
        .await?
        .iter()
        .map(TimeCardRecord::from)
        .collect();
    let json = serde_json::to_string(&history).context("serializing history")?;
    tracing::info!(count = history.len(), history = %json, "finished time cards");
    Ok(())
}
