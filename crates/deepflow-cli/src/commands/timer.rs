use clap::Subcommand;
use deepflow_core::storage::{Config, Database, SessionStore};
use deepflow_core::timer::{FocusTimer, TimerState};
use deepflow_core::widget::WidgetPublisher;
use deepflow_core::Event;

const ENGINE_KEY: &str = "timer_engine";
const OBJECTIVE_PLACEHOLDER: &str = "Focus session";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a new focus session
    Start {
        /// What this session is for
        #[arg(long)]
        objective: Option<String>,
        /// Planned duration in minutes (defaults to the configured value)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Pause the running countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Abandon the session without recording it
    Cancel,
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground until it finishes
    Run {
        /// What this session is for
        #[arg(long)]
        objective: Option<String>,
        /// Planned duration in minutes (defaults to the configured value)
        #[arg(long)]
        minutes: Option<u32>,
    },
}

fn open_store() -> Result<SessionStore, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let publisher = WidgetPublisher::default_location().ok();
    let mut store = SessionStore::load(db, publisher);
    // Surface achievement unlocks as they happen.
    store.subscribe(|event| {
        if matches!(event, Event::AchievementUnlocked { .. }) {
            if let Ok(json) = serde_json::to_string_pretty(event) {
                println!("{json}");
            }
        }
    });
    Ok(store)
}

fn load_engine(store: &SessionStore) -> Option<FocusTimer> {
    let json = store.db().kv_get(ENGINE_KEY).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

fn save_engine(
    store: &SessionStore,
    engine: &FocusTimer,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    store.db().kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Record a completed session into the store and print the event.
fn settle(store: &mut SessionStore, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    if let Event::SessionCompleted { record, .. } = event {
        store.add_session(record.clone());
    }
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Validate presentation-boundary preconditions and build a fresh timer.
fn new_engine(
    store: &SessionStore,
    objective: Option<String>,
    minutes: Option<u32>,
) -> Result<FocusTimer, Box<dyn std::error::Error>> {
    if let Some(existing) = load_engine(store) {
        if matches!(existing.state(), TimerState::Running | TimerState::Paused) {
            return Err("a session is already in progress; cancel it first".into());
        }
    }
    let cfg = Config::load_or_default();
    let minutes = u64::from(minutes.unwrap_or(cfg.timer.work_minutes));
    if minutes == 0 {
        return Err("session duration must be at least one minute".into());
    }
    let objective = match objective {
        Some(o) if !o.trim().is_empty() => o,
        _ => OBJECTIVE_PLACEHOLDER.to_string(),
    };
    Ok(FocusTimer::new(objective, minutes, cfg.sound.ambient))
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        TimerAction::Start { objective, minutes } => {
            let mut engine = new_engine(&store, objective, minutes)?;
            if let Some(event) = engine.start() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_engine(&store, &engine)?;
        }
        TimerAction::Pause => {
            let Some(mut engine) = load_engine(&store) else {
                return Err("no session in progress".into());
            };
            if let Some(completed) = engine.sync() {
                settle(&mut store, &completed)?;
            } else if let Some(event) = engine.pause() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            }
            save_engine(&store, &engine)?;
        }
        TimerAction::Resume => {
            let Some(mut engine) = load_engine(&store) else {
                return Err("no session in progress".into());
            };
            if let Some(event) = engine.resume() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            }
            save_engine(&store, &engine)?;
        }
        TimerAction::Cancel => {
            let Some(mut engine) = load_engine(&store) else {
                return Err("no session in progress".into());
            };
            // A countdown that already reached zero completed; otherwise
            // the session is dropped without a record.
            if let Some(completed) = engine.sync() {
                settle(&mut store, &completed)?;
            } else if let Some(event) = engine.cancel() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            }
            save_engine(&store, &engine)?;
        }
        TimerAction::Status => {
            let Some(mut engine) = load_engine(&store) else {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "type": "NoSession" }))?);
                return Ok(());
            };
            if let Some(completed) = engine.sync() {
                settle(&mut store, &completed)?;
            }
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            save_engine(&store, &engine)?;
        }
        TimerAction::Run { objective, minutes } => {
            let mut engine = new_engine(&store, objective, minutes)?;
            if let Some(event) = engine.start() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_engine(&store, &engine)?;
            loop {
                std::thread::sleep(std::time::Duration::from_secs(1));
                let completed = engine.tick();
                eprint!(
                    "\r{} remaining   ",
                    format_clock(engine.remaining_secs())
                );
                save_engine(&store, &engine)?;
                if let Some(event) = completed {
                    eprintln!();
                    settle(&mut store, &event)?;
                    break;
                }
            }
        }
    }

    Ok(())
}

/// m:ss, or h:mm:ss once the countdown crosses an hour.
fn format_clock(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_minutes_and_hours() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(90), "1:30");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(3 * 3600 + 62), "3:01:02");
    }
}
