use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::AchievementId;
use crate::session::SessionRecord;
use crate::timer::TimerState;
use crate::widget::WidgetSnapshot;

/// Every state change in the system produces an Event.
/// The CLI prints them; store subscribers receive them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        objective: String,
        planned_min: u64,
        /// Ambient-sound toggle from configuration, echoed for the
        /// presentation layer. The core plays no audio.
        ambient_sound: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Cancelled sessions leave no record.
    TimerCancelled {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero; carries the synthesized record.
    SessionCompleted {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
    /// The store appended a record and persisted the history.
    SessionRecorded {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: AchievementId,
        title: String,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        at: DateTime<Utc>,
    },
    /// Emitted after every store mutation with the refreshed projection.
    HistoryChanged {
        snapshot: WidgetSnapshot,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        objective: String,
        planned_min: u64,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
