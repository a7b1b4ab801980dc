//! Achievement catalogue and evaluator.
//!
//! Seven fixed definitions, each a numeric threshold over an aggregate of
//! the session history. The evaluator recomputes unlock status for the
//! whole catalogue on every session add (and once at store load when no
//! prior state was persisted). Identity is the stable [`AchievementId`],
//! never the display title, so a title can be reworded without losing
//! unlock history.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Stable identifier, persisted and used for old/new state matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstSteps,
    Consistent,
    Productive,
    FlowMaster,
    ProductiveDay,
    Marathoner,
    TotalFocus,
}

impl AchievementId {
    /// The static definition this id refers to.
    pub fn def(self) -> &'static AchievementDef {
        match self {
            AchievementId::FirstSteps => &CATALOGUE[0],
            AchievementId::Consistent => &CATALOGUE[1],
            AchievementId::Productive => &CATALOGUE[2],
            AchievementId::FlowMaster => &CATALOGUE[3],
            AchievementId::ProductiveDay => &CATALOGUE[4],
            AchievementId::Marathoner => &CATALOGUE[5],
            AchievementId::TotalFocus => &CATALOGUE[6],
        }
    }

    pub fn title(self) -> &'static str {
        self.def().title
    }
}

/// Which aggregate a definition's threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalSessions,
    SessionsToday,
    FocusedHours,
}

/// Static definition. `icon` and `color` are opaque presentation hints.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub requirement: u64,
    pub metric: Metric,
}

/// The full catalogue, in display order.
pub static CATALOGUE: [AchievementDef; 7] = [
    AchievementDef {
        id: AchievementId::FirstSteps,
        title: "First Steps",
        description: "Complete your first focus session",
        icon: "spark",
        color: "blue",
        requirement: 1,
        metric: Metric::TotalSessions,
    },
    AchievementDef {
        id: AchievementId::Consistent,
        title: "Consistent",
        description: "Complete 5 focus sessions",
        icon: "flame",
        color: "orange",
        requirement: 5,
        metric: Metric::TotalSessions,
    },
    AchievementDef {
        id: AchievementId::Productive,
        title: "Productive",
        description: "Complete 10 focus sessions",
        icon: "medal",
        color: "yellow",
        requirement: 10,
        metric: Metric::TotalSessions,
    },
    AchievementDef {
        id: AchievementId::FlowMaster,
        title: "Flow Master",
        description: "Complete 25 focus sessions",
        icon: "wave",
        color: "purple",
        requirement: 25,
        metric: Metric::TotalSessions,
    },
    AchievementDef {
        id: AchievementId::ProductiveDay,
        title: "Productive Day",
        description: "Complete 3 sessions in a single day",
        icon: "sun",
        color: "red",
        requirement: 3,
        metric: Metric::SessionsToday,
    },
    AchievementDef {
        id: AchievementId::Marathoner,
        title: "Marathoner",
        description: "Complete 50 focus sessions",
        icon: "mountain",
        color: "green",
        requirement: 50,
        metric: Metric::TotalSessions,
    },
    AchievementDef {
        id: AchievementId::TotalFocus,
        title: "Total Focus",
        description: "Accumulate 10 hours of focused time",
        icon: "clock",
        color: "teal",
        requirement: 10,
        metric: Metric::FocusedHours,
    },
];

/// Unlock state for one definition.
///
/// `unlocked_at` is stamped exactly once, on the false-to-true
/// transition, and carried over unchanged on every later evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementState {
    pub id: AchievementId,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Aggregates the predicates read, computed once per evaluation pass.
struct Aggregates {
    total_sessions: u64,
    sessions_today: u64,
    focused_hours: u64,
}

fn aggregates(history: &[SessionRecord]) -> Aggregates {
    let today = Local::now().date_naive();
    let sessions_today = history
        .iter()
        .filter(|r| r.started_at.with_timezone(&Local).date_naive() == today)
        .count() as u64;
    let focused_secs: u64 = history.iter().map(|r| r.focused_secs).sum();
    Aggregates {
        total_sessions: history.len() as u64,
        sessions_today,
        focused_hours: focused_secs / 3600,
    }
}

/// Recompute unlock state for every definition against the current full
/// history. Previously stamped `unlocked_at` values carry over unchanged;
/// a new unlock is stamped with `now`.
pub fn evaluate(
    history: &[SessionRecord],
    previous: &[AchievementState],
    now: DateTime<Utc>,
) -> Vec<AchievementState> {
    let agg = aggregates(history);
    CATALOGUE
        .iter()
        .map(|def| {
            let value = match def.metric {
                Metric::TotalSessions => agg.total_sessions,
                Metric::SessionsToday => agg.sessions_today,
                Metric::FocusedHours => agg.focused_hours,
            };
            let unlocked = value >= def.requirement;
            let carried = previous
                .iter()
                .find(|s| s.id == def.id)
                .and_then(|s| s.unlocked_at);
            let unlocked_at = match (unlocked, carried) {
                (true, Some(at)) => Some(at),
                (true, None) => Some(now),
                (false, _) => None,
            };
            AchievementState {
                id: def.id,
                unlocked,
                unlocked_at,
            }
        })
        .collect()
}
