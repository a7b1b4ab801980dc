//! Read-side summary aggregation and textual insights.
//!
//! Everything here is derived on demand from the store's current list --
//! nothing is stored.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::session::{format_focus_time, SessionRecord};
use crate::storage::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Today,
    Week,
    Month,
    AllTime,
}

/// Aggregated view over one timeframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub timeframe: Timeframe,
    pub sessions: u64,
    pub focused_secs: u64,
    /// Pre-formatted focus total, e.g. "8h 30m".
    pub focus_time: String,
    /// Flat mean of per-record focus percentages within the timeframe.
    pub average_focus_pct: u32,
    /// Always the calendar-day count, independent of the timeframe.
    pub sessions_today: u64,
}

/// One observation derived from the history. `icon` and `color` are
/// opaque presentation hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub icon: String,
    pub title: String,
    pub detail: String,
    pub color: String,
}

/// Aggregate the sessions falling inside `frame`, anchored on "now" at
/// call time.
pub fn summarize(store: &SessionStore, frame: Timeframe) -> Summary {
    let filtered: Vec<&SessionRecord> = match frame {
        Timeframe::Today => store.sessions_today(),
        Timeframe::Week => store.sessions_this_week(),
        Timeframe::Month => {
            let now = Local::now();
            store
                .sessions()
                .iter()
                .filter(|r| {
                    let local = r.started_at.with_timezone(&Local);
                    local.year() == now.year() && local.month() == now.month()
                })
                .collect()
        }
        Timeframe::AllTime => store.sessions().iter().collect(),
    };

    let focused_secs: u64 = filtered.iter().map(|r| r.focused_secs).sum();
    let average_focus_pct = if filtered.is_empty() {
        0
    } else {
        let total: u64 = filtered
            .iter()
            .map(|r| u64::from(r.focus_percentage()))
            .sum();
        (total / filtered.len() as u64) as u32
    };

    Summary {
        timeframe: frame,
        sessions: filtered.len() as u64,
        focused_secs,
        focus_time: format_focus_time(focused_secs),
        average_focus_pct,
        sessions_today: store.sessions_today().len() as u64,
    }
}

/// Derive the textual insights shown on the summary surface. Falls back
/// to a starter insight on an empty history.
pub fn insights(store: &SessionStore) -> Vec<Insight> {
    let mut out = Vec::new();

    let today = store.sessions_today().len();
    if today >= 3 {
        out.push(Insight {
            icon: "sparkles".to_string(),
            title: "Productive day".to_string(),
            detail: format!("{today} sessions completed today"),
            color: "yellow".to_string(),
        });
    }

    if store.average_focus_percentage() > 80 {
        out.push(Insight {
            icon: "brain".to_string(),
            title: "High focus".to_string(),
            detail: "Your average focus is excellent".to_string(),
            color: "green".to_string(),
        });
    }

    if store.total_sessions() > 10 {
        out.push(Insight {
            icon: "flag".to_string(),
            title: "Very consistent".to_string(),
            detail: format!("{} sessions and counting", store.total_sessions()),
            color: "blue".to_string(),
        });
    }

    if out.is_empty() {
        out.push(Insight {
            icon: "lightbulb".to_string(),
            title: "Start your journey".to_string(),
            detail: "Complete your first session to see insights".to_string(),
            color: "gray".to_string(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use chrono::{Duration, Utc};

    fn store_with(records: Vec<SessionRecord>) -> SessionStore {
        let mut store = SessionStore::load(Database::open_memory().unwrap(), None);
        for record in records {
            store.add_session(record);
        }
        store
    }

    fn record(focused_secs: u64, started_at: chrono::DateTime<Utc>) -> SessionRecord {
        SessionRecord::new("deep work", 25, focused_secs, started_at, true)
    }

    #[test]
    fn empty_store_summarizes_to_zero() {
        let store = store_with(Vec::new());
        let summary = summarize(&store, Timeframe::AllTime);
        assert_eq!(summary.sessions, 0);
        assert_eq!(summary.focused_secs, 0);
        assert_eq!(summary.average_focus_pct, 0);
        assert_eq!(summary.focus_time, "0m");
    }

    #[test]
    fn week_window_excludes_older_sessions() {
        let store = store_with(vec![
            record(1500, Utc::now()),
            record(1500, Utc::now() - Duration::days(10)),
        ]);
        let summary = summarize(&store, Timeframe::Week);
        assert_eq!(summary.sessions, 1);
        let all = summarize(&store, Timeframe::AllTime);
        assert_eq!(all.sessions, 2);
    }

    #[test]
    fn today_counts_only_calendar_day() {
        let store = store_with(vec![
            record(1500, Utc::now()),
            record(1500, Utc::now() - Duration::days(2)),
        ]);
        let summary = summarize(&store, Timeframe::Today);
        assert_eq!(summary.sessions, 1);
        assert_eq!(summary.sessions_today, 1);
    }

    #[test]
    fn focus_time_is_preformatted() {
        let store = store_with(vec![record(3 * 3600 + 600, Utc::now())]);
        let summary = summarize(&store, Timeframe::AllTime);
        assert_eq!(summary.focus_time, "3h 10m");
    }

    #[test]
    fn empty_history_yields_starter_insight() {
        let store = store_with(Vec::new());
        let list = insights(&store);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Start your journey");
    }

    #[test]
    fn productive_day_insight_after_three_today() {
        let store = store_with(vec![
            record(1500, Utc::now()),
            record(1500, Utc::now()),
            record(1500, Utc::now()),
        ]);
        let list = insights(&store);
        assert!(list.iter().any(|i| i.title == "Productive day"));
    }

    #[test]
    fn high_focus_insight_above_eighty_percent() {
        let store = store_with(vec![record(1500, Utc::now())]);
        let list = insights(&store);
        assert!(list.iter().any(|i| i.title == "High focus"));
    }
}
