//! Session record value type.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed focus interval.
///
/// Created once at session end, handed to the
/// [`SessionStore`](crate::storage::SessionStore), never mutated
/// afterward. Removed only by the bulk clear operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    /// Free-text intent. May be empty; the presentation layer substitutes
    /// a placeholder before the record reaches the store.
    pub objective: String,
    /// Planned duration in minutes.
    pub planned_min: u64,
    /// Actually focused seconds: planned time minus time remaining when
    /// the session ended.
    pub focused_secs: u64,
    pub started_at: DateTime<Utc>,
    pub completed: bool,
}

impl SessionRecord {
    pub fn new(
        objective: impl Into<String>,
        planned_min: u64,
        focused_secs: u64,
        started_at: DateTime<Utc>,
        completed: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            objective: objective.into(),
            planned_min,
            focused_secs,
            started_at,
            completed,
        }
    }

    /// Planned duration in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn planned_secs(&self) -> u64 {
        self.planned_min.saturating_mul(60)
    }

    /// Ratio of focused to planned time as an integer percent.
    ///
    /// A zero-minute session reports 0 rather than dividing by zero.
    pub fn focus_percentage(&self) -> u32 {
        let planned = self.planned_secs();
        if planned == 0 {
            return 0;
        }
        ((self.focused_secs as f64 / planned as f64) * 100.0).round() as u32
    }

    /// Human date label for listings: "today 14:03", "yesterday 09:12"
    /// or "28.02 17:45" (local time).
    pub fn date_label(&self) -> String {
        let local = self.started_at.with_timezone(&Local);
        let today = Local::now().date_naive();
        let date = local.date_naive();
        if date == today {
            format!("today {}", local.format("%H:%M"))
        } else if today.pred_opt() == Some(date) {
            format!("yesterday {}", local.format("%H:%M"))
        } else {
            local.format("%d.%m %H:%M").to_string()
        }
    }
}

/// Format a focused-seconds total the way the widget shows it:
/// "8h 30m", or "45m" under an hour.
pub fn format_focus_time(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(planned_min: u64, focused_secs: u64) -> SessionRecord {
        SessionRecord::new("write report", planned_min, focused_secs, Utc::now(), true)
    }

    #[test]
    fn focus_percentage_full_session() {
        assert_eq!(record(25, 1500).focus_percentage(), 100);
    }

    #[test]
    fn focus_percentage_rounds() {
        // 1000 of 1500 seconds = 66.67%
        assert_eq!(record(25, 1000).focus_percentage(), 67);
    }

    #[test]
    fn focus_percentage_zero_planned_is_zero() {
        assert_eq!(record(0, 0).focus_percentage(), 0);
        assert_eq!(record(0, 120).focus_percentage(), 0);
    }

    #[test]
    fn format_focus_time_under_an_hour() {
        assert_eq!(format_focus_time(0), "0m");
        assert_eq!(format_focus_time(59), "0m");
        assert_eq!(format_focus_time(45 * 60), "45m");
    }

    #[test]
    fn format_focus_time_with_hours() {
        assert_eq!(format_focus_time(8 * 3600 + 30 * 60), "8h 30m");
        assert_eq!(format_focus_time(3600), "1h 0m");
    }

    #[test]
    fn date_label_today() {
        let r = record(25, 1500);
        assert!(r.date_label().starts_with("today "));
    }

    #[test]
    fn json_roundtrip_preserves_fields() {
        let r = record(25, 1400);
        let json = serde_json::to_string(&r).unwrap();
        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
