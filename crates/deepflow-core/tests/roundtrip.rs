//! Property tests over the persisted data format and record arithmetic.

use chrono::{TimeZone, Utc};
use deepflow_core::storage::{Database, SessionStore};
use deepflow_core::SessionRecord;
use proptest::prelude::*;

prop_compose! {
    fn arb_record()(
        objective in "[a-z ]{0,16}",
        planned_min in 0u64..=480,
        focused_secs in 0u64..=28_800,
        epoch_secs in 1_577_836_800i64..1_893_456_000i64, // 2020..2030
        completed in any::<bool>(),
    ) -> SessionRecord {
        let started_at = Utc.timestamp_opt(epoch_secs, 0).single().unwrap();
        SessionRecord::new(objective, planned_min, focused_secs, started_at, completed)
    }
}

proptest! {
    #[test]
    fn history_roundtrips_through_json(history in prop::collection::vec(arb_record(), 0..24)) {
        let json = serde_json::to_string(&history).unwrap();
        let back: Vec<SessionRecord> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, history);
    }

    #[test]
    fn focus_percentage_is_bounded(record in arb_record()) {
        let pct = record.focus_percentage();
        if record.planned_min == 0 {
            prop_assert_eq!(pct, 0);
        } else if record.focused_secs <= record.planned_min * 60 {
            prop_assert!(pct <= 100);
        }
    }

    #[test]
    fn total_sessions_equals_history_length(history in prop::collection::vec(arb_record(), 0..16)) {
        let mut store = SessionStore::load(Database::open_memory().unwrap(), None);
        let expected_focus: u64 = history.iter().map(|r| r.focused_secs).sum();
        for record in history.iter().cloned() {
            store.add_session(record);
        }
        prop_assert_eq!(store.total_sessions(), history.len() as u64);
        prop_assert_eq!(store.total_focused_secs(), expected_focus);
    }

    #[test]
    fn export_parses_back_identically(history in prop::collection::vec(arb_record(), 0..16)) {
        let mut store = SessionStore::load(Database::open_memory().unwrap(), None);
        for record in history.iter().cloned() {
            store.add_session(record);
        }
        let parsed: Vec<SessionRecord> = serde_json::from_str(&store.export_as_text()).unwrap();
        prop_assert_eq!(parsed.as_slice(), store.sessions());
    }
}
