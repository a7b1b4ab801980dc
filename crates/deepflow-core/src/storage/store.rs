//! Session store -- the single source of truth for session history and
//! achievement unlock state.
//!
//! Every mutating operation writes through to the database before
//! returning. A failed write is logged and swallowed: the in-memory
//! state stays authoritative for the rest of the process lifetime and
//! the next mutation's write is the de facto retry. Load failures mean
//! "no prior data" and initialize empty collections.

use chrono::{DateTime, Local, Utc};
use tracing::warn;

use super::database::Database;
use crate::achievements::{self, AchievementState};
use crate::events::Event;
use crate::session::{format_focus_time, SessionRecord};
use crate::widget::{WidgetPublisher, WidgetSnapshot};

/// KV key for the ordered session history blob (newest first).
pub const SESSION_HISTORY_KEY: &str = "session_history";
/// KV key for the achievement unlock state blob.
pub const ACHIEVEMENT_STATE_KEY: &str = "achievement_state";

type Listener = Box<dyn Fn(&Event)>;

/// Owns the session history and achievement state.
///
/// Collaborators are injected explicitly: the database handle, an
/// optional widget publisher, and any number of change listeners
/// registered through [`subscribe`](SessionStore::subscribe).
pub struct SessionStore {
    db: Database,
    sessions: Vec<SessionRecord>,
    achievements: Vec<AchievementState>,
    publisher: Option<WidgetPublisher>,
    listeners: Vec<Listener>,
}

impl SessionStore {
    /// Load the store from the database.
    ///
    /// Missing or unreadable blobs initialize empty collections; this is
    /// the "no prior data" path and is never surfaced to callers. When no
    /// achievement state was persisted the catalogue is evaluated once
    /// against the loaded history.
    pub fn load(db: Database, publisher: Option<WidgetPublisher>) -> Self {
        let sessions: Vec<SessionRecord> = match db.kv_get(SESSION_HISTORY_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("session history blob unreadable, starting empty: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to read session history: {e}");
                Vec::new()
            }
        };
        let achievements: Vec<AchievementState> = match db.kv_get(ACHIEVEMENT_STATE_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("achievement state blob unreadable, starting empty: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to read achievement state: {e}");
                Vec::new()
            }
        };

        let mut store = Self {
            db,
            sessions,
            achievements,
            publisher,
            listeners: Vec::new(),
        };
        if store.achievements.is_empty() {
            store.achievements = achievements::evaluate(&store.sessions, &[], Utc::now());
            store.persist_achievements();
        }
        store
    }

    /// Register a change listener, invoked synchronously after each
    /// mutation on the same thread.
    pub fn subscribe(&mut self, listener: impl Fn(&Event) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The underlying database handle, for collaborators that keep their
    /// own keyed state (the CLI persists its timer here).
    pub fn db(&self) -> &Database {
        &self.db
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Full history, most recent first.
    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    /// Sessions started on the current calendar day (local time),
    /// anchored on "now" at call time.
    pub fn sessions_today(&self) -> Vec<&SessionRecord> {
        let today = Local::now().date_naive();
        self.sessions
            .iter()
            .filter(|r| r.started_at.with_timezone(&Local).date_naive() == today)
            .collect()
    }

    /// Sessions within the rolling 7-day window ending now.
    pub fn sessions_this_week(&self) -> Vec<&SessionRecord> {
        let cutoff = Utc::now() - chrono::Duration::days(7);
        self.sessions
            .iter()
            .filter(|r| r.started_at >= cutoff)
            .collect()
    }

    pub fn total_sessions(&self) -> u64 {
        self.sessions.len() as u64
    }

    pub fn total_focused_secs(&self) -> u64 {
        self.sessions.iter().map(|r| r.focused_secs).sum()
    }

    /// Flat mean of per-record focus percentages (not time-weighted),
    /// 0 on an empty history.
    pub fn average_focus_percentage(&self) -> u32 {
        if self.sessions.is_empty() {
            return 0;
        }
        let total: u64 = self
            .sessions
            .iter()
            .map(|r| u64::from(r.focus_percentage()))
            .sum();
        (total / self.sessions.len() as u64) as u32
    }

    pub fn achievement_states(&self) -> &[AchievementState] {
        &self.achievements
    }

    pub fn unlocked_achievements(&self) -> Vec<&AchievementState> {
        self.achievements.iter().filter(|s| s.unlocked).collect()
    }

    /// Serialize the full history to the same JSON used for persistence.
    /// Pure; a well-formed in-memory history always serializes.
    pub fn export_as_text(&self) -> String {
        serde_json::to_string_pretty(&self.sessions).unwrap_or_default()
    }

    /// The current widget projection.
    pub fn widget_snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            sessions_completed: self.total_sessions(),
            focus_time: format_focus_time(self.total_focused_secs()),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Append a record at the front (most recent first), persist the
    /// history, re-evaluate achievements and refresh the widget snapshot.
    pub fn add_session(&mut self, record: SessionRecord) {
        let now = Utc::now();
        self.sessions.insert(0, record.clone());
        self.persist_sessions();

        let previous = std::mem::take(&mut self.achievements);
        self.achievements = achievements::evaluate(&self.sessions, &previous, now);
        self.persist_achievements();

        self.emit(&Event::SessionRecorded { record, at: now });
        for state in &self.achievements {
            if !state.unlocked {
                continue;
            }
            let was_unlocked = previous
                .iter()
                .find(|p| p.id == state.id)
                .map(|p| p.unlocked)
                .unwrap_or(false);
            if !was_unlocked {
                self.emit(&Event::AchievementUnlocked {
                    id: state.id,
                    title: state.id.title().to_string(),
                    at: state.unlocked_at.unwrap_or(now),
                });
            }
        }
        self.refresh_widget(now);
    }

    /// Irreversibly drop the full history and all unlock state.
    pub fn clear_all(&mut self) {
        let now = Utc::now();
        self.sessions.clear();
        self.achievements = achievements::evaluate(&self.sessions, &[], now);
        self.persist_sessions();
        self.persist_achievements();
        self.emit(&Event::HistoryCleared { at: now });
        self.refresh_widget(now);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn refresh_widget(&self, at: DateTime<Utc>) {
        let snapshot = self.widget_snapshot();
        if let Some(publisher) = &self.publisher {
            publisher.publish(&snapshot);
        }
        self.emit(&Event::HistoryChanged { snapshot, at });
    }

    fn persist_sessions(&self) {
        match serde_json::to_string(&self.sessions) {
            Ok(json) => {
                if let Err(e) = self.db.kv_set(SESSION_HISTORY_KEY, &json) {
                    warn!("failed to persist session history, keeping in-memory state: {e}");
                }
            }
            Err(e) => warn!("failed to serialize session history: {e}"),
        }
    }

    fn persist_achievements(&self) {
        match serde_json::to_string(&self.achievements) {
            Ok(json) => {
                if let Err(e) = self.db.kv_set(ACHIEVEMENT_STATE_KEY, &json) {
                    warn!("failed to persist achievement state, keeping in-memory state: {e}");
                }
            }
            Err(e) => warn!("failed to serialize achievement state: {e}"),
        }
    }

    fn emit(&self, event: &Event) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}
