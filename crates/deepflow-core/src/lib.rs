//! # DeepFlow Core Library
//!
//! This library provides the core business logic for the DeepFlow focus
//! timer. It implements a CLI-first philosophy where all operations are
//! available via the standalone `deepflow` binary, with any graphical
//! shell expected to stay a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Focus Timer**: A caller-driven countdown state machine. The owner
//!   invokes `tick()` once per wall-clock second while the timer runs
//! - **Session Store**: Single source of truth for the session history and
//!   achievement unlock state, with write-through SQLite persistence
//! - **Achievements**: Static catalogue of seven unlock rules evaluated
//!   against the full session history on every session add
//! - **Stats**: Derived summaries and textual insights, recomputed on
//!   demand from the store's current list
//! - **Widget**: A two-field snapshot projection published to a shared
//!   file that the widget surface reads on its own schedule
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: Core countdown state machine
//! - [`SessionStore`]: Session history and achievement persistence
//! - [`Config`]: Application configuration management
//! - [`WidgetPublisher`]: Snapshot projection for the widget surface

pub mod achievements;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod widget;

pub use achievements::{AchievementDef, AchievementId, AchievementState, CATALOGUE};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use session::{format_focus_time, SessionRecord};
pub use stats::{insights, summarize, Insight, Summary, Timeframe};
pub use storage::{data_dir, Config, Database, SessionStore};
pub use timer::{FocusTimer, TimerState};
pub use widget::{WidgetPublisher, WidgetSnapshot};
