use std::path::PathBuf;

use clap::Subcommand;
use deepflow_core::storage::{Database, SessionStore};
use deepflow_core::widget::WidgetPublisher;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List recorded sessions, newest first
    List {
        /// Show at most this many sessions
        #[arg(long)]
        limit: Option<usize>,
        /// One human-readable line per session instead of JSON
        #[arg(long)]
        oneline: bool,
    },
    /// Dump the full history in the persisted JSON format
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Irreversibly delete all sessions and unlock state
    Clear {
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let publisher = WidgetPublisher::default_location().ok();
    let mut store = SessionStore::load(db, publisher);

    match action {
        SessionsAction::List { limit, oneline } => {
            let sessions = store.sessions();
            let shown = &sessions[..limit.unwrap_or(sessions.len()).min(sessions.len())];
            if oneline {
                for record in shown {
                    println!(
                        "{}  {}min  {}%  {}",
                        record.date_label(),
                        record.planned_min,
                        record.focus_percentage(),
                        record.objective
                    );
                }
            } else {
                println!("{}", serde_json::to_string_pretty(shown)?);
            }
        }
        SessionsAction::Export { output } => {
            let text = store.export_as_text();
            match output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    eprintln!("exported {} sessions to {}", store.total_sessions(), path.display());
                }
                None => println!("{text}"),
            }
        }
        SessionsAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear the history without --yes".into());
            }
            store.clear_all();
            eprintln!("history cleared");
        }
    }

    Ok(())
}
