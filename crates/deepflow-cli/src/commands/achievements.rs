use chrono::{DateTime, Utc};
use clap::Subcommand;
use deepflow_core::achievements::CATALOGUE;
use deepflow_core::storage::{Database, SessionStore};
use serde::Serialize;

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// Show the catalogue with unlock state
    List {
        /// Only show unlocked achievements
        #[arg(long)]
        unlocked: bool,
    },
}

/// Catalogue entry merged with its unlock state for display.
#[derive(Serialize)]
struct AchievementView {
    id: deepflow_core::AchievementId,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
    requirement: u64,
    unlocked: bool,
    unlocked_at: Option<DateTime<Utc>>,
}

pub fn run(action: AchievementsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SessionStore::load(Database::open()?, None);

    match action {
        AchievementsAction::List { unlocked } => {
            let views: Vec<AchievementView> = CATALOGUE
                .iter()
                .map(|def| {
                    let state = store
                        .achievement_states()
                        .iter()
                        .find(|s| s.id == def.id);
                    AchievementView {
                        id: def.id,
                        title: def.title,
                        description: def.description,
                        icon: def.icon,
                        color: def.color,
                        requirement: def.requirement,
                        unlocked: state.map(|s| s.unlocked).unwrap_or(false),
                        unlocked_at: state.and_then(|s| s.unlocked_at),
                    }
                })
                .filter(|v| !unlocked || v.unlocked)
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }
    Ok(())
}
