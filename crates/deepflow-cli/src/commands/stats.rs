use clap::Subcommand;
use deepflow_core::storage::{Database, SessionStore};
use deepflow_core::{insights, summarize, Timeframe};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// Rolling 7-day stats
    Week,
    /// Current calendar month stats
    Month,
    /// All-time stats
    All,
    /// Derived textual insights
    Insights,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SessionStore::load(Database::open()?, None);

    match action {
        StatsAction::Today => print_summary(&store, Timeframe::Today)?,
        StatsAction::Week => print_summary(&store, Timeframe::Week)?,
        StatsAction::Month => print_summary(&store, Timeframe::Month)?,
        StatsAction::All => print_summary(&store, Timeframe::AllTime)?,
        StatsAction::Insights => {
            println!("{}", serde_json::to_string_pretty(&insights(&store))?);
        }
    }
    Ok(())
}

fn print_summary(
    store: &SessionStore,
    frame: Timeframe,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&summarize(store, frame))?);
    Ok(())
}
