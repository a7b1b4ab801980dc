use clap::Subcommand;
use deepflow_core::storage::data_dir;
use deepflow_core::widget::WidgetSnapshot;

#[derive(Subcommand)]
pub enum WidgetAction {
    /// Print the published snapshot, as the widget surface sees it
    Show,
}

pub fn run(action: WidgetAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WidgetAction::Show => {
            // Read side only: no store, just the shared file. An absent or
            // unreadable snapshot renders as the empty default, exactly
            // like a widget that has never seen a publish.
            let path = data_dir()?.join("widget.json");
            let snapshot = WidgetSnapshot::load(&path).unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}
