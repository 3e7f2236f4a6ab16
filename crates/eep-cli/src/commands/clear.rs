use anyhow::Result;

use super::AppContext;

pub async fn run(context: &AppContext) -> Result<()> {
    match context.store.clear().await {
        Some(selection) => println!("✅ Cleared {}", selection.project.name),
        None => println!("No active project."),
    }
    Ok(())
}
