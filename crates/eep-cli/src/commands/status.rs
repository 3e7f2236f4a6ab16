use anyhow::Result;
use chrono::Utc;
use eep_application::active_project::format_elapsed;
use eep_core::snapshot::SnapshotRepository;
use serde_json::json;

use super::AppContext;

pub async fn run(context: &AppContext, as_json: bool) -> Result<()> {
    let selection = context.store.current().await;
    let snapshot = context.storage.peek().await;

    if as_json {
        let value = json!({
            "active": selection,
            "expiresAt": snapshot.as_ref().map(|s| s.expires_at),
            "navigation": context.store.navigation().await.map(|nav| json!({
                "project": nav.project,
                "projectSettings": nav.project_settings,
                "projectMembers": nav.project_members,
                "workspace": nav.workspace,
                "workspaceSettings": nav.workspace_settings,
            })),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let Some(selection) = selection else {
        println!("No active project.");
        return Ok(());
    };

    println!("📁 {} ({})", selection.project.name, selection.project.id);
    println!(
        "   Workspace: {} ({})",
        selection.workspace.name, selection.workspace.id
    );
    if let Some(summary) = context.store.status_summary().await {
        let progress = summary
            .progress
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   Status:    {} | progress {} ({})",
            summary.status,
            progress,
            summary.band.as_str()
        );
    }
    if let Some(nav) = context.store.navigation().await {
        println!("   Open:      {}", nav.project);
    }
    if let Some(remaining) = snapshot.and_then(|s| s.remaining(Utc::now())) {
        println!("   Expires:   in {}", format_elapsed(remaining));
    }
    for alert in context.store.alerts().await {
        println!("⚠️  {}: {}", alert.title(), alert.message());
    }

    Ok(())
}
