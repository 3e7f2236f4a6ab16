use anyhow::{Context, Result};
use eep_core::api::ProjectApi;

use super::AppContext;

pub async fn run(context: &AppContext, project_id: &str, workspace_id: &str) -> Result<()> {
    let (project, workspace, project_refs) = tokio::try_join!(
        context.api.get_project_by_id(project_id),
        context.api.get_workspace_by_id(workspace_id),
        context.api.get_workspace_projects(workspace_id),
    )
    .context("Failed to fetch project details")?;

    if !project_refs.iter().any(|r| r.id == project_id) {
        anyhow::bail!(
            "Project {} is not part of workspace {}",
            project_id,
            workspace_id
        );
    }

    let selection = context.store.set_active(project, workspace).await;
    println!(
        "✅ Active project: {} in {}",
        selection.project.name, selection.workspace.name
    );
    Ok(())
}
