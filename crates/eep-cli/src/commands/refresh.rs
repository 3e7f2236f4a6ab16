use anyhow::Result;
use eep_application::{ClearReason, RefreshOutcome};

use super::AppContext;

pub async fn run(context: &AppContext) -> Result<()> {
    let outcome = context.store.refresh().await;
    println!("{}", describe(&outcome));
    Ok(())
}

fn describe(outcome: &RefreshOutcome) -> String {
    match outcome {
        RefreshOutcome::Refreshed(selection) => {
            format!("✅ {} is up to date", selection.project.name)
        }
        RefreshOutcome::Cleared(ClearReason::ProjectRemoved) => {
            "Project was removed from its workspace; active project cleared.".to_string()
        }
        RefreshOutcome::Cleared(ClearReason::Failed(e)) => {
            format!("Refresh failed ({}); active project cleared.", e)
        }
        RefreshOutcome::NoActiveProject => "No active project.".to_string(),
        RefreshOutcome::Stale => {
            "Active project changed during refresh; nothing updated.".to_string()
        }
        RefreshOutcome::InFlight => "A refresh is already running.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_and_stale_are_reported_differently() {
        assert_eq!(
            describe(&RefreshOutcome::InFlight),
            "A refresh is already running."
        );
        assert_eq!(
            describe(&RefreshOutcome::Stale),
            "Active project changed during refresh; nothing updated."
        );
    }
}
