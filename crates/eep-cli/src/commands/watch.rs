use anyhow::{Context, Result};
use chrono::Utc;
use eep_application::active_project::format_elapsed;
use tokio_util::sync::CancellationToken;

use super::AppContext;

/// Runs the expiry sweep until Ctrl-C.
pub async fn run(context: &AppContext) -> Result<()> {
    let interval = context.store.config().sweep_interval_secs;
    println!("👀 Watching active project (sweep every {}s, Ctrl-C to stop)", interval);
    let session = context.store.session_timer();
    context.store.emit_alerts().await;

    let cancel = CancellationToken::new();
    let sweep = context.store.spawn_expiry_sweep(cancel.clone());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    cancel.cancel();
    sweep.await.context("Expiry sweep task panicked")?;

    tracing::info!(
        "[eep] Watch stopped after {}",
        format_elapsed(session.elapsed(Utc::now()))
    );
    Ok(())
}
