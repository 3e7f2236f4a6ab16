use chrono::{DateTime, Duration, TimeZone, Utc};
use eep_application::{
    ActiveProjectStore, ChannelNotificationSink, ClearReason, Notifier, RefreshOutcome,
};
use eep_core::clock::ManualClock;
use eep_core::config::ActiveProjectConfig;
use eep_core::notification::{Notification, NotificationLevel};
use eep_core::project::{ProjectBasics, ProjectEntity, ProjectStatus, ProjectSummary};
use eep_core::snapshot::SnapshotRepository;
use eep_core::transform::{normalize_project, normalize_workspace};
use eep_core::workspace::{WorkspaceBasics, WorkspaceEntity};
use eep_infrastructure::{FileSnapshotSlot, InMemoryProjectApi, MemorySnapshotSlot, SnapshotStorage};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

fn project_p1() -> ProjectEntity {
    let mut basics = ProjectBasics::new("p-1", "Robotics");
    basics.status = ProjectStatus::Active;
    basics.progress = Some(30);
    basics.technologies = vec!["rust".to_string(), "ros".to_string()];
    ProjectEntity {
        basics,
        member_ids: vec!["u-1".to_string(), "u-2".to_string(), "u-3".to_string()],
        workspace_id: Some("w-1".to_string()),
        last_activity_at: None,
        category: Some("hardware".to_string()),
    }
}

fn workspace_w1() -> WorkspaceEntity {
    WorkspaceEntity {
        basics: WorkspaceBasics::new("w-1", "Cohort 7"),
        project_ids: vec!["p-1".to_string(), "p-2".to_string()],
    }
}

struct Harness {
    store: Arc<ActiveProjectStore>,
    storage: Arc<SnapshotStorage>,
    api: InMemoryProjectApi,
    clock: ManualClock,
    notifications: UnboundedReceiver<Notification>,
}

fn harness_with(storage_slot: Arc<dyn eep_core::snapshot::SnapshotSlot>) -> Harness {
    let clock = ManualClock::new(t0());
    let storage = Arc::new(SnapshotStorage::new(storage_slot, Arc::new(clock.clone())));
    let api = InMemoryProjectApi::new();
    let (sink, notifications) = ChannelNotificationSink::channel();
    let store = Arc::new(ActiveProjectStore::new(
        ActiveProjectConfig::default(),
        storage.clone(),
        Arc::new(api.clone()),
        Notifier::new(Arc::new(sink), true),
        Arc::new(clock.clone()),
    ));
    Harness {
        store,
        storage,
        api,
        clock,
        notifications,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(MemorySnapshotSlot::new()))
}

fn drain(receiver: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut received = Vec::new();
    while let Ok(notification) = receiver.try_recv() {
        received.push(notification);
    }
    received
}

async fn wait_for_calls(api: &InMemoryProjectApi, count: usize) {
    while api.calls() < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_round_trip_restores_normalized_input() {
    let temp_dir = TempDir::new().unwrap();
    let slot = Arc::new(FileSnapshotSlot::new(temp_dir.path().join("eep_active_project.json")));
    let h = harness_with(slot);

    h.store.set_active(project_p1(), workspace_w1()).await;
    let restored = h.storage.load().await.unwrap();

    assert_eq!(restored.project, normalize_project(project_p1()));
    assert_eq!(restored.workspace, normalize_workspace(workspace_w1()));
    assert_eq!(restored.project.member_count, Some(3));
    assert_eq!(restored.workspace.project_count, 2);
}

#[tokio::test]
async fn test_scenario_a_snapshot_expires_after_ttl() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("eep_active_project.json");
    let h = harness_with(Arc::new(FileSnapshotSlot::new(path.clone())));

    h.store.set_active(project_p1(), workspace_w1()).await;

    h.clock.advance(Duration::hours(23));
    let restored = h.storage.load().await.unwrap();
    assert_eq!(restored.project.id, "p-1");
    assert_eq!(restored.workspace.id, "w-1");

    h.clock.advance(Duration::hours(2));
    assert!(h.storage.is_expired().await);
    assert!(h.storage.load().await.is_none());
    assert!(!path.exists(), "expired snapshot should be erased");
}

#[tokio::test]
async fn test_restart_hydrates_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("eep_active_project.json");

    let first = harness_with(Arc::new(FileSnapshotSlot::new(path.clone())));
    first.store.set_active(project_p1(), workspace_w1()).await;

    let second = harness_with(Arc::new(FileSnapshotSlot::new(path)));
    let restored = second.store.hydrate().await.unwrap();

    assert_eq!(restored.project, normalize_project(project_p1()));
    assert!(second.store.is_active_project("p-1").await);
    assert_eq!(second.api.calls(), 0);
}

#[tokio::test]
async fn test_scenario_b_removed_project_clears_store() {
    let mut h = harness();
    h.api.insert_workspace(workspace_w1()).await;
    h.api.insert_project(project_p1()).await;
    h.store.set_active(project_p1(), workspace_w1()).await;
    drain(&mut h.notifications);

    h.api.detach_project("w-1", "p-1").await;
    let outcome = h.store.refresh().await;

    assert_eq!(outcome, RefreshOutcome::Cleared(ClearReason::ProjectRemoved));
    assert!(!h.store.has_active().await);
    assert!(h.storage.peek().await.is_none());
    let notifications = drain(&mut h.notifications);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Warning);
    assert_eq!(notifications[0].title, "Project removed");
}

#[tokio::test]
async fn test_scenario_c_progress_is_clamped() {
    let h = harness();
    h.store.set_active(project_p1(), workspace_w1()).await;

    assert!(h.store.update_progress(150).await);

    assert_eq!(h.store.active_project().await.unwrap().progress, Some(100));
    let restored = h.storage.load().await.unwrap();
    assert_eq!(restored.project.progress, Some(100));
}

#[tokio::test]
async fn test_scenario_d_clear_on_empty_store() {
    let mut h = harness();

    assert!(h.store.clear().await.is_none());

    assert!(!h.store.has_active().await);
    assert!(drain(&mut h.notifications).is_empty());
}

#[tokio::test]
async fn test_scenario_e_second_selection_supersedes_first() {
    let h = harness();
    let mut summary_basics = ProjectBasics::new("p-2", "Data Viz");
    summary_basics.progress = Some(-10);
    let p2 = ProjectSummary {
        basics: summary_basics,
        member_count: 4,
        last_activity_at: None,
        category: None,
        thumbnail_url: Some("https://cdn.eep.example/p-2.png".to_string()),
        visibility: None,
    };

    h.store.set_active(project_p1(), workspace_w1()).await;
    h.store.set_active(p2, workspace_w1()).await;

    let active = h.store.active_project().await.unwrap();
    assert_eq!(active.id, "p-2");
    assert_eq!(active.progress, Some(0));
    assert_eq!(active.member_count, Some(4));
    assert!(active.technologies.is_empty(), "fields of p-1 must not leak");

    let stored = h.storage.load().await.unwrap();
    assert_eq!(stored.project, active);
}

#[tokio::test]
async fn test_stale_refresh_result_is_discarded() {
    let h = harness();
    h.api.insert_workspace(workspace_w1()).await;
    h.api.insert_project(project_p1()).await;
    h.store.set_active(project_p1(), workspace_w1()).await;

    h.api.pause();
    let refresh = {
        let store = h.store.clone();
        tokio::spawn(async move { store.refresh().await })
    };
    wait_for_calls(&h.api, 3).await;
    assert!(h.store.is_refreshing());
    assert!(h.store.is_loading());

    let mut p2 = ProjectBasics::new("p-2", "Data Viz");
    p2.status = ProjectStatus::Active;
    h.store.set_active(p2, workspace_w1()).await;
    h.api.resume();

    assert_eq!(refresh.await.unwrap(), RefreshOutcome::Stale);
    assert_eq!(h.store.active_project_id().await.as_deref(), Some("p-2"));
    assert_eq!(h.storage.peek().await.unwrap().project_id, "p-2");
    assert!(!h.store.is_refreshing());
}

#[tokio::test]
async fn test_refresh_after_clear_does_not_resurrect() {
    let h = harness();
    h.api.insert_workspace(workspace_w1()).await;
    h.api.insert_project(project_p1()).await;
    h.store.set_active(project_p1(), workspace_w1()).await;

    h.api.pause();
    let refresh = {
        let store = h.store.clone();
        tokio::spawn(async move { store.refresh().await })
    };
    wait_for_calls(&h.api, 3).await;
    h.store.clear().await;
    h.api.resume();

    assert_eq!(refresh.await.unwrap(), RefreshOutcome::Stale);
    assert!(!h.store.has_active().await);
    assert!(h.storage.peek().await.is_none());
}

#[tokio::test]
async fn test_concurrent_refresh_is_rejected() {
    let h = harness();
    h.api.insert_workspace(workspace_w1()).await;
    h.api.insert_project(project_p1()).await;
    h.store.set_active(project_p1(), workspace_w1()).await;

    h.api.pause();
    let first = {
        let store = h.store.clone();
        tokio::spawn(async move { store.refresh().await })
    };
    wait_for_calls(&h.api, 3).await;

    assert_eq!(h.store.refresh().await, RefreshOutcome::InFlight);
    assert_eq!(h.api.calls(), 3);

    h.api.resume();
    assert!(matches!(first.await.unwrap(), RefreshOutcome::Refreshed(_)));
    assert!(!h.store.is_loading());
}

#[tokio::test]
async fn test_initialize_restores_previous_session() {
    let slot = Arc::new(MemorySnapshotSlot::new());
    let first = harness_with(slot.clone());
    first.store.set_active(project_p1(), workspace_w1()).await;

    let (sink, _notifications) = ChannelNotificationSink::channel();
    let store = ActiveProjectStore::initialize(
        ActiveProjectConfig::default(),
        first.storage.clone(),
        Arc::new(InMemoryProjectApi::new()),
        Notifier::new(Arc::new(sink), true),
        Arc::new(first.clock.clone()),
    )
    .await;

    assert_eq!(store.active_workspace_id().await.as_deref(), Some("w-1"));
    let nav = store.navigation().await.unwrap();
    assert_eq!(nav.project_members, "/workspaces/w-1/projects/p-1/members");
}
