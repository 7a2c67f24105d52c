mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingGateway, TOKEN, task};
use tasklet_core::error::GatewayError;
use tasklet_core::staging::DeletionStager;
use tasklet_shared::DELETE_TASK_FAILED;
use tasklet_shared::staging::{DeletionStage, StageError};
use tokio::time::Instant;

const WINDOW: Duration = Duration::from_millis(5_000);

fn gateway() -> Arc<RecordingGateway> {
    RecordingGateway::with_tasks(vec![task("t1", "one", false), task("t2", "two", true)])
}

#[tokio::test(start_paused = true)]
async fn default_window_is_five_seconds() {
    let stager = DeletionStager::new(gateway(), Some(TOKEN));
    assert_eq!(stager.window(), WINDOW);
}

#[tokio::test(start_paused = true)]
async fn undo_inside_window_sends_nothing() {
    let gateway = gateway();
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));

    stager.stage("t1").expect("stage");
    assert!(stager.current().shows_notice());

    tokio::time::sleep(WINDOW - Duration::from_millis(1)).await;
    assert!(stager.undo());
    assert!(stager.current().is_idle());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(gateway.deletes().is_empty());
    assert_eq!(gateway.stored().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn elapsed_window_sends_exactly_one_delete() {
    let gateway = gateway();
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));
    let started = Instant::now();

    stager.stage("t1").expect("stage");
    let settled = stager.settled().await;

    assert!(started.elapsed() >= WINDOW);
    assert_eq!(
        settled.stage(),
        &DeletionStage::Committed {
            task_id: "t1".to_string()
        }
    );
    assert_eq!(gateway.deletes(), vec!["t1"]);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(gateway.deletes(), vec!["t1"]);
    assert!(!stager.undo());
}

#[tokio::test(start_paused = true)]
async fn undo_is_refused_once_the_request_is_in_flight() {
    let gateway = gateway();
    gateway.delay_deletes(Duration::from_millis(500));
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));

    stager.stage("t1").expect("stage");
    tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;

    assert!(matches!(
        stager.current().stage(),
        DeletionStage::Committing { .. }
    ));
    assert!(!stager.undo());
    assert!(stager.settled().await.is_committed());
    assert_eq!(gateway.deletes(), vec!["t1"]);
}

#[tokio::test(start_paused = true)]
async fn failed_commit_returns_to_idle_with_message() {
    let gateway = gateway();
    gateway.fail_delete_of("t1");
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));

    stager.stage("t1").expect("stage");
    let settled = stager.settled().await;

    assert!(settled.is_idle());
    assert!(!settled.shows_notice());
    assert_eq!(settled.error(), Some(DELETE_TASK_FAILED));
    assert_eq!(gateway.stored().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn second_stage_is_rejected_while_pending() {
    let mut stager = DeletionStager::new(gateway(), Some(TOKEN));
    stager.stage("t1").expect("stage");

    assert!(matches!(
        stager.stage("t2"),
        Err(GatewayError::Staging(StageError::AlreadyPending(id))) if id == "t1"
    ));
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_a_staged_delete() {
    let gateway = gateway();
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));
    let updates = stager.subscribe();

    stager.stage("t1").expect("stage");
    drop(stager);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(gateway.deletes().is_empty());
    assert!(updates.has_changed().is_err());
}

#[tokio::test(start_paused = true)]
async fn teardown_after_the_window_lets_the_request_finish() {
    let gateway = gateway();
    gateway.delay_deletes(Duration::from_millis(500));
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));

    stager.stage("t1").expect("stage");
    tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;
    drop(stager);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(gateway.deletes(), vec!["t1"]);
    assert!(gateway.stored().iter().all(|t| t.id != "t1"));
}

#[tokio::test(start_paused = true)]
async fn staging_requires_a_session() {
    let gateway = gateway();
    let mut stager = DeletionStager::new(Arc::clone(&gateway), None);

    assert!(matches!(
        stager.stage("t1"),
        Err(GatewayError::Unauthenticated)
    ));
    assert!(stager.current().is_idle());
}

#[tokio::test(start_paused = true)]
async fn closing_after_the_window_waits_for_the_request() {
    let gateway = gateway();
    gateway.delay_deletes(Duration::from_millis(500));
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));

    stager.stage("t1").expect("stage");
    tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;

    let closed = stager.close().await;
    assert!(closed.is_committed());
    assert_eq!(gateway.deletes(), vec!["t1"]);
    assert!(gateway.stored().iter().all(|t| t.id != "t1"));
}

#[test]
fn closing_then_shutting_down_the_runtime_keeps_the_delete() {
    let gateway = gateway();
    gateway.delay_deletes(Duration::from_millis(500));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("runtime");
    let closed = runtime.block_on({
        let gateway = Arc::clone(&gateway);
        async move {
            let mut stager = DeletionStager::new(gateway, Some(TOKEN));
            stager.stage("t1").expect("stage");
            tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;
            stager.close().await
        }
    });
    drop(runtime);

    assert!(closed.is_committed());
    assert!(gateway.stored().iter().all(|t| t.id != "t1"));
}

#[tokio::test(start_paused = true)]
async fn closing_inside_the_window_cancels() {
    let gateway = gateway();
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));

    stager.stage("t1").expect("stage");
    tokio::time::sleep(Duration::from_millis(100)).await;
    let closed = stager.close().await;
    assert!(closed.is_idle());
    assert_eq!(closed.error(), None);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(gateway.deletes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn closing_reports_a_failed_request() {
    let gateway = gateway();
    gateway.fail_delete_of("t1");
    gateway.delay_deletes(Duration::from_millis(500));
    let mut stager = DeletionStager::new(Arc::clone(&gateway), Some(TOKEN));

    stager.stage("t1").expect("stage");
    tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;

    let closed = stager.close().await;
    assert!(closed.is_idle());
    assert_eq!(closed.error(), Some(DELETE_TASK_FAILED));
}
