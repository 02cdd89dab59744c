//! SDK against a live server bound to an ephemeral port

mod common;

use common::{base_url, TestApp};
use serde_json::json;
use std::time::Duration;
use taskgate_core::domain::{NewTask, TaskStatus};
use taskgate_core::port::QueueHandle;
use taskgate_sdk::{SdkError, TaskReport, TaskgateClient, DEFAULT_POLL_INTERVAL};

#[tokio::test]
async fn test_configuration_roundtrip() {
    let app = TestApp::in_memory().await;
    app.queue("emails").await;
    app.config_store
        .set_config(
            "emails",
            json!({"interval": 2500, "region": "eu"})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await
        .unwrap();
    let handle = app.start().await;
    let client = TaskgateClient::connect(base_url(&handle)).await.unwrap();

    let config = client.configuration("emails").await.unwrap();

    assert_eq!(config.poll_interval(), Duration::from_millis(2500));
    assert_eq!(config.get("region"), Some(&json!("eu")));

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_configuration_with_fractional_interval() {
    let app = TestApp::in_memory().await;
    app.queue("emails").await;
    app.config_store
        .set_config(
            "emails",
            json!({"interval": 1500.5}).as_object().cloned().unwrap(),
        )
        .await
        .unwrap();
    let handle = app.start().await;
    let client = TaskgateClient::connect(base_url(&handle)).await.unwrap();

    let config = client.configuration("emails").await.unwrap();

    assert_eq!(config.interval, json!(1500.5));
    assert_eq!(config.interval_ms(), None);
    assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_worker_loop() {
    let app = TestApp::in_memory().await;
    let queue = app.queue("default").await;
    let tasks = queue
        .insert(vec![NewTask::new(json!({"n": 1})), NewTask::new(json!({"n": 2}))])
        .await
        .unwrap();
    let handle = app.start().await;
    let client = TaskgateClient::connect(base_url(&handle)).await.unwrap();

    let first = client.poll("default", &[]).await.unwrap().unwrap();
    assert_eq!(first.id, tasks[0].id);
    assert_eq!(first.data, json!({"n": 1}));

    let second = client
        .poll("default", &[TaskReport::done(&first.id)])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.id, tasks[1].id);

    let none = client
        .poll("default", &[TaskReport::failed(&second.id, "bad input")])
        .await
        .unwrap();
    assert!(none.is_none());

    assert_eq!(
        queue.find(&first.id).await.unwrap().unwrap().status,
        TaskStatus::Done
    );
    let failed = queue.find(&second.id).await.unwrap().unwrap();
    assert_eq!(failed.status, TaskStatus::Failed);
    assert_eq!(failed.error.as_deref(), Some("bad input"));

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_error_mapping() {
    let app = TestApp::in_memory().await;
    app.queue("default").await;
    let handle = app.start().await;
    let client = TaskgateClient::connect(base_url(&handle)).await.unwrap();

    assert!(matches!(
        client.configuration("missing").await,
        Err(SdkError::QueueNotFound(name)) if name == "missing"
    ));
    assert!(matches!(
        client.poll("missing", &[]).await,
        Err(SdkError::QueueNotFound(_))
    ));

    match client.poll("default", &[TaskReport::done("123")]).await {
        Err(SdkError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("123"));
        }
        other => panic!("expected server error, got {:?}", other),
    }

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_stopped_server_is_transport_error() {
    let app = TestApp::in_memory().await;
    app.queue("default").await;
    let handle = app.start().await;
    let url = base_url(&handle);
    handle.stop().await.unwrap();

    let client = TaskgateClient::connect(url).await.unwrap();

    assert!(matches!(
        client.configuration("default").await,
        Err(SdkError::Transport(_))
    ));
}

#[tokio::test]
async fn test_claimed_task_is_reserved_for_caller() {
    let app = TestApp::in_memory().await;
    let queue = app.queue("default").await;
    queue.insert(vec![NewTask::new(json!(1))]).await.unwrap();
    let handle = app.start().await;
    let alice = TaskgateClient::connect(base_url(&handle)).await.unwrap();
    let bob = TaskgateClient::connect(base_url(&handle)).await.unwrap();

    assert!(alice.poll("default", &[]).await.unwrap().is_some());
    assert!(bob.poll("default", &[]).await.unwrap().is_none());
    assert!(queue.next().await.unwrap().is_none());

    handle.stop().await.unwrap();
}
