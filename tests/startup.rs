//! Startup sequencing against external dependencies.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use gateway::health::{Dependency, TcpProbe};
use gateway::lifecycle::{Application, StartupError};
use gateway::routes;
use serde_json::Value;
use tokio::net::TcpListener;

mod common;

async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

#[tokio::test]
async fn unreachable_database_fails_startup() {
    let mut config = common::test_config();
    config.dependencies.database_url = Some(format!("mongodb://{}/app", closed_address().await));
    config.timeouts.startup_timeout_secs = 1;

    let started = Instant::now();
    let result = Application::build(config, routes::default_table()).await;

    assert!(matches!(result, Err(StartupError::Dependency(_))));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn invalid_dependency_url_fails_before_probing() {
    let mut config = common::test_config();
    config.dependencies.queue_url = Some("custom://queue".to_string());

    let result = Application::build(config, routes::default_table()).await;
    assert!(matches!(result, Err(StartupError::Dependency(_))));
}

#[tokio::test]
async fn reachable_dependencies_allow_startup() {
    let database = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let queue = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let mut config = common::test_config();
    config.dependencies.database_url =
        Some(format!("mongodb://{}/app", database.local_addr().unwrap()));
    config.dependencies.queue_url = Some(format!("amqp://{}", queue.local_addr().unwrap()));

    let dependencies = gateway::lifecycle::context::configured_dependencies(&config).unwrap();
    let app = common::spawn_app_with(config, dependencies, routes::default_table()).await;

    let response = app.client.get(app.url("/readyz")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["dependencies"][0]["name"], "database");
    assert_eq!(body["dependencies"][1]["name"], "queue");
}

#[tokio::test]
async fn readiness_reports_lost_dependency() {
    let database = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let probe = TcpProbe::from_url(
        "database",
        &format!("mongodb://{}/app", database.local_addr().unwrap()),
        Duration::from_millis(500),
    )
    .unwrap();
    let dependencies: Vec<Arc<dyn Dependency>> = vec![Arc::new(probe)];

    let app = common::spawn_app_with(common::test_config(), dependencies, routes::default_table()).await;
    drop(database);

    let response = app.client.get(app.url("/readyz")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ready"], false);
    assert!(body["dependencies"][0]["error"].is_string());

    // Liveness does not depend on anything external.
    let response = app.client.get(app.url("/healthz")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}


#[tokio::test]
async fn unusable_metrics_address_fails_startup() {
    let mut config = common::test_config();
    config.observability.metrics_enabled = true;
    config.observability.metrics_address = "not-an-address".to_string();

    let result = Application::build(config, routes::default_table()).await;
    assert!(matches!(result, Err(StartupError::Metrics { .. })));
}
