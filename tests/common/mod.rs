//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use gateway::config::AppConfig;
use gateway::health::Dependency;
use gateway::lifecycle::{AppContext, Application, Shutdown};
use gateway::routing::RouteTable;

/// A gateway running on an ephemeral port with throwaway asset directories.
pub struct TestApp {
    pub address: SocketAddr,
    pub client: reqwest::Client,
    pub public_dir: PathBuf,
    pub images_dir: PathBuf,
    shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    /// Write `contents` to `relative` under the public directory.
    pub fn public_file(&self, relative: &str, contents: &str) {
        write_file(&self.public_dir, relative, contents);
    }

    /// Write `contents` to `relative` under the images directory.
    pub fn image_file(&self, relative: &str, contents: &str) {
        write_file(&self.images_dir, relative, contents);
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
        let _ = std::fs::remove_dir_all(&self.public_dir);
        let _ = std::fs::remove_dir_all(&self.images_dir);
    }
}

/// Default test configuration: loopback, ephemeral port, fresh asset dirs.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.assets.public_dir = scratch_dir("public");
    config.assets.images_dir = scratch_dir("images");
    config.timeouts.startup_timeout_secs = 1;
    config
}

/// Start the gateway serving `table` and return once it accepts connections.
pub async fn spawn_app(table: RouteTable) -> TestApp {
    spawn_app_with(test_config(), Vec::new(), table).await
}

pub async fn spawn_app_with(
    config: AppConfig,
    dependencies: Vec<Arc<dyn Dependency>>,
    table: RouteTable,
) -> TestApp {
    let public_dir = config.assets.public_dir.clone();
    let images_dir = config.assets.images_dir.clone();

    let app = Application::build_with_context(AppContext::new(config, dependencies), table)
        .await
        .expect("application should start");
    let address = app.local_addr();

    let shutdown = Shutdown::new();
    tokio::spawn(app.run_until_stopped(shutdown.wait()));

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    TestApp {
        address,
        client,
        public_dir,
        images_dir,
        shutdown,
    }
}

fn scratch_dir(kind: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gateway-{kind}-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
