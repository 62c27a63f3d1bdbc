//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use api_mocker::{MockServer, MockServerConfig, Shutdown};
use tempfile::TempDir;

/// A scratch mock directory, removed on drop.
pub struct MockDir {
    dir: TempDir,
}

impl MockDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::Builder::new().prefix("api-mocker-it-").tempdir().unwrap(),
        }
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = Self::new();
        for (rel, content) in files {
            dir.write(rel, content);
        }
        dir
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let file = self.path().join(rel);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, content).unwrap();
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path().join(rel)).unwrap();
    }

    pub fn rename(&self, from: &str, to: &str) {
        fs::rename(self.path().join(from), self.path().join(to)).unwrap();
    }

    /// Config serving this directory on an ephemeral port.
    pub fn config(&self) -> MockServerConfig {
        MockServerConfig {
            mock_dir: self.path().to_path_buf(),
            port: 0,
            ..MockServerConfig::default()
        }
    }
}

/// A server running in the background until dropped.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub server: tokio::task::JoinHandle<()>,
    shutdown: Shutdown,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Bind `config` and serve it in the background.
pub async fn start_server(config: MockServerConfig) -> RunningServer {
    let server = MockServer::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            server.run(shutdown).await.unwrap();
        })
    };

    RunningServer {
        addr,
        server: handle,
        shutdown,
    }
}

/// Poll `check` until it returns true or `timeout` elapses.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}
