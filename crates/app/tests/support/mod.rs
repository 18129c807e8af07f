#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use snus_app::{AppConfig, AppSnapshot, AppState, LocationError, LocationProvider};
use snus_core::Coordinates;
use tempfile::TempDir;
use tokio::sync::watch;

pub struct TestApp {
    pub _dir: TempDir,
    pub state: AppState,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = AppConfig::new(dir.path().join("app.sqlite"));
    config.location_timeout = Duration::from_millis(200);
    config.marker_jitter = 0.0;
    let state = AppState::new(config);
    state.initialize().expect("initialize");
    TestApp { _dir: dir, state }
}

/// Location provider with scripted answers that counts how it is used.
pub struct ScriptedLocation {
    authorized: AtomicBool,
    answer: Result<Coordinates, LocationError>,
    delay: Option<Duration>,
    pub authorization_requests: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl ScriptedLocation {
    pub fn new(authorized: bool, answer: Result<Coordinates, LocationError>) -> Arc<Self> {
        Arc::new(Self {
            authorized: AtomicBool::new(authorized),
            answer,
            delay: None,
            authorization_requests: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn slow(answer: Coordinates, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            authorized: AtomicBool::new(true),
            answer: Ok(answer),
            delay: Some(delay),
            authorization_requests: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn requests(&self) -> usize {
        self.authorization_requests.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    fn has_authorization(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    fn request_authorization(&self) {
        self.authorization_requests.fetch_add(1, Ordering::SeqCst);
    }

    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer.clone()
    }
}

pub async fn wait_for<F>(rx: &mut watch::Receiver<AppSnapshot>, predicate: F) -> AppSnapshot
where
    F: FnMut(&AppSnapshot) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("snapshot did not converge")
        .expect("coordinator state dropped")
        .clone()
}
