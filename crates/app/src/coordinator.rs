use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use snus_core::{
    ClusterSummary, Coordinates, DEFAULT_MARKER_JITTER, Entry, MapMarker, Settings, TimeWindow,
    WindowBounds, WindowStats, filter_window, markers_for, window_stats,
};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::location::{DEFAULT_LOCATION_TIMEOUT, LocationProvider, fetch_location};
use crate::services::{AppServices, EntryQuery, EventStore, SettingsService, run_blocking};

/// Everything the presentation layer renders from.
#[derive(Debug, Clone)]
pub struct AppSnapshot {
    pub today_entries: Arc<Vec<Entry>>,
    pub today_count: usize,
    pub all_entries: Arc<Vec<Entry>>,
    pub settings: Settings,
    pub selected_window: TimeWindow,
    pub stats: WindowStats,
    pub current_location: Option<Coordinates>,
    pub last_error: Option<String>,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            today_entries: Arc::default(),
            today_count: 0,
            all_entries: Arc::default(),
            selected_window: settings.display_window,
            stats: WindowStats::empty(settings.display_window),
            settings,
            current_location: None,
            last_error: None,
        }
    }
}

impl AppSnapshot {
    fn set_today(&mut self, rows: Arc<Vec<Entry>>) {
        self.today_count = rows.len();
        self.today_entries = rows;
    }

    fn recompute(&mut self) {
        let bounds = WindowBounds::resolve(self.selected_window, &Local::now());
        let in_window = filter_window(&self.all_entries, &bounds);
        match window_stats(self.selected_window, &in_window, &self.settings) {
            Ok(stats) => self.stats = stats,
            Err(err) => {
                warn!(error = %err, "cannot compute window stats");
                self.stats = WindowStats::empty(self.selected_window);
                self.last_error = Some(err.to_string());
            }
        }
    }
}

/// In-flight location lookup. Discarding it drops the result.
pub struct LocationRequest {
    handle: JoinHandle<Coordinates>,
}

impl LocationRequest {
    pub async fn wait(self) -> Option<Coordinates> {
        self.handle.await.ok()
    }

    pub fn discard(self) {
        self.handle.abort();
    }
}

/// Single owner of the app state. Intents go through here; the stores are
/// never touched by the presentation layer directly.
#[derive(Clone)]
pub struct Coordinator {
    entries: EventStore,
    settings: SettingsService,
    location: Arc<dyn LocationProvider>,
    state: Arc<watch::Sender<AppSnapshot>>,
    settings_gate: Arc<Mutex<()>>,
    location_timeout: Duration,
    marker_jitter: f64,
}

impl Coordinator {
    pub fn new(services: &AppServices, location: Arc<dyn LocationProvider>) -> Self {
        let (state, _) = watch::channel(AppSnapshot::default());
        Self {
            entries: services.entries.clone(),
            settings: services.settings.clone(),
            location,
            state: Arc::new(state),
            settings_gate: Arc::new(Mutex::new(())),
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
            marker_jitter: DEFAULT_MARKER_JITTER,
        }
    }

    pub fn with_location_timeout(mut self, timeout: Duration) -> Self {
        self.location_timeout = timeout;
        self
    }

    pub fn with_marker_jitter(mut self, jitter: f64) -> Self {
        self.marker_jitter = jitter;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.state.borrow().clone()
    }

    /// Loads settings, attaches to the live entry queries and keeps the
    /// snapshot in step with them until the returned task is aborted.
    pub async fn start(&self) -> Result<JoinHandle<()>> {
        let gate = self.settings_gate.lock().await;
        let settings_service = self.settings.clone();
        let settings = run_blocking(move || settings_service.get()).await?;
        let mut all = self.entries.subscribe(EntryQuery::All).await?;
        let mut today = self.entries.subscribe(EntryQuery::Today).await?;

        self.state.send_modify(|snapshot| {
            snapshot.selected_window = settings.display_window;
            snapshot.settings = settings;
            snapshot.all_entries = all.current();
            snapshot.set_today(today.current());
            snapshot.recompute();
        });
        drop(gate);
        info!("coordinator started");

        let state = self.state.clone();
        Ok(tokio::spawn(async move {
            loop {
                tokio::select! {
                    rows = all.changed() => match rows {
                        Some(rows) => state.send_modify(|snapshot| {
                            snapshot.all_entries = rows;
                            snapshot.recompute();
                        }),
                        None => break,
                    },
                    rows = today.changed() => match rows {
                        Some(rows) => state.send_modify(|snapshot| snapshot.set_today(rows)),
                        None => break,
                    },
                }
            }
            debug!("coordinator listener stopped");
        }))
    }

    fn record<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.state.send_if_modified(|snapshot| snapshot.last_error.take().is_some()),
            Err(err) => {
                warn!(error = %err, "intent failed");
                let message = err.to_string();
                self.state
                    .send_modify(|snapshot| snapshot.last_error = Some(message));
                false
            }
        };
        result
    }

    /// Logs one entry stamped now. Inserts exactly once: with the resolved
    /// position when available, otherwise with sentinel coordinates.
    pub async fn log_entry(&self) -> Result<i64> {
        let provisional = Entry::now();
        let entry = if self.location.has_authorization() {
            match fetch_location(self.location.as_ref(), self.location_timeout).await {
                Ok(coordinates) => provisional.with_location(coordinates),
                Err(err) => {
                    warn!(error = %err, "logging entry without location");
                    provisional
                }
            }
        } else {
            info!("location not authorized; requesting permission");
            self.location.request_authorization();
            provisional
        };
        let result = self.entries.insert(entry).await;
        if let Ok(id) = &result {
            info!(id, timestamp = entry.timestamp, "entry logged");
        }
        self.record(result)
    }

    pub async fn delete_entry(&self, id: i64) -> Result<bool> {
        let result = self.entries.delete(id).await;
        if let Ok(removed) = &result {
            info!(id, removed, "entry delete requested");
        }
        self.record(result)
    }

    /// Removes the most recent entry of today, if any.
    pub async fn undo_latest_today(&self) -> Result<Option<i64>> {
        let latest = self.record(self.entries.latest(EntryQuery::Today).await)?;
        let Some(entry) = latest else {
            return Ok(None);
        };
        self.delete_entry(entry.id).await?;
        Ok(Some(entry.id))
    }

    pub fn select_window(&self, window: TimeWindow) {
        self.state.send_modify(|snapshot| {
            snapshot.selected_window = window;
            snapshot.recompute();
        });
    }

    /// Writes, reads back and publishes under one gate so the snapshot always
    /// ends on the value the store holds.
    async fn update_settings<F>(&self, write: F) -> Result<Settings>
    where
        F: FnOnce(&SettingsService) -> Result<()> + Send + 'static,
    {
        let _gate = self.settings_gate.lock().await;
        let service = self.settings.clone();
        let result = run_blocking(move || {
            write(&service)?;
            service.get()
        })
        .await;
        let settings = self.record(result)?;
        let applied = settings.clone();
        self.state.send_modify(|snapshot| {
            snapshot.settings = applied;
            snapshot.recompute();
        });
        Ok(settings)
    }

    pub async fn set_cost_per_package(&self, cost: f64) -> Result<Settings> {
        self.update_settings(move |service| service.set_cost_per_package(cost))
            .await
    }

    pub async fn set_units_per_package(&self, units: f64) -> Result<Settings> {
        self.update_settings(move |service| service.set_units_per_package(units))
            .await
    }

    pub async fn set_display_window(&self, window: TimeWindow) -> Result<Settings> {
        self.update_settings(move |service| service.set_display_window(window))
            .await
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<Settings> {
        self.update_settings(move |service| service.set_dark_mode(enabled))
            .await
    }

    /// Refreshes `current_location`. Failures publish sentinel coordinates.
    pub async fn refresh_location(&self) -> Coordinates {
        let coordinates = match fetch_location(self.location.as_ref(), self.location_timeout).await
        {
            Ok(coordinates) => coordinates,
            Err(err) => {
                warn!(error = %err, "current location unavailable");
                Coordinates::SENTINEL
            }
        };
        self.state
            .send_modify(|snapshot| snapshot.current_location = Some(coordinates));
        coordinates
    }

    pub fn spawn_location_refresh(&self) -> LocationRequest {
        let coordinator = self.clone();
        LocationRequest {
            handle: tokio::spawn(async move { coordinator.refresh_location().await }),
        }
    }

    pub fn markers(&self) -> Vec<MapMarker> {
        let entries = self.state.borrow().all_entries.clone();
        markers_for(&entries, self.marker_jitter)
    }

    pub fn cluster_summary(&self) -> Option<ClusterSummary> {
        ClusterSummary::from_markers(&self.markers())
    }
}
