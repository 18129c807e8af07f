use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use snus_core::{Entry, TimeWindow, WindowBounds};
use snus_db::Db;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::Result;
use crate::services::{SharedConfig, open_db, run_blocking};

/// A query over the entry table. Calendar windows are resolved against the
/// local clock each time the query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryQuery {
    All,
    Today,
    Window(TimeWindow),
    Range { start: i64, end: i64 },
}

impl EntryQuery {
    pub fn bounds(&self) -> WindowBounds {
        match self {
            EntryQuery::All => WindowBounds::UNBOUNDED,
            EntryQuery::Today => WindowBounds::resolve(TimeWindow::Daily, &Local::now()),
            EntryQuery::Window(window) => WindowBounds::resolve(*window, &Local::now()),
            EntryQuery::Range { start, end } => WindowBounds::between(*start, *end),
        }
    }
}

type Rows = Arc<Vec<Entry>>;

struct Subscriber {
    query: EntryQuery,
    tx: watch::Sender<Rows>,
}

/// Live view of one query. Holds the latest result set and is refreshed after
/// every insert or delete. Dropping it unsubscribes.
pub struct Subscription {
    query: EntryQuery,
    rx: watch::Receiver<Rows>,
}

impl Subscription {
    pub fn current(&self) -> Rows {
        self.rx.borrow().clone()
    }

    /// Waits for the next result set. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Rows> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn cancel(self) {}
}

/// Entry table access for async callers.
///
/// Writes are serialized in the order they are submitted. Each successful
/// write refreshes every live subscription before the call returns.
#[derive(Clone)]
pub struct EventStore {
    config: SharedConfig,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    write_gate: Arc<tokio::sync::Mutex<()>>,
}

impl EventStore {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self {
            config,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            write_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn insert(&self, entry: Entry) -> Result<i64> {
        let _gate = self.write_gate.lock().await;
        let store = self.clone();
        run_blocking(move || {
            let db = store.db()?;
            let id = db.insert_entry(&entry)?;
            store.publish(&db);
            Ok(id)
        })
        .await
    }

    /// Removes the entry with `id`. Returns `false` if it was already gone.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let _gate = self.write_gate.lock().await;
        let store = self.clone();
        run_blocking(move || {
            let db = store.db()?;
            let removed = db.delete_entry(id)?;
            if removed {
                store.publish(&db);
            }
            Ok(removed)
        })
        .await
    }

    pub async fn query(&self, query: EntryQuery) -> Result<Vec<Entry>> {
        let store = self.clone();
        run_blocking(move || Ok(store.db()?.entries_in(&query.bounds())?)).await
    }

    pub async fn latest(&self, query: EntryQuery) -> Result<Option<Entry>> {
        let store = self.clone();
        run_blocking(move || Ok(store.db()?.latest_entry_in(&query.bounds())?)).await
    }

    pub async fn subscribe(&self, query: EntryQuery) -> Result<Subscription> {
        let store = self.clone();
        run_blocking(move || {
            // Holding the list while reading keeps a concurrent publish from
            // slipping between the initial read and registration.
            let mut subscribers = store.lock_subscribers();
            let rows = store.db()?.entries_in(&query.bounds())?;
            let (tx, rx) = watch::channel(Arc::new(rows));
            subscribers.push(Subscriber { query, tx });
            debug!(?query, active = subscribers.len(), "subscription registered");
            Ok(Subscription { query, rx })
        })
        .await
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|subscriber| !subscriber.tx.is_closed());
        subscribers.len()
    }

    fn publish(&self, db: &Db) {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|subscriber| !subscriber.tx.is_closed());
        for subscriber in subscribers.iter() {
            match db.entries_in(&subscriber.query.bounds()) {
                Ok(rows) => {
                    subscriber.tx.send_replace(Arc::new(rows));
                }
                Err(err) => {
                    warn!(query = ?subscriber.query, error = %err, "failed to refresh subscription");
                }
            }
        }
    }
}
