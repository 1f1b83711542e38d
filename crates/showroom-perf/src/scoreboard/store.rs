use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, warn};

use super::domain::SalespersonRecord;
use super::repository::{RepositoryError, RosterRepository};

/// One pretty-printed JSON file per tenant slot under the data directory.
pub struct JsonSlotStore {
    data_dir: PathBuf,
}

impl JsonSlotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.data_dir.join(format!("perf_vendedores_{slot}.json"))
    }
}

impl RosterRepository for JsonSlotStore {
    fn load(&self, slot: &str) -> Result<Option<Vec<SalespersonRecord>>, RepositoryError> {
        let raw = match fs::read_to_string(self.slot_path(slot)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let records = serde_json::from_str(&raw)?;
        Ok(Some(records))
    }

    fn save(&self, slot: &str, records: &[SalespersonRecord]) -> Result<(), RepositoryError> {
        fs::create_dir_all(&self.data_dir)?;
        let payload = serde_json::to_string_pretty(records)?;
        fs::write(self.slot_path(slot), payload)?;
        Ok(())
    }
}

/// In-memory repository for tests; counts saves so debounce coalescing can
/// be asserted.
#[derive(Default)]
pub struct InMemoryRoster {
    slots: Mutex<HashMap<String, Vec<SalespersonRecord>>>,
    saves: AtomicUsize,
}

impl InMemoryRoster {
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl RosterRepository for InMemoryRoster {
    fn load(&self, slot: &str) -> Result<Option<Vec<SalespersonRecord>>, RepositoryError> {
        let guard = self.slots.lock().expect("slot mutex poisoned");
        Ok(guard.get(slot).cloned())
    }

    fn save(&self, slot: &str, records: &[SalespersonRecord]) -> Result<(), RepositoryError> {
        let mut guard = self.slots.lock().expect("slot mutex poisoned");
        guard.insert(slot.to_string(), records.to_vec());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Trailing-debounce persistence writer.
///
/// Every scheduled snapshot cancels and replaces the pending one; the write
/// happens once the delay elapses with no newer snapshot. Dropping the writer
/// flushes whatever is still pending. Write failures are logged and swallowed
/// because the persisted slot is a best-effort mirror of the in-memory
/// roster, not the source of truth.
pub struct DebouncedWriter {
    tx: Option<Sender<Vec<SalespersonRecord>>>,
    worker: Option<JoinHandle<()>>,
}

impl DebouncedWriter {
    pub fn spawn<R>(repository: Arc<R>, slot: String, delay: Duration) -> Self
    where
        R: RosterRepository + 'static,
    {
        let (tx, rx) = mpsc::channel::<Vec<SalespersonRecord>>();
        let worker = std::thread::spawn(move || {
            let mut pending: Option<Vec<SalespersonRecord>> = None;
            loop {
                match pending.take() {
                    None => match rx.recv() {
                        Ok(snapshot) => pending = Some(snapshot),
                        Err(_) => return,
                    },
                    Some(snapshot) => match rx.recv_timeout(delay) {
                        Ok(newer) => pending = Some(newer),
                        Err(RecvTimeoutError::Timeout) => {
                            write_snapshot(repository.as_ref(), &slot, &snapshot);
                        }
                        Err(RecvTimeoutError::Disconnected) => {
                            write_snapshot(repository.as_ref(), &slot, &snapshot);
                            return;
                        }
                    },
                }
            }
        });

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queues a snapshot, restarting the pending write timer.
    pub fn schedule(&self, snapshot: Vec<SalespersonRecord>) {
        if let Some(tx) = &self.tx {
            // send only fails when the worker is gone; nothing to do then
            let _ = tx.send(snapshot);
        }
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn write_snapshot<R: RosterRepository + ?Sized>(
    repository: &R,
    slot: &str,
    snapshot: &[SalespersonRecord],
) {
    match repository.save(slot, snapshot) {
        Ok(()) => debug!(slot, records = snapshot.len(), "roster slot written"),
        Err(err) => warn!(slot, error = %err, "deferred roster write failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_schedules_coalesce_into_one_write() {
        let repository = Arc::new(InMemoryRoster::default());
        let writer = DebouncedWriter::spawn(
            repository.clone(),
            "default".to_string(),
            Duration::from_millis(200),
        );

        for _ in 0..5 {
            writer.schedule(vec![SalespersonRecord::new("Loja Padrão")]);
        }
        drop(writer); // flushes the single pending snapshot

        assert_eq!(repository.save_count(), 1);
        let stored = repository
            .load("default")
            .expect("load succeeds")
            .expect("slot written");
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn drop_without_pending_snapshot_writes_nothing() {
        let repository = Arc::new(InMemoryRoster::default());
        let writer = DebouncedWriter::spawn(
            repository.clone(),
            "default".to_string(),
            Duration::from_millis(10),
        );
        drop(writer);
        assert_eq!(repository.save_count(), 0);
    }

    #[test]
    fn slot_paths_are_tenant_keyed() {
        let store = JsonSlotStore::new("/tmp/perf");
        assert_eq!(
            store.slot_path("toyota-nacoes"),
            PathBuf::from("/tmp/perf/perf_vendedores_toyota-nacoes.json")
        );
    }
}
