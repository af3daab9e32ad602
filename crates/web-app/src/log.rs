use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use lift_storage::{Backend, Key, KeyValueStore};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

pub const MAX_ENTRIES: usize = 100;

static LOG: Mutex<Option<Arc<Mutex<dyn Repository + Send>>>> = Mutex::new(None);

pub trait Repository {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Adds `entry` as newest entry and drops the oldest entries beyond the limit.
pub fn append_entry(entries: &mut VecDeque<Entry>, entry: Entry) {
    entries.push_front(entry);
    entries.truncate(MAX_ENTRIES);
}

impl<B: Backend> Repository for KeyValueStore<B> {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
        match self.load(Key::Log) {
            Ok(Some(value)) => {
                serde_json::from_value(value).map_err(|err| Error::Unknown(err.to_string()))
            }
            Ok(None) => Ok(VecDeque::new()),
            Err(err) => Err(Error::Unknown(err.to_string())),
        }
    }

    fn write_entry(&self, entry: Entry) -> Result<(), Error> {
        let mut entries = self.read_entries().unwrap_or_default();
        append_entry(&mut entries, entry);
        self.store(Key::Log, &entries)
            .map_err(|err| Error::Unknown(err.to_string()))
    }
}

static LOGGER: Logger = Logger;

/// Forwards all log records to the browser console and to `repository`.
///
/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(repository: Arc<Mutex<dyn Repository + Send>>) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        match record.level() {
            Level::Error => gloo_console::error!(message.clone()),
            Level::Warn => gloo_console::warn!(message.clone()),
            Level::Info => gloo_console::info!(message.clone()),
            Level::Debug | Level::Trace => gloo_console::debug!(message.clone()),
        }

        if let Ok(log) = LOG.lock() {
            if let Some(repository) = log.as_ref() {
                if let Ok(repository) = repository.lock() {
                    let _ = repository.write_entry(Entry {
                        time: Utc::now().format("%b %d %H:%M:%S").to_string(),
                        level: record.level(),
                        message,
                    });
                }
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use lift_storage::memory::MemoryStorage;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn entry(message: &str) -> Entry {
        Entry {
            time: "Mar 04 18:00:00".to_string(),
            level: Level::Warn,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_append_entry() {
        let mut entries = VecDeque::new();

        for i in 0..=MAX_ENTRIES {
            append_entry(&mut entries, entry(&i.to_string()));
        }

        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries.front(), Some(&entry(&MAX_ENTRIES.to_string())));
        assert_eq!(entries.back(), Some(&entry("1")));
    }

    #[test]
    fn test_entry_serialization() {
        assert_eq!(
            json!(entry("failed to read workouts")),
            json!({
                "time": "Mar 04 18:00:00",
                "level": "Warn",
                "message": "failed to read workouts",
            })
        );
    }

    #[test]
    fn test_repository() {
        let store = KeyValueStore::new(MemoryStorage::new());

        assert_eq!(store.read_entries(), Ok(VecDeque::new()));

        store.write_entry(entry("a")).unwrap();
        store.write_entry(entry("b")).unwrap();

        assert_eq!(
            store.read_entries(),
            Ok(VecDeque::from([entry("b"), entry("a")]))
        );
    }

    #[test]
    fn test_repository_malformed_log_is_replaced() {
        let store = KeyValueStore::new(MemoryStorage::new().with_item("log", "{\"x\":"));

        assert!(store.read_entries().is_err());

        store.write_entry(entry("a")).unwrap();

        assert_eq!(store.read_entries(), Ok(VecDeque::from([entry("a")])));
    }

    #[test]
    fn test_repository_write_failure() {
        let store = KeyValueStore::new(MemoryStorage::new());
        store.backend().set_read_only(true);

        assert!(matches!(
            store.write_entry(entry("a")),
            Err(Error::Unknown(_))
        ));
    }
}
