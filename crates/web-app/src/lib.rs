#![warn(clippy::pedantic)]

use std::sync::{Arc, Mutex};

use lift_domain::Service;
use lift_storage::{KeyValueStore, local_storage::LocalStorage};

pub mod log;
pub mod settings;

pub type AppService = Service<KeyValueStore<LocalStorage>>;

/// Sets up logging and returns the service backed by the browser's local storage.
///
/// # Errors
///
/// Returns an error if a logger has already been installed.
pub fn init() -> Result<AppService, ::log::SetLoggerError> {
    self::log::init(Arc::new(Mutex::new(KeyValueStore::new(LocalStorage))))?;
    Ok(Service::new(KeyValueStore::new(LocalStorage)))
}
