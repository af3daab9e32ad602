use std::fmt::Debug;

use lift_domain::StorageError;

use crate::Backend;

/// Browser local storage.
pub struct LocalStorage;

impl Backend for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        storage()?.get_item(key).map_err(storage_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        storage()?.remove_item(key).map_err(storage_error)
    }
}

/// Fails if the window has no local storage or access to it is denied.
fn storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[allow(clippy::needless_pass_by_value)]
fn storage_error(err: impl Debug) -> StorageError {
    let message = format!("{err:?}");
    if message.contains("QuotaExceeded") {
        StorageError::QuotaExceeded
    } else {
        StorageError::Other(message.into())
    }
}
