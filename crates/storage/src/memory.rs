use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use lift_domain::StorageError;

use crate::Backend;

/// In-memory backend for tests and hosts without browser storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
    read_only: Cell<bool>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Lets all subsequent writes fail as if the storage quota was exceeded.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Backend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.item(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only.get() {
            return Err(StorageError::QuotaExceeded);
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.read_only.get() {
            return Err(StorageError::QuotaExceeded);
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
