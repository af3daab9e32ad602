#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use lift_domain::StorageError;
use strum::AsRefStr;

mod key_value;
pub mod local_storage;
pub mod memory;
pub mod schema;

pub use key_value::{KeyValueStore, SCHEMA_VERSION};

/// Synchronous string key-value storage such as the browser's local storage.
pub trait Backend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    #[strum(serialize = "wc_exercises_v1")]
    Exercises,
    #[strum(serialize = "workouts")]
    WorkoutSessions,
    #[strum(serialize = "workoutTemplates")]
    Templates,
    #[strum(serialize = "currentCycle")]
    Cycle,
    #[strum(serialize = "settings")]
    Settings,
    #[strum(serialize = "log")]
    Log,
    /// Exercise bank of earlier versions, only read if no exercise bank is stored.
    #[strum(serialize = "exerciseBank")]
    LegacyExercises,
    /// Name-keyed templates of earlier versions, only read if no templates are stored.
    #[strum(serialize = "templates")]
    LegacyTemplates,
}
