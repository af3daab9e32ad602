#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("malformed data: {0}")]
    Malformed(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ReadError {
    /// Level at which a failed read is logged.
    #[must_use]
    pub fn level(&self) -> log::Level {
        match self {
            ReadError::Malformed(_) => log::Level::Warn,
            ReadError::Storage(err) => err.level(),
        }
    }
}

impl WriteError {
    #[must_use]
    pub fn level(&self) -> log::Level {
        match self {
            WriteError::Serialization(_) => log::Level::Error,
            WriteError::Storage(err) => err.level(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl StorageError {
    #[must_use]
    pub fn level(&self) -> log::Level {
        match self {
            StorageError::Unavailable => log::Level::Debug,
            StorageError::QuotaExceeded | StorageError::Other(_) => log::Level::Error,
        }
    }
}
