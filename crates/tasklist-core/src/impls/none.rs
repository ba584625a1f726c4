//! NoBackend - 何も使えない環境

use crate::domain::{StorageError, StorageMethod};
use crate::ports::StorageBackend;

/// The `none` method: reads are always absent and writes always fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackend;

impl StorageBackend for NoBackend {
    fn method(&self) -> StorageMethod {
        StorageMethod::None
    }

    fn probe(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::WriteFailed {
            method: StorageMethod::None,
            key: key.to_string(),
            reason: "no storage backend is available".to_string(),
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.write(key, "")
    }
}
