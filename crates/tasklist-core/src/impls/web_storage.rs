//! KeyValueBackend - localStorage / sessionStorage strategy

use tracing::debug;

use crate::domain::{StorageError, StorageMethod};
use crate::ports::{KeyValueArea, StorageBackend};

/// Strategy over a Web Storage area.
///
/// The probe writes then deletes a throwaway key, which catches disabled
/// storage (private mode, blocked third-party storage) and a full quota.
pub struct KeyValueBackend<A> {
    method: StorageMethod,
    area: A,
    probe_key: String,
}

impl<A: KeyValueArea> KeyValueBackend<A> {
    pub fn local(area: A, probe_key: impl Into<String>) -> Self {
        Self::new(StorageMethod::LocalStorage, area, probe_key)
    }

    pub fn session(area: A, probe_key: impl Into<String>) -> Self {
        Self::new(StorageMethod::SessionStorage, area, probe_key)
    }

    fn new(method: StorageMethod, area: A, probe_key: impl Into<String>) -> Self {
        debug_assert!(method.is_web_storage());
        Self {
            method,
            area,
            probe_key: probe_key.into(),
        }
    }
}

impl<A: KeyValueArea> StorageBackend for KeyValueBackend<A> {
    fn method(&self) -> StorageMethod {
        self.method
    }

    fn probe(&self) -> Result<(), StorageError> {
        let unavailable = |e: crate::ports::AccessError| StorageError::Unavailable {
            method: self.method,
            reason: e.0,
        };
        self.area
            .set_item(&self.probe_key, &self.probe_key)
            .map_err(unavailable)?;
        self.area.remove_item(&self.probe_key).map_err(unavailable)?;
        debug!(method = %self.method, "probe succeeded");
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.area
            .get_item(key)
            .map_err(|e| StorageError::ReadFailed {
                method: self.method,
                key: key.to_string(),
                reason: e.0,
            })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.area
            .set_item(key, value)
            .map_err(|e| StorageError::WriteFailed {
                method: self.method,
                key: key.to_string(),
                reason: e.0,
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.area
            .remove_item(key)
            .map_err(|e| StorageError::WriteFailed {
                method: self.method,
                key: key.to_string(),
                reason: e.0,
            })
    }
}
