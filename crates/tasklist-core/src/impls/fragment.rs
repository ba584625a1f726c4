//! UrlFragmentBackend - 最後の手段
//!
//! データはアドレスバーに見え、ナビゲーションで消えます。
//! fragment は 1 つしかないので key は使いません（どの key も同じ枠を共有）。

use tracing::warn;

use crate::domain::{StorageError, StorageMethod};
use crate::ports::{FragmentSlot, StorageBackend};
use crate::storage::codec::{decode_component, encode_component};

pub struct UrlFragmentBackend<F> {
    slot: F,
}

impl<F: FragmentSlot> UrlFragmentBackend<F> {
    pub fn new(slot: F) -> Self {
        Self { slot }
    }
}

impl<F: FragmentSlot> StorageBackend for UrlFragmentBackend<F> {
    fn method(&self) -> StorageMethod {
        StorageMethod::UrlFragment
    }

    fn probe(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let hash = self.slot.hash().map_err(|e| StorageError::ReadFailed {
            method: StorageMethod::UrlFragment,
            key: key.to_string(),
            reason: e.0,
        })?;
        let hash = hash.trim_start_matches('#');
        if hash.is_empty() {
            return Ok(None);
        }
        let decoded = decode_component(hash);
        if decoded.is_none() {
            warn!("url fragment is not valid percent-encoded UTF-8; ignoring");
        }
        Ok(decoded)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slot
            .set_hash(&encode_component(value))
            .map_err(|e| StorageError::WriteFailed {
                method: StorageMethod::UrlFragment,
                key: key.to_string(),
                reason: e.0,
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slot.set_hash("").map_err(|e| StorageError::WriteFailed {
            method: StorageMethod::UrlFragment,
            key: key.to_string(),
            reason: e.0,
        })
    }
}
