//! StorageBackend port - 1 つの永続化方式（strategy）

use crate::domain::{StorageError, StorageMethod};

/// One persistence mechanism behind the facade.
///
/// Values are already-serialized text; the facade owns JSON encoding.
/// The trait is synchronous because every browser mechanism it wraps is.
pub trait StorageBackend {
    fn method(&self) -> StorageMethod;

    /// Capability check run once by the selector.
    fn probe(&self) -> Result<(), StorageError>;

    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn method(&self) -> StorageMethod {
        (**self).method()
    }

    fn probe(&self) -> Result<(), StorageError> {
        (**self).probe()
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
