//! StorageFacade - 呼び出し側から見える唯一の key/value ストア

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::StorageMethod;
use crate::ports::StorageBackend;

/// Uniform get/set over the backend chosen at startup.
///
/// Nothing here returns an error to the caller. Every failure degrades:
/// - Web Storage write throws: the value goes to a cookie instead.
/// - Web Storage read throws: the cookie of the same key is read instead.
/// - Stored text is not valid JSON for `T`: treated as absent.
///
/// Reads only go to the cookie when the Web Storage read itself throws.
/// After a write has fallen back to a cookie, a Web Storage area that still
/// reads fine keeps returning its older value for the rest of the session.
pub struct StorageFacade {
    backend: Box<dyn StorageBackend>,
    cookie_fallback: Option<Box<dyn StorageBackend>>,
}

impl StorageFacade {
    pub fn new(
        backend: Box<dyn StorageBackend>,
        cookie_fallback: Option<Box<dyn StorageBackend>>,
    ) -> Self {
        Self {
            backend,
            cookie_fallback,
        }
    }

    /// Facade over a single backend with no fallback, without probing.
    pub fn fixed(backend: impl StorageBackend + 'static) -> Self {
        Self::new(Box::new(backend), None)
    }

    /// The method chosen at startup. Never changes afterwards.
    pub fn method(&self) -> StorageMethod {
        self.backend.method()
    }

    fn fallback(&self) -> Option<&dyn StorageBackend> {
        if self.method().is_web_storage() {
            self.cookie_fallback.as_deref()
        } else {
            None
        }
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        match self.backend.read(key) {
            Ok(value) => value,
            Err(err) => {
                let Some(fallback) = self.fallback() else {
                    warn!(%err, "storage read failed");
                    return None;
                };
                warn!(%err, "storage read failed; reading cookie instead");
                fallback.read(key).unwrap_or_else(|err| {
                    warn!(%err, "cookie fallback read failed");
                    None
                })
            }
        }
    }

    pub fn set_raw(&self, key: &str, value: &str) -> bool {
        match self.backend.write(key, value) {
            Ok(()) => true,
            Err(err) => {
                let Some(fallback) = self.fallback() else {
                    if self.method() == StorageMethod::None {
                        debug!(key, "no storage backend; value dropped");
                    } else {
                        warn!(%err, "storage write failed");
                    }
                    return false;
                };
                warn!(%err, "storage write failed; writing cookie instead");
                match fallback.write(key, value) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(%err, "cookie fallback write failed");
                        false
                    }
                }
            }
        }
    }

    /// Read and decode a JSON value. Absent and malformed both give `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "stored value is not valid json; treating as absent");
                None
            }
        }
    }

    /// Encode as JSON and write. `false` only when nothing could store it.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, &raw),
            Err(err) => {
                warn!(key, %err, "value could not be encoded");
                false
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove(key) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "storage remove failed");
                false
            }
        }
    }
}
