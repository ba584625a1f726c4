//! CookieBackend - cookie strategy

use chrono::Duration;
use tracing::warn;

use crate::config::CookieConfig;
use crate::domain::{StorageError, StorageMethod};
use crate::ports::{Clock, CookieJar, StorageBackend};
use crate::storage::codec::{decode_component, find_cookie, format_cookie, format_expired_cookie};

/// Strategy over `document.cookie`.
///
/// Also used by the facade as the one-shot fallback when a Web Storage
/// write or read throws.
pub struct CookieBackend<J, C> {
    jar: J,
    clock: C,
    config: CookieConfig,
}

impl<J: CookieJar, C: Clock> CookieBackend<J, C> {
    pub fn new(jar: J, clock: C, config: CookieConfig) -> Self {
        Self { jar, clock, config }
    }

    fn write_failed(key: &str, reason: String) -> StorageError {
        StorageError::WriteFailed {
            method: StorageMethod::Cookies,
            key: key.to_string(),
            reason,
        }
    }
}

impl<J: CookieJar, C: Clock> StorageBackend for CookieBackend<J, C> {
    fn method(&self) -> StorageMethod {
        StorageMethod::Cookies
    }

    /// No write probe: cookies are selected on `cookieEnabled` alone.
    fn probe(&self) -> Result<(), StorageError> {
        if self.jar.enabled() {
            Ok(())
        } else {
            Err(StorageError::Unavailable {
                method: StorageMethod::Cookies,
                reason: "cookies are disabled".to_string(),
            })
        }
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cookies = self
            .jar
            .cookie_string()
            .map_err(|e| StorageError::ReadFailed {
                method: StorageMethod::Cookies,
                key: key.to_string(),
                reason: e.0,
            })?;
        let Some(raw) = find_cookie(&cookies, key) else {
            return Ok(None);
        };
        let decoded = decode_component(raw);
        if decoded.is_none() {
            warn!(key, "cookie value is not valid percent-encoded UTF-8; ignoring");
        }
        Ok(decoded)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let expires = self.clock.now() + Duration::days(i64::from(self.config.max_age_days));
        self.jar
            .set_cookie(&format_cookie(key, value, expires, &self.config))
            .map_err(|e| Self::write_failed(key, e.0))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.jar
            .set_cookie(&format_expired_cookie(key, &self.config))
            .map_err(|e| Self::write_failed(key, e.0))
    }
}
