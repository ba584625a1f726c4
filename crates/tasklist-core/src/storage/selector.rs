//! StorageSelector - 優先順位つきの capability probe

use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::impls::{CookieBackend, KeyValueBackend, NoBackend, UrlFragmentBackend};
use crate::ports::{Clock, CookieJar, FragmentSlot, KeyValueArea, StorageBackend};

use super::StorageFacade;

/// Ordered list of candidate strategies.
///
/// `select` probes them in order. The first success wins and later
/// candidates are never probed. When every probe fails the facade gets
/// `NoBackend`.
///
/// # 使用例
/// ```ignore
/// let facade = StorageSelector::new()
///     .candidate(KeyValueBackend::local(area, "__storage_test__"))
///     .candidate(CookieBackend::new(jar, SystemClock, cookie_config))
///     .select();
/// ```
#[derive(Default)]
pub struct StorageSelector {
    candidates: Vec<Box<dyn StorageBackend>>,
    cookie_fallback: Option<Box<dyn StorageBackend>>,
}

impl StorageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The browser priority list: localStorage, sessionStorage, cookies,
    /// URL fragment. A second cookie strategy over the same jar backs the
    /// Web Storage methods when they throw after selection.
    pub fn standard<L, S, J, F, C>(
        local: L,
        session: S,
        jar: J,
        fragment: F,
        clock: C,
        config: &StorageConfig,
    ) -> Self
    where
        L: KeyValueArea + 'static,
        S: KeyValueArea + 'static,
        J: CookieJar + Clone + 'static,
        F: FragmentSlot + 'static,
        C: Clock + Clone + 'static,
    {
        Self::new()
            .candidate(KeyValueBackend::local(local, config.probe_key.clone()))
            .candidate(KeyValueBackend::session(session, config.probe_key.clone()))
            .candidate(CookieBackend::new(
                jar.clone(),
                clock.clone(),
                config.cookie.clone(),
            ))
            .candidate(UrlFragmentBackend::new(fragment))
            .cookie_fallback(CookieBackend::new(jar, clock, config.cookie.clone()))
    }

    pub fn candidate(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.candidates.push(Box::new(backend));
        self
    }

    pub fn cookie_fallback(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.cookie_fallback = Some(Box::new(backend));
        self
    }

    pub fn select(self) -> StorageFacade {
        let mut chosen: Option<Box<dyn StorageBackend>> = None;
        for candidate in self.candidates {
            match candidate.probe() {
                Ok(()) => {
                    chosen = Some(candidate);
                    break;
                }
                Err(err) => {
                    debug!(method = %candidate.method(), %err, "storage candidate rejected")
                }
            }
        }

        let backend = chosen.unwrap_or_else(|| Box::new(NoBackend) as Box<dyn StorageBackend>);
        info!(method = %backend.method(), "storage backend selected");
        StorageFacade::new(backend, self.cookie_fallback)
    }
}
