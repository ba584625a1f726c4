//! In-memory browser environment (開発用・テスト用)
//!
//! # 学習ポイント
//! - Arc<Mutex<..>> で状態を共有し、clone した handle 同士で同じデータを見る
//! - 「ページの再読み込み」は、同じ handle から facade を作り直すだけで再現できる
//! - quota 超過や無効化された storage を switch で再現する

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::StorageConfig;
use crate::ports::{AccessError, Clock, CookieJar, FragmentSlot, KeyValueArea, SystemClock};
use crate::storage::StorageSelector;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct AreaState {
    items: HashMap<String, String>,
    quota_bytes: Option<usize>,
    unavailable: bool,
    fail_reads: bool,
}

impl AreaState {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }
}

/// Fake `Storage` area (localStorage / sessionStorage).
#[derive(Debug, Clone, Default)]
pub struct MemoryArea {
    state: Arc<Mutex<AreaState>>,
}

impl MemoryArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call throws, like storage disabled by the browser.
    pub fn unavailable() -> Self {
        let area = Self::new();
        area.set_unavailable(true);
        area
    }

    /// Writes past `bytes` (keys plus values) throw `QuotaExceededError`.
    pub fn with_quota(bytes: usize) -> Self {
        let area = Self::new();
        lock(&area.state).quota_bytes = Some(bytes);
        area
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        lock(&self.state).unavailable = unavailable;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        lock(&self.state).fail_reads = fail;
    }

    /// Raw stored text, bypassing failure switches.
    pub fn peek(&self, key: &str) -> Option<String> {
        lock(&self.state).items.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueArea for MemoryArea {
    fn get_item(&self, key: &str) -> Result<Option<String>, AccessError> {
        let state = lock(&self.state);
        if state.unavailable || state.fail_reads {
            return Err(AccessError::new("SecurityError: storage access denied"));
        }
        Ok(state.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AccessError> {
        let mut state = lock(&self.state);
        if state.unavailable {
            return Err(AccessError::new("SecurityError: storage access denied"));
        }
        if let Some(quota) = state.quota_bytes
            && state.used_bytes_with(key, value) > quota
        {
            return Err(AccessError::new("QuotaExceededError"));
        }
        state.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AccessError> {
        let mut state = lock(&self.state);
        if state.unavailable {
            return Err(AccessError::new("SecurityError: storage access denied"));
        }
        state.items.remove(key);
        Ok(())
    }
}

#[derive(Debug)]
struct JarState {
    enabled: bool,
    /// Insertion ordered, like the `document.cookie` read view.
    cookies: Vec<(String, String)>,
    assignments: Vec<String>,
}

/// Fake `document.cookie`.
///
/// Assignments replace a cookie of the same name in place, and an
/// assignment whose `expires` is not after the jar's clock deletes it.
#[derive(Clone)]
pub struct MemoryCookieJar {
    state: Arc<Mutex<JarState>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl fmt::Debug for MemoryCookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCookieJar")
            .field("state", &self.state)
            .field("now", &self.clock.now())
            .finish()
    }
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(JarState {
                enabled: true,
                cookies: Vec::new(),
                assignments: Vec::new(),
            })),
            clock: Arc::new(SystemClock),
        }
    }

    /// 期限切れ判定に使う時刻を差し替える（テストでは FixedClock）
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn disabled() -> Self {
        let jar = Self::new();
        jar.set_enabled(false);
        jar
    }

    pub fn set_enabled(&self, enabled: bool) {
        lock(&self.state).enabled = enabled;
    }

    /// Every raw assignment received, oldest first.
    pub fn assignments(&self) -> Vec<String> {
        lock(&self.state).assignments.clone()
    }

    fn is_expired(&self, attributes: &str) -> bool {
        let now = self.clock.now();
        attributes
            .split(';')
            .map(str::trim)
            .filter_map(|attr| attr.strip_prefix("expires="))
            .filter_map(|date| {
                NaiveDateTime::parse_from_str(date, "%a, %d %b %Y %H:%M:%S GMT").ok()
            })
            .any(|at| at.and_utc() <= now)
    }
}

impl Default for MemoryCookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar for MemoryCookieJar {
    fn enabled(&self) -> bool {
        lock(&self.state).enabled
    }

    fn cookie_string(&self) -> Result<String, AccessError> {
        let state = lock(&self.state);
        if !state.enabled {
            return Ok(String::new());
        }
        Ok(state
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "))
    }

    fn set_cookie(&self, raw: &str) -> Result<(), AccessError> {
        let mut state = lock(&self.state);
        state.assignments.push(raw.to_string());
        if !state.enabled {
            return Ok(());
        }

        let (pair, attributes) = raw.split_once(';').unwrap_or((raw, ""));
        let Some((name, value)) = pair.split_once('=') else {
            return Err(AccessError::new(format!("malformed cookie assignment: {raw}")));
        };
        let name = name.trim().to_string();

        let existing = state.cookies.iter().position(|(n, _)| *n == name);
        if self.is_expired(attributes) {
            if let Some(i) = existing {
                state.cookies.remove(i);
            }
            return Ok(());
        }
        match existing {
            Some(i) => state.cookies[i].1 = value.to_string(),
            None => state.cookies.push((name, value.to_string())),
        }
        Ok(())
    }
}

/// Fake `location.hash`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFragment {
    hash: Arc<Mutex<String>>,
}

impl MemoryFragment {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FragmentSlot for MemoryFragment {
    fn hash(&self) -> Result<String, AccessError> {
        Ok(lock(&self.hash).clone())
    }

    fn set_hash(&self, value: &str) -> Result<(), AccessError> {
        *lock(&self.hash) = value.trim_start_matches('#').to_string();
        Ok(())
    }
}

/// A whole simulated browser: both storage areas, the cookie jar, and the
/// location fragment.
///
/// Cloning shares the state, so a clone stands in for the same browser after
/// a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryBrowser {
    pub local: MemoryArea,
    pub session: MemoryArea,
    pub cookies: MemoryCookieJar,
    pub fragment: MemoryFragment,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// localStorage and sessionStorage both throw; cookies work.
    pub fn without_web_storage() -> Self {
        Self {
            local: MemoryArea::unavailable(),
            session: MemoryArea::unavailable(),
            ..Self::default()
        }
    }

    /// Nothing but the URL fragment.
    pub fn fragment_only() -> Self {
        Self {
            local: MemoryArea::unavailable(),
            session: MemoryArea::unavailable(),
            cookies: MemoryCookieJar::disabled(),
            fragment: MemoryFragment::new(),
        }
    }

    pub fn selector<C>(&self, clock: C, config: &StorageConfig) -> StorageSelector
    where
        C: Clock + Clone + 'static,
    {
        StorageSelector::standard(
            self.local.clone(),
            self.session.clone(),
            self.cookies.clone(),
            self.fragment.clone(),
            clock,
            config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn area_quota_rejects_oversized_write() {
        let area = MemoryArea::with_quota(10);
        area.set_item("k", "12345").unwrap();
        let err = area.set_item("k2", "123456789").unwrap_err();
        assert_eq!(err.0, "QuotaExceededError");
        // Replacing an existing key only counts the new value.
        area.set_item("k", "123456789").unwrap();
    }

    #[test]
    fn area_clones_share_state() {
        let a = MemoryArea::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn jar_replaces_by_name_and_deletes_expired() {
        let jar = MemoryCookieJar::new();
        jar.set_cookie("a=1;path=/").unwrap();
        jar.set_cookie("b=2;path=/").unwrap();
        jar.set_cookie("a=3;path=/").unwrap();
        assert_eq!(jar.cookie_string().unwrap(), "a=3; b=2");

        jar.set_cookie("a=;expires=Thu, 01 Jan 1970 00:00:00 GMT;path=/")
            .unwrap();
        assert_eq!(jar.cookie_string().unwrap(), "b=2");
        assert_eq!(jar.assignments().len(), 4);
    }

    #[test]
    fn jar_expiry_follows_its_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let jar = MemoryCookieJar::new().with_clock(FixedClock::new(at));
        jar.set_cookie("a=1;expires=Tue, 31 Dec 2024 00:00:00 GMT;path=/")
            .unwrap();
        assert_eq!(jar.cookie_string().unwrap(), "a=1");

        jar.set_cookie("a=2;expires=Mon, 01 Jan 2024 00:00:00 GMT;path=/")
            .unwrap();
        assert_eq!(jar.cookie_string().unwrap(), "");
    }

    #[test]
    fn disabled_jar_stores_nothing() {
        let jar = MemoryCookieJar::disabled();
        jar.set_cookie("a=1").unwrap();
        assert!(!jar.enabled());
        assert_eq!(jar.cookie_string().unwrap(), "");
    }

    #[test]
    fn fragment_strips_hash_sign() {
        let f = MemoryFragment::new();
        f.set_hash("#abc").unwrap();
        assert_eq!(f.hash().unwrap(), "abc");
    }
}
