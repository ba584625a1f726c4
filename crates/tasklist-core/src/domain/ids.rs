//! Domain identifiers (strongly-typed IDs).
//!
//! ULID ベースの ID を Phantom type パターンで包みます。
//! 現在は Dialog のみですが、マーカー型を足せば別の ID も同じ実装で作れます。

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use ulid::Ulid;

/// Random part of generated ids. A process-wide counter keeps ids unique
/// without an entropy source, which wasm32 does not have by default.
static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// IdMarker は各 ID 型のマーカー trait
///
/// Display と DOM の要素 ID で使うプレフィックスを提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// 現在時刻ベースの新しい ID
    pub fn generate() -> Self {
        let timestamp_ms = Utc::now().timestamp_millis().max(0) as u64;
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self::from_ulid(Ulid::from_parts(timestamp_ms, u128::from(sequence)))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Dialog のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dialog {}

impl IdMarker for Dialog {
    fn prefix() -> &'static str {
        "dialog-"
    }
}

/// Identifier of one dialog instance (one overlay in the document).
pub type DialogId = Id<Dialog>;
