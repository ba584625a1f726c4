//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **Storage strategies**: KeyValueBackend / CookieBackend / UrlFragmentBackend / NoBackend
//! - **In-memory browser**: MemoryArea / MemoryCookieJar / MemoryFragment（テスト・CLI 用）
//! - **Dialog**: RecordingDialogHost / ScriptedUser
//! - **Timer**: TokioTimer / ImmediateTimer
//! - **web**（feature）: web_sys を使った本物のブラウザ実装

pub mod cookie;
pub mod fragment;
pub mod memory;
pub mod none;
pub mod recording_host;
pub mod scripted;
pub mod timer;
pub mod web_storage;

#[cfg(feature = "web")]
pub mod web;

// 主要な型を再エクスポート
pub use self::cookie::CookieBackend;
pub use self::fragment::UrlFragmentBackend;
pub use self::memory::{MemoryArea, MemoryBrowser, MemoryCookieJar, MemoryFragment};
pub use self::none::NoBackend;
pub use self::recording_host::{HostCall, RecordingDialogHost};
pub use self::scripted::{Answer, ScriptedUser};
pub use self::timer::{ImmediateTimer, TokioTimer};
pub use self::web_storage::KeyValueBackend;
