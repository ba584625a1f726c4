//! tasklist-core
//!
//! Core building blocks for the browser task list.
//!
//! # モジュール構成
//! - **domain**: 値の型（TaskRecord, TaskList, StorageMethod, Dialog 系, ids, errors）
//! - **ports**: 環境の抽象化（StorageBackend, KeyValueArea, CookieJar, FragmentSlot, Clock など）
//! - **impls**: ports の実装（各 storage strategy、インメモリのブラウザ、web_sys 版）
//! - **storage**: backend の選択と StorageFacade
//! - **dialog**: DialogService（alert / confirm / prompt）
//! - **app**: TaskListController
//! - **config**: 型付き設定

pub mod app;
pub mod config;
pub mod dialog;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod storage;
