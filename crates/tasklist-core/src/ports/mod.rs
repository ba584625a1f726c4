//! Ports - 抽象化レイヤー
//!
//! 各 trait はブラウザ環境（Web Storage, document.cookie, location.hash,
//! DOM, setTimeout）へのインターフェースです。
//! コアは DOM に直接依存せず、テストでは impls のインメモリ実装に差し替えます。

pub mod backend;
pub mod clock;
pub mod cookie_jar;
pub mod dialog_host;
pub mod fragment;
pub mod key_value;
pub mod timer;

pub use self::backend::StorageBackend;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::cookie_jar::CookieJar;
pub use self::dialog_host::DialogHost;
pub use self::fragment::FragmentSlot;
pub use self::key_value::{AccessError, KeyValueArea};
pub use self::timer::Timer;
