//! Storage - backend selection and the uniform get/set facade.
//!
//! 起動時に一度だけ backend を選び、その後はすべての get/set を
//! 選ばれた backend に流します（呼び出しごとの再判定はしない）。

pub mod codec;
mod facade;
mod selector;

pub use self::facade::StorageFacade;
pub use self::selector::StorageSelector;
