//! CookieJar port - `document.cookie`

use super::key_value::AccessError;

/// The `document.cookie` accessor pair plus `navigator.cookieEnabled`.
///
/// `cookie_string` returns the read view (`"a=1; b=2"`), and `set_cookie`
/// takes one raw assignment (`"a=1;expires=...;path=/"`), exactly like the
/// DOM property.
pub trait CookieJar {
    fn enabled(&self) -> bool;

    fn cookie_string(&self) -> Result<String, AccessError>;

    fn set_cookie(&self, raw: &str) -> Result<(), AccessError>;
}
