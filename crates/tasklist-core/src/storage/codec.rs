//! Text codecs shared by the cookie and fragment backends.
//!
//! `encode_component` matches `encodeURIComponent`: everything except
//! `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is percent-encoded as UTF-8.

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::config::CookieConfig;

const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `expires` attribute format (RFC 1123, always GMT).
const COOKIE_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Returns `None` when the decoded bytes are not UTF-8.
pub fn decode_component(value: &str) -> Option<String> {
    percent_decode_str(value)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

pub fn format_cookie_date(at: DateTime<Utc>) -> String {
    at.format(COOKIE_DATE).to_string()
}

/// Build one `document.cookie` assignment.
///
/// `name=<pct>;expires=<date>;path=<path>;SameSite=<policy>`
pub fn format_cookie(
    name: &str,
    value: &str,
    expires: DateTime<Utc>,
    config: &CookieConfig,
) -> String {
    format!(
        "{name}={};expires={};path={};SameSite={}",
        encode_component(value),
        format_cookie_date(expires),
        config.path,
        config.same_site.as_str(),
    )
}

/// Assignment that deletes `name` (expiry at the epoch).
pub fn format_expired_cookie(name: &str, config: &CookieConfig) -> String {
    format!(
        "{name}=;expires={};path={};SameSite={}",
        format_cookie_date(DateTime::<Utc>::default()),
        config.path,
        config.same_site.as_str(),
    )
}

/// Scan a `document.cookie` read view for `name`.
///
/// Segments are split on `;` and leading spaces are trimmed. The first match
/// wins. The raw (still encoded) value is returned.
pub fn find_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .map(|segment| segment.trim_start_matches(' '))
        .find_map(|segment| segment.strip_prefix(name)?.strip_prefix('='))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SameSite;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("abc-_.!~*'()", "abc-_.!~*'()")]
    #[case("a b", "a%20b")]
    #[case(r#"[{"text":"x"}]"#, "%5B%7B%22text%22%3A%22x%22%7D%5D")]
    #[case("ä", "%C3%A4")]
    #[case("a;b=c", "a%3Bb%3Dc")]
    fn encodes_like_encode_uri_component(#[case] raw: &str, #[case] encoded: &str) {
        assert_eq!(encode_component(raw), encoded);
        assert_eq!(decode_component(encoded).as_deref(), Some(raw));
    }

    #[test]
    fn invalid_utf8_decodes_to_none() {
        assert_eq!(decode_component("%FF%FE"), None);
    }

    #[test]
    fn cookie_assignment_format() {
        let expires = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let config = CookieConfig {
            max_age_days: 365,
            path: "/".to_string(),
            same_site: SameSite::Lax,
        };
        let raw = format_cookie("todoTasks", "[]", expires, &config);
        assert_eq!(
            raw,
            "todoTasks=%5B%5D;expires=Thu, 02 Jan 2025 03:04:05 GMT;path=/;SameSite=Lax"
        );
    }

    #[test]
    fn expired_cookie_uses_epoch() {
        let raw = format_expired_cookie("k", &CookieConfig::default());
        assert!(raw.starts_with("k=;expires=Thu, 01 Jan 1970 00:00:00 GMT;"));
    }

    #[test]
    fn find_cookie_trims_and_takes_first_match() {
        let jar = "a=1;  todoTasks=first; todoTasks=second";
        assert_eq!(find_cookie(jar, "todoTasks"), Some("first"));
        assert_eq!(find_cookie(jar, "a"), Some("1"));
    }

    #[test]
    fn find_cookie_requires_exact_name() {
        let jar = "todoTasksOld=x; other=y";
        assert_eq!(find_cookie(jar, "todoTasks"), None);
        assert_eq!(find_cookie("", "todoTasks"), None);
    }
}
