//! StorageMethod - 選択された永続化方式

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The persistence mechanism chosen for a session.
///
/// Chosen once by the selector and then fixed for the lifetime of the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMethod {
    LocalStorage,
    SessionStorage,
    Cookies,
    UrlFragment,
    None,
}

impl StorageMethod {
    /// Priority order used when probing.
    pub const PRIORITY: [StorageMethod; 4] = [
        StorageMethod::LocalStorage,
        StorageMethod::SessionStorage,
        StorageMethod::Cookies,
        StorageMethod::UrlFragment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMethod::LocalStorage => "local_storage",
            StorageMethod::SessionStorage => "session_storage",
            StorageMethod::Cookies => "cookies",
            StorageMethod::UrlFragment => "url_fragment",
            StorageMethod::None => "none",
        }
    }

    /// Web Storage backed methods fall back to cookies on failure.
    pub fn is_web_storage(&self) -> bool {
        matches!(
            self,
            StorageMethod::LocalStorage | StorageMethod::SessionStorage
        )
    }
}

impl fmt::Display for StorageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local_storage" => Ok(StorageMethod::LocalStorage),
            "session_storage" => Ok(StorageMethod::SessionStorage),
            "cookies" => Ok(StorageMethod::Cookies),
            "url_fragment" => Ok(StorageMethod::UrlFragment),
            "none" => Ok(StorageMethod::None),
            other => Err(format!("unknown storage method: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for m in StorageMethod::PRIORITY {
            assert_eq!(m.as_str().parse::<StorageMethod>().unwrap(), m);
        }
        assert!("indexed_db".parse::<StorageMethod>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let s = serde_json::to_string(&StorageMethod::SessionStorage).unwrap();
        assert_eq!(s, "\"session_storage\"");
    }
}
