use serde::{Deserialize, Serialize};

use crate::songs::{Song, Toplist};

/// `code` value the backend uses for success. Anything else is a failure,
/// whatever the HTTP status was.
pub const SUCCESS_CODE: i64 = 200;

/// Endpoint paths, relative to the backend base URL.
pub mod paths {
    pub const SEARCH: &str = "/api/v1/search";
    pub const TOPLISTS: &str = "/api/v1/toplists";
    pub const TOPLIST: &str = "/api/v1/toplist";
    pub const DOWNLOADED: &str = "/api/v1/downloaded";
    pub const DOWNLOAD: &str = "/api/v1/download";
    pub const DOWNLOADS: &str = "/api/v1/downloads";
    pub const LIBRARY: &str = "/api/v1/library";
    pub const LIBRARY_REFRESH: &str = "/api/v1/library/refresh";
    pub const PLAYLISTS: &str = "/api/v1/playlists";
    pub const PLAYLIST_IMPORT: &str = "/api/v1/playlist/import";
    pub const PLAYLIST: &str = "/api/v1/playlist";
    pub const SETTINGS: &str = "/api/v1/settings";
}

/// The `{code, message, data}` wrapper around every backend reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Only set by the library refresh endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<u32>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: None,
            data: Some(data),
            removed: None,
        }
    }

    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: None,
            removed: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// `data` of `/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub results: Vec<Song>,
}

/// `data` of `/toplists`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToplistsData {
    #[serde(default)]
    pub list: Vec<Toplist>,
}

/// `data` of `/toplist`. `source` may differ from the one requested when the
/// backend falls back to another provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToplistSongs {
    #[serde(default)]
    pub list: Vec<Song>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result of `/library/refresh`: the surviving library plus how many
/// entries pointed at missing files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryRefresh {
    pub songs: Vec<Song>,
    pub removed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::songs::DownloadedMap;

    #[test]
    fn test_envelope_success_code() {
        let env: Envelope<SearchData> = serde_json::from_str(
            r#"{"code": 200, "data": {"results": [{"id": 1, "name": "a"}]}}"#,
        )
        .unwrap();
        assert!(env.is_success());
        assert_eq!(env.data.unwrap().results[0].id, "1");
    }

    #[test]
    fn test_envelope_error_without_data() {
        let env: Envelope<SearchData> =
            serde_json::from_str(r#"{"code": 400, "message": "缺少参数"}"#).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.message.as_deref(), Some("缺少参数"));
        assert!(env.data.is_none());
    }

    #[test]
    fn test_envelope_null_data() {
        let env: Envelope<DownloadedMap> =
            serde_json::from_str(r#"{"code": 200, "data": null}"#).unwrap();
        assert!(env.is_success());
        assert!(env.data.is_none());
    }

    #[test]
    fn test_envelope_removed_count() {
        let env: Envelope<Vec<Song>> =
            serde_json::from_str(r#"{"code": 200, "data": [], "removed": 3}"#).unwrap();
        assert_eq!(env.removed, Some(3));
    }

    #[test]
    fn test_toplist_songs_source_fallback() {
        let data: ToplistSongs =
            serde_json::from_str(r#"{"list": [{"id": "9", "name": "x"}]}"#).unwrap();
        assert_eq!(data.source, None);
        assert_eq!(data.list.len(), 1);
    }
}
