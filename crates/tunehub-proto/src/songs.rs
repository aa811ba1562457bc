//! Song, playlist and download records as the backend sends them.
//!
//! Everything here is a plain serde value. Lists are replaced wholesale on
//! every load, so none of these types carry interior state.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ── Songs ─────────────────────────────────────────────────────────────────────

/// One track as returned by search, toplist, playlist or library endpoints.
///
/// Library entries also carry `filename`, `path` and `time`; those are
/// ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Song {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub source: String,
}

/// Identity of a song across lists: the same id from two sources is two songs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongKey {
    pub source: String,
    pub id: String,
}

impl Song {
    pub fn key(&self) -> SongKey {
        SongKey {
            source: self.source.clone(),
            id: self.id.clone(),
        }
    }

    /// Copy of this song re-tagged with `source`. Search and toplist
    /// results omit the source, so the list loader stamps it on.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn artist_or_empty(&self) -> &str {
        self.artist.as_deref().unwrap_or("")
    }

    pub fn album_or_empty(&self) -> &str {
        self.album.as_deref().unwrap_or("")
    }

    /// Type tags, if the source provided any non-empty list.
    pub fn type_tags(&self) -> Option<&[String]> {
        self.types.as_deref().filter(|t| !t.is_empty())
    }
}

/// Lookup from song id to "already exists locally", scoped to one
/// `(source, ids)` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadedMap(HashMap<String, bool>);

impl DownloadedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_downloaded(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn insert(&mut self, id: impl Into<String>, downloaded: bool) {
        self.0.insert(id.into(), downloaded);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every song in `songs` marked downloaded (library view).
    pub fn all_of(songs: &[Song]) -> Self {
        Self(songs.iter().map(|s| (s.id.clone(), true)).collect())
    }
}

impl FromIterator<(String, bool)> for DownloadedMap {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Toplists / playlists ──────────────────────────────────────────────────────

/// A chart offered by a source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toplist {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_frequency: Option<String>,
}

/// An imported playlist, persisted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaylistRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub songs: Vec<Song>,
}

impl PlaylistRecord {
    pub fn matches(&self, source: &str, id: &str) -> bool {
        self.source == source && self.id == id
    }

    /// The playlist's songs tagged with the playlist's source.
    pub fn tagged_songs(&self) -> Vec<Song> {
        self.songs
            .iter()
            .cloned()
            .map(|s| s.with_source(&self.source))
            .collect()
    }
}

// ── Downloads ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    #[default]
    Pending,
    Downloading,
    Success,
    Failed,
}

impl DownloadStatus {
    /// Status text shown next to the progress bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "等待中",
            Self::Downloading => "下载中",
            Self::Success => "已完成",
            Self::Failed => "失败",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Downloading => "downloading",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// A download job owned by the backend; the UI only observes it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadTask {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub status: DownloadStatus,
    /// Percent as reported; may fall outside 0..=100.
    #[serde(default)]
    pub progress: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query parameters of one enqueue request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub source: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    /// Empty means "use the current quality".
    #[serde(default)]
    pub br: String,
}

impl DownloadRequest {
    pub fn for_song(song: &Song, quality: &str) -> Self {
        Self {
            source: song.source.clone(),
            id: song.id.clone(),
            name: song.name.clone(),
            artist: song.artist_or_empty().to_string(),
            album: song.album_or_empty().to_string(),
            br: quality.to_string(),
        }
    }

    pub fn key(&self) -> SongKey {
        SongKey {
            source: self.source.clone(),
            id: self.id.clone(),
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub download_dir: String,
    #[serde(default)]
    pub quality: String,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Sources disagree on whether ids are strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Uint(u64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}
