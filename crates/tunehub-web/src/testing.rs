//! In-memory [`Gateway`] for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tunehub_proto::protocol::{LibraryRefresh, ToplistSongs};
use tunehub_proto::songs::{
    DownloadRequest, DownloadTask, DownloadedMap, PlaylistRecord, Settings, Song, Toplist,
};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;

#[derive(Default)]
pub struct FakeGateway {
    pub search_results: Vec<Song>,
    pub toplists: Vec<Toplist>,
    pub toplist_songs: Vec<Song>,
    pub toplist_source: Option<String>,
    pub downloaded: DownloadedMap,
    pub library: Vec<Song>,
    pub removed: u32,
    pub settings: Settings,
    pub playlists: Mutex<Vec<PlaylistRecord>>,
    /// Every endpoint answers `code: 500` with `error_message`.
    pub offline: bool,
    pub error_message: Option<String>,
    pub failing_ids: HashSet<String>,
    pub downloads: Mutex<Vec<DownloadRequest>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeGateway {
    pub fn failing_downloads<const N: usize>(mut self, ids: [&str; N]) -> Self {
        self.failing_ids = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            error_message: Some("服务异常".to_string()),
            ..Self::default()
        }
    }

    /// Failing backend that sends no `message`.
    pub fn rejecting_silently() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn download_log(&self) -> Vec<DownloadRequest> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> GatewayResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.offline {
            return Err(GatewayError::api(500, self.error_message.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn search(&self, _source: &str, _keyword: &str) -> GatewayResult<Vec<Song>> {
        self.record("search")?;
        Ok(self.search_results.clone())
    }

    async fn toplists(&self, _source: &str) -> GatewayResult<Vec<Toplist>> {
        self.record("toplists")?;
        Ok(self.toplists.clone())
    }

    async fn toplist_songs(&self, _source: &str, _id: &str) -> GatewayResult<ToplistSongs> {
        self.record("toplist")?;
        Ok(ToplistSongs {
            list: self.toplist_songs.clone(),
            source: self.toplist_source.clone(),
        })
    }

    async fn downloaded(&self, _source: &str, ids: &[String]) -> GatewayResult<DownloadedMap> {
        self.record("downloaded")?;
        Ok(ids
            .iter()
            .filter(|id| self.downloaded.is_downloaded(id))
            .map(|id| (id.clone(), true))
            .collect())
    }

    async fn download(&self, request: &DownloadRequest) -> GatewayResult<()> {
        self.record("download")?;
        self.downloads.lock().unwrap().push(request.clone());
        if self.failing_ids.contains(&request.id) {
            return Err(GatewayError::api(500, Some("下载失败".to_string())));
        }
        Ok(())
    }

    async fn downloads(&self) -> GatewayResult<Vec<DownloadTask>> {
        self.record("downloads")?;
        Ok(vec![DownloadTask {
            name: "queued".to_string(),
            ..Default::default()
        }])
    }

    async fn library(&self) -> GatewayResult<Vec<Song>> {
        self.record("library")?;
        Ok(self.library.clone())
    }

    async fn refresh_library(&self) -> GatewayResult<LibraryRefresh> {
        self.record("library_refresh")?;
        Ok(LibraryRefresh {
            songs: self.library.clone(),
            removed: self.removed,
        })
    }

    async fn playlists(&self) -> GatewayResult<Vec<PlaylistRecord>> {
        self.record("playlists")?;
        Ok(self.playlists.lock().unwrap().clone())
    }

    async fn import_playlist(&self, source: &str, id: &str) -> GatewayResult<()> {
        self.record("playlist_import")?;
        self.playlists.lock().unwrap().push(PlaylistRecord {
            id: id.to_string(),
            source: source.to_string(),
            name: format!("imported {id}"),
            author: "someone".to_string(),
            songs: Vec::new(),
        });
        Ok(())
    }

    async fn delete_playlist(&self, source: &str, id: &str) -> GatewayResult<()> {
        self.record("playlist_delete")?;
        self.playlists
            .lock()
            .unwrap()
            .retain(|p| !p.matches(source, id));
        Ok(())
    }

    async fn settings(&self) -> GatewayResult<Settings> {
        self.record("settings")?;
        Ok(self.settings.clone())
    }

    async fn save_settings(&self, _settings: &Settings) -> GatewayResult<Option<String>> {
        self.record("settings_save")?;
        Ok(Some("设置已保存".to_string()))
    }
}
