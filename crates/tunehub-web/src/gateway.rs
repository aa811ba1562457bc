//! Remote data gateway: one method per backend endpoint.
//!
//! Each call is a single round trip. There is no retry; callers turn any
//! error into a toast.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use tunehub_proto::config::BackendConfig;
use tunehub_proto::protocol::{
    paths, Envelope, LibraryRefresh, SearchData, ToplistSongs, ToplistsData,
};
use tunehub_proto::songs::{
    DownloadRequest, DownloadTask, DownloadedMap, PlaylistRecord, Settings, Song, Toplist,
};

use crate::error::{GatewayError, GatewayResult};

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn search(&self, source: &str, keyword: &str) -> GatewayResult<Vec<Song>>;
    async fn toplists(&self, source: &str) -> GatewayResult<Vec<Toplist>>;
    async fn toplist_songs(&self, source: &str, id: &str) -> GatewayResult<ToplistSongs>;
    async fn downloaded(&self, source: &str, ids: &[String]) -> GatewayResult<DownloadedMap>;
    /// Enqueue one download.
    async fn download(&self, request: &DownloadRequest) -> GatewayResult<()>;
    async fn downloads(&self) -> GatewayResult<Vec<DownloadTask>>;
    async fn library(&self) -> GatewayResult<Vec<Song>>;
    async fn refresh_library(&self) -> GatewayResult<LibraryRefresh>;
    async fn playlists(&self) -> GatewayResult<Vec<PlaylistRecord>>;
    async fn import_playlist(&self, source: &str, id: &str) -> GatewayResult<()>;
    async fn delete_playlist(&self, source: &str, id: &str) -> GatewayResult<()>;
    async fn settings(&self) -> GatewayResult<Settings>;
    /// Returns the backend's confirmation message, if it sent one.
    async fn save_settings(&self, settings: &Settings) -> GatewayResult<Option<String>>;
}

/// [`Gateway`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> GatewayResult<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `request` and unwrap the envelope. A body that is not an
    /// envelope counts as an API failure when the HTTP status was an error,
    /// and as a payload error otherwise.
    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> GatewayResult<Envelope<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let envelope: Envelope<T> = match serde_json::from_slice(&body) {
            Ok(env) => env,
            Err(e) if !status.is_success() => {
                debug!("non-envelope body with HTTP {}: {}", status, e);
                return Err(GatewayError::api(i64::from(status.as_u16()), None));
            }
            Err(e) => return Err(GatewayError::Payload(e.to_string())),
        };

        if !envelope.is_success() {
            return Err(GatewayError::api(envelope.code, envelope.message));
        }
        Ok(envelope)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> GatewayResult<Envelope<T>> {
        self.call(self.client.get(self.url(path)).query(query)).await
    }
}

/// `data` of a successful envelope, or a payload error naming `what`.
fn require<T>(envelope: Envelope<T>, what: &str) -> GatewayResult<T> {
    envelope
        .data
        .ok_or_else(|| GatewayError::Payload(format!("{what}: missing data")))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn search(&self, source: &str, keyword: &str) -> GatewayResult<Vec<Song>> {
        let env: Envelope<SearchData> = self
            .get(paths::SEARCH, &[("source", source), ("keyword", keyword)])
            .await?;
        Ok(require(env, "search")?.results)
    }

    async fn toplists(&self, source: &str) -> GatewayResult<Vec<Toplist>> {
        let env: Envelope<ToplistsData> = self.get(paths::TOPLISTS, &[("source", source)]).await?;
        Ok(require(env, "toplists")?.list)
    }

    async fn toplist_songs(&self, source: &str, id: &str) -> GatewayResult<ToplistSongs> {
        let env: Envelope<ToplistSongs> = self
            .get(paths::TOPLIST, &[("source", source), ("id", id)])
            .await?;
        require(env, "toplist")
    }

    async fn downloaded(&self, source: &str, ids: &[String]) -> GatewayResult<DownloadedMap> {
        if ids.is_empty() {
            return Ok(DownloadedMap::new());
        }
        let csv = ids.join(",");
        let env: Envelope<DownloadedMap> = self
            .get(paths::DOWNLOADED, &[("source", source), ("ids", csv.as_str())])
            .await?;
        Ok(env.data.unwrap_or_default())
    }

    async fn download(&self, request: &DownloadRequest) -> GatewayResult<()> {
        let _: Envelope<serde_json::Value> = self
            .call(self.client.get(self.url(paths::DOWNLOAD)).query(request))
            .await?;
        Ok(())
    }

    async fn downloads(&self) -> GatewayResult<Vec<DownloadTask>> {
        let env: Envelope<Vec<DownloadTask>> = self.get(paths::DOWNLOADS, &[]).await?;
        Ok(env.data.unwrap_or_default())
    }

    async fn library(&self) -> GatewayResult<Vec<Song>> {
        let env: Envelope<Vec<Song>> = self.get(paths::LIBRARY, &[]).await?;
        Ok(env.data.unwrap_or_default())
    }

    async fn refresh_library(&self) -> GatewayResult<LibraryRefresh> {
        let env: Envelope<Vec<Song>> = self
            .call(self.client.post(self.url(paths::LIBRARY_REFRESH)))
            .await?;
        Ok(LibraryRefresh {
            removed: env.removed.unwrap_or(0),
            songs: env.data.unwrap_or_default(),
        })
    }

    async fn playlists(&self) -> GatewayResult<Vec<PlaylistRecord>> {
        let env: Envelope<Vec<PlaylistRecord>> = self.get(paths::PLAYLISTS, &[]).await?;
        Ok(env.data.unwrap_or_default())
    }

    async fn import_playlist(&self, source: &str, id: &str) -> GatewayResult<()> {
        let _: Envelope<serde_json::Value> = self
            .get(paths::PLAYLIST_IMPORT, &[("source", source), ("id", id)])
            .await?;
        Ok(())
    }

    async fn delete_playlist(&self, source: &str, id: &str) -> GatewayResult<()> {
        let _: Envelope<serde_json::Value> = self
            .call(
                self.client
                    .delete(self.url(paths::PLAYLIST))
                    .query(&[("source", source), ("id", id)]),
            )
            .await?;
        Ok(())
    }

    async fn settings(&self) -> GatewayResult<Settings> {
        let env: Envelope<Settings> = self.get(paths::SETTINGS, &[]).await?;
        require(env, "settings")
    }

    async fn save_settings(&self, settings: &Settings) -> GatewayResult<Option<String>> {
        let env: Envelope<serde_json::Value> = self
            .call(self.client.post(self.url(paths::SETTINGS)).json(settings))
            .await?;
        Ok(env.message)
    }
}
