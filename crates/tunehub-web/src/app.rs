//! App — the controller behind every page action.
//!
//! Each operation follows the same shape: read what it needs from
//! [`UiState`], release the lock, talk to the gateway, then take the write
//! lock once to apply the result. The lock is never held across a gateway
//! call, so a slow backend never blocks the other lists.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};
use tunehub_proto::config::UiConfig;
use tunehub_proto::songs::{DownloadRequest, Settings, Song};

use crate::action::{ListContext, Page};
use crate::app_state::{ToplistStatus, UiState};
use crate::batch::{self, BatchOutcome};
use crate::error::{GatewayError, UiError};
use crate::gateway::Gateway;
use crate::router::PageLoad;

/// Toast text for a failed call: `请求失败` when the backend was not
/// reached, otherwise `<prefix>: <message>`.
fn failure_text(prefix: &str, err: &GatewayError) -> String {
    if err.is_transport() {
        "请求失败".to_string()
    } else {
        format!("{}: {}", prefix, err.backend_message().unwrap_or("未知错误"))
    }
}

pub struct App {
    gateway: Arc<dyn Gateway>,
    state: RwLock<UiState>,
}

impl App {
    pub fn new(gateway: Arc<dyn Gateway>, ui: &UiConfig) -> Self {
        Self {
            gateway,
            state: RwLock::new(UiState::new(ui)),
        }
    }

    /// Read access for renderers.
    pub async fn state(&self) -> RwLockReadGuard<'_, UiState> {
        self.state.read().await
    }

    /// Drop expired toasts and render the rest.
    pub async fn toasts(&self) -> String {
        let mut state = self.state.write().await;
        state.toasts.tick();
        state.toasts.render()
    }

    // ── Lists ─────────────────────────────────────────────────────────────────

    /// Install `songs` into `ctx`, then look up which of them are already
    /// downloaded. A failed lookup leaves every row enabled.
    async fn load_context(&self, ctx: ListContext, source: &str, songs: Vec<Song>) {
        let ids: Vec<String> = songs.iter().map(|s| s.id.clone()).collect();
        let generation = self
            .state
            .write()
            .await
            .contexts
            .reset_context(ctx, source, songs);

        let downloaded = match self.gateway.downloaded(source, &ids).await {
            Ok(map) => map,
            Err(e) => {
                warn!("downloaded lookup for {} failed: {}", ctx, e);
                return;
            }
        };
        self.state
            .write()
            .await
            .contexts
            .apply_downloaded(ctx, generation, &downloaded);
    }

    /// Run a search. A blank keyword does nothing. Returns the number of
    /// results.
    pub async fn search(&self, source: &str, keyword: &str) -> Result<usize, UiError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(UiError::EmptyKeyword);
        }
        self.state.write().await.keyword = keyword.to_string();

        let results = match self.gateway.search(source, keyword).await {
            Ok(r) => r,
            Err(e) => {
                warn!("search {:?} on {} failed: {}", keyword, source, e);
                let text = failure_text("搜索失败", &e);
                self.state.write().await.toasts.error(text);
                return Err(e.into());
            }
        };

        let count = results.len();
        info!("search {:?} on {}: {} results", keyword, source, count);
        let tagged = results.into_iter().map(|s| s.with_source(source)).collect();
        self.load_context(ListContext::Search, source, tagged).await;
        self.state.write().await.router.show_search_results();
        Ok(count)
    }

    /// Switch the search source. The toplists follow it while home is shown.
    pub async fn set_source(&self, source: &str) {
        let home_visible = {
            let mut state = self.state.write().await;
            if state.source == source {
                return;
            }
            state.source = source.to_string();
            state.router.is_visible(Page::Home)
        };
        if home_visible {
            let _ = self.load_toplists(source).await;
        }
    }

    /// Fetch the toplist tabs for `source` and open the first one.
    pub async fn load_toplists(&self, source: &str) -> Result<(), UiError> {
        let list = match self.gateway.toplists(source).await {
            Ok(list) => list,
            Err(e) => {
                warn!("toplists for {} failed: {}", source, e);
                let mut state = self.state.write().await;
                state.toplists.clear();
                state.active_toplist = None;
                state.toplist_status = ToplistStatus::TabsFailed;
                return Err(e.into());
            }
        };

        let first = list.first().map(|t| t.id.clone());
        {
            let mut state = self.state.write().await;
            state.toplists = list;
            state.active_toplist = None;
            state.toplist_status = ToplistStatus::Idle;
        }
        match first {
            Some(id) => self.select_toplist(source, &id).await,
            None => Ok(()),
        }
    }

    /// Make `id` the active tab and load its songs. The songs are tagged
    /// with the source the backend reports, falling back to `source`.
    pub async fn select_toplist(&self, source: &str, id: &str) -> Result<(), UiError> {
        self.state.write().await.active_toplist = Some(id.to_string());

        let data = match self.gateway.toplist_songs(source, id).await {
            Ok(data) => data,
            Err(e) => {
                warn!("toplist {} on {} failed: {}", id, source, e);
                let mut state = self.state.write().await;
                state.contexts.reset_context(ListContext::Toplist, source, Vec::new());
                state.toplist_status = ToplistStatus::SongsFailed;
                return Err(e.into());
            }
        };

        let song_source = data
            .source
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| source.to_string());
        let tagged = data
            .list
            .into_iter()
            .map(|s| s.with_source(&song_source))
            .collect();
        self.state.write().await.toplist_status = ToplistStatus::Idle;
        self.load_context(ListContext::Toplist, &song_source, tagged).await;
        Ok(())
    }

    pub async fn toggle_one(&self, ctx: ListContext, index: usize) -> Result<bool, UiError> {
        let result = self.state.write().await.contexts.toggle_one(ctx, index);
        if let Err(e) = &result {
            debug!("toggle on {} rejected: {}", ctx, e);
        }
        result
    }

    pub async fn toggle_all(&self, ctx: ListContext, checked: bool) {
        self.state.write().await.contexts.toggle_all(ctx, checked);
    }

    /// Download every selected row of `ctx`, one request at a time.
    pub async fn batch_download(&self, ctx: ListContext) -> Result<BatchOutcome, UiError> {
        let plan = {
            let mut state = self.state.write().await;
            let quality = state.quality().to_string();
            match batch::plan(&mut state.contexts, ctx, &quality) {
                Ok(plan) => plan,
                Err(UiError::EmptySelection) => {
                    state.toasts.warning("请先选择要下载的歌曲");
                    return Err(UiError::EmptySelection);
                }
                Err(e) => return Err(e),
            }
        };

        let outcome = batch::execute(self.gateway.as_ref(), plan).await;

        let mut state = self.state.write().await;
        batch::reconcile(&mut state.contexts, &outcome);
        state.toasts.success(outcome.summary());
        Ok(outcome)
    }

    /// Download one song. On success it shows as downloaded in every list
    /// that holds it.
    pub async fn download_song(&self, mut request: DownloadRequest) -> Result<(), UiError> {
        if request.br.is_empty() {
            request.br = self.state.read().await.quality().to_string();
        }

        if let Err(e) = self.gateway.download(&request).await {
            warn!("download of {} failed: {}", request.name, e);
            let text = failure_text("下载失败", &e);
            self.state.write().await.toasts.error(text);
            return Err(e.into());
        }

        let marked = self
            .state
            .write()
            .await
            .contexts
            .mark_downloaded_everywhere(&request.key());
        debug!("{} queued; {} rows marked", request.name, marked);
        Ok(())
    }

    // ── Pages ─────────────────────────────────────────────────────────────────

    /// Show `page` and load whatever it displays.
    pub async fn navigate(&self, page: Page) -> PageLoad {
        let load = self.state.write().await.router.navigate(page);
        debug!("navigate to {} ({:?})", page, load);
        let result = match load {
            PageLoad::None => Ok(()),
            PageLoad::Playlists => self.load_playlists().await,
            PageLoad::Downloads => self.load_downloads().await,
            PageLoad::Library => self.load_library().await,
        };
        if let Err(e) = result {
            warn!("loading {} failed: {}", page, e);
        }
        load
    }

    pub async fn load_playlists(&self) -> Result<(), UiError> {
        let list = self.gateway.playlists().await?;
        self.state.write().await.playlists = list;
        Ok(())
    }

    pub async fn import_playlist(&self, source: &str, id: &str) -> Result<(), UiError> {
        let id = id.trim();
        if id.is_empty() {
            self.state.write().await.toasts.warning("请输入歌单ID");
            return Err(UiError::EmptyPlaylistId);
        }

        if let Err(e) = self.gateway.import_playlist(source, id).await {
            warn!("import of playlist {}/{} failed: {}", source, id, e);
            let text = failure_text("导入失败", &e);
            self.state.write().await.toasts.error(text);
            return Err(e.into());
        }

        info!("imported playlist {}/{}", source, id);
        self.state.write().await.toasts.success("歌单导入成功");
        self.load_playlists().await
    }

    /// Show one imported playlist and load its songs into the playlist list.
    pub async fn open_playlist(&self, source: &str, id: &str) -> Result<(), UiError> {
        let (record_source, songs) = {
            let mut state = self.state.write().await;
            let Some(record) = state.playlists.iter().find(|p| p.matches(source, id)) else {
                return Err(UiError::UnknownPlaylist {
                    playlist_source: source.to_string(),
                    id: id.to_string(),
                });
            };
            let opened = (record.source.clone(), record.tagged_songs());
            state.router.open_playlist(source, id);
            opened
        };
        self.load_context(ListContext::Playlist, &record_source, songs).await;
        Ok(())
    }

    pub async fn show_playlist_grid(&self) {
        self.state.write().await.router.back_to_playlists();
    }

    pub async fn delete_playlist(&self, source: &str, id: &str) -> Result<(), UiError> {
        if let Err(e) = self.gateway.delete_playlist(source, id).await {
            warn!("delete of playlist {}/{} failed: {}", source, id, e);
            self.state.write().await.toasts.error("删除失败");
            return Err(e.into());
        }

        {
            let mut state = self.state.write().await;
            state.toasts.success("歌单已删除");
            if state.open_playlist().is_some_and(|p| p.matches(source, id)) {
                state.router.back_to_playlists();
            }
        }
        self.load_playlists().await
    }

    pub async fn load_library(&self) -> Result<(), UiError> {
        let songs = self.gateway.library().await?;
        self.state.write().await.library = songs;
        Ok(())
    }

    /// Ask the backend to rescan the library.
    pub async fn refresh_library(&self) -> Result<u32, UiError> {
        let refreshed = match self.gateway.refresh_library().await {
            Ok(r) => r,
            Err(e) => {
                warn!("library refresh failed: {}", e);
                self.state.write().await.toasts.error("刷新失败");
                return Err(e.into());
            }
        };

        let mut state = self.state.write().await;
        state.library = refreshed.songs;
        if refreshed.removed > 0 {
            state
                .toasts
                .info(format!("已移除 {} 首不存在的歌曲", refreshed.removed));
        } else {
            state.toasts.success("音乐库已刷新");
        }
        Ok(refreshed.removed)
    }

    pub async fn load_downloads(&self) -> Result<(), UiError> {
        let tasks = self.gateway.downloads().await?;
        self.state.write().await.downloads = tasks;
        Ok(())
    }

    pub async fn load_settings(&self) -> Result<(), UiError> {
        let settings = self.gateway.settings().await?;
        let mut state = self.state.write().await;
        state.settings.download_dir = settings.download_dir;
        if !settings.quality.is_empty() {
            state.settings.quality = settings.quality;
        }
        Ok(())
    }

    pub async fn save_settings(&self, settings: Settings) -> Result<(), UiError> {
        match self.gateway.save_settings(&settings).await {
            Ok(message) => {
                info!("settings saved: quality {}", settings.quality);
                let mut state = self.state.write().await;
                state
                    .toasts
                    .success(message.filter(|m| !m.is_empty()).unwrap_or_else(|| "保存成功".to_string()));
                state.settings = settings;
                Ok(())
            }
            Err(e) => {
                warn!("saving settings failed: {}", e);
                self.state.write().await.toasts.error("保存失败");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::PlaylistView;
    use crate::testing::FakeGateway;
    use std::sync::Mutex;
    use tunehub_proto::songs::{PlaylistRecord, Toplist};

    fn songs(ids: &[&str]) -> Vec<Song> {
        ids.iter()
            .map(|id| Song {
                id: id.to_string(),
                name: format!("name {id}"),
                artist: Some("artist".to_string()),
                ..Default::default()
            })
            .collect()
    }

    fn app(gateway: FakeGateway) -> (App, Arc<FakeGateway>) {
        let gateway = Arc::new(gateway);
        (App::new(gateway.clone(), &UiConfig::default()), gateway)
    }

    async fn toast_messages(app: &App) -> Vec<String> {
        app.state()
            .await
            .toasts
            .visible()
            .map(|t| t.message.clone())
            .collect()
    }

    #[tokio::test]
    async fn batch_with_one_failure_reports_two() {
        let (app, _) = app(FakeGateway {
            search_results: songs(&["id0", "id1", "id2"]),
            ..FakeGateway::default().failing_downloads(["id1"])
        });
        app.search("netease", "hello").await.unwrap();
        app.toggle_one(ListContext::Search, 0).await.unwrap();
        app.toggle_one(ListContext::Search, 2).await.unwrap();

        let outcome = app.batch_download(ListContext::Search).await.unwrap();
        assert_eq!(outcome.succeeded(), 2);

        let state = app.state().await;
        assert_eq!(state.toasts.latest().unwrap().message, "已添加 2 首歌曲到下载队列");
        let search = state.contexts.get(ListContext::Search);
        assert_eq!(search.count(), 0);
        assert!(!search.select_all_checked());
        assert!(!search.is_selectable(0));
        assert!(search.is_selectable(1));
        assert!(!search.is_selectable(2));
    }

    #[tokio::test]
    async fn empty_batch_warns_without_network() {
        let (app, gateway) = app(FakeGateway::default());
        let err = app.batch_download(ListContext::Toplist).await.unwrap_err();
        assert!(matches!(err, UiError::EmptySelection));
        assert!(gateway.calls().is_empty());
        assert_eq!(toast_messages(&app).await, vec!["请先选择要下载的歌曲"]);
    }

    #[tokio::test]
    async fn blank_keyword_is_ignored() {
        let (app, gateway) = app(FakeGateway::default());
        assert!(matches!(app.search("netease", "   ").await, Err(UiError::EmptyKeyword)));
        assert!(gateway.calls().is_empty());
        assert!(!app.state().await.router.search_results_visible());
    }

    #[tokio::test]
    async fn search_marks_downloaded_rows_and_tags_source() {
        let mut downloaded = tunehub_proto::songs::DownloadedMap::new();
        downloaded.insert("b", true);
        let (app, gateway) = app(FakeGateway {
            search_results: songs(&["a", "b"]),
            downloaded,
            ..Default::default()
        });

        assert_eq!(app.search("kuwo", "x").await.unwrap(), 2);
        assert_eq!(gateway.calls(), vec!["search", "downloaded"]);

        let state = app.state().await;
        assert!(state.router.search_results_visible());
        let search = state.contexts.get(ListContext::Search);
        assert_eq!(search.source(), "kuwo");
        assert!(search.songs().iter().all(|r| r.song.source == "kuwo"));
        assert!(search.is_selectable(0));
        assert!(!search.is_selectable(1));
    }

    #[tokio::test]
    async fn search_failure_shows_backend_message() {
        let (app, _) = app(FakeGateway::offline());
        assert!(app.search("netease", "x").await.is_err());
        assert_eq!(toast_messages(&app).await, vec!["搜索失败: 服务异常"]);
        assert!(!app.state().await.router.search_results_visible());
    }

    #[tokio::test]
    async fn failure_without_message_reads_unknown_error() {
        let (app, _) = app(FakeGateway::rejecting_silently());
        assert!(app.search("netease", "x").await.is_err());
        assert!(app.import_playlist("netease", "77").await.is_err());
        assert_eq!(
            toast_messages(&app).await,
            vec!["导入失败: 未知错误", "搜索失败: 未知错误"]
        );
    }

    #[tokio::test]
    async fn single_download_marks_every_context() {
        let tracks = songs(&["7", "8"]);
        let (app, gateway) = app(FakeGateway {
            search_results: tracks.clone(),
            toplists: vec![Toplist {
                id: "hot".to_string(),
                name: "Hot".to_string(),
                update_frequency: None,
            }],
            toplist_songs: tracks,
            ..Default::default()
        });
        app.search("netease", "x").await.unwrap();
        app.load_toplists("netease").await.unwrap();
        app.toggle_one(ListContext::Toplist, 1).await.unwrap();

        let request = DownloadRequest {
            source: "netease".to_string(),
            id: "8".to_string(),
            name: "name 8".to_string(),
            artist: "artist".to_string(),
            album: String::new(),
            br: String::new(),
        };
        app.download_song(request).await.unwrap();

        assert_eq!(gateway.download_log()[0].br, "320k");
        let state = app.state().await;
        assert!(!state.contexts.get(ListContext::Search).is_selectable(1));
        assert!(!state.contexts.get(ListContext::Toplist).is_selectable(1));
        assert!(state.contexts.get(ListContext::Search).is_selectable(0));
    }

    #[tokio::test]
    async fn toplist_uses_reported_source() {
        let (app, _) = app(FakeGateway {
            toplists: vec![
                Toplist {
                    id: "1".to_string(),
                    name: "New".to_string(),
                    update_frequency: Some("每日更新".to_string()),
                },
                Toplist {
                    id: "2".to_string(),
                    name: "Hot".to_string(),
                    update_frequency: None,
                },
            ],
            toplist_songs: songs(&["x"]),
            toplist_source: Some("qq".to_string()),
            ..Default::default()
        });

        app.load_toplists("netease").await.unwrap();

        let state = app.state().await;
        assert_eq!(state.active_toplist.as_deref(), Some("1"));
        let toplist = state.contexts.get(ListContext::Toplist);
        assert_eq!(toplist.source(), "qq");
        assert_eq!(toplist.songs()[0].song.source, "qq");
    }

    #[tokio::test]
    async fn toplist_failure_sets_status() {
        let (app, _) = app(FakeGateway::offline());
        assert!(app.load_toplists("netease").await.is_err());
        assert_eq!(
            app.state().await.toplist_status.message(),
            Some("加载排行榜失败")
        );
    }

    #[tokio::test]
    async fn source_change_reloads_toplists_only_on_home() {
        let (app, gateway) = app(FakeGateway::default());
        app.set_source("kuwo").await;
        assert_eq!(gateway.calls(), vec!["toplists"]);

        app.navigate(Page::Settings).await;
        app.set_source("qq").await;
        assert_eq!(gateway.calls(), vec!["toplists"]);
        assert_eq!(app.state().await.source, "qq");
    }

    #[tokio::test]
    async fn import_requires_an_id() {
        let (app, gateway) = app(FakeGateway::default());
        assert!(matches!(
            app.import_playlist("netease", " ").await,
            Err(UiError::EmptyPlaylistId)
        ));
        assert!(gateway.calls().is_empty());
        assert_eq!(toast_messages(&app).await, vec!["请输入歌单ID"]);
    }

    #[tokio::test]
    async fn playlist_import_open_and_delete() {
        let (app, gateway) = app(FakeGateway {
            playlists: Mutex::new(vec![PlaylistRecord {
                id: "9".to_string(),
                source: "kuwo".to_string(),
                name: "Mine".to_string(),
                author: "me".to_string(),
                songs: songs(&["s1", "s2"]),
            }]),
            ..Default::default()
        });

        app.navigate(Page::Playlist).await;
        app.import_playlist("netease", "77").await.unwrap();
        assert_eq!(app.state().await.playlists.len(), 2);

        app.open_playlist("kuwo", "9").await.unwrap();
        {
            let state = app.state().await;
            let ctx = state.contexts.get(ListContext::Playlist);
            assert_eq!(ctx.songs().len(), 2);
            assert!(ctx.songs().iter().all(|r| r.song.source == "kuwo"));
            assert_eq!(state.open_playlist().map(|p| p.name.as_str()), Some("Mine"));
        }

        app.delete_playlist("kuwo", "9").await.unwrap();
        let state = app.state().await;
        assert_eq!(state.router.playlist_view(), &PlaylistView::Grid);
        assert_eq!(state.playlists.len(), 1);
        assert_eq!(state.toasts.latest().unwrap().message, "歌单已删除");
        drop(state);
        assert!(gateway.calls().contains(&"playlist_delete"));
    }

    #[tokio::test]
    async fn unknown_playlist_cannot_be_opened() {
        let (app, _) = app(FakeGateway::default());
        assert!(matches!(
            app.open_playlist("qq", "1").await,
            Err(UiError::UnknownPlaylist { .. })
        ));
    }

    #[tokio::test]
    async fn library_refresh_reports_removed() {
        let (app, _) = app(FakeGateway {
            library: songs(&["a"]),
            removed: 3,
            ..Default::default()
        });
        assert_eq!(app.refresh_library().await.unwrap(), 3);
        assert_eq!(toast_messages(&app).await, vec!["已移除 3 首不存在的歌曲"]);
        assert_eq!(app.state().await.library.len(), 1);
    }

    #[tokio::test]
    async fn library_refresh_failure() {
        let (app, _) = app(FakeGateway::offline());
        assert!(app.refresh_library().await.is_err());
        assert_eq!(toast_messages(&app).await, vec!["刷新失败"]);
    }

    #[tokio::test]
    async fn navigate_loads_page_data() {
        let (app, gateway) = app(FakeGateway::default());
        assert_eq!(app.navigate(Page::Downloads).await, PageLoad::Downloads);
        assert_eq!(app.state().await.downloads.len(), 1);
        app.navigate(Page::Library).await;
        assert_eq!(gateway.calls(), vec!["downloads", "library"]);
    }

    #[tokio::test]
    async fn saving_settings_updates_quality() {
        let (app, _) = app(FakeGateway::default());
        app.save_settings(Settings {
            download_dir: "/music".to_string(),
            quality: "flac".to_string(),
        })
        .await
        .unwrap();

        let state = app.state().await;
        assert_eq!(state.quality(), "flac");
        assert_eq!(state.toasts.latest().unwrap().message, "设置已保存");
    }
}
