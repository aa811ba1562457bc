//! UiState — everything the page renderers read.
//!
//! Only [`crate::app::App`] writes to it, and only between gateway calls.

use tunehub_proto::config::UiConfig;
use tunehub_proto::songs::{DownloadTask, PlaylistRecord, Settings, Song, Toplist};

use crate::context::ContextStore;
use crate::router::{PlaylistView, ViewRouter};
use crate::widgets::toast::ToastManager;

/// Load state of the toplist area on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToplistStatus {
    #[default]
    Idle,
    /// Tab list could not be fetched.
    TabsFailed,
    /// The active tab's songs could not be fetched.
    SongsFailed,
}

impl ToplistStatus {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::TabsFailed => Some("加载排行榜失败"),
            Self::SongsFailed => Some("加载歌曲失败"),
        }
    }
}

pub struct UiState {
    // ── Lists ───────────────────────────────────────────────────────────────
    pub contexts: ContextStore,
    pub router: ViewRouter,
    pub toasts: ToastManager,

    // ── Search ──────────────────────────────────────────────────────────────
    /// Source picked in the search bar; also drives the toplists.
    pub source: String,
    pub sources: Vec<String>,
    pub keyword: String,

    // ── Toplists ────────────────────────────────────────────────────────────
    pub toplists: Vec<Toplist>,
    pub active_toplist: Option<String>,
    pub toplist_status: ToplistStatus,

    // ── Pages ───────────────────────────────────────────────────────────────
    pub playlists: Vec<PlaylistRecord>,
    pub downloads: Vec<DownloadTask>,
    pub library: Vec<Song>,
    pub settings: Settings,
}

impl UiState {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            contexts: ContextStore::new(),
            router: ViewRouter::new(),
            toasts: ToastManager::new(),
            source: ui.default_source.clone(),
            sources: ui.sources.clone(),
            keyword: String::new(),
            toplists: Vec::new(),
            active_toplist: None,
            toplist_status: ToplistStatus::Idle,
            playlists: Vec::new(),
            downloads: Vec::new(),
            library: Vec::new(),
            settings: Settings {
                download_dir: String::new(),
                quality: ui.quality.clone(),
            },
        }
    }

    /// `br` sent with every download request.
    pub fn quality(&self) -> &str {
        &self.settings.quality
    }

    /// Imported playlist shown in the detail view, if any.
    pub fn open_playlist(&self) -> Option<&PlaylistRecord> {
        match self.router.playlist_view() {
            PlaylistView::Grid => None,
            PlaylistView::Detail { source, id } => {
                self.playlists.iter().find(|p| p.matches(source, id))
            }
        }
    }
}
