//! ViewRouter — tracks which page is shown and what the playlist page shows.
//!
//! Tracks:
//! - The visible page (exactly one at a time)
//! - Whether the search-results panel on the home page is showing
//! - The playlist page's sub-view (grid of imported playlists, or one playlist)

use crate::action::Page;

/// Data a page needs fetched when it becomes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    None,
    Playlists,
    Downloads,
    Library,
}

/// What the playlist page currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaylistView {
    #[default]
    Grid,
    Detail { source: String, id: String },
}

pub struct ViewRouter {
    current: Page,
    /// Search-results panel on the home page.
    search_results_visible: bool,
    playlist_view: PlaylistView,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self {
            current: Page::Home,
            search_results_visible: false,
            playlist_view: PlaylistView::Grid,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn is_visible(&self, page: Page) -> bool {
        self.current == page
    }

    /// Show `page`, hide every other one, and say what must be loaded.
    ///
    /// Leaving home hides the search results. Opening the playlist page
    /// always starts from the grid.
    pub fn navigate(&mut self, page: Page) -> PageLoad {
        if page != Page::Home {
            self.search_results_visible = false;
        }
        self.current = page;
        match page {
            Page::Home | Page::Settings => PageLoad::None,
            Page::Playlist => {
                self.playlist_view = PlaylistView::Grid;
                PageLoad::Playlists
            }
            Page::Downloads => PageLoad::Downloads,
            Page::Library => PageLoad::Library,
        }
    }

    pub fn search_results_visible(&self) -> bool {
        self.search_results_visible
    }

    /// Called once a search returned results.
    pub fn show_search_results(&mut self) {
        self.search_results_visible = true;
    }

    pub fn playlist_view(&self) -> &PlaylistView {
        &self.playlist_view
    }

    pub fn open_playlist(&mut self, source: &str, id: &str) {
        self.playlist_view = PlaylistView::Detail {
            source: source.to_string(),
            id: id.to_string(),
        };
    }

    pub fn back_to_playlists(&mut self) {
        self.playlist_view = PlaylistView::Grid;
    }
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}
