//! LibraryList component — downloaded songs, read-only.

use tunehub_proto::songs::DownloadedMap;

use crate::app_state::UiState;
use crate::component::Component;
use crate::widgets::song_list::{render_song_list, RowOptions};

pub const EMPTY_LIBRARY: &str = r#"<div class="no-results">暂无已下载歌曲</div>"#;

pub struct LibraryList;

impl Component for LibraryList {
    fn element_id(&self) -> &'static str {
        "library-list"
    }

    fn render(&self, state: &UiState) -> String {
        if state.library.is_empty() {
            return EMPTY_LIBRARY.to_string();
        }
        // Everything in the library is downloaded
        let downloaded = DownloadedMap::all_of(&state.library);
        render_song_list(&state.library, &downloaded, &RowOptions::library())
    }
}
