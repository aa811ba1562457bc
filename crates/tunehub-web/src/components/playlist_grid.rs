//! PlaylistGrid component — imported playlists as cards, or the open one.

use std::fmt::Write as _;

use crate::action::ListContext;
use crate::app_state::UiState;
use crate::component::Component;
use crate::components::list_panel::ListPanel;
use crate::widgets::markup::{escape_html, escape_js_arg};

pub const NO_PLAYLISTS: &str = r#"<div class="no-results">暂无导入的歌单，请输入歌单ID导入</div>"#;

pub struct PlaylistGrid;

impl PlaylistGrid {
    fn render_grid(&self, state: &UiState) -> String {
        let mut html = String::new();
        html.push_str(r#"<div class="playlist-import-form"><input type="text" id="playlist-id-input" placeholder="歌单ID">"#);
        html.push_str(&source_select("playlist-source", &state.sources, &state.source));
        html.push_str(r#"<button id="import-playlist-btn" onclick="importPlaylist()">导入歌单</button></div>"#);

        html.push_str(r#"<div class="playlist-grid" id="playlist-grid">"#);
        if state.playlists.is_empty() {
            html.push_str(NO_PLAYLISTS);
        }
        for record in &state.playlists {
            let id = escape_js_arg(&record.id);
            let source = escape_js_arg(&record.source);
            let _ = write!(
                html,
                r#"<div class="playlist-card" onclick="openPlaylist('{source}', '{id}')"><div class="playlist-card-content"><div class="playlist-title">{}</div><div class="playlist-meta">{} · {} 首</div></div><button class="delete-playlist-btn" onclick="event.stopPropagation(); deletePlaylist('{source}', '{id}')">删除</button></div>"#,
                escape_html(&record.name),
                escape_html(&record.author),
                record.songs.len(),
            );
        }
        html.push_str("</div>");
        html
    }

    fn render_detail(&self, state: &UiState) -> String {
        let (name, author) = state
            .open_playlist()
            .map(|p| (p.name.as_str(), p.author.as_str()))
            .unwrap_or_default();
        let panel = ListPanel::new(ListContext::Playlist);
        format!(
            r#"<div class="playlist-detail" id="playlist-detail"><div class="playlist-detail-header"><button class="back-btn" onclick="showPlaylistGrid()">返回</button><span id="playlist-detail-name">{}</span><span id="playlist-detail-author">{}</span></div>{}</div>"#,
            escape_html(name),
            escape_html(author),
            panel.render_wrapped(state)
        )
    }
}

impl Component for PlaylistGrid {
    fn element_id(&self) -> &'static str {
        "playlist-content"
    }

    fn render(&self, state: &UiState) -> String {
        if state.open_playlist().is_some() {
            self.render_detail(state)
        } else {
            self.render_grid(state)
        }
    }
}

/// `<select>` over the configured sources with `current` preselected.
pub fn source_select(id: &str, sources: &[String], current: &str) -> String {
    let mut html = format!(r#"<select id="{}">"#, escape_html(id));
    for source in sources {
        let selected = if source == current { " selected" } else { "" };
        let source = escape_html(source);
        let _ = write!(html, r#"<option value="{source}"{selected}>{source}</option>"#);
    }
    html.push_str("</select>");
    html
}
