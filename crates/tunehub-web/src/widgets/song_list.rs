//! Song row and song list markup.
//!
//! Row order is significant: a row's position is the index the selection
//! handlers address it by.

use std::fmt::Write as _;

use tunehub_proto::songs::{DownloadedMap, Song};

use super::markup::{escape_html, escape_js_arg};

/// Shown instead of rows when a list is empty.
pub const NO_SONGS_PLACEHOLDER: &str = r#"<div class="no-results">暂无歌曲</div>"#;

/// Static marker replacing the download button on downloaded rows.
pub const DOWNLOADED_TAG: &str = r#"<span class="downloaded-tag">已下载</span>"#;

/// Display options for one row. `Default` matches a search result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOptions<'a> {
    /// Context tag routed back through `toggleSongSelect`.
    pub list_type: &'a str,
    /// Source passed to `downloadSong`; falls back to the song's own source.
    pub source: &'a str,
    pub is_downloaded: bool,
    pub is_selected: bool,
    pub show_checkbox: bool,
    pub show_artist: bool,
    pub show_album: bool,
    pub show_types: bool,
    pub show_download_btn: bool,
}

impl Default for RowOptions<'_> {
    fn default() -> Self {
        Self {
            list_type: "search",
            source: "",
            is_downloaded: false,
            is_selected: false,
            show_checkbox: true,
            show_artist: true,
            show_album: true,
            show_types: false,
            show_download_btn: true,
        }
    }
}

impl<'a> RowOptions<'a> {
    pub fn for_list(list_type: &'a str, source: &'a str) -> Self {
        Self {
            list_type,
            source,
            ..Self::default()
        }
    }

    /// Read-only rows: no checkbox, no download button.
    pub fn library() -> Self {
        Self {
            list_type: "library",
            show_checkbox: false,
            show_download_btn: false,
            ..Self::default()
        }
    }
}

/// One song plus its per-row state, as fed to [`render_rows`].
#[derive(Debug, Clone, Copy)]
pub struct RowState<'s> {
    pub song: &'s Song,
    pub downloaded: bool,
    pub selected: bool,
}

pub fn render_song_item(song: &Song, index: usize, options: &RowOptions<'_>) -> String {
    let mut html = String::with_capacity(512);
    let list_type = escape_js_arg(options.list_type);

    let _ = write!(html, r#"<div class="song-item" data-index="{index}">"#);

    if options.show_checkbox {
        let disabled = if options.is_downloaded { " disabled" } else { "" };
        let checked = if options.is_selected && !options.is_downloaded {
            " checked"
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<input type="checkbox" class="song-checkbox" data-type="{list_type}" data-index="{index}"{disabled}{checked} onchange="toggleSongSelect('{list_type}', {index})">"#,
        );
    }

    let _ = write!(html, r#"<span class="index">{}</span>"#, index + 1);
    let _ = write!(
        html,
        r#"<div class="song-info"><div class="song-name">{}</div>"#,
        escape_html(&song.name)
    );
    match song.type_tags() {
        Some(tags) if options.show_types => {
            let _ = write!(
                html,
                r#"<div class="song-subtitle">{}</div>"#,
                escape_html(&tags.join(" / "))
            );
        }
        _ if options.show_artist => {
            let _ = write!(
                html,
                r#"<div class="song-subtitle">{}</div>"#,
                escape_html(song.artist_or_empty())
            );
        }
        _ => {}
    }
    html.push_str("</div>");

    if options.show_album && !song.album_or_empty().is_empty() {
        let _ = write!(
            html,
            r#"<span class="album">{}</span>"#,
            escape_html(song.album_or_empty())
        );
    }

    if options.is_downloaded {
        html.push_str(DOWNLOADED_TAG);
    } else if options.show_download_btn {
        let source = if options.source.is_empty() {
            song.source.as_str()
        } else {
            options.source
        };
        let _ = write!(
            html,
            r#"<button class="download-btn" onclick="downloadSong('{}', '{}', '{}', '{}', '{}')">下载</button>"#,
            escape_js_arg(source),
            escape_js_arg(&song.id),
            escape_js_arg(&song.name),
            escape_js_arg(song.artist_or_empty()),
            escape_js_arg(song.album_or_empty()),
        );
    }

    html.push_str("</div>");
    html
}

/// Render `songs` in order, looking each id up in `downloaded`.
pub fn render_song_list(songs: &[Song], downloaded: &DownloadedMap, options: &RowOptions<'_>) -> String {
    render_rows(
        songs.iter().map(|song| RowState {
            song,
            downloaded: downloaded.is_downloaded(&song.id),
            selected: false,
        }),
        options,
    )
}

/// Render rows whose downloaded/selected state is already known.
pub fn render_rows<'s>(rows: impl IntoIterator<Item = RowState<'s>>, options: &RowOptions<'_>) -> String {
    let mut html = String::new();
    for (index, row) in rows.into_iter().enumerate() {
        let row_options = RowOptions {
            is_downloaded: row.downloaded,
            is_selected: row.selected,
            ..*options
        };
        html.push_str(&render_song_item(row.song, index, &row_options));
    }
    if html.is_empty() {
        return NO_SONGS_PLACEHOLDER.to_string();
    }
    html
}
