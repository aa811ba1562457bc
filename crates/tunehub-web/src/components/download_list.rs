//! DownloadList component — the backend's download queue.

use std::fmt::Write as _;

use crate::app_state::UiState;
use crate::component::Component;
use crate::widgets::markup::escape_html;
use crate::widgets::progress_bar::render_progress;

pub const NO_DOWNLOADS: &str = r#"<div class="no-results">暂无下载任务</div>"#;

pub struct DownloadList;

impl Component for DownloadList {
    fn element_id(&self) -> &'static str {
        "download-list"
    }

    fn render(&self, state: &UiState) -> String {
        if state.downloads.is_empty() {
            return NO_DOWNLOADS.to_string();
        }
        let mut html = String::new();
        for task in &state.downloads {
            let _ = write!(
                html,
                r#"<div class="download-item"><div class="song-info"><div class="song-name">{}</div><div class="artist">{}</div></div>{}<span class="status {}">{}</span>"#,
                escape_html(&task.name),
                escape_html(&task.artist),
                render_progress(task.progress),
                task.status.css_class(),
                task.status.label(),
            );
            if let Some(err) = task.error.as_deref().filter(|e| !e.is_empty()) {
                let _ = write!(html, r#"<span class="error">{}</span>"#, escape_html(err));
            }
            html.push_str("</div>");
        }
        html
    }
}
