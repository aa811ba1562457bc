//! ListPanel component — a selectable song list with its batch bar.
//!
//! The bar carries the select-all checkbox, the `已选 N 首` counter and the
//! batch button; the rows come from the context store.

use std::fmt::Write as _;

use crate::action::ListContext;
use crate::app_state::UiState;
use crate::component::Component;
use crate::widgets::song_list::{render_rows, RowOptions};

/// Shown in the search panel when a search came back empty.
pub const NO_SEARCH_RESULTS: &str = r#"<div class="no-results">未找到相关歌曲</div>"#;

pub struct ListPanel {
    pub context: ListContext,
}

impl ListPanel {
    pub fn new(context: ListContext) -> Self {
        Self { context }
    }

    fn batch_bar(&self, state: &UiState) -> String {
        let ctx = state.contexts.get(self.context);
        let tag = self.context.as_str();
        let checked = if ctx.select_all_checked() { " checked" } else { "" };
        let (label, disabled) = if ctx.is_batch_running() {
            ("下载中...", " disabled")
        } else {
            ("批量下载", "")
        };

        let mut html = String::with_capacity(512);
        let _ = write!(html, r#"<div class="batch-actions" id="{tag}-batch-actions">"#);
        let _ = write!(
            html,
            r#"<label class="select-all"><input type="checkbox" id="{tag}-select-all"{checked} onchange="selectAll('{tag}', this.checked)"> 全选</label>"#,
        );
        let _ = write!(
            html,
            r#"<span class="selected-count" id="{tag}-selected-count">已选 {} 首</span>"#,
            ctx.count()
        );
        let _ = write!(
            html,
            r#"<button class="batch-download-btn" id="{tag}-batch-download"{disabled} onclick="batchDownload('{tag}')">{label}</button>"#,
        );
        html.push_str("</div>");
        html
    }
}

impl Component for ListPanel {
    fn element_id(&self) -> &'static str {
        self.context.list_element_id()
    }

    fn render(&self, state: &UiState) -> String {
        let ctx = state.contexts.get(self.context);

        if ctx.is_empty() {
            if self.context == ListContext::Search {
                return NO_SEARCH_RESULTS.to_string();
            }
            if self.context == ListContext::Toplist {
                if let Some(message) = state.toplist_status.message() {
                    return format!(r#"<div class="no-results">{message}</div>"#);
                }
            }
        }

        let options = RowOptions::for_list(self.context.as_str(), ctx.source());
        let rows = render_rows(ctx.rows(), &options);
        if ctx.is_empty() {
            return rows;
        }
        format!("{}{}", self.batch_bar(state), rows)
    }
}
