//! ToplistTabs component — one tab per chart, active tab highlighted.

use std::fmt::Write as _;

use crate::app_state::{ToplistStatus, UiState};
use crate::component::Component;
use crate::widgets::markup::{escape_html, escape_js_arg};

pub struct ToplistTabs;

impl Component for ToplistTabs {
    fn element_id(&self) -> &'static str {
        "toplist-tabs"
    }

    fn render(&self, state: &UiState) -> String {
        if state.toplist_status == ToplistStatus::TabsFailed {
            return r#"<span class="no-results">加载排行榜失败</span>"#.to_string();
        }

        let source = escape_js_arg(&state.source);
        let mut html = String::new();
        for tab in &state.toplists {
            let active = if state.active_toplist.as_deref() == Some(tab.id.as_str()) {
                " active"
            } else {
                ""
            };
            let _ = write!(
                html,
                r#"<div class="toplist-tab{active}" data-id="{}" onclick="selectToplist('{source}', '{}')"><span class="tab-name">{}</span>"#,
                escape_html(&tab.id),
                escape_js_arg(&tab.id),
                escape_html(&tab.name),
            );
            if let Some(freq) = tab.update_frequency.as_deref().filter(|f| !f.is_empty()) {
                let _ = write!(html, r#"<span class="tab-freq">{}</span>"#, escape_html(freq));
            }
            html.push_str("</div>");
        }
        html
    }
}
