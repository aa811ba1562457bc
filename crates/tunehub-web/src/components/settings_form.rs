//! SettingsForm component — download directory and quality.

use std::fmt::Write as _;

use crate::app_state::UiState;
use crate::component::Component;
use crate::widgets::markup::escape_html;

/// `br` values the backend accepts, with their labels.
pub const QUALITIES: [(&str, &str); 4] = [
    ("128k", "标准 128k"),
    ("320k", "高品质 320k"),
    ("flac", "无损 FLAC"),
    ("flac24bit", "Hi-Res"),
];

pub struct SettingsForm;

impl Component for SettingsForm {
    fn element_id(&self) -> &'static str {
        "settings-form"
    }

    fn render(&self, state: &UiState) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<label>下载目录<input type="text" id="download-dir" value="{}"></label>"#,
            escape_html(&state.settings.download_dir)
        );
        html.push_str(r#"<label>音质<select id="quality-select">"#);
        for (value, label) in QUALITIES {
            let selected = if state.quality() == value { " selected" } else { "" };
            let _ = write!(html, r#"<option value="{value}"{selected}>{label}</option>"#);
        }
        html.push_str("</select></label>");
        html.push_str(r#"<button id="save-settings" onclick="saveSettings()">保存设置</button>"#);
        html
    }
}
