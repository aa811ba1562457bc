//! Page panels. Each one renders an HTML fragment from `UiState`.

pub mod download_list;
pub mod library_list;
pub mod list_panel;
pub mod playlist_grid;
pub mod settings_form;
pub mod toplist_tabs;

use crate::action::{ListContext, Page};
use crate::app_state::UiState;
use crate::component::Component;
use download_list::DownloadList;
use library_list::LibraryList;
use list_panel::ListPanel;
use playlist_grid::{source_select, PlaylistGrid};
use settings_form::SettingsForm;
use toplist_tabs::ToplistTabs;

/// The section for `page`, as swapped into the shell's `#page` element.
pub fn render_page(page: Page, state: &UiState) -> String {
    let body = match page {
        Page::Home => render_home(state),
        Page::Playlist => PlaylistGrid.render_wrapped(state),
        Page::Downloads => DownloadList.render_wrapped(state),
        Page::Library => format!(
            r#"<div class="section-actions"><button id="refresh-library-btn" onclick="refreshLibrary()">刷新</button></div>{}"#,
            LibraryList.render_wrapped(state)
        ),
        Page::Settings => SettingsForm.render_wrapped(state),
    };
    format!(
        r#"<section id="{}" data-page="{}">{}</section>"#,
        page.section_id(),
        page.as_str(),
        body
    )
}

fn render_home(state: &UiState) -> String {
    let mut html = String::new();
    html.push_str(r#"<div class="search-bar">"#);
    html.push_str(&source_select("source-select", &state.sources, &state.source));
    html.push_str(r#"<input type="text" id="search-input" placeholder="搜索歌曲、歌手">"#);
    html.push_str(r#"<button id="search-btn" onclick="doSearch()">搜索</button></div>"#);

    if state.router.search_results_visible() {
        html.push_str(r#"<div id="search-results-section">"#);
        html.push_str(&ListPanel::new(ListContext::Search).render_wrapped(state));
        html.push_str("</div>");
    }

    html.push_str(&render_toplists(state));
    html
}

/// Toplist tabs plus the active chart's songs.
pub fn render_toplists(state: &UiState) -> String {
    format!(
        r#"<div class="toplist-section" id="toplist-section">{}{}</div>"#,
        ToplistTabs.render_wrapped(state),
        ListPanel::new(ListContext::Toplist).render_wrapped(state)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunehub_proto::config::UiConfig;

    #[test]
    fn home_hides_search_panel_until_search() {
        let mut state = UiState::new(&UiConfig::default());
        let html = render_page(Page::Home, &state);
        assert!(html.starts_with(r#"<section id="home-section""#));
        assert!(!html.contains("search-results-section"));
        assert!(html.contains(r#"<div id="toplist-tabs">"#));

        state.router.show_search_results();
        let html = render_page(Page::Home, &state);
        assert!(html.contains(r#"<div id="search-results">"#));
    }

    #[test]
    fn every_page_has_its_section() {
        let state = UiState::new(&UiConfig::default());
        for page in Page::ALL {
            let html = render_page(page, &state);
            assert!(html.contains(&format!(r#"id="{}""#, page.section_id())));
        }
    }
}
