//! Component trait — the interface every page panel implements.
//!
//! - Components are stateless: everything they show comes from `UiState`.
//! - A component renders one HTML fragment that replaces the inner markup of
//!   a single element on the page.
//! - Components never mutate state; page actions go through `App`.

use crate::app_state::UiState;

pub trait Component {
    /// Id of the element whose content this component owns.
    fn element_id(&self) -> &'static str;

    /// Render the fragment.
    fn render(&self, state: &UiState) -> String;

    /// Fragment wrapped in its owning element.
    fn render_wrapped(&self, state: &UiState) -> String {
        format!(
            r#"<div id="{}">{}</div>"#,
            self.element_id(),
            self.render(state)
        )
    }
}
