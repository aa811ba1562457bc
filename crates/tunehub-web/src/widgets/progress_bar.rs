//! Download progress bar.

/// Bar markup for `progress` percent, clamped to 0..=100.
pub fn render_progress(progress: i32) -> String {
    let pct = progress.clamp(0, 100);
    format!(
        r#"<div class="progress-wrapper"><div class="progress-bar"><div class="progress-fill" style="width:{pct}%"></div></div></div>"#
    )
}
