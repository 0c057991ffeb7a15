use std::path::Path;

use crate::core::models::{ControllerView, ProgressDisplay};

const PROGRESS_BAR_WIDTH: usize = 20;
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Guesses the MIME type from the file extension, the way a browser file
/// picker would report it.
pub fn detect_mime_type(path: &Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME_TYPE.to_string())
}

pub fn render_progress(progress: &ProgressDisplay) -> String {
    let percent = progress.percent.min(100) as usize;
    let filled = percent * PROGRESS_BAR_WIDTH / 100;

    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        percent,
        progress.label
    )
}

pub fn render_result(view: &ControllerView) -> String {
    let mut rendered = String::new();
    rendered.push_str(&format!("--- {} ---\n", view.ui_state));
    rendered.push_str(&view.display_text);

    if let Some(notice) = &view.notice {
        rendered.push_str(&format!("\n\n({})", notice));
    }

    rendered
}
