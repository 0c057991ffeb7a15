use anyhow::{Context, Result};

use crate::core::interfaces::adapters::ClipboardService;

pub struct ArboardClipboard;

impl ArboardClipboard {
    pub fn build() -> Self {
        Self
    }
}

impl ClipboardService for ArboardClipboard {
    fn copy_text(&self, text: &str) -> Result<()> {
        log::debug!("[CLIPBOARD] Copying {} characters", text.chars().count());
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(text))
            .context("Failed to copy to clipboard")?;
        log::info!("[CLIPBOARD] Text copied to clipboard");
        Ok(())
    }
}
