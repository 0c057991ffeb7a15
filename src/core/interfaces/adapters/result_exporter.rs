use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ResultExporter: Send + Sync {
    /// Persists `text` and returns where it ended up.
    async fn export_text(&self, text: &str) -> Result<PathBuf>;
}
