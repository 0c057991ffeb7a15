use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::{EngineOutput, NativeStatus};

/// Receives engine-native status messages for the whole lifetime of an
/// engine, bring-up included.
pub type StatusCallback = Arc<dyn Fn(NativeStatus) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub page_segmentation_mode: i32,
    pub char_whitelist: String,
}

#[async_trait]
pub trait OcrEngineFactory: Send + Sync {
    async fn create_engine(
        &self,
        languages: &str,
        page_segmentation_mode: i32,
        on_status: StatusCallback,
    ) -> Result<Box<dyn OcrEngine>>;
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn configure(&self, options: &EngineOptions) -> Result<()>;

    async fn recognize(&self, image_bytes: &[u8]) -> Result<EngineOutput>;

    async fn release(&self) -> Result<()>;
}
