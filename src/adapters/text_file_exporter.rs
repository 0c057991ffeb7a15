use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::core::interfaces::adapters::ResultExporter;
use crate::global_constants;

/// Writes results as `ocr-result-<timestamp>.txt` into a fixed directory.
pub struct TextFileExporter {
    output_dir: PathBuf,
}

impl TextFileExporter {
    pub fn build(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn file_name_for(timestamp: DateTime<Local>) -> String {
        format!(
            "{}-{}.txt",
            global_constants::DOWNLOAD_FILE_PREFIX,
            timestamp.format(global_constants::DOWNLOAD_TIMESTAMP_FORMAT)
        )
    }
}

#[async_trait]
impl ResultExporter for TextFileExporter {
    async fn export_text(&self, text: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create directory {:?}", self.output_dir))?;

        let path = self.output_dir.join(Self::file_name_for(Local::now()));
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;

        log::info!("[EXPORTER] Wrote {} bytes to {:?}", text.len(), path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_name_contains_timestamp() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        assert_eq!(
            TextFileExporter::file_name_for(timestamp),
            "ocr-result-20240309-140507.txt"
        );
    }

    #[tokio::test]
    async fn test_export_text_writes_file_into_output_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let exporter = TextFileExporter::build(temp_dir.path().join("downloads"));

        let path = exporter.export_text("识别结果\nline two").await.unwrap();

        assert!(path.starts_with(temp_dir.path().join("downloads")));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("ocr-result-"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "识别结果\nline two");
    }
}
