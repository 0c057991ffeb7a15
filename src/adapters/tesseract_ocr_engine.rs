use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusty_tesseract::{Args, Image as TesseractImage};

use crate::core::interfaces::adapters::{
    EngineOptions, OcrEngine, OcrEngineFactory, StatusCallback,
};
use crate::core::models::{EngineOutput, NativeStatus, RecognizedWord};
use crate::global_constants;

const TESSERACT_WORD_LEVEL: i32 = 5;
const CHAR_WHITELIST_VARIABLE: &str = "tessedit_char_whitelist";

pub struct TesseractEngineFactory;

impl TesseractEngineFactory {
    pub fn build() -> Self {
        log::info!("[TESSERACT_OCR] Using the system Tesseract installation");
        Self
    }

    fn parse_languages(languages: &str) -> Vec<String> {
        languages
            .split('+')
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn find_missing_languages(requested: &[String], installed: &[String]) -> Vec<String> {
        requested
            .iter()
            .filter(|language| !installed.contains(language))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl OcrEngineFactory for TesseractEngineFactory {
    async fn create_engine(
        &self,
        languages: &str,
        page_segmentation_mode: i32,
        on_status: StatusCallback,
    ) -> Result<Box<dyn OcrEngine>> {
        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_LOADING_CORE, 0.0));
        let version = tokio::task::spawn_blocking(rusty_tesseract::get_tesseract_version)
            .await
            .context("Tesseract version check was interrupted")?
            .context("Tesseract executable is not available")?;
        log::info!("[TESSERACT_OCR] Found Tesseract {}", version.trim());
        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_LOADING_CORE, 1.0));

        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_INITIALIZING, 0.0));
        let requested = Self::parse_languages(languages);
        if requested.is_empty() {
            anyhow::bail!("No OCR languages configured");
        }
        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_INITIALIZING, 1.0));

        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_LOADING_LANGUAGE, 0.0));
        let installed = tokio::task::spawn_blocking(rusty_tesseract::get_tesseract_langs)
            .await
            .context("Tesseract language lookup was interrupted")?
            .context("Failed to list installed Tesseract languages")?;
        let missing = Self::find_missing_languages(&requested, &installed);
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing Tesseract language data: {} (installed: {})",
                missing.join(", "),
                installed.join(", ")
            );
        }
        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_LOADING_LANGUAGE, 1.0));

        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_INITIALIZING_API, 0.0));
        let args = Args {
            lang: requested.join("+"),
            psm: Some(page_segmentation_mode),
            ..Args::default()
        };
        log::debug!("[TESSERACT_OCR] Engine arguments: {:?}", args);
        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_INITIALIZING_API, 1.0));

        Ok(Box::new(TesseractOcrEngine::build(args, on_status)))
    }
}

/// One row of `image_to_data` output that we care about.
#[derive(Debug, Clone, PartialEq)]
struct WordRow {
    level: i32,
    page_num: i32,
    block_num: i32,
    par_num: i32,
    line_num: i32,
    conf: f32,
    text: String,
}

impl From<&rusty_tesseract::Data> for WordRow {
    fn from(data: &rusty_tesseract::Data) -> Self {
        Self {
            level: data.level,
            page_num: data.page_num,
            block_num: data.block_num,
            par_num: data.par_num,
            line_num: data.line_num,
            conf: data.conf,
            text: data.text.clone(),
        }
    }
}

pub struct TesseractOcrEngine {
    args: Mutex<Args>,
    on_status: StatusCallback,
    released: AtomicBool,
}

impl TesseractOcrEngine {
    fn build(args: Args, on_status: StatusCallback) -> Self {
        Self {
            args: Mutex::new(args),
            on_status,
            released: AtomicBool::new(false),
        }
    }

    fn report(&self, progress: f32) {
        (self.on_status)(NativeStatus::new(
            global_constants::NATIVE_STATUS_RECOGNIZING,
            progress,
        ));
    }

    fn current_args(&self) -> Args {
        self.args
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rebuilds text from word rows: words on a line are joined by spaces,
    /// lines by newlines, and paragraphs or blocks by a blank line.
    fn assemble_output(rows: &[WordRow]) -> EngineOutput {
        let mut text = String::new();
        let mut words = Vec::new();
        let mut previous_key: Option<(i32, i32, i32, i32)> = None;

        for row in rows {
            let content = row.text.trim();
            if row.level != TESSERACT_WORD_LEVEL || content.is_empty() {
                continue;
            }

            let key = (row.page_num, row.block_num, row.par_num, row.line_num);
            if let Some(previous) = previous_key {
                if previous == key {
                    text.push(' ');
                } else if (previous.0, previous.1, previous.2) == (key.0, key.1, key.2) {
                    text.push('\n');
                } else {
                    text.push_str("\n\n");
                }
            }
            previous_key = Some(key);

            text.push_str(content);
            words.push(RecognizedWord::new(content, row.conf));
        }

        EngineOutput { text, words }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcrEngine {
    async fn configure(&self, options: &EngineOptions) -> Result<()> {
        let mut args = self.args.lock().unwrap_or_else(PoisonError::into_inner);
        args.psm = Some(options.page_segmentation_mode);

        if options.char_whitelist.is_empty() {
            args.config_variables.remove(CHAR_WHITELIST_VARIABLE);
        } else {
            args.config_variables.insert(
                CHAR_WHITELIST_VARIABLE.to_string(),
                options.char_whitelist.clone(),
            );
        }

        log::debug!("[TESSERACT_OCR] Configured with {:?}", options);
        Ok(())
    }

    async fn recognize(&self, image_bytes: &[u8]) -> Result<EngineOutput> {
        if self.released.load(Ordering::SeqCst) {
            anyhow::bail!("Tesseract engine has been released");
        }

        log::info!("[TESSERACT_OCR] Starting text extraction");
        self.report(0.0);

        let image = image::load_from_memory(image_bytes).context("Failed to decode image")?;
        log::debug!(
            "[TESSERACT_OCR] Image dimensions: {}x{}",
            image.width(),
            image.height()
        );

        let args = self.current_args();
        let data = tokio::task::spawn_blocking(move || -> Result<rusty_tesseract::DataOutput> {
            let tesseract_image = TesseractImage::from_dynamic_image(&image)
                .context("Failed to create Tesseract image")?;
            rusty_tesseract::image_to_data(&tesseract_image, &args)
                .context("Failed to extract text from image")
        })
        .await
        .context("Tesseract recognition was interrupted")??;

        let rows: Vec<WordRow> = data.data.iter().map(WordRow::from).collect();
        let output = Self::assemble_output(&rows);
        self.report(1.0);

        log::info!(
            "[TESSERACT_OCR] Text extraction complete. Extracted {} characters in {} words",
            output.text.chars().count(),
            output.words.len()
        );
        log::debug!("[TESSERACT_OCR] Extracted text: {}", output.text);

        Ok(output)
    }

    async fn release(&self) -> Result<()> {
        if !self.released.swap(true, Ordering::SeqCst) {
            log::info!("[TESSERACT_OCR] Engine released");
        }
        Ok(())
    }
}
