#![allow(dead_code)]

pub const APPLICATION_NAME: &str = "Image to Text - OCR";
pub const APPLICATION_DIR_NAME: &str = "image-to-text";

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const ENV_SERVER_PORT: &str = "PORT";
pub const ENV_ASSETS_DIR: &str = "ASSETS_DIR";

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_ASSETS_DIR: &str = "public";
pub const INDEX_FILE_NAME: &str = "index.html";

pub const DEFAULT_OCR_LANGUAGES: &str = "chi_sim+eng";
pub const DEFAULT_PAGE_SEGMENTATION_MODE: i32 = 1;
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f32 = 30.0;

pub const ACCEPTED_MIME_PREFIX: &str = "image/";

pub const NATIVE_STATUS_LOADING_CORE: &str = "loading tesseract core";
pub const NATIVE_STATUS_INITIALIZING: &str = "initializing tesseract";
pub const NATIVE_STATUS_LOADING_LANGUAGE: &str = "loading language traineddata";
pub const NATIVE_STATUS_INITIALIZING_API: &str = "initializing api";
pub const NATIVE_STATUS_RECOGNIZING: &str = "recognizing text";

pub const PROGRESS_LABEL_PREPARING: &str = "Preparing...";
pub const PROGRESS_LABEL_LOADING_CORE: &str = "Loading core engine...";
pub const PROGRESS_LABEL_INITIALIZING: &str = "Initializing Tesseract...";
pub const PROGRESS_LABEL_LOADING_LANGUAGE: &str =
    "Loading language model (first use may take a while)...";
pub const PROGRESS_LABEL_INITIALIZING_API: &str = "Initializing API...";
pub const PROGRESS_LABEL_RECOGNIZING: &str = "Recognizing...";
pub const PROGRESS_LABEL_DONE: &str = "Recognition complete!";
pub const PROGRESS_LABEL_DONE_EMPTY: &str = "Recognition complete, but no text was detected";
pub const PROGRESS_LABEL_FAILED: &str = "Recognition failed";

pub const NO_TEXT_PLACEHOLDER: &str = "No text detected";
pub const NO_TEXT_HINTS: &str = "Tips:\n\
- Make sure the image is sharp and the text has good contrast\n\
- Try a higher resolution image\n\
- Make sure the text in the image is upright";

pub const LOW_CONFIDENCE_WARNING_PREFIX: &str = "⚠️ Low recognition confidence";

pub const TROUBLESHOOTING_HEADER: &str = "Recognition failed:";
pub const TROUBLESHOOTING_STEPS: &str = "Please check:\n\
1. The image format is supported (JPG, PNG, GIF)\n\
2. Tesseract and its language data are installed\n\
3. The log output (RUST_LOG=debug) for more details\n\
4. Try again";

pub const NOTICE_COPIED: &str = "✓ Copied!";
pub const NOTICE_NOTHING_TO_COPY: &str = "There is no recognized text to copy";
pub const NOTICE_NOTHING_TO_DOWNLOAD: &str = "There is no recognized text to download";

pub const DOWNLOAD_FILE_PREFIX: &str = "ocr-result";
pub const DOWNLOAD_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

pub const STARTUP_BANNER: &str = r#"
╔════════════════════════════════════════════════════════╗
║  Image to Text - OCR                                   ║
║                                                        ║
║  Static server is running!                             ║
║                                                        ║
║  Press Ctrl+C to stop the server                       ║
║                                                        ║
╚════════════════════════════════════════════════════════╝
"#;
