mod clipboard_service;
mod ocr_engine;
mod result_exporter;

pub use clipboard_service::ClipboardService;
pub use ocr_engine::{EngineOptions, OcrEngine, OcrEngineFactory, StatusCallback};
pub use result_exporter::ResultExporter;
