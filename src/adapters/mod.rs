mod arboard_clipboard;
mod tesseract_ocr_engine;
mod text_file_exporter;

pub use arboard_clipboard::ArboardClipboard;
pub use tesseract_ocr_engine::TesseractEngineFactory;
pub use text_file_exporter::TextFileExporter;
