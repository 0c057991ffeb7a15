mod app_settings;
mod ocr;
mod progress;
mod ui_state;
mod uploaded_image;

pub use app_settings::AppSettings;
pub use ocr::{EngineOutput, RecognitionRequest, RecognitionResult, RecognizedWord};
pub use progress::{report_progress, NativeStatus, ProgressEvent, ProgressPhase, ProgressTracker};
pub use ui_state::{ControllerView, ProgressDisplay, UiState};
pub use uploaded_image::UploadedImage;
