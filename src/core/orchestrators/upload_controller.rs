use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::StreamExt;

use crate::core::errors::{ControllerError, ControllerResult, RecognitionError};
use crate::core::interfaces::adapters::{ClipboardService, ResultExporter};
use crate::core::models::{
    ControllerView, ProgressDisplay, ProgressEvent, RecognitionRequest, RecognitionResult,
    UiState, UploadedImage,
};
use crate::core::orchestrators::recognition_session::RecognitionSessionManager;
use crate::global_constants;

#[derive(Default)]
struct ControllerState {
    ui_state: UiState,
    image: Option<UploadedImage>,
    result: Option<RecognitionResult>,
    display_text: String,
    progress: ProgressDisplay,
    trigger_enabled: bool,
    notice: Option<String>,
    generation: u64,
}

impl ControllerState {
    fn reset_display(&mut self) {
        self.result = None;
        self.display_text.clear();
        self.progress = ProgressDisplay::default();
        self.notice = None;
    }
}

/// Drives the upload → preview → recognize → result flow for one front end.
/// The engine itself belongs to the session manager and outlives `clear()`.
pub struct UploadResultController {
    session: Arc<RecognitionSessionManager>,
    clipboard: Arc<dyn ClipboardService>,
    exporter: Arc<dyn ResultExporter>,
    low_confidence_threshold: f32,
    state: Mutex<ControllerState>,
}

impl UploadResultController {
    pub fn build(
        session: Arc<RecognitionSessionManager>,
        clipboard: Arc<dyn ClipboardService>,
        exporter: Arc<dyn ResultExporter>,
        low_confidence_threshold: f32,
    ) -> Self {
        Self {
            session,
            clipboard,
            exporter,
            low_confidence_threshold,
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn view(&self) -> ControllerView {
        let state = self.lock_state();
        ControllerView {
            ui_state: state.ui_state,
            preview_data_url: state.image.as_ref().map(|image| image.data_url.clone()),
            display_text: state.display_text.clone(),
            progress: state.progress.clone(),
            trigger_enabled: state.trigger_enabled,
            notice: state.notice.clone(),
        }
    }

    pub fn accept_image(&self, file_bytes: Vec<u8>, mime_type: &str) -> ControllerResult<()> {
        if !UploadedImage::is_supported_mime_type(mime_type) {
            log::warn!(
                "[CONTROLLER] Rejecting upload with unsupported type '{}'",
                mime_type
            );
            return Err(ControllerError::UnsupportedFileType {
                mime_type: mime_type.to_string(),
            });
        }

        let image = UploadedImage::build_from_bytes(file_bytes, mime_type);
        let mut state = self.lock_state();

        log::info!(
            "[CONTROLLER] Accepted {} image ({} bytes) in state {}, now previewing",
            image.mime_type,
            image.byte_len(),
            state.ui_state
        );

        state.generation += 1;
        state.reset_display();
        state.image = Some(image);
        state.ui_state = UiState::Previewing;
        state.trigger_enabled = true;

        Ok(())
    }

    /// Runs one recognition to completion. Engine failures are rendered into
    /// the view rather than returned; only contract violations are errors.
    pub async fn start_recognition(&self) -> ControllerResult<()> {
        let (generation, request) = self.begin_recognition()?;

        let (progress_sender, mut progress_stream) =
            RecognitionSessionManager::progress_channel();
        let recognition = self
            .session
            .recognize(&request, Some(progress_sender));
        let progress_pump = async {
            while let Some(event) = progress_stream.next().await {
                self.handle_progress(generation, event);
            }
        };

        let (outcome, ()) = futures::join!(recognition, progress_pump);
        self.handle_recognition_complete(generation, outcome);

        Ok(())
    }

    pub fn copy_result(&self) -> ControllerResult<()> {
        let text = self.recognized_text(global_constants::NOTICE_NOTHING_TO_COPY)
            .ok_or(ControllerError::NothingToCopy)?;

        self.clipboard
            .copy_text(&text)
            .map_err(ControllerError::Clipboard)?;

        log::info!("[CONTROLLER] Copied {} characters", text.chars().count());
        self.lock_state().notice = Some(global_constants::NOTICE_COPIED.to_string());
        Ok(())
    }

    pub async fn download_result(&self) -> ControllerResult<PathBuf> {
        let text = self
            .recognized_text(global_constants::NOTICE_NOTHING_TO_DOWNLOAD)
            .ok_or(ControllerError::NothingToDownload)?;

        let path = self
            .exporter
            .export_text(&text)
            .await
            .map_err(ControllerError::Export)?;

        log::info!("[CONTROLLER] Saved result to {:?}", path);
        self.lock_state().notice = Some(format!("Saved to {}", path.display()));
        Ok(path)
    }

    pub fn clear(&self) {
        let mut state = self.lock_state();
        log::info!("[CONTROLLER] Clearing from state {}", state.ui_state);

        let generation = state.generation + 1;
        *state = ControllerState {
            generation,
            ..ControllerState::default()
        };
    }

    /// Best effort: release failures are logged and swallowed.
    pub async fn teardown(&self) {
        log::info!("[CONTROLLER] Tearing down, releasing OCR engine");
        if let Err(error) = self.session.release().await {
            log::error!("[CONTROLLER] Engine release failed during teardown: {:#}", error);
        }
    }

    fn begin_recognition(&self) -> ControllerResult<(u64, RecognitionRequest)> {
        let mut state = self.lock_state();

        let state_allows_start = matches!(
            state.ui_state,
            UiState::Previewing | UiState::ResultShown | UiState::Error
        );
        let image = match &state.image {
            Some(image) if state_allows_start && state.trigger_enabled => image,
            _ => {
                log::warn!(
                    "[CONTROLLER] start_recognition rejected in state {}",
                    state.ui_state
                );
                return Err(ControllerError::InvalidState {
                    operation: "start_recognition",
                    state: state.ui_state,
                });
            }
        };

        let request = RecognitionRequest::build(image.bytes(), image.mime_type.clone());

        state.reset_display();
        state.ui_state = UiState::Recognizing;
        state.trigger_enabled = false;
        state.progress = ProgressDisplay {
            visible: true,
            percent: 0,
            label: global_constants::PROGRESS_LABEL_PREPARING.to_string(),
        };

        log::info!(
            "[CONTROLLER] Recognition {} started (generation {}, engine {:?})",
            request.id,
            state.generation,
            self.session.initialization_state()
        );

        Ok((state.generation, request))
    }

    fn handle_progress(&self, generation: u64, event: ProgressEvent) {
        let mut state = self.lock_state();
        if state.generation != generation || state.ui_state != UiState::Recognizing {
            return;
        }

        state.progress.percent = state.progress.percent.max(event.percent_complete).min(100);
        state.progress.label = event.display_label();
    }

    fn handle_recognition_complete(
        &self,
        generation: u64,
        outcome: Result<RecognitionResult, RecognitionError>,
    ) {
        let mut state = self.lock_state();
        if state.generation != generation {
            log::info!(
                "[CONTROLLER] Discarding late recognition outcome for generation {} (current {})",
                generation,
                state.generation
            );
            return;
        }

        state.trigger_enabled = true;

        match outcome {
            Ok(result) => {
                state.display_text =
                    Self::render_result_text(&result, self.low_confidence_threshold);
                state.progress.percent = 100;
                state.progress.label = if result.has_text() {
                    global_constants::PROGRESS_LABEL_DONE.to_string()
                } else {
                    global_constants::PROGRESS_LABEL_DONE_EMPTY.to_string()
                };
                state.result = Some(result);
                state.ui_state = UiState::ResultShown;
            }
            Err(error) => {
                log::error!("[CONTROLLER] Recognition failed: {}", error);
                state.display_text = Self::render_troubleshooting(&error);
                state.progress.percent = 0;
                state.progress.label = global_constants::PROGRESS_LABEL_FAILED.to_string();
                state.ui_state = UiState::Error;
            }
        }
    }

    /// Text shown to the user; the stored result is never modified.
    pub fn render_result_text(result: &RecognitionResult, low_confidence_threshold: f32) -> String {
        let mut text = if result.has_text() {
            result.text.clone()
        } else {
            format!(
                "{}\n\n{}",
                global_constants::NO_TEXT_PLACEHOLDER,
                global_constants::NO_TEXT_HINTS
            )
        };

        if let Some(average) = result.average_confidence() {
            log::debug!("[CONTROLLER] Average confidence: {:.1}", average);
            if average < low_confidence_threshold {
                text.push_str(&format!(
                    "\n\n{} ({}%), the result may be inaccurate",
                    global_constants::LOW_CONFIDENCE_WARNING_PREFIX,
                    average.round() as i32
                ));
            }
        }

        text
    }

    pub fn render_troubleshooting(error: &RecognitionError) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            global_constants::TROUBLESHOOTING_HEADER,
            error,
            global_constants::TROUBLESHOOTING_STEPS
        )
    }

    fn recognized_text(&self, empty_notice: &str) -> Option<String> {
        let mut state = self.lock_state();
        match &state.result {
            Some(result) if result.has_text() => Some(result.text.clone()),
            _ => {
                state.notice = Some(empty_notice.to_string());
                None
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
