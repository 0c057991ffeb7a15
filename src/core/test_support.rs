use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;

use crate::core::interfaces::adapters::{
    ClipboardService, EngineOptions, OcrEngine, OcrEngineFactory, ResultExporter, StatusCallback,
};
use crate::core::models::{EngineOutput, NativeStatus};
use crate::global_constants;

struct FakeEngineState {
    constructions: AtomicUsize,
    releases: AtomicUsize,
    recognitions: AtomicUsize,
    fail_creation: AtomicBool,
    fail_configure: AtomicBool,
    fail_recognition: AtomicBool,
    fail_release: AtomicBool,
    creation_gate: watch::Sender<bool>,
    recognition_gate: watch::Sender<bool>,
    output: Mutex<EngineOutput>,
    created_languages: Mutex<Vec<String>>,
    configured_options: Mutex<Vec<EngineOptions>>,
}

/// In-memory engine factory with switchable failures and gates that hold
/// creation or recognition until the test opens them.
#[derive(Clone)]
pub struct FakeEngineFactory {
    state: Arc<FakeEngineState>,
}

impl FakeEngineFactory {
    pub fn new() -> Self {
        Self {
            state: Arc::new(FakeEngineState {
                constructions: AtomicUsize::new(0),
                releases: AtomicUsize::new(0),
                recognitions: AtomicUsize::new(0),
                fail_creation: AtomicBool::new(false),
                fail_configure: AtomicBool::new(false),
                fail_recognition: AtomicBool::new(false),
                fail_release: AtomicBool::new(false),
                creation_gate: watch::channel(true).0,
                recognition_gate: watch::channel(true).0,
                output: Mutex::new(EngineOutput::default()),
                created_languages: Mutex::new(Vec::new()),
                configured_options: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn with_creation_gate(self) -> Self {
        self.close_creation_gate();
        self
    }

    pub fn with_recognition_gate(self) -> Self {
        self.state.recognition_gate.send_replace(false);
        self
    }

    pub fn failing_creation(self) -> Self {
        self.set_fail_creation(true);
        self
    }

    pub fn failing_configure(self) -> Self {
        self.state.fail_configure.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_recognition(self) -> Self {
        self.set_fail_recognition(true);
        self
    }

    pub fn failing_release(self) -> Self {
        self.state.fail_release.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_output(self, output: EngineOutput) -> Self {
        self.set_output(output);
        self
    }

    pub fn set_output(&self, output: EngineOutput) {
        *self.state.output.lock().unwrap() = output;
    }

    pub fn set_fail_creation(&self, fail: bool) {
        self.state.fail_creation.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_recognition(&self, fail: bool) {
        self.state.fail_recognition.store(fail, Ordering::SeqCst);
    }

    pub fn open_creation_gate(&self) {
        self.state.creation_gate.send_replace(true);
    }

    pub fn close_creation_gate(&self) {
        self.state.creation_gate.send_replace(false);
    }

    pub fn open_recognition_gate(&self) {
        self.state.recognition_gate.send_replace(true);
    }

    pub fn construction_count(&self) -> usize {
        self.state.constructions.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.state.releases.load(Ordering::SeqCst)
    }

    pub fn recognition_count(&self) -> usize {
        self.state.recognitions.load(Ordering::SeqCst)
    }

    pub fn created_languages(&self) -> Vec<String> {
        self.state.created_languages.lock().unwrap().clone()
    }

    pub fn configured_options(&self) -> Vec<EngineOptions> {
        self.state.configured_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrEngineFactory for FakeEngineFactory {
    async fn create_engine(
        &self,
        languages: &str,
        _page_segmentation_mode: i32,
        on_status: StatusCallback,
    ) -> Result<Box<dyn OcrEngine>> {
        self.state.constructions.fetch_add(1, Ordering::SeqCst);
        self.state
            .created_languages
            .lock()
            .unwrap()
            .push(languages.to_string());

        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_LOADING_CORE, 0.0));
        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_INITIALIZING, 0.0));

        let mut gate = self.state.creation_gate.subscribe();
        gate.wait_for(|open| *open).await?;

        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_LOADING_LANGUAGE, 0.0));
        if self.state.fail_creation.load(Ordering::SeqCst) {
            anyhow::bail!("language data missing");
        }
        on_status(NativeStatus::new(global_constants::NATIVE_STATUS_INITIALIZING_API, 0.0));

        Ok(Box::new(FakeEngine {
            state: Arc::clone(&self.state),
            on_status,
        }))
    }
}

struct FakeEngine {
    state: Arc<FakeEngineState>,
    on_status: StatusCallback,
}

#[async_trait]
impl OcrEngine for FakeEngine {
    async fn configure(&self, options: &EngineOptions) -> Result<()> {
        self.state
            .configured_options
            .lock()
            .unwrap()
            .push(options.clone());

        if self.state.fail_configure.load(Ordering::SeqCst) {
            anyhow::bail!("unknown parameter");
        }
        Ok(())
    }

    async fn recognize(&self, _image_bytes: &[u8]) -> Result<EngineOutput> {
        self.state.recognitions.fetch_add(1, Ordering::SeqCst);
        (self.on_status)(NativeStatus::new(global_constants::NATIVE_STATUS_RECOGNIZING, 0.0));

        let mut gate = self.state.recognition_gate.subscribe();
        gate.wait_for(|open| *open).await?;

        (self.on_status)(NativeStatus::new(global_constants::NATIVE_STATUS_RECOGNIZING, 0.5));
        if self.state.fail_recognition.load(Ordering::SeqCst) {
            anyhow::bail!("corrupt image data");
        }
        (self.on_status)(NativeStatus::new(global_constants::NATIVE_STATUS_RECOGNIZING, 1.0));

        Ok(self.state.output.lock().unwrap().clone())
    }

    async fn release(&self) -> Result<()> {
        self.state.releases.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_release.load(Ordering::SeqCst) {
            anyhow::bail!("worker did not terminate");
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingClipboard {
    copied: Arc<Mutex<Vec<String>>>,
}

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl ClipboardService for RecordingClipboard {
    fn copy_text(&self, text: &str) -> Result<()> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingExporter {
    exported: Arc<Mutex<Vec<String>>>,
}

impl RecordingExporter {
    pub fn exported(&self) -> Vec<String> {
        self.exported.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultExporter for RecordingExporter {
    async fn export_text(&self, text: &str) -> Result<std::path::PathBuf> {
        self.exported.lock().unwrap().push(text.to_string());
        Ok(std::path::PathBuf::from("ocr-result-test.txt"))
    }
}
