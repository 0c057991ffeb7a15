use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use anyhow::Context;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::core::errors::{EngineInitializationError, RecognitionError};
use crate::core::interfaces::adapters::{
    EngineOptions, OcrEngine, OcrEngineFactory, StatusCallback,
};
use crate::core::models::{
    report_progress, NativeStatus, ProgressEvent, ProgressPhase, ProgressTracker,
    RecognitionRequest, RecognitionResult,
};

pub type EngineHandle = Arc<dyn OcrEngine>;
pub type ProgressSender = UnboundedSender<ProgressEvent>;
pub type ProgressStream = UnboundedReceiver<ProgressEvent>;

type InitializationOutcome = Result<EngineHandle, EngineInitializationError>;
type PendingInitialization = Shared<BoxFuture<'static, InitializationOutcome>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializationState {
    Uninitialized,
    Initializing,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub languages: String,
    pub page_segmentation_mode: i32,
}

enum EngineSlot {
    Uninitialized,
    Initializing {
        epoch: u64,
        pending: PendingInitialization,
    },
    Ready {
        epoch: u64,
        engine: EngineHandle,
    },
}

struct ProgressRoute {
    tracker: ProgressTracker,
    sender: ProgressSender,
}

impl ProgressRoute {
    fn forward(&mut self, event: ProgressEvent) {
        if let Some(event) = self.tracker.observe(event) {
            let _ = self.sender.unbounded_send(event);
        }
    }
}

struct SessionShared {
    slot: Mutex<EngineSlot>,
    epoch_counter: AtomicU64,
    progress_route: Mutex<Option<ProgressRoute>>,
}

impl SessionShared {
    fn lock_slot(&self) -> MutexGuard<'_, EngineSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_route(&self) -> MutexGuard<'_, Option<ProgressRoute>> {
        self.progress_route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current_epoch(&self, epoch: u64) -> bool {
        match &*self.lock_slot() {
            EngineSlot::Initializing { epoch: current, .. }
            | EngineSlot::Ready { epoch: current, .. } => *current == epoch,
            EngineSlot::Uninitialized => false,
        }
    }

    /// Statuses from an engine that is no longer the session's current one
    /// are dropped so they never mix into another attempt's stream.
    fn route_native_status(&self, epoch: u64, native: &NativeStatus) {
        if !self.is_current_epoch(epoch) {
            log::trace!(
                "[SESSION] Dropping status '{}' from stale epoch {}",
                native.status,
                epoch
            );
            return;
        }

        let Some(event) = report_progress(native) else {
            log::trace!("[SESSION] Ignoring engine status '{}'", native.status);
            return;
        };

        if let Some(route) = self.lock_route().as_mut() {
            route.forward(event);
        }
    }

    /// Moves the slot out of `Initializing` if `epoch` is still the current
    /// attempt. A handle produced by an abandoned attempt is handed back so the
    /// caller can release it.
    fn complete_initialization(
        &self,
        epoch: u64,
        outcome: anyhow::Result<EngineHandle>,
    ) -> (InitializationOutcome, Option<EngineHandle>) {
        let mut slot = self.lock_slot();
        let is_current = matches!(
            &*slot,
            EngineSlot::Initializing { epoch: current, .. } if *current == epoch
        );

        match outcome {
            Ok(engine) if is_current => {
                log::info!("[SESSION] OCR engine ready (epoch {})", epoch);
                *slot = EngineSlot::Ready {
                    epoch,
                    engine: Arc::clone(&engine),
                };
                (Ok(engine), None)
            }
            Ok(engine) => {
                log::warn!(
                    "[SESSION] Engine from abandoned initialization (epoch {}) will be released",
                    epoch
                );
                let error = EngineInitializationError {
                    cause: "engine was released while initializing".to_string(),
                };
                (Err(error), Some(engine))
            }
            Err(error) => {
                log::error!(
                    "[SESSION] OCR engine initialization failed (epoch {}): {:#}",
                    epoch,
                    error
                );
                if is_current {
                    *slot = EngineSlot::Uninitialized;
                }
                (Err(EngineInitializationError::from_cause(error)), None)
            }
        }
    }
}

/// Clears the per-call progress route when a recognition finishes or is
/// dropped, which closes the caller's progress stream.
struct ProgressRouteGuard<'a> {
    shared: &'a SessionShared,
}

impl<'a> ProgressRouteGuard<'a> {
    fn install(shared: &'a SessionShared, sender: ProgressSender) -> Self {
        *shared.lock_route() = Some(ProgressRoute {
            tracker: ProgressTracker::new(),
            sender,
        });
        Self { shared }
    }

    fn finish(&self) {
        if let Some(route) = self.shared.lock_route().as_mut() {
            let already_complete = route
                .tracker
                .last_emitted()
                .is_some_and(|event| event.is_terminal());
            if !already_complete {
                route.forward(ProgressEvent::new(ProgressPhase::Recognize, 100));
            }
        }
    }
}

impl Drop for ProgressRouteGuard<'_> {
    fn drop(&mut self) {
        self.shared.lock_route().take();
    }
}

/// Owns the single process-wide OCR engine. Initialization is lazy and
/// single-flight; recognitions run one at a time against the shared engine.
pub struct RecognitionSessionManager {
    engine_factory: Arc<dyn OcrEngineFactory>,
    config: SessionConfig,
    shared: Arc<SessionShared>,
    recognition_gate: tokio::sync::Mutex<()>,
}

impl RecognitionSessionManager {
    pub fn build(engine_factory: Arc<dyn OcrEngineFactory>, config: SessionConfig) -> Self {
        log::info!(
            "[SESSION] Creating session manager (languages={}, psm={})",
            config.languages,
            config.page_segmentation_mode
        );

        Self {
            engine_factory,
            config,
            shared: Arc::new(SessionShared {
                slot: Mutex::new(EngineSlot::Uninitialized),
                epoch_counter: AtomicU64::new(0),
                progress_route: Mutex::new(None),
            }),
            recognition_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn progress_channel() -> (ProgressSender, ProgressStream) {
        mpsc::unbounded()
    }

    pub fn initialization_state(&self) -> InitializationState {
        match &*self.shared.lock_slot() {
            EngineSlot::Uninitialized => InitializationState::Uninitialized,
            EngineSlot::Initializing { .. } => InitializationState::Initializing,
            EngineSlot::Ready { .. } => InitializationState::Ready,
        }
    }

    pub async fn ensure_ready(&self) -> Result<EngineHandle, EngineInitializationError> {
        let pending = {
            let mut slot = self.shared.lock_slot();

            if let EngineSlot::Ready { engine, .. } = &*slot {
                return Ok(Arc::clone(engine));
            }

            if let EngineSlot::Initializing { epoch, pending } = &*slot {
                log::debug!("[SESSION] Joining in-flight initialization (epoch {})", epoch);
                pending.clone()
            } else {
                let epoch = self.shared.epoch_counter.fetch_add(1, Ordering::Relaxed) + 1;
                log::info!("[SESSION] Starting OCR engine initialization (epoch {})", epoch);
                let pending = self.initialization_future(epoch);
                *slot = EngineSlot::Initializing {
                    epoch,
                    pending: pending.clone(),
                };
                pending
            }
        };

        pending.await
    }

    /// Runs one recognition behind the gate. When `progress` is given, the
    /// normalized events of this call are streamed into it; the stream ends
    /// when this call returns.
    pub async fn recognize(
        &self,
        request: &RecognitionRequest,
        progress: Option<ProgressSender>,
    ) -> Result<RecognitionResult, RecognitionError> {
        let _gate = self.recognition_gate.lock().await;
        let route = progress.map(|sender| ProgressRouteGuard::install(&self.shared, sender));

        let result = self.run_recognition(request).await;
        if let (Ok(_), Some(route)) = (&result, &route) {
            route.finish();
        }

        result
    }

    /// Idempotent. A later `ensure_ready` always rebuilds from scratch.
    pub async fn release(&self) -> anyhow::Result<()> {
        let previous = std::mem::replace(&mut *self.shared.lock_slot(), EngineSlot::Uninitialized);

        match previous {
            EngineSlot::Uninitialized => {
                log::debug!("[SESSION] Release requested but no engine exists");
                Ok(())
            }
            EngineSlot::Initializing { epoch, .. } => {
                log::info!(
                    "[SESSION] Abandoning in-flight initialization (epoch {})",
                    epoch
                );
                Ok(())
            }
            EngineSlot::Ready { epoch, engine } => {
                log::info!("[SESSION] Releasing OCR engine (epoch {})", epoch);
                engine
                    .release()
                    .await
                    .context("Failed to release OCR engine")
            }
        }
    }

    async fn run_recognition(
        &self,
        request: &RecognitionRequest,
    ) -> Result<RecognitionResult, RecognitionError> {
        log::info!(
            "[SESSION] Recognition {} started ({} bytes, {})",
            request.id,
            request.image_bytes.len(),
            request.mime_type
        );

        let engine = self.ensure_ready().await?;

        let output = engine
            .recognize(&request.image_bytes)
            .await
            .map_err(|error| {
                log::error!("[SESSION] Recognition {} failed: {:#}", request.id, error);
                RecognitionError::Recognition {
                    cause: format!("{:#}", error),
                }
            })?;

        let result = RecognitionResult::from_engine_output(output);
        log::info!(
            "[SESSION] Recognition {} complete: {} characters, {} words",
            request.id,
            result.text.chars().count(),
            result.words.len()
        );

        Ok(result)
    }

    fn initialization_future(&self, epoch: u64) -> PendingInitialization {
        let engine_factory = Arc::clone(&self.engine_factory);
        let config = self.config.clone();
        let weak_shared = Arc::downgrade(&self.shared);
        let on_status = Self::status_callback(Arc::downgrade(&self.shared), epoch);

        async move {
            let outcome = Self::build_engine(engine_factory.as_ref(), &config, on_status).await;

            let Some(shared) = weak_shared.upgrade() else {
                if let Ok(engine) = &outcome {
                    let _ = engine.release().await;
                }
                return Err(EngineInitializationError {
                    cause: "session manager was dropped".to_string(),
                });
            };

            let (result, abandoned) = shared.complete_initialization(epoch, outcome);
            if let Some(engine) = abandoned {
                if let Err(error) = engine.release().await {
                    log::warn!("[SESSION] Failed to release abandoned engine: {:#}", error);
                }
            }

            result
        }
        .boxed()
        .shared()
    }

    async fn build_engine(
        engine_factory: &dyn OcrEngineFactory,
        config: &SessionConfig,
        on_status: StatusCallback,
    ) -> anyhow::Result<EngineHandle> {
        let engine: EngineHandle = Arc::from(
            engine_factory
                .create_engine(&config.languages, config.page_segmentation_mode, on_status)
                .await
                .context("Failed to create OCR engine")?,
        );

        let options = EngineOptions {
            page_segmentation_mode: config.page_segmentation_mode,
            char_whitelist: String::new(),
        };

        if let Err(error) = engine.configure(&options).await {
            if let Err(release_error) = engine.release().await {
                log::warn!(
                    "[SESSION] Failed to release partially configured engine: {:#}",
                    release_error
                );
            }
            return Err(error.context("Failed to configure OCR engine"));
        }

        Ok(engine)
    }

    fn status_callback(shared: Weak<SessionShared>, epoch: u64) -> StatusCallback {
        Arc::new(move |native: NativeStatus| {
            log::debug!(
                "[SESSION] Engine status: {} ({:.2})",
                native.status,
                native.progress
            );
            if let Some(shared) = shared.upgrade() {
                shared.route_native_status(epoch, &native);
            }
        })
    }
}
