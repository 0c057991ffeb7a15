use crate::global_constants;

/// Stages of engine bring-up and execution, declared in the order the engine
/// moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProgressPhase {
    CoreLoad,
    Init,
    LanguageLoad,
    ApiInit,
    Recognize,
}

impl ProgressPhase {
    pub fn label(&self) -> &'static str {
        match self {
            ProgressPhase::CoreLoad => global_constants::PROGRESS_LABEL_LOADING_CORE,
            ProgressPhase::Init => global_constants::PROGRESS_LABEL_INITIALIZING,
            ProgressPhase::LanguageLoad => global_constants::PROGRESS_LABEL_LOADING_LANGUAGE,
            ProgressPhase::ApiInit => global_constants::PROGRESS_LABEL_INITIALIZING_API,
            ProgressPhase::Recognize => global_constants::PROGRESS_LABEL_RECOGNIZING,
        }
    }
}

/// Status message exactly as the engine reports it through its callback.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeStatus {
    pub status: String,
    pub progress: f32,
}

impl NativeStatus {
    pub fn new(status: impl Into<String>, progress: f32) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    pub percent_complete: u8,
}

impl ProgressEvent {
    pub fn new(phase: ProgressPhase, percent_complete: u8) -> Self {
        Self {
            phase,
            percent_complete: percent_complete.min(100),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == ProgressPhase::Recognize && self.percent_complete == 100
    }

    pub fn display_label(&self) -> String {
        match self.phase {
            ProgressPhase::Recognize => format!(
                "{} {}%",
                global_constants::PROGRESS_LABEL_RECOGNIZING,
                self.percent_complete
            ),
            phase => phase.label().to_string(),
        }
    }
}

/// Maps an engine-native status onto the normalized progress model.
/// Unknown statuses yield `None` and are meant to be ignored.
pub fn report_progress(native: &NativeStatus) -> Option<ProgressEvent> {
    let event = match native.status.as_str() {
        global_constants::NATIVE_STATUS_LOADING_CORE => {
            ProgressEvent::new(ProgressPhase::CoreLoad, 20)
        }
        global_constants::NATIVE_STATUS_INITIALIZING => ProgressEvent::new(ProgressPhase::Init, 40),
        global_constants::NATIVE_STATUS_LOADING_LANGUAGE => {
            ProgressEvent::new(ProgressPhase::LanguageLoad, 60)
        }
        global_constants::NATIVE_STATUS_INITIALIZING_API => {
            ProgressEvent::new(ProgressPhase::ApiInit, 80)
        }
        global_constants::NATIVE_STATUS_RECOGNIZING => {
            let percent = (native.progress.clamp(0.0, 1.0) * 100.0).round() as u8;
            ProgressEvent::new(ProgressPhase::Recognize, percent)
        }
        _ => return None,
    };

    Some(event)
}

/// Enforces per-attempt ordering: phases never regress and the percentage
/// never decreases. Duplicate events are swallowed.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last_emitted: Option<ProgressEvent>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: ProgressEvent) -> Option<ProgressEvent> {
        let next = match self.last_emitted {
            None => event,
            Some(last) => {
                if event.phase < last.phase {
                    log::debug!(
                        "[PROGRESS] Dropping regressing phase {:?} after {:?}",
                        event.phase,
                        last.phase
                    );
                    return None;
                }

                let normalized = ProgressEvent::new(
                    event.phase,
                    event.percent_complete.max(last.percent_complete),
                );

                if normalized == last {
                    return None;
                }

                normalized
            }
        };

        self.last_emitted = Some(next);
        Some(next)
    }

    pub fn last_emitted(&self) -> Option<ProgressEvent> {
        self.last_emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_progress_maps_every_bring_up_status_to_fixed_percentages() {
        let cases = [
            (global_constants::NATIVE_STATUS_LOADING_CORE, ProgressPhase::CoreLoad, 20),
            (global_constants::NATIVE_STATUS_INITIALIZING, ProgressPhase::Init, 40),
            (global_constants::NATIVE_STATUS_LOADING_LANGUAGE, ProgressPhase::LanguageLoad, 60),
            (global_constants::NATIVE_STATUS_INITIALIZING_API, ProgressPhase::ApiInit, 80),
        ];

        for (status, phase, percent) in cases {
            let event = report_progress(&NativeStatus::new(status, 0.5)).unwrap();
            assert_eq!(event.phase, phase);
            assert_eq!(event.percent_complete, percent);
        }
    }

    #[test]
    fn test_report_progress_scales_recognition_progress() {
        let event = report_progress(&NativeStatus::new(
            global_constants::NATIVE_STATUS_RECOGNIZING,
            0.456,
        ))
        .unwrap();

        assert_eq!(event.phase, ProgressPhase::Recognize);
        assert_eq!(event.percent_complete, 46);
    }

    #[test]
    fn test_report_progress_clamps_out_of_range_progress() {
        let over = report_progress(&NativeStatus::new(
            global_constants::NATIVE_STATUS_RECOGNIZING,
            3.0,
        ))
        .unwrap();
        let under = report_progress(&NativeStatus::new(
            global_constants::NATIVE_STATUS_RECOGNIZING,
            -1.0,
        ))
        .unwrap();

        assert_eq!(over.percent_complete, 100);
        assert!(over.is_terminal());
        assert_eq!(under.percent_complete, 0);
    }

    #[test]
    fn test_report_progress_ignores_unknown_statuses() {
        assert!(report_progress(&NativeStatus::new("loaded tesseract core", 1.0)).is_none());
        assert!(report_progress(&NativeStatus::new("", 0.0)).is_none());
    }

    #[test]
    fn test_tracker_keeps_percentage_monotonic_across_phase_change() {
        let mut tracker = ProgressTracker::new();

        let api = tracker.observe(ProgressEvent::new(ProgressPhase::ApiInit, 80));
        let recognizing_start = tracker.observe(ProgressEvent::new(ProgressPhase::Recognize, 0));
        let recognizing_half = tracker.observe(ProgressEvent::new(ProgressPhase::Recognize, 90));

        assert_eq!(api.unwrap().percent_complete, 80);
        assert_eq!(
            recognizing_start,
            Some(ProgressEvent::new(ProgressPhase::Recognize, 80))
        );
        assert_eq!(recognizing_half.unwrap().percent_complete, 90);
    }

    #[test]
    fn test_tracker_drops_regressing_phases_and_duplicates() {
        let mut tracker = ProgressTracker::new();

        tracker.observe(ProgressEvent::new(ProgressPhase::LanguageLoad, 60));

        assert!(tracker
            .observe(ProgressEvent::new(ProgressPhase::CoreLoad, 20))
            .is_none());
        assert!(tracker
            .observe(ProgressEvent::new(ProgressPhase::LanguageLoad, 60))
            .is_none());
        assert_eq!(
            tracker.last_emitted(),
            Some(ProgressEvent::new(ProgressPhase::LanguageLoad, 60))
        );
    }

    #[test]
    fn test_display_label_includes_percentage_only_while_recognizing() {
        assert_eq!(
            ProgressEvent::new(ProgressPhase::Recognize, 42).display_label(),
            "Recognizing... 42%"
        );
        assert_eq!(
            ProgressEvent::new(ProgressPhase::Init, 40).display_label(),
            global_constants::PROGRESS_LABEL_INITIALIZING
        );
    }
}
