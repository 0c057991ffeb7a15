use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Previewing,
    Recognizing,
    ResultShown,
    Error,
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiState::Idle => write!(f, "Idle"),
            UiState::Previewing => write!(f, "Previewing"),
            UiState::Recognizing => write!(f, "Recognizing"),
            UiState::ResultShown => write!(f, "ResultShown"),
            UiState::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressDisplay {
    pub visible: bool,
    pub percent: u8,
    pub label: String,
}

/// Snapshot of everything a front end needs to render the controller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerView {
    pub ui_state: UiState,
    pub preview_data_url: Option<String>,
    pub display_text: String,
    pub progress: ProgressDisplay,
    pub trigger_enabled: bool,
    pub notice: Option<String>,
}
