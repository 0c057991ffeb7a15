use std::sync::Arc;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedWord {
    pub content: String,
    pub confidence: f32,
}

impl RecognizedWord {
    pub fn new(content: impl Into<String>, confidence: f32) -> Self {
        Self {
            content: content.into(),
            confidence,
        }
    }
}

/// Raw output as handed back by an OCR engine, before normalization.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub text: String,
    pub words: Vec<RecognizedWord>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognitionResult {
    pub text: String,
    pub words: Vec<RecognizedWord>,
}

impl RecognitionResult {
    pub fn from_engine_output(output: EngineOutput) -> Self {
        Self {
            text: output.text.trim().to_string(),
            words: output.words,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Mean word confidence, `None` when the engine reported no words.
    pub fn average_confidence(&self) -> Option<f32> {
        if self.words.is_empty() {
            return None;
        }

        let total: f32 = self.words.iter().map(|word| word.confidence).sum();
        Some(total / self.words.len() as f32)
    }
}

#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    pub id: Uuid,
    pub image_bytes: Arc<Vec<u8>>,
    pub mime_type: String,
}

impl RecognitionRequest {
    pub fn build(image_bytes: Arc<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_bytes,
            mime_type: mime_type.into(),
        }
    }
}
