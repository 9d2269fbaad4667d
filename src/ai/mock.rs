use super::AiService;
use crate::models::ImageEdit;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::sync::{Arc, Mutex};

/// A tiny valid PNG returned when no image response is configured.
const ONE_PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44,
    0x41, // IDAT chunk
    0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2, 0x25,
    0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Recorded arguments of one `complete_text` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCall {
    pub system: String,
    pub user: String,
}

/// In-memory [`AiService`] that records every call.
#[derive(Clone, Default)]
pub struct MockAiClient {
    text_response: Arc<Mutex<Option<Option<String>>>>,
    image_responses: Arc<Mutex<Option<Vec<String>>>>,
    failure: Arc<Mutex<Option<String>>>,
    text_calls: Arc<Mutex<Vec<TextCall>>>,
    image_calls: Arc<Mutex<Vec<ImageEdit>>>,
}

impl MockAiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the completion result; `None` simulates an empty answer.
    pub fn with_text_response(self, response: Option<String>) -> Self {
        *self.text_response.lock().unwrap() = Some(response);
        self
    }

    /// Fix the base64 payloads returned by `edit_image`, ignoring `n`.
    pub fn with_image_responses(self, responses: Vec<String>) -> Self {
        *self.image_responses.lock().unwrap() = Some(responses);
        self
    }

    /// Make every call fail with `Error::AiProvider(message)`.
    pub fn failing_with(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn text_calls(&self) -> Vec<TextCall> {
        self.text_calls.lock().unwrap().clone()
    }

    pub fn image_calls(&self) -> Vec<ImageEdit> {
        self.image_calls.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.text_calls.lock().unwrap().len() + self.image_calls.lock().unwrap().len()
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(Error::AiProvider(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AiService for MockAiClient {
    async fn complete_text(&self, system: &str, user: &str) -> Result<Option<String>> {
        self.text_calls.lock().unwrap().push(TextCall {
            system: system.to_string(),
            user: user.to_string(),
        });
        self.check_failure()?;

        match self.text_response.lock().unwrap().as_ref() {
            Some(response) => Ok(response.clone()),
            None => Ok(Some(format!("Replace only the windows: {}", user))),
        }
    }

    async fn edit_image(&self, edit: ImageEdit) -> Result<Vec<String>> {
        let n = usize::from(edit.n);
        self.image_calls.lock().unwrap().push(edit);
        self.check_failure()?;

        match self.image_responses.lock().unwrap().as_ref() {
            Some(responses) => Ok(responses.clone()),
            None => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(ONE_PIXEL_PNG);
                Ok(vec![encoded; n])
            }
        }
    }
}
