//! AI service integration for prompt rewriting and image editing
//!
//! The relay depends only on the two capabilities of [`AiService`]; the
//! OpenAI implementation and the in-memory mock both live here.

pub mod mime;
pub mod mock;
pub mod openai;

pub use mime::detect_image_mime;
pub use mock::MockAiClient;
pub use openai::OpenAiClient;

use crate::models::ImageEdit;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AiService: Send + Sync {
    /// Run one text completion. `Ok(None)` means the provider answered
    /// without usable text.
    async fn complete_text(&self, system: &str, user: &str) -> Result<Option<String>>;

    /// Edit the supplied base image per the prompt, returning base64 payloads
    /// in provider order.
    async fn edit_image(&self, edit: ImageEdit) -> Result<Vec<String>>;
}
