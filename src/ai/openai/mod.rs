pub mod chat;
pub mod client;
pub mod image;
pub mod types;

pub use chat::OpenAiChatClient;
pub use image::OpenAiImageClient;

use crate::ai::AiService;
use crate::models::ImageEdit;
use crate::Result;
use async_trait::async_trait;

/// OpenAI-backed [`AiService`]: chat completions for text, image edits for
/// renders. Both halves share one connection pool.
pub struct OpenAiClient {
    chat: OpenAiChatClient,
    image: OpenAiImageClient,
}

impl OpenAiClient {
    pub fn new(api_key: String, chat_model: String, base_url: String) -> Self {
        let http_client = reqwest::Client::new();
        Self {
            chat: OpenAiChatClient::new_with_client(api_key.clone(), chat_model, http_client.clone())
                .with_base_url(base_url.clone()),
            image: OpenAiImageClient::new_with_client(api_key, http_client)
                .with_base_url(base_url),
        }
    }
}

#[async_trait]
impl AiService for OpenAiClient {
    async fn complete_text(&self, system: &str, user: &str) -> Result<Option<String>> {
        self.chat.complete(system, user).await
    }

    async fn edit_image(&self, edit: ImageEdit) -> Result<Vec<String>> {
        self.image.edit(edit).await
    }
}
