use super::client::OpenAiHttpClient;
use super::types::ImageEditResponse;
use crate::models::ImageEdit;
use crate::{Error, Result};
use reqwest::multipart::{Form, Part};

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
}

impl OpenAiImageClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(api_key, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    /// Send the base image to `/v1/images/edits` and collect the base64
    /// payloads in response order.
    pub async fn edit(&self, edit: ImageEdit) -> Result<Vec<String>> {
        let requested = usize::from(edit.n);
        let image = Part::bytes(edit.image)
            .file_name(edit.file_name)
            .mime_str(&edit.mime_type)
            .map_err(|e| {
                Error::AiProvider(format!("Invalid image MIME '{}': {}", edit.mime_type, e))
            })?;

        let form = Form::new()
            .text("model", edit.model)
            .text("prompt", edit.prompt)
            .text("n", edit.n.to_string())
            .text("size", edit.size.as_str())
            .part("image", image);

        let response: ImageEditResponse =
            self.http.post_multipart("/v1/images/edits", form).await?;

        let images: Vec<String> = response
            .data
            .into_iter()
            .filter_map(|item| {
                if item.b64_json.is_none() && item.url.is_some() {
                    tracing::warn!("Skipping URL-only image item in OpenAI edit response");
                }
                item.b64_json
            })
            .take(requested)
            .collect();

        if images.is_empty() {
            return Err(Error::AiProvider("No image data in OpenAI response".to_string()));
        }

        Ok(images)
    }
}
