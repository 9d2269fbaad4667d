use super::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};
use crate::{Error, Result};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Shared transport for the OpenAI endpoints. Requests carry no timeout of
/// their own; slow image edits run as long as the underlying client allows.
pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiHttpClient {
    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Sending request to OpenAI: {}", url);
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        self.send(self.request(path).json(request)).await
    }

    pub async fn post_multipart<Resp: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<Resp> {
        self.send(self.request(path).multipart(form)).await
    }

    async fn send<Resp: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Resp> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to OpenAI: {}", e);
            e
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("OpenAI API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(api_error_message(status, &error_text)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse OpenAI response: {}", e))
        })
    }

    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.post("/v1/chat/completions", &request).await
    }
}

/// Prefer the vendor's own `error.message`; fall back to status and raw body.
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) if !parsed.error.message.trim().is_empty() => parsed.error.message,
        _ => format!("OpenAI API error (status {}): {}", status, body),
    }
}
