//! Data models and structures
//!
//! Defines the response shapes of the relay endpoints, the image payloads
//! passed to the edit capability, and process configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output dimensions accepted by `POST /render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderSize {
    #[serde(rename = "1024x1024")]
    Small,
    #[default]
    #[serde(rename = "1536x1536")]
    Medium,
    #[serde(rename = "2048x2048")]
    Large,
}

impl RenderSize {
    pub const ALL: [RenderSize; 3] = [RenderSize::Small, RenderSize::Medium, RenderSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderSize::Small => "1024x1024",
            RenderSize::Medium => "1536x1536",
            RenderSize::Large => "2048x2048",
        }
    }
}

impl fmt::Display for RenderSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderSize::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| format!("unsupported size '{}'", s))
    }
}

/// A file received in the `image` multipart field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Everything the edit capability needs to modify one base image.
#[derive(Debug, Clone)]
pub struct ImageEdit {
    pub model: String,
    pub image: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    pub prompt: String,
    pub n: u8,
    pub size: RenderSize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TidyResponse {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderResponse {
    pub images: Vec<String>,
}

pub const DEFAULT_BEARER_TOKEN: &str = "dev-token";
pub const DEFAULT_PORT: u16 = 8787;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub bearer_token: String,
    /// Set when `BEARER_TOKEN` was absent and the development token is in use.
    pub using_default_token: bool,
    pub host: String,
    pub port: u16,
    pub tidy_model: String,
    pub render_model: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY")
            .ok_or_else(|| crate::Error::Config("OPENAI_API_KEY not set".to_string()))?;

        let production = var("RELAY_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let (bearer_token, using_default_token) = match var("BEARER_TOKEN") {
            Some(token) => (token, false),
            None if production => {
                return Err(crate::Error::Config(
                    "BEARER_TOKEN must be set when RELAY_ENV=production".to_string(),
                ))
            }
            None => (DEFAULT_BEARER_TOKEN.to_string(), true),
        };

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid PORT '{}'", port)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            openai_api_key,
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            bearer_token,
            using_default_token,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            tidy_model: var("TIDY_MODEL").unwrap_or_else(|| "gpt-4.1-mini".to_string()),
            render_model: var("RENDER_MODEL").unwrap_or_else(|| "gpt-image-1".to_string()),
        })
    }
}
