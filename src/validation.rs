//! Request field validation
//!
//! Raw request fields arrive as an untyped JSON object (multipart text fields
//! are folded into the same shape). Each request type exposes a pure
//! `validate` function that either returns the typed request or every
//! field-level failure found.

use crate::models::RenderSize;
use serde_json::{Map, Value};
use std::fmt;

pub const PROMPT_MIN_CHARS: usize = 2;
pub const PROMPT_MAX_CHARS: usize = 1000;
pub const MIN_IMAGES: u8 = 1;
pub const MAX_IMAGES: u8 = 4;
pub const DEFAULT_IMAGES: u8 = 2;

/// Untyped request fields keyed by name.
pub type RawFields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field failure found while validating one request, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    fn push(&mut self, field: &'static str, message: String) {
        self.0.push(FieldError::new(field, message));
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&joined.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validated body of `POST /tidy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyRequest {
    pub prompt: String,
}

impl TidyRequest {
    pub fn validate(raw: &RawFields) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let prompt = check_prompt(raw.get("prompt")).map_err(|m| errors.push("prompt", m));

        match prompt {
            Ok(prompt) => Ok(Self { prompt }),
            Err(()) => Err(errors),
        }
    }
}

/// Validated text fields of `POST /render`. The image travels separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub prompt: String,
    pub n: u8,
    pub size: RenderSize,
}

impl RenderRequest {
    pub fn validate(raw: &RawFields) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let prompt = check_prompt(raw.get("prompt")).map_err(|m| errors.push("prompt", m));
        let n = coerce_count(raw.get("n")).map_err(|m| errors.push("n", m));
        let size = check_size(raw.get("size")).map_err(|m| errors.push("size", m));

        match (prompt, n, size) {
            (Ok(prompt), Ok(n), Ok(size)) => Ok(Self { prompt, n, size }),
            _ => Err(errors),
        }
    }
}

fn check_prompt(value: Option<&Value>) -> Result<String, String> {
    let prompt = match value {
        None | Some(Value::Null) => return Err("is required".to_string()),
        Some(Value::String(s)) => s,
        Some(_) => return Err("must be a string".to_string()),
    };

    let chars = prompt.chars().count();
    if chars < PROMPT_MIN_CHARS {
        return Err(format!("must be at least {} characters", PROMPT_MIN_CHARS));
    }
    if chars > PROMPT_MAX_CHARS {
        return Err(format!("must be at most {} characters", PROMPT_MAX_CHARS));
    }
    Ok(prompt.clone())
}

/// Accepts a JSON number or a numeric string; absent means the default.
fn coerce_count(value: Option<&Value>) -> Result<u8, String> {
    let number = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_IMAGES),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| "must be a number".to_string())?;

    if number.fract() != 0.0 {
        return Err("must be an integer".to_string());
    }
    if number < f64::from(MIN_IMAGES) || number > f64::from(MAX_IMAGES) {
        return Err(format!(
            "must be between {} and {}",
            MIN_IMAGES, MAX_IMAGES
        ));
    }
    Ok(number as u8)
}

fn check_size(value: Option<&Value>) -> Result<RenderSize, String> {
    let allowed = || {
        let names: Vec<&str> = RenderSize::ALL.iter().map(|s| s.as_str()).collect();
        format!("must be one of {}", names.join(", "))
    };

    match value {
        None | Some(Value::Null) => Ok(RenderSize::default()),
        Some(Value::String(s)) => s.parse().map_err(|_| allowed()),
        Some(_) => Err(allowed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields(value: Value) -> RawFields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_tidy_accepts_valid_prompt() {
        let req = TidyRequest::validate(&fields(json!({ "prompt": "make the window bigger" })))
            .unwrap();
        assert_eq!(req.prompt, "make the window bigger");
    }

    #[test]
    fn test_prompt_is_not_trimmed_or_stripped() {
        let raw = "  <b>bay window</b>  ";
        let req = TidyRequest::validate(&fields(json!({ "prompt": raw }))).unwrap();
        assert_eq!(req.prompt, raw);
    }

    #[test]
    fn test_prompt_length_bounds() {
        assert!(TidyRequest::validate(&fields(json!({ "prompt": "a" }))).is_err());
        assert!(TidyRequest::validate(&fields(json!({ "prompt": "ab" }))).is_ok());
        assert!(TidyRequest::validate(&fields(json!({ "prompt": "a".repeat(1000) }))).is_ok());

        let err = TidyRequest::validate(&fields(json!({ "prompt": "a".repeat(1001) })))
            .unwrap_err();
        assert_eq!(err.to_string(), "prompt: must be at most 1000 characters");
    }

    #[test]
    fn test_prompt_counts_characters_not_bytes() {
        // Two characters, six bytes.
        assert!(TidyRequest::validate(&fields(json!({ "prompt": "窓窓" }))).is_ok());
    }

    #[test]
    fn test_prompt_missing_or_wrong_type() {
        let err = TidyRequest::validate(&RawFields::new()).unwrap_err();
        assert_eq!(err.to_string(), "prompt: is required");

        let err = TidyRequest::validate(&fields(json!({ "prompt": 42 }))).unwrap_err();
        assert_eq!(err.to_string(), "prompt: must be a string");
    }

    #[test]
    fn test_render_defaults() {
        let req = RenderRequest::validate(&fields(json!({ "prompt": "white vinyl" }))).unwrap();
        assert_eq!(req.n, 2);
        assert_eq!(req.size, RenderSize::Medium);
    }

    #[test]
    fn test_render_coerces_string_count() {
        let req =
            RenderRequest::validate(&fields(json!({ "prompt": "white vinyl", "n": "4" }))).unwrap();
        assert_eq!(req.n, 4);

        let req =
            RenderRequest::validate(&fields(json!({ "prompt": "white vinyl", "n": 1 }))).unwrap();
        assert_eq!(req.n, 1);
    }

    #[test]
    fn test_render_rejects_count_out_of_range() {
        for n in [json!(0), json!("5"), json!(-1)] {
            let err = RenderRequest::validate(&fields(json!({ "prompt": "white vinyl", "n": n })))
                .unwrap_err();
            assert_eq!(err.to_string(), "n: must be between 1 and 4");
        }
    }

    #[test]
    fn test_render_rejects_non_integer_count() {
        let err = RenderRequest::validate(&fields(json!({ "prompt": "white vinyl", "n": "2.5" })))
            .unwrap_err();
        assert_eq!(err.to_string(), "n: must be an integer");

        let err = RenderRequest::validate(&fields(json!({ "prompt": "white vinyl", "n": "two" })))
            .unwrap_err();
        assert_eq!(err.to_string(), "n: must be a number");
    }

    #[test]
    fn test_render_size_must_be_allowed() {
        let req = RenderRequest::validate(&fields(
            json!({ "prompt": "white vinyl", "size": "2048x2048" }),
        ))
        .unwrap();
        assert_eq!(req.size, RenderSize::Large);

        let err = RenderRequest::validate(&fields(
            json!({ "prompt": "white vinyl", "size": "999x999" }),
        ))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "size: must be one of 1024x1024, 1536x1536, 2048x2048"
        );
    }

    #[test]
    fn test_render_collects_every_field_error() {
        let err = RenderRequest::validate(&fields(
            json!({ "prompt": "x", "n": "9", "size": "big" }),
        ))
        .unwrap_err();

        let names: Vec<&str> = err.errors().iter().map(|e| e.field).collect();
        assert_eq!(names, vec!["prompt", "n", "size"]);
    }
}
