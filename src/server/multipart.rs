//! Reads the `/render` multipart form: one `image` file plus text fields.

use crate::models::ImageUpload;
use crate::validation::RawFields;
use crate::{Error, Result};
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use serde_json::Value;

pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Default)]
pub struct RenderForm {
    pub fields: RawFields,
    pub image: Option<ImageUpload>,
}

/// Buffer the form, failing with [`Error::UploadTooLarge`] as soon as the
/// image passes `limit` bytes.
pub async fn read_render_form(mut multipart: Multipart, limit: usize) -> Result<RenderForm> {
    let mut form = RenderForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            if form.image.is_some() {
                return Err(Error::Multipart(format!(
                    "only one '{}' file is accepted",
                    IMAGE_FIELD
                )));
            }
            form.image = Some(read_upload(field, limit).await?);
        } else if field.file_name().is_some() {
            return Err(Error::Multipart(format!("unexpected file field '{}'", name)));
        } else {
            let text = field.text().await.map_err(|e| multipart_error(e, limit))?;
            form.fields.insert(name, Value::String(text));
        }
    }

    Ok(form)
}

async fn read_upload(mut field: Field<'_>, limit: usize) -> Result<ImageUpload> {
    let content_type = field.content_type().map(str::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
        if bytes.len() + chunk.len() > limit {
            return Err(Error::UploadTooLarge { limit });
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(ImageUpload {
        bytes,
        content_type,
    })
}

fn multipart_error(err: MultipartError, limit: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::UploadTooLarge { limit }
    } else {
        Error::Multipart(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    const BOUNDARY: &str = "unit-boundary";

    async fn multipart(body: &str) -> Multipart {
        let request = Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body.replace("{b}", BOUNDARY)))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_text_fields_and_image() {
        let body = "--{b}\r\n\
            Content-Disposition: form-data; name=\"prompt\"\r\n\r\n\
            bronze frames\r\n\
            --{b}\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"house.png\"\r\n\
            Content-Type: image/png\r\n\r\n\
            pixels\r\n\
            --{b}--\r\n";

        let form = read_render_form(multipart(body).await, 1024).await.unwrap();
        assert_eq!(form.fields["prompt"], Value::String("bronze frames".to_string()));

        let image = form.image.unwrap();
        assert_eq!(image.bytes, b"pixels".to_vec());
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_image_over_limit_is_rejected() {
        let body = "--{b}\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"house.jpg\"\r\n\r\n\
            0123456789abcdef\r\n\
            --{b}--\r\n";

        let err = read_render_form(multipart(body).await, 8).await.unwrap_err();
        assert!(matches!(err, Error::UploadTooLarge { limit: 8 }));
    }

    #[tokio::test]
    async fn test_second_image_is_rejected() {
        let body = "--{b}\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"a.jpg\"\r\n\r\n\
            a\r\n\
            --{b}\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"b.jpg\"\r\n\r\n\
            b\r\n\
            --{b}--\r\n";

        let err = read_render_form(multipart(body).await, 1024).await.unwrap_err();
        assert!(matches!(err, Error::Multipart(_)));
    }

    #[tokio::test]
    async fn test_unexpected_file_field_is_rejected() {
        let body = "--{b}\r\n\
            Content-Disposition: form-data; name=\"mask\"; filename=\"mask.png\"\r\n\r\n\
            m\r\n\
            --{b}--\r\n";

        let err = read_render_form(multipart(body).await, 1024).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid multipart body: unexpected file field 'mask'");
    }

    #[tokio::test]
    async fn test_form_without_image() {
        let body = "--{b}\r\n\
            Content-Disposition: form-data; name=\"n\"\r\n\r\n\
            3\r\n\
            --{b}--\r\n";

        let form = read_render_form(multipart(body).await, 1024).await.unwrap();
        assert!(form.image.is_none());
        assert_eq!(form.fields["n"], Value::String("3".to_string()));
    }
}
