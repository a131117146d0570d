//! Body extractor that turns any supported post submission into a raw form.
//!
//! Accepted bodies: `multipart/form-data` (parts with a filename become files),
//! `application/x-www-form-urlencoded`, and `application/json`. Anything else is
//! read as an empty form so validation reports the missing fields.

use actix_multipart::Multipart;
use actix_web::dev::{JsonBody, Payload, UrlEncoded};
use actix_web::{FromRequest, HttpRequest, error, http::header};
use futures::StreamExt;
use futures::future::LocalBoxFuture;
use serde_json::{Map, Value};

use press_core::domain::UploadedFile;
use press_core::validation::{FieldValue, POST_FIELDS, PostForm};

/// Largest accepted upload, per file part.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Largest urlencoded or JSON body.
pub const MAX_TEXT_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Largest multipart body, counting every part: one full upload plus the text fields.
pub const MAX_MULTIPART_BYTES: usize = MAX_UPLOAD_BYTES + MAX_TEXT_BODY_BYTES;

/// A decoded, not yet validated, post submission.
#[derive(Debug, Clone)]
pub struct FormInput(pub PostForm);

impl FormInput {
    pub fn into_inner(self) -> PostForm {
        self.0
    }
}

impl FromRequest for FormInput {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::new(req.headers(), payload.take());
            Box::pin(async move { read_multipart(multipart).await.map(FormInput) })
        } else if content_type.starts_with("application/json") {
            let json = JsonBody::<Map<String, Value>>::new(req, payload, None, false)
                .limit(MAX_TEXT_BODY_BYTES);
            Box::pin(async move { Ok(FormInput(from_json(json.await?))) })
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let form =
                UrlEncoded::<Vec<(String, String)>>::new(req, payload).limit(MAX_TEXT_BODY_BYTES);
            Box::pin(async move {
                let pairs = form.await?;
                Ok(FormInput(
                    pairs
                        .into_iter()
                        .map(|(name, value)| (name, FieldValue::Text(value)))
                        .collect(),
                ))
            })
        } else {
            Box::pin(async { Ok(FormInput(PostForm::new())) })
        }
    }
}

/// Buffer the known fields. Unknown parts are drained unread, but still count
/// towards [`MAX_MULTIPART_BYTES`].
async fn read_multipart(mut multipart: Multipart) -> Result<PostForm, actix_web::Error> {
    let mut form = PostForm::new();
    let mut total = 0usize;

    while let Some(field) = multipart.next().await {
        let mut field = field?;
        let name = field
            .name()
            .filter(|name| POST_FIELDS.contains(name))
            .map(str::to_owned);
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let content_type = field.content_type().map(ToString::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            total += chunk.len();
            if total > MAX_MULTIPART_BYTES {
                return Err(error::ErrorPayloadTooLarge(format!(
                    "request body exceeds {MAX_MULTIPART_BYTES} bytes"
                )));
            }
            if name.is_none() {
                continue;
            }
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(error::ErrorPayloadTooLarge(format!(
                    "a field exceeds {MAX_UPLOAD_BYTES} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        let Some(name) = name else {
            tracing::debug!(field = ?field.name(), "Skipping unknown multipart field");
            continue;
        };

        let value = match filename {
            Some(original_name) => FieldValue::File(UploadedFile {
                original_name,
                content_type,
                bytes,
            }),
            None => FieldValue::Text(String::from_utf8(bytes).map_err(error::ErrorBadRequest)?),
        };
        form.insert(name, value);
    }

    Ok(form)
}

/// JSON strings are text, `null` is absent, anything else is kept as its JSON text.
fn from_json(object: Map<String, Value>) -> PostForm {
    object
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::Null => None,
            Value::String(text) => Some((name, FieldValue::Text(text))),
            other => Some((name, FieldValue::Text(other.to_string()))),
        })
        .collect()
}
