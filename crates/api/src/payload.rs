use crate::error::ApiError;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use serde::de::DeserializeOwned;

/// Request body decoded from either JSON or an urlencoded form.
///
/// An empty body decodes like an empty object, so every optional field comes
/// out as `None` and the handler reports the missing parameters itself.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[derive(Debug, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Form,
    Other(String),
}

fn body_format(content_type: Option<&str>) -> BodyFormat {
    let Some(content_type) = content_type else {
        return BodyFormat::Json;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if mime == "application/json" || mime.ends_with("+json") {
        BodyFormat::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyFormat::Form
    } else {
        BodyFormat::Other(mime)
    }
}

fn malformed(e: impl std::fmt::Display) -> ApiError {
    ApiError::MalformedBody(e.to_string())
}

/// Decodes a form body, treating `field=` like an absent field.
fn decode_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).map_err(malformed)?;
    let present: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    let encoded = serde_urlencoded::to_string(&present).map_err(malformed)?;
    serde_urlencoded::from_str(&encoded).map_err(malformed)
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let format = body_format(
            req.headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"{}").map(Payload).map_err(malformed);
        }

        let value = match format {
            BodyFormat::Json => serde_json::from_slice(&body).map_err(malformed)?,
            BodyFormat::Form => decode_form(&body)?,
            BodyFormat::Other(mime) => {
                return Err(ApiError::MalformedBody(format!(
                    "unsupported content type {mime}"
                )));
            }
        };
        Ok(Payload(value))
    }
}
