// Response handling shared by every client.
//
// Success bodies are parsed with a body preview on failure; error bodies
// are mapped onto `Error` using whichever error shape the service uses:
// the portal's `{"error": "...", "message": "..."}` or the Google-style
// `{"error": {"code": N, "message": "...", "status": "..."}}`.

use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::Error;

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl ErrorResponse {
    /// Pull the most specific `(message, code)` pair out of either shape.
    fn into_parts(self) -> (Option<String>, Option<String>) {
        match self.error {
            Some(Value::Object(inner)) => {
                let message = inner
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .or(self.message);
                let code = inner
                    .get("status")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .or_else(|| self.code.as_ref().map(value_to_code));
                (message, code)
            }
            Some(Value::String(err)) => (
                self.message.or(Some(err.clone())),
                Some(self.code.as_ref().map_or(err, value_to_code)),
            ),
            _ => (self.message, self.code.as_ref().map(value_to_code)),
        }
    }
}

fn value_to_code(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Append path segments to `base`, percent-encoding each one.
///
/// `base` is the service root (with or without trailing slash).
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::CannotBeABase(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

pub(crate) async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::Unauthorized;
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(60);
        return Error::RateLimited { retry_after_secs };
    }

    let raw = resp.text().await.unwrap_or_default();
    let (message, code) = serde_json::from_str::<ErrorResponse>(&raw)
        .map(ErrorResponse::into_parts)
        .unwrap_or((None, None));

    let message = message.unwrap_or_else(|| {
        if raw.is_empty() {
            status.to_string()
        } else {
            raw
        }
    });

    if status == StatusCode::FORBIDDEN {
        return Error::Forbidden { message };
    }

    Error::Api {
        message,
        code,
        status: status.as_u16(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn join_segments_encodes_each_segment() {
        let base = Url::parse("https://portal.example.org/").unwrap();
        let url = join_segments(&base, &["api", "staff", "chat", "channels", "a b/c", "read"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://portal.example.org/api/staff/chat/channels/a%20b%2Fc/read"
        );
    }

    #[test]
    fn join_segments_keeps_base_path() {
        let base = Url::parse("https://example.org/portal").unwrap();
        let url = join_segments(&base, &["api", "notifications"]).unwrap();
        assert_eq!(url.path(), "/portal/api/notifications");
    }

    #[test]
    fn google_error_shape() {
        let parsed: ErrorResponse = serde_json::from_str(
            r#"{"error":{"code":403,"message":"quota exceeded","status":"PERMISSION_DENIED"}}"#,
        )
        .unwrap();
        let (message, code) = parsed.into_parts();
        assert_eq!(message.as_deref(), Some("quota exceeded"));
        assert_eq!(code.as_deref(), Some("PERMISSION_DENIED"));
    }

    #[test]
    fn portal_error_shape() {
        let parsed: ErrorResponse =
            serde_json::from_str(r#"{"error":"not_found","message":"No such channel"}"#).unwrap();
        let (message, code) = parsed.into_parts();
        assert_eq!(message.as_deref(), Some("No such channel"));
        assert_eq!(code.as_deref(), Some("not_found"));
    }
}
