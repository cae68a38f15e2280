use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Build default headers carrying `Authorization: Bearer <token>`.
///
/// The header value is marked sensitive so it never shows up in
/// reqwest's debug output.
pub fn bearer_headers(token: &SecretString) -> Result<HeaderMap, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| Error::InvalidCredential(format!("invalid bearer token: {e}")))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Build default headers carrying an API key under `header_name`.
pub fn api_key_headers(header_name: &'static str, key: &SecretString) -> Result<HeaderMap, Error> {
    let mut value = HeaderValue::from_str(key.expose_secret())
        .map_err(|e| Error::InvalidCredential(format!("invalid API key: {e}")))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(header_name), value);
    Ok(headers)
}
