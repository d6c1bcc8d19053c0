//! Response envelope normalization.
//!
//! The catalog server wraps payloads inconsistently: list endpoints answer
//! `{"success", "data", "meta"}`, detail endpoints `{"success", "data"}`,
//! some deployments omit `success`, and failures use
//! `{"success": false, "error", "status"}`. Every response body passes
//! through this module so callers only ever see `T` or [`Page<T>`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ApiError;
use super::types::{Page, PaginationMeta};

/// Status assumed for a failure envelope that carries no `status` field.
const DEFAULT_FAILURE_STATUS: u16 = 400;

/// Normalizes a single-entity response body into `T`.
///
/// # Errors
///
/// - [`ApiError::Decode`] if the body is not JSON or the payload does not match `T`.
/// - [`ApiError::NotFound`] / [`ApiError::Rejected`] for a failure envelope.
pub fn normalize_item<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let (data, _meta) = unwrap_envelope(body)?;
    decode_value(data, "data")
}

/// Normalizes a list response body into a [`Page<T>`].
///
/// A missing or `null` `meta` yields `Page::meta == None`.
///
/// # Errors
///
/// - [`ApiError::Decode`] if the body is not JSON, `data` is not a list of `T`,
///   or `meta` is malformed.
/// - [`ApiError::NotFound`] / [`ApiError::Rejected`] for a failure envelope.
pub fn normalize_page<T: DeserializeOwned>(body: &str) -> Result<Page<T>, ApiError> {
    let (data, meta) = unwrap_envelope(body)?;
    let items: Vec<T> = decode_value(data, "data")?;
    let meta = meta
        .map(|m| decode_value::<PaginationMeta>(m, "meta"))
        .transpose()?;
    Ok(Page { items, meta })
}

/// Extracts the human-readable message from an error body, if it has one.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let map = value.as_object()?;
    failure_message(map)
}

/// Splits a body into its payload and optional pagination metadata.
fn unwrap_envelope(body: &str) -> Result<(Value, Option<Value>), ApiError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(format!("invalid JSON: {e}")))?;

    let Value::Object(mut map) = value else {
        return Ok((value, None));
    };

    if map.get("success") == Some(&Value::Bool(false)) {
        return Err(failure_to_error(&map));
    }

    match map.remove("data") {
        Some(data) => {
            let meta = map.remove("meta").filter(|m| !m.is_null());
            Ok((data, meta))
        }
        // No envelope: the object itself is the payload.
        None => Ok((Value::Object(map), None)),
    }
}

fn failure_message(map: &Map<String, Value>) -> Option<String> {
    let message = map
        .get("error")
        .or_else(|| map.get("message"))
        .and_then(Value::as_str)?;
    match map.get("errors").filter(|e| !e.is_null()) {
        Some(details) => Some(format!("{message} ({details})")),
        None => Some(String::from(message)),
    }
}

fn failure_to_error(map: &Map<String, Value>) -> ApiError {
    let message = failure_message(map).unwrap_or_else(|| String::from("request failed"));
    let status = map
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(DEFAULT_FAILURE_STATUS);

    if status == 404 {
        ApiError::NotFound(message)
    } else {
        ApiError::Rejected { status, message }
    }
}

fn decode_value<T: DeserializeOwned>(value: Value, field: &str) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Decode(format!("unexpected `{field}` shape: {e}")))
}
