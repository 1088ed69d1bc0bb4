//! Classify a probe response (status, headers, optional body) into a ProbeOutcome.

use super::{ProbeMetadata, ProbeOutcome};

pub const INVALID_REQUEST: &str = "Invalid request";
pub const SERVER_ERROR: &str = "Server error: token may be used, expired, or invalid";
pub const VALIDATE_FAILED: &str = "Failed to validate token";

/// Maps a response to an outcome. `body` is whatever the transport captured;
/// for a HEAD probe it is usually empty, in which case the generic messages apply.
pub fn classify_response(status: u32, meta: ProbeMetadata, body: &[u8]) -> ProbeOutcome {
    match status {
        200..=299 => ProbeOutcome::Valid(meta),
        404 => ProbeOutcome::NotFound,
        405 => ProbeOutcome::MethodNotSupported,
        422 => ProbeOutcome::InvalidRequest(
            validation_message(body).unwrap_or_else(|| INVALID_REQUEST.to_string()),
        ),
        500 => ProbeOutcome::ServerError(
            body_text(body).unwrap_or_else(|| SERVER_ERROR.to_string()),
        ),
        other => ProbeOutcome::Unknown(
            body_text(body)
                .or(meta.reason)
                .or_else(|| canonical_reason(other).map(str::to_string))
                .unwrap_or_else(|| VALIDATE_FAILED.to_string()),
        ),
    }
}

/// First `detail[].msg` of a structured validation error, or a bare string
/// `detail`.
fn validation_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let detail = value.get("detail")?;
    let msg = match detail {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Array(items) => items.first()?.get("msg")?.as_str()?,
        _ => return None,
    };
    let msg = msg.trim();
    (!msg.is_empty()).then(|| msg.to_string())
}

fn body_text(body: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Standard reason phrase for statuses the store is likely to return
/// outside the explicitly classified ones.
fn canonical_reason(status: u32) -> Option<&'static str> {
    let reason = match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        413 => "Payload Too Large",
        429 => "Too Many Requests",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return None,
    };
    Some(reason)
}
