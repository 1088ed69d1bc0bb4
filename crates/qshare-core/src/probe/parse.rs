//! Parse HTTP response header lines into ProbeMetadata.

use super::ProbeMetadata;

/// Parse collected header lines into ProbeMetadata.
///
/// With redirects followed, curl reports the headers of every hop; only the
/// block after the last status line describes the final response.
pub(crate) fn parse_headers(lines: &[String]) -> ProbeMetadata {
    let mut meta = ProbeMetadata::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            meta = ProbeMetadata {
                reason: parse_reason(line),
                ..ProbeMetadata::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-disposition") {
                meta.content_disposition = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-type") {
                meta.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    meta.content_length = Some(n);
                }
            }
        }
    }

    meta
}

/// Reason phrase from a status line such as `HTTP/1.1 404 Not Found`.
/// HTTP/2 status lines carry none.
fn parse_reason(status_line: &str) -> Option<String> {
    let mut parts = status_line.splitn(3, ' ');
    let _version = parts.next()?;
    let _code = parts.next()?;
    let reason = parts.next()?.trim();
    if reason.is_empty() {
        None
    } else {
        Some(reason.to_string())
    }
}
