//! Content-Disposition header parsing (filename* and filename).
//!
//! Best-effort only: every malformed input degrades to an empty string or a
//! raw partial value, never an error.

const EXTENDED_PARAM: &str = "filename*=";
const SIMPLE_PARAM: &str = "filename=";
const UTF8_TAG: &str = "utf-8''";

/// Extracts a human filename from a raw Content-Disposition header value.
///
/// Priority:
/// - `filename*=UTF-8''percent-encoded` (RFC 5987; decoded, raw value kept if
///   decoding fails)
/// - `filename="value"` or `filename=value`
///
/// The first `filename*=` assignment with a value wins outright, even when
/// that value does not decode or is only quotes. Returns `""` when no
/// filename can be determined.
///
/// # Examples
///
/// - `attachment; filename*=UTF-8''%E2%82%AC%20rates.pdf` → `"€ rates.pdf"`
/// - `attachment; filename="report.pdf"` → `"report.pdf"`
/// - `inline` → `""`
pub fn filename_from_disposition(header_value: &str) -> String {
    if header_value.is_empty() {
        return String::new();
    }

    if let Some(raw) = extended_value(header_value) {
        let value = raw.replace('"', "");
        return match percent_decode(&value) {
            Some(decoded) => decoded,
            None => value,
        };
    }

    for raw in param_occurrences(header_value, SIMPLE_PARAM) {
        let raw = raw.strip_prefix('"').unwrap_or(raw);
        let end = raw.find(['"', ';']).unwrap_or(raw.len());
        if end > 0 {
            return raw[..end].to_string();
        }
    }

    String::new()
}

/// Same as [`filename_from_disposition`] for an optional header; `None` when
/// nothing usable was found.
pub fn filename_from_header(header_value: Option<&str>) -> Option<String> {
    header_value
        .map(filename_from_disposition)
        .filter(|name| !name.is_empty())
}

/// Text following each case-insensitive `name` occurrence, in order.
fn param_occurrences<'a>(haystack: &'a str, name: &str) -> Vec<&'a str> {
    // ASCII lowercasing keeps byte offsets aligned with the input.
    haystack
        .to_ascii_lowercase()
        .match_indices(name)
        .map(|(idx, _)| &haystack[idx + name.len()..])
        .collect()
}

/// Raw value of the first `filename*=` carrying a non-empty value. The
/// `UTF-8''` tag is dropped unless nothing would be left after it.
fn extended_value(haystack: &str) -> Option<&str> {
    param_occurrences(haystack, EXTENDED_PARAM)
        .into_iter()
        .find_map(|raw| {
            let tagged = param_value(strip_utf8_tag(raw));
            if !tagged.is_empty() {
                return Some(tagged);
            }
            Some(param_value(raw)).filter(|v| !v.is_empty())
        })
}

fn strip_utf8_tag(raw: &str) -> &str {
    match raw.get(..UTF8_TAG.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(UTF8_TAG) => &raw[UTF8_TAG.len()..],
        _ => raw,
    }
}

/// Value up to the next `;` or end of input.
fn param_value(raw: &str) -> &str {
    match raw.find(';') {
        Some(end) => &raw[..end],
        None => raw,
    }
}

/// Strict percent-decode: `None` on a truncated escape, a non-hex escape, or a
/// byte sequence that is not valid UTF-8.
pub(crate) fn percent_decode(input: &str) -> Option<String> {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            let high = bytes.next().and_then(hex_digit)?;
            let low = bytes.next().and_then(hex_digit)?;
            out.push(high << 4 | low);
        } else {
            out.push(b);
        }
    }
    String::from_utf8(out).ok()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_filename_star_utf8() {
        let r = filename_from_disposition("attachment; filename*=UTF-8''%E2%82%AC%20rates.pdf");
        assert_eq!(r, "€ rates.pdf");
    }

    #[test]
    fn parse_filename_star_lowercase_tag() {
        let r = filename_from_disposition("attachment; FILENAME*=utf-8''caf%C3%A9.txt");
        assert_eq!(r, "café.txt");
    }

    #[test]
    fn parse_filename_star_without_tag() {
        let r = filename_from_disposition("attachment; filename*=plain%20name.bin");
        assert_eq!(r, "plain name.bin");
    }

    #[test]
    fn parse_quoted() {
        let r = filename_from_disposition("attachment; filename=\"report.pdf\"");
        assert_eq!(r, "report.pdf");
    }

    #[test]
    fn parse_token() {
        let r = filename_from_disposition("attachment; filename=report.pdf; size=10");
        assert_eq!(r, "report.pdf");
    }

    #[test]
    fn parse_case_insensitive_name() {
        let r = filename_from_disposition("attachment; FileName=\"Data.CSV\"");
        assert_eq!(r, "Data.CSV");
    }

    #[test]
    fn inline_without_filename_is_empty() {
        assert_eq!(filename_from_disposition("inline"), "");
    }

    #[test]
    fn malformed_or_absent_inputs_are_empty() {
        for input in ["", "attachment", "attachment;", "filename", "filename=", "filename=\"", ";;;"] {
            assert_eq!(filename_from_disposition(input), "", "input {input:?}");
        }
    }

    #[test]
    fn extended_param_takes_precedence() {
        let r = filename_from_disposition(
            "attachment; filename=\"fallback.bin\"; filename*=UTF-8''real%20name.dat",
        );
        assert_eq!(r, "real name.dat");
    }

    #[test]
    fn malformed_extended_param_still_wins() {
        let r = filename_from_disposition(
            "attachment; filename*=UTF-8''bad%ZZname.txt; filename=\"good.txt\"",
        );
        assert_eq!(r, "bad%ZZname.txt");
    }

    #[test]
    fn invalid_utf8_escape_returns_raw_value() {
        let r = filename_from_disposition("attachment; filename*=UTF-8''%FF%FE.bin");
        assert_eq!(r, "%FF%FE.bin");
    }

    #[test]
    fn quoted_extended_value_is_unquoted() {
        let r = filename_from_disposition("attachment; filename*=\"UTF-8''a%20b.txt\"");
        assert_eq!(r, "UTF-8''a b.txt");
    }

    #[test]
    fn empty_extended_value_falls_back_to_simple() {
        let r = filename_from_disposition("attachment; filename*=; filename=\"x.txt\"");
        assert_eq!(r, "x.txt");
    }

    #[test]
    fn quoted_empty_extended_value_still_wins() {
        let r = filename_from_disposition("attachment; filename*=\"\"; filename=\"x.txt\"");
        assert_eq!(r, "");
    }

    #[test]
    fn empty_simple_value_moves_to_next_assignment() {
        let r = filename_from_disposition("attachment; filename=; filename=x.txt");
        assert_eq!(r, "x.txt");
        let r = filename_from_disposition("attachment; filename=\"\"; filename=\"y.txt\"");
        assert_eq!(r, "y.txt");
    }

    #[test]
    fn header_wrapper_maps_empty_to_none() {
        assert_eq!(filename_from_header(None), None);
        assert_eq!(filename_from_header(Some("inline")), None);
        assert_eq!(
            filename_from_header(Some("attachment; filename=a.txt")).as_deref(),
            Some("a.txt")
        );
    }
}
