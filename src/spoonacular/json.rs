//! JSON parsing with contextual errors.
//!
//! Upstream payloads are large and occasionally shift shape; a bare serde
//! error ("invalid type at line 1 column 48213") is useless against a
//! single-line body. This wraps deserialization with `serde_path_to_error`
//! and attaches a snippet of the body around the failure point.

use anyhow::Result;

/// Deserialize `body`, reporting the serde path and a body snippet on
/// failure.
pub fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let jd = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(jd).map_err(|err| {
        let inner = err.inner();
        let snippet = snippet_around(body, inner.line(), inner.column());
        let path = err.path().to_string();
        if path.is_empty() || path == "." {
            anyhow::anyhow!("{inner}\nnear: {snippet}")
        } else {
            anyhow::anyhow!("at path '{path}': {inner}\nnear: {snippet}")
        }
    })
}

/// Extract up to `2 * CONTEXT` characters of the offending line, centered
/// on the error column.
fn snippet_around(body: &str, line: usize, column: usize) -> String {
    const CONTEXT: usize = 40;

    let Some(target) = body.lines().nth(line.saturating_sub(1)) else {
        return "(no line)".to_string();
    };
    if target.is_empty() {
        return "(empty line)".to_string();
    }

    let chars: Vec<char> = target.chars().collect();
    let center = column.min(chars.len());
    let start = center.saturating_sub(CONTEXT);
    let end = (center + CONTEXT).min(chars.len());

    let mut out = String::new();
    if start > 0 {
        out.push('…');
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        id: i64,
        #[allow(dead_code)]
        title: String,
    }

    #[test]
    fn parses_valid_payload() {
        let payload: Payload = parse_json(r#"{"id": 5, "title": "Soup"}"#).unwrap();
        assert_eq!(payload.id, 5);
    }

    #[test]
    fn error_includes_serde_path() {
        let err = parse_json::<Payload>(r#"{"id": "five", "title": "Soup"}"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'id'"), "missing path in: {msg}");
        assert!(msg.contains("near:"), "missing snippet in: {msg}");
    }

    #[test]
    fn snippet_is_bounded_on_long_lines() {
        let long = format!(r#"{{"id": {}, "title": 3}}"#, "1".repeat(500));
        let err = parse_json::<Payload>(&long).unwrap_err();
        let snippet_line = err.to_string().lines().last().unwrap().to_string();
        assert!(snippet_line.chars().count() < 100, "snippet too long: {snippet_line}");
    }
}
