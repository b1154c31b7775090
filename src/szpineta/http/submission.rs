//! Reading a poem submission out of a request body.

use crate::error::{Result, SiteError};
use crate::model::Submission;
use serde_json::Value;

fn field(value: &Value, name: &str) -> String {
    match value.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn from_json(value: &Value) -> Submission {
    Submission::new(field(value, "poemTitle"), field(value, "poemText"))
}

/// `poemTitle` / `poemText` from an urlencoded form.
pub fn from_form(body: &[u8]) -> Submission {
    let mut submission = Submission::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            "poemTitle" => submission.title = value.into_owned(),
            "poemText" => submission.body = value.into_owned(),
            _ => {}
        }
    }
    submission
}

/// Accepts JSON, urlencoded forms, and JSON sent without a content type. A body
/// that cannot be read as either yields an empty submission, which is then
/// rejected as having no poem text.
pub fn parse(content_type: &str, body: &[u8]) -> Result<Submission> {
    let content_type = content_type.to_ascii_lowercase();

    if content_type.contains("application/json") {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| SiteError::InvalidRequest(format!("Malformed JSON body: {e}")))?;
        return Ok(from_json(&value));
    }
    if content_type.contains("application/x-www-form-urlencoded") {
        return Ok(from_form(body));
    }
    if content_type.contains("multipart/") {
        return Err(SiteError::InvalidRequest(format!(
            "Unsupported content type: {content_type}"
        )));
    }

    Ok(serde_json::from_slice::<Value>(body)
        .map(|value| from_json(&value))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body() {
        let s = parse(
            "application/json; charset=utf-8",
            r#"{"poemTitle":"po pełni","poemText":"a\nb"}"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(s, Submission::new("po pełni", "a\nb"));
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert!(matches!(
            parse("application/json", b"{nope"),
            Err(SiteError::InvalidRequest(_))
        ));
    }

    #[test]
    fn form_body() {
        let s = parse(
            "application/x-www-form-urlencoded",
            b"poemTitle=po+pe%C5%82ni&poemText=a%0D%0Ab&other=1",
        )
        .unwrap();
        assert_eq!(s, Submission::new("po pełni", "a\r\nb"));
    }

    #[test]
    fn raw_json_without_content_type() {
        let s = parse("text/plain", br#"{"poemText":"x"}"#).unwrap();
        assert_eq!(s, Submission::new("", "x"));
    }

    #[test]
    fn unreadable_body_is_empty() {
        assert_eq!(parse("", b"hello").unwrap(), Submission::default());
    }

    #[test]
    fn non_string_fields_are_stringified() {
        let s = parse("application/json", br#"{"poemTitle":null,"poemText":42}"#).unwrap();
        assert_eq!(s, Submission::new("", "42"));
    }

    #[test]
    fn multipart_is_unsupported() {
        assert!(parse("multipart/form-data; boundary=x", b"").is_err());
    }
}
