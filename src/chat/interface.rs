use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /ask`.
///
/// Every field is optional on the wire and read on its own: a field that is
/// not a string takes its default without affecting the others. An
/// unparseable body is treated like an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Language the question is written in
    #[serde(default)]
    pub lang: Option<String>,
    /// Language of the answer, defaults to `lang`
    #[serde(default, rename = "respLang")]
    pub resp_lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub reply: String,
    pub timestamp: String,
}

impl AskRequest {
    pub fn from_slice(body: &[u8]) -> Self {
        let body = parse_body(body);
        Self {
            message: string_field(&body, "message"),
            lang: string_field(&body, "lang"),
            resp_lang: string_field(&body, "respLang"),
        }
    }

    pub fn message(&self) -> &str {
        trimmed(&self.message).unwrap_or("")
    }

    pub fn input_lang(&self) -> &str {
        trimmed(&self.lang).unwrap_or("en")
    }

    pub fn response_lang(&self) -> &str {
        trimmed(&self.resp_lang).unwrap_or_else(|| self.input_lang())
    }
}

impl AskResponse {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            timestamp: utc_timestamp(),
        }
    }
}

/// Current UTC time as ISO-8601 with a trailing `Z`.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The body as JSON, or `Null` when it does not parse.
pub(crate) fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// A string field of a JSON object; anything else reads as absent.
pub(crate) fn string_field(body: &Value, name: &str) -> Option<String> {
    body.get(name).and_then(Value::as_str).map(str::to_string)
}

/// The trimmed value, or `None` when absent or blank.
pub(crate) fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let req = AskRequest::from_slice(br#"{"message": "  rice blast  "}"#);
        assert_eq!(req.message(), "rice blast");
        assert_eq!(req.input_lang(), "en");
        assert_eq!(req.response_lang(), "en");
    }

    #[test]
    fn response_lang_follows_input_lang() {
        let req = AskRequest::from_slice(br#"{"message": "x", "lang": "kn"}"#);
        assert_eq!(req.response_lang(), "kn");

        let req = AskRequest::from_slice(br#"{"message": "x", "lang": "kn", "respLang": "en"}"#);
        assert_eq!(req.input_lang(), "kn");
        assert_eq!(req.response_lang(), "en");
    }

    #[test]
    fn null_and_empty_fields_take_defaults() {
        let req = AskRequest::from_slice(br#"{"message": null, "lang": "", "respLang": null}"#);
        assert_eq!(req.message(), "");
        assert_eq!(req.input_lang(), "en");
        assert_eq!(req.response_lang(), "en");
    }

    #[test]
    fn malformed_body_is_empty_request() {
        assert_eq!(AskRequest::from_slice(b"not json").message(), "");
        assert_eq!(AskRequest::from_slice(b"").message(), "");
        assert_eq!(AskRequest::from_slice(b"[1, 2]").message(), "");
    }

    #[test]
    fn wrong_typed_field_keeps_the_others() {
        let req = AskRequest::from_slice(br#"{"message": "wheat fertilizer", "lang": 5}"#);
        assert_eq!(req.message(), "wheat fertilizer");
        assert_eq!(req.input_lang(), "en");

        let req = AskRequest::from_slice(br#"{"message": ["wheat"], "lang": "kn", "respLang": {}}"#);
        assert_eq!(req.message(), "");
        assert_eq!(req.input_lang(), "kn");
        assert_eq!(req.response_lang(), "kn");
    }

    #[test]
    fn timestamp_is_utc_with_z() {
        let ts = utc_timestamp();
        assert!(ts.ends_with('Z'), "{ts}");
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
