use serde::{Deserialize, Serialize};

use crate::chat::interface::{parse_body, string_field, trimmed};

/// Body of `POST /translate`.
#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "targetLang")]
    pub target_lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated: String,
}

impl TranslateRequest {
    pub fn from_slice(body: &[u8]) -> Self {
        let body = parse_body(body);
        Self {
            text: string_field(&body, "text"),
            target_lang: string_field(&body, "targetLang"),
        }
    }

    pub fn text(&self) -> &str {
        trimmed(&self.text).unwrap_or("")
    }

    pub fn target_lang(&self) -> &str {
        trimmed(&self.target_lang).unwrap_or("en")
    }
}
