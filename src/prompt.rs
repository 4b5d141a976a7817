use crate::guardrail::REFUSAL_REPLY;

const SYSTEM_INSTRUCTIONS: &str = concat!(
    "You are Krishi Chatbox, an assistant for farmers. ",
    "Only answer agriculture-related queries: crops, soil, irrigation, pests, fertilizers, ",
    "weather, farm machinery, market prices, and related topics. ",
    "Write practical, detailed guidance tailored for Indian conditions when relevant. ",
    "Structure answers with short paragraphs and bullet points. Include: a brief overview, ",
    "step-by-step actions, recommended quantities/dosages, timing/frequency, common mistakes, ",
    "and a concise summary. Aim for 150–300 words (or more if needed). ",
    "If the user's question is not agriculture-related, respond exactly with: ",
);

const STYLE_INSTRUCTION: &str =
    "Use clear headings and bullet points where helpful. Avoid filler and be specific.";

const TRANSLATE_INSTRUCTION: &str =
    "Translate the following text. Return only the translated text with no prefix.";

/// Output language understood by the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Kannada,
}

impl Language {
    /// Any code starting with `kn` (`kn`, `kn-IN`) is Kannada, everything else English.
    pub fn from_code(code: &str) -> Self {
        if code.starts_with("kn") {
            Language::Kannada
        } else {
            Language::English
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Kannada => "Kannada",
        }
    }

    fn respond_directive(&self) -> String {
        format!("Respond in {}.", self.name())
    }
}

/// The fixed system instructions, ending with the exact refusal sentence.
pub fn system_instructions() -> String {
    format!("{SYSTEM_INSTRUCTIONS}{REFUSAL_REPLY}")
}

/// Builds the prompt for a chat question.
///
/// `input_lang` only labels the message; `resp_lang` selects the
/// "Respond in ..." directive.
pub fn build_prompt(message: &str, input_lang: &str, resp_lang: &str) -> String {
    format!(
        "{} {} {}\n\nUser ({}): {}",
        system_instructions(),
        Language::from_code(resp_lang).respond_directive(),
        STYLE_INSTRUCTION,
        input_lang,
        message
    )
}

/// Builds the instruction-prefixed prompt for a verbatim translation.
pub fn build_translation_prompt(text: &str, target_lang: &str) -> String {
    format!(
        "{} Target language: {}.\n\n{}",
        TRANSLATE_INSTRUCTION,
        Language::from_code(target_lang).name(),
        text
    )
}
