use serde::{Deserialize, Serialize};

use crate::domain::port::TextGenerator;
use crate::error::PortalError;

fn prompt_for(title: &str) -> String {
    format!(
        "You are a senior editor of psychology guides. Write a professional guide \
         titled \"{title}\".\n\
         Requirements:\n\
         1. Tone: soothing, professional, easy to follow.\n\
         2. Output must be a JSON object with:\n\
         \x20  - summary: an abstract of at most 100 words.\n\
         \x20  - content: the body in Markdown, covering background, advice and exercises.\n\
         Output the JSON directly without ```json fences."
    )
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDraft {
    /// Only requested when seeding whole guides.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
}

/// Text from the first `{` to the last `}`, inclusive.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Escape raw control characters that appear inside JSON string literals,
/// so that models emitting literal newlines in `content` still parse.
pub fn escape_control_chars_in_strings(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in raw.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() && (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }
    out
}

pub fn parse_draft(text: &str) -> Result<AiDraft, PortalError> {
    let raw = extract_json_object(text).ok_or(PortalError::AiResponseMalformed)?;
    serde_json::from_str(&escape_control_chars_in_strings(raw)).map_err(|e| {
        tracing::warn!(error = %e, "AI draft is not valid JSON");
        PortalError::AiResponseMalformed
    })
}

pub struct AiPolishUseCase<A>
where
    A: TextGenerator,
{
    pub ai: A,
}

impl<A> AiPolishUseCase<A>
where
    A: TextGenerator,
{
    pub async fn execute(&self, title: &str) -> Result<AiDraft, PortalError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PortalError::MissingField("title"));
        }
        let text = self.ai.complete(&prompt_for(title)).await?;
        parse_draft(&text)
    }
}
