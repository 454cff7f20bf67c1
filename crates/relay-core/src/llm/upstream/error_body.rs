//! Short, credential-free descriptions of upstream error bodies.
//!
//! OpenRouter reports failures as `{"error": {"message": "...", "code": 401}}`.
//! Bodies of that shape are reduced to their message and code; anything else
//! is kept as plain text. Keys and bearer tokens are masked in both cases.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Longest description handed to logs or clients, in characters
const MAX_DETAIL_CHARS: usize = 512;

static CREDENTIAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}|\bsk-or-[A-Za-z0-9\-]{8,}")
        .expect("valid credential regex")
});

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Deserialize)]
struct ErrorObject {
    message: Option<String>,
    code: Option<Value>,
}

/// Describe an upstream error body for logs and the `detail` field
pub fn describe_error_body(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "<empty error body>".to_string();
    }

    let text = match serde_json::from_str::<ErrorEnvelope>(raw) {
        Ok(ErrorEnvelope {
            error:
                ErrorObject {
                    message: Some(message),
                    code,
                },
        }) => match code {
            Some(Value::String(code)) => format!("{} (code {})", message, code),
            Some(Value::Null) | None => message,
            Some(code) => format!("{} (code {})", message, code),
        },
        _ => raw.to_string(),
    };

    truncate(&mask_credentials(&text))
}

fn mask_credentials(text: &str) -> String {
    CREDENTIAL_RE.replace_all(text, "[REDACTED]").into_owned()
}

fn truncate(text: &str) -> String {
    let total = text.chars().count();
    if total <= MAX_DETAIL_CHARS {
        return text.to_string();
    }
    let kept: String = text.chars().take(MAX_DETAIL_CHARS).collect();
    format!("{}... [{} more chars]", kept, total - MAX_DETAIL_CHARS)
}
