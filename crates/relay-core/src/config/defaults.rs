//! Default configuration values

/// OpenRouter-compatible API root
pub const BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Fallback candidates, highest priority first
pub const MODELS: &[&str] = &[
    "xiaomi/mimo-v2-flash:free",
    "deepseek/deepseek-chat",
    "google/gemini-2.0-flash-exp:free",
];

/// History turns kept per request (0 = unbounded)
pub const HISTORY_LIMIT: usize = 4;

/// Value of the `HTTP-Referer` identifying header
pub const REFERER: &str = "http://localhost";

/// Value of the `X-Title` identifying header
pub const TITLE: &str = "Chat Relay";

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "RELAY";

/// Environment variable holding the upstream credential
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default timeout values for upstream calls
pub mod timeouts {
    /// Connect timeout; a hung connect must not block fallback
    pub const CONNECT_SECS: u64 = 5;

    /// Read timeout; generations may be slow but not unbounded
    pub const READ_SECS: u64 = 60;
}

/// Built-in system prompt used when none is configured
pub const SYSTEM_PROMPT: &str = r#"
You are a friendly and enthusiastic technical assistant specializing in electronics, programming, and web development.

## Style
1. Be warm, welcoming and positive.
2. Use simple English that a beginner can follow.
3. Explain technical concepts step by step. When you write code, add short comments that explain what the lines do.

## Focus
Help the user build their project and understand the technology behind it. Answer the question that was asked; do not promote products or services unless the user asks about them.
"#;
