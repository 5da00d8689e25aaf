//! Generic message and role types used by the *cropwise-core* crate.
//!
//! They mirror the concepts exposed by most chat-completion APIs
//! (“system”, “user”, “assistant”) while staying independent of any single
//! provider.  Provider crates convert them into their own wire structs via a
//! simple `From`/`Into`, and tests can use them without mocking a transport.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Lightweight container representing a single chat message that is
/// independent of any specific LLM provider.
///
/// * `content` – the raw UTF-8 text. Assistant replies may carry no content
///   at all, hence the `Option`.
/// * `role` – see [`GenericRole`] for permitted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericMessage {
    pub content: Option<String>,
    pub role: GenericRole,
    pub name: Option<String>,
}

impl GenericMessage {
    /// Convenience constructor mirroring the field order used by common HTTP
    /// APIs (`role`, then `content`).
    ///
    /// ```rust
    /// use cropwise_core::generic::{GenericMessage, GenericRole};
    ///
    /// let ask = GenericMessage::new("Describe wheat.".into(), GenericRole::User);
    /// assert_eq!(ask.text(), Some("Describe wheat."));
    /// ```
    pub fn new(message: String, role: GenericRole) -> Self {
        Self {
            content: Some(message),
            role,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl ToString) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Borrow the textual content, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// High-level chat roles recognised by most LLM providers.
///
/// The `Display` implementation renders the canonical lowercase name so you
/// can feed it directly into JSON without extra mapping logic.
#[derive(Debug, Clone, Serialize, Deserialize, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenericRole {
    /// “System” messages define global behaviour and style guidelines.
    System,
    /// Messages produced by the assistant / model.
    Assistant,
    /// Messages originating from the human user.
    User,
}

impl Display for GenericRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenericRole::System => write!(f, "system"),
            GenericRole::Assistant => write!(f, "assistant"),
            GenericRole::User => write!(f, "user"),
        }
    }
}

/// Provider-independent result of a single chat completion round-trip.
#[derive(Debug, Clone)]
pub struct GenericChatCompletionResponse<T> {
    pub content: ResponseContent<T>,
    pub usage: Option<GenericUsageReport>,
}

impl<T> GenericChatCompletionResponse<T> {
    pub fn new(content: ResponseContent<T>) -> Self {
        Self {
            content,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: GenericUsageReport) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// What the provider actually handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseContent<T> {
    /// The model stopped on its own.
    Finished(T),
    /// The model hit the output-token limit; the message may be cut off
    /// mid-document.
    Truncated(T),
    /// The response carried no choice or no message.
    Empty,
}

impl<T> ResponseContent<T> {
    /// The message, regardless of whether it was truncated.
    pub fn message(&self) -> Option<&T> {
        match self {
            ResponseContent::Finished(message) | ResponseContent::Truncated(message) => {
                Some(message)
            }
            ResponseContent::Empty => None,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, ResponseContent::Truncated(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericUsageReport {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}
