//! Builder‐style helper for constructing **Markdown prompts**.
//!
//! Every method returns `self`, enabling call-chaining:
//!
//! ```rust
//! use cropwise_prompt::builder::PromptBuilder;
//!
//! let md = PromptBuilder::new()
//!     .add_line("Describe \"Wheat\" as JSON.")
//!     .add_blank_line()
//!     .add_section_h2("Rules")
//!     .add_numbered_list(["Return only JSON", "Use metric units"])
//!     .finalize();
//!
//! assert!(md.starts_with("Describe \"Wheat\""));
//! assert!(md.contains("2. Use metric units"));
//! ```
//!
//! The builder performs **no validation** and no smart formatting: newlines
//! and whitespace are emitted exactly as requested, so identical call chains
//! always yield identical text.

use std::fmt::Display;

/// Fluent helper to produce markdown fragments.
///
/// Internally it owns a `String` buffer that grows with each chained call.
/// Once you’re done, call [`Self::finalize`] to obtain the assembled markdown.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    buffer: String,
}

impl PromptBuilder {
    /// Create a fresh, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a level-2 (`##`) heading.
    pub fn add_section_h2(self, line: impl Display) -> Self {
        self.add_line(format_args!("## {line}"))
    }

    /// Add a plain line of text and a trailing newline.
    pub fn add_line(mut self, line: impl Display) -> Self {
        self.buffer.push_str(&line.to_string());
        self.buffer.push('\n');
        self
    }

    /// Add a `1.`-based numbered list, one item per line.
    pub fn add_numbered_list<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        items
            .into_iter()
            .enumerate()
            .fold(self, |builder, (idx, item)| {
                builder.add_line(format_args!("{}. {item}", idx + 1))
            })
    }

    /// Embed a code block fenced as `json`.
    pub fn add_text_json(self, content: impl Display) -> Self {
        self.add_line("```json").add_line(content).add_line("```")
    }

    /// Insert a single blank line.
    pub fn add_blank_line(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    /// Retrieve the accumulated markdown and consume the builder.
    pub fn finalize(self) -> String {
        self.buffer
    }
}
