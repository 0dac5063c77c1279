//! Emphasis markers in message content.
//!
//! Content keeps its raw `**strong**` markers; renderers split it into spans
//! here. Unpaired markers stay literal.

use regex::Regex;
use serde::Serialize;

use crate::chat::core::errors::ChatResult;

/// A run of message text.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    /// Unstyled text.
    Plain(String),
    /// Text between a pair of markers.
    Strong(String),
}

impl Span {
    /// Text of the span without markers.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Strong(text) => text,
        }
    }
}

/// Splits content on `**` marker pairs.
#[derive(Debug, Clone)]
pub struct EmphasisParser {
    pattern: Regex,
}

impl EmphasisParser {
    /// Compile the marker pattern.
    ///
    /// # Errors
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> ChatResult<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?s)\*\*(.+?)\*\*")?,
        })
    }

    /// Split `content` into plain and strong spans, in order.
    #[must_use]
    pub fn split(&self, content: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut cursor = 0;

        for caps in self.pattern.captures_iter(content) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > cursor {
                spans.push(Span::Plain(content[cursor..whole.start()].to_string()));
            }
            spans.push(Span::Strong(inner.as_str().to_string()));
            cursor = whole.end();
        }

        if cursor < content.len() {
            spans.push(Span::Plain(content[cursor..].to_string()));
        }
        spans
    }

    /// Content with markers removed.
    #[must_use]
    pub fn strip(&self, content: &str) -> String {
        self.split(content).iter().map(Span::text).collect()
    }
}
