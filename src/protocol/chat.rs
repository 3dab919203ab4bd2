//! Chat-style messages.
//!
//! Disconnect reasons arrive as a recursively structured JSON document: a
//! primary `text` field plus an ordered list of `extra` fragments, each
//! either a plain string or another such document. This client only ever
//! needs the flattened plain text.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One fragment of a chat message's `extra` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatFragment {
    Plain(String),
    Component(ChatComponent),
}

/// A structured chat component. Formatting fields (color, bold, events) are
/// irrelevant to flattening and are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChatComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<ChatFragment>,
}

impl ChatComponent {
    /// A component carrying only plain text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            extra: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Flattens the component to plain text: the primary text, then every
    /// fragment in order. Fragments lacking a text field contribute nothing;
    /// they are logged and skipped rather than failing the whole message.
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for fragment in &self.extra {
            match fragment {
                ChatFragment::Plain(text) => out.push_str(text),
                ChatFragment::Component(component) => {
                    if component.text.is_none() {
                        warn!(fragment = %component.to_json(), "chat fragment has no text field, skipping");
                        continue;
                    }
                    out.push_str(&component.flatten());
                }
            }
        }
        out
    }
}
