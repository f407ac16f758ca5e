//! Chat prompt construction for context-conditioned generation.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Fixed instruction for the system turn of a retrieval-augmented prompt.
pub const RAG_SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant. Answer the question using only the provided context.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to an image. Pixel data never flows through messages;
/// decoding is the multimodal processor's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageHandle {
    Path(PathBuf),
    Url(String),
}

impl ImageHandle {
    /// URL form for wire formats that only accept URLs.
    pub fn to_url(&self) -> String {
        match self {
            ImageHandle::Path(path) => format!("file://{}", path.display()),
            ImageHandle::Url(url) => url.clone(),
        }
    }
}

/// One content element of a chat message: text or an image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageContent {
    Text(String),
    Image(ImageHandle),
}

/// A role-tagged chat turn with ordered content elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<MessageContent>,
}

impl ChatMessage {
    pub const fn new(role: Role, content: Vec<MessageContent>) -> Self {
        Self { role, content }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![MessageContent::Text(text.into())])
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![MessageContent::Text(text.into())])
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![MessageContent::Text(text.into())])
    }

    /// Concatenation of the text elements, skipping images.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text(text) => Some(text.as_str()),
                MessageContent::Image(_) => None,
            })
            .collect()
    }

    /// Image handles in this turn, in content order.
    pub fn images(&self) -> impl Iterator<Item = &ImageHandle> {
        self.content.iter().filter_map(|part| match part {
            MessageContent::Image(handle) => Some(handle),
            MessageContent::Text(_) => None,
        })
    }
}

/// Assemble the two-message retrieval prompt.
///
/// The user turn is the literal template `Context:\n{snippet}\n\nQuestion:
/// {query}`. Snippet and query are interpolated verbatim with no escaping
/// or sanitization, so untrusted input must be filtered upstream.
pub fn build_rag_prompt(snippet: &str, query: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(RAG_SYSTEM_INSTRUCTION),
        ChatMessage::user(format!("Context:\n{snippet}\n\nQuestion: {query}")),
    ]
}
