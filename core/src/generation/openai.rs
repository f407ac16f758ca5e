//! OpenAI chat completions API generator.

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::generation::ChatGenerator;
use crate::generation::GenerationError;
use crate::prompt::ChatMessage;
use crate::prompt::MessageContent;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Generator backed by the OpenAI chat completions API.
pub struct OpenAIGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl OpenAIGenerator {
    /// Create a generator for `model`. `endpoint` points at a compatible
    /// proxy; `None` uses the OpenAI API.
    pub fn new(api_key: String, model: String, endpoint: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            max_tokens: None,
            temperature: None,
        }
    }

    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait::async_trait]
impl ChatGenerator for OpenAIGenerator {
    fn model_id(&self) -> String {
        format!("openai:{}", self.model)
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        if !self.is_available() {
            return Err(GenerationError::ProviderNotAvailable(
                "OPENAI_API_KEY not set".to_string(),
            ));
        }

        let request = ChatRequest {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!("requesting completion from {}", self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::RequestFailed { status, body });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyCompletion)
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: Vec<WirePart>,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        let content = message
            .content
            .iter()
            .map(|part| match part {
                MessageContent::Text(text) => WirePart::Text { text: text.clone() },
                MessageContent::Image(handle) => WirePart::ImageUrl {
                    image_url: WireImageUrl {
                        url: handle.to_url(),
                    },
                },
            })
            .collect();
        Self {
            role: message.role.as_str(),
            content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart {
    Text { text: String },
    ImageUrl { image_url: WireImageUrl },
}

#[derive(Debug, Serialize)]
struct WireImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
