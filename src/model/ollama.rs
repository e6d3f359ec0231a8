//! Ollama chat client (`POST {base_url}/api/chat`, non-streaming).

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::CuratorConfig;
use crate::model::{ChatModel, ChatRequest, ModelError};

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "no_options")]
    options: &'a Map<String, Value>,
}

fn no_options(options: &&Map<String, Value>) -> bool {
    options.is_empty()
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaReply,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: String,
}

/// Client for a local or remote Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &CuratorConfig) -> Self {
        Self::new(&config.base_url, &config.model)
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<String, ModelError> {
        let mut messages = Vec::with_capacity(2);
        if !request.system.is_empty() {
            messages.push(OllamaMessage {
                role: "system",
                content: &request.system,
            });
        }
        messages.push(OllamaMessage {
            role: "user",
            content: &request.user,
        });

        let body = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: &request.options,
        };

        let url = self.chat_url();
        debug!("Posting curator request to {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        Ok(reply.message.content)
    }
}
