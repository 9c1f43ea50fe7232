//! Completion endpoint clients and the abstraction over them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::AssistantConfig;
use crate::error::{NetsightError, Result};
use crate::message::{Message, Role};

/// One request per user turn against a remote completion endpoint.
///
/// Implementations perform no retries and no cancellation; a call runs to
/// completion or failure once started.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

impl std::fmt::Debug for dyn CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CompletionClient")
    }
}

/// Builds the adapter selected by the configured provider.
pub fn build_client(cfg: &AssistantConfig) -> Result<Arc<dyn CompletionClient>> {
    match cfg.provider.as_str() {
        "openai-compat" | "openai" | "groq" => {
            Ok(Arc::new(OpenAiCompatClient::from_config(cfg)?))
        }
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(cfg)?)),
        other => Err(NetsightError::Config(format!(
            "unknown completion provider `{other}`"
        ))),
    }
}

fn status_error(status: reqwest::StatusCode, body: &str, provider: &str) -> NetsightError {
    NetsightError::Completion(format!("{provider} request failed with {status}: {body}"))
}

// There is deliberately no request timeout here: the original flow lets a
// hung call keep the session pending indefinitely. Known gap, kept as-is.
fn build_http() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .map_err(|err| NetsightError::Completion(format!("http client error: {err}")))
}

/// Client for OpenAI-compatible chat completion endpoints (Groq, OpenAI, ...).
#[derive(Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    model: String,
    api_key: String,
    base_url: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiCompatClient {
    pub fn from_config(cfg: &AssistantConfig) -> Result<Self> {
        let api_key = cfg.api_key.clone().ok_or_else(|| {
            NetsightError::Config("missing API key; set NETSIGHT_API_KEY or config `api_key`".into())
        })?;
        let base_url = cfg
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.groq.com/openai/v1".to_string());
        Ok(Self {
            http: build_http()?,
            model: cfg.model.clone(),
            api_key,
            base_url,
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        })
    }

    fn to_wire(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect()
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": self.to_wire(messages),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|err| NetsightError::Completion(format!("openai-compat request error: {err}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body, "openai-compat"));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|err| NetsightError::MalformedReply(format!("openai-compat body: {err}")))?;
        parse_openai_reply(body)
    }
}

/// Extracts the reply text from an OpenAI-shaped response body: the content
/// of the first choice's message. Anything else is a malformed reply.
pub fn parse_openai_reply(body: Value) -> Result<String> {
    let parsed: OpenAiResponse = serde_json::from_value(body)
        .map_err(|err| NetsightError::MalformedReply(format!("openai-compat shape: {err}")))?;
    let first = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| NetsightError::MalformedReply("openai-compat returned no choices".into()))?;
    first
        .message
        .content
        .ok_or_else(|| NetsightError::MalformedReply("openai-compat choice has no content".into()))
}

/// Client for the Anthropic messages endpoint.
#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    model: String,
    api_key: String,
    endpoint: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn from_config(cfg: &AssistantConfig) -> Result<Self> {
        let api_key = cfg.api_key.clone().ok_or_else(|| {
            NetsightError::Config("missing API key; set NETSIGHT_API_KEY or config `api_key`".into())
        })?;
        let endpoint = cfg
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.anthropic.com/v1/messages".to_string());
        Ok(Self {
            http: build_http()?,
            model: cfg.model.clone(),
            api_key,
            endpoint,
            max_tokens: cfg.max_tokens,
        })
    }

    fn to_wire(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect()
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let system = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.clone());
        let payload = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system,
            "messages": self.to_wire(messages),
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&payload)
            .send()
            .await
            .map_err(|err| NetsightError::Completion(format!("anthropic request error: {err}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body, "anthropic"));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|err| NetsightError::MalformedReply(format!("anthropic body: {err}")))?;
        parse_anthropic_reply(body)
    }
}

/// Extracts the reply text from an Anthropic-shaped response body: the
/// concatenation of every `type == "text"` content block.
pub fn parse_anthropic_reply(body: Value) -> Result<String> {
    let parsed: AnthropicResponse = serde_json::from_value(body)
        .map_err(|err| NetsightError::MalformedReply(format!("anthropic shape: {err}")))?;
    let text: String = parsed
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();
    if text.is_empty() {
        return Err(NetsightError::MalformedReply(
            "anthropic reply contained no text blocks".into(),
        ));
    }
    Ok(text)
}

/// A deterministic client used for tests: replays scripted outcomes in order
/// and counts how many requests were issued.
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(outcomes: Vec<std::result::Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(replies: Vec<&str>) -> Arc<Self> {
        Self::new(replies.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _messages: &[Message]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .outcomes
            .lock()
            .expect("scripted client poisoned")
            .pop_front()
            .ok_or_else(|| {
                NetsightError::Completion("ScriptedClient ran out of scripted outcomes".into())
            })?;
        next.map_err(NetsightError::Completion)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}
