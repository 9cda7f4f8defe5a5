//! Reqwest-based LLM client for OpenAI-compatible Chat Completions streaming.
//! Defaults to Gemini's OpenAI-compatible endpoint.

use std::{pin::Pin, time::Duration};

use anyhow::{anyhow, Context, Result};
use async_stream::try_stream;
use futures_core::Stream;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: Option<u32>,
}

#[derive(Debug)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let timeout = cfg.get_u64("REQUEST_TIMEOUT").unwrap_or(60);
        let api_base_url = cfg.get("API_BASE_URL").unwrap_or_else(|| "default".into());
        let base_url = if api_base_url == "default" {
            GEMINI_BASE_URL.to_string()
        } else {
            api_base_url.trim_end_matches('/').to_string()
        };
        let api_key = cfg
            .api_key()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY environment variable is not set"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { http, base_url, api_key })
    }

    pub fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        opts: ChatOptions,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>> {
        let http = self.http.clone();
        let url = format!("{}/chat/completions", self.base_url);
        let api_key = self.api_key.clone();

        Box::pin(try_stream! {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("text/event-stream"));
            let hv = HeaderValue::from_str(&format!("Bearer {}", api_key))?;
            headers.insert(AUTHORIZATION, hv);

            let mut body = serde_json::json!({
                "model": opts.model,
                "temperature": opts.temperature,
                "top_p": opts.top_p,
                "messages": messages,
                "stream": true,
            });
            if let Some(max) = opts.max_tokens {
                body["max_tokens"] = serde_json::json!(max);
            }

            tracing::debug!(%url, model = %opts.model, "sending chat request");
            let resp = http
                .post(url)
                .headers(headers)
                .json(&body)
                .send()
                .await
                .context("failed to send chat request")?;

            if !resp.status().is_success() {
                let status = resp.status();
                Err(anyhow!("LLM error: {}", status))?;
            }

            let mut buf = String::new();
            let mut stream = resp.bytes_stream();
            use futures_util::StreamExt as _;

            while let Some(chunk) = stream.next().await {
                let bytes = chunk.context("stream error")?;
                buf.push_str(&String::from_utf8_lossy(&bytes));
                while let Some(pos) = buf.find('\n') {
                    let line: String = buf.drain(..=pos).collect();
                    match parse_sse_line(&line) {
                        Some(SseLine::Done) => { yield StreamEvent::Done; return; }
                        Some(SseLine::Content(parts)) => {
                            for part in parts { yield StreamEvent::Content(part); }
                        }
                        None => {}
                    }
                }
            }
            yield StreamEvent::Done;
        })
    }

    /// Drain a chat stream into one string, calling `on_chunk` as text arrives.
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        opts: ChatOptions,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<String> {
        use futures_util::StreamExt as _;

        let mut stream = self.chat_stream(messages, opts);
        let mut text = String::new();
        while let Some(ev) = stream.next().await {
            match ev? {
                StreamEvent::Content(t) => {
                    on_chunk(&t);
                    text.push_str(&t);
                }
                StreamEvent::Done => break,
            }
        }
        Ok(text)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Content(String),
    Done,
}

#[derive(Debug, PartialEq, Eq)]
enum SseLine {
    Content(Vec<String>),
    Done,
}

fn parse_sse_line(line: &str) -> Option<SseLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let payload = line.strip_prefix("data:")?.trim();
    if payload == "[DONE]" {
        return Some(SseLine::Done);
    }
    // Malformed lines are skipped
    let chunk: Chunk = serde_json::from_str(payload).ok()?;
    let parts: Vec<String> = chunk
        .choices
        .into_iter()
        .filter_map(|c| c.delta.and_then(|d| d.content))
        .filter(|c| !c.is_empty())
        .collect();
    Some(SseLine::Content(parts))
}

/// Wrap a question in the expert-developer answer template.
pub fn build_prompt(question: &str, language: &str) -> String {
    format!(
        "As an expert {language} developer, please help with this question:\n\n\
         Question: {question}\n\n\
         Format your response with:\n\
         1. Brief explanation\n\
         2. Code example with comments\n\
         3. Key points to remember\n\n\
         Please use Markdown code blocks for code examples."
    )
}

#[derive(Debug, Deserialize)]
struct Chunk {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}
