// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AdvisorConfig;
use crate::error::AppError;
use crate::models::ChatMessage;
use crate::utils::http_client;
use anyhow::Result;
use serde::{Deserialize, Serialize};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Text-in, text-out reply generator.
pub trait Advisor {
    /// `history` is oldest first and does not include `message`.
    fn reply(&self, briefing: &str, history: &[ChatMessage], message: &str) -> Result<String>;
}

pub struct AnthropicAdvisor {
    config: AdvisorConfig,
    client: reqwest::blocking::Client,
}

impl AnthropicAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self> {
        Ok(Self {
            config,
            client: http_client()?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(AdvisorConfig::from_env()?)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// First text block, or empty when the reply carried none.
fn first_text(resp: MessagesResponse) -> String {
    resp.content
        .into_iter()
        .find(|b| b.kind == "text")
        .map(|b| b.text)
        .unwrap_or_default()
}

fn build_request<'a>(
    model: &'a str,
    max_tokens: u32,
    briefing: &'a str,
    history: &'a [ChatMessage],
    message: &'a str,
) -> MessagesRequest<'a> {
    let mut messages: Vec<WireMessage<'a>> = history
        .iter()
        .map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        })
        .collect();
    messages.push(WireMessage {
        role: "user",
        content: message,
    });
    MessagesRequest {
        model,
        max_tokens,
        system: briefing,
        messages,
    }
}

impl Advisor for AnthropicAdvisor {
    fn reply(&self, briefing: &str, history: &[ChatMessage], message: &str) -> Result<String> {
        let body = build_request(
            &self.config.model,
            self.config.max_tokens,
            briefing,
            history,
            message,
        );

        tracing::debug!(model = %self.config.model, turns = history.len() + 1, "calling advisor");
        let resp = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .map_err(|e| AppError::Advisor(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(AppError::Advisor(format!("HTTP {}: {}", status, text)).into());
        }
        let parsed: MessagesResponse = resp
            .json()
            .map_err(|e| AppError::Advisor(e.to_string()))?;
        Ok(first_text(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_text_block() {
        let raw = r#"{"content":[{"type":"tool_use","id":"x"},{"type":"text","text":"Yes, buy it."}]}"#;
        let resp: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_text(resp), "Yes, buy it.");
    }

    #[test]
    fn no_text_block_is_empty() {
        let resp: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert_eq!(first_text(resp), "");
    }

    #[test]
    fn request_serializes_history_in_order() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let body = build_request("m", 10, "brief", &history, "can I buy shoes?");
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["system"], "brief");
        assert_eq!(v["messages"][1]["role"], "assistant");
        assert_eq!(v["messages"][2]["content"], "can I buy shoes?");
    }
}
