use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::config::AppConfig;
use crate::core::llm::{ChatMessage, LlmProvider};

#[derive(Serialize)]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResContent>,
}

#[derive(Deserialize)]
struct GeminiResContent {
    #[serde(default)]
    parts: Vec<GeminiResPart>,
}

#[derive(Deserialize)]
struct GeminiResPart {
    text: Option<String>,
}

pub struct GoogleProvider {
    api_key: String,
    model: String,
    api_base: String,
    client: Client,
}

impl GoogleProvider {
    pub fn new(api_key: String, model: String, api_base: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_api_base.clone(),
            config.gemini_timeout,
        )
    }

    // The key travels in the `x-goog-api-key` header so it never shows up in
    // a URL that reqwest echoes into its error text.
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

fn build_request(messages: &[ChatMessage]) -> GeminiRequest {
    let mut contents: Vec<GeminiContent> = Vec::new();
    let mut system_instruction: Option<GeminiContent> = None;

    // Leading system messages become the system_instruction; later ones are
    // folded into user turns since Gemini has no mid-conversation system role.
    let mut past_first_non_system = false;

    for m in messages {
        let (role, text) = if m.role == "system" && !past_first_non_system {
            match system_instruction {
                Some(ref mut si) => {
                    if let Some(part) = si.parts.first_mut() {
                        part.text.push('\n');
                        part.text.push_str(&m.content);
                    }
                }
                None => {
                    system_instruction = Some(GeminiContent {
                        role: "user".to_string(),
                        parts: vec![GeminiPart {
                            text: m.content.clone(),
                        }],
                    });
                }
            }
            continue;
        } else if m.role == "system" {
            ("user", format!("[SYSTEM] {}", m.content))
        } else {
            past_first_non_system = true;
            let role = if m.role == "assistant" { "model" } else { "user" };
            (role, m.content.clone())
        };

        // Gemini requires strictly alternating roles. Merge consecutive same-role entries.
        if let Some(last) = contents.last_mut()
            && last.role == role
            && let Some(part) = last.parts.first_mut()
        {
            part.text.push('\n');
            part.text.push_str(&text);
        } else {
            contents.push(GeminiContent {
                role: role.to_string(),
                parts: vec![GeminiPart { text }],
            });
        }
    }

    GeminiRequest {
        system_instruction,
        contents,
    }
}

fn first_text(parsed: GeminiResponse) -> Option<String> {
    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .filter(|t| !t.trim().is_empty())
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn name(&self) -> &str {
        "Google Gemini"
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let req = build_request(messages);
        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| anyhow!("Google Gemini request failed: {}", e.without_url()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!(
                "Google Gemini API Error ({}): {}",
                status.as_u16(),
                res.text().await.unwrap_or_default()
            ));
        }
        let parsed: GeminiResponse = res
            .json()
            .await
            .map_err(|e| anyhow!("Google Gemini returned malformed JSON: {}", e.without_url()))?;
        first_text(parsed).ok_or_else(|| anyhow!("Google Gemini returned no text candidate"))
    }
}
