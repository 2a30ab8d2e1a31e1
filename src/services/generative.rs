use std::time::Duration;

use crate::config::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Outcome of a generation request. The fallback path never raises:
/// callers always get usable text.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Live(String),
    Fallback(&'static str),
}

impl Generated {
    pub fn into_text(self) -> String {
        match self {
            Generated::Live(text) => text,
            Generated::Fallback(text) => text.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct GenerativeClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GenerativeClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        }
    }

    /// Call the generation endpoint, retry once after a fixed backoff,
    /// and substitute the fallback if the retry also fails.
    pub async fn generate(&self, prompt: &str, fallback: &'static str) -> Generated {
        match self.call(prompt).await {
            Ok(text) => Generated::Live(text),
            Err(e) => {
                tracing::warn!(error = %e, "Generation request failed, retrying");
                tokio::time::sleep(RETRY_BACKOFF).await;
                match self.call(prompt).await {
                    Ok(text) => Generated::Live(text),
                    Err(e) => {
                        tracing::warn!(error = %e, "Generation retry failed, using fallback");
                        Generated::Fallback(fallback)
                    }
                }
            }
        }
    }

    async fn call(&self, prompt: &str) -> Result<String, anyhow::Error> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {}: {}", status, body);
        }

        let data: serde_json::Value = response.json().await?;
        extract_text(&data).ok_or_else(|| anyhow::anyhow!("Gemini response had no text part"))
    }
}

/// Pull the first candidate's text out of a generateContent response.
fn extract_text(data: &serde_json::Value) -> Option<String> {
    data["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let data = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Take a deep breath." }]
                }
            }]
        });
        assert_eq!(extract_text(&data), Some("Take a deep breath.".to_string()));
    }

    #[test]
    fn test_extract_text_missing() {
        let data = serde_json::json!({ "candidates": [] });
        assert_eq!(extract_text(&data), None);
    }

    #[test]
    fn test_generated_into_text() {
        assert_eq!(Generated::Live("hi".into()).into_text(), "hi");
        assert_eq!(Generated::Fallback("fb").into_text(), "fb");
    }
}
