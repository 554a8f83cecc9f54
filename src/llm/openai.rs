//! OpenAI-compatible chat-completions backend.

use async_trait::async_trait;
use serde_json::Value;

use super::LanguageModel;
use crate::config::LlmConfig;
use crate::error::GatewayError;

pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            client,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError> {
        let request = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "max_tokens": max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await?;
        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| GatewayError::Decode("missing choices[0].message.content".into()))?;

        Ok(content.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_for(base_url: String) -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".into(),
            base_url,
            ..LlmConfig::default()
        }
    }

    #[tokio::test]
    async fn complete_returns_trimmed_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "max_tokens": 500
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "  Alice works on ProjectX.\n"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = OpenAiClient::new(&config_for(server.url())).unwrap();
        let text = client.complete("Who is Alice?", 500).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Alice works on ProjectX.");
    }

    #[tokio::test]
    async fn rate_limit_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let client = OpenAiClient::new(&config_for(server.url())).unwrap();
        let err = client.complete("hi", 10).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn missing_content_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(&config_for(server.url())).unwrap();
        let err = client.complete("hi", 10).await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }
}
