use crate::models::JudgeVerdict;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Default OpenAI-compatible chat completions endpoint
pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

const REFERER: &str = "https://domain-search-mcp.com";
const TITLE: &str = "Domain Name Evaluator";
const BODY_EXCERPT_LEN: usize = 200;

/// Errors that can occur when consulting a judge
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// A remote scoring oracle for one candidate domain
#[async_trait]
pub trait JudgeBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn score(&self, prompt: &str, domain: &str) -> Result<JudgeVerdict, JudgeError>;
}

/// Build the evaluation prompt sent to a judge
pub fn evaluation_prompt(prompt: &str, domain: &str, focus: &str) -> String {
    format!(
        r#"You are an expert domain name evaluator. Score this domain name suggestion on a scale of 1-10.

**Original Request:**
{prompt}

**Domain Suggestion:**
{domain}

**Evaluation Criteria (focus on {focus}):**
1. Brandability (1-10): Is it memorable and marketable?
2. Pronounceability (1-10): Is it easy to say and spell?
3. Constraint Satisfaction (1-10): Does it match the request (TLD, length, style)?
4. Creativity (1-10): Is it unique and clever?
5. Overall (1-10): Would you recommend this domain?

Respond with ONLY a JSON object:
{{"brandability": X, "pronounceability": X, "constraint": X, "creativity": X, "overall": X}}
"#
    )
}

/// Contents of a ```json fence, else of a bare ``` fence, else the input
pub fn strip_code_fence(content: &str) -> &str {
    let fenced = content
        .split_once("```json")
        .or_else(|| content.split_once("```"))
        .map(|(_, rest)| rest);

    match fenced {
        Some(rest) => rest.split_once("```").map_or(rest, |(inner, _)| inner),
        None => content,
    }
}

/// Parse a judge's message content into a verdict
///
/// Only an object with exactly the five rubric keys, each within 1-10, is accepted.
pub fn parse_verdict(content: &str) -> Result<JudgeVerdict, JudgeError> {
    let verdict: JudgeVerdict = serde_json::from_str(strip_code_fence(content).trim())
        .map_err(|e| JudgeError::InvalidResponse(format!("Failed to parse verdict: {}", e)))?;

    if let Some((field, value)) = verdict.out_of_range() {
        return Err(JudgeError::InvalidResponse(format!(
            "{} score {} is outside {}-{}",
            field,
            value,
            JudgeVerdict::MIN_SCORE,
            JudgeVerdict::MAX_SCORE
        )));
    }

    Ok(verdict)
}

fn excerpt(body: &str) -> String {
    if body.is_empty() {
        return "Empty response".to_string();
    }
    body.chars().take(BODY_EXCERPT_LEN).collect()
}

/// Judge served through an OpenRouter-style chat completions API
pub struct OpenRouterJudge {
    name: String,
    model: String,
    focus: String,
    endpoint: String,
    api_key: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl OpenRouterJudge {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        focus: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, JudgeError> {
        let client = Client::builder().build()?;

        Ok(Self {
            name: name.into(),
            model: model.into(),
            focus: focus.into(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            temperature: 0.1,
            max_tokens: 200,
            client,
        })
    }

    /// Override the sampling parameters sent with every request
    pub fn with_sampling(mut self, temperature: f64, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl JudgeBackend for OpenRouterJudge {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, prompt: &str, domain: &str) -> Result<JudgeVerdict, JudgeError> {
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": evaluation_prompt(prompt, domain, &self.focus),
            }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        tracing::debug!("Asking {} ({}) to score {}", self.name, self.model, domain);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(JudgeError::Status {
                status: status.as_u16(),
                body: excerpt(&text),
            });
        }

        let json: Value = response.json().await?;

        if let Some(error) = json.get("error") {
            return Err(JudgeError::Api(error.to_string()));
        }

        let content = json
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| JudgeError::InvalidResponse("Missing choices[0].message.content".into()))?;

        parse_verdict(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERDICT: &str =
        r#"{"brandability": 8, "pronounceability": 7, "constraint": 9, "creativity": 6, "overall": 8}"#;

    fn completion(content: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
    }

    #[test]
    fn test_parse_plain_json() {
        let verdict = parse_verdict(VERDICT).unwrap();
        assert_eq!(verdict.brandability, 8.0);
        assert_eq!(verdict.constraint, 9.0);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("Sure!\n```json\n{}\n```\nHope that helps.", VERDICT);
        assert_eq!(parse_verdict(&fenced).unwrap().overall, 8.0);

        let bare = format!("```\n{}\n```", VERDICT);
        assert_eq!(parse_verdict(&bare).unwrap().creativity, 6.0);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(parse_verdict("I think it's an 8").is_err());
        assert!(parse_verdict(r#"{"brandability": 8}"#).is_err());
        assert!(parse_verdict(r#"{"brandability": "high", "pronounceability": 7, "constraint": 9, "creativity": 6, "overall": 8}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_scores_outside_one_to_ten() {
        let percent = r#"{"brandability": 85, "pronounceability": 80, "constraint": 90, "creativity": 70, "overall": 88}"#;
        assert!(matches!(parse_verdict(percent), Err(JudgeError::InvalidResponse(_))));

        let negative = r#"{"brandability": -3, "pronounceability": 0, "constraint": 0, "creativity": 0, "overall": 0}"#;
        assert!(matches!(parse_verdict(negative), Err(JudgeError::InvalidResponse(_))));

        let zero = r#"{"brandability": 8, "pronounceability": 7, "constraint": 0, "creativity": 6, "overall": 8}"#;
        assert!(parse_verdict(zero).is_err());

        let bounds = r#"{"brandability": 1, "pronounceability": 10, "constraint": 1.5, "creativity": 9.5, "overall": 10}"#;
        assert_eq!(parse_verdict(bounds).unwrap().pronounceability, 10.0);
    }

    #[test]
    fn test_timeout_reports_milliseconds() {
        let error = JudgeError::Timeout(Duration::from_millis(250));
        assert_eq!(error.to_string(), "Timed out after 250ms");
    }

    #[test]
    fn test_prompt_embeds_request_domain_and_focus() {
        let prompt = evaluation_prompt("Generate 3 names", "brewlo.io", "creativity");
        assert!(prompt.contains("Generate 3 names"));
        assert!(prompt.contains("brewlo.io"));
        assert!(prompt.contains("focus on creativity"));
        assert!(prompt.contains(r#"{"brandability": X"#));
    }

    #[test]
    fn test_excerpt_is_bounded() {
        assert_eq!(excerpt(""), "Empty response");
        assert_eq!(excerpt(&"x".repeat(500)).len(), 200);
    }

    #[tokio::test]
    async fn test_scores_through_chat_completions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_header("x-title", TITLE)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion(VERDICT))
            .create_async()
            .await;

        let judge = OpenRouterJudge::new(
            "minimax",
            "minimax/minimax-m2.1",
            "brandability",
            format!("{}/api/v1/chat/completions", server.url()),
            "test-key",
        )
        .unwrap();

        let verdict = judge.score("Generate names", "brewlo.io").await.unwrap();
        assert_eq!(verdict.pronounceability, 7.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let judge = OpenRouterJudge::new("j", "m", "f", server.url(), "k").unwrap();
        match judge.score("p", "d.com").await {
            Err(JudgeError::Status { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embedded_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "model overloaded"}}"#)
            .create_async()
            .await;

        let judge = OpenRouterJudge::new("j", "m", "f", server.url(), "k").unwrap();
        assert!(matches!(judge.score("p", "d.com").await, Err(JudgeError::Api(_))));
    }
}
