use crate::error::{Error, Result};
use crate::models::quiz::Question;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Produces multiple-choice questions from source text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, text: &str, num_questions: usize) -> Result<Vec<Question>>;
}

const SYSTEM_PROMPT: &str = r#"You write multiple choice questions for study quizzes.
Given a passage, produce clear, focused questions that can be answered from the passage alone.
Each question has exactly four options: one correct answer and three plausible but wrong distractors.
Respond with a JSON object of this shape and nothing else:
{
    "questions": [
        {
            "question": "question text",
            "options": ["option 1", "option 2", "option 3", "option 4"],
            "correct_answer": "the option text that is correct, copied exactly"
        }
    ]
}"#;

#[derive(Debug, Deserialize)]
struct GeneratedQuiz {
    questions: Vec<Question>,
}

#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, base_url: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    async fn chat_openai(&self, payload: JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("OpenAI request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            tracing::error!("OpenAI API Error {}: {}", status, text);
            return Err(Error::Generation(format!("OpenAI API Error {}", status)));
        }

        let body: JsonValue = res
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Invalid OpenAI response body: {}", e)))?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| Error::Generation("Invalid OpenAI response format".into()))
    }
}

#[async_trait]
impl QuestionGenerator for OpenAiGenerator {
    #[tracing::instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn generate(&self, text: &str, num_questions: usize) -> Result<Vec<Question>> {
        let user_prompt = format!(
            "Generate exactly {} multiple choice questions based on this text:\n\n{}",
            num_questions, text
        );

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt}
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.7
        });

        let started = std::time::Instant::now();
        let response_json = self.chat_openai(payload).await?;
        tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "OpenAI response received");

        parse_questions(response_json)
    }
}

/// Accepts either `{"questions": [...]}` or a bare array.
pub fn parse_questions(raw: JsonValue) -> Result<Vec<Question>> {
    let parsed = if raw.is_array() {
        serde_json::from_value::<Vec<Question>>(raw)
    } else {
        serde_json::from_value::<GeneratedQuiz>(raw).map(|q| q.questions)
    };
    parsed.map_err(|e| Error::Generation(format!("Malformed question payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wrapped_and_bare_payloads() {
        let item = json!({
            "question": "Capital of France?",
            "options": ["Paris", "Rome", "Berlin", "Madrid"],
            "correct_answer": "Paris"
        });
        let wrapped = parse_questions(json!({ "questions": [item.clone()] })).unwrap();
        let bare = parse_questions(json!([item])).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped[0].correct_answer, "Paris");
    }

    #[test]
    fn missing_fields_are_a_generation_error() {
        let err = parse_questions(json!({ "questions": [{ "question": "?" }] })).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));

        let err = parse_questions(json!({ "items": [] })).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }
}
