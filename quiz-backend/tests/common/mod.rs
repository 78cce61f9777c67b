#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use quiz_backend::{
    database::MemoryQuizStore,
    error::Result,
    models::quiz::Question,
    routes,
    services::{ai_service::QuestionGenerator, extract_service::TextExtractor},
    AppState,
};
use serde_json::Value as JsonValue;

pub const BOUNDARY: &str = "quiz-test-boundary";

mockall::mock! {
    pub Extractor {}
    #[async_trait::async_trait]
    impl TextExtractor for Extractor {
        async fn extract_text(&self, data: &[u8]) -> Result<String>;
    }
}

mockall::mock! {
    pub Generator {}
    #[async_trait::async_trait]
    impl QuestionGenerator for Generator {
        async fn generate(&self, text: &str, num_questions: usize) -> Result<Vec<Question>>;
    }
}

pub fn questions(n: usize) -> Vec<Question> {
    (1..=n)
        .map(|i| Question {
            question: format!("What is fact #{}?", i),
            options: vec![
                format!("correct {}", i),
                format!("wrong {}a", i),
                format!("wrong {}b", i),
                format!("wrong {}c", i),
            ],
            correct_answer: format!("correct {}", i),
        })
        .collect()
}

pub fn extractor_returning(text: &str) -> MockExtractor {
    let text = text.to_string();
    let mut extractor = MockExtractor::new();
    extractor
        .expect_extract_text()
        .returning(move |_| Ok(text.clone()));
    extractor
}

/// Generator that answers any request with exactly the requested count.
pub fn generator_echoing_count() -> MockGenerator {
    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .returning(|_, n| Ok(questions(n)));
    generator
}

pub fn app_with(
    store: Arc<MemoryQuizStore>,
    extractor: MockExtractor,
    generator: MockGenerator,
) -> Router {
    let state = AppState::new(store, Arc::new(extractor), Arc::new(generator), 50);
    routes::router(state)
}

/// App whose collaborators must never be called.
pub fn app_without_generation(store: Arc<MemoryQuizStore>) -> Router {
    let mut extractor = MockExtractor::new();
    extractor.expect_extract_text().never();
    let mut generator = MockGenerator::new();
    generator.expect_generate().never();
    app_with(store, extractor, generator)
}

pub fn multipart_upload(uri: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(resp: Response<Body>) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
