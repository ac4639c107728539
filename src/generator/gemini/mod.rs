//! Minimal Gemini client for question generation.
//!
//! We only call `generateContent`, always requesting a JSON response against
//! a fixed schema. Calls are instrumented and log model name, latency and
//! token usage, never payload contents or the API key.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use super::QuestionGenerator;
use crate::concept::ConceptKind;
use crate::question::{RawQuestion, DISTRACTORS_PER_QUESTION};


const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

lazy_static! {
    // The schema asks for bare JSON, but models still occasionally wrap the
    // payload in a markdown code fence.
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$").unwrap();
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(GeminiClient {
            client,
            api_key,
            base_url,
            model,
        })
    }

    /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
    /// GEMINI_BASE_URL and GEMINI_MODEL override the defaults.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Self::new(api_key, base_url, model).ok()
    }
}

#[async_trait]
impl QuestionGenerator for GeminiClient {
    #[instrument(level = "info", skip(self), fields(model = %self.model, %kind, count))]
    async fn generate(&self, kind: ConceptKind, count: usize) -> Result<Vec<RawQuestion>> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(kind, count),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.8,
                response_mime_type: "application/json".into(),
                response_schema: response_schema(),
            },
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            return Err(anyhow!("Gemini HTTP {}: {}", status, message));
        }

        let body: GenerateContentResponse = response.json().await?;
        if let Some(usage) = &body.usage_metadata {
            info!(
                prompt_tokens = ?usage.prompt_token_count,
                response_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini usage"
            );
        }
        info!(elapsed = ?start.elapsed(), "Gemini response received");

        let text = body
            .candidates
            .get(0)
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        parse_questions(&text)
    }
}

fn build_prompt(kind: ConceptKind, count: usize) -> String {
    format!(
        "You are an AI assistant creating an educational math game for 8th grade students, \
         including a student with an intellectual disability. The game's theme is music.\n\
         \n\
         Create a list of {count} multiple-choice questions about {kind} proportionality.\n\
         \n\
         RULES FOR EVERY QUESTION:\n\
         1. Use very simple, clear and direct language. Short sentences.\n\
         2. The problem must use an example from the world of music (e.g. tempo in BPM, song \
         duration, number of instruments, notes played per second).\n\
         3. The correct answer MUST be a whole number.\n\
         4. The numbers in the problem must be easy to work with (e.g. double, half, triple).\n\
         5. Provide the question, {distractors} incorrect answer options and the correct \
         answer. The `options` list must contain ONLY the incorrect options. Options must be \
         plausible whole numbers. Include one option that would be the answer if the \
         proportionality were of the opposite type.\n\
         6. Provide a short and simple explanation (1-2 sentences) of why the answer is \
         correct, using the musical analogy.\n\
         \n\
         Return ONLY a JSON object with a \"questions\" key holding an array of question \
         objects, with no extra text.",
        count = count,
        kind = kind,
        distractors = DISTRACTORS_PER_QUESTION,
    )
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "INTEGER" } },
                        "answer": { "type": "INTEGER" },
                        "explanation": { "type": "STRING" }
                    },
                    "required": ["question", "options", "answer", "explanation"]
                }
            }
        },
        "required": ["questions"]
    })
}

/// Extract the question list from the model's text payload, tolerating a
/// surrounding markdown code fence.
fn parse_questions(text: &str) -> Result<Vec<RawQuestion>> {
    let text = text.trim();
    let text = CODE_FENCE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|inner| inner.as_str())
        .unwrap_or(text);
    let payload: QuestionsPayload =
        serde_json::from_str(text).context("Gemini response is not valid question JSON")?;
    Ok(payload.questions.into_iter().map(RawQuestion::from).collect())
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorWrap {
        error: ErrorBody,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }
    serde_json::from_str::<ErrorWrap>(body)
        .ok()
        .map(|wrap| wrap.error.message)
}

// --- Wire DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Deserialize, Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct QuestionsPayload {
    questions: Vec<GeneratedQuestion>,
}

/// One record as generated: `options` carries only the incorrect options.
#[derive(Deserialize)]
struct GeneratedQuestion {
    question: String,
    options: Vec<i64>,
    answer: i64,
    explanation: String,
}

impl From<GeneratedQuestion> for RawQuestion {
    fn from(generated: GeneratedQuestion) -> Self {
        RawQuestion {
            prompt: generated.question,
            distractors: generated.options,
            answer: generated.answer,
            explanation: generated.explanation,
        }
    }
}
