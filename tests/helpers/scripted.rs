// ABOUTME: Scripted language model and nutrition lookup doubles for pipeline tests
// ABOUTME: Answers classification and per-item extraction requests from fixed scripts

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use nutrilog::errors::{AppError, AppResult};
use nutrilog::external::NutritionLookup;
use nutrilog::llm::prompts::MEAL_INTENT_PROMPT;
use nutrilog::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Reply with this text
    Reply(String),
    /// Fail as an unreachable backend
    Refused,
    /// Fail as an upstream timeout
    Timeout,
    /// Fail with a generic upstream error
    Upstream,
}

impl Scripted {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply(text.into())
    }

    fn into_result(self) -> AppResult<String> {
        match self {
            Self::Reply(text) => Ok(text),
            Self::Refused => Err(AppError::external_unavailable(
                "scripted",
                "connection refused",
            )),
            Self::Timeout => Err(AppError::external_timeout("scripted", 5)),
            Self::Upstream => Err(AppError::external_service("scripted", "HTTP 500")),
        }
    }
}

/// Provider answering from scripts
///
/// Classification requests (those starting with the intent instruction) pop
/// from a queue. Extraction requests are matched on the quoted item name, so
/// concurrent extraction order does not matter.
#[derive(Default)]
pub struct ScriptedProvider {
    classifications: Mutex<VecDeque<Scripted>>,
    extractions: Vec<Extraction>,
    delay: Option<Duration>,
    requests: Mutex<Vec<ChatRequest>>,
    completed: Mutex<Vec<String>>,
}

struct Extraction {
    item: String,
    needle: String,
    answer: Scripted,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a classification answer
    pub fn classify(self, answer: Scripted) -> Self {
        self.classifications.lock().unwrap().push_back(answer);
        self
    }

    /// Answer extraction requests for `item`
    pub fn extract(mut self, item: &str, answer: Scripted) -> Self {
        self.extractions.push(Extraction {
            item: item.to_owned(),
            needle: format!("'{item}'"),
            answer,
            delay: None,
        });
        self
    }

    /// Answer extraction requests for `item` only after `delay`
    pub fn extract_after(self, item: &str, answer: Scripted, delay: Duration) -> Self {
        let mut provider = self.extract(item, answer);
        if let Some(last) = provider.extractions.last_mut() {
            last.delay = Some(delay);
        }
        provider
    }

    /// Sleep before every answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Items whose extraction answers were delivered, in delivery order
    pub fn completed_extractions(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    fn extraction_for(&self, request: &ChatRequest) -> Option<&Extraction> {
        let instruction = request.messages.first()?.content.as_str();
        if instruction == MEAL_INTENT_PROMPT {
            return None;
        }
        self.extractions
            .iter()
            .find(|extraction| instruction.contains(extraction.needle.as_str()))
    }

    fn answer(&self, request: &ChatRequest) -> Scripted {
        let instruction = request
            .messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if instruction == MEAL_INTENT_PROMPT {
            return self
                .classifications
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Scripted::Upstream);
        }

        self.extraction_for(request)
            .map_or(Scripted::Upstream, |extraction| extraction.answer.clone())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let answer = self.answer(request);
        let extraction = self.extraction_for(request);
        if let Some(delay) = extraction.and_then(|e| e.delay).or(self.delay) {
            tokio::time::sleep(delay).await;
        }
        if let Some(extraction) = extraction {
            self.completed.lock().unwrap().push(extraction.item.clone());
        }
        Ok(ChatResponse {
            content: answer.into_result()?,
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Lookup returning fixed snippets per item
#[derive(Default)]
pub struct StaticLookup {
    snippets: HashMap<String, Vec<String>>,
    failing: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snippets for queries that start with `item`
    pub fn with(mut self, item: &str, snippets: &[&str]) -> Self {
        self.snippets.insert(
            item.to_owned(),
            snippets.iter().map(|s| (*s).to_owned()).collect(),
        );
        self
    }

    /// Fail queries that start with `item`
    pub fn failing(mut self, item: &str) -> Self {
        self.failing.push(item.to_owned());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl NutritionLookup for StaticLookup {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<String>> {
        self.queries.lock().unwrap().push(query.to_owned());
        if self.failing.iter().any(|item| query.starts_with(item.as_str())) {
            return Err(AppError::external_service("static", "search failed"));
        }
        Ok(self
            .snippets
            .iter()
            .filter(|(item, _)| query.starts_with(item.as_str()))
            .max_by_key(|(item, _)| item.len())
            .map(|(_, snippets)| snippets.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
