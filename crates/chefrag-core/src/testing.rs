//! In-process doubles for the pipeline's network collaborators

use crate::error::{ChefError, Result};
use crate::llm::{ChatBackend, ChatCompletion, ChatMessage, Embedder, LlmGateway, Provider, TokenUsage};
use crate::retrieval::{Metadata, MetadataValue, RetrievalMatch, VectorIndex};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Build a match with text metadata
pub fn dish(id: &str, score: f32, fields: &[(&str, &str)]) -> RetrievalMatch {
    let metadata: Metadata = fields
        .iter()
        .map(|(k, v)| (k.to_string(), MetadataValue::from(*v)))
        .collect();
    RetrievalMatch {
        id: id.to_string(),
        score,
        metadata,
    }
}

pub fn gateway_with(openrouter: Arc<ScriptedBackend>, groq: Arc<ScriptedBackend>) -> LlmGateway {
    LlmGateway::new(openrouter, groq)
}

pub struct StaticEmbedder {
    vector: Option<Vec<f32>>,
    calls: AtomicUsize,
}

impl StaticEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector: Some(vector),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            vector: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for StaticEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.vector
            .clone()
            .ok_or_else(|| ChefError::InvalidInput("embedding model unavailable".to_string()))
    }

    fn dimensions(&self) -> usize {
        self.vector.as_ref().map_or(0, Vec::len)
    }

    fn model_name(&self) -> &str {
        "static"
    }
}

pub struct StaticIndex {
    matches: Vec<RetrievalMatch>,
    failure: Option<String>,
    calls: AtomicUsize,
    last_top_k: Mutex<Option<usize>>,
}

impl StaticIndex {
    pub fn new(matches: Vec<RetrievalMatch>) -> Self {
        Self {
            matches,
            failure: None,
            calls: AtomicUsize::new(0),
            last_top_k: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(vec![])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_top_k(&self) -> Option<usize> {
        *self.last_top_k.lock().unwrap()
    }
}

#[async_trait]
impl VectorIndex for StaticIndex {
    async fn query(
        &self,
        _vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>> {
        assert!(include_metadata, "pipeline must request metadata");
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_top_k.lock().unwrap() = Some(top_k);

        match self.failure {
            Some(ref message) => Err(ChefError::Retrieval(message.clone())),
            None => Ok(self.matches.iter().take(top_k).cloned().collect()),
        }
    }
}

/// Chat backend that replays scripted results, then a fixed reply if one is set
pub struct ScriptedBackend {
    provider: Provider,
    script: Mutex<VecDeque<Result<ChatCompletion>>>,
    fallback: Option<ChatCompletion>,
    calls: AtomicUsize,
    received: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    /// Always answer with `text`
    pub fn replying(provider: Provider, text: &str, usage: TokenUsage) -> Self {
        Self {
            provider,
            script: Mutex::new(VecDeque::new()),
            fallback: Some(ChatCompletion {
                text: text.to_string(),
                usage,
            }),
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Answer with each entry in turn; calls past the end fail
    pub fn sequence(provider: Provider, script: Vec<Result<ChatCompletion>>) -> Self {
        Self {
            provider,
            script: Mutex::new(script.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Option<Vec<ChatMessage>> {
        self.received.lock().unwrap().last().cloned()
    }

    /// Content of the first message of every call, in order
    pub fn all_prompts(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter_map(|messages| messages.first().map(|m| m.content.clone()))
            .collect()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<ChatCompletion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(messages);

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }

        self.fallback
            .clone()
            .ok_or_else(|| ChefError::malformed(self.provider, "script exhausted"))
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
