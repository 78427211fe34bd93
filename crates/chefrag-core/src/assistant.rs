//! End-to-end question answering
//!
//! retrieve → build prompt → answer → evaluate → result. An empty retrieval
//! short-circuits with a fixed apology and makes no LLM calls.

use crate::config::Config;
use crate::error::Result;
use crate::evaluation::{Relevance, RelevanceEvaluator};
use crate::llm::{HttpEmbedder, LlmGateway, Provider, TokenUsage};
use crate::prompt::build_grounding_prompt;
use crate::retrieval::{PineconeIndex, Retriever, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Answer returned when nothing relevant was retrieved
pub const NO_CONTEXT_ANSWER: &str =
    "I'm sorry, I couldn't find any relevant information to answer your question.";

/// Everything the caller needs to show and log one answered question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    /// Seconds spent waiting for the answering model
    pub response_time: f64,
    pub relevance: Relevance,
    pub relevance_explanation: String,
    pub model_used: Provider,
    pub usage: TokenUsage,
    pub eval_usage: TokenUsage,
}

impl AnswerResult {
    /// Fixed result for questions with no retrieved context
    pub fn no_context(provider: Provider) -> Self {
        Self {
            answer: NO_CONTEXT_ANSWER.to_string(),
            response_time: 0.0,
            relevance: Relevance::Unknown,
            relevance_explanation: String::new(),
            model_used: provider,
            usage: TokenUsage::default(),
            eval_usage: TokenUsage::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Retrieving,
    NoContext,
    Prompting,
    Answering,
    Evaluating,
    Done,
}

/// The question-answering pipeline
#[derive(Clone)]
pub struct Assistant {
    retriever: Retriever,
    gateway: LlmGateway,
    evaluator: RelevanceEvaluator,
    top_k: usize,
}

impl Assistant {
    pub fn new(retriever: Retriever, gateway: LlmGateway) -> Self {
        let evaluator = RelevanceEvaluator::new(gateway.clone());
        Self {
            retriever,
            gateway,
            evaluator,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Build every HTTP collaborator from configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        let embedder = HttpEmbedder::new(config.embedding.clone(), config.timeout_secs)?;
        let index = PineconeIndex::connect(&config.index, config.timeout_secs).await?;
        let gateway = LlmGateway::from_config(config)?;

        Ok(Self::new(
            Retriever::new(Arc::new(embedder), Arc::new(index)),
            gateway,
        ))
    }

    /// Answer `question` with `provider` and grade the answer
    pub async fn answer(&self, question: &str, provider: Provider) -> Result<AnswerResult> {
        trace_stage(Stage::Retrieving);
        let matches = self.retriever.retrieve(question, self.top_k).await?;

        if matches.is_empty() {
            trace_stage(Stage::NoContext);
            return Ok(AnswerResult::no_context(provider));
        }

        trace_stage(Stage::Prompting);
        let prompt = build_grounding_prompt(question, &matches);

        trace_stage(Stage::Answering);
        let completion = self.gateway.complete(&prompt, provider).await?;

        trace_stage(Stage::Evaluating);
        let evaluation = self.evaluator.evaluate(question, &completion.text).await?;

        trace_stage(Stage::Done);
        tracing::info!(
            provider = %provider,
            matches = matches.len(),
            response_time = completion.elapsed_secs,
            relevance = %evaluation.relevance,
            "answered question"
        );

        Ok(AnswerResult {
            answer: completion.text,
            response_time: completion.elapsed_secs,
            relevance: evaluation.relevance,
            relevance_explanation: evaluation.explanation,
            model_used: provider,
            usage: completion.usage,
            eval_usage: evaluation.usage,
        })
    }

    /// Answer with the provider given by name, as the front-end passes it
    pub async fn qa_function(&self, question: &str, provider: &str) -> Result<AnswerResult> {
        let provider: Provider = provider.parse()?;
        self.answer(question, provider).await
    }
}

fn trace_stage(stage: Stage) {
    tracing::debug!(?stage, "qa pipeline");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChefError;
    use crate::testing::{dish, gateway_with, ScriptedBackend, StaticEmbedder, StaticIndex};

    struct Harness {
        assistant: Assistant,
        embedder: Arc<StaticEmbedder>,
        index: Arc<StaticIndex>,
        openrouter: Arc<ScriptedBackend>,
        groq: Arc<ScriptedBackend>,
    }

    fn harness(index: StaticIndex, openrouter: ScriptedBackend, groq: ScriptedBackend) -> Harness {
        let embedder = Arc::new(StaticEmbedder::new(vec![0.3; 8]));
        let index = Arc::new(index);
        let openrouter = Arc::new(openrouter);
        let groq = Arc::new(groq);
        let assistant = Assistant::new(
            Retriever::new(embedder.clone(), index.clone()),
            gateway_with(openrouter.clone(), groq.clone()),
        );
        Harness {
            assistant,
            embedder,
            index,
            openrouter,
            groq,
        }
    }

    fn spice_index() -> StaticIndex {
        StaticIndex::new(vec![dish("d1", 0.81, &[("ingredients", "cumin, paprika")])])
    }

    const RELEVANT_JSON: &str = r#"{"Relevance":"RELEVANT","Explanation":"lists the spices"}"#;

    #[tokio::test]
    async fn test_end_to_end_spice_question() {
        let h = harness(
            spice_index(),
            ScriptedBackend::replying(
                Provider::OpenRouter,
                "cumin and paprika",
                TokenUsage::new(90, 5, 95),
            ),
            ScriptedBackend::replying(Provider::Groq, RELEVANT_JSON, TokenUsage::new(150, 20, 170)),
        );

        let result = h
            .assistant
            .answer("What spices are in dish X?", Provider::OpenRouter)
            .await
            .unwrap();

        assert_eq!(result.answer, "cumin and paprika");
        assert_eq!(result.relevance, Relevance::Relevant);
        assert_eq!(result.relevance_explanation, "lists the spices");
        assert_eq!(result.model_used, Provider::OpenRouter);
        assert_eq!(result.usage, TokenUsage::new(90, 5, 95));
        assert_eq!(result.eval_usage, TokenUsage::new(150, 20, 170));
        assert!(result.usage.is_consistent());
        assert!(result.eval_usage.is_consistent());
        assert!(result.response_time >= 0.0);

        let prompt = &h.openrouter.last_messages().unwrap()[0].content;
        assert!(prompt.contains("ingredients: cumin, paprika"));
        assert!(prompt.contains("What spices are in dish X?"));

        let eval_prompt = &h.groq.last_messages().unwrap()[0].content;
        assert!(eval_prompt.contains("Question: What spices are in dish X?"));
        assert!(eval_prompt.contains("Generated Answer: cumin and paprika"));
    }

    #[tokio::test]
    async fn test_no_context_skips_llm_calls() {
        let h = harness(
            StaticIndex::new(vec![dish("d1", 0.2, &[("name", "Tej")])]),
            ScriptedBackend::replying(Provider::OpenRouter, "x", TokenUsage::new(1, 1, 2)),
            ScriptedBackend::replying(Provider::Groq, RELEVANT_JSON, TokenUsage::new(1, 1, 2)),
        );

        let result = h
            .assistant
            .answer("Who won the 1998 world cup?", Provider::Groq)
            .await
            .unwrap();

        assert_eq!(result, AnswerResult::no_context(Provider::Groq));
        assert_eq!(result.answer, NO_CONTEXT_ANSWER);
        assert_eq!(result.usage.total_tokens, 0);
        assert_eq!(result.eval_usage.total_tokens, 0);
        assert_eq!(result.response_time, 0.0);
        assert_eq!(h.embedder.calls(), 1);
        assert_eq!(h.index.calls(), 1);
        assert_eq!(h.openrouter.calls(), 0);
        assert_eq!(h.groq.calls(), 0);
    }

    #[tokio::test]
    async fn test_groq_answer_is_evaluated_by_groq_again() {
        let h = harness(
            spice_index(),
            ScriptedBackend::replying(Provider::OpenRouter, "unused", TokenUsage::default()),
            ScriptedBackend::sequence(
                Provider::Groq,
                vec![
                    Ok(crate::llm::ChatCompletion {
                        text: "cumin and paprika".to_string(),
                        usage: TokenUsage::new(90, 5, 95),
                    }),
                    Ok(crate::llm::ChatCompletion {
                        text: "I think it is relevant".to_string(),
                        usage: TokenUsage::new(140, 6, 146),
                    }),
                ],
            ),
        );

        let result = h
            .assistant
            .answer("What spices are in dish X?", Provider::Groq)
            .await
            .unwrap();

        assert_eq!(result.answer, "cumin and paprika");
        assert_eq!(result.relevance, Relevance::Unknown);
        assert_eq!(result.relevance_explanation, "Failed to parse evaluation");
        assert_eq!(result.eval_usage, TokenUsage::new(140, 6, 146));
        assert_eq!(h.groq.calls(), 2);
        assert_eq!(h.openrouter.calls(), 0);
    }

    #[tokio::test]
    async fn test_answering_failure_propagates() {
        let h = harness(
            spice_index(),
            ScriptedBackend::sequence(
                Provider::OpenRouter,
                vec![Err(ChefError::Upstream {
                    provider: Provider::OpenRouter,
                    status: Some(429),
                    message: "rate limited".to_string(),
                })],
            ),
            ScriptedBackend::replying(Provider::Groq, RELEVANT_JSON, TokenUsage::default()),
        );

        let err = h
            .assistant
            .answer("What spices are in dish X?", Provider::OpenRouter)
            .await
            .unwrap_err();
        assert!(matches!(err, ChefError::Upstream { status: Some(429), .. }));
        assert_eq!(h.groq.calls(), 0);
    }

    #[tokio::test]
    async fn test_retrieval_failure_propagates() {
        let h = harness(
            StaticIndex::failing("index unreachable"),
            ScriptedBackend::replying(Provider::OpenRouter, "x", TokenUsage::default()),
            ScriptedBackend::replying(Provider::Groq, RELEVANT_JSON, TokenUsage::default()),
        );

        let err = h.assistant.answer("q", Provider::Groq).await.unwrap_err();
        assert!(matches!(err, ChefError::Retrieval(_)));
        assert_eq!(h.openrouter.calls() + h.groq.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_provider_name_rejected_before_retrieval() {
        let h = harness(
            spice_index(),
            ScriptedBackend::replying(Provider::OpenRouter, "x", TokenUsage::default()),
            ScriptedBackend::replying(Provider::Groq, RELEVANT_JSON, TokenUsage::default()),
        );

        let err = h.assistant.qa_function("q", "mistral").await.unwrap_err();
        assert!(matches!(err, ChefError::UnknownProvider(_)));
        assert_eq!(h.embedder.calls(), 0);
        assert_eq!(h.openrouter.calls() + h.groq.calls(), 0);
    }

    #[tokio::test]
    async fn test_repeated_questions_give_identical_results() {
        let h = harness(
            spice_index(),
            ScriptedBackend::replying(
                Provider::OpenRouter,
                "cumin and paprika",
                TokenUsage::new(90, 5, 95),
            ),
            ScriptedBackend::replying(Provider::Groq, RELEVANT_JSON, TokenUsage::new(150, 20, 170)),
        );

        let mut first = h
            .assistant
            .qa_function("What spices are in dish X?", "openrouter")
            .await
            .unwrap();
        let mut second = h
            .assistant
            .qa_function("What spices are in dish X?", "openrouter")
            .await
            .unwrap();

        first.response_time = 0.0;
        second.response_time = 0.0;
        assert_eq!(first, second);

        let prompts = h.openrouter.all_prompts();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
    }

    #[test]
    fn test_result_serializes_for_callers() {
        let json = serde_json::to_value(AnswerResult::no_context(Provider::OpenRouter)).unwrap();
        assert_eq!(json["model_used"], "openrouter");
        assert_eq!(json["relevance"], "UNKNOWN");
        assert_eq!(json["usage"]["total_tokens"], 0);
    }
}
