//! Self-evaluation of generated answers
//!
//! A second completion grades the answer against the question. The grade is
//! advisory: output that does not follow the JSON contract becomes
//! [`Relevance::Unknown`] instead of failing the request.

use crate::error::{ChefError, Result};
use crate::llm::{LlmGateway, TokenUsage, EVALUATION_PROVIDER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Explanation recorded when the evaluator's output cannot be used
pub const PARSE_FAILURE_EXPLANATION: &str = "Failed to parse evaluation";

/// Relevance grade of an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relevance {
    Relevant,
    PartlyRelevant,
    NonRelevant,
    /// The evaluator answered, but not in a usable form
    Unknown,
}

impl Relevance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relevance::Relevant => "RELEVANT",
            Relevance::PartlyRelevant => "PARTLY_RELEVANT",
            Relevance::NonRelevant => "NON_RELEVANT",
            Relevance::Unknown => "UNKNOWN",
        }
    }

    /// Grades a model is allowed to assign
    fn from_verdict(verdict: &str) -> Option<Self> {
        match verdict {
            "RELEVANT" => Some(Relevance::Relevant),
            "PARTLY_RELEVANT" => Some(Relevance::PartlyRelevant),
            "NON_RELEVANT" => Some(Relevance::NonRelevant),
            _ => None,
        }
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relevance {
    type Err = ChefError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "UNKNOWN" {
            return Ok(Relevance::Unknown);
        }
        Relevance::from_verdict(&upper)
            .ok_or_else(|| ChefError::InvalidInput(format!("Unknown relevance: {}", s)))
    }
}

/// Outcome of one evaluation call
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub relevance: Relevance,
    pub explanation: String,
    pub usage: TokenUsage,
}

/// Why evaluator output was rejected. Logged, never returned to callers.
#[derive(Debug, Error)]
enum EvaluationParseError {
    #[error("no JSON object in evaluator output")]
    NoJson,

    #[error("evaluator JSON does not match the contract: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unrecognized relevance verdict: {0}")]
    UnrecognizedVerdict(String),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEvaluation {
    #[serde(rename = "Relevance")]
    relevance: String,
    #[serde(rename = "Explanation")]
    explanation: String,
}

fn build_evaluation_prompt(question: &str, answer: &str) -> String {
    format!(
        r#"You are an expert evaluator for a Retrieval-Augmented Generation (RAG) system.
Your task is to analyze the relevance of the generated answer to the given question.
Based on the relevance of the generated answer, you will classify it
as "NON_RELEVANT", "PARTLY_RELEVANT", or "RELEVANT".

Here is the data for evaluation:

Question: {}
Generated Answer: {}

Please analyze the content and context of the generated answer in relation to the question
and provide your evaluation in parsable JSON without using code blocks and make sure it is json parsable and nothing else is added
to the below structure:

{{
  "Relevance": "NON_RELEVANT" | "PARTLY_RELEVANT" | "RELEVANT",
  "Explanation": "[Provide a brief explanation for your evaluation]"
}}"#,
        question, answer
    )
}

fn parse_evaluation(output: &str) -> std::result::Result<(Relevance, String), EvaluationParseError> {
    // Tolerate a code fence or a sentence around the object, nothing inside it
    let start = output.find('{').ok_or(EvaluationParseError::NoJson)?;
    let end = output.rfind('}').ok_or(EvaluationParseError::NoJson)?;
    if end < start {
        return Err(EvaluationParseError::NoJson);
    }

    let raw: RawEvaluation = serde_json::from_str(&output[start..=end])?;
    let relevance = Relevance::from_verdict(raw.relevance.trim())
        .ok_or(EvaluationParseError::UnrecognizedVerdict(raw.relevance))?;

    Ok((relevance, raw.explanation))
}

/// Grades answers with the pinned evaluation provider
#[derive(Clone)]
pub struct RelevanceEvaluator {
    gateway: LlmGateway,
}

impl RelevanceEvaluator {
    pub fn new(gateway: LlmGateway) -> Self {
        Self { gateway }
    }

    /// Grade `answer` against `question`.
    ///
    /// Only an upstream failure of the evaluation call is an error; unusable
    /// output yields `Relevance::Unknown` with the usage still reported.
    pub async fn evaluate(&self, question: &str, answer: &str) -> Result<Evaluation> {
        let prompt = build_evaluation_prompt(question, answer);
        let completion = self.gateway.complete(&prompt, EVALUATION_PROVIDER).await?;

        let (relevance, explanation) = match parse_evaluation(&completion.text) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Evaluation output rejected: {}", e);
                tracing::debug!("Raw evaluator output: {}", completion.text);
                (Relevance::Unknown, PARSE_FAILURE_EXPLANATION.to_string())
            }
        };

        Ok(Evaluation {
            relevance,
            explanation,
            usage: completion.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Provider;
    use crate::testing::{gateway_with, ScriptedBackend};
    use std::sync::Arc;

    fn evaluator_replying(text: &str) -> (RelevanceEvaluator, Arc<ScriptedBackend>, Arc<ScriptedBackend>) {
        let openrouter = Arc::new(ScriptedBackend::replying(
            Provider::OpenRouter,
            "unused",
            TokenUsage::default(),
        ));
        let groq = Arc::new(ScriptedBackend::replying(
            Provider::Groq,
            text,
            TokenUsage::new(200, 30, 230),
        ));
        let gateway = gateway_with(openrouter.clone(), groq.clone());
        (RelevanceEvaluator::new(gateway), openrouter, groq)
    }

    #[tokio::test]
    async fn test_well_formed_verdict() {
        let (evaluator, _, _) =
            evaluator_replying(r#"{"Relevance":"RELEVANT","Explanation":"matches"}"#);

        let eval = evaluator.evaluate("q", "a").await.unwrap();
        assert_eq!(eval.relevance, Relevance::Relevant);
        assert_eq!(eval.explanation, "matches");
        assert_eq!(eval.usage, TokenUsage::new(200, 30, 230));
    }

    #[tokio::test]
    async fn test_malformed_output_degrades_to_unknown() {
        let (evaluator, _, _) = evaluator_replying("not json");

        let eval = evaluator.evaluate("q", "a").await.unwrap();
        assert_eq!(eval.relevance, Relevance::Unknown);
        assert_eq!(eval.explanation, "Failed to parse evaluation");
        assert_eq!(eval.usage, TokenUsage::new(200, 30, 230));
    }

    #[tokio::test]
    async fn test_always_uses_evaluation_provider() {
        let (evaluator, openrouter, groq) =
            evaluator_replying(r#"{"Relevance":"PARTLY_RELEVANT","Explanation":"vague"}"#);

        evaluator.evaluate("Is it spicy?", "It has berbere.").await.unwrap();
        assert_eq!(groq.calls(), 1);
        assert_eq!(openrouter.calls(), 0);

        let sent = groq.last_messages().unwrap();
        assert!(sent[0].content.contains("Question: Is it spicy?"));
        assert!(sent[0].content.contains("Generated Answer: It has berbere."));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_absorbed() {
        let openrouter = Arc::new(ScriptedBackend::replying(
            Provider::OpenRouter,
            "unused",
            TokenUsage::default(),
        ));
        let groq = Arc::new(ScriptedBackend::sequence(
            Provider::Groq,
            vec![Err(ChefError::Upstream {
                provider: Provider::Groq,
                status: Some(503),
                message: "over capacity".to_string(),
            })],
        ));
        let evaluator = RelevanceEvaluator::new(gateway_with(openrouter, groq));

        let err = evaluator.evaluate("q", "a").await.unwrap_err();
        assert!(matches!(err, ChefError::Upstream { provider: Provider::Groq, .. }));
    }

    #[test]
    fn test_parse_tolerates_code_fence() {
        let output = "```json\n{\"Relevance\": \"NON_RELEVANT\", \"Explanation\": \"off topic\"}\n```";
        let (relevance, explanation) = parse_evaluation(output).unwrap();
        assert_eq!(relevance, Relevance::NonRelevant);
        assert_eq!(explanation, "off topic");
    }

    #[test]
    fn test_parse_rejects_contract_violations() {
        let cases = [
            r#"{"Relevance":"RELEVANT"}"#,
            r#"{"Explanation":"no verdict"}"#,
            r#"{"Relevance":"VERY_RELEVANT","Explanation":"x"}"#,
            r#"{"Relevance":"UNKNOWN","Explanation":"x"}"#,
            r#"{"Relevance":"RELEVANT","Explanation":"x","Score":3}"#,
            r#"{"Relevance":"RELEVANT","Explanation":42}"#,
            r#"{"Relevance": "RELEVANT", "Explanation": "#,
            "} backwards {",
            "",
        ];
        for case in cases {
            assert!(parse_evaluation(case).is_err(), "accepted {:?}", case);
        }
    }

    #[test]
    fn test_relevance_names_round_trip() {
        for r in [
            Relevance::Relevant,
            Relevance::PartlyRelevant,
            Relevance::NonRelevant,
            Relevance::Unknown,
        ] {
            assert_eq!(r.as_str().parse::<Relevance>().unwrap(), r);
            assert_eq!(
                serde_json::to_string(&r).unwrap(),
                format!("\"{}\"", r.as_str())
            );
        }
        assert!("maybe".parse::<Relevance>().is_err());
        assert_eq!("relevant".parse::<Relevance>().unwrap(), Relevance::Relevant);
    }

    #[test]
    fn test_prompt_carries_contract() {
        let prompt = build_evaluation_prompt("q", "a");
        assert!(prompt.contains("\"Relevance\": \"NON_RELEVANT\" | \"PARTLY_RELEVANT\" | \"RELEVANT\""));
        assert!(prompt.contains("\"Explanation\""));
    }
}
