//! JSON output formatter

use chefrag_core::{AnswerResult, ConversationRecord};

pub fn format_answer(conversation_id: Option<&str>, result: &AnswerResult) -> String {
    let output = serde_json::json!({
        "conversation_id": conversation_id,
        "answer": result.answer,
        "response_time": result.response_time,
        "relevance": result.relevance,
        "relevance_explanation": result.relevance_explanation,
        "model_used": result.model_used,
        "prompt_tokens": result.usage.prompt_tokens,
        "completion_tokens": result.usage.completion_tokens,
        "total_tokens": result.usage.total_tokens,
        "eval_prompt_tokens": result.eval_usage.prompt_tokens,
        "eval_completion_tokens": result.eval_usage.completion_tokens,
        "eval_total_tokens": result.eval_usage.total_tokens,
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

pub fn format_conversations(records: &[ConversationRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string()) + "\n"
}
