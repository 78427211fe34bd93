//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use chefrag_core::{AnswerResult, ConversationRecord};

/// Format an answer, with the id it was logged under if it was saved
pub fn format_answer(
    conversation_id: Option<&str>,
    result: &AnswerResult,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => json::format_answer(conversation_id, result),
        OutputFormat::Cli => terminal::format_answer(conversation_id, result),
    }
}

/// Format logged conversations
pub fn format_conversations(records: &[ConversationRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_conversations(records),
        OutputFormat::Cli => terminal::format_conversations(records),
    }
}
