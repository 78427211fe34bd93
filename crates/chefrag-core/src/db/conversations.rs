//! Conversation persistence

use super::Database;
use crate::assistant::AnswerResult;
use crate::error::Result;
use crate::evaluation::Relevance;
use crate::llm::TokenUsage;
use chrono::{DateTime, Utc};
use rusqlite::params;

/// A logged conversation joined with its feedback, if any
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConversationRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub model_used: String,
    pub response_time: f64,
    pub relevance: String,
    pub relevance_explanation: String,
    pub usage: TokenUsage,
    pub eval_usage: TokenUsage,
    pub timestamp: String,
    pub feedback: Option<i32>,
}

impl Database {
    /// Store one answered question under `conversation_id`
    pub fn save_conversation(
        &self,
        conversation_id: &str,
        question: &str,
        result: &AnswerResult,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let timestamp = timestamp.unwrap_or_else(Utc::now).to_rfc3339();

        self.conn.execute(
            "INSERT INTO conversations (
                id, question, answer, model_used, response_time, relevance,
                relevance_explanation, prompt_tokens, completion_tokens, total_tokens,
                eval_prompt_tokens, eval_completion_tokens, eval_total_tokens, timestamp
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                conversation_id,
                question,
                result.answer,
                result.model_used.as_str(),
                result.response_time,
                result.relevance.as_str(),
                result.relevance_explanation,
                result.usage.prompt_tokens,
                result.usage.completion_tokens,
                result.usage.total_tokens,
                result.eval_usage.prompt_tokens,
                result.eval_usage.completion_tokens,
                result.eval_usage.total_tokens,
                timestamp,
            ],
        )?;

        tracing::debug!("Saved conversation {}", conversation_id);
        Ok(())
    }

    /// Check whether a conversation has been logged
    pub fn conversation_exists(&self, conversation_id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM conversations WHERE id = ?1",
            params![conversation_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Newest conversations first, optionally restricted to one relevance grade
    pub fn recent_conversations(
        &self,
        limit: usize,
        relevance: Option<Relevance>,
    ) -> Result<Vec<ConversationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.question, c.answer, c.model_used, c.response_time, c.relevance,
                    c.relevance_explanation, c.prompt_tokens, c.completion_tokens, c.total_tokens,
                    c.eval_prompt_tokens, c.eval_completion_tokens, c.eval_total_tokens,
                    c.timestamp, f.feedback
             FROM conversations c
             LEFT JOIN feedback f ON f.conversation_id = c.id
             WHERE ?1 IS NULL OR c.relevance = ?1
             ORDER BY c.timestamp DESC, c.rowid DESC, f.id DESC
             LIMIT ?2",
        )?;

        let filter = relevance.map(|r| r.as_str());
        let records = stmt
            .query_map(params![filter, limit as i64], |row| {
                Ok(ConversationRecord {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    answer: row.get(2)?,
                    model_used: row.get(3)?,
                    response_time: row.get(4)?,
                    relevance: row.get(5)?,
                    relevance_explanation: row.get(6)?,
                    usage: TokenUsage::new(row.get(7)?, row.get(8)?, row.get(9)?),
                    eval_usage: TokenUsage::new(row.get(10)?, row.get(11)?, row.get(12)?),
                    timestamp: row.get(13)?,
                    feedback: row.get(14)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
