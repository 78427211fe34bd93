//! Feedback on answered conversations

use super::Database;
use crate::error::{ChefError, Result};
use chrono::{DateTime, Utc};
use rusqlite::params;
use std::time::Duration;

/// Attempts made by the CLI before giving up on a vote
pub const DEFAULT_FEEDBACK_ATTEMPTS: u32 = 3;

/// Pause between attempts
pub const FEEDBACK_RETRY_PAUSE: Duration = Duration::from_millis(500);

impl Database {
    /// Record a vote: `1` for thumbs up, `-1` for thumbs down
    pub fn save_feedback(
        &self,
        conversation_id: &str,
        feedback: i32,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<()> {
        if feedback != 1 && feedback != -1 {
            return Err(ChefError::InvalidInput(format!(
                "Feedback must be 1 or -1, got {}",
                feedback
            )));
        }
        if !self.conversation_exists(conversation_id)? {
            return Err(ChefError::NotFound(format!(
                "Conversation not found: {}",
                conversation_id
            )));
        }

        let timestamp = timestamp.unwrap_or_else(Utc::now).to_rfc3339();
        self.conn.execute(
            "INSERT INTO feedback (conversation_id, feedback, timestamp) VALUES (?1, ?2, ?3)",
            params![conversation_id, feedback, timestamp],
        )?;

        tracing::debug!("Saved feedback {} for {}", feedback, conversation_id);
        Ok(())
    }

    /// [`save_feedback`](Self::save_feedback), retrying database failures.
    ///
    /// Rejected votes and unknown conversations fail at once. After
    /// `max_attempts` database failures the last one is returned. The pause
    /// between attempts yields to the runtime.
    pub async fn save_feedback_with_retry(
        &self,
        conversation_id: &str,
        feedback: i32,
        max_attempts: u32,
    ) -> Result<()> {
        self.save_feedback_retrying(conversation_id, feedback, max_attempts, FEEDBACK_RETRY_PAUSE)
            .await
    }

    async fn save_feedback_retrying(
        &self,
        conversation_id: &str,
        feedback: i32,
        max_attempts: u32,
        pause: Duration,
    ) -> Result<()> {
        let max_attempts = max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.save_feedback(conversation_id, feedback, None) {
                Ok(()) => return Ok(()),
                Err(ChefError::Database(e)) if attempt < max_attempts => {
                    tracing::warn!(
                        "Saving feedback failed (attempt {}/{}): {}",
                        attempt,
                        max_attempts,
                        e
                    );
                    tokio::time::sleep(pause).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
