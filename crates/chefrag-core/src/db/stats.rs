//! Feedback statistics

use super::Database;
use crate::error::Result;

/// Vote totals across all conversations
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FeedbackStats {
    pub thumbs_up: usize,
    pub thumbs_down: usize,
}

impl Database {
    pub fn feedback_stats(&self) -> Result<FeedbackStats> {
        let (up, down): (i64, i64) = self.conn.query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN feedback > 0 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN feedback < 0 THEN 1 ELSE 0 END), 0)
             FROM feedback",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(FeedbackStats {
            thumbs_up: up as usize,
            thumbs_down: down as usize,
        })
    }
}
