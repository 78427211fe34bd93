//! Conversation log
//!
//! SQLite storage for answered questions and the votes users leave on them.

mod conversations;
mod feedback;
mod schema;
mod stats;

pub use conversations::ConversationRecord;
pub use feedback::{DEFAULT_FEEDBACK_ATTEMPTS, FEEDBACK_RETRY_PAUSE};
pub use schema::Database;
pub use stats::FeedbackStats;
use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .or_else(dirs::cache_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::DATA_DIR_NAME)
            .join("conversations.sqlite")
    }
}
