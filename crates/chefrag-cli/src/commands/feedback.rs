//! Feedback command

use crate::app::{FeedbackArgs, OutputFormat};
use anyhow::Result;
use chefrag_core::db::DEFAULT_FEEDBACK_ATTEMPTS;
use chefrag_core::Database;

pub async fn run(args: FeedbackArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let value = args.vote.value();
    db.save_feedback_with_retry(&args.conversation_id, value, DEFAULT_FEEDBACK_ATTEMPTS)
        .await?;

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "conversation_id": args.conversation_id,
                "feedback": value,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Cli => {
            println!("Recorded feedback {:+} for {}", value, args.conversation_id);
        }
    }
    Ok(())
}
