//! Stats command

use crate::app::OutputFormat;
use anyhow::Result;
use chefrag_core::Database;

pub async fn run(db: &Database, format: OutputFormat) -> Result<()> {
    let stats = db.feedback_stats()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Cli => {
            println!("Thumbs up:       {}", stats.thumbs_up);
            println!("Thumbs down:     {}", stats.thumbs_down);
        }
    }
    Ok(())
}
