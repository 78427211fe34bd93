//! Recent conversations command

use crate::app::{OutputFormat, RecentArgs};
use crate::output::format_conversations;
use anyhow::Result;
use chefrag_core::{Database, Relevance};

pub async fn run(args: RecentArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let relevance = args
        .relevance
        .as_deref()
        .map(str::parse::<Relevance>)
        .transpose()?;

    let records = db.recent_conversations(args.limit, relevance)?;
    print!("{}", format_conversations(&records, format));
    Ok(())
}
