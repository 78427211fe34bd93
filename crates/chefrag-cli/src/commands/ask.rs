//! Ask command

use crate::app::{AskArgs, OutputFormat};
use crate::output::format_answer;
use anyhow::Result;
use chefrag_core::{Assistant, Config, Database, Provider};
use std::path::PathBuf;

pub async fn run(args: AskArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let question = args.question.join(" ");
    let provider: Provider = args.provider.parse()?;

    let config = load_config()?;
    config.validate_for(provider)?;

    let assistant = Assistant::from_config(&config).await?;
    let result = assistant.answer(&question, provider).await?;

    let conversation_id = if args.no_save {
        None
    } else {
        let id = uuid::Uuid::new_v4().to_string();
        db.save_conversation(&id, &question, &result, None)?;
        Some(id)
    };

    print!(
        "{}",
        format_answer(conversation_id.as_deref(), &result, format)
    );
    Ok(())
}

fn load_config() -> Result<Config> {
    let path = std::env::var("CHEFRAG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Config::default_path());
    Ok(Config::load_from(path)?)
}
