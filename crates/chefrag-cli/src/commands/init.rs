//! Init command

use crate::app::InitArgs;
use anyhow::Result;
use chefrag_core::Database;
use std::path::Path;

pub async fn run(args: InitArgs, db: &Database, path: &Path) -> Result<()> {
    if args.reset {
        db.reset()?;
        println!("Reset conversation log at {}", path.display());
    } else {
        println!("Conversation log ready at {}", path.display());
    }
    Ok(())
}
