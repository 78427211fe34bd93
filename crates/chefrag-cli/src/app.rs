//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "chefrag")]
#[command(
    author,
    version,
    about = "Grounded answers to questions about dishes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question about a dish
    Ask(AskArgs),

    /// Rate an answer
    Feedback(FeedbackArgs),

    /// Show recent conversations
    Recent(RecentArgs),

    /// Show feedback totals
    Stats,

    /// Create the conversation log
    Init(InitArgs),
}

#[derive(Args)]
pub struct AskArgs {
    /// Question text
    #[arg(required = true)]
    pub question: Vec<String>,

    /// Model provider (openrouter or groq)
    #[arg(short, long, default_value = "openrouter")]
    pub provider: String,

    /// Do not record the conversation
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Args)]
pub struct FeedbackArgs {
    /// Conversation id printed by `ask`
    pub conversation_id: String,

    pub vote: Vote,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn value(self) -> i32 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }
}

#[derive(Args)]
pub struct RecentArgs {
    /// Number of conversations
    #[arg(short = 'n', long, default_value = "5")]
    pub limit: usize,

    /// Only show this relevance (RELEVANT, PARTLY_RELEVANT, NON_RELEVANT, UNKNOWN)
    #[arg(long)]
    pub relevance: Option<String>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Drop existing conversations and feedback first
    #[arg(long)]
    pub reset: bool,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
