use std::path::PathBuf;

use clap::Parser;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "reviewbot",
    version,
    about = "LLM code review for git pre-push and pre-commit hooks"
)]
pub struct Cli {
    /// Head commit of the push (set by the pre-push hook)
    #[arg(long, env = "LOCAL_SHA")]
    pub local_sha: Option<String>,

    /// Base commit on the remote (all zeros for a brand-new branch)
    #[arg(long, env = "REMOTE_SHA")]
    pub remote_sha: Option<String>,

    /// Review the staged index instead of a pushed range
    #[arg(long)]
    pub staged: bool,

    /// Print the built prompt instead of calling the review service
    #[arg(long)]
    pub dry_run: bool,

    /// Review service to use (currently only 'openai')
    #[arg(long)]
    pub service: Option<String>,

    /// Model name to use (e.g. gpt-4o-mini)
    #[arg(long)]
    pub model: Option<String>,

    /// API key (otherwise uses OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to the prompt template (must contain {files} and {diff})
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Approximate token budget for the built prompt
    #[arg(long)]
    pub token_budget: Option<usize>,

    /// Maximum tokens the model may spend on the review itself
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds for the review service
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
