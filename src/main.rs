mod cli_args;
mod config;
mod error;
mod git;
mod llm;
mod logging;
mod setup;

use std::process::ExitCode;

use clap::Parser;

use cli_args::Cli;
use config::Config;
use error::ReviewError;
use git::{ChangeRef, DiffSource};
use llm::prompt_builder;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// One linear pass: resolve changes, read contents, build the prompt,
/// call the review service, print the feedback.
fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = Config::from_sources(cli)?;
    let template = prompt_builder::load_template(&cfg.template_path)?;

    // Configuration problems must surface before any repository inspection.
    let client = if cli.dry_run {
        None
    } else {
        Some(setup::build_review_client(&cfg)?)
    };

    let source = diff_source(cli)?;
    let (paths, diff) = git::resolve(&source)?;
    if paths.is_empty() {
        println!("No modified files to review.");
        return Ok(());
    }

    let files = git::read_contents(&paths);
    if files.is_empty() {
        println!("No modified files to review.");
        return Ok(());
    }

    let prompt = prompt_builder::build(&template, &files, &diff, cfg.token_budget)?;

    let Some(client) = client else {
        println!("{prompt}");
        return Ok(());
    };

    println!("Sending code to AI agent for review...\n");
    let feedback = client.review_text(&prompt, cfg.max_tokens)?;

    println!("=== AI Code Review Feedback ===\n");
    println!("{feedback}");

    Ok(())
}

/// Pick the diff source from the invocation context.
///
/// A pre-push hook exports LOCAL_SHA and REMOTE_SHA; a pre-commit hook
/// exports neither and gets the staged index. Exactly one sha set means
/// a broken hook script, not a mode we can guess.
fn diff_source(cli: &Cli) -> Result<DiffSource, ReviewError> {
    if cli.staged {
        return Ok(DiffSource::Staged);
    }

    match (&cli.remote_sha, &cli.local_sha) {
        (Some(base), Some(head)) => Ok(DiffSource::Range(ChangeRef {
            base: base.clone(),
            head: head.clone(),
        })),
        (None, None) => Ok(DiffSource::Staged),
        _ => Err(ReviewError::Configuration(
            "both LOCAL_SHA and REMOTE_SHA must be set for a range review (or pass --staged)"
                .to_string(),
        )),
    }
}
