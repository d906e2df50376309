//! # texchat
//!
//! Terminal chat client for a math-aware LLM backend. Replies are rewritten
//! so every formula uses the `$…$` / `$$…$$` delimiters before display.
//!
//! ## Modes
//! - Interactive TUI with sessions and chat tabs (default)
//! - Single prompt with `-p` / `--prompt`
//! - `normalize`, `config`, `history`, `completions` subcommands

mod cli;
mod core;
mod run;
mod tui;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands, HistorySubcommand};
use core::state::SessionKind;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    if let Some(Commands::Completions { shell }) = &args.command {
        let mut cmd = Args::command();
        cli::generate(*shell, &mut cmd, core::app::NAME, &mut std::io::stdout());
        return Ok(());
    }

    // Print user-friendly message; exit uses Display not Debug
    let mut config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    if let Some(provider) = &args.provider {
        config.provider = Some(provider.clone());
    }

    match &args.command {
        Some(Commands::Normalize { file, policy }) => {
            core::cli::run_normalize(file.as_deref(), policy.unwrap_or(config.math_policy));
            return Ok(());
        }
        Some(Commands::Config) => {
            core::cli::run_config(&config);
            return Ok(());
        }
        Some(Commands::History { subcommand }) => {
            match subcommand {
                HistorySubcommand::List { limit } => core::cli::run_history_list(*limit),
                HistorySubcommand::Show { id, raw } => {
                    core::cli::run_history_show(id, *raw, config.math_policy)
                }
                HistorySubcommand::Delete { id } => core::cli::run_history_delete(id),
            }
            return Ok(());
        }
        Some(Commands::Completions { .. }) | None => {}
    }

    if let Some(prompt) = &args.prompt {
        return run::run_single_prompt(&args, &config, prompt).await;
    }

    let kind = if args.ephemeral {
        SessionKind::Ephemeral
    } else {
        SessionKind::Persistent
    };
    run::launch_tui(config, kind).await
}
