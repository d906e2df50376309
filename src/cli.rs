//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::math::MathPolicy;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  texchat                           Launch interactive TUI
  texchat --ephemeral               TUI session that is never saved
  texchat -p \"integrate x^2\"        Single prompt, print the normalized reply
  texchat -p - --raw                Read prompt from stdin, print the reply untouched
  texchat normalize notes.md        Rewrite math delimiters of a file to stdout
  texchat config                    Show paths and effective configuration
  texchat history list              List stored sessions
  texchat completions bash          Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    version,
    about = "Terminal chat client for LaTeX-heavy LLM answers",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Send a single prompt then exit (without opening the TUI)
    #[arg(
        short = 'p',
        long,
        help = "Send one prompt and print the reply (use '-' to read from stdin)"
    )]
    pub prompt: Option<String>,

    /// Provider override (e.g. openai, gemini, anthropic)
    #[arg(long)]
    pub provider: Option<String>,

    /// In prompt mode, print the reply without normalizing math delimiters
    #[arg(long, requires = "prompt")]
    pub raw: bool,

    /// Start the TUI with an ephemeral session that is never written to disk
    #[arg(long, conflicts_with = "prompt")]
    pub ephemeral: bool,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize math delimiters of a file (or stdin) to stdout
    Normalize {
        /// Input file; stdin when omitted or '-'
        file: Option<PathBuf>,
        /// strict or permissive (defaults to TEXCHAT_MATH_POLICY)
        #[arg(long)]
        policy: Option<MathPolicy>,
    },
    /// Show config paths, backend, and math policy
    Config,
    /// Manage stored sessions
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// List sessions, most recent first
    List {
        /// Maximum number of sessions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print a session as a transcript
    Show {
        id: String,
        /// Print assistant replies without normalizing math delimiters
        #[arg(long)]
        raw: bool,
    },
    /// Delete a session
    Delete { id: String },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// True when this invocation opens the TUI.
    pub fn is_tui(&self) -> bool {
        self.command.is_none() && self.prompt.is_none()
    }
}
