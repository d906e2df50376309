//! Application run modes: logger init, single prompt, TUI launch.

use std::io;
use std::sync::Arc;

use crate::cli::Args;
use crate::core;
use crate::core::backend::{BackendClient, ChatPayload};
use crate::core::config::Config;
use crate::core::state::{ChatState, Sender, SessionKind};

/// Initialize env_logger. In TUI mode, writes to file to avoid corrupting the display.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_tui() {
        let log_path = core::paths::cache_dir().and_then(|d| {
            std::fs::create_dir_all(&d).ok()?;
            Some(d.join(format!("{}.log", core::app::NAME)))
        });
        if let Some(path) = log_path
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Run single prompt mode: one ephemeral exchange, reply printed to stdout.
pub async fn run_single_prompt(
    args: &Args,
    config: &Config,
    prompt_arg: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = if prompt_arg == "-" {
        io::read_to_string(io::stdin())?
    } else {
        prompt_arg.to_string()
    };
    let prompt = prompt.trim();
    if prompt.is_empty() {
        eprintln!("Error: empty prompt");
        std::process::exit(1);
    }

    let mut state = ChatState::new(config.user_id.clone(), SessionKind::Ephemeral);
    let context = state.request_context();
    state.append_message(&context.chat_id, Sender::User, prompt)?;

    let payload = ChatPayload::new(context, prompt, config.provider.clone());
    let client = BackendClient::new(config)?;

    match client.send(&payload, None).await {
        Ok(reply) => {
            if let Some(p) = reply.provider.as_deref() {
                log::info!("Reply from provider {}", p);
            }
            if args.raw {
                println!("{}", reply.response);
            } else {
                println!(
                    "{}",
                    core::math::normalize_with(&reply.response, config.math_policy)
                );
            }
            Ok(())
        }
        Err(e) => {
            log::warn!("Chat request to {} failed: {}", client.chat_url(), e);
            eprintln!("{}", e.reply_text());
            std::process::exit(1);
        }
    }
}

/// Launch the TUI in a blocking thread. Returns on panic or IO error.
pub async fn launch_tui(
    config: Config,
    kind: SessionKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(config);
    let join_result: Result<io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || crate::tui::run(config, kind)).await;

    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(
                Box::new(io::Error::other("TUI thread panicked")) as Box<dyn std::error::Error>
            );
        }
    }
    Ok(())
}
