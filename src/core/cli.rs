//! CLI-only commands: config info, normalize, history list/show/delete.
//!
//! These run without opening the TUI and produce plain text output.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::core::app;
use crate::core::config::Config;
use crate::core::history;
use crate::core::math::{self, MathPolicy};
use crate::core::paths;
use crate::core::persistence;
use crate::core::state::{Sender, Session};

/// Run the `config` command: display paths and the effective configuration.
pub fn run_config(config: &Config) {
    let config_dir = display_dir(paths::config_dir());
    let cache_dir = display_dir(paths::cache_dir());
    let data_dir = display_dir(paths::data_dir());

    let provider_source = if std::env::var("TEXCHAT_PROVIDER")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .is_some()
    {
        "from TEXCHAT_PROVIDER"
    } else if persistence::load_last_provider().is_some() {
        "from last_provider"
    } else {
        "backend default"
    };
    let provider = config.provider.as_deref().unwrap_or("-");
    let max_sessions = match config.max_sessions {
        0 => "unlimited".to_string(),
        n => n.to_string(),
    };

    println!("{} {}", app::NAME, app::VERSION);
    println!("Config:       {}", config_dir);
    println!("Cache:        {}", cache_dir);
    println!("Sessions:     {}", data_dir);
    println!("Backend:      {}", config.backend_url);
    println!("User id:      {}", config.user_id);
    println!("Provider:     {} ({})", provider, provider_source);
    println!("Math policy:  {}", config.math_policy);
    println!("Max sessions: {}", max_sessions);
    println!("Timeout:      {}s", config.request_timeout.as_secs());
}

fn display_dir(dir: Option<std::path::PathBuf>) -> String {
    dir.map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Run the `normalize` command: rewrite math delimiters of a file (or stdin) to stdout.
pub fn run_normalize(file: Option<&Path>, policy: MathPolicy) {
    let input = match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    let input = match input {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout
        .write_all(math::normalize_with(&input, policy).as_bytes())
        .and_then(|_| stdout.flush())
    {
        log::debug!("stdout closed: {}", e);
    }
}

/// Run the `history list` command: list stored sessions with optional limit.
pub fn run_history_list(limit: Option<usize>) {
    let sessions = match history::list_sessions() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let take = limit.unwrap_or(sessions.len());
    for s in sessions.into_iter().take(take) {
        let created = format_timestamp(s.created_at);
        let updated = format_timestamp(s.updated_at);
        println!(
            "{}\t{}\t{}\t{}\t{} chat(s)",
            s.id, s.title, created, updated, s.chat_count
        );
    }
}

/// Run the `history show` command: print a stored session as a transcript.
pub fn run_history_show(id: &str, raw: bool, policy: MathPolicy) {
    let Some(session) = history::load_session(id) else {
        eprintln!("Error: no session with id {}", id);
        std::process::exit(1);
    };
    print!("{}", render_transcript(&session, (!raw).then_some(policy)));
}

/// Run the `history delete` command.
pub fn run_history_delete(id: &str) {
    match history::delete_session(id) {
        Ok(()) => println!("Deleted session {}", id),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Plain-text transcript of a session. Assistant replies are normalized with `policy`
/// unless it is `None`.
pub fn render_transcript(session: &Session, policy: Option<MathPolicy>) -> String {
    let mut out = format!("# {}\n", session.title);
    for chat in &session.chats {
        out.push_str(&format!("\n## {}\n", chat.title));
        for msg in &chat.messages {
            let (label, content) = match (msg.sender, policy) {
                (Sender::User, _) => ("You", msg.content.clone()),
                (Sender::Assistant, Some(p)) => ("Assistant", math::normalize_with(&msg.content, p)),
                (Sender::Assistant, None) => ("Assistant", msg.content.clone()),
            };
            let when = msg
                .timestamp
                .map(|t| format!(" ({})", format_timestamp(t)))
                .unwrap_or_default();
            out.push_str(&format!("\n**{}**{}:\n{}\n", label, when, content));
        }
    }
    out
}

pub(crate) fn format_timestamp(secs: u64) -> String {
    use chrono::{TimeZone, Utc};
    let dt = Utc.timestamp_opt(secs as i64, 0).single();
    dt.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}
