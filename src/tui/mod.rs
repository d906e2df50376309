//! Terminal chat client: session tabs, normalized math, and background requests.

mod app;
mod chat_result;
mod constants;
mod draw;
mod handlers;
mod shortcuts;
mod syntax;
mod text;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use crossterm::execute;
use tokio::runtime::Runtime;

use crate::core::backend::BackendClient;
use crate::core::config::Config;
use crate::core::state::SessionKind;

use app::App;
use draw::draw;
use handlers::{HandleResult, PendingChat};

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = execute!(io::stdout(), event::PopKeyboardEnhancementFlags);
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), event::DisableMouseCapture);
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Wait briefly for the key that follows an Esc (Option+key sent as Esc+key).
/// Mouse events seen meanwhile are handled; returns the follow-up key, if any.
fn drain_escape_sequence(app: &mut App) -> io::Result<Option<KeyEvent>> {
    let step_ms = 25u64;
    let mut elapsed = 0u64;
    while elapsed < constants::ESC_SEQUENCE_DRAIN_MS {
        if event::poll(Duration::from_millis(step_ms))? {
            match event::read()? {
                Event::Key(next) => return Ok(Some(next)),
                Event::Mouse(m) => {
                    handlers::handle_mouse(m, app);
                    return Ok(None);
                }
                _ => {}
            }
        }
        elapsed += step_ms;
    }
    Ok(None)
}

/// Run the TUI loop. Uses a dedicated Tokio runtime for backend calls.
pub fn run(config: Arc<Config>, kind: SessionKind) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let rt = Arc::new(
        Runtime::new().map_err(|e| io::Error::other(format!("Failed to create runtime: {}", e)))?,
    );
    let client = Arc::new(BackendClient::new(config.as_ref()).map_err(io::Error::other)?);
    let mut app = App::new(config.as_ref(), kind);
    let mut pending_chat: Option<PendingChat> = None;

    let _guard = TerminalGuard;
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))?;
    execute!(stdout, event::EnableMouseCapture)?;
    // Kitty keyboard protocol: Alt+key as a single event with modifier, where supported.
    let _ = execute!(
        stdout,
        event::PushKeyboardEnhancementFlags(
            event::KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | event::KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
        )
    );
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    log::info!(
        "TUI started ({:?} session, user {}, backend {})",
        kind,
        app.state.user_id(),
        client.chat_url()
    );

    loop {
        if let Some(ref chat) = pending_chat
            && let Ok(result) = chat.result_rx.try_recv()
        {
            let chat_id = chat.chat_id.clone();
            pending_chat = None;
            chat_result::handle_chat_result(&mut app, &chat_id, result, config.as_ref());
        }

        terminal.draw(|f| draw(f, &mut app, f.area()))?;

        if !event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))? {
            continue;
        }
        match event::read()? {
            Event::Mouse(mouse) => {
                handlers::handle_mouse(mouse, &mut app);
            }
            Event::Key(key) => {
                let key_to_handle =
                    if handlers::would_esc_start_meta_sequence(&key, &app, &pending_chat) {
                        match drain_escape_sequence(&mut app)? {
                            Some(next) => {
                                app.escape_pending = true;
                                next
                            }
                            None => key,
                        }
                    } else {
                        key
                    };
                let result = handlers::handle_key(
                    key_to_handle,
                    handlers::HandleKeyContext {
                        app: &mut app,
                        config: &config,
                        client: &client,
                        pending_chat: &mut pending_chat,
                        rt: &rt,
                    },
                );
                if result == HandleResult::Break {
                    break;
                }
            }
            _ => {}
        }
    }

    if let Some(pc) = pending_chat.take() {
        pc.cancel_token.cancel();
    }
    chat_result::save_all_dirty(&mut app, config.as_ref());
    terminal.show_cursor()?;
    log::info!("TUI exited");
    Ok(())
}
