//! Spawns a backend request on a background thread, with a result channel.

use std::sync::Arc;
use std::sync::mpsc;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::core::backend::{BackendClient, ChatPayload};

use super::PendingChat;

/// Send `payload` on the shared runtime. The reply (or error) arrives on `result_rx`.
pub fn spawn_chat(
    rt: &Arc<Runtime>,
    client: Arc<BackendClient>,
    payload: ChatPayload,
) -> PendingChat {
    let (result_tx, result_rx) = mpsc::channel();
    let cancel_token = CancellationToken::new();
    let cancel_token_clone = cancel_token.clone();
    let chat_id = payload.chat_id.clone();
    let rt_clone = Arc::clone(rt);

    std::thread::spawn(move || {
        let result = rt_clone.block_on(client.send(&payload, Some(&cancel_token_clone)));
        // Receiver gone means the TUI already quit.
        let _ = result_tx.send(result);
    });

    PendingChat {
        chat_id,
        result_rx,
        cancel_token,
    }
}
