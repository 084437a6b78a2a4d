//! Client execution logic with reconnection support.

use std::time::Duration;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    api::end_session, domain::should_attempt_reconnect, error::ClientError,
    session::run_client_session,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client with reconnection logic.
///
/// Returns when the user quits, or with the error that ended the last attempt.
pub async fn run_client(
    base_url: String,
    username: String,
    history: usize,
) -> Result<(), ClientError> {
    let http = reqwest::Client::new();
    let mut input_rx = spawn_input_thread(username.clone());
    let mut failed_attempts = 0;
    let mut token: Option<String> = None;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            base_url,
            username,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let result = run_client_session(
            &http,
            &base_url,
            &username,
            history,
            &mut token,
            &mut input_rx,
        )
        .await;
        let error = match result {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                if let Some(token) = token.take()
                    && let Err(e) = end_session(&http, &base_url, &token).await
                {
                    tracing::warn!("Failed to end session: {}", e);
                }
                return Ok(());
            }
            Err(e) => e,
        };

        // A session that got as far as the room resets the budget
        if matches!(error, ClientError::ConnectionLost(_)) {
            failed_attempts = 0;
        }

        if !should_attempt_reconnect(&error, failed_attempts, MAX_RECONNECT_ATTEMPTS) {
            if failed_attempts >= MAX_RECONNECT_ATTEMPTS {
                tracing::error!(
                    "Failed to reconnect after {} attempts. Exiting.",
                    MAX_RECONNECT_ATTEMPTS
                );
            }
            return Err(error);
        }

        tracing::warn!("{}", error);
        failed_attempts += 1;
        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            RECONNECT_INTERVAL_SECS,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
    }
}

/// Read lines on a blocking thread for the lifetime of the client.
///
/// The channel closes on Ctrl+C, Ctrl+D or a readline failure.
fn spawn_input_thread(username: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", username);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    if input_tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
