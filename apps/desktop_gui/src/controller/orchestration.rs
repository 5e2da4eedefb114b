//! Command orchestration helpers from UI actions to backend command queue.

use client_core::RequestFailure;
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. When the queue cannot take it, the caller gets
/// the failure to resolve the request with, so the form never stays stuck in pending.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Result<(), RequestFailure> {
    let cmd_name = cmd.name();
    let seq = cmd.seq();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, seq, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            Err(RequestFailure::Transport(
                "backend command queue is full".to_string(),
            ))
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected; restart the application".to_string();
            tracing::error!(command = cmd_name, seq, "backend command processor disconnected");
            Err(RequestFailure::Transport(
                "backend command processor disconnected".to_string(),
            ))
        }
    }
}
