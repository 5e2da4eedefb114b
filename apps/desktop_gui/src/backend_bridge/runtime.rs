//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::PredictionService;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Starts the backend worker thread. Each prediction runs as its own task, so a slow
/// response never holds up a newer submission; stale results are sorted out by the
/// sequence check on the UI side.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    service: Arc<dyn PredictionService>,
    repaint: impl Fn() + Send + Sync + 'static,
) {
    let repaint = Arc::new(repaint);
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: {err}"
                )));
                repaint();
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::BackendReady);
            tracing::info!("backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Predict { seq, payload } => {
                        let service = Arc::clone(&service);
                        let ui_tx = ui_tx.clone();
                        let repaint = Arc::clone(&repaint);
                        tokio::spawn(async move {
                            let result = service.predict(&payload).await;
                            if ui_tx
                                .try_send(UiEvent::PredictionFinished { seq, result })
                                .is_err()
                            {
                                tracing::warn!(seq, "dropping prediction result; ui queue unavailable");
                            }
                            repaint();
                        });
                    }
                }
            }
            tracing::debug!("ui command channel closed; backend worker exiting");
        });
    });
}
