use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, HttpPredictionService, SettingsOverrides};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::ChurnApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop form for scoring a telecom customer's churn risk")]
struct Args {
    /// Base URL of the prediction service. Overrides client.toml and CHURN_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let settings = load_settings(&SettingsOverrides {
        api_url: args.api_url,
        request_timeout_secs: args.timeout_secs,
    })
    .context("failed to resolve prediction service settings")?;
    let service =
        HttpPredictionService::new(&settings).context("failed to build prediction client")?;
    let predict_url = service.predict_url().to_string();
    tracing::info!(url = %predict_url, timeout = ?settings.request_timeout, "prediction service configured");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Telecom Churn Predictor")
            .with_inner_size([980.0, 760.0])
            .with_min_inner_size([760.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Telecom Churn Predictor",
        options,
        Box::new(move |cc| {
            let repaint_ctx = cc.egui_ctx.clone();
            backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(service), move || {
                repaint_ctx.request_repaint()
            });
            ui::theme::apply(&cc.egui_ctx);
            Ok(Box::new(ChurnApp::new(cmd_tx, ui_rx, predict_url)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop window failed: {err}"))
}
