use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, FieldUpdate, FormModel, HttpPredictionService, OutcomeView, RequestController,
    RequestState, SettingsOverrides,
};
use shared::domain::{Field, FieldKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Score one customer profile against the churn prediction service")]
struct Args {
    /// Base URL of the prediction service. Overrides client.toml and CHURN_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Override one field of the default profile. Repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,
    /// Print the request payload instead of sending it.
    #[arg(long)]
    dry_run: bool,
    /// List the editable fields and exit.
    #[arg(long)]
    fields: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    if args.fields {
        for line in field_table() {
            println!("{line}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut form = FormModel::initialize();
    for field in apply_assignments(&mut form, &args.assignments)? {
        tracing::warn!(field, "value rejected; keeping the default");
    }

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&form.to_request_payload())?);
        return Ok(ExitCode::SUCCESS);
    }

    let settings = load_settings(&SettingsOverrides {
        api_url: args.api_url,
        request_timeout_secs: args.timeout_secs,
    })
    .context("failed to resolve prediction service settings")?;
    let service =
        HttpPredictionService::new(&settings).context("failed to build prediction client")?;

    let mut controller = RequestController::new();
    let state = controller.submit(&service, form.profile()).await;
    if let RequestState::Failed(failure) = state {
        tracing::error!(url = %service.predict_url(), "prediction failed: {failure}");
    }

    match OutcomeView::from_state(state) {
        OutcomeView::Result {
            probability_line,
            prediction_line,
        } => {
            println!("{probability_line}");
            println!("{prediction_line}");
            Ok(ExitCode::SUCCESS)
        }
        OutcomeView::Error { message } => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        OutcomeView::Empty | OutcomeView::Loading => Ok(ExitCode::FAILURE),
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_string(), value.to_string()))
}

/// Applies `--set` pairs in order. Returns the wire names whose values were rejected.
fn apply_assignments(
    form: &mut FormModel,
    assignments: &[(String, String)],
) -> Result<Vec<&'static str>> {
    let mut ignored = Vec::new();
    for (name, value) in assignments {
        let field: Field = name
            .parse()
            .context("see --fields for the list of field names")?;
        if form.set(field, value.as_str()) == FieldUpdate::Ignored {
            ignored.push(field.wire_name());
        }
    }
    Ok(ignored)
}

fn field_table() -> Vec<String> {
    Field::ALL
        .iter()
        .map(|field| {
            let kind = match field.kind() {
                FieldKind::Choice(options) => options.join(" | "),
                FieldKind::Flag => "0 (No) | 1 (Yes)".to_string(),
                FieldKind::Count => "whole number >= 0".to_string(),
                FieldKind::Amount => "amount >= 0, two decimals".to_string(),
            };
            format!("{:<18} {:<20} {kind}", field.wire_name(), field.label())
        })
        .collect()
}
