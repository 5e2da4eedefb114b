use std::{collections::HashMap, time::Duration};

use client_core::{form_controls, FormModel, OutcomeView, RequestController};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Field;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::{
    panels::{self, FormEdit},
    theme,
};

pub struct ChurnApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    form: FormModel,
    requests: RequestController,
    numeric_drafts: HashMap<Field, String>,

    status: String,
    predict_url: String,
}

impl ChurnApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        predict_url: String,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            form: FormModel::initialize(),
            requests: RequestController::new(),
            numeric_drafts: HashMap::new(),
            status: "Backend worker starting...".to_string(),
            predict_url,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::BackendReady => {
                    self.status = "Ready".to_string();
                }
                UiEvent::BackendFailed(message) => {
                    self.status = message;
                }
                UiEvent::PredictionFinished { seq, result } => {
                    self.requests.resolve(seq, result);
                }
            }
        }
    }

    fn apply_edit(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Set { field, raw } => {
                if let Err(err) = self.form.set_field(field.wire_name(), raw) {
                    tracing::error!("form control wired to a field outside the schema: {err}");
                    debug_assert!(false, "{err}");
                }
            }
            FormEdit::Resync(field) => {
                self.numeric_drafts
                    .insert(field, self.form.profile().display_value(field));
            }
        }
    }

    fn submit(&mut self) {
        let pending = self.requests.begin(&self.form.snapshot());
        let seq = pending.seq;
        let cmd = BackendCommand::Predict {
            seq,
            payload: pending.payload,
        };
        if let Err(failure) = dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.requests.resolve(seq, Err(failure));
        }
    }
}

impl eframe::App for ChurnApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let controls = form_controls(self.form.profile());
        let outcome = OutcomeView::from_state(self.requests.state());
        let mut edits = Vec::new();
        let mut submit = false;

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(egui::RichText::new(&self.status).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(egui::RichText::new(&self.predict_url).weak());
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Telecom Churn Predictor");
                ui.label("Enter customer details to predict churn risk.");
                ui.add_space(14.0);

                edits = panels::form_grid(ui, &controls, &mut self.numeric_drafts);
                ui.add_space(14.0);

                ui.horizontal(|ui| {
                    let button = egui::Button::new(egui::RichText::new("Predict").strong())
                        .fill(theme::ACCENT);
                    if ui.add(button).clicked() {
                        submit = true;
                    }
                    if self.requests.is_pending() {
                        ui.spinner();
                    }
                });
                ui.add_space(14.0);

                panels::outcome_panel(ui, &outcome);
            });
        });

        for edit in edits {
            self.apply_edit(edit);
        }
        if submit {
            self.submit();
        }

        if self.requests.is_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChurnApp;
    use crate::backend_bridge::commands::BackendCommand;
    use crate::controller::events::UiEvent;
    use crate::ui::panels::FormEdit;
    use client_core::{RequestFailure, RequestState};
    use crossbeam_channel::bounded;
    use shared::{domain::Field, protocol::PredictionResponse};

    #[test]
    fn newer_submission_wins_over_late_result() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let mut app = ChurnApp::new(cmd_tx, ui_rx, "http://127.0.0.1:8000/predict".to_string());

        app.submit();
        app.apply_edit(FormEdit::Set {
            field: Field::Tenure,
            raw: "12".to_string(),
        });
        app.submit();

        let sent: Vec<_> = cmd_rx.try_iter().collect();
        assert_eq!(sent.len(), 2);
        let BackendCommand::Predict { seq: second, payload } = &sent[1];
        assert_eq!(payload.tenure, 12);

        ui_tx
            .send(UiEvent::PredictionFinished {
                seq: *second,
                result: Ok(PredictionResponse {
                    churn_probability: 0.2,
                    prediction: "No".to_string(),
                }),
            })
            .expect("send");
        ui_tx
            .send(UiEvent::PredictionFinished {
                seq: sent[0].seq(),
                result: Err(RequestFailure::Status(500)),
            })
            .expect("send");
        app.process_ui_events();

        assert!(matches!(app.requests.state(), RequestState::Succeeded(_)));
    }

    #[test]
    fn closed_backend_fails_the_request_immediately() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (_ui_tx, ui_rx) = bounded(8);
        drop(cmd_rx);
        let mut app = ChurnApp::new(cmd_tx, ui_rx, String::new());

        app.submit();

        assert!(matches!(
            app.requests.state(),
            RequestState::Failed(RequestFailure::Transport(_))
        ));
        assert!(!app.status.is_empty());
    }

    #[test]
    fn rejected_number_resyncs_draft_to_stored_value() {
        let (cmd_tx, _cmd_rx) = bounded(8);
        let (_ui_tx, ui_rx) = bounded(8);
        let mut app = ChurnApp::new(cmd_tx, ui_rx, String::new());
        app.numeric_drafts.insert(Field::Tenure, "4x".to_string());

        app.apply_edit(FormEdit::Set {
            field: Field::Tenure,
            raw: "4x".to_string(),
        });
        app.apply_edit(FormEdit::Resync(Field::Tenure));

        assert_eq!(app.numeric_drafts[&Field::Tenure], "43");
    }
}
