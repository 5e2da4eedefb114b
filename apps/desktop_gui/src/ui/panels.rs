use std::collections::HashMap;

use client_core::{ControlKind, FieldControl, OutcomeView};
use eframe::egui;
use shared::domain::Field;

use crate::ui::theme;

const CONTROL_WIDTH: f32 = 220.0;

/// Something the user did to the form this frame.
pub enum FormEdit {
    Set { field: Field, raw: String },
    /// A number input lost focus; its text goes back to the stored value.
    Resync(Field),
}

/// Two label/control pairs per row. Number inputs edit a per-field draft so that
/// half-typed text survives until it parses.
pub fn form_grid(
    ui: &mut egui::Ui,
    controls: &[FieldControl],
    drafts: &mut HashMap<Field, String>,
) -> Vec<FormEdit> {
    let mut edits = Vec::new();

    egui::Grid::new("customer_form")
        .num_columns(4)
        .spacing([18.0, 10.0])
        .show(ui, |ui| {
            for (index, control) in controls.iter().enumerate() {
                ui.label(egui::RichText::new(control.label).strong());

                match &control.kind {
                    ControlKind::Select { options } => {
                        let mut picked = control.value.clone();
                        egui::ComboBox::from_id_salt(control.field.wire_name())
                            .selected_text(control.selected_label())
                            .width(CONTROL_WIDTH)
                            .show_ui(ui, |ui| {
                                for option in options {
                                    ui.selectable_value(
                                        &mut picked,
                                        option.value.to_string(),
                                        option.label,
                                    );
                                }
                            });
                        if picked != control.value {
                            edits.push(FormEdit::Set {
                                field: control.field,
                                raw: picked,
                            });
                        }
                    }
                    ControlKind::Number { step } => {
                        let draft = drafts
                            .entry(control.field)
                            .or_insert_with(|| control.value.clone());
                        let response = ui.add(
                            egui::TextEdit::singleline(draft)
                                .id_salt(control.field.wire_name())
                                .hint_text(format!("step {step}"))
                                .desired_width(CONTROL_WIDTH),
                        );
                        if response.changed() {
                            edits.push(FormEdit::Set {
                                field: control.field,
                                raw: draft.clone(),
                            });
                        }
                        if response.lost_focus() {
                            edits.push(FormEdit::Resync(control.field));
                        }
                    }
                }

                if ends_row(index, controls.len()) {
                    ui.end_row();
                }
            }
        });

    edits
}

/// Rows hold two controls; a trailing single control still closes its row.
fn ends_row(index: usize, len: usize) -> bool {
    index % 2 == 1 || index + 1 == len
}

pub fn outcome_panel(ui: &mut egui::Ui, outcome: &OutcomeView) {
    match outcome {
        OutcomeView::Empty => {}
        OutcomeView::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(egui::RichText::new("Scoring customer...").weak());
            });
        }
        OutcomeView::Result {
            probability_line,
            prediction_line,
        } => {
            result_frame(theme::RESULT_FILL, theme::RESULT_STROKE).show(ui, |ui| {
                ui.label(egui::RichText::new("Prediction Result").strong().size(16.0));
                ui.add_space(4.0);
                ui.label(egui::RichText::new(probability_line).color(egui::Color32::WHITE));
                ui.label(egui::RichText::new(prediction_line).color(egui::Color32::WHITE));
            });
        }
        OutcomeView::Error { message } => {
            result_frame(theme::ERROR_FILL, theme::ERROR_STROKE).show(ui, |ui| {
                ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
            });
        }
    }
}

fn result_frame(fill: egui::Color32, stroke: egui::Color32) -> egui::Frame {
    egui::Frame::NONE
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, stroke))
        .corner_radius(egui::CornerRadius::same(theme::PANEL_RADIUS))
        .inner_margin(egui::Margin::symmetric(14, 12))
}

#[cfg(test)]
mod tests {
    use super::ends_row;
    use shared::domain::Field;

    #[test]
    fn every_grid_row_is_closed_including_a_trailing_single() {
        let len = Field::ALL.len();
        let row_ends: Vec<usize> = (0..len).filter(|&index| ends_row(index, len)).collect();

        assert_eq!(row_ends.len(), len.div_ceil(2));
        assert_eq!(row_ends.last(), Some(&(len - 1)));
        assert!(!ends_row(0, len));
        assert!(ends_row(1, len));
    }

    #[test]
    fn even_control_count_closes_rows_in_pairs() {
        let row_ends: Vec<usize> = (0..4).filter(|&index| ends_row(index, 4)).collect();
        assert_eq!(row_ends, vec![1, 3]);
    }
}
