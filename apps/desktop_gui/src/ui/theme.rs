use eframe::egui;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(88, 101, 242);
pub const RESULT_FILL: egui::Color32 = egui::Color32::from_rgb(30, 58, 46);
pub const RESULT_STROKE: egui::Color32 = egui::Color32::from_rgb(67, 181, 129);
pub const ERROR_FILL: egui::Color32 = egui::Color32::from_rgb(74, 28, 32);
pub const ERROR_STROKE: egui::Color32 = egui::Color32::from_rgb(237, 66, 69);
pub const PANEL_RADIUS: u8 = 10;

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.selection.bg_fill = ACCENT;
    visuals.hyperlink_color = ACCENT;
    let radius = egui::CornerRadius::same(6);
    visuals.widgets.inactive.corner_radius = radius;
    visuals.widgets.hovered.corner_radius = radius;
    visuals.widgets.active.corner_radius = radius;
    visuals.widgets.open.corner_radius = radius;
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(10.0, 8.0);
        style.spacing.button_padding = egui::vec2(14.0, 6.0);
    });
}
