//! egui overlays: the place popup next to the pointer and a small status HUD.

use egui::{Color32, RichText};
use geohover::{GeoCoordinate, PopupState};

/// Draws the popup when it is visible; does nothing otherwise.
pub fn draw_popup(ctx: &egui::Context, popup: &PopupState) {
    let Some(place) = popup.content().filter(|_| popup.is_visible()) else {
        return;
    };
    let anchor = popup.anchor();

    egui::Area::new(egui::Id::new("place_popup"))
        .fixed_pos(egui::pos2(anchor.x, anchor.y))
        .order(egui::Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(Color32::from_rgba_unmultiplied(255, 255, 255, 242))
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .shadow(egui::epaint::Shadow {
                    offset: egui::vec2(0.0, 2.0),
                    blur: 10.0,
                    spread: 0.0,
                    color: Color32::from_black_alpha(50),
                })
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(&place.country)
                            .strong()
                            .size(14.0)
                            .color(Color32::BLACK),
                    );
                    ui.label(
                        RichText::new(format!("Timezone: {}", place.timezone))
                            .size(14.0)
                            .color(Color32::BLACK),
                    );
                    ui.label(
                        RichText::new(format!("Time: {}", place.local_time))
                            .size(14.0)
                            .color(Color32::BLACK),
                    );
                });
        });
}

pub struct HudStats<'a> {
    pub hovered: Option<GeoCoordinate>,
    pub resolver: &'a str,
    pub points: u32,
}

pub fn draw_hud(ctx: &egui::Context, stats: &HudStats<'_>) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(Color32::from_black_alpha(160))
                .rounding(4.0)
                .inner_margin(egui::Margin::same(6.0))
                .show(ui, |ui| {
                    let hovered = stats
                        .hovered
                        .map_or_else(|| "-".to_string(), |c| c.to_string());
                    ui.label(
                        RichText::new(format!(
                            "{} points | {} lookups | {}",
                            stats.points, stats.resolver, hovered
                        ))
                        .monospace()
                        .color(Color32::LIGHT_GRAY),
                    );
                });
        });
}
