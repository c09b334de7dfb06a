// src/ui/upload.rs
use eframe::egui::{self, RichText};

use crate::state::{MealAnalysisSession, Phase, Screen};
use super::{card, stat_card, grams, ImageCache, UiAction};

pub fn show_upload_view(ui: &mut egui::Ui, session: &MealAnalysisSession, images: &mut ImageCache) -> Option<UiAction> {
    let mut action = None;
    let state = session.state();

    ui.vertical_centered(|ui| {
        ui.add_space(16.0);
        ui.heading("Analyze your meal");
        ui.label("Take a photo of your plate and get its protein breakdown");
        ui.add_space(16.0);

        card(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.label(RichText::new("📷").size(48.0));
                ui.add_space(8.0);

                if session.is_reading_image() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Reading photo...");
                    });
                } else if state.phase() == Phase::Analyzing {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Analyzing your meal...");
                    });
                    if ui.link("Show progress").clicked() {
                        action = Some(UiAction::Open(Screen::Result));
                    }
                } else {
                    let button = egui::Button::new(RichText::new("Choose photo").size(16.0))
                        .min_size(egui::vec2(160.0, 36.0));
                    if ui.add(button).clicked() {
                        action = Some(UiAction::PickImage);
                    }
                    ui.label(RichText::new("or drop an image onto the window").weak());
                }
                ui.add_space(24.0);
            });
        });
    });

    if let Some(image) = &state.selected_image {
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            images.show(ui, &image.id, &image.data_url, egui::vec2(96.0, 96.0));
            ui.vertical(|ui| {
                ui.label(RichText::new(&image.file_name).strong());
                ui.label(format!("{}×{} · {}", image.width, image.height, image.mime));
            });
        });
    }

    ui.add_space(16.0);
    ui.label(RichText::new("Quick stats").strong());
    ui.columns(3, |columns| {
        stat_card(&mut columns[0], "Analyses", state.analysis_count().to_string());
        stat_card(&mut columns[1], "Avg. quality", state.average_quality().to_string());
        stat_card(&mut columns[2], "Protein today", grams(state.daily.total()));
    });

    action
}
