// src/ui/header.rs
use eframe::egui::{self, RichText};

use crate::state::DailyProtein;
use super::{grams, ACCENT};

pub fn show_daily_progress(ui: &mut egui::Ui, daily: &DailyProtein) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Today's protein").strong());
        ui.label(format!("{} / {}", grams(daily.total()), grams(daily.goal())));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let remaining = daily.remaining();
            if remaining > 0.0 {
                ui.label(RichText::new(format!("{} to go", grams(remaining))).weak());
            } else {
                ui.label(RichText::new("🎉 Goal reached").color(ACCENT));
            }

            ui.add(
                egui::ProgressBar::new(daily.progress_fraction())
                    .desired_width(ui.available_width() - 8.0)
                    .fill(ACCENT)
                    .text(format!("{}%", daily.progress_percent())),
            );
        });
    });
}
