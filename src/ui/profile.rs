// src/ui/profile.rs
use chrono::Local;
use eframe::egui::{self, Color32, RichText};

use crate::config::amino_acid::FAO_WHO_PATTERN;
use crate::config::{Locale, ProfileSettings};
use crate::state::MealAnalysisSession;
use super::{card, stat_card, grams, ACCENT};

pub fn show_profile_view(ui: &mut egui::Ui, session: &MealAnalysisSession, profile: &ProfileSettings) {
    let state = session.state();

    egui::ScrollArea::vertical()
        .id_source("profile_scroll")
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                avatar(ui, &profile.initials());
                ui.vertical(|ui| {
                    ui.heading(&profile.display_name);
                    ui.label(RichText::new(&profile.tagline).weak());
                });
            });

            ui.add_space(12.0);
            card(ui, |ui| {
                ui.label(RichText::new("Daily goals").strong());
                egui::Grid::new("goals_grid")
                    .num_columns(2)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Protein");
                        ui.label(grams(state.daily.goal()));
                        ui.end_row();

                        ui.label("Calories");
                        ui.label(format!("{:.0} kcal", profile.daily_calorie_goal));
                        ui.end_row();
                    });
            });

            ui.add_space(12.0);
            ui.columns(3, |columns| {
                stat_card(&mut columns[0], "Day streak", state.streak_days(Local::now().date_naive()).to_string());
                stat_card(&mut columns[1], "Analyses", state.analysis_count().to_string());
                stat_card(&mut columns[2], "Avg. quality", state.average_quality().to_string());
            });

            ui.add_space(12.0);
            ui.heading("Knowledge base");
            egui::CollapsingHeader::new("What is protein quality?")
                .default_open(false)
                .show(ui, |ui| {
                    ui.label(
                        "Protein quality measures how well a food's amino acids match what the body needs. \
                         A score of 100 means every essential amino acid meets the reference amount.",
                    );
                });
            egui::CollapsingHeader::new("The limiting amino acid")
                .default_open(false)
                .show(ui, |ui| {
                    ui.label(
                        "The essential amino acid with the lowest score limits how much of the protein \
                         the body can use. Pairing foods with different profiles fills the gap.",
                    );
                });
            egui::CollapsingHeader::new("FAO/WHO reference pattern")
                .default_open(false)
                .show(ui, |ui| {
                    reference_table(ui, session.locale());
                });
        });
}

fn avatar(ui: &mut egui::Ui, initials: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(56.0, 56.0), egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), 28.0, ACCENT);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials,
        egui::FontId::proportional(22.0),
        Color32::WHITE,
    );
}

fn reference_table(ui: &mut egui::Ui, locale: Locale) {
    egui::Grid::new("fao_who_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for (name, name_ru, mg_per_g) in FAO_WHO_PATTERN {
                ui.label(match locale {
                    Locale::En => name,
                    Locale::Ru => name_ru,
                });
                ui.label(format!("{mg_per_g:.0} mg/g protein"));
                ui.end_row();
            }
        });
}
