// src/ui/history.rs
use chrono::Local;
use eframe::egui::{self, RichText};

use crate::config::MealAnalysis;
use crate::state::{MealAnalysisSession, Screen, SessionState};
use super::{card, grams, quality_badge, ImageCache, UiAction};

const EMPTY_STATE_ACTION: UiAction = UiAction::Open(Screen::Upload);

#[derive(Debug, PartialEq)]
pub enum HistoryPane<'a> {
    Empty,
    Meals(&'a [MealAnalysis]),
}

impl<'a> HistoryPane<'a> {
    pub fn for_state(state: &'a SessionState) -> Self {
        match state.history() {
            [] => HistoryPane::Empty,
            meals => HistoryPane::Meals(meals),
        }
    }
}

pub fn show_history_view(ui: &mut egui::Ui, session: &MealAnalysisSession, images: &mut ImageCache) -> Option<UiAction> {
    let mut action = None;

    let HistoryPane::Meals(history) = HistoryPane::for_state(session.state()) else {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.label(RichText::new("🕘").size(48.0));
            ui.heading("No history yet");
            ui.label("Your analyzed meals will show up here");
            ui.add_space(8.0);
            if ui.button("Analyze a meal").clicked() {
                action = Some(EMPTY_STATE_ACTION);
            }
        });
        return action;
    };

    ui.heading(format!("History ({})", history.len()));
    ui.add_space(8.0);

    egui::ScrollArea::vertical()
        .id_source("history_scroll")
        .show(ui, |ui| {
            for meal in history {
                card(ui, |ui| {
                    ui.horizontal(|ui| {
                        images.show(ui, &meal.id, &meal.image, egui::vec2(64.0, 64.0));
                        ui.vertical(|ui| {
                            ui.label(RichText::new(&meal.name).strong());
                            ui.label(
                                RichText::new(meal.timestamp.with_timezone(&Local).format("%b %d, %H:%M").to_string())
                                    .weak(),
                            );
                            ui.label(format!(
                                "{} protein · {:.0} kcal",
                                grams(meal.protein),
                                meal.calories
                            ));
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            quality_badge(ui, meal.protein_quality);
                        });
                    });
                });
                ui.add_space(4.0);
            }
        });

    action
}
