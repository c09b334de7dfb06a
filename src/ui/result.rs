// src/ui/result.rs
use eframe::egui::{self, Color32, RichText};
use uom::si::mass::milligram;

use crate::analysis::scoring::{self, ScoreGrade};
use crate::config::{Locale, MealAnalysis};
use crate::state::{MealAnalysisSession, Phase, Screen, SessionState};
use super::{card, grade_color, grams, quality_badge, ImageCache, UiAction};

const PLACEHOLDER_ACTION: UiAction = UiAction::Open(Screen::Upload);

/// Which body the Result tab shows for a given session.
#[derive(Debug, PartialEq)]
pub enum ResultPane<'a> {
    Placeholder,
    Analyzing,
    Meal(&'a MealAnalysis),
}

impl<'a> ResultPane<'a> {
    pub fn for_state(state: &'a SessionState) -> Self {
        match (state.phase(), &state.current_analysis) {
            (Phase::Analyzing, _) => ResultPane::Analyzing,
            (Phase::Result, Some(meal)) => ResultPane::Meal(meal),
            _ => ResultPane::Placeholder,
        }
    }
}

pub fn show_result_view(ui: &mut egui::Ui, session: &MealAnalysisSession, images: &mut ImageCache) -> Option<UiAction> {
    match ResultPane::for_state(session.state()) {
        ResultPane::Analyzing => show_analyzing(ui, session, images),
        ResultPane::Meal(meal) => {
            let mut action = None;
            egui::ScrollArea::vertical()
                .id_source("result_scroll")
                .show(ui, |ui| {
                    action = show_meal(ui, meal, session.locale(), images);
                });
            action
        }
        ResultPane::Placeholder => show_placeholder(ui),
    }
}

fn show_placeholder(ui: &mut egui::Ui) -> Option<UiAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        ui.label(RichText::new("📊").size(48.0));
        ui.heading("No analysis yet");
        ui.label("Upload a photo of your meal to see its protein breakdown");
        ui.add_space(8.0);
        if ui.button("Upload a photo").clicked() {
            action = Some(PLACEHOLDER_ACTION);
        }
    });
    action
}

fn show_analyzing(ui: &mut egui::Ui, session: &MealAnalysisSession, images: &mut ImageCache) -> Option<UiAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        if let Some(image) = &session.state().selected_image {
            images.show(ui, &image.id, &image.data_url, egui::vec2(320.0, 240.0));
            ui.add_space(16.0);
        }
        ui.add(egui::Spinner::new().size(32.0));
        ui.heading("Analyzing your meal...");
        ui.label(RichText::new("Estimating protein content and amino acid profile").weak());
        ui.add_space(8.0);
        if ui.button("Cancel").clicked() {
            action = Some(UiAction::CancelAnalysis);
        }
    });
    action
}

fn show_meal(ui: &mut egui::Ui, meal: &MealAnalysis, locale: Locale, images: &mut ImageCache) -> Option<UiAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        images.show(ui, &meal.id, &meal.image, egui::vec2(200.0, 150.0));
        ui.vertical(|ui| {
            ui.heading(&meal.name);
            ui.add_space(4.0);
            quality_badge(ui, meal.protein_quality);
            ui.add_space(4.0);
            ui.label(format!("Limiting amino acid: {}", meal.limiting_amino_acid));
        });
    });

    ui.add_space(12.0);
    ui.columns(4, |columns| {
        macro_cell(&mut columns[0], "Protein", grams(meal.protein));
        macro_cell(&mut columns[1], "Calories", format!("{:.0} kcal", meal.calories));
        macro_cell(&mut columns[2], "Fats", grams(meal.fats));
        macro_cell(&mut columns[3], "Carbs", grams(meal.carbs));
    });

    ui.add_space(12.0);
    card(ui, |ui| {
        ui.heading("Amino acid profile");
        ui.label(RichText::new("Score against the FAO/WHO reference, 100 = ideal").weak());
        ui.add_space(4.0);
        show_score_chart(ui, meal, locale);
        ui.add_space(8.0);
        show_amino_acid_table(ui, meal, locale);
    });

    ui.add_space(12.0);
    card(ui, |ui| {
        ui.heading("Recommendations");
        for tip in scoring::recommendations(meal, locale) {
            ui.add_space(4.0);
            ui.label(RichText::new(format!("💡 {}", tip.title)).strong());
            ui.label(tip.body);
        }
    });

    ui.add_space(12.0);
    if ui.button("📷 Analyze another meal").clicked() {
        action = Some(UiAction::PickImage);
    }
    action
}

fn macro_cell(ui: &mut egui::Ui, label: &str, value: String) {
    card(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(value).size(18.0).strong());
            ui.label(RichText::new(label).weak());
        });
    });
}

fn show_score_chart(ui: &mut egui::Ui, meal: &MealAnalysis, locale: Locale) {
    let bars: Vec<egui_plot::Bar> = meal
        .amino_acids
        .iter()
        .enumerate()
        .map(|(i, aa)| {
            egui_plot::Bar::new(i as f64, aa.score)
                .name(aa.label(locale))
                .width(0.6)
                .fill(grade_color(ScoreGrade::from_score(aa.score)))
        })
        .collect();

    let reference = egui_plot::Line::new(vec![[-0.5, 100.0], [meal.amino_acids.len() as f64 - 0.5, 100.0]])
        .color(Color32::GRAY)
        .width(1.0);

    egui_plot::Plot::new("amino_acid_scores")
        .height(180.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show_background(false)
        .show_axes([false, true])
        .include_y(0.0)
        .include_y(120.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(egui_plot::BarChart::new(bars));
            plot_ui.line(reference);
        });
}

fn show_amino_acid_table(ui: &mut egui::Ui, meal: &MealAnalysis, locale: Locale) {
    egui::Grid::new("amino_acid_grid")
        .num_columns(4)
        .spacing([12.0, 6.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label(RichText::new("Amino acid").strong());
            ui.label(RichText::new("Score").strong());
            ui.label(RichText::new("In this meal").strong());
            ui.label(RichText::new("Amount / reference").strong());
            ui.end_row();

            for aa in &meal.amino_acids {
                let grade = ScoreGrade::from_score(aa.score);
                let name = if aa.essential {
                    aa.label(locale).to_string()
                } else {
                    format!("{} (non-essential)", aa.label(locale))
                };
                ui.label(name);
                ui.add(
                    egui::ProgressBar::new((aa.score / 100.0).clamp(0.0, 1.0) as f32)
                        .desired_width(140.0)
                        .fill(grade_color(grade))
                        .text(format!("{:.0}%", aa.score)),
                );
                let mass = scoring::amino_acid_mass(aa, meal.protein);
                ui.label(format!("{:.0} mg", mass.get::<milligram>()));
                ui.label(format!("{:.0} / {:.0}", aa.amount, aa.ideal_score));
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SimulatedAnalyzer;
    use crate::config::Settings;
    use crate::file::upload::tests::sample_image;
    use crate::ui::tests::render;
    use chrono::{Local, Utc};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::runtime::Handle;

    fn fresh_state() -> SessionState {
        SessionState::new(&Settings::default(), Local::now().date_naive())
    }

    fn meal() -> MealAnalysis {
        MealAnalysis::from_report(
            SimulatedAnalyzer::canned_report(Locale::En),
            sample_image().data_url,
            Utc::now(),
            Locale::En,
        )
    }

    #[test]
    fn nothing_selected_shows_the_placeholder() {
        assert_eq!(ResultPane::for_state(&fresh_state()), ResultPane::Placeholder);
        assert_eq!(PLACEHOLDER_ACTION, UiAction::Open(Screen::Upload));
    }

    #[test]
    fn pane_follows_the_session_phase() {
        let mut state = fresh_state();
        state.select_image(sample_image()).unwrap();
        assert_eq!(ResultPane::for_state(&state), ResultPane::Analyzing);

        let completed = meal();
        state.on_analysis_complete(completed.clone()).unwrap();
        assert_eq!(ResultPane::for_state(&state), ResultPane::Meal(&completed));

        state.select_image(sample_image()).unwrap();
        state.cancel_analysis().unwrap();
        assert_eq!(ResultPane::for_state(&state), ResultPane::Placeholder);
    }

    #[tokio::test]
    async fn placeholder_renders_without_an_action() {
        let analyzer = Arc::new(SimulatedAnalyzer::new(Duration::ZERO, Locale::En));
        let session = MealAnalysisSession::new(&Settings::default(), analyzer, Handle::current());
        let mut images = ImageCache::new();

        assert_eq!(render(|ui| show_result_view(ui, &session, &mut images)), None);
    }
}
