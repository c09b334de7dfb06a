// src/ui/mod.rs
use eframe::egui::{self, Color32, RichText};

use crate::analysis::{QualityLabel, ScoreGrade};
use crate::state::Screen;

pub mod header;
pub mod history;
pub mod images;
pub mod notifications;
pub mod profile;
pub mod result;
pub mod upload;

pub use images::ImageCache;
pub use notifications::Toasts;

/// Things a view asks the app to do once the frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    PickImage,
    CancelAnalysis,
    Open(Screen),
}

pub const ACCENT: Color32 = Color32::from_rgb(76, 175, 80);
pub const WARNING: Color32 = Color32::from_rgb(255, 167, 38);
pub const DANGER: Color32 = Color32::from_rgb(229, 83, 75);

pub fn grade_color(grade: ScoreGrade) -> Color32 {
    match grade {
        ScoreGrade::Good => ACCENT,
        ScoreGrade::Fair => WARNING,
        ScoreGrade::Low => DANGER,
    }
}

pub fn quality_color(label: QualityLabel) -> Color32 {
    match label {
        QualityLabel::Excellent => ACCENT,
        QualityLabel::Good => Color32::from_rgb(100, 150, 255),
        QualityLabel::Average => WARNING,
    }
}

/// Rounded pill with the quality label, e.g. "87 · Good".
pub fn quality_badge(ui: &mut egui::Ui, quality: f64) {
    let label = QualityLabel::from_quality(quality);
    egui::Frame::default()
        .fill(quality_color(label))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .rounding(10.0)
        .show(ui, |ui| {
            ui.label(
                RichText::new(format!("{:.0} · {}", quality, label.text()))
                    .color(Color32::WHITE)
                    .strong(),
            );
        });
}

pub fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .inner_margin(12.0)
        .rounding(6.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

pub fn stat_card(ui: &mut egui::Ui, label: &str, value: String) {
    card(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(value).size(22.0).strong());
            ui.label(RichText::new(label).weak());
        });
    });
}

pub fn grams(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0} g")
    } else {
        format!("{value:.1} g")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Runs one headless frame with `view` inside a central panel.
    pub(crate) fn render(view: impl FnOnce(&mut egui::Ui) -> Option<UiAction>) -> Option<UiAction> {
        let ctx = egui::Context::default();
        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = view(ui);
            });
        });
        action
    }

    #[test]
    fn grams_drop_trailing_zero_decimals() {
        assert_eq!(grams(42.0), "42 g");
        assert_eq!(grams(18.5), "18.5 g");
        assert_eq!(grams(33.333), "33.3 g");
    }
}
