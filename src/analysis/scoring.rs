// src/analysis/scoring.rs
use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use uom::si::f64::Mass;
use uom::si::mass::milligram;

use crate::config::{AminoAcid, Locale, MealAnalysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGrade {
    Good,
    Fair,
    Low,
}

impl ScoreGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            ScoreGrade::Good
        } else if score >= 80.0 {
            ScoreGrade::Fair
        } else {
            ScoreGrade::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityLabel {
    Excellent,
    Good,
    Average,
}

impl QualityLabel {
    pub fn from_quality(quality: f64) -> Self {
        if quality >= 90.0 {
            QualityLabel::Excellent
        } else if quality >= 75.0 {
            QualityLabel::Good
        } else {
            QualityLabel::Average
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            QualityLabel::Excellent => "Excellent",
            QualityLabel::Good => "Good",
            QualityLabel::Average => "Average",
        }
    }
}

/// The essential amino acid with the lowest score. Ties go to the first one listed.
pub fn limiting_amino_acid(amino_acids: &[AminoAcid]) -> Option<&AminoAcid> {
    amino_acids
        .iter()
        .filter(|aa| aa.essential)
        .min_by(|a, b| a.score.total_cmp(&b.score))
}

/// Whole percent of the goal reached, rounded down so a goal never reads as met early.
pub fn progress_percent(total: f64, goal: f64) -> u32 {
    if goal <= 0.0 || total <= 0.0 {
        return 0;
    }
    (total / goal * 100.0).floor() as u32
}

pub fn progress_fraction(total: f64, goal: f64) -> f32 {
    if goal <= 0.0 {
        return 0.0;
    }
    (total / goal).clamp(0.0, 1.0) as f32
}

pub fn remaining(total: f64, goal: f64) -> f64 {
    (goal - total).max(0.0)
}

pub fn average_quality(history: &[MealAnalysis]) -> u32 {
    if history.is_empty() {
        return 0;
    }
    let sum: f64 = history.iter().map(|meal| meal.protein_quality).sum();
    (sum / history.len() as f64).round() as u32
}

/// How much of an amino acid a meal actually delivers, given its protein grams.
pub fn amino_acid_mass(amino_acid: &AminoAcid, protein_grams: f64) -> Mass {
    Mass::new::<milligram>(amino_acid.amount * protein_grams / 100.0)
}

/// Consecutive local days, ending today, with at least one analysis.
pub fn streak_days(history: &[MealAnalysis], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = history
        .iter()
        .map(|meal| meal.timestamp.with_timezone(&Local).date_naive())
        .collect();

    let mut streak = 0;
    let mut day = today;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub body: String,
}

impl Recommendation {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

const LOW_SCORE_THRESHOLD: f64 = 80.0;

/// Foods rich in the amino acid, looked up by its English name.
fn food_sources(name: &str, locale: Locale) -> &'static str {
    match (name, locale) {
        ("Leucine", Locale::En) => "dairy, beef, soy",
        ("Leucine", Locale::Ru) => "молочные продукты, говядину, сою",
        ("Isoleucine", Locale::En) => "eggs, chicken, lentils",
        ("Isoleucine", Locale::Ru) => "яйца, курицу, чечевицу",
        ("Valine", Locale::En) => "cheese, mushrooms, peanuts",
        ("Valine", Locale::Ru) => "сыр, грибы, арахис",
        ("Lysine", Locale::En) => "legumes, dairy, meat",
        ("Lysine", Locale::Ru) => "бобовые, молочные продукты, мясо",
        ("Methionine", Locale::En) => "eggs, fish, sesame seeds",
        ("Methionine", Locale::Ru) => "яйца, рыбу, кунжут",
        ("Threonine", Locale::En) => "cottage cheese, lentils, pork",
        ("Threonine", Locale::Ru) => "творог, чечевицу, свинину",
        ("Phenylalanine", Locale::En) => "soy, nuts, eggs",
        ("Phenylalanine", Locale::Ru) => "сою, орехи, яйца",
        ("Tryptophan", Locale::En) => "turkey, oats, milk",
        ("Tryptophan", Locale::Ru) => "индейку, овсянку, молоко",
        (_, Locale::En) => "a wider range of protein foods",
        (_, Locale::Ru) => "более разнообразные белковые продукты",
    }
}

/// Tips for the meal, written in `locale` along with the amino acid names.
pub fn recommendations(meal: &MealAnalysis, locale: Locale) -> Vec<Recommendation> {
    let mut tips: Vec<Recommendation> = meal
        .amino_acids
        .iter()
        .filter(|aa| aa.essential && aa.score < LOW_SCORE_THRESHOLD)
        .map(|aa| {
            let label = aa.label(locale);
            let sources = food_sources(&aa.name, locale);
            match locale {
                Locale::En => Recommendation::new(
                    format!("Boost {label}"),
                    format!("{label} covers only {:.0}% of the reference. Try {sources}.", aa.score),
                ),
                Locale::Ru => Recommendation::new(
                    format!("Больше: {label}"),
                    format!("{label} покрывает лишь {:.0}% нормы. Добавьте {sources}.", aa.score),
                ),
            }
        })
        .collect();

    let limiting = &meal.limiting_amino_acid;
    match locale {
        Locale::En => {
            tips.push(Recommendation::new(
                format!("Improve {limiting}"),
                "Add eggs, cottage cheese or fish for a complete amino acid profile",
            ));
            tips.push(Recommendation::new(
                "Lysine matters",
                "Lysine is important for growth, tissue repair and immunity",
            ));
            tips.push(Recommendation::new(
                "Branched-chain amino acids",
                "Leucine, isoleucine and valine support muscle protein synthesis",
            ));
        }
        Locale::Ru => {
            tips.push(Recommendation::new(
                format!("Улучшите: {limiting}"),
                "Добавьте яйца, творог или рыбу для полного аминокислотного профиля",
            ));
            tips.push(Recommendation::new(
                "Лизин важен",
                "Лизин нужен для роста, восстановления тканей и иммунитета",
            ));
            tips.push(Recommendation::new(
                "Аминокислоты с разветвлённой цепью",
                "Лейцин, изолейцин и валин поддерживают синтез мышечного белка",
            ));
        }
    }
    tips
}
