// src/config/meal.rs
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use super::{AminoAcid, Locale};
use crate::analysis::scoring;

/// What an analyzer reports about a single dish, before it becomes part of the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub name: String,
    pub protein: f64,
    pub calories: f64,
    pub fats: f64,
    pub carbs: f64,
    pub protein_quality: f64,
    #[serde(default)]
    pub limiting_amino_acid: Option<String>,
    #[serde(default)]
    pub amino_acids: Vec<AminoAcid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealAnalysis {
    pub id: String,
    pub name: String,
    pub image: String,
    pub protein: f64,
    pub calories: f64,
    pub fats: f64,
    pub carbs: f64,
    pub timestamp: DateTime<Utc>,
    pub amino_acids: Vec<AminoAcid>,
    pub protein_quality: f64,
    pub limiting_amino_acid: String,
}

impl MealAnalysis {
    pub fn from_report(report: AnalysisReport, image: String, timestamp: DateTime<Utc>, locale: Locale) -> Self {
        let limiting_amino_acid = report
            .limiting_amino_acid
            .filter(|label| !label.trim().is_empty())
            .or_else(|| {
                scoring::limiting_amino_acid(&report.amino_acids)
                    .map(|aa| aa.label(locale).to_string())
            })
            .unwrap_or_default();

        Self {
            // v7: derived from the creation time
            id: Uuid::now_v7().to_string(),
            name: report.name,
            image,
            protein: report.protein,
            calories: report.calories,
            fats: report.fats,
            carbs: report.carbs,
            timestamp,
            amino_acids: report.amino_acids,
            protein_quality: report.protein_quality.clamp(0.0, 100.0),
            limiting_amino_acid,
        }
    }
}
