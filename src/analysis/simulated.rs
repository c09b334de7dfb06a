// src/analysis/simulated.rs
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::amino_acid::reference_profile;
use crate::config::{AnalysisReport, Locale};
use crate::file::UploadedImage;
use super::analyzer::{AnalysisError, MealAnalyzer};

/// Waits a fixed delay, then reports the same grilled chicken plate for every photo.
#[derive(Debug, Clone)]
pub struct SimulatedAnalyzer {
    delay: Duration,
    locale: Locale,
}

impl SimulatedAnalyzer {
    pub fn new(delay: Duration, locale: Locale) -> Self {
        Self { delay, locale }
    }

    pub fn canned_report(locale: Locale) -> AnalysisReport {
        let (name, limiting) = match locale {
            Locale::En => ("Chicken breast with vegetables", "Methionine"),
            Locale::Ru => ("Куриная грудка с овощами", "Метионин"),
        };

        AnalysisReport {
            name: name.to_string(),
            protein: 42.0,
            calories: 385.0,
            fats: 12.0,
            carbs: 28.0,
            protein_quality: 87.0,
            limiting_amino_acid: Some(limiting.to_string()),
            amino_acids: reference_profile(),
        }
    }
}

#[async_trait]
impl MealAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, image: &UploadedImage) -> Result<AnalysisReport, AnalysisError> {
        if image.data_url.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }

        debug!("Simulating analysis of {} for {:?}", image.file_name, self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(Self::canned_report(self.locale))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
