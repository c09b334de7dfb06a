// src/analysis/analyzer.rs
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{AnalysisReport, AnalyzerKind, Settings};
use crate::file::UploadedImage;
use super::simulated::SimulatedAnalyzer;
use super::vision::VisionAnalyzer;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Image is required")]
    EmptyImage,

    #[error("No API key configured for the vision analyzer")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analyzer returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Analyzer returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse analyzer response: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error("Analysis was interrupted")]
    Interrupted,
}

/// Turns a photo of a dish into a nutrition report.
#[async_trait]
pub trait MealAnalyzer: Send + Sync {
    async fn analyze(&self, image: &UploadedImage) -> Result<AnalysisReport, AnalysisError>;

    fn name(&self) -> &str;
}

pub fn build_analyzer(settings: &Settings) -> Result<Arc<dyn MealAnalyzer>, AnalysisError> {
    let analyzer: Arc<dyn MealAnalyzer> = match settings.analyzer {
        AnalyzerKind::Simulated => Arc::new(SimulatedAnalyzer::new(settings.simulated_delay(), settings.locale)),
        AnalyzerKind::Vision => Arc::new(VisionAnalyzer::from_settings(&settings.vision, settings.locale)?),
    };

    info!("Using {} analyzer", analyzer.name());
    Ok(analyzer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_simulated_analyzer_by_default() {
        let analyzer = build_analyzer(&Settings::default()).unwrap();
        assert_eq!(analyzer.name(), "simulated");
    }

    #[test]
    fn builds_vision_analyzer_when_key_is_configured() {
        let mut settings = Settings::default();
        settings.analyzer = AnalyzerKind::Vision;
        settings.vision.api_key = Some("sk-test".to_string());

        let analyzer = build_analyzer(&settings).unwrap();
        assert_eq!(analyzer.name(), "vision");
    }
}
