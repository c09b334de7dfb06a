// src/analysis/vision.rs
//! Vision-model backed analyzer.
//!
//! Sends the photo to an OpenAI-compatible `chat/completions` endpoint and asks
//! for a JSON nutrition report with an amino acid profile scored against the
//! FAO/WHO reference pattern.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::amino_acid::FAO_WHO_PATTERN;
use crate::config::{AnalysisReport, Locale, VisionSettings};
use crate::file::UploadedImage;
use super::analyzer::{AnalysisError, MealAnalyzer};

const USER_PROMPT: &str = "Analyze this dish and determine its protein content and amino acid profile.";

#[derive(Debug, Clone)]
pub struct VisionAnalyzer {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
    locale: Locale,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

impl VisionAnalyzer {
    pub fn new(settings: &VisionSettings, api_key: String, locale: Locale) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            locale,
        }
    }

    /// Uses the configured key, falling back to `OPENAI_API_KEY`.
    pub fn from_settings(settings: &VisionSettings, locale: Locale) -> Result<Self, AnalysisError> {
        let api_key = resolve_api_key(settings.api_key.as_deref(), std::env::var("OPENAI_API_KEY").ok())
            .ok_or(AnalysisError::MissingApiKey)?;
        Ok(Self::new(settings, api_key, locale))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body(&self, image: &UploadedImage) -> serde_json::Value {
        json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": system_prompt(self.locale)},
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": USER_PROMPT},
                        {"type": "image_url", "image_url": {"url": &image.data_url}}
                    ]
                }
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature
        })
    }
}

#[async_trait]
impl MealAnalyzer for VisionAnalyzer {
    async fn analyze(&self, image: &UploadedImage) -> Result<AnalysisReport, AnalysisError> {
        if image.base64_payload().is_empty() {
            return Err(AnalysisError::EmptyImage);
        }

        debug!("Sending {} to {} ({})", image.file_name, self.endpoint(), self.model);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(image))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Vision API error {status}: {body}");
            return Err(AnalysisError::Api { status, body });
        }

        let api_response: ApiResponse = response.json().await?;
        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AnalysisError::EmptyResponse)?;

        parse_report(&content)
    }

    fn name(&self) -> &str {
        "vision"
    }
}

pub fn resolve_api_key(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .map(str::to_string)
        .or(from_env)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// Models like to wrap JSON in markdown fences even when asked not to.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

pub fn parse_report(content: &str) -> Result<AnalysisReport, AnalysisError> {
    let json = strip_code_fences(content);
    if json.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    serde_json::from_str(json).map_err(|source| AnalysisError::MalformedResponse {
        source,
        raw: content.to_string(),
    })
}

fn system_prompt(locale: Locale) -> String {
    let language = match locale {
        Locale::En => "English",
        Locale::Ru => "Russian",
    };

    let reference = FAO_WHO_PATTERN
        .iter()
        .map(|(name, name_ru, mg)| format!("- {name}/{name_ru}: {mg} mg (essential: true)"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert nutritionist. Analyze the photo of the dish and return JSON with this structure:
{{
  "name": "dish name in {language}",
  "protein": number (grams of protein),
  "calories": number (kcal),
  "fats": number (grams of fat),
  "carbs": number (grams of carbohydrates),
  "proteinQuality": number 0-100 (protein quality),
  "limitingAminoAcid": "name of the limiting amino acid in {language}",
  "aminoAcids": [
    {{
      "name": "English name",
      "nameRu": "Russian name",
      "amount": number (mg per 100 g of protein),
      "idealScore": number (mg in the FAO/WHO reference protein),
      "score": number 0-150 (percent of the reference),
      "essential": true/false
    }}
  ]
}}

Essential amino acids and their FAO/WHO reference values (mg per 1 g of protein):
{reference}

Compute real values for this dish. Return only JSON, no comments."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::upload::tests::sample_image;

    const REPORT_JSON: &str = r#"{"name":"Tuna salad","protein":31,"calories":290,"fats":14,"carbs":9,"proteinQuality":91,"limitingAminoAcid":"Tryptophan","aminoAcids":[]}"#;

    #[test]
    fn strips_markdown_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn parses_fenced_report() {
        let content = format!("```json\n{REPORT_JSON}\n```");
        let report = parse_report(&content).unwrap();
        assert_eq!(report.name, "Tuna salad");
        assert_eq!(report.protein, 31.0);
        assert_eq!(report.limiting_amino_acid.as_deref(), Some("Tryptophan"));
    }

    #[test]
    fn malformed_report_keeps_raw_text() {
        let err = parse_report("I think this is pasta").unwrap_err();
        match err {
            AnalysisError::MalformedResponse { raw, .. } => assert_eq!(raw, "I think this is pasta"),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(parse_report("```json\n```"), Err(AnalysisError::EmptyResponse)));
    }

    #[test]
    fn api_key_resolution_prefers_configured_value() {
        assert_eq!(resolve_api_key(Some("sk-file"), Some("sk-env".into())).as_deref(), Some("sk-file"));
        assert_eq!(resolve_api_key(None, Some("sk-env".into())).as_deref(), Some("sk-env"));
        assert_eq!(resolve_api_key(Some("  "), None), None);
        assert_eq!(resolve_api_key(None, None), None);
    }

    #[test]
    fn request_carries_image_and_model_settings() {
        let settings = VisionSettings {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..VisionSettings::default()
        };
        let analyzer = VisionAnalyzer::new(&settings, "sk-test".to_string(), Locale::Ru);
        let image = sample_image();
        let body = analyzer.request_body(&image);

        assert_eq!(analyzer.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"][1]["content"][1]["image_url"]["url"], image.data_url.as_str());

        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("dish name in Russian"));
        assert!(system.contains("- Tryptophan/Триптофан: 6 mg"));
    }

    #[tokio::test]
    async fn empty_image_is_rejected_before_any_request() {
        let analyzer = VisionAnalyzer::new(&VisionSettings::default(), "sk-test".to_string(), Locale::En);
        let mut image = sample_image();
        image.data_url = "data:image/png;base64,".to_string();

        let err = analyzer.analyze(&image).await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyImage));
    }
}
