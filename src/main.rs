// src/main.rs
use eframe::egui;
use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod analysis;
mod app;
mod config;
mod file;
mod state;
mod ui;

use analysis::{build_analyzer, MealAnalyzer, SimulatedAnalyzer};
use app::ProteinScoreApp;
use crate::config::Settings;
use file::SettingsFileHandler;
use std::sync::Arc;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("protein_score=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_settings() -> Settings {
    match SettingsFileHandler::new().load_or_init(Settings::default_path().as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Falling back to default settings: {e:#}");
            Settings::default()
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let settings = load_settings();
    let analyzer: Arc<dyn MealAnalyzer> = match build_analyzer(&settings) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            warn!("{e}, using the simulated analyzer instead");
            Arc::new(SimulatedAnalyzer::new(settings.simulated_delay(), settings.locale))
        }
    };

    let app = ProteinScoreApp::new(settings, analyzer)?;
    info!("Starting ProteinScore");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("ProteinScore"),
        ..Default::default()
    };

    eframe::run_native(
        "ProteinScore",
        options,
        Box::new(move |_cc| Box::new(app)),
    ).map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
