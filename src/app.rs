// src/app.rs
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use eframe::egui;
use tracing::{debug, warn};

use crate::analysis::MealAnalyzer;
use crate::config::Settings;
use crate::state::{MealAnalysisSession, Notification, NotificationLevel, Screen};
use crate::ui::{self, ImageCache, Toasts, UiAction};

const BUSY_REPAINT: Duration = Duration::from_millis(100);

pub struct ProteinScoreApp {
    session: MealAnalysisSession,
    settings: Settings,
    images: ImageCache,
    toasts: Toasts,
    runtime: Option<tokio::runtime::Runtime>,
}

impl ProteinScoreApp {
    pub fn new(settings: Settings, analyzer: Arc<dyn MealAnalyzer>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("protein-score-worker")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;

        let session = MealAnalysisSession::new(&settings, analyzer, runtime.handle().clone());

        Ok(Self {
            session,
            settings,
            images: ImageCache::new(),
            toasts: Toasts::new(),
            runtime: Some(runtime),
        })
    }

    fn show_tabs(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.label(egui::RichText::new("🥩 ProteinScore").strong());
            ui.separator();

            for screen in Screen::ALL {
                let active = self.session.state().active_screen == screen;
                if ui.selectable_label(active, screen.label()).clicked() {
                    self.session.switch_view(screen);
                }
            }

            if self.session.is_busy() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Cancel").clicked() {
                        self.handle_action(UiAction::CancelAnalysis);
                    }
                    ui.spinner();
                });
            }
        });
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::PickImage => {
                if self.session.is_busy() {
                    self.toasts.push(Notification::new(
                        NotificationLevel::Info,
                        "Please wait",
                        "An analysis is already running",
                    ));
                    return;
                }
                match self.session.uploader().pick() {
                    Some(path) => self.start_upload(path),
                    None => debug!("File picker dismissed"),
                }
            }
            UiAction::CancelAnalysis => {
                if let Err(e) = self.session.cancel() {
                    warn!("Cancel ignored: {e}");
                }
            }
            UiAction::Open(screen) => self.session.switch_view(screen),
        }
    }

    fn start_upload(&mut self, path: PathBuf) {
        if let Err(e) = self.session.upload(path) {
            self.toasts
                .push(Notification::new(NotificationLevel::Error, "Could not start analysis", e.to_string()));
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });

        if let Some(path) = dropped.into_iter().next() {
            self.start_upload(path);
        }
    }
}

impl eframe::App for ProteinScoreApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll();
        for notification in self.session.take_notifications() {
            self.toasts.push(notification);
        }
        self.images.retain_live(self.session.state());
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.show_tabs(ui);
        });

        egui::TopBottomPanel::top("daily_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui::header::show_daily_progress(ui, &self.session.state().daily);
            ui.add_space(4.0);
        });

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| match self.session.state().active_screen {
                Screen::Upload => ui::upload::show_upload_view(ui, &self.session, &mut self.images),
                Screen::Result => ui::result::show_result_view(ui, &self.session, &mut self.images),
                Screen::History => ui::history::show_history_view(ui, &self.session, &mut self.images),
                Screen::Profile => {
                    ui::profile::show_profile_view(ui, &self.session, &self.settings.profile);
                    None
                }
            })
            .inner;

        if let Some(action) = action {
            self.handle_action(action);
        }

        self.toasts.show(ctx);

        if self.session.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}

impl Drop for ProteinScoreApp {
    fn drop(&mut self) {
        // workers may be parked in a timer or an HTTP request; don't wait for them
        if let Some(runtime) = self.runtime.take() {
            debug!("Shutting down runtime");
            runtime.shutdown_background();
        }
    }
}
