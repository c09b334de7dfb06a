// src/state/session.rs
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::analysis::job::{spawn_analysis, spawn_upload};
use crate::analysis::{scoring, AnalysisError, AnalysisJob, MealAnalyzer, TaskPoll, UploadTask};
use crate::config::{Locale, MealAnalysis, Settings};
use crate::file::{ImageUploader, UploadError, UploadedImage};
use super::{DailyProtein, Notification, NotificationLevel, Phase, Screen};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("An analysis is already running")]
    AnalysisInProgress,

    #[error("No analysis is running")]
    NoAnalysisInFlight,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Everything one user session knows. Mutated only through the transitions below.
#[derive(Debug)]
pub struct SessionState {
    pub selected_image: Option<UploadedImage>,
    pub current_analysis: Option<MealAnalysis>,
    pub daily: DailyProtein,
    pub active_screen: Screen,
    history: Vec<MealAnalysis>,
    phase: Phase,
    notifications: VecDeque<Notification>,
}

impl SessionState {
    pub fn new(settings: &Settings, today: NaiveDate) -> Self {
        Self {
            selected_image: None,
            current_analysis: None,
            daily: DailyProtein::new(
                settings.daily_protein_seed,
                settings.daily_protein_goal,
                settings.reset_daily_total,
                today,
            ),
            active_screen: Screen::Upload,
            history: Vec::new(),
            phase: Phase::Idle,
            notifications: VecDeque::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Newest first.
    pub fn history(&self) -> &[MealAnalysis] {
        &self.history
    }

    pub fn select_image(&mut self, image: UploadedImage) -> Result<(), SessionError> {
        if self.phase == Phase::Analyzing {
            return Err(SessionError::AnalysisInProgress);
        }

        self.selected_image = Some(image);
        self.current_analysis = None;
        self.phase = Phase::Analyzing;
        self.active_screen = Screen::Result;
        Ok(())
    }

    pub fn on_analysis_complete(&mut self, result: MealAnalysis) -> Result<(), SessionError> {
        self.on_analysis_complete_on(result, today())
    }

    pub fn on_analysis_complete_on(&mut self, result: MealAnalysis, today: NaiveDate) -> Result<(), SessionError> {
        if self.phase != Phase::Analyzing {
            return Err(SessionError::NoAnalysisInFlight);
        }

        self.daily.add(result.protein, today);
        self.notify(
            NotificationLevel::Success,
            "Analysis complete!",
            format!("Found {}g of protein in the dish", result.protein),
        );
        self.history.insert(0, result.clone());
        self.current_analysis = Some(result);
        self.phase = Phase::Result;
        Ok(())
    }

    pub fn on_analysis_failed(&mut self, error: &AnalysisError) {
        self.reset_to_idle();
        self.notify(NotificationLevel::Error, "Analysis failed", error.to_string());
    }

    pub fn on_upload_failed(&mut self, error: &UploadError) {
        self.reset_to_idle();
        self.notify(NotificationLevel::Error, "Could not use this photo", error.to_string());
    }

    pub fn cancel_analysis(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Analyzing {
            return Err(SessionError::NoAnalysisInFlight);
        }
        self.reset_to_idle();
        self.notify(NotificationLevel::Info, "Analysis cancelled", "");
        Ok(())
    }

    pub fn switch_view(&mut self, screen: Screen) {
        self.active_screen = screen;
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn analysis_count(&self) -> usize {
        self.history.len()
    }

    pub fn average_quality(&self) -> u32 {
        scoring::average_quality(&self.history)
    }

    pub fn streak_days(&self, today: NaiveDate) -> u32 {
        scoring::streak_days(&self.history, today)
    }

    fn reset_to_idle(&mut self) {
        self.selected_image = None;
        self.current_analysis = None;
        self.phase = Phase::Idle;
    }

    fn notify(&mut self, level: NotificationLevel, title: &str, message: impl Into<String>) {
        self.notifications.push_back(Notification::new(level, title, message));
    }
}

/// Owns the session state plus the background work feeding it.
/// Dropping the session aborts whatever is still running.
pub struct MealAnalysisSession {
    state: SessionState,
    runtime: Handle,
    analyzer: Arc<dyn MealAnalyzer>,
    uploader: ImageUploader,
    timeout: Duration,
    locale: Locale,
    upload: Option<UploadTask>,
    job: Option<AnalysisJob>,
}

impl MealAnalysisSession {
    pub fn new(settings: &Settings, analyzer: Arc<dyn MealAnalyzer>, runtime: Handle) -> Self {
        info!(
            "Starting session (seed {}g, goal {}g, {} analyzer)",
            settings.daily_protein_seed,
            settings.daily_protein_goal,
            analyzer.name()
        );

        Self {
            state: SessionState::new(settings, today()),
            runtime,
            analyzer,
            uploader: ImageUploader::new(settings.max_upload_bytes),
            timeout: settings.analysis_timeout(),
            locale: settings.locale,
            upload: None,
            job: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn uploader(&self) -> &ImageUploader {
        &self.uploader
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_busy(&self) -> bool {
        self.upload.is_some() || self.job.is_some()
    }

    pub fn is_reading_image(&self) -> bool {
        self.upload.is_some()
    }

    pub fn switch_view(&mut self, screen: Screen) {
        self.state.switch_view(screen);
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.state.take_notifications()
    }

    /// Reads the file in the background; analysis starts once it decodes.
    pub fn upload(&mut self, path: PathBuf) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::AnalysisInProgress);
        }

        info!("Reading {}", path.display());
        self.upload = Some(spawn_upload(&self.runtime, self.uploader.clone(), path));
        Ok(())
    }

    pub fn select_image(&mut self, image: UploadedImage) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::AnalysisInProgress);
        }
        self.start_analysis(image)
    }

    fn start_analysis(&mut self, image: UploadedImage) -> Result<(), SessionError> {
        self.state.select_image(image.clone())?;
        self.job = Some(spawn_analysis(
            &self.runtime,
            Arc::clone(&self.analyzer),
            image,
            self.timeout,
            self.locale,
        ));
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        let was_reading = self.upload.take().is_some();
        match self.job.take() {
            Some(job) => {
                job.cancel();
                self.state.cancel_analysis()
            }
            None if was_reading => Ok(()),
            None => Err(SessionError::NoAnalysisInFlight),
        }
    }

    /// Collects finished background work. Call once per frame.
    pub fn poll(&mut self) {
        self.state.daily.roll_over(today());

        let upload = match self.upload.as_mut() {
            Some(task) => task.poll(),
            None => TaskPoll::Pending,
        };
        match upload {
            TaskPoll::Pending => {}
            TaskPoll::Ready(Ok(image)) => {
                self.upload = None;
                let file_name = image.file_name.clone();
                if let Err(e) = self.start_analysis(image) {
                    warn!("Dropping decoded image {file_name}: {e}");
                    self.state.notify(
                        NotificationLevel::Error,
                        "Photo was not analyzed",
                        format!("{file_name}: {e}"),
                    );
                }
            }
            TaskPoll::Ready(Err(e)) => {
                self.upload = None;
                warn!("Upload failed: {e}");
                self.state.on_upload_failed(&e);
            }
            TaskPoll::Lost => {
                self.upload = None;
                self.state.on_upload_failed(&UploadError::Interrupted);
            }
        }

        let analysis = match self.job.as_mut() {
            Some(job) => job.poll(),
            None => TaskPoll::Pending,
        };
        match analysis {
            TaskPoll::Pending => {}
            TaskPoll::Ready(Ok(meal)) => {
                self.job = None;
                info!("Analysis finished: {} ({}g protein)", meal.name, meal.protein);
                if let Err(e) = self.state.on_analysis_complete(meal) {
                    warn!("Discarding analysis result: {e}");
                }
            }
            TaskPoll::Ready(Err(e)) => {
                self.job = None;
                warn!("Analysis failed: {e}");
                self.state.on_analysis_failed(&e);
            }
            TaskPoll::Lost => {
                self.job = None;
                self.state.on_analysis_failed(&AnalysisError::Interrupted);
            }
        }
    }
}

impl Drop for MealAnalysisSession {
    fn drop(&mut self) {
        info!("Ending session after {} analyses", self.state.analysis_count());
    }
}
