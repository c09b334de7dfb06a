// src/analysis/job.rs
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{Locale, MealAnalysis};
use crate::file::{ImageUploader, UploadError, UploadedImage};
use super::analyzer::{AnalysisError, MealAnalyzer};

#[derive(Debug)]
pub enum TaskPoll<T> {
    Pending,
    Ready(T),
    /// The task ended without reporting back (aborted or panicked).
    Lost,
}

/// A future running on the runtime whose output is collected from the UI loop.
/// Dropping the task aborts it.
#[derive(Debug)]
pub struct BackgroundTask<T> {
    receiver: oneshot::Receiver<T>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> BackgroundTask<T> {
    pub fn spawn<F>(runtime: &Handle, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let handle = runtime.spawn(async move {
            // receiver gone means nobody wants the result anymore
            let _ = sender.send(future.await);
        });

        Self { receiver, handle }
    }

    pub fn poll(&mut self) -> TaskPoll<T> {
        match self.receiver.try_recv() {
            Ok(value) => TaskPoll::Ready(value),
            Err(TryRecvError::Empty) => TaskPoll::Pending,
            Err(TryRecvError::Closed) => TaskPoll::Lost,
        }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl<T> Drop for BackgroundTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub type UploadTask = BackgroundTask<Result<UploadedImage, UploadError>>;
pub type AnalysisJob = BackgroundTask<Result<MealAnalysis, AnalysisError>>;

/// Reads and decodes the file on the blocking pool.
pub fn spawn_upload(runtime: &Handle, uploader: ImageUploader, path: PathBuf) -> UploadTask {
    BackgroundTask::spawn(runtime, async move {
        tokio::task::spawn_blocking(move || uploader.read(&path))
            .await
            .unwrap_or(Err(UploadError::Interrupted))
    })
}

pub fn spawn_analysis(
    runtime: &Handle,
    analyzer: Arc<dyn MealAnalyzer>,
    image: UploadedImage,
    limit: Duration,
    locale: Locale,
) -> AnalysisJob {
    BackgroundTask::spawn(runtime, run_analysis(analyzer, image, limit, locale))
}

pub async fn run_analysis(
    analyzer: Arc<dyn MealAnalyzer>,
    image: UploadedImage,
    limit: Duration,
    locale: Locale,
) -> Result<MealAnalysis, AnalysisError> {
    debug!("Starting {} analysis of {}", analyzer.name(), image.file_name);

    let report = match tokio::time::timeout(limit, analyzer.analyze(&image)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!("{} analysis timed out after {:?}", analyzer.name(), limit);
            return Err(AnalysisError::Timeout(limit));
        }
    };

    Ok(MealAnalysis::from_report(report, image.data_url, Utc::now(), locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::simulated::SimulatedAnalyzer;
    use crate::file::upload::tests::{png_bytes, sample_image};

    fn simulated(delay_ms: u64) -> Arc<dyn MealAnalyzer> {
        Arc::new(SimulatedAnalyzer::new(Duration::from_millis(delay_ms), Locale::En))
    }

    #[tokio::test(start_paused = true)]
    async fn job_reports_once_the_delay_has_passed() {
        let image = sample_image();
        let mut job = spawn_analysis(&Handle::current(), simulated(2500), image.clone(), Duration::from_secs(60), Locale::En);

        tokio::time::sleep(Duration::from_millis(2400)).await;
        assert!(matches!(job.poll(), TaskPoll::Pending));

        tokio::time::sleep(Duration::from_millis(200)).await;
        match job.poll() {
            TaskPoll::Ready(Ok(meal)) => {
                assert_eq!(meal.protein, 42.0);
                assert_eq!(meal.image, image.data_url);
                assert_eq!(meal.limiting_amino_acid, "Methionine");
            }
            other => panic!("expected a finished analysis, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_analyzer_times_out() {
        let result = run_analysis(simulated(5000), sample_image(), Duration::from_secs(1), Locale::En).await;
        assert!(matches!(result, Err(AnalysisError::Timeout(limit)) if limit == Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_job_is_lost() {
        let mut job = spawn_analysis(&Handle::current(), simulated(2500), sample_image(), Duration::from_secs(60), Locale::En);
        job.cancel();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(matches!(job.poll(), TaskPoll::Lost));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upload_task_decodes_off_the_ui_thread() {
        let dir = std::env::temp_dir().join(format!("protein-score-job-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bowl.png");
        std::fs::write(&path, png_bytes(5, 5)).unwrap();

        let mut task = spawn_upload(&Handle::current(), ImageUploader::new(1024 * 1024), path);
        let image = loop {
            match task.poll() {
                TaskPoll::Ready(result) => break result.unwrap(),
                TaskPoll::Pending => tokio::time::sleep(Duration::from_millis(5)).await,
                TaskPoll::Lost => panic!("upload task was lost"),
            }
        };
        assert_eq!((image.width, image.height), (5, 5));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
