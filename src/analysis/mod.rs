// src/analysis/mod.rs
pub mod analyzer;
pub mod job;
pub mod scoring;
pub mod simulated;
pub mod vision;

// Re-export commonly used types
pub use analyzer::{build_analyzer, AnalysisError, MealAnalyzer};
pub use job::{AnalysisJob, TaskPoll, UploadTask};
pub use scoring::{QualityLabel, ScoreGrade};
pub use simulated::SimulatedAnalyzer;
