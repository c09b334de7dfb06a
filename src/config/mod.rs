// src/config/mod.rs
pub mod amino_acid;
pub mod meal;
pub mod settings;

// Re-export commonly used types
pub use amino_acid::AminoAcid;
pub use meal::{AnalysisReport, MealAnalysis};
pub use settings::{AnalyzerKind, Locale, ProfileSettings, Settings, VisionSettings};
