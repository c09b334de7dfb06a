// src/file/mod.rs
use anyhow::Result;
use std::path::Path;

pub mod settings;
pub mod upload;

pub use settings::SettingsFileHandler;
pub use upload::{ImageUploader, UploadError, UploadedImage};

// Core trait for file operations
pub trait FileHandler<T> {
    fn load(&self, path: &Path) -> Result<T>;
    fn save(&self, data: &T, path: &Path) -> Result<()>;
}
