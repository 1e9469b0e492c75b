use crate::constants::{DEFAULT_FILE_NAME, DEFAULT_JPEG_QUALITY, DEFAULT_PIXEL_RATIO};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted pixel ratio; an A4 sheet at 8x is already ~12k pixels wide
const MAX_PIXEL_RATIO: f32 = 8.0;

/// Booklet export configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportOptions {
    // Sheet decoration
    pub show_fold_lines: bool,
    pub highlight_cover: bool,

    // Page rendering
    pub theme: Theme,
    pub pixel_ratio: f32,
    pub jpeg_quality: u8,

    // Output
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            show_fold_lines: true,
            highlight_cover: false,
            theme: Theme::Light,
            pixel_ratio: DEFAULT_PIXEL_RATIO,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| BookletError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BookletError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.pixel_ratio > 0.0 && self.pixel_ratio <= MAX_PIXEL_RATIO) {
            return Err(BookletError::Config(format!(
                "Pixel ratio must be in (0, {}], got {}",
                MAX_PIXEL_RATIO, self.pixel_ratio
            )));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(BookletError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        if self.file_name.trim().is_empty() {
            return Err(BookletError::Config(
                "Output file name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
