use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Measurement failed: {0}")]
    Measure(String),
    #[error("Rasterization failed: {0}")]
    Raster(String),
    #[error("Expected {expected} pages, found {found}")]
    PageCount { expected: usize, found: usize },
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BookletError>;

/// Content of one logical booklet page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageContent {
    /// 1-based page number (1..=8)
    pub page_number: usize,
    /// Markdown source of the page, trimmed
    pub content: String,
}

impl PageContent {
    pub fn new(page_number: usize, content: impl Into<String>) -> Self {
        Self {
            page_number,
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Color theme of exported pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Page background as an RGB hex string
    pub fn background(self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Dark => "#1f2937",
        }
    }

    /// Body text color as an RGB hex string
    pub fn foreground(self) -> &'static str {
        match self {
            Theme::Light => "#111827",
            Theme::Dark => "#f3f4f6",
        }
    }

    /// Color of quote bars, rules and code backgrounds
    pub fn muted(self) -> &'static str {
        match self {
            Theme::Light => "#d1d5db",
            Theme::Dark => "#4b5563",
        }
    }

    /// Background behind inline code
    pub fn code_background(self) -> &'static str {
        match self {
            Theme::Light => "#e5e7eb",
            Theme::Dark => "#374151",
        }
    }

    /// Link color
    pub fn link(self) -> &'static str {
        match self {
            Theme::Light => "#2563eb",
            Theme::Dark => "#60a5fa",
        }
    }
}

/// Pad or truncate a page list to exactly `TOTAL_PAGES` entries numbered 1..=8
pub(crate) fn normalize_pages(mut pages: Vec<PageContent>) -> Vec<PageContent> {
    pages.truncate(crate::constants::TOTAL_PAGES);
    while pages.len() < crate::constants::TOTAL_PAGES {
        pages.push(PageContent::new(pages.len() + 1, ""));
    }
    for (idx, page) in pages.iter_mut().enumerate() {
        page.page_number = idx + 1;
    }
    pages
}
