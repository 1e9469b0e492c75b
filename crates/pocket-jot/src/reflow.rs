//! Content reflow across the 8 booklet pages
//!
//! Lines are added to the current page one at a time; after each addition
//! the page is rendered to print markup and measured. A line that pushes a
//! non-empty page past the height limit starts the next page instead.
//! Explicit break markers (`---`, `***`, `___`) always start a new page.
//!
//! Nested list items are kept with a nearby parent item: when an indented
//! item overflows and its parent sits within the last few lines of the
//! page, the parent and everything after it move to the next page together.

use crate::constants::{LIST_LOOKBACK_LINES, PAGE_WIDTH_PX, REFLOW_HEIGHT_PX, TOTAL_PAGES};
use crate::markdown::{LineKind, PrintMarkup, classify_line, is_break_marker};
use crate::types::{PageContent, Result, normalize_pages};

/// Reports the rendered height of page markup.
///
/// Production code measures with a real layout pass; tests inject a
/// deterministic model.
pub trait HeightMeasurer {
    /// Height in CSS pixels of `markup` laid out in a box `width_px` wide,
    /// including the page padding
    fn measure(&self, markup: &PrintMarkup, width_px: f32) -> Result<f32>;
}

impl<T: HeightMeasurer + ?Sized> HeightMeasurer for &T {
    fn measure(&self, markup: &PrintMarkup, width_px: f32) -> Result<f32> {
        (**self).measure(markup, width_px)
    }
}

/// Page box and heuristics used by reflow
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReflowConfig {
    /// Width of the measured page box
    pub page_width_px: f32,
    /// A page is full once its measured height would exceed this
    pub page_height_px: f32,
    /// How many trailing page lines are searched for a nested item's parent
    pub list_lookback: usize,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            page_width_px: PAGE_WIDTH_PX,
            page_height_px: REFLOW_HEIGHT_PX,
            list_lookback: LIST_LOOKBACK_LINES,
        }
    }
}

/// Result of a reflow, including what did not fit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflowReport {
    /// Exactly 8 pages, numbered 1..=8
    pub pages: Vec<PageContent>,
    /// Non-blank source lines that did not fit in the booklet
    pub dropped_lines: usize,
}

/// Reflows documents with a given measurer
pub struct Reflower<M> {
    measurer: M,
    config: ReflowConfig,
}

/// Pages being filled
struct PageBuilder<'t> {
    pages: Vec<PageContent>,
    pending: Vec<&'t str>,
    page_number: usize,
}

impl<'t> PageBuilder<'t> {
    fn new() -> Self {
        Self {
            pages: Vec::with_capacity(TOTAL_PAGES),
            pending: Vec::new(),
            page_number: 1,
        }
    }

    fn has_room(&self) -> bool {
        self.page_number <= TOTAL_PAGES
    }

    fn finish_page(&mut self) {
        if !self.has_room() {
            return;
        }
        let content = self.pending.join("\n").trim().to_string();
        log::debug!(
            "Page {} finished with {} lines",
            self.page_number,
            self.pending.len()
        );
        self.pages.push(PageContent::new(self.page_number, content));
        self.page_number += 1;
        self.pending.clear();
    }
}

impl<M: HeightMeasurer> Reflower<M> {
    pub fn new(measurer: M) -> Self {
        Self {
            measurer,
            config: ReflowConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReflowConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReflowConfig {
        &self.config
    }

    /// Distribute `text` over exactly 8 pages
    pub fn reflow(&self, text: &str) -> Result<Vec<PageContent>> {
        Ok(self.reflow_report(text)?.pages)
    }

    /// Reflow pages that were already split, keeping each non-empty page's
    /// boundary as an explicit break
    pub fn reflow_pages(&self, pages: &[PageContent]) -> Result<Vec<PageContent>> {
        let combined = pages
            .iter()
            .map(|page| page.content.as_str())
            .filter(|content| !content.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n---\n");
        self.reflow(&combined)
    }

    /// Reflow and report how much content was dropped
    pub fn reflow_report(&self, text: &str) -> Result<ReflowReport> {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        let mut builder = PageBuilder::new();
        let mut rest = lines.len();

        for (idx, &line) in lines.iter().enumerate() {
            let kind = classify_line(line);

            if is_break_marker(line) {
                builder.finish_page();
            } else if builder.pending.is_empty() && kind == LineKind::Blank {
                // Pages never start with blank lines
            } else if self.fits(&builder.pending, line)? || builder.pending.is_empty() {
                // The first line of a page stays even when it is too tall
                builder.pending.push(line);
            } else if let Some(start) = self.ancestor_start(&builder.pending, &kind) {
                let moved = builder.pending.split_off(start);
                builder.finish_page();
                builder.pending = moved;
                builder.pending.push(line);
            } else {
                builder.finish_page();
                if kind != LineKind::Blank {
                    builder.pending.push(line);
                }
            }

            if !builder.has_room() {
                rest = idx + 1;
                break;
            }
        }

        let dropped_lines = if builder.has_room() {
            if !builder.pending.is_empty() {
                builder.finish_page();
            }
            0
        } else {
            let unflushed = builder
                .pending
                .iter()
                .filter(|line| !line.trim().is_empty())
                .count();
            let unread = lines[rest..]
                .iter()
                .filter(|line| !line.trim().is_empty() && !is_break_marker(line))
                .count();
            unflushed + unread
        };

        if dropped_lines > 0 {
            log::debug!("{} lines did not fit in the booklet", dropped_lines);
        }

        Ok(ReflowReport {
            pages: normalize_pages(builder.pages),
            dropped_lines,
        })
    }

    /// Whether `line` still fits on the page holding `pending`
    fn fits(&self, pending: &[&str], line: &str) -> Result<bool> {
        let mut candidate = pending.join("\n");
        if !pending.is_empty() {
            candidate.push('\n');
        }
        candidate.push_str(line);

        let markup = PrintMarkup::from_markdown(&candidate);
        let height = self.measurer.measure(&markup, self.config.page_width_px)?;
        Ok(height <= self.config.page_height_px)
    }

    /// Index of the parent item that should move with an overflowing nested
    /// list item, if it is close enough to the end of the page.
    ///
    /// A parent on the first line of the page still moves, leaving that page
    /// empty.
    fn ancestor_start(&self, pending: &[&str], kind: &LineKind<'_>) -> Option<usize> {
        let indent = kind.list_indent().filter(|&indent| indent > 0)?;
        let parent = pending.iter().rposition(|line| {
            classify_line(line)
                .list_indent()
                .is_some_and(|parent_indent| parent_indent < indent)
        })?;
        (pending.len() - parent <= self.config.list_lookback).then_some(parent)
    }
}

/// Reflow `text` with the default page box
pub fn reflow<M: HeightMeasurer>(text: &str, measurer: M) -> Result<Vec<PageContent>> {
    Reflower::new(measurer).reflow(text)
}

/// Reflow already-split pages with the default page box
pub fn reflow_pages<M: HeightMeasurer>(
    pages: &[PageContent],
    measurer: M,
) -> Result<Vec<PageContent>> {
    Reflower::new(measurer).reflow_pages(pages)
}
