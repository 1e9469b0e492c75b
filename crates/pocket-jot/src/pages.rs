//! Separator-based page splitting
//!
//! Splits a document into the 8 booklet pages on explicit separator lines.
//! A separator only counts when it is the whole line.

use crate::constants::TOTAL_PAGES;
use crate::types::{PageContent, normalize_pages};

/// Lines that split a document into pages
pub const SEPARATORS: [&str; 3] = ["---", "<!-- page -->", "<!-- PAGE -->"];

/// Separator written by [`combine_pages`]
const JOIN_SEPARATOR: &str = "\n\n---\n\n";

fn is_separator(line: &str) -> bool {
    let line = line.strip_suffix('\r').unwrap_or(line);
    SEPARATORS.contains(&line)
}

/// Split text into trimmed segments on separator lines
fn segments(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if is_separator(line) {
            segments.push(current.join("\n").trim().to_string());
            current.clear();
        } else {
            current.push(line);
        }
    }
    segments.push(current.join("\n").trim().to_string());

    segments
}

/// Parse a document into exactly 8 pages.
///
/// Segments past the 8th are discarded; missing pages are empty.
pub fn parse_into_pages(text: &str) -> Vec<PageContent> {
    let pages = segments(text)
        .into_iter()
        .take(TOTAL_PAGES)
        .enumerate()
        .map(|(idx, content)| PageContent::new(idx + 1, content))
        .collect();
    normalize_pages(pages)
}

/// Join pages back into a single document
pub fn combine_pages(pages: &[PageContent]) -> String {
    pages
        .iter()
        .map(|page| page.content.as_str())
        .collect::<Vec<_>>()
        .join(JOIN_SEPARATOR)
}

/// Replace the content of one page and return the recombined document.
///
/// `page_number` is 1-based; out-of-range numbers leave the pages unchanged
/// (the document is still normalized through parse and combine).
pub fn update_page(text: &str, page_number: usize, new_content: &str) -> String {
    let mut pages = parse_into_pages(text);

    if (1..=TOTAL_PAGES).contains(&page_number) {
        pages[page_number - 1].content = new_content.to_string();
    }

    combine_pages(&pages)
}

/// Count non-empty segments that [`parse_into_pages`] drops
pub fn overflow_sections(text: &str) -> usize {
    segments(text)
        .iter()
        .skip(TOTAL_PAGES)
        .filter(|segment| !segment.is_empty())
        .count()
}
