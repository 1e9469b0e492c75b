//! Shared constants for the pocket booklet
//!
//! This module centralizes the sheet geometry, the CSS-pixel page box used
//! for measuring and rasterizing pages, and the typography of the print
//! renderer.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Sheet Geometry
// =============================================================================

/// Number of pages in a pocket booklet
pub const TOTAL_PAGES: usize = 8;

/// Grid columns on the sheet
pub const GRID_COLS: usize = 4;

/// Grid rows on the sheet
pub const GRID_ROWS: usize = 2;

/// A4 landscape width in mm
pub const SHEET_WIDTH_MM: f32 = 297.0;

/// A4 landscape height in mm
pub const SHEET_HEIGHT_MM: f32 = 210.0;

/// Width of one booklet page (74.25mm)
pub const PAGE_WIDTH_MM: f32 = SHEET_WIDTH_MM / GRID_COLS as f32;

/// Height of one booklet page (105mm)
pub const PAGE_HEIGHT_MM: f32 = SHEET_HEIGHT_MM / GRID_ROWS as f32;

// =============================================================================
// Page Box (CSS pixels, roughly 3px per mm)
// =============================================================================

/// Page width in CSS pixels (74mm * 3)
pub const PAGE_WIDTH_PX: f32 = 222.0;

/// Rendered page height in CSS pixels (105mm * 3)
pub const PAGE_HEIGHT_PX: f32 = 315.0;

/// Height limit used by reflow; lower than the rendered height so the last
/// line never clips at the bottom of the printed page
pub const REFLOW_HEIGHT_PX: f32 = 260.0;

/// Inner padding of a page
pub const PAGE_PADDING_PX: f32 = 12.0;

/// Default device pixel ratio for rasterized pages
pub const DEFAULT_PIXEL_RATIO: f32 = 2.0;

/// Ancestor lookback window for keeping nested list items with their parent
pub const LIST_LOOKBACK_LINES: usize = 3;

// =============================================================================
// Typography
// =============================================================================

/// Base font size in CSS pixels
pub const BASE_FONT_SIZE: f32 = 10.0;

/// Line height multiplier
pub const LINE_HEIGHT: f32 = 1.4;

/// Font size of inline code
pub const CODE_FONT_SIZE: f32 = 9.0;

/// Heading font sizes for levels 1..=3
pub const HEADING_FONT_SIZES: [f32; 3] = [14.0, 12.0, 11.0];

/// Heading bottom margins for levels 1..=3
pub const HEADING_MARGINS: [f32; 3] = [8.0, 6.0, 4.0];

/// Bottom margin of paragraphs and lists
pub const BLOCK_MARGIN: f32 = 8.0;

/// Left padding of a list level
pub const LIST_INDENT: f32 = 16.0;

/// Bottom margin of a list item
pub const LIST_ITEM_MARGIN: f32 = 2.0;

/// Vertical margin around blockquotes
pub const QUOTE_MARGIN: f32 = 4.0;

/// Blockquote bar width plus its padding
pub const QUOTE_INDENT: f32 = 10.0;

/// Vertical margin around horizontal rules
pub const RULE_MARGIN: f32 = 8.0;

/// Approximate character width ratio for a regular sans-serif face
pub const SANS_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Approximate character width ratio for bold sans-serif
pub const BOLD_CHAR_WIDTH_RATIO: f32 = 0.55;

/// Approximate character width ratio for monospace
pub const MONO_CHAR_WIDTH_RATIO: f32 = 0.6;

/// Width of the cover frame (two 1px strokes and the gap between them)
pub const COVER_FRAME_WIDTH: f32 = 2.0;

/// Padding inside the cover frame
pub const COVER_FRAME_PADDING: f32 = 4.0;

// =============================================================================
// Printer's Marks
// =============================================================================

/// Line width for fold guides (mm)
pub const FOLD_LINE_WIDTH_MM: f32 = 0.3;

/// Dash and gap length for fold guides (mm)
pub const FOLD_LINE_DASH_MM: f32 = 2.0;

/// Gray level for fold guides (0.0 black, 1.0 white)
pub const FOLD_LINE_GRAY: f32 = 200.0 / 255.0;

// =============================================================================
// Output
// =============================================================================

/// Default output file name
pub const DEFAULT_FILE_NAME: &str = "pocket-jot.pdf";

/// Default JPEG quality for embedded page images
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Document title written to the PDF info dictionary
pub const DOCUMENT_TITLE: &str = "Pocket Jot";

/// Starter document written by `pjot init`
pub const DEFAULT_CONTENT: &str = "# My Pocket Book

Welcome to Pocket Jot!

---

## Page 2

Write your content here...

---

## Page 3

Use **bold** and *italic* text.

---

## Page 4

- List item 1
- List item 2
- List item 3

---

## Page 5

> Quotes look great too!

---

## Page 6

`Inline code` works too.

---

## Page 7

Almost done...

---

## Page 8

The End!
";
