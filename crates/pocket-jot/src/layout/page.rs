//! Page box layout
//!
//! Lays print markup out in a fixed-width page box using a simple block
//! model: vertical margins collapse and text wraps greedily at whitespace.
//! Text widths come from a [`TextMetrics`] source, normally the glyph
//! advances of the faces the rasterizer draws with. The same layout is used
//! for measuring and for drawing a page.

use std::sync::Arc;

use resvg::usvg::fontdb::Database;

use crate::constants::{
    BASE_FONT_SIZE, BLOCK_MARGIN, CODE_FONT_SIZE, COVER_FRAME_PADDING, COVER_FRAME_WIDTH,
    HEADING_FONT_SIZES, HEADING_MARGINS, LINE_HEIGHT, LIST_INDENT, LIST_ITEM_MARGIN,
    PAGE_HEIGHT_PX, PAGE_PADDING_PX, PAGE_WIDTH_PX, QUOTE_INDENT, QUOTE_MARGIN, RULE_MARGIN,
};
use crate::markdown::{Block, Inline, List, PrintMarkup};
use crate::reflow::HeightMeasurer;
use crate::types::{BookletError, Result};

use super::{ApproximateMetrics, FontMetrics, TextMetrics};

/// Gap between a list marker and the item text
const MARKER_GAP: f32 = 4.0;

/// The CSS-pixel box of one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

impl Default for PageBox {
    fn default() -> Self {
        Self {
            width: PAGE_WIDTH_PX,
            height: PAGE_HEIGHT_PX,
            padding: PAGE_PADDING_PX,
        }
    }
}

impl PageBox {
    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.padding).max(0.0)
    }
}

/// Face and role of a text run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    pub link: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: BASE_FONT_SIZE,
            bold: false,
            italic: false,
            monospace: false,
            link: false,
        }
    }
}

/// A positioned piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
    pub text: String,
    pub style: TextStyle,
}

/// Non-text page decoration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    /// Horizontal rule, 1px tall
    Rule { x: f32, y: f32, width: f32 },
    /// Bar on the left of a blockquote
    QuoteBar { x: f32, y: f32, height: f32 },
    /// Shaded box behind inline code
    CodeBackground {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Link underline
    Underline { x: f32, y: f32, width: f32 },
    /// Double border around the cover page
    CoverFrame {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// A laid out page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub runs: Vec<TextRun>,
    pub decorations: Vec<Decoration>,
    /// Height of the laid out content including the page padding
    pub content_height: f32,
}

/// Lay `markup` out in `page_box`, measuring text with `metrics`
pub fn layout_markup(
    markup: &PrintMarkup,
    page_box: &PageBox,
    metrics: &dyn TextMetrics,
) -> PageLayout {
    let inset = if markup.is_framed() {
        COVER_FRAME_WIDTH + COVER_FRAME_PADDING
    } else {
        0.0
    };

    let mut flow = Flow {
        metrics,
        right: page_box.width - page_box.padding - inset,
        y: page_box.padding + inset,
        pending_margin: 0.0,
        out: PageLayout::default(),
    };
    let left = page_box.padding + inset;

    for block in markup.blocks() {
        flow.block(block, left);
    }

    let content_bottom = flow.y + flow.pending_margin + inset;
    let mut layout = flow.out;
    layout.content_height = content_bottom + page_box.padding;

    if markup.is_framed() {
        let frame_bottom = (page_box.height - page_box.padding).max(content_bottom);
        let frame_height = frame_bottom - page_box.padding;
        layout.decorations.push(Decoration::CoverFrame {
            x: page_box.padding,
            y: page_box.padding,
            width: page_box.content_width(),
            height: frame_height,
        });
    }

    layout
}

/// Block formatting state
struct Flow<'m> {
    metrics: &'m dyn TextMetrics,
    right: f32,
    y: f32,
    pending_margin: f32,
    out: PageLayout,
}

impl Flow<'_> {
    /// Adjoining vertical margins collapse to the largest one
    fn margin(&mut self, margin: f32) {
        self.pending_margin = self.pending_margin.max(margin);
    }

    fn settle(&mut self) {
        self.y += self.pending_margin;
        self.pending_margin = 0.0;
    }

    fn block(&mut self, block: &Block, left: f32) {
        match block {
            Block::Heading { level, content } => {
                let idx = (*level).clamp(1, 3) - 1;
                let style = TextStyle {
                    size: HEADING_FONT_SIZES[idx],
                    bold: true,
                    ..TextStyle::default()
                };
                self.settle();
                self.text(content, style, left);
                self.margin(HEADING_MARGINS[idx]);
            }
            Block::Paragraph(lines) => {
                self.settle();
                for line in lines {
                    self.text(line, TextStyle::default(), left);
                }
                self.margin(BLOCK_MARGIN);
            }
            Block::Quote(content) => {
                self.margin(QUOTE_MARGIN);
                self.settle();
                let start = self.y;
                let style = TextStyle {
                    italic: true,
                    ..TextStyle::default()
                };
                self.text(content, style, left + QUOTE_INDENT);
                self.out.decorations.push(Decoration::QuoteBar {
                    x: left,
                    y: start,
                    height: self.y - start,
                });
                self.margin(QUOTE_MARGIN);
            }
            Block::Rule => {
                self.margin(RULE_MARGIN);
                self.settle();
                self.out.decorations.push(Decoration::Rule {
                    x: left,
                    y: self.y,
                    width: self.right - left,
                });
                self.y += 1.0;
                self.margin(RULE_MARGIN);
            }
            Block::List(list) => self.list(list, left, true),
        }
    }

    fn list(&mut self, list: &List, left: f32, top_level: bool) {
        let item_left = left + LIST_INDENT;
        let style = TextStyle::default();

        for (idx, item) in list.items.iter().enumerate() {
            self.settle();

            let marker = if list.ordered {
                format!("{}.", idx + 1)
            } else {
                "•".to_string()
            };
            let width = self.metrics.text_width(&marker, &style);
            self.out.runs.push(TextRun {
                x: item_left - MARKER_GAP - width,
                baseline: baseline(self.y, style.size),
                width,
                text: marker,
                style,
            });

            self.text(&item.content, style, item_left);
            for child in &item.children {
                self.list(child, item_left, false);
            }
            self.margin(LIST_ITEM_MARGIN);
        }

        if top_level {
            self.margin(BLOCK_MARGIN);
        }
    }

    /// Wrap one source line of inline content starting at `left`
    fn text(&mut self, inlines: &[Inline], base: TextStyle, left: f32) {
        let line_height = base.size * LINE_HEIGHT;
        let mut segments = Vec::new();
        styled_segments(inlines, base, &mut segments);

        let lines = wrap(split_words(&segments), self.right - left, self.metrics);
        if lines.is_empty() {
            self.y += line_height;
            return;
        }

        for line in lines {
            let top = self.y;
            let mut x = left;
            for (idx, word) in line.iter().enumerate() {
                if idx > 0 && word.space_before {
                    x += word.gap(self.metrics);
                }
                for (text, style) in &word.pieces {
                    let width = self.metrics.text_width(text, style);
                    let baseline = baseline(top, base.size);
                    if style.monospace {
                        self.out.decorations.push(Decoration::CodeBackground {
                            x: x - 1.0,
                            y: baseline - style.size * 0.85,
                            width: width + 2.0,
                            height: style.size * 1.15,
                        });
                    }
                    if style.link {
                        self.out.decorations.push(Decoration::Underline {
                            x,
                            y: baseline + 1.5,
                            width,
                        });
                    }
                    self.out.runs.push(TextRun {
                        x,
                        baseline,
                        width,
                        text: text.clone(),
                        style: *style,
                    });
                    x += width;
                }
            }
            self.y += line_height;
        }
    }
}

/// Baseline of a line box starting at `top`
fn baseline(top: f32, size: f32) -> f32 {
    let line_height = size * LINE_HEIGHT;
    top + (line_height - size) / 2.0 + size * 0.8
}

fn styled_segments(inlines: &[Inline], style: TextStyle, out: &mut Vec<(String, TextStyle)>) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push((text.clone(), style)),
            Inline::Strong(children) => styled_segments(
                children,
                TextStyle {
                    bold: true,
                    ..style
                },
                out,
            ),
            Inline::Emphasis(children) => styled_segments(
                children,
                TextStyle {
                    italic: true,
                    ..style
                },
                out,
            ),
            Inline::Code(code) => out.push((
                code.clone(),
                TextStyle {
                    size: CODE_FONT_SIZE,
                    monospace: true,
                    ..style
                },
            )),
            Inline::Link { text, .. } => styled_segments(
                text,
                TextStyle {
                    link: true,
                    ..style
                },
                out,
            ),
        }
    }
}

/// An unbreakable run of text, possibly spanning several styles
#[derive(Debug, Clone, Default)]
struct Word {
    pieces: Vec<(String, TextStyle)>,
    space_before: bool,
}

impl Word {
    fn width(&self, metrics: &dyn TextMetrics) -> f32 {
        self.pieces
            .iter()
            .map(|(text, style)| metrics.text_width(text, style))
            .sum()
    }

    /// Width of the space preceding this word
    fn gap(&self, metrics: &dyn TextMetrics) -> f32 {
        self.pieces
            .first()
            .map_or(0.0, |(_, style)| metrics.text_width(" ", style))
    }

    fn push_char(&mut self, ch: char, style: TextStyle) {
        match self.pieces.last_mut() {
            Some((text, last)) if *last == style => text.push(ch),
            _ => self.pieces.push((ch.to_string(), style)),
        }
    }
}

fn split_words(segments: &[(String, TextStyle)]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;
    let mut space = false;

    for (text, style) in segments {
        for ch in text.chars() {
            if ch.is_whitespace() {
                words.extend(current.take());
                space = true;
                continue;
            }
            let word = current.get_or_insert_with(|| Word {
                pieces: Vec::new(),
                space_before: std::mem::take(&mut space),
            });
            word.push_char(ch, *style);
        }
    }
    words.extend(current);
    words
}

/// Greedy line breaking; words wider than a line are broken between characters
fn wrap(words: Vec<Word>, available: f32, metrics: &dyn TextMetrics) -> Vec<Vec<Word>> {
    let mut lines = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut x = 0.0;

    for word in words
        .into_iter()
        .flat_map(|word| break_word(word, available, metrics))
    {
        let gap = if line.is_empty() || !word.space_before {
            0.0
        } else {
            word.gap(metrics)
        };
        let width = word.width(metrics);
        if !line.is_empty() && x + gap + width > available {
            lines.push(std::mem::take(&mut line));
            x = width;
        } else {
            x += gap + width;
        }
        line.push(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn break_word(word: Word, available: f32, metrics: &dyn TextMetrics) -> Vec<Word> {
    if word.width(metrics) <= available {
        return vec![word];
    }

    let mut parts = Vec::new();
    let mut current = Word {
        pieces: Vec::new(),
        space_before: word.space_before,
    };
    let mut width = 0.0;

    let mut buf = [0u8; 4];
    for (text, style) in &word.pieces {
        for ch in text.chars() {
            let advance = metrics.text_width(ch.encode_utf8(&mut buf), style);
            if !current.pieces.is_empty() && width + advance > available {
                parts.push(std::mem::take(&mut current));
                width = 0.0;
            }
            current.push_char(ch, *style);
            width += advance;
        }
    }
    if !current.pieces.is_empty() {
        parts.push(current);
    }
    parts
}

// =============================================================================
// Measurement
// =============================================================================

/// Measures pages with [`layout_markup`]
#[derive(Clone)]
pub struct LayoutMeasurer {
    page_box: PageBox,
    metrics: Arc<dyn TextMetrics>,
}

impl LayoutMeasurer {
    pub fn new(page_box: PageBox, metrics: Arc<dyn TextMetrics>) -> Self {
        Self { page_box, metrics }
    }

    /// Measure with the faces in `fonts`, as [`crate::SvgRasterizer`] draws
    pub fn with_fonts(fonts: Arc<Database>) -> Self {
        Self::new(PageBox::default(), Arc::new(FontMetrics::new(fonts)))
    }

    /// Measure with fixed character widths, independent of installed fonts
    pub fn approximate() -> Self {
        Self::new(PageBox::default(), Arc::new(ApproximateMetrics))
    }
}

impl HeightMeasurer for LayoutMeasurer {
    fn measure(&self, markup: &PrintMarkup, width_px: f32) -> Result<f32> {
        if width_px.is_nan() || width_px <= 2.0 * self.page_box.padding {
            return Err(BookletError::Measure(format!(
                "page width {}px leaves no room for content",
                width_px
            )));
        }
        let page_box = PageBox {
            width: width_px,
            ..self.page_box
        };
        Ok(layout_markup(markup, &page_box, self.metrics.as_ref()).content_height)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is a full 10px em wide
    struct WideMetrics;

    impl TextMetrics for WideMetrics {
        fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
            text.chars().count() as f32 * style.size
        }
    }

    fn layout(md: &str) -> PageLayout {
        layout_markup(
            &PrintMarkup::from_markdown(md),
            &PageBox::default(),
            &ApproximateMetrics,
        )
    }

    fn line_count(layout: &PageLayout) -> usize {
        let mut baselines: Vec<f32> = layout.runs.iter().map(|r| r.baseline).collect();
        baselines.dedup();
        baselines.len()
    }

    #[test]
    fn test_empty_page_is_padding_only() {
        assert_eq!(layout("").content_height, 2.0 * PAGE_PADDING_PX);
    }

    #[test]
    fn test_heading_height() {
        let page = layout("# Title");
        let expected = PAGE_PADDING_PX * 2.0 + 14.0 * LINE_HEIGHT + 8.0;
        assert!((page.content_height - expected).abs() < 0.01);
        assert!(page.runs[0].style.bold);
        assert_eq!(page.runs[0].text, "Title");
    }

    #[test]
    fn test_paragraph_wraps() {
        let page = layout(&"word ".repeat(20));
        // 8 words of 20px plus 5px spaces fit in the 198px content box
        assert_eq!(line_count(&page), 3);
        assert!(page.runs.iter().all(|r| r.x + r.width <= PAGE_WIDTH_PX - PAGE_PADDING_PX));
    }

    #[test]
    fn test_wide_glyphs_stay_inside_content_box() {
        let text = format!("{}\nlong words {}", "W".repeat(38), "M".repeat(12));
        let markup = PrintMarkup::from_markdown(&text);
        let page = layout_markup(&markup, &PageBox::default(), &WideMetrics);

        // 19 full-width glyphs fit in 198px
        assert!(line_count(&page) >= 3);
        for run in &page.runs {
            assert!(run.x >= PAGE_PADDING_PX);
            assert!(run.x + run.width <= PAGE_WIDTH_PX - PAGE_PADDING_PX + 0.001);
            assert_eq!(run.width, run.text.chars().count() as f32 * BASE_FONT_SIZE);
        }
    }

    #[test]
    fn test_metrics_drive_measured_height() {
        let markup = PrintMarkup::from_markdown(&"word ".repeat(20));
        let narrow = LayoutMeasurer::approximate();
        let wide = LayoutMeasurer::new(PageBox::default(), Arc::new(WideMetrics));

        let narrow_height = narrow.measure(&markup, PAGE_WIDTH_PX).unwrap();
        let wide_height = wide.measure(&markup, PAGE_WIDTH_PX).unwrap();
        assert!(wide_height > narrow_height);
    }

    #[test]
    fn test_long_word_is_broken() {
        let page = layout(&"x".repeat(100));
        assert_eq!(line_count(&page), 3);
    }

    #[test]
    fn test_collapsed_margins() {
        // Paragraph bottom margin (8) and rule top margin (8) collapse
        let page = layout("text\n---");
        let rule_y = page
            .decorations
            .iter()
            .find_map(|d| match d {
                Decoration::Rule { y, .. } => Some(*y),
                _ => None,
            })
            .unwrap();
        assert!((rule_y - (PAGE_PADDING_PX + 14.0 + 8.0)).abs() < 0.01);
    }

    #[test]
    fn test_list_markers_and_nesting() {
        let page = layout("1. one\n2. two\n  - nested");
        let texts: Vec<&str> = page.runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["1.", "one", "2.", "two", "•", "nested"]);

        let one = &page.runs[1];
        let nested = &page.runs[5];
        assert_eq!(nested.x - one.x, LIST_INDENT);
    }

    #[test]
    fn test_inline_styles() {
        let page = layout("**bold** `code` [link](https://example.com)");
        assert!(page.runs[0].style.bold);
        assert!(page.runs[1].style.monospace);
        assert_eq!(page.runs[1].style.size, CODE_FONT_SIZE);
        assert!(page.runs[2].style.link);
        assert!(
            page.decorations
                .iter()
                .any(|d| matches!(d, Decoration::CodeBackground { .. }))
        );
        assert!(
            page.decorations
                .iter()
                .any(|d| matches!(d, Decoration::Underline { .. }))
        );
    }

    #[test]
    fn test_quote_bar_spans_text() {
        let page = layout("> quoted");
        let bar = page.decorations.iter().find_map(|d| match d {
            Decoration::QuoteBar { height, .. } => Some(*height),
            _ => None,
        });
        assert_eq!(bar, Some(BASE_FONT_SIZE * LINE_HEIGHT));
        assert!(page.runs[0].style.italic);
    }

    #[test]
    fn test_cover_frame_insets_content() {
        let plain = layout("cover");
        let framed = layout_markup(
            &PrintMarkup::from_markdown("cover").framed(true),
            &PageBox::default(),
            &ApproximateMetrics,
        );

        let inset = COVER_FRAME_WIDTH + COVER_FRAME_PADDING;
        assert_eq!(framed.runs[0].x - plain.runs[0].x, inset);
        let frame_height = PAGE_HEIGHT_PX - 2.0 * PAGE_PADDING_PX;
        assert!(framed.decorations.iter().any(
            |d| matches!(d, Decoration::CoverFrame { height, .. } if *height == frame_height)
        ));
    }

    #[test]
    fn test_measurer_rejects_degenerate_width() {
        let measurer = LayoutMeasurer::approximate();
        let markup = PrintMarkup::from_markdown("text");
        assert!(measurer.measure(&markup, 10.0).is_err());
        assert!(measurer.measure(&markup, PAGE_WIDTH_PX).is_ok());
    }
}
