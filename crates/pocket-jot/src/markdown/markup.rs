//! Print-mode markup
//!
//! A deliberately small markdown subset rendered to fixed-size page markup:
//! headings, blockquotes, rules, nested lists, paragraphs and inline spans.
//! Anything else stays literal paragraph text. The same block tree feeds
//! height measurement, rasterization and the HTML output, so all three agree.

use super::classify::{LineKind, classify_line};
use super::inline::{Inline, escape_markup, parse_inline};
use std::fmt::{self, Write};

/// Spaces per list nesting level
const INDENT_PER_LEVEL: usize = 2;

/// A block of page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: usize, content: Vec<Inline> },
    Quote(Vec<Inline>),
    Rule,
    List(List),
    /// Consecutive text lines joined by soft breaks
    Paragraph(Vec<Vec<Inline>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: Vec<Inline>,
    /// Lists nested under this item
    pub children: Vec<List>,
}

/// Rendered page markup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintMarkup {
    blocks: Vec<Block>,
    framed: bool,
}

/// An open list while building the tree
struct OpenList {
    level: usize,
    list: List,
}

impl PrintMarkup {
    /// Render a page's markdown into markup
    pub fn from_markdown(markdown: &str) -> Self {
        let mut blocks = Vec::new();
        let mut lists: Vec<OpenList> = Vec::new();
        let mut paragraph: Vec<Vec<Inline>> = Vec::new();

        for line in markdown.lines() {
            let kind = classify_line(line);

            if !matches!(kind, LineKind::Paragraph(_)) {
                flush_paragraph(&mut paragraph, &mut blocks);
            }
            if !kind.is_list_item() {
                close_lists_above(&mut lists, &mut blocks, None);
            }

            match kind {
                LineKind::Blank => {}
                LineKind::Header { level, text } => blocks.push(Block::Heading {
                    level,
                    content: parse_inline(text),
                }),
                LineKind::Quote(text) => blocks.push(Block::Quote(parse_inline(text))),
                LineKind::Rule => blocks.push(Block::Rule),
                LineKind::ListItem {
                    ordered,
                    indent,
                    text,
                } => push_list_item(&mut lists, &mut blocks, ordered, indent, text),
                LineKind::Paragraph(text) => paragraph.push(parse_inline(text)),
            }
        }

        flush_paragraph(&mut paragraph, &mut blocks);
        close_lists_above(&mut lists, &mut blocks, None);

        Self {
            blocks,
            framed: false,
        }
    }

    /// Wrap the page in the decorative cover frame
    pub fn framed(mut self, framed: bool) -> Self {
        self.framed = framed;
        self
    }

    pub fn is_framed(&self) -> bool {
        self.framed
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of visual rows before wrapping: one per heading, quote, rule,
    /// list item and paragraph line
    pub fn row_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Heading { .. } | Block::Quote(_) | Block::Rule => 1,
                Block::List(list) => list_rows(list),
                Block::Paragraph(lines) => lines.len(),
            })
            .sum()
    }

    /// Inline-styled HTML for the page
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

/// Convenience wrapper: markdown straight to print HTML
pub fn to_print_markup(markdown: &str) -> String {
    PrintMarkup::from_markdown(markdown).to_html()
}

fn list_rows(list: &List) -> usize {
    list.items
        .iter()
        .map(|item| 1 + item.children.iter().map(list_rows).sum::<usize>())
        .sum()
}

fn flush_paragraph(paragraph: &mut Vec<Vec<Inline>>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(paragraph)));
    }
}

/// Close every open list deeper than `level` (all of them for `None`)
fn close_lists_above(lists: &mut Vec<OpenList>, blocks: &mut Vec<Block>, level: Option<usize>) {
    while let Some(top) = lists.last() {
        if level.is_some_and(|level| top.level <= level) {
            break;
        }
        close_top(lists, blocks);
    }
}

/// Pop the innermost list and attach it to its parent item or the page
fn close_top(lists: &mut Vec<OpenList>, blocks: &mut Vec<Block>) {
    let Some(closed) = lists.pop() else {
        return;
    };
    match lists
        .last_mut()
        .and_then(|parent| parent.list.items.last_mut())
    {
        Some(parent_item) => parent_item.children.push(closed.list),
        None => blocks.push(Block::List(closed.list)),
    }
}

fn push_list_item(
    lists: &mut Vec<OpenList>,
    blocks: &mut Vec<Block>,
    ordered: bool,
    indent: usize,
    text: &str,
) {
    let level = indent / INDENT_PER_LEVEL;

    close_lists_above(lists, blocks, Some(level));

    // Same level but the other list kind: close and reopen
    if lists
        .last()
        .is_some_and(|top| top.level == level && top.list.ordered != ordered)
    {
        close_top(lists, blocks);
    }

    let needs_new = lists.last().is_none_or(|top| top.level < level);
    if needs_new {
        lists.push(OpenList {
            level,
            list: List {
                ordered,
                items: Vec::new(),
            },
        });
    }

    if let Some(top) = lists.last_mut() {
        top.list.items.push(ListItem {
            content: parse_inline(text),
            children: Vec::new(),
        });
    }
}

// =============================================================================
// HTML output
// =============================================================================

const H_STYLES: [&str; 3] = [
    "font-size:14px;font-weight:700;margin:0 0 8px 0;",
    "font-size:12px;font-weight:700;margin:0 0 6px 0;",
    "font-size:11px;font-weight:600;margin:0 0 4px 0;",
];
const QUOTE_STYLE: &str =
    "border-left:2px solid #d1d5db;padding-left:8px;margin:4px 0;font-style:italic;";
const RULE_STYLE: &str = "border:none;border-top:1px solid #d1d5db;margin:8px 0;";
const PARAGRAPH_STYLE: &str = "margin:0 0 8px 0;";
const LIST_ITEM_STYLE: &str = "margin-bottom:2px;";
const CODE_STYLE: &str =
    "background:#e5e7eb;padding:1px 3px;border-radius:2px;font-family:monospace;font-size:9px;";
const LINK_STYLE: &str = "color:#2563eb;text-decoration:underline;";
const COVER_STYLE: &str =
    "border:2px double currentColor;border-radius:2px;padding:4px;height:100%;box-sizing:border-box;";

impl fmt::Display for PrintMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.framed {
            write!(f, "<div style=\"{}\">", COVER_STYLE)?;
        }
        for block in &self.blocks {
            write_block(f, block)?;
        }
        if self.framed {
            f.write_str("</div>")?;
        }
        Ok(())
    }
}

fn write_block(out: &mut impl Write, block: &Block) -> fmt::Result {
    match block {
        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 3);
            write!(out, "<h{} style=\"{}\">", level, H_STYLES[level - 1])?;
            write_inlines(out, content)?;
            write!(out, "</h{}>", level)
        }
        Block::Quote(content) => {
            write!(out, "<blockquote style=\"{}\">", QUOTE_STYLE)?;
            write_inlines(out, content)?;
            out.write_str("</blockquote>")
        }
        Block::Rule => write!(out, "<hr style=\"{}\">", RULE_STYLE),
        Block::List(list) => write_list(out, list, true),
        Block::Paragraph(lines) => {
            write!(out, "<p style=\"{}\">", PARAGRAPH_STYLE)?;
            for (idx, line) in lines.iter().enumerate() {
                if idx > 0 {
                    out.write_str("<br>")?;
                }
                write_inlines(out, line)?;
            }
            out.write_str("</p>")
        }
    }
}

fn write_list(out: &mut impl Write, list: &List, top_level: bool) -> fmt::Result {
    let (tag, marker) = if list.ordered {
        ("ol", "decimal")
    } else {
        ("ul", "disc")
    };
    let margin = if top_level { "0 0 8px 0" } else { "0" };
    write!(
        out,
        "<{} style=\"list-style-type:{};padding-left:16px;margin:{};\">",
        tag, marker, margin
    )?;
    for item in &list.items {
        write!(out, "<li style=\"{}\">", LIST_ITEM_STYLE)?;
        write_inlines(out, &item.content)?;
        for child in &item.children {
            write_list(out, child, false)?;
        }
        out.write_str("</li>")?;
    }
    write!(out, "</{}>", tag)
}

fn write_inlines(out: &mut impl Write, inlines: &[Inline]) -> fmt::Result {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.write_str(&escape_markup(text))?,
            Inline::Strong(children) => {
                out.write_str("<strong>")?;
                write_inlines(out, children)?;
                out.write_str("</strong>")?;
            }
            Inline::Emphasis(children) => {
                out.write_str("<em>")?;
                write_inlines(out, children)?;
                out.write_str("</em>")?;
            }
            Inline::Code(code) => {
                write!(out, "<code style=\"{}\">{}</code>", CODE_STYLE, escape_markup(code))?
            }
            Inline::Link { text, href } => {
                write!(
                    out,
                    "<a href=\"{}\" style=\"{}\">",
                    escape_markup(href),
                    LINK_STYLE
                )?;
                write_inlines(out, text)?;
                out.write_str("</a>")?;
            }
        }
    }
    Ok(())
}
