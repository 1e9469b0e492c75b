//! Inline span parsing (emphasis, strong, code, links)
//!
//! Block structure is decided by [`super::classify`]; only the text of a
//! line reaches this parser, so any block syntax left at the start of that
//! text is escaped before it is handed to pulldown-cmark.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::borrow::Cow;

/// An inline span of page text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Code(String),
    Link { text: Vec<Inline>, href: String },
}

enum Frame {
    Strong,
    Emphasis,
    Link(String),
    /// Image alt text, flattened into the parent
    Plain,
}

/// Parse the text of one line into inline spans
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let source = escape_block_start(text);
    let mut stack: Vec<(Frame, Vec<Inline>)> = Vec::new();
    let mut root: Vec<Inline> = Vec::new();

    for event in Parser::new(&source) {
        match event {
            Event::Start(Tag::Strong) => stack.push((Frame::Strong, Vec::new())),
            Event::Start(Tag::Emphasis) => stack.push((Frame::Emphasis, Vec::new())),
            Event::Start(Tag::Link { dest_url, .. }) => {
                stack.push((Frame::Link(dest_url.to_string()), Vec::new()))
            }
            Event::Start(Tag::Image { .. }) => stack.push((Frame::Plain, Vec::new())),
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Link | TagEnd::Image) => {
                if let Some((frame, children)) = stack.pop() {
                    let target = match stack.last_mut() {
                        Some((_, parent)) => parent,
                        None => &mut root,
                    };
                    close_frame(frame, children, target);
                }
            }
            Event::Text(text) | Event::InlineHtml(text) => {
                push_text(current(&mut stack, &mut root), &text)
            }
            Event::Html(html) => {
                push_text(current(&mut stack, &mut root), html.trim_end_matches('\n'))
            }
            Event::Code(code) => {
                current(&mut stack, &mut root).push(Inline::Code(code.to_string()))
            }
            Event::SoftBreak | Event::HardBreak => push_text(current(&mut stack, &mut root), " "),
            _ => {}
        }
    }

    // Unbalanced frames cannot normally occur; flatten whatever is left
    while let Some((_, children)) = stack.pop() {
        let target = match stack.last_mut() {
            Some((_, parent)) => parent,
            None => &mut root,
        };
        for child in children {
            push_inline(target, child);
        }
    }

    root
}

fn current<'a>(
    stack: &'a mut [(Frame, Vec<Inline>)],
    root: &'a mut Vec<Inline>,
) -> &'a mut Vec<Inline> {
    match stack.last_mut() {
        Some((_, children)) => children,
        None => root,
    }
}

fn close_frame(frame: Frame, children: Vec<Inline>, target: &mut Vec<Inline>) {
    match frame {
        Frame::Strong => target.push(Inline::Strong(children)),
        Frame::Emphasis => target.push(Inline::Emphasis(children)),
        Frame::Link(href) => target.push(Inline::Link {
            text: children,
            href,
        }),
        Frame::Plain => {
            for child in children {
                push_inline(target, child);
            }
        }
    }
}

fn push_inline(target: &mut Vec<Inline>, inline: Inline) {
    match inline {
        Inline::Text(text) => push_text(target, &text),
        other => target.push(other),
    }
}

fn push_text(target: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(last)) = target.last_mut() {
        last.push_str(text);
    } else {
        target.push(Inline::Text(text.to_string()));
    }
}

/// Escape a leading block marker so the text parses as a plain paragraph
fn escape_block_start(text: &str) -> Cow<'_, str> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let Some(&first) = bytes.first() else {
        return Cow::Borrowed(text);
    };
    let second = bytes.get(1).copied();
    let followed_by_space = |b: Option<u8>| matches!(b, None | Some(b' ') | Some(b'\t'));

    let escape_first = match first {
        b'>' => true,
        b'#' => {
            let hashes = bytes.iter().take_while(|&&b| b == b'#').count();
            hashes <= 6 && followed_by_space(bytes.get(hashes).copied())
        }
        b'-' | b'+' | b'*' => followed_by_space(second) || is_thematic(text),
        b'_' => is_thematic(text),
        b'`' | b'~' => text.starts_with("```") || text.starts_with("~~~"),
        // `[label]: destination` is a link reference definition and renders nothing
        b'[' => text[1..]
            .split_once(']')
            .is_some_and(|(_, rest)| rest.starts_with(':')),
        _ => false,
    };
    if escape_first {
        return Cow::Owned(format!("\\{}", text));
    }

    // `1. text` / `1) text` would open an ordered list
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if (1..=9).contains(&digits)
        && matches!(bytes.get(digits), Some(b'.') | Some(b')'))
        && followed_by_space(bytes.get(digits + 1).copied())
    {
        return Cow::Owned(format!("{}\\{}", &text[..digits], &text[digits..]));
    }

    Cow::Borrowed(text)
}

/// `***`, `- - -`, `___` and friends
fn is_thematic(text: &str) -> bool {
    let marks: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3 && matches!(marks[0], '-' | '*' | '_') && marks.iter().all(|&c| c == marks[0])
}

/// Concatenated text of a span list, without markup
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_text(inlines, &mut out);
    out
}

fn collect_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Strong(children) | Inline::Emphasis(children) => collect_text(children, out),
            Inline::Link { text, .. } => collect_text(text, out),
        }
    }
}

/// Escape text for inclusion in HTML or SVG markup
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
