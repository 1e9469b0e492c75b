//! Line classification shared by reflow and the print renderer

/// The kind of a single markdown source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `#`, `##` or `###` heading
    Header { level: usize, text: &'a str },
    /// Bullet (`-`, `*`, `+`) or numbered (`1.`) list item
    ListItem {
        ordered: bool,
        /// Count of leading whitespace characters
        indent: usize,
        text: &'a str,
    },
    /// `> ` blockquote line
    Quote(&'a str),
    /// `---`, `***` or `___` on its own line
    Rule,
    Blank,
    Paragraph(&'a str),
}

impl LineKind<'_> {
    pub fn is_list_item(&self) -> bool {
        matches!(self, LineKind::ListItem { .. })
    }

    /// Indentation of a list item, `None` for any other line
    pub fn list_indent(&self) -> Option<usize> {
        match self {
            LineKind::ListItem { indent, .. } => Some(*indent),
            _ => None,
        }
    }
}

/// Whether a line is a page break marker / horizontal rule
pub fn is_break_marker(line: &str) -> bool {
    matches!(line.trim(), "---" | "***" | "___")
}

/// Count of leading whitespace characters
pub fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Classify one source line
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if is_break_marker(trimmed) {
        return LineKind::Rule;
    }

    for (level, prefix) in [(3, "### "), (2, "## "), (1, "# ")] {
        if let Some(text) = trimmed.strip_prefix(prefix) {
            return LineKind::Header {
                level,
                text: text.trim(),
            };
        }
    }

    if let Some(text) = trimmed.strip_prefix("> ") {
        return LineKind::Quote(text.trim());
    }

    let body = line.trim_start();
    if let Some(text) = strip_bullet(body) {
        return LineKind::ListItem {
            ordered: false,
            indent: indent_of(line),
            text,
        };
    }
    if let Some(text) = strip_number(body) {
        return LineKind::ListItem {
            ordered: true,
            indent: indent_of(line),
            text,
        };
    }

    LineKind::Paragraph(trimmed)
}

/// `- text`, `* text`, `+ text`
fn strip_bullet(body: &str) -> Option<&str> {
    let rest = body.strip_prefix(['-', '*', '+'])?;
    item_text(rest)
}

/// `12. text`
fn strip_number(body: &str) -> Option<&str> {
    let digits = body.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = body[digits..].strip_prefix('.')?;
    item_text(rest)
}

/// Marker must be followed by whitespace and some text
fn item_text(rest: &str) -> Option<&str> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        assert_eq!(
            classify_line("# Title"),
            LineKind::Header {
                level: 1,
                text: "Title"
            }
        );
        assert_eq!(
            classify_line("### Small"),
            LineKind::Header {
                level: 3,
                text: "Small"
            }
        );
        // Only three levels are supported
        assert_eq!(classify_line("#### Four"), LineKind::Paragraph("#### Four"));
        assert_eq!(classify_line("#hashtag"), LineKind::Paragraph("#hashtag"));
    }

    #[test]
    fn test_list_items() {
        assert_eq!(
            classify_line("- item"),
            LineKind::ListItem {
                ordered: false,
                indent: 0,
                text: "item"
            }
        );
        assert_eq!(
            classify_line("    + deep"),
            LineKind::ListItem {
                ordered: false,
                indent: 4,
                text: "deep"
            }
        );
        assert_eq!(
            classify_line("  12. numbered"),
            LineKind::ListItem {
                ordered: true,
                indent: 2,
                text: "numbered"
            }
        );
        assert_eq!(classify_line("-nospace"), LineKind::Paragraph("-nospace"));
        assert_eq!(classify_line("**bold**"), LineKind::Paragraph("**bold**"));
        assert_eq!(classify_line("3.14 is pi"), LineKind::Paragraph("3.14 is pi"));
    }

    #[test]
    fn test_rules_quotes_blanks() {
        assert_eq!(classify_line("---"), LineKind::Rule);
        assert_eq!(classify_line("  ***  "), LineKind::Rule);
        assert_eq!(classify_line("___"), LineKind::Rule);
        assert_eq!(classify_line("----"), LineKind::Paragraph("----"));
        assert_eq!(classify_line("> quoted"), LineKind::Quote("quoted"));
        assert_eq!(classify_line("   \t"), LineKind::Blank);
    }

    #[test]
    fn test_break_marker() {
        assert!(is_break_marker("---"));
        assert!(is_break_marker(" ___ "));
        assert!(!is_break_marker("<!-- page -->"));
        assert!(!is_break_marker("- - -"));
    }
}
