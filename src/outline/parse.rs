//! Raw mapper item parsing
//!
//! A mapper emits one item per line, either `<indent><title>` or
//! `<indent><title>|<line>|<icon>` where `<line>` is 1-based and
//! `%pipe%` stands for a literal `|` inside the title.

/// Indentation filler; only this character counts towards nesting
pub const FILLER: char = ' ';

/// Escape sequence for a literal pipe inside a title
pub const PIPE_ESCAPE: &str = "%pipe%";

/// Icon used for items without an explicit icon token
pub const DEFAULT_ICON: &str = "document";

/// One mapper line split into its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedItem<'a> {
    /// Number of leading filler characters
    pub indent: usize,
    /// Raw title, still escaped and indented
    pub title: &'a str,
    /// Zero-based line, `None` for untagged structural labels
    pub line_number: Option<i64>,
    pub icon: &'a str,
}

impl<'a> ParsedItem<'a> {
    fn untagged(item: &'a str, indent: usize) -> Self {
        Self {
            indent,
            title: item,
            line_number: None,
            icon: DEFAULT_ICON,
        }
    }
}

/// Count the leading filler characters of an item
pub fn indent_width(item: &str) -> usize {
    item.chars().take_while(|c| *c == FILLER).count()
}

/// Split a raw item into title, line and icon
///
/// A line token that is not an integer turns the item into an untagged
/// label carrying the whole raw string.
pub fn parse_item(item: &str) -> ParsedItem<'_> {
    let indent = indent_width(item);

    let Some((title, rest)) = item.split_once('|') else {
        return ParsedItem::untagged(item, indent);
    };

    let mut tokens = rest.split('|');
    let line_token = tokens.next().unwrap_or_default();

    let line = match line_token.trim().parse::<i64>() {
        Ok(line) => line,
        Err(e) => {
            tracing::debug!("Malformed line number {:?} in {:?}: {}", line_token, item, e);
            return ParsedItem::untagged(item, indent);
        }
    };

    let Some(line_number) = line.checked_sub(1) else {
        tracing::debug!("Line number {} out of range in {:?}", line, item);
        return ParsedItem::untagged(item, indent);
    };

    ParsedItem {
        indent,
        title,
        line_number: Some(line_number),
        icon: tokens
            .next()
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .unwrap_or(DEFAULT_ICON),
    }
}

/// Decode `%pipe%` and, in tree mode, drop the indentation
pub fn decode_title(raw: &str, strip_indent: bool) -> String {
    let raw = if strip_indent {
        raw.trim_start_matches(FILLER)
    } else {
        raw
    };
    raw.replace(PIPE_ESCAPE, "|")
}

/// Indentation width of one nesting level
///
/// Learned from the first indented item of a build and applied to every
/// item after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelUnit {
    unit: Option<usize>,
}

impl LevelUnit {
    pub fn unit(&self) -> Option<usize> {
        self.unit
    }

    /// Nesting level for an indentation width
    pub fn level_of(&mut self, width: usize) -> usize {
        if width == 0 {
            return 0;
        }
        let unit = *self.unit.get_or_insert(width);
        width / unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_item() {
        let parsed = parse_item("  fn main|12|function");
        assert_eq!(parsed.indent, 2);
        assert_eq!(parsed.title, "  fn main");
        assert_eq!(parsed.line_number, Some(11));
        assert_eq!(parsed.icon, "function");
    }

    #[test]
    fn test_parse_untagged_item() {
        let parsed = parse_item("Imports");
        assert_eq!(parsed.title, "Imports");
        assert_eq!(parsed.line_number, None);
        assert_eq!(parsed.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_parse_malformed_line_keeps_whole_text() {
        let parsed = parse_item("title|abc|class");
        assert_eq!(parsed.title, "title|abc|class");
        assert_eq!(parsed.line_number, None);
        assert_eq!(parsed.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_parse_missing_icon_defaults_to_document() {
        let parsed = parse_item("title|3");
        assert_eq!(parsed.line_number, Some(2));
        assert_eq!(parsed.icon, DEFAULT_ICON);

        let parsed = parse_item("title|3|");
        assert_eq!(parsed.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_parse_minimum_line_falls_back_to_untagged() {
        let item = "x|-9223372036854775808|document";
        let parsed = parse_item(item);
        assert_eq!(parsed.title, item);
        assert_eq!(parsed.line_number, None);
        assert_eq!(parsed.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_parse_line_zero_is_not_navigable() {
        assert_eq!(parse_item("title|0|document").line_number, Some(-1));
    }

    #[test]
    fn test_escaped_pipe_does_not_split() {
        let parsed = parse_item("a %pipe% b|4|document");
        assert_eq!(parsed.title, "a %pipe% b");
        assert_eq!(decode_title(parsed.title, true), "a | b");
    }

    #[test]
    fn test_decode_title_replaces_every_escape() {
        assert_eq!(decode_title("x%pipe%y%pipe%z", false), "x|y|z");
    }

    #[test]
    fn test_decode_title_strips_only_filler() {
        assert_eq!(decode_title("   -> arrow", true), "-> arrow");
        assert_eq!(decode_title("\tTabbed", true), "\tTabbed");
        assert_eq!(decode_title("   kept", false), "   kept");
    }

    #[test]
    fn test_indent_width_counts_only_spaces() {
        assert_eq!(indent_width("    four"), 4);
        assert_eq!(indent_width("\t tab"), 0);
        assert_eq!(indent_width(""), 0);
    }

    #[test]
    fn test_level_unit_learned_from_first_indent() {
        let mut unit = LevelUnit::default();
        assert_eq!(unit.level_of(0), 0);
        assert_eq!(unit.unit(), None);
        assert_eq!(unit.level_of(4), 1);
        assert_eq!(unit.unit(), Some(4));
        assert_eq!(unit.level_of(8), 2);
        assert_eq!(unit.level_of(6), 1);
    }
}
