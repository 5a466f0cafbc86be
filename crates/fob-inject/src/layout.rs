//! Whitespace decisions for spliced text
//!
//! New entries copy the indentation of their neighbours so untouched lines
//! stay byte-identical and inserted lines blend in.

use crate::options::ListView;

const DEFAULT_UNIT: &str = "  ";

/// Leading whitespace of the line containing `offset`
pub(crate) fn line_indent(source: &str, offset: u32) -> &str {
    let offset = offset as usize;
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let width = line
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[..width]
}

/// Indentation unit of the file, from the first indented line
pub(crate) fn indent_unit(source: &str) -> &str {
    source
        .lines()
        .map(|line| {
            let width = line
                .bytes()
                .take_while(|b| *b == b' ' || *b == b'\t')
                .count();
            (&line[..width], line.len() > width)
        })
        .find(|(ws, has_content)| !ws.is_empty() && *has_content)
        .map_or(DEFAULT_UNIT, |(ws, _)| ws)
}

/// Where an item placed ahead of the first one goes
///
/// Comments leading the first item stay attached to it; a comment sharing
/// the line of the opening delimiter stays on that line.
pub(crate) fn leading_offset(source: &str, list: &ListView) -> u32 {
    let Some(first) = list.items.first() else {
        return list.open + 1;
    };
    let gap_start = (list.open + 1) as usize;
    let gap = &source[gap_start..first.start as usize];
    let from = gap.find('\n').map_or(0, |i| i + 1);
    let rest = &gap[from..];
    (gap_start + from + rest.len() - rest.trim_start().len()) as u32
}

/// How the items of one list are laid out
#[derive(Debug, Clone)]
pub(crate) struct ListLayout {
    /// Items sit on their own lines
    pub multiline: bool,
    /// Indentation of an item line
    pub item_indent: String,
    /// Indentation of the line holding the opening delimiter
    pub outer_indent: String,
}

impl ListLayout {
    pub fn of(source: &str, list: &ListView) -> Self {
        let outer_indent = line_indent(source, list.open).to_string();
        match list.items.first() {
            Some(first) => {
                let gap = &source[(list.open + 1) as usize..first.start as usize];
                let multiline = gap.contains('\n');
                let item_indent = if multiline {
                    line_indent(source, first.start).to_string()
                } else {
                    format!("{}{}", outer_indent, indent_unit(source))
                };
                Self {
                    multiline,
                    item_indent,
                    outer_indent,
                }
            }
            None => Self {
                multiline: source[(list.open + 1) as usize..list.close as usize].contains('\n'),
                item_indent: format!("{}{}", outer_indent, indent_unit(source)),
                outer_indent,
            },
        }
    }

    /// Text placed before a new item that follows an existing one
    pub fn item_break(&self) -> String {
        if self.multiline {
            format!("\n{}", self.item_indent)
        } else {
            " ".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_line_indent() {
        let src = "a\n    b\n";
        assert_eq!(line_indent(src, 6), "    ");
        assert_eq!(line_indent(src, 0), "");
    }

    #[test]
    fn detects_unit_from_first_indented_line() {
        assert_eq!(indent_unit("x {\n\ty\n}"), "\t");
        assert_eq!(indent_unit("flat"), DEFAULT_UNIT);
    }

    #[test]
    fn leading_offset_skips_to_leading_comment() {
        let src = "{ // opts\n  // first\n  a: 1 }";
        let list = ListView {
            open: 0,
            close: 28,
            items: vec![oxc_span::Span::new(23, 27)],
        };
        assert_eq!(&src[leading_offset(src, &list) as usize..], "// first\n  a: 1 }");

        let inline = "{ a: 1 }";
        let list = ListView {
            open: 0,
            close: 7,
            items: vec![oxc_span::Span::new(2, 6)],
        };
        assert_eq!(leading_offset(inline, &list), 2);
    }
}
