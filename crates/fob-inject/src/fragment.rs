//! Lexical view of an injected code fragment
//!
//! Re-indenting a fragment must not touch the inside of string or template
//! literals, and a separator placed after a fragment must not land inside a
//! trailing `//` comment. Both need to know where literals and comments are,
//! so the fragment is parsed once: as statements, or failing that as object
//! members or array elements.

use std::ops::Range;

use oxc_allocator::Allocator;
use oxc_ast::ast::{StringLiteral, TemplateLiteral};
use oxc_ast_visit::{Visit, walk};
use oxc_span::{SourceType, Span};

use crate::parser::{ParseOptions, parse};

/// Ways a fragment is wrapped to make it a parsable program
const WRAPPERS: [(&str, &str); 3] = [("", ""), ("({\n", "\n})"), ("[\n", "\n]")];

#[derive(Default)]
struct LiteralSpans(Vec<Span>);

impl<'a> Visit<'a> for LiteralSpans {
    fn visit_string_literal(&mut self, lit: &StringLiteral<'a>) {
        self.0.push(lit.span);
    }

    fn visit_template_literal(&mut self, lit: &TemplateLiteral<'a>) {
        self.0.push(lit.span);
        walk::walk_template_literal(self, lit);
    }
}

/// A trimmed fragment with its literal ranges and trailing line comment
#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    text: String,
    literals: Vec<Range<usize>>,
    /// Length of a `//` comment that runs to the end of the text
    trailing_comment: Option<usize>,
}

impl Fragment {
    /// Analyze `text`; a fragment that parses under no wrapper is treated as
    /// plain code
    pub fn new(text: &str, source_type: SourceType) -> Self {
        let text = text.trim().to_string();
        for (prefix, suffix) in WRAPPERS {
            let wrapped = format!("{}{}{}", prefix, text, suffix);
            let allocator = Allocator::default();
            let options = ParseOptions {
                source_type,
                allow_errors: false,
            };
            let Ok(parsed) = parse(&allocator, &wrapped, options) else {
                continue;
            };

            let shift = |offset: u32| (offset as usize).saturating_sub(prefix.len());
            let mut spans = LiteralSpans::default();
            spans.visit_program(parsed.ast());
            let literals = spans
                .0
                .into_iter()
                .map(|span| shift(span.start)..shift(span.end))
                .collect();

            let trailing_comment = parsed
                .ast()
                .comments
                .iter()
                .filter(|comment| comment.is_line())
                .map(|comment| (shift(comment.span.start), shift(comment.span.end)))
                .find(|(_, end)| *end == text.len())
                .map(|(start, _)| {
                    // Spans may or may not cover the `//` itself.
                    let start = if text[..start].ends_with("//") {
                        start - 2
                    } else {
                        start
                    };
                    text.len() - start
                });

            return Self {
                text,
                literals,
                trailing_comment,
            };
        }

        tracing::trace!("fragment did not parse on its own, treating it as plain code");
        Self {
            text,
            literals: Vec::new(),
            trailing_comment: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the last line ends in a `//` comment
    pub fn ends_in_line_comment(&self) -> bool {
        self.trailing_comment.is_some()
    }

    fn inside_literal(&self, offset: usize) -> bool {
        self.literals
            .iter()
            .any(|range| range.start < offset && offset < range.end)
    }

    /// Indent every line after the first with `indent`, then append
    /// `separator` ahead of any trailing line comment
    ///
    /// Lines that begin inside a literal are kept as they are.
    pub fn render(&self, indent: &str, separator: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + separator.len());
        let mut offset = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            let line_start = offset;
            let line_end = offset + line.len();
            offset = line_end + 1;

            if i > 0 {
                out.push('\n');
            }
            if self.inside_literal(line_start) {
                out.push_str(line);
                continue;
            }
            if i > 0 && !line.trim().is_empty() {
                out.push_str(indent);
            }
            if self.inside_literal(line_end) {
                out.push_str(line);
            } else {
                out.push_str(line.trim_end());
            }
        }

        match self.trailing_comment {
            Some(len) if !separator.is_empty() => {
                let (code, comment) = out.split_at(out.len() - len);
                format!("{}{} {}", code.trim_end(), separator, comment)
            }
            _ => {
                out.push_str(separator);
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str) -> Fragment {
        Fragment::new(text, SourceType::mjs())
    }

    #[test]
    fn continuation_lines_get_indent() {
        assert_eq!(
            fragment("foo() {\n  bar()\n}").render("    ", ""),
            "foo() {\n      bar()\n    }"
        );
    }

    #[test]
    fn template_lines_are_untouched() {
        let text = "this.msg = `line1\nline2  \n  line3`\nnext()";
        assert_eq!(
            fragment(text).render("  ", ""),
            "this.msg = `line1\nline2  \n  line3`\n  next()"
        );
    }

    #[test]
    fn separator_goes_before_trailing_comment() {
        let f = fragment("count: 1 // starts at one");
        assert!(f.ends_in_line_comment());
        assert_eq!(f.render("  ", ","), "count: 1, // starts at one");
    }

    #[test]
    fn object_members_parse_through_wrapper() {
        let f = fragment("save() {\n  return `a\nb`\n} // persists");
        assert!(f.ends_in_line_comment());
        assert_eq!(
            f.render("  ", ","),
            "save() {\n    return `a\nb`\n  }, // persists"
        );
    }

    #[test]
    fn comment_marker_inside_string_is_not_a_comment() {
        let f = fragment("const url = 'http://example.com'");
        assert!(!f.ends_in_line_comment());
        assert_eq!(f.render("", ";"), "const url = 'http://example.com';");
    }
}
