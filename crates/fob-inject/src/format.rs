//! Source formatting for generated utility modules
//!
//! The utility manager runs every write through a [`SourceFormatter`]. The
//! default implementation regenerates the program with `oxc_codegen`.

use crate::error::{InjectError, Result};
use crate::parser::{ParseOptions, parse};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};

/// Quote style for string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Single quotes: `'hello'`
    #[default]
    Single,
    /// Double quotes: `"hello"`
    Double,
}

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Tabs
    Tabs,
    /// Spaces with specified width
    Spaces(u8),
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(2)
    }
}

/// Trailing comma policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingCommas {
    None,
    /// Where valid in ES5 (objects, arrays)
    #[default]
    Es5,
    All,
}

/// Language mode the formatter parses with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMode {
    JavaScript,
    #[default]
    TypeScript,
}

impl LanguageMode {
    pub fn source_type(self) -> SourceType {
        match self {
            LanguageMode::JavaScript => SourceType::mjs(),
            LanguageMode::TypeScript => SourceType::ts(),
        }
    }
}

/// Formatting options for utility module output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Use semicolons at end of statements
    pub use_semicolons: bool,
    /// Quote style for string literals
    pub quote_style: QuoteStyle,
    /// Indentation style
    pub indent: IndentStyle,
    /// Trailing comma policy
    pub trailing_commas: TrailingCommas,
    /// Line width for formatting (0 = no limit)
    pub line_width: usize,
    /// Parser mode used before regenerating
    pub language: LanguageMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            use_semicolons: false,
            quote_style: QuoteStyle::Single,
            indent: IndentStyle::Spaces(2),
            trailing_commas: TrailingCommas::Es5,
            line_width: 80,
            language: LanguageMode::TypeScript,
        }
    }
}

/// Formats whole source files
///
/// Failures are reported as [`InjectError::Format`]; callers decide whether
/// they are fatal.
pub trait SourceFormatter: Send + Sync {
    fn format(&self, source: &str, options: &FormatOptions) -> Result<String>;
}

/// Formatter backed by `oxc_codegen`
///
/// Codegen owns its own line breaking and always terminates statements, so
/// `use_semicolons`, `trailing_commas` and `line_width` are not applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodegenFormatter;

impl SourceFormatter for CodegenFormatter {
    fn format(&self, source: &str, options: &FormatOptions) -> Result<String> {
        let allocator = Allocator::default();
        let parse_options = ParseOptions {
            source_type: options.language.source_type(),
            allow_errors: false,
        };
        let parsed = parse(&allocator, source, parse_options).map_err(|e| InjectError::Format {
            reason: e.to_string(),
        })?;

        let codegen_options = CodegenOptions {
            single_quote: options.quote_style == QuoteStyle::Single,
            ..CodegenOptions::default()
        };
        let code = Codegen::new()
            .with_options(codegen_options)
            .build(parsed.ast())
            .code;

        Ok(reindent(&code, options.indent))
    }
}

// Codegen indents with tabs.
fn reindent(code: &str, indent: IndentStyle) -> String {
    let unit = match indent {
        IndentStyle::Tabs => return code.to_string(),
        IndentStyle::Spaces(width) => " ".repeat(width as usize),
    };

    let mut out = String::with_capacity(code.len());
    for line in code.split_inclusive('\n') {
        let depth = line.bytes().take_while(|b| *b == b'\t').count();
        out.push_str(&unit.repeat(depth));
        out.push_str(&line[depth..]);
    }
    out
}

/// Regenerate `source` in minified form so structurally equal code compares equal
pub fn normalize(source: &str, source_type: SourceType) -> Result<String> {
    let allocator = Allocator::default();
    let options = ParseOptions {
        source_type,
        allow_errors: false,
    };
    let parsed = parse(&allocator, source, options)?;
    Ok(Codegen::new()
        .with_options(CodegenOptions::minify())
        .build(parsed.ast())
        .code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reindents_tabs_to_spaces() {
        let code = "function f() {\n\treturn 1;\n}\n";
        assert_eq!(
            reindent(code, IndentStyle::Spaces(2)),
            "function f() {\n  return 1;\n}\n"
        );
    }

    #[test]
    fn formatter_prefers_single_quotes() {
        let out = CodegenFormatter
            .format("const a = \"x\"", &FormatOptions::default())
            .unwrap();
        assert!(out.contains("'x'"));
    }

    #[test]
    fn formatter_rejects_invalid_source() {
        let err = CodegenFormatter.format("function (", &FormatOptions::default());
        assert!(matches!(err, Err(InjectError::Format { .. })));
    }

    #[test]
    fn normalize_ignores_whitespace() {
        let a = normalize("function f(){}", SourceType::mjs()).unwrap();
        let b = normalize("function   f ( ) {\n\n}", SourceType::mjs()).unwrap();
        assert_eq!(a, b);
    }
}
