//! Parser façade for reading component scripts
//!
//! Wraps `oxc_parser` so the rest of the crate deals in [`ParseOptions`] and
//! crate errors instead of raw parser returns.

use crate::error::{InjectError, Result};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Parse options for reading source code
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Source type (JavaScript, TypeScript, JSX, TSX)
    pub source_type: SourceType,
    /// Allow parsing errors (returns partial AST)
    pub allow_errors: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::mjs(),
            allow_errors: false,
        }
    }
}

impl ParseOptions {
    /// Create parse options from file path (auto-detects source type)
    pub fn from_path(path: &str) -> Self {
        Self {
            source_type: SourceType::from_path(path).unwrap_or(SourceType::mjs()),
            allow_errors: false,
        }
    }

    /// Create parse options from an SFC `lang` attribute
    pub fn from_lang(lang: &str) -> Self {
        let source_type = match lang {
            "ts" => SourceType::ts(),
            "tsx" => SourceType::tsx(),
            "jsx" => SourceType::jsx(),
            _ => SourceType::mjs(),
        };
        Self {
            source_type,
            allow_errors: false,
        }
    }

    /// Create parse options for TypeScript
    pub fn typescript() -> Self {
        Self {
            source_type: SourceType::ts(),
            allow_errors: false,
        }
    }

    /// Same source type, errors not allowed
    pub fn strict(self) -> Self {
        Self {
            allow_errors: false,
            ..self
        }
    }
}

/// Parsed program with AST and metadata
pub struct ParsedProgram<'a> {
    /// The parsed AST program
    pub program: oxc_ast::ast::Program<'a>,
    /// Parse error messages
    pub diagnostics: Vec<String>,
}

impl<'a> ParsedProgram<'a> {
    /// Get the program AST
    pub fn ast(&self) -> &oxc_ast::ast::Program<'a> {
        &self.program
    }

    /// Check if parsing had errors
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse source code into an AST
///
/// The allocator must outlive the returned program. With
/// `allow_errors == false` any diagnostic turns into [`InjectError::Parse`].
pub fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    options: ParseOptions,
) -> Result<ParsedProgram<'a>> {
    let result = Parser::new(allocator, source, options.source_type).parse();

    let mut diagnostics: Vec<String> = result.errors.iter().map(|err| err.to_string()).collect();
    if result.panicked && diagnostics.is_empty() {
        diagnostics.push("parser aborted".to_string());
    }

    if !options.allow_errors && !diagnostics.is_empty() {
        return Err(InjectError::parse_with_reason(
            "Parse errors",
            diagnostics.join(", "),
        ));
    }

    Ok(ParsedProgram {
        program: result.program,
        diagnostics,
    })
}
