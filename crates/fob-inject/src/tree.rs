//! Owned, always-valid script source
//!
//! A [`ScriptTree`] keeps the text of one program together with the options
//! it parses under. Inspection re-parses into a short-lived arena; mutation
//! goes through [`EditSet`]s that are validated before they are committed, so
//! a tree never holds text that fails to parse.

use crate::edit::EditSet;
use crate::error::{InjectError, Result};
use crate::format::normalize;
use crate::parser::{ParseOptions, parse};
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_span::GetSpan;

/// Mutable handle over a parsed program
#[derive(Debug, Clone)]
pub struct ScriptTree {
    source: String,
    options: ParseOptions,
}

impl ScriptTree {
    /// Parse `source`, failing if it has any syntax errors
    pub fn parse(source: impl Into<String>, options: ParseOptions) -> Result<Self> {
        let source = source.into();
        let allocator = Allocator::default();
        parse(&allocator, &source, options.strict())?;
        Ok(Self {
            source,
            options: options.strict(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Current source text
    pub fn generate(&self) -> String {
        self.source.clone()
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// Swap in another tree wholesale
    pub fn replace_by(&mut self, other: ScriptTree) {
        *self = other;
    }

    /// Run `f` against a fresh parse of the current source
    pub(crate) fn inspect<R>(&self, f: impl FnOnce(&Program<'_>, &str) -> R) -> Result<R> {
        let allocator = Allocator::default();
        let parsed = parse(&allocator, &self.source, self.options)?;
        Ok(f(parsed.ast(), &self.source))
    }

    /// Apply `edits` if the result still parses
    ///
    /// Returns whether anything changed. On failure the tree is untouched.
    pub(crate) fn commit(&mut self, section: &str, edits: &EditSet) -> Result<bool> {
        if edits.is_empty() {
            return Ok(false);
        }
        let candidate = edits.apply(&self.source);
        let allocator = Allocator::default();
        if let Err(err) = parse(&allocator, &candidate, self.options) {
            tracing::debug!(section, "rejected edit set: {}", err);
            return Err(InjectError::InvalidResult {
                section: section.to_string(),
                reason: err.to_string(),
            });
        }
        tracing::trace!(section, edits = edits.len(), "committed edit set");
        self.source = candidate;
        Ok(true)
    }

    /// Whether the statements of `snippet` appear, in order and adjacent, at
    /// the top level of this program
    ///
    /// Statements are compared after regenerating them, so formatting and
    /// comments do not matter.
    pub fn has_statements(&self, snippet: &str) -> Result<bool> {
        let wanted = statement_fingerprints(snippet, self.options)?;
        if wanted.is_empty() {
            return Ok(true);
        }
        let existing = statement_fingerprints(&self.source, self.options)?;
        Ok(existing
            .windows(wanted.len())
            .any(|window| window == wanted.as_slice()))
    }

    /// Insert `code` at the top of the program, after any hashbang or directives
    pub fn prepend(&mut self, code: &str) -> Result<()> {
        let header_end = self.inspect(|program, _| {
            let hashbang_end = program.hashbang.as_ref().map_or(0, |h| h.span.end);
            let directives_end = program.directives.last().map_or(0, |d| d.span.end);
            hashbang_end.max(directives_end)
        })?;

        let mut edits = EditSet::new();
        if header_end == 0 {
            let leading = self.source.len() - self.source.trim_start().len();
            edits.insert(leading as u32, format!("{}\n", code.trim_end()));
        } else {
            edits.insert(header_end, format!("\n{}", code.trim_end()));
        }
        self.commit("program", &edits)?;
        Ok(())
    }

    /// Insert `code` at the end of the program body
    pub fn append(&mut self, code: &str) -> Result<()> {
        let end = self.source.len() as u32;
        let separator = if self.source.is_empty() || self.source.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        let mut edits = EditSet::new();
        edits.insert(end, format!("{}{}\n", separator, code.trim_end()));
        self.commit("program", &edits)?;
        Ok(())
    }

    /// Minified regeneration, for structural comparison
    pub fn normalized(&self) -> Result<String> {
        normalize(&self.source, self.options.source_type)
    }
}

/// Regenerated text of each top-level statement of `source`
fn statement_fingerprints(source: &str, options: ParseOptions) -> Result<Vec<String>> {
    let allocator = Allocator::default();
    let parsed = parse(&allocator, source, options)?;
    parsed
        .ast()
        .body
        .iter()
        .map(|stmt| {
            let span = stmt.span();
            normalize(
                &source[span.start as usize..span.end as usize],
                options.source_type,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(source: &str) -> ScriptTree {
        ScriptTree::parse(source, ParseOptions::default()).unwrap()
    }

    #[test]
    fn failed_commit_leaves_source_untouched() {
        let mut t = tree("const a = 1;\n");
        let mut edits = EditSet::new();
        edits.insert(0, "const (");
        assert!(t.commit("program", &edits).is_err());
        assert_eq!(t.source(), "const a = 1;\n");
    }

    #[test]
    fn has_statements_is_structural() {
        let t = tree("function f() {\n  return 1\n}\nconst x = 2;\n");
        assert!(t.has_statements("function f(){ return 1; }").unwrap());
        assert!(!t.has_statements("function f(){ return 2 }").unwrap());
        assert!(t.has_statements("function f(){return 1}\nconst x = 2").unwrap());
        assert!(!t.has_statements("const x = 2; function f(){return 1}").unwrap());
    }

    #[test]
    fn prepend_goes_after_hashbang() {
        let mut t = tree("#!/usr/bin/env node\nrun();\n");
        t.prepend("import a from 'a';").unwrap();
        assert_eq!(
            t.source(),
            "#!/usr/bin/env node\nimport a from 'a';\nrun();\n"
        );
    }

    #[test]
    fn prepend_skips_leading_blank_lines() {
        let mut t = tree("\nrun();\n");
        t.prepend("import a from 'a';").unwrap();
        assert_eq!(t.source(), "\nimport a from 'a';\nrun();\n");
    }

    #[test]
    fn append_adds_trailing_newline() {
        let mut t = tree("a()");
        t.append("b()").unwrap();
        assert_eq!(t.source(), "a()\nb()\n");
    }
}
