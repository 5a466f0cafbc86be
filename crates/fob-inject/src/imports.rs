//! Framework namespace binding and import merging

use oxc_ast::ast::{ImportDeclarationSpecifier, Program, Statement};
use oxc_span::Span;
use tracing::debug;

use crate::edit::EditSet;
use crate::error::Result;
use crate::merge::MergeOutcome;
use crate::tree::ScriptTree;

/// Why a binding lookup came back empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// No default or namespace import from the package
    NoImport,
    /// The tree could not be inspected
    Unreadable(String),
}

/// One `import ... from '<source>'` declaration
#[derive(Debug, Clone)]
struct ImportView {
    span: Span,
    /// Source literal as written, quotes included
    source_literal: String,
    type_only: bool,
    default_local: Option<(String, Span)>,
    namespace_local: Option<String>,
    /// Local name and span of each `{ ... }` specifier
    named: Vec<(String, Span)>,
}

fn collect_imports(program: &Program<'_>, source: &str, from: &str) -> Vec<ImportView> {
    program
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ImportDeclaration(decl) if decl.source.value.as_str() == from => Some(decl),
            _ => None,
        })
        .map(|decl| {
            let literal = decl.source.span;
            let mut view = ImportView {
                span: decl.span,
                source_literal: source[literal.start as usize..literal.end as usize].to_string(),
                type_only: decl.import_kind.is_type(),
                default_local: None,
                namespace_local: None,
                named: Vec::new(),
            };
            for specifier in decl.specifiers.iter().flatten() {
                match specifier {
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                        view.default_local = Some((s.local.name.to_string(), s.span));
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                        view.namespace_local = Some(s.local.name.to_string());
                    }
                    ImportDeclarationSpecifier::ImportSpecifier(s) => {
                        view.named.push((s.local.name.to_string(), s.span));
                    }
                }
            }
            view
        })
        .collect()
}

/// Resolves and normalizes the import of one framework package
#[derive(Debug, Clone)]
pub struct NamespaceImports {
    package: String,
    default_name: String,
}

impl Default for NamespaceImports {
    fn default() -> Self {
        Self::new("vue", "Vue")
    }
}

impl NamespaceImports {
    pub fn new(package: impl Into<String>, default_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            default_name: default_name.into(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Local name of the default (or namespace) import from the package
    pub fn lookup(&self, tree: &ScriptTree) -> std::result::Result<String, LookupFailure> {
        let imports = tree
            .inspect(|program, source| collect_imports(program, source, &self.package))
            .map_err(|e| LookupFailure::Unreadable(e.to_string()))?;

        let values = imports.iter().filter(|view| !view.type_only);
        values
            .clone()
            .find_map(|view| view.default_local.as_ref().map(|(name, _)| name.clone()))
            .or_else(|| values.clone().find_map(|view| view.namespace_local.clone()))
            .filter(|name| !name.is_empty())
            .ok_or(LookupFailure::NoImport)
    }

    /// [`lookup`](Self::lookup), falling back to the conventional name
    pub fn binding_name(&self, tree: &ScriptTree) -> String {
        self.lookup(tree).unwrap_or_else(|failure| {
            debug!(package = %self.package, ?failure, "using default binding name");
            self.default_name.clone()
        })
    }

    /// Turn default imports of the package into namespace imports, adding
    /// `import * as <default_name>` when no namespace import results
    pub fn ensure_namespace_import(&self, tree: &mut ScriptTree) -> Result<MergeOutcome> {
        let imports = tree.inspect(|program, source| collect_imports(program, source, &self.package))?;
        let values: Vec<&ImportView> = imports.iter().filter(|view| !view.type_only).collect();

        let mut edits = EditSet::new();
        let mut has_namespace = values.iter().any(|view| view.namespace_local.is_some());
        for view in &values {
            let Some((local, span)) = &view.default_local else {
                continue;
            };
            if view.namespace_local.is_some() {
                continue;
            }
            if view.named.is_empty() {
                edits.replace(*span, format!("* as {}", local));
            } else {
                // A namespace import cannot share a declaration with named ones.
                let source = tree.source();
                let named: Vec<&str> = view
                    .named
                    .iter()
                    .map(|(_, s)| &source[s.start as usize..s.end as usize])
                    .collect();
                edits.replace(
                    view.span,
                    format!(
                        "import * as {} from {};\nimport {{ {} }} from {};",
                        local,
                        view.source_literal,
                        named.join(", "),
                        view.source_literal
                    ),
                );
            }
            has_namespace = true;
        }

        if !edits.is_empty() {
            debug!(package = %self.package, "rewriting default import as namespace import");
            tree.commit("imports", &edits)?;
            return Ok(MergeOutcome::Extended);
        }
        if has_namespace {
            return Ok(MergeOutcome::Unchanged);
        }

        debug!(package = %self.package, "adding namespace import");
        tree.prepend(&format!(
            "import * as {} from '{}';",
            self.default_name, self.package
        ))?;
        Ok(MergeOutcome::Created)
    }
}

/// Make `name` importable from `specifier`
///
/// Extends an existing `import { ... } from specifier` or prepends a new one.
pub fn ensure_named_import(
    tree: &mut ScriptTree,
    name: &str,
    specifier: &str,
) -> Result<MergeOutcome> {
    let imports = tree.inspect(|program, source| collect_imports(program, source, specifier))?;

    let bound = imports.iter().any(|view| {
        view.named.iter().any(|(local, _)| local == name)
            || view.default_local.as_ref().is_some_and(|(local, _)| local == name)
    });
    if bound {
        return Ok(MergeOutcome::Unchanged);
    }

    let target = imports
        .iter()
        .filter(|view| !view.type_only)
        .find_map(|view| view.named.last().map(|(_, span)| *span));
    match target {
        Some(last) => {
            debug!(name, specifier, "extending named import");
            let mut edits = EditSet::new();
            edits.insert(last.end, format!(", {}", name));
            tree.commit("imports", &edits)?;
            Ok(MergeOutcome::Extended)
        }
        None => {
            debug!(name, specifier, "adding named import");
            tree.prepend(&format!("import {{ {} }} from '{}';", name, specifier))?;
            Ok(MergeOutcome::Created)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseOptions;

    fn tree(source: &str) -> ScriptTree {
        ScriptTree::parse(source, ParseOptions::typescript()).unwrap()
    }

    #[test]
    fn type_only_imports_do_not_bind() {
        let t = tree("import type Vue from 'vue';\n");
        assert_eq!(
            NamespaceImports::default().lookup(&t),
            Err(LookupFailure::NoImport)
        );
    }

    #[test]
    fn default_with_named_is_split() {
        let mut t = tree("import V, { ref } from 'vue';\n");
        NamespaceImports::default()
            .ensure_namespace_import(&mut t)
            .unwrap();
        assert_eq!(
            t.source(),
            "import * as V from 'vue';\nimport { ref } from 'vue';\n"
        );
    }
}
