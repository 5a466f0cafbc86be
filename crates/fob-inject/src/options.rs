//! Locating and indexing the default-exported options object
//!
//! The views here hold only spans and names, so they can leave the arena the
//! program was parsed into and drive an [`EditSet`](crate::edit::EditSet)
//! afterwards.

use oxc_ast::ast::*;
use oxc_span::{GetSpan, Span};

/// An ordered, delimited list of items: object properties, array elements or
/// block statements
#[derive(Debug, Clone)]
pub(crate) struct ListView {
    /// Offset of the opening delimiter
    pub open: u32,
    /// Offset of the closing delimiter
    pub close: u32,
    pub items: Vec<Span>,
}

impl ListView {
    fn object(obj: &ObjectExpression<'_>) -> Self {
        Self {
            open: obj.span.start,
            close: obj.span.end - 1,
            items: obj.properties.iter().map(GetSpan::span).collect(),
        }
    }

    fn array(arr: &ArrayExpression<'_>) -> Self {
        Self {
            open: arr.span.start,
            close: arr.span.end - 1,
            items: arr.elements.iter().map(GetSpan::span).collect(),
        }
    }

    fn body(body: &FunctionBody<'_>) -> Self {
        Self {
            open: body.span.start,
            close: body.span.end - 1,
            items: body.statements.iter().map(GetSpan::span).collect(),
        }
    }
}

/// Shape of a section's value
#[derive(Debug, Clone)]
pub(crate) enum SectionValue {
    /// Method shorthand, `function` expression or arrow with a block body
    Function {
        arity: usize,
        body: ListView,
        /// Object literal returned by the last top-level `return`
        returned_object: Option<ListView>,
    },
    /// Arrow function whose body is a single expression
    ExpressionArrow {
        arity: usize,
        returned_object: Option<ListView>,
    },
    Object(ListView),
    Array(ListView),
    Other,
}

impl SectionValue {
    pub fn arity(&self) -> Option<usize> {
        match self {
            SectionValue::Function { arity, .. } | SectionValue::ExpressionArrow { arity, .. } => {
                Some(*arity)
            }
            _ => None,
        }
    }

    pub fn returned_object(&self) -> Option<&ListView> {
        match self {
            SectionValue::Function {
                returned_object, ..
            }
            | SectionValue::ExpressionArrow {
                returned_object, ..
            } => returned_object.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Section {
    pub name: String,
    pub value: SectionValue,
}

/// The options object and its named sections, in source order
#[derive(Debug, Clone)]
pub(crate) struct OptionsObject {
    pub keys: ListView,
    pub sections: Vec<Section>,
}

impl OptionsObject {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum OptionsLocation {
    Found(OptionsObject),
    /// The program has no default export
    Missing,
    /// A default export exists but is not an options object
    Unsupported,
}

/// Find `export default { ... }` or `export default wrapper({ ... })`
pub(crate) fn locate(program: &Program<'_>) -> OptionsLocation {
    for stmt in &program.body {
        let Statement::ExportDefaultDeclaration(decl) = stmt else {
            continue;
        };
        let Some(expr) = decl.declaration.as_expression() else {
            return OptionsLocation::Unsupported;
        };
        return match expr.without_parentheses() {
            Expression::ObjectExpression(obj) => OptionsLocation::Found(index(obj)),
            Expression::CallExpression(call) => call
                .arguments
                .first()
                .and_then(Argument::as_expression)
                .and_then(|arg| match arg.without_parentheses() {
                    Expression::ObjectExpression(obj) => Some(index(obj)),
                    _ => None,
                })
                .map_or(OptionsLocation::Unsupported, OptionsLocation::Found),
            _ => OptionsLocation::Unsupported,
        };
    }
    OptionsLocation::Missing
}

fn index(obj: &ObjectExpression<'_>) -> OptionsObject {
    let sections = obj
        .properties
        .iter()
        .filter_map(|kind| match kind {
            ObjectPropertyKind::ObjectProperty(prop) => Some(prop),
            ObjectPropertyKind::SpreadProperty(_) => None,
        })
        .filter_map(|prop| {
            property_name(prop).map(|name| Section {
                name,
                value: section_value(prop),
            })
        })
        .collect();

    OptionsObject {
        keys: ListView::object(obj),
        sections,
    }
}

fn property_name(prop: &ObjectProperty<'_>) -> Option<String> {
    if prop.computed {
        return None;
    }
    match &prop.key {
        PropertyKey::StaticIdentifier(ident) => Some(ident.name.to_string()),
        PropertyKey::StringLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    }
}

fn section_value(prop: &ObjectProperty<'_>) -> SectionValue {
    if prop.kind != PropertyKind::Init {
        return SectionValue::Other;
    }
    match prop.value.without_parentheses() {
        Expression::FunctionExpression(func) => match &func.body {
            Some(body) => SectionValue::Function {
                arity: arity(&func.params),
                body: ListView::body(body),
                returned_object: returned_object(&body.statements),
            },
            None => SectionValue::Other,
        },
        Expression::ArrowFunctionExpression(arrow) if arrow.expression => {
            let returned_object = arrow.body.statements.first().and_then(|stmt| match stmt {
                Statement::ExpressionStatement(expr) => object_literal(&expr.expression),
                _ => None,
            });
            SectionValue::ExpressionArrow {
                arity: arity(&arrow.params),
                returned_object,
            }
        }
        Expression::ArrowFunctionExpression(arrow) => SectionValue::Function {
            arity: arity(&arrow.params),
            body: ListView::body(&arrow.body),
            returned_object: returned_object(&arrow.body.statements),
        },
        Expression::ObjectExpression(obj) => SectionValue::Object(ListView::object(obj)),
        Expression::ArrayExpression(arr) => SectionValue::Array(ListView::array(arr)),
        _ => SectionValue::Other,
    }
}

fn arity(params: &FormalParameters<'_>) -> usize {
    params.items.len() + usize::from(params.rest.is_some())
}

fn returned_object(statements: &[Statement<'_>]) -> Option<ListView> {
    statements.iter().rev().find_map(|stmt| match stmt {
        Statement::ReturnStatement(ret) => ret.argument.as_ref().and_then(object_literal),
        _ => None,
    })
}

fn object_literal(expr: &Expression<'_>) -> Option<ListView> {
    match expr.without_parentheses() {
        Expression::ObjectExpression(obj) => Some(ListView::object(obj)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, parse};
    use oxc_allocator::Allocator;

    fn locate_in(source: &str) -> OptionsLocation {
        let allocator = Allocator::default();
        let parsed = parse(&allocator, source, ParseOptions::default()).unwrap();
        locate(parsed.ast())
    }

    #[test]
    fn indexes_sections_in_order() {
        let OptionsLocation::Found(obj) = locate_in(
            "export default { name: 'x', data() { return { a: 1 } }, mixins: [m], mounted: function () {} }",
        ) else {
            panic!("options object not found");
        };
        let names: Vec<_> = obj.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["name", "data", "mixins", "mounted"]);

        let data = obj.section("data").unwrap();
        assert_eq!(data.value.arity(), Some(0));
        assert_eq!(data.value.returned_object().unwrap().items.len(), 1);
        assert!(matches!(obj.section("mixins").unwrap().value, SectionValue::Array(_)));
    }

    #[test]
    fn unwraps_component_wrappers() {
        assert!(matches!(
            locate_in("export default defineComponent({ name: 'x' })"),
            OptionsLocation::Found(_)
        ));
    }

    #[test]
    fn arrow_data_with_expression_body() {
        let OptionsLocation::Found(obj) = locate_in("export default { data: () => ({ a: 1, b: 2 }) }")
        else {
            panic!("options object not found");
        };
        let data = obj.section("data").unwrap();
        assert_eq!(data.value.returned_object().unwrap().items.len(), 2);
    }

    #[test]
    fn distinguishes_missing_from_unsupported() {
        assert!(matches!(locate_in("const a = 1;"), OptionsLocation::Missing));
        assert!(matches!(
            locate_in("const a = {};\nexport default a;"),
            OptionsLocation::Unsupported
        ));
    }
}
