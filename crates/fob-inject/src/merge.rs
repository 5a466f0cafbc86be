//! Object-section merging
//!
//! Each section kind decides whether to extend what the options object
//! already has or to create the section, then commits one [`EditSet`]
//! against the [`ScriptTree`]. Everything outside the spliced ranges stays
//! byte-identical.
//!
//! Only `mixins` checks content before inserting. Hooks, `data`,
//! `components` and `methods` append unconditionally, so injecting the same
//! entry twice yields it twice; callers are expected not to repeat requests.

use indexmap::IndexMap;
use oxc_span::{SourceType, Span};
use tracing::debug;

use crate::edit::EditSet;
use crate::error::{InjectError, Result};
use crate::fragment::Fragment;
use crate::layout::{ListLayout, indent_unit, leading_offset};
use crate::options::{self, ListView, OptionsLocation, OptionsObject, SectionValue};
use crate::tree::ScriptTree;

/// Key → value-expression source, rendered in insertion order
pub type Entries = IndexMap<String, String>;

/// Which keyed block an [`Entries`] map goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyedBlock {
    /// `data() { return { ... } }`
    Data,
    /// `components: { ... }`
    Components,
}

impl KeyedBlock {
    pub fn name(self) -> &'static str {
        match self {
            KeyedBlock::Data => "data",
            KeyedBlock::Components => "components",
        }
    }
}

/// One merge operation against the options object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionRequest {
    /// Append `code` to the body of lifecycle hook `name`
    Hook { name: String, code: String },
    Data(Entries),
    Components(Entries),
    /// Full method source, e.g. `handleClick() { ... }`
    Method(String),
    /// Mixin identifier
    Mixin(String),
}

impl InjectionRequest {
    pub fn section(&self) -> &str {
        match self {
            InjectionRequest::Hook { name, .. } => name,
            InjectionRequest::Data(_) => "data",
            InjectionRequest::Components(_) => "components",
            InjectionRequest::Method(_) => "methods",
            InjectionRequest::Mixin(_) => "mixins",
        }
    }
}

/// What a merge did to the options object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The section was created
    Created,
    /// An existing section received new content
    Extended,
    /// Nothing to do
    Unchanged,
}

/// Apply `request` to `tree` in place
pub fn merge(tree: &mut ScriptTree, request: &InjectionRequest) -> Result<MergeOutcome> {
    match request {
        InjectionRequest::Hook { name, code } => merge_hook(tree, name, code),
        InjectionRequest::Data(entries) => merge_keyed_block(tree, KeyedBlock::Data, entries),
        InjectionRequest::Components(entries) => {
            merge_keyed_block(tree, KeyedBlock::Components, entries)
        }
        InjectionRequest::Method(code) => merge_method(tree, code),
        InjectionRequest::Mixin(ident) => merge_mixin(tree, ident),
    }
}

/// Append `code` to a zero-argument hook, creating it as the last key if absent
pub fn merge_hook(tree: &mut ScriptTree, hook: &str, code: &str) -> Result<MergeOutcome> {
    let source_type = tree.options().source_type;
    let Some(options) = locate_options(tree)? else {
        let unit = indent_unit(tree.source()).to_string();
        return create_options_object(tree, &hook_source(hook, code, &unit, source_type));
    };

    match options.section(hook).map(|s| &s.value) {
        Some(SectionValue::Function { arity: 0, body, .. }) => {
            debug!(hook, "extending existing hook");
            let mut edits = EditSet::new();
            let code = Fragment::new(code, source_type);
            append_statement(tree.source(), body, &code, &mut edits);
            tree.commit(hook, &edits)?;
            Ok(MergeOutcome::Extended)
        }
        Some(_) => Err(InjectError::unexpected_shape(
            hook,
            "a method with no parameters and a block body",
        )),
        None => {
            debug!(hook, "creating hook");
            let unit = indent_unit(tree.source()).to_string();
            insert_key(
                tree,
                &options,
                hook,
                &hook_source(hook, code, &unit, source_type),
                Placement::End,
            )?;
            Ok(MergeOutcome::Created)
        }
    }
}

/// Append `entries` to `data` or `components`, creating the block as the first key if absent
///
/// Keys already present are not detected; a repeated key is appended again.
pub fn merge_keyed_block(
    tree: &mut ScriptTree,
    block: KeyedBlock,
    entries: &Entries,
) -> Result<MergeOutcome> {
    if entries.is_empty() {
        return Ok(MergeOutcome::Unchanged);
    }
    let name = block.name();
    let source_type = tree.options().source_type;
    let rendered: Vec<Fragment> = entries
        .iter()
        .map(|(key, value)| Fragment::new(&render_entry(key, value), source_type))
        .collect();

    let unit = indent_unit(tree.source()).to_string();
    let Some(options) = locate_options(tree)? else {
        return create_options_object(tree, &keyed_block_source(block, &rendered, &unit));
    };

    let existing = options.section(name).map(|s| match (block, &s.value) {
        (KeyedBlock::Data, SectionValue::Object(list)) => Some(list),
        (KeyedBlock::Data, value) if value.arity() == Some(0) => value.returned_object(),
        (KeyedBlock::Components, SectionValue::Object(list)) => Some(list),
        _ => None,
    });

    match existing {
        Some(Some(list)) => {
            debug!(block = name, count = rendered.len(), "extending block");
            let mut edits = EditSet::new();
            append_items(tree.source(), list, &rendered, &mut edits);
            tree.commit(name, &edits)?;
            Ok(MergeOutcome::Extended)
        }
        Some(None) => Err(InjectError::unexpected_shape(
            name,
            match block {
                KeyedBlock::Data => "a function returning an object literal",
                KeyedBlock::Components => "an object literal",
            },
        )),
        None => {
            debug!(block = name, "creating block");
            insert_key(
                tree,
                &options,
                name,
                &keyed_block_source(block, &rendered, &unit),
                Placement::Start,
            )?;
            Ok(MergeOutcome::Created)
        }
    }
}

/// Insert `method` as the first entry of `methods`
///
/// Runs in two committed steps: an empty `methods: {}` is created as the
/// first key when missing, then the method is always inserted.
pub fn merge_method(tree: &mut ScriptTree, method: &str) -> Result<MergeOutcome> {
    let created = ensure_methods_block(tree)?;

    let options = locate_options(tree)?.ok_or(InjectError::OptionsObjectNotFound)?;
    let Some(SectionValue::Object(list)) = options.section("methods").map(|s| &s.value) else {
        return Err(InjectError::unexpected_shape("methods", "an object literal"));
    };

    let mut edits = EditSet::new();
    let method = Fragment::new(method, tree.options().source_type);
    prepend_item(tree.source(), list, &method, &mut edits);
    tree.commit("methods", &edits)?;
    Ok(if created {
        MergeOutcome::Created
    } else {
        MergeOutcome::Extended
    })
}

fn ensure_methods_block(tree: &mut ScriptTree) -> Result<bool> {
    let Some(options) = locate_options(tree)? else {
        debug!("creating options object for methods");
        create_options_object(tree, "methods: {}")?;
        return Ok(true);
    };
    if options.section("methods").is_some() {
        return Ok(false);
    }
    debug!("creating empty methods block");
    insert_key(tree, &options, "methods", "methods: {}", Placement::Start)?;
    Ok(true)
}

/// Add `mixin` to `mixins` unless it is already listed
pub fn merge_mixin(tree: &mut ScriptTree, mixin: &str) -> Result<MergeOutcome> {
    let mixin = mixin.trim();
    let entry = format!("mixins: [{}]", mixin);
    let Some(options) = locate_options(tree)? else {
        return create_options_object(tree, &entry);
    };

    match options.section("mixins").map(|s| &s.value) {
        Some(SectionValue::Array(list)) => {
            let source = tree.source();
            let present = list
                .items
                .iter()
                .any(|span| source[span.start as usize..span.end as usize].trim() == mixin);
            if present {
                debug!(mixin, "mixin already registered");
                return Ok(MergeOutcome::Unchanged);
            }

            let mut edits = EditSet::new();
            match list.items.last() {
                Some(last) => {
                    edits.insert(last.end, format!(", {}", mixin));
                }
                None => {
                    let layout = ListLayout::of(source, list);
                    let text = if layout.multiline {
                        format!("\n{}{}", layout.item_indent, mixin)
                    } else {
                        mixin.to_string()
                    };
                    edits.insert(list.open + 1, text);
                }
            }
            tree.commit("mixins", &edits)?;
            Ok(MergeOutcome::Extended)
        }
        Some(_) => Err(InjectError::unexpected_shape("mixins", "an array literal")),
        None => {
            debug!(mixin, "creating mixins");
            insert_key(tree, &options, "mixins", &entry, Placement::Start)?;
            Ok(MergeOutcome::Created)
        }
    }
}

/// Kebab-case component tag to the camel-case key it registers under
///
/// Only a `-` followed by a lowercase ASCII letter is folded, so
/// `el-date-picker` becomes `elDatePicker` and `my-2col` stays as it is.
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('-', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

fn locate_options(tree: &ScriptTree) -> Result<Option<OptionsObject>> {
    match tree.inspect(|program, _| options::locate(program))? {
        OptionsLocation::Found(options) => Ok(Some(options)),
        OptionsLocation::Missing => Ok(None),
        OptionsLocation::Unsupported => Err(InjectError::OptionsObjectNotFound),
    }
}

/// No default export yet: add one holding just `entry`
fn create_options_object(tree: &mut ScriptTree, entry: &str) -> Result<MergeOutcome> {
    let unit = indent_unit(tree.source()).to_string();
    let entry = Fragment::new(entry, tree.options().source_type);
    debug!("creating options object");
    tree.append(&format!(
        "export default {{\n{}{}\n}}",
        unit,
        entry.render(&unit, ",")
    ))?;
    Ok(MergeOutcome::Created)
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    Start,
    End,
}

fn insert_key(
    tree: &mut ScriptTree,
    options: &OptionsObject,
    section: &str,
    entry: &str,
    placement: Placement,
) -> Result<()> {
    let entry = Fragment::new(entry, tree.options().source_type);
    let source = tree.source();
    let keys = &options.keys;
    let layout = ListLayout::of(source, keys);

    let mut edits = EditSet::new();
    match (placement, keys.items.last()) {
        (Placement::End, Some(last)) => {
            edits.insert(
                last.end,
                format!(
                    ",{}{}",
                    layout.item_break(),
                    entry.render(&layout.item_indent, "")
                ),
            );
            if entry.ends_in_line_comment() {
                close_on_own_line(source, keys, last.end, &layout, &mut edits);
            }
        }
        _ => prepend_item(source, keys, &entry, &mut edits),
    }
    tree.commit(section, &edits)?;
    Ok(())
}

fn append_items(source: &str, list: &ListView, items: &[Fragment], edits: &mut EditSet) {
    let layout = ListLayout::of(source, list);
    let Some(last_item) = items.last() else {
        return;
    };

    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        let is_last = i + 1 == items.len();
        let separator = if is_last && !list.items.is_empty() {
            ""
        } else {
            ","
        };
        joined.push_str(&item.render(&layout.item_indent, separator));
        if !is_last {
            joined.push_str(&item_break_after(&layout, item));
        }
    }

    match list.items.last() {
        Some(last) => {
            edits.insert(last.end, format!(",{}{}", layout.item_break(), joined));
            if last_item.ends_in_line_comment() {
                close_on_own_line(source, list, last.end, &layout, edits);
            }
        }
        None => {
            edits.insert(list.open + 1, empty_list_text(&layout, &joined));
        }
    }
}

fn prepend_item(source: &str, list: &ListView, item: &Fragment, edits: &mut EditSet) {
    let layout = ListLayout::of(source, list);
    let rendered = item.render(&layout.item_indent, ",");
    if list.items.is_empty() {
        edits.insert(list.open + 1, empty_list_text(&layout, &rendered));
    } else {
        edits.insert(
            leading_offset(source, list),
            format!("{}{}", rendered, item_break_after(&layout, item)),
        );
    }
}

fn append_statement(source: &str, body: &ListView, code: &Fragment, edits: &mut EditSet) {
    let layout = ListLayout::of(source, body);
    let rendered = code.render(&layout.item_indent, "");
    match body.items.last() {
        Some(last) => {
            let previous = source[last.start as usize..last.end as usize].trim_end();
            // A closing brace ends a block but also object literals and arrow
            // bodies, which a leading `(` or `[` would continue.
            let needs_semicolon = !previous.ends_with(';')
                && (continues_previous(code.text())
                    || (!layout.multiline && !previous.ends_with('}')));
            edits.insert(
                last.end,
                format!(
                    "{}{}{}",
                    if needs_semicolon { ";" } else { "" },
                    layout.item_break(),
                    rendered
                ),
            );
            if code.ends_in_line_comment() {
                close_on_own_line(source, body, last.end, &layout, edits);
            }
        }
        None => {
            edits.insert(body.open + 1, empty_list_text(&layout, &rendered));
        }
    }
}

/// Statement starts that ASI would glue onto the previous line
fn continues_previous(code: &str) -> bool {
    matches!(
        code.trim_start().as_bytes().first(),
        Some(b'(' | b'[' | b'`' | b'+' | b'-' | b'/')
    )
}

/// Break after `item` when another item follows on the same list
fn item_break_after(layout: &ListLayout, item: &Fragment) -> String {
    if item.ends_in_line_comment() {
        format!("\n{}", layout.item_indent)
    } else {
        layout.item_break()
    }
}

/// Move the closing delimiter of a one-line list onto its own line, so text
/// spliced in at `after` may end in a line comment
fn close_on_own_line(
    source: &str,
    list: &ListView,
    after: u32,
    layout: &ListLayout,
    edits: &mut EditSet,
) {
    if layout.multiline {
        return;
    }
    let tail = &source[after as usize..list.close as usize];
    let blank = (tail.len() - tail.trim_end().len()) as u32;
    edits.replace(
        Span::new(list.close - blank, list.close),
        format!("\n{}", layout.outer_indent),
    );
}

/// `text` already carries its trailing separator
fn empty_list_text(layout: &ListLayout, text: &str) -> String {
    if layout.multiline {
        format!("\n{}{}", layout.item_indent, text)
    } else {
        format!("\n{}{}\n{}", layout.item_indent, text, layout.outer_indent)
    }
}

/// `key` when the value is the same token, `key: value` otherwise
fn render_entry(key: &str, value: &str) -> String {
    if key == value {
        key.to_string()
    } else {
        format!("{}: {}", key, value)
    }
}

fn hook_source(hook: &str, code: &str, unit: &str, source_type: SourceType) -> String {
    format!(
        "{}() {{\n{}{}\n}}",
        hook,
        unit,
        Fragment::new(code, source_type).render(unit, "")
    )
}

fn keyed_block_source(block: KeyedBlock, entries: &[Fragment], unit: &str) -> String {
    let lines = |indent: &str| {
        entries
            .iter()
            .map(|e| format!("{}{}", indent, e.render(indent, ",")))
            .collect::<Vec<_>>()
            .join("\n")
    };
    match block {
        KeyedBlock::Data => {
            let body = lines(&format!("{unit}{unit}"));
            format!("data() {{\n{unit}return {{\n{body}\n{unit}}}\n}}")
        }
        KeyedBlock::Components => {
            let body = lines(unit);
            format!("components: {{\n{body}\n}}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(texts: &[&str]) -> Vec<Fragment> {
        texts
            .iter()
            .map(|text| Fragment::new(text, SourceType::mjs()))
            .collect()
    }

    #[test]
    fn shorthand_when_key_matches_value() {
        assert_eq!(render_entry("Foo", "Foo"), "Foo");
        assert_eq!(render_entry("foo", "1"), "foo: 1");
    }

    #[test]
    fn data_block_source_layout() {
        let src = keyed_block_source(KeyedBlock::Data, &fragments(&["foo: 1"]), "  ");
        assert_eq!(src, "data() {\n  return {\n    foo: 1,\n  }\n}");
    }

    #[test]
    fn block_source_keeps_commas_ahead_of_comments() {
        let src = keyed_block_source(
            KeyedBlock::Components,
            &fragments(&["A // first", "B"]),
            "  ",
        );
        assert_eq!(src, "components: {\n  A, // first\n  B,\n}");
    }

    #[test]
    fn detects_asi_hazards() {
        assert!(continues_previous("(a || b).run()"));
        assert!(continues_previous("[1, 2].forEach(f)"));
        assert!(!continues_previous("this.load()"));
    }

    #[test]
    fn camel_cases_component_tags() {
        assert_eq!(to_camel_case("el-date-picker"), "elDatePicker");
        assert_eq!(to_camel_case("ElButton"), "ElButton");
        assert_eq!(to_camel_case("my-2col"), "my-2col");
        assert_eq!(to_camel_case("trailing-"), "trailing-");
    }
}
