//! Options API script block of a Vue single-file component
//!
//! Merges run on the content of the regular `<script>` block; the rest of
//! the file (template, styles, `<script setup>`) is carried through untouched.

use std::ops::Range;

use memchr::memmem;

use crate::error::{InjectError, Result};
use crate::parser::ParseOptions;
use crate::tree::ScriptTree;

/// Location and attributes of one `<script>` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock {
    /// Byte range of the block content, between the tags
    pub content: Range<usize>,
    pub lang: String,
    pub setup: bool,
}

/// A `.vue` file held as text
#[derive(Debug, Clone)]
pub struct SfcDocument {
    source: String,
}

impl SfcDocument {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// All script blocks in document order
    pub fn script_blocks(&self) -> Result<Vec<ScriptBlock>> {
        let mut blocks = Vec::new();
        let mut pointer = 0;
        while let Some(block) = next_script(&self.source, &mut pointer)? {
            blocks.push(block);
        }
        Ok(blocks)
    }

    /// The regular (non-`setup`) script block
    pub fn options_script(&self) -> Result<ScriptBlock> {
        self.script_blocks()?
            .into_iter()
            .find(|block| !block.setup)
            .ok_or_else(|| InjectError::ScriptBlock("no <script> block without setup".to_string()))
    }

    /// Append an empty options component script when there is none
    pub fn ensure_options_script(&mut self) -> Result<bool> {
        if self.script_blocks()?.iter().any(|block| !block.setup) {
            return Ok(false);
        }
        if !self.source.is_empty() && !self.source.ends_with('\n') {
            self.source.push('\n');
        }
        self.source
            .push_str("\n<script>\nexport default {}\n</script>\n");
        Ok(true)
    }

    /// Parse the regular script block
    pub fn script_tree(&self) -> Result<ScriptTree> {
        let block = self.options_script()?;
        ScriptTree::parse(
            &self.source[block.content.clone()],
            ParseOptions::from_lang(&block.lang),
        )
    }

    /// Replace the regular script block content with `tree`
    pub fn set_script(&mut self, tree: &ScriptTree) -> Result<()> {
        let block = self.options_script()?;
        self.source.replace_range(block.content, tree.source());
        Ok(())
    }

    /// Parse the script, let `edit` mutate it, and write it back on success
    pub fn edit_script<R>(&mut self, edit: impl FnOnce(&mut ScriptTree) -> Result<R>) -> Result<R> {
        let mut tree = self.script_tree()?;
        let result = edit(&mut tree)?;
        self.set_script(&tree)?;
        Ok(result)
    }
}

fn next_script(source: &str, pointer: &mut usize) -> Result<Option<ScriptBlock>> {
    let bytes = source.as_bytes();
    loop {
        let Some(script_start) = find_script_start(bytes, *pointer) else {
            return Ok(None);
        };
        *pointer = script_start + "<script".len();

        // Skip `<scripts` and similar
        if let Some(next) = bytes.get(*pointer) {
            if !matches!(next, b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/') {
                continue;
            }
        }

        let tag_end = find_closing_angle(bytes, *pointer).ok_or_else(|| unclosed(script_start))?;
        let attributes = &source[*pointer..tag_end];
        let setup = attributes
            .split(|c: char| c.is_whitespace() || c == '/')
            .any(|attr| attr == "setup" || attr.starts_with("setup="));
        let lang = lang_attribute(attributes).to_string();

        if tag_end > 0 && bytes[tag_end - 1] == b'/' {
            *pointer = tag_end + 1;
            return Ok(Some(ScriptBlock {
                content: *pointer..*pointer,
                lang,
                setup,
            }));
        }

        let content_start = tag_end + 1;
        let content_end =
            find_script_end(bytes, content_start).ok_or_else(|| unclosed(script_start))?;
        *pointer = content_end + "</script>".len();

        return Ok(Some(ScriptBlock {
            content: content_start..content_end,
            lang,
            setup,
        }));
    }
}

fn unclosed(position: usize) -> InjectError {
    InjectError::ScriptBlock(format!("unclosed <script> tag at byte {}", position))
}

fn find_script_start(bytes: &[u8], start: usize) -> Option<usize> {
    memmem::find(&bytes[start..], b"<script").map(|pos| start + pos)
}

/// Closing `>` of a tag, skipping quoted attribute values
fn find_closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &byte) in bytes[start..].iter().enumerate() {
        match (quote, byte) {
            (None, b'"' | b'\'') => quote = Some(byte),
            (Some(q), _) if q == byte => quote = None,
            (None, b'>') => return Some(start + i),
            _ => {}
        }
    }
    None
}

fn find_script_end(bytes: &[u8], start: usize) -> Option<usize> {
    memmem::find(&bytes[start..], b"</script>").map(|pos| start + pos)
}

fn lang_attribute(attributes: &str) -> &str {
    let Some(pos) = attributes.find("lang=") else {
        return "js";
    };
    let value = attributes[pos + "lang=".len()..].trim_start();
    match value.chars().next() {
        Some(quote @ ('"' | '\'')) => value[1..]
            .find(quote)
            .map_or("js", |end| &value[1..=end]),
        Some(_) => {
            let end = value
                .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .unwrap_or(value.len());
            &value[..end]
        }
        None => "js",
    }
}
