//! Byte-range edits over source text
//!
//! Offsets come from OXC spans. Edits never overlap; inserts at the same
//! offset are applied in the order they were added.

use oxc_span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: u32,
    end: u32,
    text: String,
}

/// A batch of edits applied together against one source snapshot
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `text` before the byte at `offset`
    pub fn insert(&mut self, offset: u32, text: impl Into<String>) -> &mut Self {
        self.edits.push(Edit {
            start: offset,
            end: offset,
            text: text.into(),
        });
        self
    }

    /// Replace the bytes covered by `span`
    pub fn replace(&mut self, span: Span, text: impl Into<String>) -> &mut Self {
        self.edits.push(Edit {
            start: span.start,
            end: span.end,
            text: text.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Produce the edited text
    pub fn apply(&self, source: &str) -> String {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        // Stable sort keeps same-offset inserts in call order, ahead of a
        // replacement starting there.
        ordered.sort_by_key(|edit| (edit.start, edit.end));

        let added: usize = ordered.iter().map(|e| e.text.len()).sum();
        let mut out = String::with_capacity(source.len() + added);
        let mut cursor = 0usize;
        for edit in ordered {
            let start = edit.start as usize;
            let end = edit.end as usize;
            tracing::trace!(start, end, len = edit.text.len(), "applying edit");
            if start > cursor {
                out.push_str(&source[cursor..start]);
            }
            out.push_str(&edit.text);
            cursor = cursor.max(end);
        }
        out.push_str(&source[cursor..]);
        out
    }
}
