//! Flattening a host text selection to plain text.

/// Sentinel the host uses when a range covers a whole element rather than a
/// character span.
pub const UNKNOWN_OFFSET: i64 = -1;

/// An ordered list of selected ranges, as handed over by the host document.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub ranges: Vec<RangeElement>,
}

impl Selection {
    pub fn new(ranges: Vec<RangeElement>) -> Self {
        Self { ranges }
    }
}

/// One selected range. `text` is absent when the underlying element has no
/// extractable text (images, breaks); offsets are character positions with
/// an inclusive end.
#[derive(Clone, Debug)]
pub struct RangeElement {
    pub text: Option<String>,
    pub start_offset: i64,
    pub end_offset_inclusive: i64,
}

impl RangeElement {
    /// Range covering a whole element.
    pub fn whole(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            start_offset: UNKNOWN_OFFSET,
            end_offset_inclusive: UNKNOWN_OFFSET,
        }
    }

    /// Range covering the inclusive character span `[start, end]`.
    pub fn partial(text: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            text: Some(text.into()),
            start_offset: start,
            end_offset_inclusive: end,
        }
    }

    /// Element without extractable text; skipped during extraction.
    pub fn non_text() -> Self {
        Self {
            text: None,
            start_offset: UNKNOWN_OFFSET,
            end_offset_inclusive: UNKNOWN_OFFSET,
        }
    }
}

/// Flatten a selection to newline-joined plain text, preserving range order.
///
/// `None` means no selection at all; an existing but empty selection yields
/// `Some("")`. Pure read, no side effects.
pub fn extract_plain_text(selection: Option<&Selection>) -> Option<String> {
    let selection = selection?;
    let mut parts = Vec::new();
    for range in &selection.ranges {
        let Some(text) = &range.text else {
            continue;
        };
        parts.push(slice_range(text, range.start_offset, range.end_offset_inclusive));
    }
    Some(parts.join("\n"))
}

/// Inclusive character slice `[start, end]` of `text`; a sentinel offset on
/// either side selects the whole element. Out-of-range offsets clamp.
fn slice_range(text: &str, start: i64, end: i64) -> String {
    if start == UNKNOWN_OFFSET || end == UNKNOWN_OFFSET {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let start = start.max(0) as usize;
    let end = (end.max(0) as usize + 1).min(chars.len());
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}
