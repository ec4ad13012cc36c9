//! Markup tokenization: source text → ordered descriptor tree.
//!
//! The scanner is deliberately lenient: the tree builder downstream is the
//! place that rejects malformed documents. Unmatched end tags are dropped,
//! unterminated elements are closed at end of input, and whitespace-only
//! text runs between elements are discarded.

use std::collections::BTreeMap;
use weft_dom::Descriptor;

/// Parses markup source into an ordered descriptor sequence with preserved
/// document order and attribute maps.
pub fn parse_markup(input: &str) -> Vec<Descriptor> {
    let bytes = input.as_bytes();
    let mut idx = 0_usize;
    let mut top_level = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();

    while idx < bytes.len() {
        if bytes[idx] != b'<' {
            let next = find_byte(bytes, idx, b'<').unwrap_or(bytes.len());
            push_text(&mut stack, &mut top_level, &input[idx..next]);
            idx = next;
            continue;
        }

        if starts_with(bytes, idx, b"<!--") {
            idx = skip_comment(bytes, idx);
            continue;
        }

        if starts_with(bytes, idx, b"</") {
            let (tag, next_idx) = parse_end_tag(bytes, idx);
            if let Some(tag) = tag {
                close_element(&mut stack, &mut top_level, &tag);
            }
            idx = next_idx;
            continue;
        }

        let Some((element, self_closing, next_idx)) = parse_start_tag(input, idx) else {
            // A stray `<` that opens no tag is treated as text.
            push_text(&mut stack, &mut top_level, "<");
            idx = idx.saturating_add(1);
            continue;
        };
        idx = next_idx;

        if self_closing {
            attach(&mut stack, &mut top_level, element.into_descriptor());
        } else {
            stack.push(element);
        }
    }

    // Unterminated elements close at end of input.
    while let Some(open) = stack.pop() {
        attach(&mut stack, &mut top_level, open.into_descriptor());
    }

    top_level
}

#[derive(Debug)]
struct OpenElement {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Descriptor>,
}

impl OpenElement {
    fn into_descriptor(self) -> Descriptor {
        Descriptor::Element {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

fn attach(stack: &mut [OpenElement], top_level: &mut Vec<Descriptor>, descriptor: Descriptor) {
    match stack.last_mut() {
        Some(open) => open.children.push(descriptor),
        None => top_level.push(descriptor),
    }
}

fn push_text(stack: &mut [OpenElement], top_level: &mut Vec<Descriptor>, raw: &str) {
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    attach(stack, top_level, Descriptor::Text(text.to_owned()));
}

fn close_element(stack: &mut Vec<OpenElement>, top_level: &mut Vec<Descriptor>, tag: &str) {
    let Some(position) = stack.iter().rposition(|open| open.tag == tag) else {
        return;
    };

    // Anything still open above the match is implicitly closed first.
    while stack.len() > position {
        let open = match stack.pop() {
            Some(open) => open,
            None => return,
        };
        attach(stack, top_level, open.into_descriptor());
    }
}

fn parse_start_tag(input: &str, start: usize) -> Option<(OpenElement, bool, usize)> {
    let bytes = input.as_bytes();
    let mut idx = start.saturating_add(1);

    let name_start = idx;
    while idx < bytes.len() && is_tag_name_char(bytes[idx]) {
        idx = idx.saturating_add(1);
    }
    if idx == name_start {
        return None;
    }
    let tag = input[name_start..idx].to_ascii_lowercase();

    let mut attributes = BTreeMap::new();
    loop {
        idx = skip_spaces(bytes, idx);
        match bytes.get(idx).copied() {
            None => return None,
            Some(b'>') => {
                return Some((
                    OpenElement {
                        tag,
                        attributes,
                        children: Vec::new(),
                    },
                    false,
                    idx.saturating_add(1),
                ));
            }
            Some(b'/') if bytes.get(idx.saturating_add(1)).copied() == Some(b'>') => {
                return Some((
                    OpenElement {
                        tag,
                        attributes,
                        children: Vec::new(),
                    },
                    true,
                    idx.saturating_add(2),
                ));
            }
            Some(_) => {
                let (name, value, next_idx) = parse_attribute(input, idx)?;
                attributes.insert(name, value);
                idx = next_idx;
            }
        }
    }
}

fn parse_attribute(input: &str, start: usize) -> Option<(String, String, usize)> {
    let bytes = input.as_bytes();
    let mut idx = start;

    let name_start = idx;
    while idx < bytes.len() && is_attribute_name_char(bytes[idx]) {
        idx = idx.saturating_add(1);
    }
    if idx == name_start {
        return None;
    }
    let name = input[name_start..idx].to_ascii_lowercase();

    idx = skip_spaces(bytes, idx);
    if bytes.get(idx).copied() != Some(b'=') {
        // Boolean attribute.
        return Some((name, "true".to_owned(), idx));
    }
    idx = skip_spaces(bytes, idx.saturating_add(1));

    match bytes.get(idx).copied() {
        Some(quote @ (b'"' | b'\'')) => {
            let value_start = idx.saturating_add(1);
            let end = find_byte(bytes, value_start, quote)?;
            Some((
                name,
                input[value_start..end].to_owned(),
                end.saturating_add(1),
            ))
        }
        Some(_) => {
            let value_start = idx;
            while idx < bytes.len() && !bytes[idx].is_ascii_whitespace() && bytes[idx] != b'>' {
                idx = idx.saturating_add(1);
            }
            Some((name, input[value_start..idx].to_owned(), idx))
        }
        None => None,
    }
}

fn parse_end_tag(bytes: &[u8], start: usize) -> (Option<String>, usize) {
    let mut idx = start.saturating_add(2);
    let name_start = idx;
    while idx < bytes.len() && is_tag_name_char(bytes[idx]) {
        idx = idx.saturating_add(1);
    }
    let tag = if idx > name_start {
        Some(String::from_utf8_lossy(&bytes[name_start..idx]).to_ascii_lowercase())
    } else {
        None
    };

    while idx < bytes.len() && bytes[idx] != b'>' {
        idx = idx.saturating_add(1);
    }
    (tag, idx.saturating_add(1).min(bytes.len()))
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    find_subslice(bytes, start.saturating_add(4), b"-->")
        .map(|end| end.saturating_add(3))
        .unwrap_or(bytes.len())
}

fn is_tag_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_')
}

fn is_attribute_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':')
}

fn skip_spaces(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx = idx.saturating_add(1);
    }
    idx
}

fn starts_with(bytes: &[u8], idx: usize, pattern: &[u8]) -> bool {
    let end = idx.saturating_add(pattern.len());
    end <= bytes.len() && bytes[idx..end] == *pattern
}

fn find_byte(bytes: &[u8], from: usize, byte: u8) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|candidate| *candidate == byte)
        .map(|offset| from + offset)
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }

    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}
