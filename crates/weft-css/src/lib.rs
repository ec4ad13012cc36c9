//! Inline-declaration parsing and the style resolution / render filter passes.
//!
//! Stylesheet text accumulated from `<style>` nodes rides along on the
//! document unchanged; selector matching and cascade application are out of
//! scope. Only inline `style="…"` declarations and the per-node default and
//! active records participate in resolution.

mod filter;
mod resolve;

pub use filter::apply_render_filter;
pub use resolve::resolve_styles;

/// Parses a declaration-body string (`"border-top: yes; color: red"`) into
/// compact-name/value pairs. Hyphen-case property names are translated to
/// compact form (`border-top` → `borderTop`); empty declarations are dropped.
pub fn parse_declarations(input: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();

    for declaration in split_top_level(input, ';') {
        let trimmed = declaration.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(colon_idx) = find_top_level_colon(trimmed) else {
            continue;
        };

        let name = hyphen_to_compact(trimmed[..colon_idx].trim());
        let value = normalize_value(trimmed[colon_idx + 1..].trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }

        declarations.push((name, value));
    }

    declarations
}

/// `border-top-width` → `borderTopWidth`.
fn hyphen_to_compact(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (index, part) in name.split('-').enumerate() {
        if index == 0 {
            out.push_str(part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Splits on `delimiter` outside quotes and parentheses, so values like
/// `url("a;b")` survive intact.
fn split_top_level(input: &str, delimiter: char) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0_usize;
    let mut idx = 0_usize;
    let mut in_single = false;
    let mut in_double = false;
    let mut paren_depth = 0_u32;

    while idx < bytes.len() {
        let byte = bytes[idx];

        if in_single {
            if byte == b'\'' {
                in_single = false;
            }
            idx = idx.saturating_add(1);
            continue;
        }

        if in_double {
            if byte == b'"' {
                in_double = false;
            }
            idx = idx.saturating_add(1);
            continue;
        }

        match byte {
            b'\'' => in_single = true,
            b'"' => in_double = true,
            b'(' => paren_depth = paren_depth.saturating_add(1),
            b')' => paren_depth = paren_depth.saturating_sub(1),
            _ => {
                if byte == delimiter as u8 && paren_depth == 0 {
                    parts.push(&input[start..idx]);
                    start = idx.saturating_add(1);
                }
            }
        }

        idx = idx.saturating_add(1);
    }

    if start <= input.len() {
        parts.push(&input[start..]);
    }

    parts
}

fn find_top_level_colon(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut idx = 0_usize;
    let mut in_single = false;
    let mut in_double = false;
    let mut paren_depth = 0_u32;

    while idx < bytes.len() {
        let byte = bytes[idx];

        if in_single {
            if byte == b'\'' {
                in_single = false;
            }
            idx = idx.saturating_add(1);
            continue;
        }

        if in_double {
            if byte == b'"' {
                in_double = false;
            }
            idx = idx.saturating_add(1);
            continue;
        }

        match byte {
            b'\'' => in_single = true,
            b'"' => in_double = true,
            b'(' => paren_depth = paren_depth.saturating_add(1),
            b')' => paren_depth = paren_depth.saturating_sub(1),
            b':' if paren_depth == 0 => return Some(idx),
            _ => {}
        }

        idx = idx.saturating_add(1);
    }

    None
}

fn normalize_value(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_space = false;

    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }
        last_was_space = false;
        out.push(ch);
    }

    out.trim().to_owned()
}
