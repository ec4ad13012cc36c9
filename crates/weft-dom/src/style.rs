//! Style records: partial and computed style maps.

/// Compact property names recognized by [`StyleMap::set`], in field order.
pub const STYLE_PROPERTIES: [&str; 10] = [
    "alignItems",
    "backgroundColor",
    "borderTop",
    "borderRight",
    "borderBottom",
    "borderLeft",
    "borderWidth",
    "color",
    "display",
    "flexDirection",
];

/// A style record over the closed property set.
///
/// The empty string is the "unset" sentinel, so the same type serves both as
/// a partial record (default/active overrides) and as the fully computed
/// style: merging copies only non-empty fields of the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    pub align_items: String,
    pub background_color: String,
    pub border_top: String,
    pub border_right: String,
    pub border_bottom: String,
    pub border_left: String,
    pub border_width: String,
    pub color: String,
    pub display: String,
    pub flex_direction: String,
}

impl StyleMap {
    /// Sets a property by compact name. Returns false for unrecognized names.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let Some(field) = self.field_mut(name) else {
            return false;
        };
        value.clone_into(field);
        true
    }

    /// Reads a property by compact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "alignItems" => Some(&self.align_items),
            "backgroundColor" => Some(&self.background_color),
            "borderTop" => Some(&self.border_top),
            "borderRight" => Some(&self.border_right),
            "borderBottom" => Some(&self.border_bottom),
            "borderLeft" => Some(&self.border_left),
            "borderWidth" => Some(&self.border_width),
            "color" => Some(&self.color),
            "display" => Some(&self.display),
            "flexDirection" => Some(&self.flex_direction),
            _ => None,
        }
        .map(String::as_str)
    }

    /// Copies every non-empty field of `other` over this record.
    pub fn merge_from(&mut self, other: &StyleMap) {
        for name in STYLE_PROPERTIES {
            let Some(value) = other.get(name) else {
                continue;
            };
            if !value.is_empty() {
                let value = value.to_owned();
                self.set(name, &value);
            }
        }
    }

    /// Non-empty properties as compact-name/value pairs, in field order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        STYLE_PROPERTIES
            .iter()
            .filter_map(|name| {
                self.get(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (*name, value))
            })
            .collect()
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "alignItems" => Some(&mut self.align_items),
            "backgroundColor" => Some(&mut self.background_color),
            "borderTop" => Some(&mut self.border_top),
            "borderRight" => Some(&mut self.border_right),
            "borderBottom" => Some(&mut self.border_bottom),
            "borderLeft" => Some(&mut self.border_left),
            "borderWidth" => Some(&mut self.border_width),
            "color" => Some(&mut self.color),
            "display" => Some(&mut self.display),
            "flexDirection" => Some(&mut self.flex_direction),
            _ => None,
        }
    }
}
