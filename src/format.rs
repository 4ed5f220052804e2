//! Row rendering: delimited text with optional fixed-width columns.
//!
//! A [`RowLayout`] fixes the field separator, the missing-value sentinel,
//! the optional numeric column width, and the optional header text for one
//! report variant. Rendering never reorders or buffers: the pipeline writes
//! each rendered line immediately.

use serde::{Deserialize, Serialize};

use crate::types::Value;

fn default_separator() -> String {
    ", ".to_string()
}

/// Per-variant row rendering parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    /// Field separator, `", "` in all built-in variants.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Rendered in place of an absent value. Never a numeric zero: absence
    /// must stay distinguishable from real data.
    #[serde(default)]
    pub missing: String,
    /// Right-justify every cell (values, sentinel, and header) to this
    /// width. `None` renders unpadded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    /// Header column names, emitted once before any data row. `None` for
    /// headerless variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            missing: String::new(),
            width: None,
            header: None,
        }
    }
}

impl RowLayout {
    /// Headerless, unpadded layout with an empty missing-value sentinel.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Fixed-width layout with a header and the given sentinel.
    pub fn fixed(width: usize, missing: &str, header: Vec<String>) -> Self {
        Self {
            separator: default_separator(),
            missing: missing.to_string(),
            width: Some(width),
            header: Some(header),
        }
    }

    /// Render the header line, if this layout has one (no trailing newline).
    pub fn render_header(&self) -> Option<String> {
        let names = self.header.as_ref()?;
        let cells: Vec<String> = names.iter().map(|n| self.pad(n)).collect();
        Some(cells.join(&self.separator))
    }

    /// Render one data row (no trailing newline). Absent cells render the
    /// sentinel.
    pub fn render_row(&self, cells: &[Option<Value>]) -> String {
        let rendered: Vec<String> = cells
            .iter()
            .map(|cell| match cell {
                Some(v) => self.pad(&v.to_string()),
                None => self.pad(&self.missing),
            })
            .collect();
        rendered.join(&self.separator)
    }

    fn pad(&self, text: &str) -> String {
        match self.width {
            Some(w) => format!("{text:>w$}"),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RowLayout;
    use crate::types::Value;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn plain_layout_joins_unpadded() {
        let layout = RowLayout::plain();
        assert_eq!(layout.render_header(), None);
        let row = layout.render_row(&[
            Some(Value::Unsigned(100)),
            None,
            Some(Value::Unsigned(42)),
        ]);
        assert_eq!(row, "100, , 42");
    }

    #[test]
    fn fixed_layout_right_justifies_values_and_sentinel() {
        let layout = RowLayout::fixed(6, "na", vec!["octets".to_string(), "rtt".to_string()]);
        assert_eq!(layout.render_header(), Some("octets,    rtt".to_string()));
        let row = layout.render_row(&[Some(Value::Unsigned(5000)), None]);
        assert_eq!(row, "  5000,     na");
    }

    #[test]
    fn absent_never_renders_as_zero() {
        let layout = RowLayout::fixed(4, "na", vec![]);
        let row = layout.render_row(&[None, Some(Value::Unsigned(0))]);
        assert_eq!(row, "  na,    0");
    }

    #[test]
    fn addresses_render_textually() {
        let layout = RowLayout::plain();
        let row = layout.render_row(&[Some(Value::Addr(IpAddr::V4(Ipv4Addr::new(
            198, 51, 100, 7,
        ))))]);
        assert_eq!(row, "198.51.100.7");
    }
}
