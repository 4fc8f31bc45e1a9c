//! Option items offered by a select.

use serde::{Deserialize, Serialize};

/// An option in the select dropdown.
///
/// Identity is the `value`; labels are for display and need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    /// The display label shown in the option list and in chips.
    pub label: String,
    /// The value reported to the host when selected.
    pub value: String,
}

impl SelectOption {
    /// Create a new option with value and label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Look up the display label for `value`.
///
/// When several options share a value the last one wins. A value with no
/// matching option yields an empty label rather than failing, so stale or
/// foreign values still render.
pub fn label_for<'a>(options: &'a [SelectOption], value: &str) -> &'a str {
    match options.iter().rev().find(|option| option.value == value) {
        Some(option) => option.label.as_str(),
        None => {
            tracing::warn!(target: "lattice_select::select", value, "no option for selected value, rendering empty label");
            ""
        }
    }
}
