//! Select configuration.
//!
//! # Example
//!
//! ```
//! use lattice_select::{SelectConfig, SelectOption};
//!
//! let config = SelectConfig::new()
//!     .with_label("Fruit")
//!     .with_options(vec![
//!         SelectOption::new("apple", "Apple"),
//!         SelectOption::new("pear", "Pear"),
//!     ])
//!     .with_multiple(true)
//!     .with_placeholder("Pick some fruit");
//! assert!(config.multiple);
//! ```

use serde::{Deserialize, Serialize};

use crate::option::SelectOption;
use crate::search::FilterMode;
use crate::selection::{SelectionMode, SelectionValue};

/// Construction options for a [`Select`](crate::Select).
///
/// Every field has a default, so partial JSON documents deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Descriptive text shown next to the control.
    pub label: String,
    /// Options in display order.
    pub options: Vec<SelectOption>,
    /// Initial selection.
    pub value: SelectionValue,
    /// Whether several values may be selected.
    pub multiple: bool,
    /// Whether the overlay shows a search box.
    pub with_search: bool,
    /// Text shown on the trigger when nothing is selected.
    pub placeholder: String,
    /// How the search text affects the listed options.
    pub filter_mode: FilterMode,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            label: "label".to_string(),
            options: Vec::new(),
            value: SelectionValue::default(),
            multiple: false,
            with_search: false,
            placeholder: String::new(),
            filter_mode: FilterMode::default(),
        }
    }
}

impl SelectConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the options.
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Append an option.
    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label));
        self
    }

    /// Set the initial selection.
    pub fn with_value(mut self, value: impl Into<SelectionValue>) -> Self {
        self.value = value.into();
        self
    }

    /// Enable or disable multiple selection.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Show or hide the search box.
    pub fn with_search(mut self, enabled: bool) -> Self {
        self.with_search = enabled;
        self
    }

    /// Set the placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the filter mode.
    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    /// The selection mode implied by `multiple`.
    pub fn mode(&self) -> SelectionMode {
        if self.multiple {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        }
    }
}
