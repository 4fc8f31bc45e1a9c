//! Selection state and its transitions.
//!
//! The host owns the selected value; the widget only derives the next value
//! from the current one and reports it back. [`SelectionState`] is that
//! derivation: pure, allocation-light transitions over an ordered list of
//! distinct values.

use serde::{Deserialize, Serialize};

/// Whether a select picks one value or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// One value at a time; picking commits and closes the dropdown.
    #[default]
    Single,
    /// Any number of values in selection order; the dropdown stays open.
    Multiple,
}

/// The selection as exchanged with the host.
///
/// Serializes untagged, so a single value is a JSON string and a multiple
/// selection is a JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    /// A single value. The empty string means "nothing selected".
    Single(String),
    /// Selected values in selection order.
    Multiple(Vec<String>),
}

impl Default for SelectionValue {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl SelectionValue {
    /// The empty selection for `mode`.
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(String::new()),
            SelectionMode::Multiple => Self::Multiple(Vec::new()),
        }
    }

    /// The mode this value's shape corresponds to.
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multiple(_) => SelectionMode::Multiple,
        }
    }

    /// The single value, if this is a single selection.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// The values, if this is a multiple selection.
    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Multiple(values) => Some(values),
        }
    }
}

impl From<&str> for SelectionValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for SelectionValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for SelectionValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for SelectionValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// The normalized current selection: an ordered list of distinct values.
///
/// In single mode the list holds at most one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    mode: SelectionMode,
    values: Vec<String>,
}

/// Result of toggling a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The selection after the toggle.
    pub selection: SelectionState,
    /// Whether the toggle commits the selection and closes the dropdown.
    pub close: bool,
}

impl ToggleOutcome {
    /// The value to report to the host.
    pub fn value(&self) -> SelectionValue {
        self.selection.to_value()
    }
}

impl SelectionState {
    /// An empty selection.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            values: Vec::new(),
        }
    }

    /// Normalize a host-provided value for `mode`.
    ///
    /// An empty single value is "nothing selected". A value whose shape does
    /// not match `mode` is treated as empty. Duplicate multiple values keep
    /// their first occurrence.
    pub fn from_value(mode: SelectionMode, value: &SelectionValue) -> Self {
        let values = match (mode, value) {
            (SelectionMode::Single, SelectionValue::Single(single)) => {
                if single.is_empty() {
                    Vec::new()
                } else {
                    vec![single.clone()]
                }
            }
            (SelectionMode::Multiple, SelectionValue::Multiple(many)) => {
                let mut distinct: Vec<String> = Vec::with_capacity(many.len());
                for item in many {
                    if !distinct.contains(item) {
                        distinct.push(item.clone());
                    }
                }
                distinct
            }
            (mode, value) => {
                tracing::debug!(target: "lattice_select::select", ?mode, shape = ?value.mode(), "selection shape does not match mode, treating as empty");
                Vec::new()
            }
        };
        Self { mode, values }
    }

    /// The selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Selected values in selection order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of selected values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `value` is selected.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// The selection in host shape.
    pub fn to_value(&self) -> SelectionValue {
        match self.mode {
            SelectionMode::Single => {
                SelectionValue::Single(self.values.first().cloned().unwrap_or_default())
            }
            SelectionMode::Multiple => SelectionValue::Multiple(self.values.clone()),
        }
    }

    /// Toggle `value`.
    ///
    /// - Single: the value replaces the selection and the dropdown closes.
    /// - Multiple: a selected value is removed, any other value is appended;
    ///   the dropdown stays open.
    pub fn toggle(&self, value: &str) -> ToggleOutcome {
        match self.mode {
            SelectionMode::Single => ToggleOutcome {
                selection: Self {
                    mode: SelectionMode::Single,
                    values: vec![value.to_string()],
                },
                close: true,
            },
            SelectionMode::Multiple => {
                let mut values = self.values.clone();
                if let Some(index) = values.iter().position(|v| v == value) {
                    values.remove(index);
                } else {
                    values.push(value.to_string());
                }
                ToggleOutcome {
                    selection: Self {
                        mode: SelectionMode::Multiple,
                        values,
                    },
                    close: false,
                }
            }
        }
    }

    /// Remove `value` from a multiple selection.
    ///
    /// Returns `None` when there is nothing to do: single mode, or a value
    /// that is not selected.
    pub fn remove(&self, value: &str) -> Option<SelectionState> {
        if self.mode != SelectionMode::Multiple {
            return None;
        }
        let index = self.values.iter().position(|v| v == value)?;
        let mut values = self.values.clone();
        values.remove(index);
        Some(Self {
            mode: SelectionMode::Multiple,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi(values: &[&str]) -> SelectionState {
        SelectionState::from_value(SelectionMode::Multiple, &SelectionValue::from(values.to_vec()))
    }

    #[test]
    fn test_multi_toggle_appends_then_removes() {
        let start = multi(&[]);
        let once = start.toggle("1");
        assert_eq!(once.value(), SelectionValue::from(vec!["1"]));
        assert!(!once.close);

        let twice = once.selection.toggle("2");
        assert_eq!(twice.value(), SelectionValue::from(vec!["1", "2"]));

        let removed = twice.selection.toggle("1");
        assert_eq!(removed.value(), SelectionValue::from(vec!["2"]));
    }

    #[test]
    fn test_multi_toggle_pair_is_identity() {
        let starts = [multi(&[]), multi(&["a"]), multi(&["a", "b", "c"])];
        for start in starts {
            for value in ["a", "b", "z"] {
                let round_trip = start.toggle(value).selection.toggle(value).selection;
                assert_eq!(
                    round_trip.values().iter().collect::<std::collections::BTreeSet<_>>(),
                    start.values().iter().collect::<std::collections::BTreeSet<_>>(),
                    "toggle pair of {value} from {:?}",
                    start.values()
                );
            }
        }
    }

    #[test]
    fn test_multi_never_contains_duplicates() {
        let sequence = ["a", "b", "a", "c", "c", "b", "a", "d", "a", "d"];
        let mut state = multi(&[]);
        for value in sequence {
            state = state.toggle(value).selection;
            let mut sorted = state.values().to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), state.len());
        }
    }

    #[test]
    fn test_multi_remove() {
        let state = multi(&["1", "2"]);
        let removed = state.remove("1").unwrap();
        assert_eq!(removed.values(), &["2".to_string()]);

        // Absent value: no-op.
        assert_eq!(state.remove("9"), None);
    }

    #[test]
    fn test_single_toggle_replaces_and_closes() {
        for initial in ["", "1", "2"] {
            let state =
                SelectionState::from_value(SelectionMode::Single, &SelectionValue::from(initial));
            let outcome = state.toggle("2");
            assert_eq!(outcome.value(), SelectionValue::from("2"));
            assert!(outcome.close);
        }
    }

    #[test]
    fn test_single_remove_is_noop() {
        let state = SelectionState::from_value(SelectionMode::Single, &SelectionValue::from("1"));
        assert_eq!(state.remove("1"), None);
    }

    #[test]
    fn test_normalization() {
        let empty_single =
            SelectionState::from_value(SelectionMode::Single, &SelectionValue::from(""));
        assert!(empty_single.is_empty());
        assert_eq!(empty_single.to_value(), SelectionValue::from(""));

        let mismatched =
            SelectionState::from_value(SelectionMode::Multiple, &SelectionValue::from("1"));
        assert!(mismatched.is_empty());
        assert_eq!(mismatched.to_value(), SelectionValue::Multiple(vec![]));

        let mismatched =
            SelectionState::from_value(SelectionMode::Single, &SelectionValue::from(vec!["1"]));
        assert!(mismatched.is_empty());

        let duplicated = multi(&["b", "a", "b"]);
        assert_eq!(duplicated.values(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_toggle_accepts_values_outside_options() {
        // Value identity is authoritative; option membership is not checked here.
        let outcome = multi(&[]).toggle("not-an-option");
        assert!(outcome.selection.contains("not-an-option"));
    }

    #[test]
    fn test_selection_value_serde() {
        let single: SelectionValue = serde_json::from_str(r#""2""#).unwrap();
        assert_eq!(single, SelectionValue::from("2"));

        let many: SelectionValue = serde_json::from_str(r#"["1","2"]"#).unwrap();
        assert_eq!(many, SelectionValue::from(vec!["1", "2"]));

        assert_eq!(serde_json::to_string(&many).unwrap(), r#"["1","2"]"#);
        assert_eq!(
            serde_json::to_string(&SelectionMode::Multiple).unwrap(),
            r#""multiple""#
        );
    }
}
