//! Trigger content.

use crate::option::{label_for, SelectOption};
use crate::selection::{SelectionMode, SelectionState};

/// A selected value shown on the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    /// The selected value.
    pub value: String,
    /// Its display label, empty when no option matches.
    pub label: String,
    /// Whether the chip carries a remove button.
    pub removable: bool,
}

/// What the trigger displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerContent {
    /// Nothing is selected.
    Placeholder(String),
    /// One chip per selected value, in selection order.
    Chips(Vec<Chip>),
}

/// Derive the trigger content from the current selection.
///
/// Chips are removable only in multiple mode.
pub fn render_trigger(
    options: &[SelectOption],
    selection: &SelectionState,
    placeholder: &str,
) -> TriggerContent {
    if selection.is_empty() {
        return TriggerContent::Placeholder(placeholder.to_string());
    }
    let removable = selection.mode() == SelectionMode::Multiple;
    TriggerContent::Chips(
        selection
            .values()
            .iter()
            .map(|value| Chip {
                value: value.clone(),
                label: label_for(options, value).to_string(),
                removable,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionValue;

    fn options() -> Vec<SelectOption> {
        vec![SelectOption::new("1", "A"), SelectOption::new("2", "B")]
    }

    #[test]
    fn test_placeholder_when_empty() {
        let selection = SelectionState::new(SelectionMode::Multiple);
        assert_eq!(
            render_trigger(&options(), &selection, "Pick one"),
            TriggerContent::Placeholder("Pick one".into())
        );
    }

    #[test]
    fn test_chips_in_selection_order() {
        let selection = SelectionState::from_value(
            SelectionMode::Multiple,
            &SelectionValue::from(vec!["2", "1", "gone"]),
        );
        let TriggerContent::Chips(chips) = render_trigger(&options(), &selection, "") else {
            panic!("expected chips");
        };
        let labels: Vec<_> = chips.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A", ""]);
        assert!(chips.iter().all(|c| c.removable));
    }

    #[test]
    fn test_single_chip_not_removable() {
        let selection = SelectionState::from_value(SelectionMode::Single, &SelectionValue::from("1"));
        assert_eq!(
            render_trigger(&options(), &selection, ""),
            TriggerContent::Chips(vec![Chip {
                value: "1".into(),
                label: "A".into(),
                removable: false,
            }])
        );
    }
}
