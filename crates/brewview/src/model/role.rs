//! Render modes and the value container exchanged between models and views.
//!
//! A role is the "render mode" of a request: the same cell can be asked for
//! its display string, its raw editable value, or its check state.

use chrono::{NaiveDate, NaiveDateTime};

/// How a cell is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Formatted text, units included.
    Display,
    /// The raw value an editor starts from, e.g. kilograms as a float.
    Edit,
    /// Hover text.
    ToolTip,
    /// Tri-state check status of a boolean field.
    CheckState,
}

/// Check status of a boolean cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    /// Off.
    #[default]
    Unchecked,
    /// Mixed, for a checkbox summarizing several values.
    PartiallyChecked,
    /// On.
    Checked,
}

impl CheckState {
    /// Only `Checked` counts as on.
    pub fn is_fully_checked(&self) -> bool {
        matches!(self, CheckState::Checked)
    }
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }
}

/// One cell value.
///
/// `ItemData::None` is the empty sentinel returned for out-of-range or
/// unsupported requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemData {
    /// Nothing to show.
    #[default]
    None,
    /// Text.
    String(String),
    /// A count.
    Int(i64),
    /// An amount in canonical units.
    Float(f64),
    /// A flag.
    Bool(bool),
    /// A checkbox.
    CheckState(CheckState),
    /// A calendar date.
    Date(NaiveDate),
    /// A timestamp.
    DateTime(NaiveDateTime),
}

impl ItemData {
    /// Returns `true` for the empty sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, ItemData::None)
    }

    /// The text, if this is text.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ItemData::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The owned text, if this is text.
    pub fn into_string(self) -> Option<String> {
        match self {
            ItemData::String(s) => Some(s),
            _ => None,
        }
    }

    /// The amount, if this is a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ItemData::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The check state, if this is a checkbox.
    pub fn as_check_state(&self) -> Option<CheckState> {
        match self {
            ItemData::CheckState(s) => Some(*s),
            _ => None,
        }
    }

    /// The date, if this is a calendar date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ItemData::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Reads an edited flag.
    ///
    /// Accepts booleans, check states, integers (non-zero is `true`) and the
    /// strings `"true"`/`"false"`.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            ItemData::Bool(b) => Some(*b),
            ItemData::CheckState(s) => Some(s.is_fully_checked()),
            ItemData::Int(n) => Some(*n != 0),
            ItemData::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<String> for ItemData {
    fn from(s: String) -> Self {
        ItemData::String(s)
    }
}

impl From<&str> for ItemData {
    fn from(s: &str) -> Self {
        ItemData::String(s.to_string())
    }
}

impl From<f64> for ItemData {
    fn from(n: f64) -> Self {
        ItemData::Float(n)
    }
}

impl From<bool> for ItemData {
    fn from(b: bool) -> Self {
        ItemData::Bool(b)
    }
}

impl From<CheckState> for ItemData {
    fn from(s: CheckState) -> Self {
        ItemData::CheckState(s)
    }
}

impl From<NaiveDate> for ItemData {
    fn from(d: NaiveDate) -> Self {
        ItemData::Date(d)
    }
}

impl From<NaiveDateTime> for ItemData {
    fn from(d: NaiveDateTime) -> Self {
        ItemData::DateTime(d)
    }
}

/// A missing name renders as an empty cell.
impl From<Option<String>> for ItemData {
    fn from(opt: Option<String>) -> Self {
        opt.map_or(ItemData::None, ItemData::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_state_from_flag() {
        assert_eq!(CheckState::from(true), CheckState::Checked);
        assert_eq!(CheckState::from(false), CheckState::Unchecked);
        assert!(!CheckState::PartiallyChecked.is_fully_checked());
    }

    #[test]
    fn test_edited_flags() {
        assert_eq!(ItemData::CheckState(CheckState::Checked).to_bool(), Some(true));
        assert_eq!(ItemData::CheckState(CheckState::PartiallyChecked).to_bool(), Some(false));
        assert_eq!(ItemData::Int(0).to_bool(), Some(false));
        assert_eq!(ItemData::from(" true ").to_bool(), Some(true));
        assert_eq!(ItemData::from("yes please").to_bool(), None);
        assert_eq!(ItemData::Float(1.0).to_bool(), None);
    }

    #[test]
    fn test_accessors_match_variant() {
        let amount = ItemData::from(2.5);
        assert_eq!(amount.as_float(), Some(2.5));
        assert_eq!(amount.as_string(), None);

        let style: ItemData = None::<String>.into();
        assert!(style.is_none());
        assert_eq!(
            ItemData::from(Some("Stout".to_string())).into_string().as_deref(),
            Some("Stout")
        );

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(ItemData::from(date).as_date(), Some(date));
    }
}
