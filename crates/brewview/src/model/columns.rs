//! Column sets for the ingredient tables.

use super::role::{CheckState, ItemData, ItemRole};
use super::table_model::{ObservedTableModel, TableColumns};
use crate::domain::{Fermentable, FermentableType, Hop, HopForm, HopUse};
use crate::units::{Quantity, UnitFormatter};

/// Fermentables table, aggregating total mass.
pub type FermentableTableModel = ObservedTableModel<FermentableColumns>;

/// Hops table, aggregating total mass.
pub type HopTableModel = ObservedTableModel<HopColumns>;

/// Reads an edited amount: a number, or text parsed with its unit.
fn amount_from(value: &ItemData, quantity: Quantity, formatter: &dyn UnitFormatter) -> Option<f64> {
    let amount = match value {
        ItemData::Float(n) => Some(*n),
        ItemData::Int(n) => Some(*n as f64),
        ItemData::String(s) => formatter.parse_amount(quantity, s),
        _ => None,
    }?;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

/// Runs `set` on a converted value; `false` when conversion failed.
fn apply<T>(value: Option<T>, set: impl FnOnce(T)) -> bool {
    match value {
        Some(value) => {
            set(value);
            true
        }
        None => false,
    }
}

fn text_from(value: &ItemData) -> Option<String> {
    match value {
        ItemData::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn amount_cell(
    value: f64,
    quantity: Quantity,
    role: ItemRole,
    formatter: &dyn UnitFormatter,
) -> ItemData {
    match role {
        ItemRole::Display | ItemRole::ToolTip => {
            ItemData::from(formatter.display_amount(quantity, value))
        }
        ItemRole::Edit => ItemData::from(value),
        _ => ItemData::None,
    }
}

fn text_cell(text: impl Into<String>, role: ItemRole) -> ItemData {
    match role {
        ItemRole::Display | ItemRole::Edit | ItemRole::ToolTip => ItemData::from(text.into()),
        _ => ItemData::None,
    }
}

fn flag_cell(flag: bool, role: ItemRole) -> ItemData {
    match role {
        ItemRole::CheckState => ItemData::from(CheckState::from(flag)),
        ItemRole::Edit => ItemData::from(flag),
        ItemRole::Display | ItemRole::ToolTip => ItemData::from(if flag { "Yes" } else { "No" }),
        _ => ItemData::None,
    }
}

/// Columns of the fermentables table.
#[derive(Debug)]
pub struct FermentableColumns;

impl FermentableColumns {
    /// Name.
    pub const NAME: usize = 0;
    /// Kind of fermentable.
    pub const TYPE: usize = 1;
    /// Amount.
    pub const AMOUNT: usize = 2;
    /// Whether it is mashed; a checkbox.
    pub const MASHED: usize = 3;
    /// Yield in percent.
    pub const YIELD: usize = 4;
    /// Color in SRM.
    pub const COLOR: usize = 5;
}

impl TableColumns for FermentableColumns {
    type Element = Fermentable;

    const SOURCE: &'static str = "FermentableTableModel";
    const TITLES: &'static [&'static str] =
        &["Name", "Type", "Amount", "Mashed", "Yield %", "Color (SRM)"];

    fn aggregate_of(element: &Fermentable) -> f64 {
        element.amount_kg()
    }

    fn is_checkable(column: usize) -> bool {
        column == Self::MASHED
    }

    fn cell(
        element: &Fermentable,
        column: usize,
        role: ItemRole,
        formatter: &dyn UnitFormatter,
    ) -> ItemData {
        match column {
            Self::NAME => text_cell(element.name(), role),
            Self::TYPE => text_cell(element.fermentable_type().as_str(), role),
            Self::AMOUNT => amount_cell(element.amount_kg(), Quantity::Mass, role, formatter),
            Self::MASHED => flag_cell(element.is_mashed(), role),
            Self::YIELD => amount_cell(element.yield_pct(), Quantity::Percent, role, formatter),
            Self::COLOR => amount_cell(element.color_srm(), Quantity::Color, role, formatter),
            _ => ItemData::None,
        }
    }

    fn set_cell(
        element: &Fermentable,
        column: usize,
        value: &ItemData,
        formatter: &dyn UnitFormatter,
    ) -> bool {
        match column {
            Self::NAME => apply(text_from(value), |name| element.set_name(name)),
            Self::TYPE => apply(
                value.as_string().and_then(FermentableType::from_display),
                |kind| element.set_fermentable_type(kind),
            ),
            Self::AMOUNT => apply(
                amount_from(value, Quantity::Mass, formatter),
                |kg| element.set_amount_kg(kg),
            ),
            Self::MASHED => apply(value.to_bool(), |flag| element.set_is_mashed(flag)),
            Self::YIELD => apply(
                amount_from(value, Quantity::Percent, formatter).filter(|pct| *pct <= 100.0),
                |pct| element.set_yield_pct(pct),
            ),
            Self::COLOR => apply(
                amount_from(value, Quantity::Color, formatter),
                |srm| element.set_color_srm(srm),
            ),
            _ => false,
        }
    }
}

/// Columns of the hops table.
#[derive(Debug)]
pub struct HopColumns;

impl HopColumns {
    /// Name.
    pub const NAME: usize = 0;
    /// Alpha acid in percent.
    pub const ALPHA: usize = 1;
    /// Amount.
    pub const AMOUNT: usize = 2;
    /// When the hop is added.
    pub const USE: usize = 3;
    /// Contact time.
    pub const TIME: usize = 4;
    /// Physical form.
    pub const FORM: usize = 5;
}

impl TableColumns for HopColumns {
    type Element = Hop;

    const SOURCE: &'static str = "HopTableModel";
    const TITLES: &'static [&'static str] = &["Name", "Alpha %", "Amount", "Use", "Time", "Form"];

    fn aggregate_of(element: &Hop) -> f64 {
        element.amount_kg()
    }

    fn is_checkable(_column: usize) -> bool {
        false
    }

    fn cell(
        element: &Hop,
        column: usize,
        role: ItemRole,
        formatter: &dyn UnitFormatter,
    ) -> ItemData {
        match column {
            Self::NAME => text_cell(element.name(), role),
            Self::ALPHA => amount_cell(element.alpha_pct(), Quantity::Percent, role, formatter),
            Self::AMOUNT => amount_cell(element.amount_kg(), Quantity::Mass, role, formatter),
            Self::USE => text_cell(element.hop_use().as_str(), role),
            Self::TIME => amount_cell(element.time_min(), Quantity::Time, role, formatter),
            Self::FORM => text_cell(element.form().as_str(), role),
            _ => ItemData::None,
        }
    }

    fn set_cell(
        element: &Hop,
        column: usize,
        value: &ItemData,
        formatter: &dyn UnitFormatter,
    ) -> bool {
        match column {
            Self::NAME => apply(text_from(value), |name| element.set_name(name)),
            Self::ALPHA => apply(
                amount_from(value, Quantity::Percent, formatter).filter(|pct| *pct <= 100.0),
                |pct| element.set_alpha_pct(pct),
            ),
            Self::AMOUNT => apply(
                amount_from(value, Quantity::Mass, formatter),
                |kg| element.set_amount_kg(kg),
            ),
            Self::USE => apply(
                value.as_string().and_then(HopUse::from_display),
                |hop_use| element.set_hop_use(hop_use),
            ),
            Self::TIME => apply(
                amount_from(value, Quantity::Time, formatter),
                |min| element.set_time_min(min),
            ),
            Self::FORM => apply(
                value.as_string().and_then(HopForm::from_display),
                |form| element.set_form(form),
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{DisplayFormatter, UnitSystem};

    #[test]
    fn test_fermentable_cells_by_role() {
        let si = DisplayFormatter::new(UnitSystem::Si, 2);
        let malt = Fermentable::new("Munich")
            .with_amount_kg(1.5)
            .with_is_mashed(true)
            .with_color_srm(9.0);

        let cell = |column, role| FermentableColumns::cell(&malt, column, role, &si);
        assert_eq!(cell(FermentableColumns::NAME, ItemRole::Display).as_string(), Some("Munich"));
        assert_eq!(cell(FermentableColumns::TYPE, ItemRole::Display).as_string(), Some("Grain"));
        assert_eq!(
            cell(FermentableColumns::AMOUNT, ItemRole::Display).as_string(),
            Some("1.50 kg")
        );
        assert_eq!(cell(FermentableColumns::AMOUNT, ItemRole::Edit), ItemData::Float(1.5));
        assert_eq!(
            cell(FermentableColumns::MASHED, ItemRole::CheckState),
            ItemData::CheckState(CheckState::Checked)
        );
        assert!(cell(FermentableColumns::AMOUNT, ItemRole::CheckState).is_none());
        assert_eq!(
            cell(FermentableColumns::COLOR, ItemRole::Display).as_string(),
            Some("9.00 SRM")
        );
    }

    #[test]
    fn test_fermentable_edits_validate() {
        let si = DisplayFormatter::default();
        let malt = Fermentable::new("Wheat");
        let set =
            |column, value: ItemData| FermentableColumns::set_cell(&malt, column, &value, &si);

        assert!(set(FermentableColumns::AMOUNT, ItemData::from("750 g")));
        assert_eq!(malt.amount_kg(), 0.75);
        assert!(!set(FermentableColumns::AMOUNT, ItemData::from("heaps")));
        assert!(!set(FermentableColumns::AMOUNT, ItemData::Float(-1.0)));
        assert_eq!(malt.amount_kg(), 0.75);

        assert!(set(FermentableColumns::TYPE, ItemData::from("dry extract")));
        assert_eq!(malt.fermentable_type(), FermentableType::DryExtract);
        assert!(!set(FermentableColumns::TYPE, ItemData::from("Gravel")));

        assert!(set(FermentableColumns::MASHED, ItemData::CheckState(CheckState::Checked)));
        assert!(malt.is_mashed());
        assert!(!set(FermentableColumns::NAME, ItemData::from("   ")));
        assert!(!set(FermentableColumns::YIELD, ItemData::Float(140.0)));
    }

    #[test]
    fn test_hop_cells_and_edits() {
        let si = DisplayFormatter::new(UnitSystem::Si, 1);
        let hop = Hop::new("Fuggle").with_alpha_pct(4.5).with_time_min(60.0);

        assert_eq!(
            HopColumns::cell(&hop, HopColumns::ALPHA, ItemRole::Display, &si).as_string(),
            Some("4.5%")
        );
        assert_eq!(
            HopColumns::cell(&hop, HopColumns::TIME, ItemRole::Display, &si).as_string(),
            Some("60.0 min")
        );

        assert!(HopColumns::set_cell(&hop, HopColumns::USE, &ItemData::from("Dry Hop"), &si));
        assert_eq!(hop.hop_use(), HopUse::DryHop);
        assert!(HopColumns::set_cell(&hop, HopColumns::TIME, &ItemData::from("2 h"), &si));
        assert_eq!(hop.time_min(), 120.0);
        assert!(!HopColumns::set_cell(&hop, HopColumns::FORM, &ItemData::Int(2), &si));
        assert!(!HopColumns::is_checkable(HopColumns::FORM));
    }
}
