//! Formatting and parsing of physical amounts.
//!
//! Domain records store canonical units (kilograms, degrees Celsius, minutes).
//! A [`UnitFormatter`] turns those into display strings in the user's unit
//! system and parses edited text back into canonical values.
//!
//! ```
//! use brewview::units::{DisplayFormatter, Quantity, UnitFormatter, UnitSystem};
//!
//! let si = DisplayFormatter::new(UnitSystem::Si, 2);
//! assert_eq!(si.display_amount(Quantity::Mass, 4.5), "4.50 kg");
//! assert_eq!(si.parse_amount(Quantity::Mass, "500 g"), Some(0.5));
//! ```

use serde::{Deserialize, Serialize};

const POUNDS_PER_KG: f64 = 2.204_622_621_8;
const OUNCES_PER_KG: f64 = 35.273_961_95;

/// The family of units the user reads amounts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Kilograms and degrees Celsius.
    #[default]
    Si,
    /// Pounds and degrees Fahrenheit.
    Imperial,
}

/// What a number measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Mass, stored in kilograms.
    Mass,
    /// Temperature, stored in degrees Celsius.
    Temperature,
    /// Duration, stored in minutes.
    Time,
    /// Color, stored in SRM.
    Color,
    /// A percentage.
    Percent,
    /// A plain number with no unit.
    Plain,
}

/// Converts canonical amounts to and from user-visible text.
pub trait UnitFormatter: Send + Sync {
    /// Formats a canonical value for display.
    fn display_amount(&self, quantity: Quantity, value: f64) -> String;

    /// Parses user text into a canonical value.
    ///
    /// Text without a unit suffix is read in the formatter's unit system.
    /// Returns `None` for text that is not a number or carries a suffix
    /// that does not fit the quantity.
    fn parse_amount(&self, quantity: Quantity, text: &str) -> Option<f64>;
}

/// The standard formatter: fixed precision in one unit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFormatter {
    system: UnitSystem,
    precision: usize,
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new(UnitSystem::Si, 3)
    }
}

impl DisplayFormatter {
    /// Creates a formatter printing `precision` decimals in `system`.
    pub fn new(system: UnitSystem, precision: usize) -> Self {
        Self { system, precision }
    }

    /// The unit system amounts are shown in.
    pub fn system(&self) -> UnitSystem {
        self.system
    }

    /// Number of decimals printed.
    pub fn precision(&self) -> usize {
        self.precision
    }

    fn display_unit(&self, quantity: Quantity) -> (f64, f64, &'static str) {
        // (scale, offset, suffix) applied as value * scale + offset
        match (quantity, self.system) {
            (Quantity::Mass, UnitSystem::Si) => (1.0, 0.0, "kg"),
            (Quantity::Mass, UnitSystem::Imperial) => (POUNDS_PER_KG, 0.0, "lb"),
            (Quantity::Temperature, UnitSystem::Si) => (1.0, 0.0, "C"),
            (Quantity::Temperature, UnitSystem::Imperial) => (1.8, 32.0, "F"),
            (Quantity::Time, _) => (1.0, 0.0, "min"),
            (Quantity::Color, _) => (1.0, 0.0, "SRM"),
            (Quantity::Percent, _) => (1.0, 0.0, "%"),
            (Quantity::Plain, _) => (1.0, 0.0, ""),
        }
    }
}

impl UnitFormatter for DisplayFormatter {
    fn display_amount(&self, quantity: Quantity, value: f64) -> String {
        let (scale, offset, suffix) = self.display_unit(quantity);
        let shown = value * scale + offset;
        let precision = self.precision;
        match suffix {
            "" => format!("{shown:.precision$}"),
            "%" => format!("{shown:.precision$}%"),
            _ => format!("{shown:.precision$} {suffix}"),
        }
    }

    fn parse_amount(&self, quantity: Quantity, text: &str) -> Option<f64> {
        let text = text.trim();
        let split = text
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
            .unwrap_or(text.len());
        let (number, suffix) = text.split_at(split);
        let number: f64 = number.trim().parse().ok()?;
        if !number.is_finite() {
            return None;
        }
        let suffix = suffix.trim().trim_start_matches('°').to_ascii_lowercase();

        match quantity {
            Quantity::Mass => match suffix.as_str() {
                "" => Some(match self.system {
                    UnitSystem::Si => number,
                    UnitSystem::Imperial => number / POUNDS_PER_KG,
                }),
                "kg" => Some(number),
                "g" => Some(number / 1000.0),
                "lb" | "lbs" => Some(number / POUNDS_PER_KG),
                "oz" => Some(number / OUNCES_PER_KG),
                _ => None,
            },
            Quantity::Temperature => match suffix.as_str() {
                "" => Some(match self.system {
                    UnitSystem::Si => number,
                    UnitSystem::Imperial => (number - 32.0) / 1.8,
                }),
                "c" => Some(number),
                "f" => Some((number - 32.0) / 1.8),
                _ => None,
            },
            Quantity::Time => match suffix.as_str() {
                "" | "min" => Some(number),
                "h" | "hr" => Some(number * 60.0),
                _ => None,
            },
            Quantity::Color => matches!(suffix.as_str(), "" | "srm").then_some(number),
            Quantity::Percent => matches!(suffix.as_str(), "" | "%").then_some(number),
            Quantity::Plain => suffix.is_empty().then_some(number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_si_and_imperial() {
        let si = DisplayFormatter::new(UnitSystem::Si, 3);
        assert_eq!(si.display_amount(Quantity::Mass, 2.0), "2.000 kg");
        assert_eq!(si.display_amount(Quantity::Temperature, 67.0), "67.000 C");
        assert_eq!(si.display_amount(Quantity::Percent, 80.5), "80.500%");

        let imperial = DisplayFormatter::new(UnitSystem::Imperial, 1);
        assert_eq!(imperial.display_amount(Quantity::Mass, 1.0), "2.2 lb");
        assert_eq!(imperial.display_amount(Quantity::Temperature, 100.0), "212.0 F");
        assert_eq!(imperial.display_amount(Quantity::Time, 60.0), "60.0 min");
    }

    #[test]
    fn test_parse_with_suffixes() {
        let si = DisplayFormatter::default();
        assert_eq!(si.parse_amount(Quantity::Mass, "2.5"), Some(2.5));
        assert_eq!(si.parse_amount(Quantity::Mass, " 250 g "), Some(0.25));
        assert_eq!(si.parse_amount(Quantity::Temperature, "212 °F"), Some(100.0));
        assert_eq!(si.parse_amount(Quantity::Time, "1.5 h"), Some(90.0));
        assert_eq!(si.parse_amount(Quantity::Percent, "5%"), Some(5.0));

        let lb = si.parse_amount(Quantity::Mass, "1 lb").unwrap();
        assert!((lb - 0.453_592).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let si = DisplayFormatter::default();
        assert_eq!(si.parse_amount(Quantity::Mass, "lots"), None);
        assert_eq!(si.parse_amount(Quantity::Mass, "3 furlongs"), None);
        assert_eq!(si.parse_amount(Quantity::Time, "5 kg"), None);
        assert_eq!(si.parse_amount(Quantity::Plain, ""), None);
    }

    #[test]
    fn test_imperial_bare_numbers() {
        let imperial = DisplayFormatter::new(UnitSystem::Imperial, 2);
        let kg = imperial.parse_amount(Quantity::Mass, "2.2046226218").unwrap();
        assert!((kg - 1.0).abs() < 1e-9);
        assert_eq!(imperial.parse_amount(Quantity::Temperature, "212"), Some(100.0));
    }
}
