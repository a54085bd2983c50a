//! The unit table: token → (scale, optional offset, dimension).
//!
//! Conversion to base SI is `base = value * scale + offset`.  Units with an
//! offset (Celsius, Fahrenheit) are *affine*.  The standard table is built
//! once and shared read-only; custom tables are assembled with
//! [`UnitTable::builder`].

use std::collections::HashMap;
use std::sync::OnceLock;

use mt_core::Real;

use crate::dimension::Dimension;

/// One row of the unit table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitEntry {
    /// Multiplicative factor to base SI.
    pub scale: Real,
    /// Additive offset to base SI, for affine units.
    pub offset: Option<Real>,
    /// Exponent vector.
    pub dimension: Dimension,
}

impl UnitEntry {
    /// Purely multiplicative unit.
    pub const fn linear(scale: Real, dimension: [Real; 5]) -> Self {
        Self {
            scale,
            offset: None,
            dimension: Dimension::new(dimension),
        }
    }

    /// Affine unit (`base = value * scale + offset`).
    pub const fn affine(scale: Real, offset: Real, dimension: [Real; 5]) -> Self {
        Self {
            scale,
            offset: Some(offset),
            dimension: Dimension::new(dimension),
        }
    }

    /// `true` if converting needs an offset.
    pub fn is_affine(&self) -> bool {
        self.offset.is_some()
    }
}

const MASS: [Real; 5] = [1.0, 0.0, 0.0, 0.0, 0.0];
const LENGTH: [Real; 5] = [0.0, 1.0, 0.0, 0.0, 0.0];
const TIME: [Real; 5] = [0.0, 0.0, 1.0, 0.0, 0.0];
const TEMPERATURE: [Real; 5] = [0.0, 0.0, 0.0, 1.0, 0.0];
const AMOUNT: [Real; 5] = [0.0, 0.0, 0.0, 0.0, 1.0];
const FORCE: [Real; 5] = [1.0, 1.0, -2.0, 0.0, 0.0];
const ENERGY: [Real; 5] = [1.0, 2.0, -2.0, 0.0, 0.0];
const POWER: [Real; 5] = [1.0, 2.0, -3.0, 0.0, 0.0];
const PRESSURE: [Real; 5] = [1.0, -1.0, -2.0, 0.0, 0.0];
const VOLUME: [Real; 5] = [0.0, 3.0, 0.0, 0.0, 0.0];
const FREQUENCY: [Real; 5] = [0.0, 0.0, -1.0, 0.0, 0.0];

const RANKINE: Real = 5.0 / 9.0;
const POUND: Real = 0.453_592_37;

/// Units known to [`UnitTable::standard`].
const STANDARD_UNITS: &[(&str, UnitEntry)] = &[
    // mass
    ("kg", UnitEntry::linear(1.0, MASS)),
    ("g", UnitEntry::linear(1e-3, MASS)),
    ("mg", UnitEntry::linear(1e-6, MASS)),
    ("lb", UnitEntry::linear(POUND, MASS)),
    ("lbm", UnitEntry::linear(POUND, MASS)),
    ("oz", UnitEntry::linear(POUND / 16.0, MASS)),
    ("slug", UnitEntry::linear(14.593_902_937_206_4, MASS)),
    ("ton", UnitEntry::linear(2000.0 * POUND, MASS)),
    ("tonne", UnitEntry::linear(1000.0, MASS)),
    // length
    ("m", UnitEntry::linear(1.0, LENGTH)),
    ("km", UnitEntry::linear(1e3, LENGTH)),
    ("cm", UnitEntry::linear(1e-2, LENGTH)),
    ("mm", UnitEntry::linear(1e-3, LENGTH)),
    ("um", UnitEntry::linear(1e-6, LENGTH)),
    ("nm", UnitEntry::linear(1e-9, LENGTH)),
    ("in", UnitEntry::linear(0.0254, LENGTH)),
    ("ft", UnitEntry::linear(0.3048, LENGTH)),
    ("yd", UnitEntry::linear(0.9144, LENGTH)),
    ("mi", UnitEntry::linear(1609.344, LENGTH)),
    // time
    ("s", UnitEntry::linear(1.0, TIME)),
    ("sec", UnitEntry::linear(1.0, TIME)),
    ("ms", UnitEntry::linear(1e-3, TIME)),
    ("min", UnitEntry::linear(60.0, TIME)),
    ("h", UnitEntry::linear(3600.0, TIME)),
    ("hr", UnitEntry::linear(3600.0, TIME)),
    ("day", UnitEntry::linear(86_400.0, TIME)),
    ("yr", UnitEntry::linear(31_557_600.0, TIME)),
    // temperature
    ("k", UnitEntry::linear(1.0, TEMPERATURE)),
    ("r", UnitEntry::linear(RANKINE, TEMPERATURE)),
    ("c", UnitEntry::affine(1.0, 273.15, TEMPERATURE)),
    ("f", UnitEntry::affine(RANKINE, 459.67 * RANKINE, TEMPERATURE)),
    // amount of substance
    ("mol", UnitEntry::linear(1.0, AMOUNT)),
    ("kmol", UnitEntry::linear(1e3, AMOUNT)),
    ("lbmol", UnitEntry::linear(1e3 * POUND, AMOUNT)),
    // force
    ("n", UnitEntry::linear(1.0, FORCE)),
    ("kn", UnitEntry::linear(1e3, FORCE)),
    ("dyn", UnitEntry::linear(1e-5, FORCE)),
    ("lbf", UnitEntry::linear(4.448_221_615_260_5, FORCE)),
    // energy
    ("j", UnitEntry::linear(1.0, ENERGY)),
    ("kj", UnitEntry::linear(1e3, ENERGY)),
    ("cal", UnitEntry::linear(4.184, ENERGY)),
    ("kcal", UnitEntry::linear(4184.0, ENERGY)),
    ("btu", UnitEntry::linear(1055.055_852_62, ENERGY)),
    ("erg", UnitEntry::linear(1e-7, ENERGY)),
    ("wh", UnitEntry::linear(3600.0, ENERGY)),
    ("kwh", UnitEntry::linear(3.6e6, ENERGY)),
    // power
    ("w", UnitEntry::linear(1.0, POWER)),
    ("kw", UnitEntry::linear(1e3, POWER)),
    ("hp", UnitEntry::linear(745.699_871_582_270_2, POWER)),
    // pressure
    ("pa", UnitEntry::linear(1.0, PRESSURE)),
    ("kpa", UnitEntry::linear(1e3, PRESSURE)),
    ("mpa", UnitEntry::linear(1e6, PRESSURE)),
    ("bar", UnitEntry::linear(1e5, PRESSURE)),
    ("atm", UnitEntry::linear(101_325.0, PRESSURE)),
    ("psi", UnitEntry::linear(6894.757_293_168_361, PRESSURE)),
    ("torr", UnitEntry::linear(101_325.0 / 760.0, PRESSURE)),
    // volume
    ("l", UnitEntry::linear(1e-3, VOLUME)),
    ("ml", UnitEntry::linear(1e-6, VOLUME)),
    ("gal", UnitEntry::linear(3.785_411_784e-3, VOLUME)),
    // frequency
    ("hz", UnitEntry::linear(1.0, FREQUENCY)),
];

/// Immutable mapping from lower-case unit token to [`UnitEntry`].
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    entries: HashMap<String, UnitEntry>,
}

static STANDARD: OnceLock<UnitTable> = OnceLock::new();

impl UnitTable {
    /// The process-wide standard table, built on first use.
    pub fn standard() -> &'static UnitTable {
        STANDARD.get_or_init(|| UnitTable::builder().with_standard_units().build())
    }

    /// Start an empty table.
    pub fn builder() -> UnitTableBuilder {
        UnitTableBuilder::default()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, token: &str) -> Option<&UnitEntry> {
        self.entries.get(&token.to_lowercase())
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the table has no tokens.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known tokens, in no particular order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Builder for custom [`UnitTable`]s.
#[derive(Debug, Default)]
pub struct UnitTableBuilder {
    entries: HashMap<String, UnitEntry>,
}

impl UnitTableBuilder {
    /// Add every standard unit.
    pub fn with_standard_units(mut self) -> Self {
        for (token, entry) in STANDARD_UNITS {
            self.entries.insert((*token).to_string(), *entry);
        }
        self
    }

    /// Add or replace one unit.  Tokens are case-insensitive.
    pub fn unit(mut self, token: &str, entry: UnitEntry) -> Self {
        self.entries.insert(token.to_lowercase(), entry);
        self
    }

    /// Freeze the table.
    pub fn build(self) -> UnitTable {
        UnitTable {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tokens_are_lower_case_and_unique() {
        let table = UnitTable::standard();
        assert_eq!(table.len(), STANDARD_UNITS.len());
        assert!(table.tokens().all(|t| t == t.to_lowercase()));
    }

    #[test]
    fn lookup_ignores_case() {
        let table = UnitTable::standard();
        assert_eq!(table.get("Pa"), table.get("pa"));
        assert_eq!(table.get("BTU").map(|e| e.scale), Some(1055.055_852_62));
        assert!(table.get("furlong").is_none());
    }

    #[test]
    fn affine_entries() {
        let table = UnitTable::standard();
        assert!(table.get("C").unwrap().is_affine());
        assert!(table.get("F").unwrap().is_affine());
        assert!(!table.get("K").unwrap().is_affine());
    }

    #[test]
    fn custom_table_extends_standard() {
        let table = UnitTable::builder()
            .with_standard_units()
            .unit("Furlong", UnitEntry::linear(201.168, LENGTH))
            .build();
        assert_eq!(table.get("furlong").map(|e| e.scale), Some(201.168));
        assert!(UnitTable::standard().get("furlong").is_none());
    }
}
