//! Internal unit system. Lengths are stored in millimetres and energies
//! (and momenta, with c = 1) in MeV, so a quantity is converted to a
//! reporting unit by dividing by that unit's constant.
use crate::Float;

pub const MM: Float = 1.0;
pub const UM: Float = 1e-3 * MM;
pub const NM: Float = 1e-6 * MM;
pub const CM: Float = 10.0 * MM;
pub const M: Float = 1000.0 * MM;
pub const KM: Float = 1000.0 * M;

pub const MEV: Float = 1.0;
pub const EV: Float = 1e-6 * MEV;
pub const KEV: Float = 1e-3 * MEV;
pub const GEV: Float = 1e3 * MEV;
pub const TEV: Float = 1e6 * MEV;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Category {
    Length,
    Energy,
}

const LENGTH_UNITS: [(&str, Float); 6] = [
    ("nm", NM),
    ("um", UM),
    ("mm", MM),
    ("cm", CM),
    ("m", M),
    ("km", KM),
];

const ENERGY_UNITS: [(&str, Float); 5] = [
    ("eV", EV),
    ("keV", KEV),
    ("MeV", MEV),
    ("GeV", GEV),
    ("TeV", TEV),
];

/// Formats `value` in the largest unit of `category` that keeps the
/// magnitude at or above 1. Zero is printed in the base unit.
pub fn best_unit(value: Float, category: Category) -> String {
    let table: &[(&str, Float)] = match category {
        Category::Length => &LENGTH_UNITS,
        Category::Energy => &ENERGY_UNITS,
    };
    let base = match category {
        Category::Length => "mm",
        Category::Energy => "MeV",
    };
    if value == 0.0 || !value.is_finite() {
        return format!("{} {}", value, base);
    }
    let abs = value.abs();
    let (name, scale) = table
        .iter()
        .rev()
        .find(|(_, scale)| abs >= *scale)
        .unwrap_or(&table[0]);
    format!("{} {}", value / scale, name)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn reporting_conversions() {
        assert_eq!(25.0 * MM / CM, 2.5);
        assert_eq!(1500.0 * MEV / GEV, 1.5);
    }

    #[test]
    fn best_unit_picks_largest_fitting_unit() {
        assert_eq!(best_unit(25.0, Category::Length), "2.5 cm");
        assert_eq!(best_unit(2500.0, Category::Length), "2.5 m");
        assert_eq!(best_unit(0.5, Category::Energy), "500 keV");
        assert_eq!(best_unit(2000.0, Category::Energy), "2 GeV");
        assert_eq!(best_unit(0.0, Category::Energy), "0 MeV");
    }

    #[test]
    fn best_unit_keeps_the_sign() {
        assert_eq!(best_unit(-30.0, Category::Length), "-3 cm");
    }
}
