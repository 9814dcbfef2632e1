//! Unit conversion utilities
//!
//! Handles conversion between square meters, hectares and acres, and between
//! meters and kilometers. There is exactly one acre constant: every acre value
//! in Fieldmap is derived from hectares through [`ACRES_PER_HECTARE`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Square meters in one hectare
pub const SQ_METERS_PER_HECTARE: f64 = 10_000.0;

/// Acres in one hectare
pub const ACRES_PER_HECTARE: f64 = 2.47105;

/// Meters in one kilometer
pub const METERS_PER_KILOMETER: f64 = 1_000.0;

/// Area display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    /// Square meters
    SquareMeters,
    /// Hectares
    Hectares,
    /// Acres
    Acres,
}

impl Default for AreaUnit {
    fn default() -> Self {
        Self::Hectares
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SquareMeters => write!(f, "m²"),
            Self::Hectares => write!(f, "ha"),
            Self::Acres => write!(f, "acres"),
        }
    }
}

impl FromStr for AreaUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m2" | "m²" | "sqm" | "squaremeters" => Ok(Self::SquareMeters),
            "ha" | "hectare" | "hectares" => Ok(Self::Hectares),
            "ac" | "acre" | "acres" => Ok(Self::Acres),
            _ => Err(format!("Unknown area unit: {}", s)),
        }
    }
}

/// Convert square meters to hectares
pub fn sq_meters_to_hectares(sq_meters: f64) -> f64 {
    sq_meters / SQ_METERS_PER_HECTARE
}

/// Convert hectares to acres
pub fn hectares_to_acres(hectares: f64) -> f64 {
    hectares * ACRES_PER_HECTARE
}

/// Convert square meters to acres, always through hectares
pub fn sq_meters_to_acres(sq_meters: f64) -> f64 {
    hectares_to_acres(sq_meters_to_hectares(sq_meters))
}

/// Convert meters to kilometers
pub fn meters_to_km(meters: f64) -> f64 {
    meters / METERS_PER_KILOMETER
}

/// Convert an area in square meters to the given unit
pub fn convert_area(sq_meters: f64, unit: AreaUnit) -> f64 {
    match unit {
        AreaUnit::SquareMeters => sq_meters,
        AreaUnit::Hectares => sq_meters_to_hectares(sq_meters),
        AreaUnit::Acres => sq_meters_to_acres(sq_meters),
    }
}

/// Round to two decimals, the precision used for every displayed metric
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an area for display
///
/// * `sq_meters` - Area in square meters
/// * `unit` - Target unit
pub fn format_area(sq_meters: f64, unit: AreaUnit) -> String {
    format!("{:.2} {}", convert_area(sq_meters, unit), unit)
}

/// Format a length given in kilometers for display
pub fn format_length_km(km: f64) -> String {
    format!("{:.2} km", km)
}

/// The notice shown right after a polygon is drawn
pub fn area_notice(sq_meters: f64) -> String {
    format!("Área aproximada: {:.2} acres", sq_meters_to_acres(sq_meters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hectare_conversion() {
        assert_eq!(sq_meters_to_hectares(10_000.0), 1.0);
        assert_eq!(sq_meters_to_hectares(0.0), 0.0);
    }

    #[test]
    fn test_acre_conversion() {
        assert!((hectares_to_acres(1.0) - 2.47105).abs() < 1e-12);
        assert!((sq_meters_to_acres(10_000.0) - 2.47105).abs() < 1e-12);
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(10_000.0, AreaUnit::Hectares), "1.00 ha");
        assert_eq!(format_area(10_000.0, AreaUnit::Acres), "2.47 acres");
        assert_eq!(format_area(1234.5, AreaUnit::SquareMeters), "1234.50 m²");
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length_km(meters_to_km(1500.0)), "1.50 km");
    }

    #[test]
    fn test_area_notice() {
        assert_eq!(area_notice(40_468.6), "Área aproximada: 10.00 acres");
    }

    #[test]
    fn test_area_unit_parse() {
        assert_eq!("ha".parse::<AreaUnit>().unwrap(), AreaUnit::Hectares);
        assert_eq!("Acres".parse::<AreaUnit>().unwrap(), AreaUnit::Acres);
        assert!("furlongs".parse::<AreaUnit>().is_err());
    }

    proptest! {
        #[test]
        fn prop_acres_agree_with_hectares(sq_meters in 0.0f64..1.0e9) {
            let ha = sq_meters_to_hectares(sq_meters);
            let acres = sq_meters_to_acres(sq_meters);
            prop_assert_eq!(round2(ha * ACRES_PER_HECTARE), round2(acres));
        }
    }
}
