//! Aircraft model
//!
//! An aircraft is immutable once created. Its size class and weight fix the
//! minimum runway length it needs to land.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ParseError;

/// Extra runway length required per tonne of landing weight (metres)
pub const LENGTH_PER_TONNE: u32 = 2;

/// Aircraft size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    /// Runway length needed before weight is taken into account (metres)
    pub fn base_runway_length(self) -> u32 {
        match self {
            SizeClass::Small => 800,
            SizeClass::Medium => 1_600,
            SizeClass::Large => 2_600,
        }
    }

    /// Typical landing weight range in tonnes (inclusive)
    pub fn weight_range(self) -> (u32, u32) {
        match self {
            SizeClass::Small => (5, 40),
            SizeClass::Medium => (50, 90),
            SizeClass::Large => (150, 350),
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        };
        f.write_str(name)
    }
}

impl FromStr for SizeClass {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(SizeClass::Small),
            "medium" => Ok(SizeClass::Medium),
            "large" => Ok(SizeClass::Large),
            other => Err(ParseError::UnknownSizeClass(other.to_string())),
        }
    }
}

/// An aircraft on approach
///
/// # Example
/// ```
/// use airport_simulator_core_rs::models::{Aircraft, SizeClass};
///
/// let aircraft = Aircraft::new("A320", SizeClass::Medium, 70);
/// assert_eq!(aircraft.required_runway_length(), 1_600 + 70 * 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    type_code: String,
    size: SizeClass,
    weight_tonnes: u32,
    required_runway_length: u32,
}

impl Aircraft {
    pub fn new(type_code: impl Into<String>, size: SizeClass, weight_tonnes: u32) -> Self {
        let required_runway_length = size.base_runway_length() + weight_tonnes * LENGTH_PER_TONNE;
        Self {
            type_code: type_code.into(),
            size,
            weight_tonnes,
            required_runway_length,
        }
    }

    pub fn type_code(&self) -> &str {
        &self.type_code
    }

    pub fn size(&self) -> SizeClass {
        self.size
    }

    pub fn weight_tonnes(&self) -> u32 {
        self.weight_tonnes
    }

    /// Minimum runway length this aircraft can land on (metres)
    pub fn required_runway_length(&self) -> u32 {
        self.required_runway_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_length_grows_with_weight() {
        let light = Aircraft::new("E175", SizeClass::Medium, 50);
        let heavy = Aircraft::new("A321", SizeClass::Medium, 90);
        assert!(heavy.required_runway_length() > light.required_runway_length());
    }

    #[test]
    fn test_size_class_parse() {
        assert_eq!("Large".parse::<SizeClass>().unwrap(), SizeClass::Large);
        assert!(matches!(
            "jumbo".parse::<SizeClass>(),
            Err(ParseError::UnknownSizeClass(_))
        ));
    }
}
