//! The seven character attributes

use crate::error::{Error, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest legal attribute value
pub const ATTRIBUTE_MIN: i32 = 1;
/// Highest legal attribute value
pub const ATTRIBUTE_MAX: i32 = 10;

/// A named character attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Cunning,
    GripStrength,
    Patience,
    SpatialSense,
    Stamina,
    BookLearning,
    AdministrativeLuck,
}

impl Attribute {
    pub const ALL: [Attribute; 7] = [
        Attribute::Cunning,
        Attribute::GripStrength,
        Attribute::Patience,
        Attribute::SpatialSense,
        Attribute::Stamina,
        Attribute::BookLearning,
        Attribute::AdministrativeLuck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Cunning => "cunning",
            Attribute::GripStrength => "grip_strength",
            Attribute::Patience => "patience",
            Attribute::SpatialSense => "spatial_sense",
            Attribute::Stamina => "stamina",
            Attribute::BookLearning => "book_learning",
            Attribute::AdministrativeLuck => "administrative_luck",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| Error::UnknownAttribute(s.to_string()))
    }
}

/// Exactly seven attribute values, each in `[1, 10]`
///
/// The fixed-size array makes the attribute count impossible to get wrong;
/// the range is enforced by [`AttributeSet::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeSet([i32; 7]);

impl<'de> Deserialize<'de> for AttributeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Values([i32; 7]);

        let Values(values) = Values::deserialize(deserializer)?;
        AttributeSet::new(values).map_err(de::Error::custom)
    }
}

impl AttributeSet {
    /// Build from values in [`Attribute::ALL`] order
    pub fn new(values: [i32; 7]) -> Result<Self> {
        for (attribute, value) in Attribute::ALL.iter().zip(values) {
            if !(ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&value) {
                return Err(Error::AttributeOutOfRange {
                    attribute: attribute.to_string(),
                    value,
                });
            }
        }
        Ok(Self(values))
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        self.0[attribute.index()]
    }

    /// Iterate `(attribute, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        Attribute::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Highest value minus lowest value
    pub fn spread(&self) -> i32 {
        let max = self.0.iter().max().copied().unwrap_or(ATTRIBUTE_MIN);
        let min = self.0.iter().min().copied().unwrap_or(ATTRIBUTE_MIN);
        max - min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_set_bounds() {
        assert!(AttributeSet::new([1, 2, 3, 4, 5, 6, 10]).is_ok());
        assert_eq!(
            AttributeSet::new([0, 2, 3, 4, 5, 6, 7]),
            Err(Error::AttributeOutOfRange {
                attribute: "cunning".to_string(),
                value: 0
            })
        );
        assert!(AttributeSet::new([1, 2, 3, 4, 5, 6, 11]).is_err());
    }

    #[test]
    fn test_attribute_lookup_and_spread() {
        let set = AttributeSet::new([9, 2, 3, 4, 5, 6, 1]).unwrap();
        assert_eq!(set.get(Attribute::Cunning), 9);
        assert_eq!(set.get(Attribute::AdministrativeLuck), 1);
        assert_eq!(set.spread(), 8);
        assert_eq!(set.iter().count(), 7);
    }

    #[test]
    fn test_deserialize_enforces_bounds() {
        let set = AttributeSet::new([9, 2, 3, 4, 5, 6, 1]).unwrap();
        let text = ron::to_string(&set).unwrap();
        assert_eq!(ron::from_str::<AttributeSet>(&text).unwrap(), set);

        let tampered = text.replacen('9', "0", 1);
        assert!(ron::from_str::<AttributeSet>(&tampered).is_err());
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!("grip_strength".parse::<Attribute>().unwrap(), Attribute::GripStrength);
        assert!("charm".parse::<Attribute>().is_err());
    }
}
