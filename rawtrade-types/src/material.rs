use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::primitives::{Address, MaterialId, Timestamp};

/// Category index of a listed material. The contract keeps one active-listing
/// index per category and encodes the enum as `uint8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum MaterialCategory {
    Metals = 0,
    Chemicals = 1,
    Energy = 2,
    Agricultural = 3,
    Textiles = 4,
    Minerals = 5,
}

impl MaterialCategory {
    /// Every category, in contract order.
    pub const ALL: [MaterialCategory; 6] = [
        MaterialCategory::Metals,
        MaterialCategory::Chemicals,
        MaterialCategory::Energy,
        MaterialCategory::Agricultural,
        MaterialCategory::Textiles,
        MaterialCategory::Minerals,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            MaterialCategory::Metals => "Metals",
            MaterialCategory::Chemicals => "Chemicals",
            MaterialCategory::Energy => "Energy",
            MaterialCategory::Agricultural => "Agricultural",
            MaterialCategory::Textiles => "Textiles",
            MaterialCategory::Minerals => "Minerals",
        }
    }
}

impl TryFrom<u8> for MaterialCategory {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| DomainError::UnknownCategory(value.to_string()))
    }
}

impl FromStr for MaterialCategory {
    type Err = DomainError;

    /// Accepts either the numeric index ("2") or the name ("energy").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<u8>() {
            return Self::try_from(index);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A material listing as reported by `getMaterialInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub category: MaterialCategory,
    pub supplier: Address,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub quality_grade: String,
    pub delivery_timeframe_days: u64,
}

/// Arguments of a `listMaterial` transaction.
///
/// Quantity, price and minimum order are confidential on the contract side and
/// never come back through the read interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialListing {
    pub name: String,
    pub category: MaterialCategory,
    pub quantity: u32,
    pub price_per_unit: u64,
    pub min_order: u32,
    pub quality_grade: String,
    pub delivery_timeframe_days: u64,
}

impl MaterialListing {
    /// Check required fields before anything is submitted.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingField("material name"));
        }
        if self.quality_grade.trim().is_empty() {
            return Err(DomainError::MissingField("quality grade"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> MaterialListing {
        MaterialListing {
            name: "Lithium carbonate".to_string(),
            category: MaterialCategory::Chemicals,
            quantity: 500,
            price_per_unit: 12,
            min_order: 10,
            quality_grade: "Battery grade".to_string(),
            delivery_timeframe_days: 30,
        }
    }

    #[test]
    fn test_category_indices_match_contract() {
        for (i, category) in MaterialCategory::ALL.iter().enumerate() {
            assert_eq!(category.as_u8() as usize, i);
            assert_eq!(MaterialCategory::try_from(i as u8).unwrap(), *category);
        }
        assert_eq!(MaterialCategory::ALL.len(), crate::constants::CATEGORY_COUNT as usize);
    }

    #[test]
    fn test_category_out_of_range() {
        assert_eq!(
            MaterialCategory::try_from(6),
            Err(DomainError::UnknownCategory("6".to_string()))
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("2".parse::<MaterialCategory>().unwrap(), MaterialCategory::Energy);
        assert_eq!("energy".parse::<MaterialCategory>().unwrap(), MaterialCategory::Energy);
        assert_eq!(" Textiles ".parse::<MaterialCategory>().unwrap(), MaterialCategory::Textiles);
        assert!("plastics".parse::<MaterialCategory>().is_err());
        assert!("9".parse::<MaterialCategory>().is_err());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(MaterialCategory::Agricultural.to_string(), "Agricultural");
    }

    #[test]
    fn test_listing_valid() {
        assert!(listing().validate().is_ok());
    }

    #[test]
    fn test_listing_requires_name() {
        let mut l = listing();
        l.name = "   ".to_string();
        assert_eq!(l.validate(), Err(DomainError::MissingField("material name")));
    }

    #[test]
    fn test_listing_requires_quality_grade() {
        let mut l = listing();
        l.quality_grade = String::new();
        assert_eq!(l.validate(), Err(DomainError::MissingField("quality grade")));
    }
}
