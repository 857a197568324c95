//! ISO 3166-2 side of the linkage.

use serde::{Deserialize, Serialize};

/// Language preferred when collapsing language variants of a subdivision.
pub const ENGLISH_LANGUAGE_CODE: &str = "en";

/// One row of the subdivision standard, possibly one of several language
/// variants for the same code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceRecord {
    #[serde(rename = "ctr_n")]
    pub country_name: String,
    #[serde(rename = "Subdivision.category")]
    pub category: String,
    #[serde(rename = "ISO3166_2.code")]
    pub code: String,
    #[serde(rename = "star")]
    pub star: String,
    #[serde(rename = "Subdivision.name")]
    pub name: String,
    #[serde(rename = "Local.variant")]
    pub local_variant: String,
    #[serde(rename = "Language.code")]
    pub language_code: String,
    #[serde(rename = "Romanization.system")]
    pub romanization_system: String,
    #[serde(rename = "Parent.subdivision")]
    pub parent_subdivision: String,
    #[serde(rename = "Country_code")]
    pub country_code: String,
    #[serde(rename = "Constituent_code")]
    pub constituent_code: String,
}

impl ReferenceRecord {
    /// Text the matcher compares against.
    pub fn comparison_name(&self) -> &str {
        &self.name
    }

    pub fn is_english(&self) -> bool {
        self.language_code == ENGLISH_LANGUAGE_CODE
    }
}

/// Every target-derived field a match carries.
///
/// Built only from a whole [`ReferenceRecord`], so a row's target fields are
/// always consistent with one reference row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubdivisionTarget {
    #[serde(rename = "Subdivision.name")]
    pub name: String,
    #[serde(rename = "Subdivision.category")]
    pub category: String,
    #[serde(rename = "ISO3166_2.code")]
    pub code: String,
    #[serde(rename = "star")]
    pub star: String,
    #[serde(rename = "Local.variant")]
    pub local_variant: String,
    #[serde(rename = "Language.code")]
    pub language_code: String,
    #[serde(rename = "Romanization.system")]
    pub romanization_system: String,
    #[serde(rename = "Parent.subdivision")]
    pub parent_subdivision: String,
    #[serde(rename = "ctr_n")]
    pub country_name: String,
    #[serde(rename = "Country_code")]
    pub country_code: String,
    #[serde(rename = "Constituent_code")]
    pub constituent_code: String,
}

impl From<&ReferenceRecord> for SubdivisionTarget {
    fn from(reference: &ReferenceRecord) -> Self {
        Self {
            name: reference.name.clone(),
            category: reference.category.clone(),
            code: reference.code.clone(),
            star: reference.star.clone(),
            local_variant: reference.local_variant.clone(),
            language_code: reference.language_code.clone(),
            romanization_system: reference.romanization_system.clone(),
            parent_subdivision: reference.parent_subdivision.clone(),
            country_name: reference.country_name.clone(),
            country_code: reference.country_code.clone(),
            constituent_code: reference.constituent_code.clone(),
        }
    }
}
