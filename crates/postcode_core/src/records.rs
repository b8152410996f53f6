//! Records held by the stores.

use crate::{Field, PostalCode, PrefectureCode};
use serde::{Deserialize, Serialize};

/// An address and its readings for a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalCodeRecord {
    pub postal_code: PostalCode,
    /// The 5 digit code of the city the address belongs to.
    pub local_gov_code: String,
    pub prefecture: String,
    pub prefecture_kana: String,
    pub city: String,
    pub city_kana: String,
    pub town: String,
    pub town_kana: String,
}

impl PostalCodeRecord {
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Prefecture => Some(&self.prefecture),
            Field::PrefectureKana => Some(&self.prefecture_kana),
            Field::City => Some(&self.city),
            Field::CityKana => Some(&self.city_kana),
            Field::Town => Some(&self.town),
            Field::TownKana => Some(&self.town_kana),
            Field::OfficeName | Field::OfficeKana => None,
        }
    }
}

/// A business office with its own dedicated postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeRecord {
    pub postal_code: PostalCode,
    pub prefecture: String,
    pub city: String,
    pub office_name: String,
    pub office_kana: String,
    #[serde(default)]
    pub address_detail: Option<String>,
}

impl OfficeRecord {
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Prefecture => Some(&self.prefecture),
            Field::City => Some(&self.city),
            Field::OfficeName => Some(&self.office_name),
            Field::OfficeKana => Some(&self.office_kana),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefectureRecord {
    pub code: PrefectureCode,
    pub name: String,
    pub name_kana: String,
}

/// A city, ward, town or village identified by its local government code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub code: String,
    pub prefecture_code: PrefectureCode,
    pub name: String,
    pub name_kana: String,
}
