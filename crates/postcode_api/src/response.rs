//! Types for responses from the server to clients.

pub use chrono::{DateTime, Utc};
use postcode_core::records;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalCode {
    pub postal_code: String,
    pub prefecture: String,
    pub prefecture_kana: String,
    pub city: String,
    pub city_kana: String,
    pub town: String,
    pub town_kana: String,
}

impl From<records::PostalCodeRecord> for PostalCode {
    fn from(record: records::PostalCodeRecord) -> Self {
        Self {
            postal_code: record.postal_code.into(),
            prefecture: record.prefecture,
            prefecture_kana: record.prefecture_kana,
            city: record.city,
            city_kana: record.city_kana,
            town: record.town,
            town_kana: record.town_kana,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Office {
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub office_name: String,
    pub office_kana: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
}

impl From<records::OfficeRecord> for Office {
    fn from(record: records::OfficeRecord) -> Self {
        Self {
            postal_code: record.postal_code.into(),
            prefecture: record.prefecture,
            city: record.city,
            office_name: record.office_name,
            office_kana: record.office_kana,
            address_detail: record.address_detail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefecture {
    pub code: String,
    pub name: String,
    pub name_kana: String,
}

impl From<records::PrefectureRecord> for Prefecture {
    fn from(record: records::PrefectureRecord) -> Self {
        Self {
            code: record.code.into(),
            name: record.name,
            name_kana: record.name_kana,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub code: String,
    pub prefecture_code: String,
    pub name: String,
    pub name_kana: String,
}

impl From<records::CityRecord> for City {
    fn from(record: records::CityRecord) -> Self {
        Self {
            code: record.code,
            prefecture_code: record.prefecture_code.into(),
            name: record.name,
            name_kana: record.name_kana,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }

    /// A page of a longer list, where `total` counts the whole list.
    pub fn page(total: usize, items: Vec<T>) -> Self {
        Self { total, items }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub name: String,
    pub version: String,
    pub runtime: String,
    pub visitor_count: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}
