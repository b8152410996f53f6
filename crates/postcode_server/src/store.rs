//! Storage backends.
//!
//! Handlers talk to a [`Store`] only. The methods are blocking and are called from
//! `tokio::task::spawn_blocking`.

pub mod memory;
pub mod postgres;

use chrono::{DateTime, Utc};
use postcode_core::{
    CityRecord, OfficeRecord, PostalCode, PostalCodeRecord, Predicate, PrefectureCode,
    PrefectureRecord,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Data about the store that is shown in the stats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreMetadata {
    pub visitor_count: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A window into an ordered list of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

/// The records of a [`Page`] and the number of records in the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Paged<T> {
    /// Takes the page out of an already ordered list.
    pub fn from_ordered(records: impl IntoIterator<Item = T>, page: Page) -> Self {
        let mut total = 0;
        let mut items = Vec::new();
        for record in records {
            if total >= page.offset && items.len() < page.limit {
                items.push(record);
            }
            total += 1;
        }
        Self { total, items }
    }
}

pub trait Store: Send + Sync {
    /// A short name for logging.
    fn kind(&self) -> &'static str;

    fn postal_code(&self, code: &PostalCode) -> eyre::Result<Option<PostalCodeRecord>>;

    /// Returns at most `limit` records matching the predicate in postal code order.
    fn search_postal_codes(
        &self,
        predicate: &Predicate,
        limit: usize,
    ) -> eyre::Result<Vec<PostalCodeRecord>>;

    fn office(&self, code: &PostalCode) -> eyre::Result<Option<OfficeRecord>>;

    /// Returns at most `limit` offices matching the predicate in postal code order.
    fn search_offices(&self, predicate: &Predicate, limit: usize)
        -> eyre::Result<Vec<OfficeRecord>>;

    /// Returns a page of the postal codes of a city in postal code order.
    fn postal_codes_in_city(
        &self,
        local_gov_code: &str,
        page: Page,
    ) -> eyre::Result<Paged<PostalCodeRecord>>;

    /// Returns a page of the offices of a prefecture, given by name, in office name order.
    fn offices_in_prefecture(
        &self,
        prefecture: &str,
        page: Page,
    ) -> eyre::Result<Paged<OfficeRecord>>;

    fn prefectures(&self) -> eyre::Result<Vec<PrefectureRecord>>;

    fn cities(&self, prefecture: &PrefectureCode) -> eyre::Result<Vec<CityRecord>>;

    /// Atomically increments the visitor counter and returns the new count.
    fn increment_visitor_count(&self) -> eyre::Result<u64>;

    fn metadata(&self) -> eyre::Result<StoreMetadata>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pages_ordered_records() {
        let page = |limit, offset| Page { limit, offset };
        assert_eq!(
            Paged::from_ordered(1..=5, page(2, 1)),
            Paged {
                total: 5,
                items: vec![2, 3]
            }
        );
        assert_eq!(Paged::from_ordered(1..=5, page(10, 0)).items, [1, 2, 3, 4, 5]);
        let past_end = Paged::from_ordered(1..=5, page(2, 5));
        assert_eq!(past_end.total, 5);
        assert!(past_end.items.is_empty());
    }
}
