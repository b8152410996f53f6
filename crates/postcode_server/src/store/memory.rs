//! A store that keeps everything in memory, loaded from a JSON fixture.

use super::{Page, Paged, Store, StoreMetadata};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use postcode_core::{
    prefectures, CityRecord, OfficeRecord, PostalCode, PostalCodeRecord, Predicate,
    PrefectureCode, PrefectureRecord,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

/// The contents of a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub postal_codes: Vec<PostalCodeRecord>,
    #[serde(default)]
    pub offices: Vec<OfficeRecord>,
    /// Defaults to all of the prefectures.
    #[serde(default = "prefectures::prefecture_records")]
    pub prefectures: Vec<PrefectureRecord>,
    #[serde(default)]
    pub cities: Vec<CityRecord>,
    #[serde(default)]
    pub visitor_count: u64,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

pub struct MemoryStore {
    postal_codes: BTreeMap<PostalCode, PostalCodeRecord>,
    offices: BTreeMap<PostalCode, OfficeRecord>,
    prefectures: Vec<PrefectureRecord>,
    cities: Vec<CityRecord>,
    visitor_count: AtomicU64,
    last_updated: Option<DateTime<Utc>>,
}

impl MemoryStore {
    /// Builds the store. When a postal code appears more than once, the first record is kept.
    pub fn new(fixture: Fixture) -> Self {
        let mut postal_codes = BTreeMap::new();
        for record in fixture.postal_codes {
            postal_codes
                .entry(record.postal_code.clone())
                .or_insert(record);
        }
        let mut offices = BTreeMap::new();
        for record in fixture.offices {
            offices.entry(record.postal_code.clone()).or_insert(record);
        }
        Self {
            postal_codes,
            offices,
            prefectures: fixture.prefectures,
            cities: fixture.cities,
            visitor_count: AtomicU64::new(fixture.visitor_count),
            last_updated: fixture.last_updated,
        }
    }

    pub fn from_json(json: &str) -> eyre::Result<Self> {
        let fixture: Fixture = serde_json::from_str(json).wrap_err("Invalid fixture")?;
        Ok(Self::new(fixture))
    }

    pub fn open(path: &Path) -> eyre::Result<Self> {
        tracing::info!("Loading fixture from {}", path.display());
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read fixture at {}", path.display()))?;
        let store = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} postal codes and {} offices",
            store.postal_codes.len(),
            store.offices.len()
        );
        Ok(store)
    }
}

impl Store for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn postal_code(&self, code: &PostalCode) -> eyre::Result<Option<PostalCodeRecord>> {
        Ok(self.postal_codes.get(code).cloned())
    }

    fn search_postal_codes(
        &self,
        predicate: &Predicate,
        limit: usize,
    ) -> eyre::Result<Vec<PostalCodeRecord>> {
        tracing::debug!("Filtering postal codes with {predicate}");
        let records = self
            .postal_codes
            .values()
            .filter(|record| predicate.matches(&|field| record.field(field)))
            .take(limit)
            .cloned()
            .collect();
        Ok(records)
    }

    fn office(&self, code: &PostalCode) -> eyre::Result<Option<OfficeRecord>> {
        Ok(self.offices.get(code).cloned())
    }

    fn search_offices(
        &self,
        predicate: &Predicate,
        limit: usize,
    ) -> eyre::Result<Vec<OfficeRecord>> {
        tracing::debug!("Filtering offices with {predicate}");
        let records = self
            .offices
            .values()
            .filter(|record| predicate.matches(&|field| record.field(field)))
            .take(limit)
            .cloned()
            .collect();
        Ok(records)
    }

    fn postal_codes_in_city(
        &self,
        local_gov_code: &str,
        page: Page,
    ) -> eyre::Result<Paged<PostalCodeRecord>> {
        let records = self
            .postal_codes
            .values()
            .filter(|record| record.local_gov_code == local_gov_code)
            .cloned();
        Ok(Paged::from_ordered(records, page))
    }

    fn offices_in_prefecture(
        &self,
        prefecture: &str,
        page: Page,
    ) -> eyre::Result<Paged<OfficeRecord>> {
        let mut records = self
            .offices
            .values()
            .filter(|record| record.prefecture == prefecture)
            .collect::<Vec<_>>();
        // stable, so offices sharing a name stay in postal code order
        records.sort_by(|a, b| a.office_name.cmp(&b.office_name));
        Ok(Paged::from_ordered(records.into_iter().cloned(), page))
    }

    fn prefectures(&self) -> eyre::Result<Vec<PrefectureRecord>> {
        Ok(self.prefectures.clone())
    }

    fn cities(&self, prefecture: &PrefectureCode) -> eyre::Result<Vec<CityRecord>> {
        let cities = self
            .cities
            .iter()
            .filter(|city| &city.prefecture_code == prefecture)
            .cloned()
            .collect();
        Ok(cities)
    }

    fn increment_visitor_count(&self) -> eyre::Result<u64> {
        Ok(self.visitor_count.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn metadata(&self) -> eyre::Result<StoreMetadata> {
        Ok(StoreMetadata {
            visitor_count: Some(self.visitor_count.load(Ordering::SeqCst)),
            last_updated: self.last_updated,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use postcode_core::{Field, SearchQuery};
    use std::io::Write;

    fn record(code: &str, city: &str, town: &str) -> PostalCodeRecord {
        let local_gov_code = match city {
            "千代田区" => "13101",
            "町田市" => "13209",
            _ => "00000",
        };
        PostalCodeRecord {
            postal_code: PostalCode::parse(code).unwrap(),
            local_gov_code: local_gov_code.to_string(),
            prefecture: "東京都".to_string(),
            prefecture_kana: "トウキョウト".to_string(),
            city: city.to_string(),
            city_kana: String::new(),
            town: town.to_string(),
            town_kana: String::new(),
        }
    }

    fn office(code: &str, prefecture: &str, name: &str) -> OfficeRecord {
        OfficeRecord {
            postal_code: PostalCode::parse(code).unwrap(),
            prefecture: prefecture.to_string(),
            city: String::new(),
            office_name: name.to_string(),
            office_kana: String::new(),
            address_detail: None,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new(Fixture {
            postal_codes: vec![
                record("1940212", "町田市", "小山町"),
                record("1000001", "千代田区", "千代田"),
                record("1940013", "町田市", "原町田"),
                record("1000001", "重複", "重複"),
            ],
            offices: vec![
                office("1008994", "東京都", "東京中央郵便局"),
                office("5308797", "大阪府", "大阪中央郵便局"),
                office("1008798", "東京都", "日本郵便株式会社"),
                office("1008799", "東京都", "日本郵便株式会社"),
            ],
            ..Fixture::default()
        })
    }

    #[test]
    fn keeps_first_duplicate() {
        let store = store();
        let code = PostalCode::parse("1000001").unwrap();
        let record = store.postal_code(&code).unwrap().unwrap();
        assert_eq!(record.city, "千代田区");
    }

    #[test]
    fn searches_in_code_order() {
        let store = store();
        let predicate = SearchQuery::parse("東京").unwrap().predicate(&Field::ADDRESS);
        let records = store.search_postal_codes(&predicate, 10).unwrap();
        let codes = records
            .iter()
            .map(|r| r.postal_code.as_str())
            .collect::<Vec<_>>();
        assert_eq!(codes, ["1000001", "1940013", "1940212"]);

        let records = store.search_postal_codes(&predicate, 2).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn searches_split_compound_names() {
        let store = store();
        let predicate = SearchQuery::parse("町田市小山町")
            .unwrap()
            .predicate(&Field::ADDRESS);
        let records = store.search_postal_codes(&predicate, 10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].postal_code.as_str(), "1940212");
    }

    #[test]
    fn matches_supplementary_plane_characters() {
        let store = MemoryStore::new(Fixture {
            postal_codes: vec![record("1000001", "千代田区", "千代田𠮷")],
            ..Fixture::default()
        });
        let predicate = Predicate::prefix(Field::Town, "千代田");
        let records = store.search_postal_codes(&predicate, 10).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn pages_postal_codes_of_city() {
        let store = store();
        let page = Page {
            limit: 10,
            offset: 0,
        };
        let city = store.postal_codes_in_city("13209", page).unwrap();
        assert_eq!(city.total, 2);
        let codes = city
            .items
            .iter()
            .map(|r| r.postal_code.as_str())
            .collect::<Vec<_>>();
        assert_eq!(codes, ["1940013", "1940212"]);

        let page = Page {
            limit: 1,
            offset: 1,
        };
        let city = store.postal_codes_in_city("13209", page).unwrap();
        assert_eq!(city.total, 2);
        assert_eq!(city.items[0].postal_code.as_str(), "1940212");

        let none = store.postal_codes_in_city("99999", page).unwrap();
        assert_eq!(none.total, 0);
    }

    #[test]
    fn orders_offices_of_prefecture_by_name() {
        let store = store();
        let page = Page {
            limit: 10,
            offset: 0,
        };
        let offices = store.offices_in_prefecture("東京都", page).unwrap();
        assert_eq!(offices.total, 3);
        let codes = offices
            .items
            .iter()
            .map(|r| r.postal_code.as_str())
            .collect::<Vec<_>>();
        assert_eq!(codes, ["1008798", "1008799", "1008994"]);

        let page = Page {
            limit: 1,
            offset: 2,
        };
        let offices = store.offices_in_prefecture("東京都", page).unwrap();
        assert_eq!(offices.total, 3);
        assert_eq!(offices.items[0].office_name, "東京中央郵便局");

        let offices = store.offices_in_prefecture("東京", page).unwrap();
        assert_eq!(offices.total, 0);
    }

    #[test]
    fn counts_visitors() {
        let store = store();
        assert_eq!(store.metadata().unwrap().visitor_count, Some(0));
        assert_eq!(store.increment_visitor_count().unwrap(), 1);
        assert_eq!(store.increment_visitor_count().unwrap(), 2);
        assert_eq!(store.metadata().unwrap().visitor_count, Some(2));
    }

    #[test]
    fn defaults_to_all_prefectures() {
        let store = MemoryStore::from_json("{}").unwrap();
        assert_eq!(store.prefectures().unwrap().len(), 47);
    }

    #[test]
    fn opens_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "postal_codes": [{{
                    "postal_code": "100-0001",
                    "local_gov_code": "13101",
                    "prefecture": "東京都",
                    "prefecture_kana": "トウキョウト",
                    "city": "千代田区",
                    "city_kana": "チヨダク",
                    "town": "千代田",
                    "town_kana": "チヨダ"
                }}],
                "visitor_count": 7
            }}"#
        )
        .unwrap();
        let store = MemoryStore::open(file.path()).unwrap();
        let code = PostalCode::parse("1000001").unwrap();
        assert_eq!(store.postal_code(&code).unwrap().unwrap().town, "千代田");
        assert_eq!(store.increment_visitor_count().unwrap(), 8);
    }

    #[test]
    fn rejects_invalid_codes_in_fixtures() {
        let json = r#"{"offices": [{
            "postal_code": "12345",
            "prefecture": "東京都",
            "city": "千代田区",
            "office_name": "x",
            "office_kana": "x"
        }]}"#;
        assert!(MemoryStore::from_json(json).is_err());
    }
}
