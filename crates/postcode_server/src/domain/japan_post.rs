//! Parses the postal code CSV files published by Japan Post.
//! See <https://www.post.japanpost.jp/zipcode/dl/utf-zip.html> and
//! <https://www.post.japanpost.jp/zipcode/dl/jigyosyo/index-zip.html>

use encoding_rs::SHIFT_JIS;
use postcode_core::{
    prefectures, CityRecord, OfficeRecord, PostalCode, PostalCodeRecord, PrefectureCode,
    PrefectureRecord,
};
use std::collections::{btree_map::Entry, BTreeMap};

/// Columns of the UTF-8 address file.
const ADDRESS_COLUMNS: usize = 15;
/// Columns of the office file.
const OFFICE_COLUMNS: usize = 13;

/// Everything the importer writes to the database.
#[derive(Debug, Default)]
pub struct ImportData {
    pub postal_codes: Vec<PostalCodeRecord>,
    pub offices: Vec<OfficeRecord>,
    pub prefectures: Vec<PrefectureRecord>,
    pub cities: Vec<CityRecord>,
}

/// Decodes the Shift-JIS office file.
pub fn decode_shift_jis(bytes: &[u8]) -> eyre::Result<String> {
    let text = SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| eyre::eyre!("Invalid Shift-JIS data"))?;
    Ok(text.into_owned())
}

/// Parses the address file, skipping rows that are too short or carry an invalid postal code.
pub fn parse_addresses(text: &str) -> Vec<PostalCodeRecord> {
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let columns = split_line(line);
        if columns.len() < ADDRESS_COLUMNS {
            tracing::warn!("Skipping address row {} with {} columns", i + 1, columns.len());
            continue;
        }
        let Ok(postal_code) = PostalCode::parse(&columns[2]) else {
            tracing::warn!("Skipping address row {} with postal code '{}'", i + 1, columns[2]);
            continue;
        };
        let mut columns = columns.into_iter();
        let local_gov_code = columns.next().unwrap_or_default();
        // old 5-digit code and the already parsed postal code
        let mut columns = columns.skip(2);
        let mut next = || columns.next().unwrap_or_default();
        let (prefecture_kana, city_kana, town_kana) = (next(), next(), next());
        let (prefecture, city, town) = (next(), next(), next());
        rows.push(PostalCodeRecord {
            postal_code,
            local_gov_code,
            prefecture,
            prefecture_kana,
            city,
            city_kana,
            town,
            town_kana,
        });
    }
    rows
}

/// Parses the decoded office file, skipping rows that are too short or carry an invalid postal code.
///
/// The town and street address columns are joined into the address detail.
pub fn parse_offices(text: &str) -> Vec<OfficeRecord> {
    let mut offices = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut columns = split_line(line);
        if columns.len() < OFFICE_COLUMNS {
            tracing::warn!("Skipping office row {} with {} columns", i + 1, columns.len());
            continue;
        }
        let Ok(postal_code) = PostalCode::parse(&columns[7]) else {
            tracing::warn!("Skipping office row {} with postal code '{}'", i + 1, columns[7]);
            continue;
        };
        let mut take = |i: usize| std::mem::take(&mut columns[i]);
        let address_detail = format!("{}{}", take(5), take(6));
        offices.push(OfficeRecord {
            postal_code,
            prefecture: take(3),
            city: take(4),
            office_name: take(2),
            office_kana: take(1),
            address_detail: (!address_detail.is_empty()).then_some(address_detail),
        });
    }
    offices
}

/// Splits a CSV line into trimmed columns. Quoted columns may contain commas and `""` escapes.
fn split_line(line: &str) -> Vec<String> {
    let mut columns = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => quoted = !quoted,
            ',' if !quoted => columns.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    columns.push(current.trim().to_string());
    columns
}

impl ImportData {
    /// Collects the parsed rows. The first record of each postal code is kept, and cities are
    /// derived from the local government codes of the addresses.
    pub fn new(addresses: Vec<PostalCodeRecord>, offices: Vec<OfficeRecord>) -> Self {
        let mut postal_codes = BTreeMap::new();
        let mut cities = BTreeMap::new();
        let mut duplicates = 0;
        for record in addresses {
            if let Entry::Vacant(entry) = cities.entry(record.local_gov_code.clone()) {
                match PrefectureCode::of_local_gov_code(&record.local_gov_code) {
                    Ok(prefecture_code) => {
                        entry.insert(CityRecord {
                            code: record.local_gov_code.clone(),
                            prefecture_code,
                            name: record.city.clone(),
                            name_kana: record.city_kana.clone(),
                        });
                    }
                    Err(_) => tracing::warn!(
                        "Invalid local government code '{}'",
                        record.local_gov_code
                    ),
                }
            }
            match postal_codes.entry(record.postal_code.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(record);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }

        let mut office_map = BTreeMap::new();
        for office in offices {
            match office_map.entry(office.postal_code.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(office);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }
        tracing::info!("Skipped {duplicates} duplicate postal codes");

        Self {
            postal_codes: postal_codes.into_values().collect(),
            offices: office_map.into_values().collect(),
            prefectures: prefectures::prefecture_records(),
            cities: cities.into_values().collect(),
        }
    }
}
