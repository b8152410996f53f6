//! Core types of the postcode API and the normalization of search queries into store predicates.

pub mod code;
pub mod kana;
pub mod predicate;
pub mod prefectures;
pub mod query;
pub mod records;
pub mod sanitizer;
pub mod term_splitter;

pub use code::{CodeError, PostalCode, PrefectureCode};
pub use predicate::{Field, Predicate};
pub use query::{QueryError, SearchQuery, SearchTerm};
pub use records::{CityRecord, OfficeRecord, PostalCodeRecord, PrefectureRecord};
