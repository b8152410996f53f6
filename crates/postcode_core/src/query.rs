//! Normalization of free text search queries.
//!
//! A raw query is sanitized and split into a primary list of terms. A single compound term
//! such as 町田市小山町 additionally produces a secondary list of its administrative units,
//! which is used as an alternative to the primary list. Each term carries the spellings it
//! is searched with.

use crate::{kana, predicate::Field, sanitizer, term_splitter, Predicate};

/// The smallest accepted query length in characters, before sanitization.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("検索キーワードは2文字以上で指定してください")]
    TooShort,
    #[error("検索キーワードが無効です")]
    NoValidTerms,
}

/// A single search term and the spellings it matches with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    variants: Vec<String>,
}

impl SearchTerm {
    /// Normalizes a sanitized, non-empty term.
    ///
    /// The variants are, without duplicates and in order: the term as written, its katakana
    /// form, and for romaji its hiragana and katakana transliterations.
    pub fn new(term: &str) -> Self {
        let mut variants = vec![term.to_string()];
        let mut push = |variant: String| {
            if !variants.contains(&variant) {
                variants.push(variant);
            }
        };
        push(kana::hiragana_to_katakana(term));
        if let Some(reading) = kana::romaji_reading(term) {
            push(reading.hiragana);
            push(reading.katakana);
        }
        Self { variants }
    }

    /// The term as written.
    pub fn original(&self) -> &str {
        &self.variants[0]
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Any of the fields starts with any of the variants.
    pub fn predicate(&self, fields: &[Field]) -> Predicate {
        let conditions = self
            .variants
            .iter()
            .flat_map(|variant| {
                fields
                    .iter()
                    .map(move |field| Predicate::prefix(*field, variant.as_str()))
            })
            .collect();
        Predicate::Or(conditions)
    }
}

/// A validated search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    primary: Vec<SearchTerm>,
    secondary: Option<Vec<SearchTerm>>,
}

impl SearchQuery {
    /// Validates and normalizes a raw query.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        if raw.chars().count() < MIN_QUERY_CHARS {
            return Err(QueryError::TooShort);
        }

        let sanitized = sanitizer::sanitize(raw);
        let terms = term_splitter::split_whitespace(&sanitized);
        let secondary = match terms.as_slice() {
            [] => return Err(QueryError::NoValidTerms),
            [single] => term_splitter::split_compound(single),
            _ => None,
        };
        tracing::debug!("Parsed query '{raw}' into {terms:?}, split alternative {secondary:?}");

        Ok(Self {
            primary: terms.iter().map(|t| SearchTerm::new(t)).collect(),
            secondary: secondary.map(|terms| terms.iter().map(|t| SearchTerm::new(t)).collect()),
        })
    }

    pub fn primary(&self) -> &[SearchTerm] {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&[SearchTerm]> {
        self.secondary.as_deref()
    }

    /// Builds the predicate for searching the given fields.
    ///
    /// Every term of a list has to match some field, and either list may match.
    pub fn predicate(&self, fields: &[Field]) -> Predicate {
        let all_of = |terms: &[SearchTerm]| {
            Predicate::And(terms.iter().map(|t| t.predicate(fields)).collect())
        };
        match &self.secondary {
            Some(secondary) => Predicate::Or(vec![all_of(&self.primary), all_of(secondary)]),
            None => all_of(&self.primary),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn originals(terms: &[SearchTerm]) -> Vec<&str> {
        terms.iter().map(SearchTerm::original).collect()
    }

    #[test]
    fn rejects_short_queries() {
        assert_eq!(SearchQuery::parse(""), Err(QueryError::TooShort));
        assert_eq!(SearchQuery::parse("東"), Err(QueryError::TooShort));
    }

    #[test]
    fn rejects_queries_without_valid_terms() {
        assert_eq!(SearchQuery::parse("   "), Err(QueryError::NoValidTerms));
        assert_eq!(SearchQuery::parse("';="), Err(QueryError::NoValidTerms));
        assert_eq!(SearchQuery::parse("!? ()"), Err(QueryError::NoValidTerms));
    }

    #[test]
    fn builds_and_of_terms() {
        let query = SearchQuery::parse("東京都 千代田区").unwrap();
        assert_eq!(originals(query.primary()), ["東京都", "千代田区"]);
        assert!(query.secondary().is_none());

        let Predicate::And(terms) = query.predicate(&Field::ADDRESS) else {
            panic!("expected a conjunction");
        };
        assert_eq!(terms.len(), 2);
        for term in terms {
            let Predicate::Or(conditions) = term else {
                panic!("expected a disjunction");
            };
            assert_eq!(conditions.len(), 6);
        }
    }

    #[test]
    fn adds_split_alternative() {
        let query = SearchQuery::parse("町田市小山町").unwrap();
        assert_eq!(originals(query.primary()), ["町田市小山町"]);
        assert_eq!(
            originals(query.secondary().unwrap()),
            ["町田市", "小山町"]
        );

        let Predicate::Or(alternatives) = query.predicate(&Field::ADDRESS) else {
            panic!("expected a disjunction");
        };
        assert_eq!(alternatives.len(), 2);
        assert!(matches!(&alternatives[0], Predicate::And(t) if t.len() == 1));
        assert!(matches!(&alternatives[1], Predicate::And(t) if t.len() == 2));
    }

    #[test]
    fn keeps_unsplittable_term() {
        let query = SearchQuery::parse("市川市").unwrap();
        assert_eq!(originals(query.primary()), ["市川市"]);
        assert!(query.secondary().is_none());
    }

    #[test]
    fn sanitizes_before_splitting() {
        let query = SearchQuery::parse("東京都;DROP TABLE").unwrap();
        assert_eq!(originals(query.primary()), ["東京都DROP", "TABLE"]);
    }

    #[test]
    fn adds_katakana_variant() {
        let term = SearchTerm::new("ちよだ");
        assert_eq!(term.variants(), ["ちよだ", "チヨダ"]);
        let term = SearchTerm::new("千代田");
        assert_eq!(term.variants(), ["千代田"]);
    }

    #[test]
    fn adds_romaji_variants() {
        let term = SearchTerm::new("chiyoda");
        assert_eq!(term.variants(), ["chiyoda", "ちよだ", "チヨダ"]);
        assert_eq!(term.predicate(&Field::ADDRESS), {
            let mut conditions = Vec::new();
            for variant in ["chiyoda", "ちよだ", "チヨダ"] {
                for field in Field::ADDRESS {
                    conditions.push(Predicate::prefix(field, variant));
                }
            }
            Predicate::Or(conditions)
        });
    }

    #[test]
    fn searches_office_fields() {
        let query = SearchQuery::parse("ゆうせい").unwrap();
        let predicate = query.predicate(&Field::OFFICE);
        assert_eq!(
            predicate,
            Predicate::And(vec![Predicate::Or(vec![
                Predicate::prefix(Field::OfficeName, "ゆうせい"),
                Predicate::prefix(Field::OfficeKana, "ゆうせい"),
                Predicate::prefix(Field::OfficeName, "ユウセイ"),
                Predicate::prefix(Field::OfficeKana, "ユウセイ"),
            ])])
        );
    }

    #[test]
    fn matches_records_through_predicate() {
        let query = SearchQuery::parse("まちだし おやま").unwrap();
        let predicate = query.predicate(&Field::ADDRESS);
        let get = |field: Field| match field {
            Field::Prefecture => Some("東京都"),
            Field::PrefectureKana => Some("トウキョウト"),
            Field::City => Some("町田市"),
            Field::CityKana => Some("マチダシ"),
            Field::Town => Some("小山町"),
            Field::TownKana => Some("オヤママチ"),
            _ => None,
        };
        assert!(predicate.matches(&get));

        let query = SearchQuery::parse("町田市小山町").unwrap();
        assert!(query.predicate(&Field::ADDRESS).matches(&get));

        let query = SearchQuery::parse("町田市 本町").unwrap();
        assert!(!query.predicate(&Field::ADDRESS).matches(&get));
    }
}
