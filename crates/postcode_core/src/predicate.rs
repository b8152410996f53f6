//! Backend agnostic filter predicates.
//!
//! Stores receive a [`Predicate`] tree and either evaluate it directly or translate it into
//! their own query language. The `Display` implementation renders the tree as a Table
//! Storage style OData filter, which is also what gets logged.

use std::fmt;

/// Appended to a prefix to form the exclusive upper bound of its range.
pub const MAX_SENTINEL: char = '\u{FFFF}';

/// A searchable field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Prefecture,
    PrefectureKana,
    City,
    CityKana,
    Town,
    TownKana,
    OfficeName,
    OfficeKana,
}

impl Field {
    /// The fields searched when looking for an address.
    pub const ADDRESS: [Field; 6] = [
        Field::Prefecture,
        Field::PrefectureKana,
        Field::City,
        Field::CityKana,
        Field::Town,
        Field::TownKana,
    ];

    /// The fields searched when looking for an office.
    pub const OFFICE: [Field; 2] = [Field::OfficeName, Field::OfficeKana];

    pub fn name(self) -> &'static str {
        match self {
            Self::Prefecture => "prefecture",
            Self::PrefectureKana => "prefectureKana",
            Self::City => "city",
            Self::CityKana => "cityKana",
            Self::Town => "town",
            Self::TownKana => "townKana",
            Self::OfficeName => "officeName",
            Self::OfficeKana => "officeKana",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field` starts with `value`, rendered as `field >= value && field < value + MAX_SENTINEL`
    Prefix { field: Field, value: String },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn prefix(field: Field, value: impl Into<String>) -> Self {
        Self::Prefix {
            field,
            value: value.into(),
        }
    }

    /// Evaluates the predicate, using `get` to read the fields of the record.
    /// An empty `And` is true and an empty `Or` is false.
    pub fn matches<'a, F>(&self, get: &F) -> bool
    where
        F: Fn(Field) -> Option<&'a str>,
    {
        match self {
            Self::Prefix { field, value } => get(*field)
                .map(|field_value| has_prefix(field_value, value))
                .unwrap_or(false),
            Self::And(predicates) => predicates.iter().all(|p| p.matches(get)),
            Self::Or(predicates) => predicates.iter().any(|p| p.matches(get)),
        }
    }
}

/// The exclusive upper bound of the range of strings starting with `prefix`.
pub fn upper_bound(prefix: &str) -> String {
    let mut upper = String::with_capacity(prefix.len() + MAX_SENTINEL.len_utf8());
    upper.push_str(prefix);
    upper.push(MAX_SENTINEL);
    upper
}

/// Whether `value` starts with `prefix`.
pub fn has_prefix(value: &str, prefix: &str) -> bool {
    value.starts_with(prefix)
}

/// Escapes a string literal for an OData filter by doubling single quotes.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix { field, value } => {
                let lower = escape_literal(value);
                let upper = escape_literal(&upper_bound(value));
                write!(f, "({field} ge '{lower}' and {field} lt '{upper}')")
            }
            Self::And(predicates) => write_joined(f, predicates, " and "),
            Self::Or(predicates) => write_joined(f, predicates, " or "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, predicates: &[Predicate], op: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            f.write_str(op)?;
        }
        write!(f, "{predicate}")?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matches_prefixes() {
        assert!(has_prefix("千代田区", "千代田"));
        assert!(has_prefix("千代田", "千代田"));
        assert!(!has_prefix("千代", "千代田"));
        assert!(!has_prefix("中央区", "千代田"));
        assert!(!has_prefix("東千代田", "千代田"));
    }

    #[test]
    fn matches_supplementary_plane_suffixes() {
        assert!(has_prefix("千代田𠮷", "千代田"));
        assert!(has_prefix("千代田\u{FFFF}", "千代田"));
        let predicate = Predicate::prefix(Field::Town, "千代田");
        assert!(predicate.matches(&|field: Field| (field == Field::Town).then_some("千代田𠮷野")));
    }

    #[test]
    fn renders_odata() {
        let predicate = Predicate::Or(vec![
            Predicate::prefix(Field::City, "千代田"),
            Predicate::prefix(Field::CityKana, "チヨダ"),
        ]);
        assert_eq!(
            predicate.to_string(),
            "((city ge '千代田' and city lt '千代田\u{FFFF}') or (cityKana ge 'チヨダ' and cityKana lt 'チヨダ\u{FFFF}'))"
        );
    }

    #[test]
    fn doubles_quotes() {
        let predicate = Predicate::prefix(Field::Town, "o'brien");
        assert_eq!(
            predicate.to_string(),
            "(town ge 'o''brien' and town lt 'o''brien\u{FFFF}')"
        );
    }

    #[test]
    fn evaluates_trees() {
        let predicate = Predicate::And(vec![
            Predicate::Or(vec![
                Predicate::prefix(Field::Prefecture, "東京"),
                Predicate::prefix(Field::City, "東京"),
            ]),
            Predicate::prefix(Field::Town, "千代田"),
        ]);
        let get = |field: Field| match field {
            Field::Prefecture => Some("東京都"),
            Field::City => Some("千代田区"),
            Field::Town => Some("千代田"),
            _ => None,
        };
        assert!(predicate.matches(&get));

        let get = |field: Field| match field {
            Field::Prefecture => Some("大阪府"),
            Field::Town => Some("千代田"),
            _ => None,
        };
        assert!(!predicate.matches(&get));
    }

    #[test]
    fn empty_combinations() {
        let get = |_: Field| Some("x");
        assert!(Predicate::And(Vec::new()).matches(&get));
        assert!(!Predicate::Or(Vec::new()).matches(&get));
    }
}
