//! Validated postal and prefecture codes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("郵便番号は7桁で指定してください")]
    PostalCode,
    #[error("都道府県コードは2桁で指定してください")]
    PrefectureCode,
}

/// A 7-digit Japanese postal code with any hyphens removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    pub const LEN: usize = 7;

    /// Parses a postal code, stripping ASCII hyphens and the minus sign `−`.
    pub fn parse(code: &str) -> Result<Self, CodeError> {
        let stripped = code
            .chars()
            .filter(|c| *c != '-' && *c != '−')
            .collect::<String>();
        if stripped.len() == Self::LEN && stripped.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(stripped))
        } else {
            Err(CodeError::PostalCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 3-digit area prefix, used as the partition of partitioned stores.
    pub fn area(&self) -> &str {
        &self.0[..3]
    }

    /// The 4-digit suffix within the area.
    pub fn suffix(&self) -> &str {
        &self.0[3..]
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.0
    }
}

/// A 2-digit prefecture code, `01` (Hokkaido) to `47` (Okinawa).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrefectureCode(String);

impl PrefectureCode {
    pub const LEN: usize = 2;

    pub fn parse(code: &str) -> Result<Self, CodeError> {
        if code.len() == Self::LEN && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(CodeError::PrefectureCode)
        }
    }

    /// The prefecture code of a 5-digit local government code.
    pub fn of_local_gov_code(local_gov_code: &str) -> Result<Self, CodeError> {
        local_gov_code
            .get(..Self::LEN)
            .ok_or(CodeError::PrefectureCode)
            .and_then(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrefectureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PrefectureCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PrefectureCode> for String {
    fn from(value: PrefectureCode) -> Self {
        value.0
    }
}
