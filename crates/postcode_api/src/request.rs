//! Types for requests from clients to the server.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 20;

/// Query parameters of the search routes.
///
/// `limit` is kept as text so that malformed values fall back to the default
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Search {
    pub q: Option<String>,
    pub limit: Option<String>,
}

impl Search {
    /// The requested number of results, clamped to `1..=max`.
    /// Missing, non-numeric, zero and negative values yield [`DEFAULT_LIMIT`].
    pub fn limit(&self, max: usize) -> usize {
        parse_limit(self.limit.as_deref(), DEFAULT_LIMIT, max)
    }
}

/// Query parameters of the routes that list the records of a city or prefecture.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Pagination {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl Pagination {
    /// The requested page size, clamped to `1..=max`, or `default` if it is not a positive integer.
    pub fn limit(&self, default: usize, max: usize) -> usize {
        parse_limit(self.limit.as_deref(), default, max)
    }

    /// The number of records to skip. Anything but a non-negative integer yields 0.
    pub fn offset(&self) -> usize {
        self.offset
            .as_deref()
            .and_then(|offset| offset.trim().parse().ok())
            .unwrap_or(0)
    }
}

fn parse_limit(limit: Option<&str>, default: usize, max: usize) -> usize {
    let max = max.max(1);
    let limit = limit
        .and_then(|limit| limit.trim().parse::<i128>().ok())
        .filter(|limit| *limit >= 1)
        .unwrap_or(default as i128);
    usize::try_from(limit.min(max as i128)).unwrap_or(max)
}

#[cfg(test)]
mod test {
    use super::*;

    fn search(limit: Option<&str>) -> Search {
        Search {
            q: None,
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn defaults_invalid_limits() {
        for limit in [None, Some(""), Some("abc"), Some("0"), Some("-5"), Some("1.5")] {
            assert_eq!(search(limit).limit(100), DEFAULT_LIMIT, "{limit:?}");
        }
    }

    #[test]
    fn clamps_large_limits() {
        assert_eq!(search(Some("101")).limit(100), 100);
        assert_eq!(search(Some("99999999999999999999")).limit(100), 100);
        assert_eq!(search(Some("50")).limit(100), 50);
        assert_eq!(search(Some("1")).limit(100), 1);
        assert_eq!(search(Some("30")).limit(10), 10);
    }

    #[test]
    fn parses_pagination() {
        let pagination = |limit: &str, offset: &str| Pagination {
            limit: Some(limit.to_string()),
            offset: Some(offset.to_string()),
        };
        let page = pagination("10", "30");
        assert_eq!((page.limit(100, 500), page.offset()), (10, 30));
        let page = pagination("abc", "-1");
        assert_eq!((page.limit(100, 500), page.offset()), (100, 0));
        let page = pagination("1000", "x");
        assert_eq!((page.limit(100, 500), page.offset()), (500, 0));
        let page = Pagination::default();
        assert_eq!((page.limit(50, 200), page.offset()), (50, 0));
    }
}
