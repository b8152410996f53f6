//! Splits search queries into terms.

/// Characters that end the name of an administrative unit: prefectures (都道府県),
/// cities and wards (市区), towns and villages (町村) and districts (郡).
pub const ADMINISTRATIVE_SUFFIXES: [char; 9] = ['都', '道', '府', '県', '市', '区', '町', '村', '郡'];

/// The largest number of terms a compound name may be split into.
pub const MAX_SPLIT_TERMS: usize = 5;

/// Splits the query on whitespace.
pub fn split_whitespace(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_string).collect()
}

/// Iterates through the administrative units of a compound place name such as 町田市小山町.
///
/// A unit ends after a suffix character that has at least one character before it in the unit
/// and at least one character after it in the name, so 市川市 stays whole.
#[derive(Debug, Clone)]
pub struct CompoundSplitter<'a> {
    idx: usize,
    s: &'a str,
}

impl<'a> CompoundSplitter<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { idx: 0, s }
    }
}

impl<'a> Iterator for CompoundSplitter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let start_idx = self.idx;
        let rest = self.s.get(start_idx..)?;
        if rest.is_empty() {
            return None;
        }

        let mut chars = rest.char_indices().peekable();
        // the first character always belongs to the unit, even if it is a suffix
        chars.next();
        while let Some((i, c)) = chars.next() {
            if ADMINISTRATIVE_SUFFIXES.contains(&c) && chars.peek().is_some() {
                let end_idx = start_idx + i + c.len_utf8();
                self.idx = end_idx;
                return Some(&self.s[start_idx..end_idx]);
            }
        }

        self.idx = self.s.len();
        Some(rest)
    }
}

/// Tries to split a single compound term into its administrative units.
///
/// Returns `None` unless the split produces more than one and at most [`MAX_SPLIT_TERMS`] terms.
pub fn split_compound(term: &str) -> Option<Vec<String>> {
    let split = CompoundSplitter::new(term)
        .map(str::to_string)
        .collect::<Vec<_>>();
    if split.len() > 1 && split.len() <= MAX_SPLIT_TERMS {
        Some(split)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_whitespace() {
        assert_eq!(split_whitespace(" 東京都\u{3000}千代田区\t "), ["東京都", "千代田区"]);
        assert!(split_whitespace(" \t\n").is_empty());
    }

    #[test]
    fn splits_city_and_town() {
        assert_eq!(split_compound("町田市小山町").unwrap(), ["町田市", "小山町"]);
    }

    #[test]
    fn splits_prefecture_city_and_ward() {
        assert_eq!(
            split_compound("東京都千代田区").unwrap(),
            ["東京都", "千代田区"]
        );
        assert_eq!(
            split_compound("神奈川県横浜市中区山下町").unwrap(),
            ["神奈川県", "横浜市", "中区", "山下町"]
        );
    }

    #[test]
    fn does_not_split_leading_suffix() {
        assert_eq!(split_compound("市川市"), None);
        let units = CompoundSplitter::new("市川市").collect::<Vec<_>>();
        assert_eq!(units, ["市川市"]);
    }

    #[test]
    fn does_not_split_trailing_suffix() {
        assert_eq!(split_compound("千代田区"), None);
        assert_eq!(split_compound("区"), None);
        assert_eq!(split_compound(""), None);
    }

    #[test]
    fn first_character_is_never_a_boundary() {
        // 京 + 都 ends the first unit, the next unit starts at 府
        let units = CompoundSplitter::new("京都府京都市").collect::<Vec<_>>();
        assert_eq!(units, ["京都", "府京都", "市"]);
    }

    #[test]
    fn limits_split_size() {
        assert_eq!(split_compound("あ市い市う市え市お市か").map(|s| s.len()), None);
        assert_eq!(
            split_compound("あ市い市う市え市お").unwrap().len(),
            MAX_SPLIT_TERMS
        );
    }
}
