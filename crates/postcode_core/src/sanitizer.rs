//! Removes characters that are not allowed in search queries.

use regex::Regex;
use std::sync::LazyLock;

/// Matches every character outside of the allowed set: Unicode letters and numbers, the
/// Japanese blocks below, whitespace and `-`.
///
/// - `\u{3000}-\u{303F}` CJK symbols and punctuation, including the iteration marks
/// - `\u{3040}-\u{309F}` hiragana
/// - `\u{30A0}-\u{30FF}` katakana
/// - `\u{FF00}-\u{FF9F}` halfwidth and fullwidth forms
/// - `\u{4E00}-\u{9FAF}` CJK unified ideographs
/// - `\u{3400}-\u{4DBF}` CJK unified ideographs extension A
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[^\p{L}\p{N}\u{3000}-\u{303F}\u{3040}-\u{309F}\u{30A0}-\u{30FF}\u{FF00}-\u{FF9F}\u{4E00}-\u{9FAF}\u{3400}-\u{4DBF}\s\-]",
    )
    .expect("Invalid search character pattern")
});

/// Deletes every character outside of the allowed set.
/// The result may be empty, which callers treat as a query without valid terms.
pub fn sanitize(query: &str) -> String {
    DISALLOWED.replace_all(query, "").into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn removes_punctuation() {
        assert_eq!(sanitize("東京都;DROP TABLE"), "東京都DROP TABLE");
        assert_eq!(sanitize("a'b\"c(d)e*f"), "abcdef");
        assert_eq!(sanitize("千代田区 or 1=1"), "千代田区 or 11");
    }

    #[test]
    fn keeps_japanese() {
        let text = "とうきょう トウキョウ 東京都 ｶﾀｶﾅ ０１２ 々〆〇 㐂";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn keeps_hyphen_and_whitespace() {
        assert_eq!(sanitize("1-2\t3\n"), "1-2\t3\n");
    }

    #[test]
    fn removes_letterlike_symbols() {
        // circled letters are Alphabetic but not letters
        assert_eq!(sanitize("東京Ⓐ"), "東京");
        assert_eq!(sanitize("ⓐⓑ千代田"), "千代田");
        // combining marks outside the kana block
        assert_eq!(sanitize("cafe\u{0301}"), "cafe");
        assert_eq!(sanitize("渋谷★♪"), "渋谷");
    }

    #[test]
    fn keeps_letters_and_numbers_of_any_script() {
        assert_eq!(sanitize("Zürich ½ Ⅻ"), "Zürich ½ Ⅻ");
    }

    #[test]
    fn is_idempotent() {
        for text in [
            "",
            "東京都;DROP TABLE",
            "'--",
            "町田市 小山町!!",
            "ｔｏｋｙｏ・ちよだ",
            "Ⓣⓞⓚⓨⓞ",
        ] {
            let once = sanitize(text);
            assert_eq!(sanitize(&once), once, "{text}");
        }
    }

    #[test]
    fn empties_disallowed_input() {
        assert_eq!(sanitize("';=()*"), "");
    }
}
