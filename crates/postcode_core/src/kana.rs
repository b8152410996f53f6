//! Conversions between hiragana, katakana and romaji.

use std::ops::RangeInclusive;
use wana_kana::ConvertJapanese;

const UNICODE_KANA_TABLE_DISTANCE: u32 = 'ア' as u32 - 'あ' as u32;
const HIRAGANA_RANGE: RangeInclusive<char> = '\u{3041}'..='\u{3096}';

/// Converts hiragana to katakana, leaving every other character as is.
pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars()
        .map(|c| {
            if HIRAGANA_RANGE.contains(&c) {
                char::from_u32(c as u32 + UNICODE_KANA_TABLE_DISTANCE).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// The kana readings of a term written in romaji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomajiReading {
    pub hiragana: String,
    pub katakana: String,
}

/// Transliterates a term made up only of latin letters that reads as romanized Japanese.
/// Returns `None` for anything else, including romaji that leaves letters untransliterated.
pub fn romaji_reading(term: &str) -> Option<RomajiReading> {
    if term.is_empty() || !term.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let lowercase = term.to_ascii_lowercase();
    let hiragana = lowercase.as_str().to_hiragana();
    if hiragana.is_empty() || hiragana.chars().any(|c| c.is_ascii_alphabetic()) {
        tracing::trace!("'{term}' is not romaji");
        return None;
    }
    let katakana = hiragana_to_katakana(&hiragana);
    Some(RomajiReading { hiragana, katakana })
}
