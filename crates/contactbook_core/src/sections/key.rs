//! Section key derivation and transliteration.
//!
//! # Invariants
//! - A key is either one uppercase ASCII letter or [`FALLBACK_SECTION`].
//! - Only the first character of a name decides its key.

use crate::model::contact::Contact;
use pinyin::ToPinyinMulti;

/// Section label for names that do not start with a Latin letter.
pub const FALLBACK_SECTION: &str = "#";

/// Transliteration oracle for non-Latin characters.
///
/// Returns candidate Latin readings in preference order; an empty list means
/// the character has no known reading.
pub trait Romanizer {
    fn romanize(&self, ch: char) -> Vec<String>;
}

impl<F> Romanizer for F
where
    F: Fn(char) -> Vec<String>,
{
    fn romanize(&self, ch: char) -> Vec<String> {
        self(ch)
    }
}

/// Hanyu pinyin readings (toneless), heteronyms included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinyinRomanizer;

impl Romanizer for PinyinRomanizer {
    fn romanize(&self, ch: char) -> Vec<String> {
        ch.to_pinyin_multi()
            .map(|readings| {
                readings
                    .into_iter()
                    .map(|reading| reading.plain().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Derives the section key for one display name.
///
/// - empty name -> `#`
/// - ASCII letter -> that letter, uppercased
/// - Han ideograph -> first letter of its first reading, uppercased, or `#`
///   when the oracle has nothing usable
/// - anything else -> `#`
pub fn section_key<R: Romanizer + ?Sized>(name: &str, romanizer: &R) -> String {
    let Some(first) = name.chars().next() else {
        return FALLBACK_SECTION.to_string();
    };

    let letter = if first.is_ascii_alphabetic() {
        Some(first)
    } else if is_han(first) {
        romanizer
            .romanize(first)
            .first()
            .and_then(|reading| reading.chars().next())
            .filter(char::is_ascii_alphabetic)
    } else {
        None
    };

    letter.map_or_else(
        || FALLBACK_SECTION.to_string(),
        |value| value.to_ascii_uppercase().to_string(),
    )
}

/// Orders contacts so that every section key forms one contiguous run.
///
/// Order: letter sections A..Z, then `#`; inside a section by romanized,
/// case-folded name; ties by id. Stable for equal keys.
pub fn sort_for_sections<R: Romanizer + ?Sized>(contacts: &mut [Contact], romanizer: &R) {
    contacts.sort_by_cached_key(|contact| {
        let key = section_key(&contact.name, romanizer);
        (
            key == FALLBACK_SECTION,
            key,
            collation_name(&contact.name, romanizer),
            contact.id,
        )
    });
}

/// Case-folded name with Han characters replaced by their first reading.
fn collation_name<R: Romanizer + ?Sized>(name: &str, romanizer: &R) -> String {
    let mut folded = String::with_capacity(name.len());
    for ch in name.chars() {
        if is_han(ch) {
            if let Some(reading) = romanizer.romanize(ch).into_iter().next() {
                folded.push_str(&reading.to_lowercase());
                continue;
            }
        }
        folded.extend(ch.to_lowercase());
    }
    folded
}

/// CJK Unified Ideographs covered by the pinyin tables.
fn is_han(ch: char) -> bool {
    ('\u{4E00}'..='\u{9FA5}').contains(&ch)
}
