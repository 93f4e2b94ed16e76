//! Phonetic approximate matching
//!
//! Values are reduced to a metaphone key per word, so names that sound
//! alike ("Smith", "Smyth") share a normalized form.

use crate::bytes::ByteString;
use crate::error::Result;
use crate::matching::rules::collation::fold_diacritic;
use crate::matching::Normalizer;
use crate::normalizers::strings::{prepare_string, split_words, CaseFolding, Trim};
use crate::schema::Schema;

fn is_vowel(c: u8) -> bool {
    matches!(c, b'A' | b'E' | b'I' | b'O' | b'U')
}

fn is_front_vowel(c: Option<u8>) -> bool {
    matches!(c, Some(b'E' | b'I' | b'Y'))
}

/// Metaphone key of one word
pub fn metaphone(word: &str) -> String {
    let letters: Vec<u8> = word
        .chars()
        .map(fold_diacritic)
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase() as u8)
        .collect();
    if letters.is_empty() {
        return String::new();
    }

    let at = |i: usize| letters.get(i).copied();
    let mut key = String::new();
    let mut i = 0;

    // Initial letter exceptions
    match (letters[0], at(1)) {
        (b'A', Some(b'E')) | (b'G' | b'K' | b'P', Some(b'N')) | (b'W', Some(b'R')) => i = 1,
        (b'X', _) => {
            key.push('S');
            i = 1;
        }
        (b'W', Some(b'H')) => {
            key.push('W');
            i = 2;
        }
        _ => {}
    }

    while i < letters.len() {
        let c = letters[i];
        let prev = if i > 0 { at(i - 1) } else { None };
        let next = at(i + 1);
        let after_next = at(i + 2);

        if prev == Some(c) && c != b'C' {
            i += 1;
            continue;
        }

        match c {
            b'A' | b'E' | b'I' | b'O' | b'U' => {
                if i == 0 {
                    key.push(c as char);
                }
            }
            b'B' => {
                if !(prev == Some(b'M') && next.is_none()) {
                    key.push('B');
                }
            }
            b'C' => {
                if next == Some(b'I') && after_next == Some(b'A') {
                    key.push('X');
                } else if next == Some(b'H') {
                    key.push(if prev == Some(b'S') { 'K' } else { 'X' });
                    i += 1;
                } else if is_front_vowel(next) {
                    if prev != Some(b'S') {
                        key.push('S');
                    }
                } else {
                    key.push('K');
                }
            }
            b'D' => {
                if next == Some(b'G') && is_front_vowel(after_next) {
                    key.push('J');
                    i += 1;
                } else {
                    key.push('T');
                }
            }
            b'G' => {
                let silent_gh = next == Some(b'H') && !after_next.map_or(true, is_vowel);
                let silent_gn = next == Some(b'N') && (after_next.is_none() || letters[i + 1..] == *b"NED");
                if silent_gh || silent_gn {
                    // silent
                } else if is_front_vowel(next) {
                    key.push('J');
                } else {
                    key.push('K');
                }
            }
            b'H' => {
                let after_modifier = matches!(prev, Some(b'C' | b'S' | b'P' | b'T' | b'G'));
                let between_vowel = prev.map_or(false, is_vowel) && !next.map_or(false, is_vowel);
                if !after_modifier && !between_vowel {
                    key.push('H');
                }
            }
            b'K' => {
                if prev != Some(b'C') {
                    key.push('K');
                }
            }
            b'P' => key.push(if next == Some(b'H') { 'F' } else { 'P' }),
            b'Q' => key.push('K'),
            b'S' => {
                if next == Some(b'H') {
                    key.push('X');
                    i += 1;
                } else if next == Some(b'I') && matches!(after_next, Some(b'O' | b'A')) {
                    key.push('X');
                } else {
                    key.push('S');
                }
            }
            b'T' => {
                if next == Some(b'I') && matches!(after_next, Some(b'O' | b'A')) {
                    key.push('X');
                } else if next == Some(b'H') {
                    key.push('0');
                    i += 1;
                } else if !(next == Some(b'C') && after_next == Some(b'H')) {
                    key.push('T');
                }
            }
            b'V' => key.push('F'),
            b'W' | b'Y' => {
                if next.map_or(false, is_vowel) {
                    key.push(c as char);
                }
            }
            b'X' => key.push_str("KS"),
            b'Z' => key.push('S'),
            _ => key.push(c as char),
        }
        i += 1;
    }
    key
}

/// Space separated metaphone keys of the words of a value
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleMetaphoneNormalizer;

impl Normalizer for DoubleMetaphoneNormalizer {
    fn normalize_attribute_value(&self, _schema: &Schema, value: &[u8]) -> Result<ByteString> {
        let prepared = prepare_string(value, CaseFolding::Ignore, Trim::Both)?;
        let keys: Vec<String> = split_words(&prepared)
            .map(metaphone)
            .filter(|k| !k.is_empty())
            .collect();
        Ok(keys.join(" ").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metaphone_keys() {
        assert_eq!(metaphone("Smith"), "SM0");
        assert_eq!(metaphone("Smyth"), "SM0");
        assert_eq!(metaphone("Knight"), "NT");
        assert_eq!(metaphone("Phillips"), "FLPS");
        assert_eq!(metaphone("Xavier"), "SFR");
        assert_eq!(metaphone(""), "");
    }

    #[test]
    fn test_sounds_alike() {
        let schema = Schema::empty();
        let normalizer = DoubleMetaphoneNormalizer;
        assert_eq!(
            normalizer.normalize_attribute_value(&schema, b"John Smith").unwrap(),
            normalizer.normalize_attribute_value(&schema, b"jon  SMYTH").unwrap()
        );
        assert_ne!(
            normalizer.normalize_attribute_value(&schema, b"John Smith").unwrap(),
            normalizer.normalize_attribute_value(&schema, b"John Jones").unwrap()
        );
    }
}
