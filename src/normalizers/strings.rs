//! String preparation for string matching rules
//!
//! Implements the mapping, insignificant space handling and case folding
//! steps of RFC 4518 that apply to Directory String, IA5 String, Numeric
//! String and Telephone Number values. Unicode normalization (NFKC) is not
//! applied.

use crate::error::{Error, Result};

/// How character case is treated during preparation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFolding {
    /// Case is significant
    Exact,
    /// Case is folded to lower case
    Ignore,
}

/// Whether leading and trailing spaces are removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trim {
    /// Remove leading and trailing spaces (whole values)
    Both,
    /// Keep boundary spaces (substring components)
    None,
}

// RFC 4518 section 2.2: characters mapped to nothing
fn maps_to_nothing(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{0008}'
        | '\u{000E}'..='\u{001F}'
        | '\u{007F}'..='\u{0084}'
        | '\u{0086}'..='\u{009F}'
        | '\u{00AD}'
        | '\u{034F}'
        | '\u{180B}'..='\u{180D}'
        | '\u{200B}'..='\u{200F}'
        | '\u{202A}'..='\u{202E}'
        | '\u{2060}'..='\u{2063}'
        | '\u{FE00}'..='\u{FE0F}'
        | '\u{FEFF}'
        | '\u{FFF9}'..='\u{FFFC}')
}

// RFC 4518 section 2.2: characters mapped to SPACE
fn maps_to_space(c: char) -> bool {
    matches!(c,
        '\u{0009}'..='\u{000D}'
        | '\u{0085}'
        | '\u{00A0}'
        | '\u{1680}'
        | '\u{2000}'..='\u{200A}'
        | '\u{2028}'
        | '\u{2029}'
        | '\u{202F}'
        | '\u{205F}'
        | '\u{3000}')
}

/// Decode a value as UTF-8
pub fn decode_utf8(value: &[u8]) -> Result<&str> {
    std::str::from_utf8(value).map_err(|e| {
        Error::Decode(
            crate::error::DecodeError::new("value is not valid UTF-8")
                .with_value(value)
                .with_reason(e.to_string()),
        )
    })
}

/// Prepare a Unicode string: map, fold case and collapse insignificant spaces
pub fn prepare_string(value: &[u8], folding: CaseFolding, trim: Trim) -> Result<String> {
    let text = decode_utf8(value)?;
    Ok(prepare_str(text, folding, trim))
}

/// Prepare an already decoded string
pub fn prepare_str(text: &str, folding: CaseFolding, trim: Trim) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if maps_to_nothing(c) {
            continue;
        }
        if c == ' ' || maps_to_space(c) {
            pending_space = true;
            continue;
        }
        if pending_space {
            if !out.is_empty() || trim == Trim::None {
                out.push(' ');
            }
            pending_space = false;
        }
        match folding {
            CaseFolding::Exact => out.push(c),
            CaseFolding::Ignore => out.extend(c.to_lowercase()),
        }
    }

    if pending_space && trim == Trim::None {
        out.push(' ');
    }
    out
}

/// Prepare an IA5 (ASCII) string
pub fn prepare_ia5(value: &[u8], folding: CaseFolding, trim: Trim) -> Result<String> {
    if let Some(pos) = value.iter().position(|b| !b.is_ascii()) {
        return Err(Error::Decode(
            crate::error::DecodeError::new("value contains a non-IA5 character")
                .with_value(value)
                .with_reason(format!("byte 0x{:02x} at position {}", value[pos], pos)),
        ));
    }
    prepare_string(value, folding, trim)
}

/// Normalize a Numeric String: spaces are insignificant, only digits remain
pub fn normalize_numeric_string(value: &[u8]) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    for &b in value {
        match b {
            b'0'..=b'9' => out.push(b as char),
            b' ' => {}
            _ => return Err(Error::decode("invalid numeric string", value)),
        }
    }
    Ok(out)
}

/// Normalize a telephone number: spaces and hyphens are insignificant
pub fn normalize_telephone_number(value: &[u8]) -> Result<String> {
    let prepared = prepare_string(value, CaseFolding::Ignore, Trim::Both)?;
    Ok(prepared.chars().filter(|c| *c != ' ' && *c != '-').collect())
}

/// Normalize a `$`-separated list (postal address) component by component
pub fn normalize_case_ignore_list(value: &[u8], trim: Trim) -> Result<String> {
    let text = decode_utf8(value)?;
    let lines: Vec<String> = text
        .split('$')
        .map(|line| {
            let unescaped = line
                .replace("\\24", "$")
                .replace("\\5C", "\\")
                .replace("\\5c", "\\");
            prepare_str(&unescaped, CaseFolding::Ignore, trim)
        })
        .collect();
    Ok(lines.join("$"))
}

/// Normalize a boolean to `TRUE` or `FALSE`
pub fn normalize_boolean(value: &[u8]) -> Result<&'static str> {
    let text = decode_utf8(value)?.trim();
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok("TRUE"),
        "false" | "no" | "off" | "0" => Ok("FALSE"),
        _ => Err(Error::decode("invalid boolean value", value)),
    }
}

/// Validate and normalize a bit string of the form `'0101'B`
pub fn normalize_bit_string(value: &[u8]) -> Result<String> {
    let text = decode_utf8(value)?.trim();
    let bits = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix("'B").or_else(|| rest.strip_suffix("'b")))
        .ok_or_else(|| Error::decode("invalid bit string", value))?;
    if !bits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(Error::decode("invalid bit string", value));
    }
    Ok(format!("'{}'B", bits))
}

/// Returns true for characters separating words: spaces and punctuation
/// other than hyphens and apostrophes
pub fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || (c.is_ascii_punctuation() && c != '-' && c != '\'')
}

/// Split prepared text into words
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_word_separator).filter(|w| !w.is_empty())
}

/// Extract the first component of a schema description such as `( 1.2.3 NAME 'x' )`
pub fn first_component(value: &[u8]) -> Result<String> {
    let text = decode_utf8(value)?.trim_start();
    let inner = text
        .strip_prefix('(')
        .ok_or_else(|| Error::decode("value does not start with '('", value))?
        .trim_start();
    if let Some(quoted) = inner.strip_prefix('\'') {
        let end = quoted
            .find('\'')
            .ok_or_else(|| Error::decode("unterminated quoted first component", value))?;
        return Ok(quoted[..end].to_string());
    }
    let component: String = inner
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != ')')
        .collect();
    if component.is_empty() {
        return Err(Error::decode("missing first component", value));
    }
    Ok(component)
}
