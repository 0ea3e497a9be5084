//! URL- and filename-safe slugs

use serde_json::Value;

use crate::{Error, Result};

/// Turn free text into a lowercase, dash-separated slug.
///
/// camelCase boundaries become word breaks, common Latin diacritics are
/// folded to ASCII, `&` reads as "and", and any other run of
/// non-alphanumeric characters collapses into a single `-`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the input is blank or contains
/// nothing that survives slugging.
pub fn slugify(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Err(Error::invalid_input("cannot slugify an empty string"));
    }

    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    let mut prev: Option<char> = None;

    for c in input.chars() {
        let camel_break = c.is_uppercase()
            && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
        if camel_break {
            pending_dash = true;
        }

        let mut buf = [0u8; 4];
        let text: Option<&str> = match c {
            '&' => Some("and"),
            c if c.is_ascii_alphanumeric() => Some(&*c.to_ascii_lowercase().encode_utf8(&mut buf)),
            c => fold(c),
        };

        match text {
            Some(text) => {
                // "and" is a word of its own on both sides
                let standalone = c == '&';
                if (pending_dash || standalone) && !slug.is_empty() {
                    slug.push('-');
                }
                slug.push_str(text);
                pending_dash = standalone;
            }
            None => pending_dash = true,
        }
        prev = Some(c);
    }

    if slug.is_empty() {
        return Err(Error::invalid_input(format!(
            "{input:?} contains no characters usable in a slug"
        )));
    }
    Ok(slug)
}

/// Slugify a JSON value. Only non-empty strings are accepted.
pub fn slugify_value(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => slugify(s),
        Value::Null => Err(Error::invalid_input("cannot slugify a missing value")),
        other => Err(Error::invalid_input(format!(
            "cannot slugify a non-string value: {other}"
        ))),
    }
}

fn fold(c: char) -> Option<&'static str> {
    let folded = match c.to_lowercase().next().unwrap_or(c) {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' => "s",
        'ß' => "ss",
        'ť' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}
