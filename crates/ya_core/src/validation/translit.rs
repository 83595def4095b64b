//! Cyrillic-to-Latin transliteration and slugification.
//!
//! The table follows the common Russian web convention (`ж→zh`, `х→h`,
//! `ц→ts`, `щ→sch`, `й→j`) with the Ukrainian extras `і ї є ґ`.

use once_cell::sync::Lazy;
use regex::Regex;

static AMPERSAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&amp;|&").expect("valid ampersand regex"));
static DASH_OR_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid dash/space regex"));

fn latin_for(symbol: char) -> Option<&'static str> {
    let latin = match symbol {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' => "\"",
        'ы' => "y",
        'ь' => "'",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        'А' => "A",
        'Б' => "B",
        'В' => "V",
        'Г' => "G",
        'Д' => "D",
        'Е' => "E",
        'Ё' => "Yo",
        'Ж' => "Zh",
        'З' => "Z",
        'И' => "I",
        'Й' => "J",
        'К' => "K",
        'Л' => "L",
        'М' => "M",
        'Н' => "N",
        'О' => "O",
        'П' => "P",
        'Р' => "R",
        'С' => "S",
        'Т' => "T",
        'У' => "U",
        'Ф' => "F",
        'Х' => "H",
        'Ц' => "Ts",
        'Ч' => "Ch",
        'Ш' => "Sh",
        'Щ' => "Sch",
        'Ъ' => "\"",
        'Ы' => "Y",
        'Ь' => "'",
        'Э' => "E",
        'Ю' => "Yu",
        'Я' => "Ya",
        'І' => "I",
        'Ї' => "Yi",
        'Є' => "Ye",
        'Ґ' => "G",
        '№' => "#",
        '«' | '»' | '„' | '“' | '”' => "\"",
        '‘' | '’' => "'",
        '–' | '—' | '‒' | '−' => "-",
        '…' => "...",
        _ => return None,
    };
    Some(latin)
}

/// Replaces Cyrillic letters and typographic symbols with Latin equivalents.
///
/// Characters without a mapping pass through unchanged.
pub fn transliterate(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for symbol in input.chars() {
        match latin_for(symbol) {
            Some(latin) => out.push_str(latin),
            None => out.push(symbol),
        }
    }
    out
}

/// Builds a lowercase URL slug from arbitrary (possibly Cyrillic) text.
///
/// Rules:
/// - `&` becomes ` and `.
/// - Runs of whitespace and hyphens collapse into one `-`.
/// - Cyrillic letters are transliterated; every other symbol outside
///   `[a-z0-9_-]` is dropped after the hyphen pass, so the hyphens around it
///   stay as they are, edges included.
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let with_and = AMPERSAND_RE.replace_all(&lowered, " and ");
    let hyphenated = DASH_OR_SPACE_RE.replace_all(&with_and, "-");

    let mut slug = String::with_capacity(hyphenated.len());
    for symbol in hyphenated.chars() {
        if is_slug_char(symbol) {
            slug.push(symbol);
        } else if symbol.is_alphabetic() {
            if let Some(latin) = latin_for(symbol) {
                slug.extend(latin.chars().filter(|ch| is_slug_char(*ch)));
            }
        }
    }
    slug
}

fn is_slug_char(symbol: char) -> bool {
    symbol.is_ascii_alphanumeric() || symbol == '-' || symbol == '_'
}
