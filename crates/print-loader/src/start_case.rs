//! The start-case sibling transform.
//!
//! Every line is split into words and re-joined with each word capitalized:
//! `fooBar` becomes `Foo Bar`, `--foo-bar--` becomes `Foo Bar` and
//! `XMLHttpRequest` becomes `XML Http Request`. Latin letters lose their
//! diacritics first, so `élan` becomes `Elan`.

use unicode_normalization::char::decompose_canonical;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Separator,
}

fn classify(c: char) -> CharClass {
    if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_numeric() {
        CharClass::Digit
    } else if c.is_alphabetic() {
        // Uncased letters group like lowercase ones
        CharClass::Lower
    } else {
        CharClass::Separator
    }
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

/// Replaces Latin-1 Supplement and Latin Extended-A letters with their
/// basic Latin counterparts and removes combining diacritical marks.
pub fn deburr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if let Some(replacement) = undecomposable_letter(c) {
            out.push_str(replacement);
        } else if is_deburrable_latin(c) {
            decompose_canonical(c, |d| {
                if !is_combining_diacritic(d) {
                    out.push(d);
                }
            });
        } else if !is_combining_diacritic(c) {
            out.push(c);
        }
    }
    out
}

fn is_deburrable_latin(c: char) -> bool {
    matches!(c, '\u{c0}'..='\u{d6}' | '\u{d8}'..='\u{f6}' | '\u{f8}'..='\u{17f}')
}

fn is_combining_diacritic(c: char) -> bool {
    matches!(c, '\u{300}'..='\u{36f}' | '\u{fe20}'..='\u{fe2f}' | '\u{20d0}'..='\u{20ff}')
}

/// Letters with no canonical decomposition.
fn undecomposable_letter(c: char) -> Option<&'static str> {
    let replacement = match c {
        'Æ' => "Ae",
        'æ' => "ae",
        'Ð' | 'Đ' => "D",
        'ð' | 'đ' => "d",
        'Ø' => "O",
        'ø' => "o",
        'Þ' => "Th",
        'þ' => "th",
        'ß' => "ss",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'ĸ' => "k",
        'Ŀ' | 'Ł' => "L",
        'ŀ' | 'ł' => "l",
        'ŉ' => "'n",
        'Ŋ' => "N",
        'ŋ' => "n",
        'Œ' => "Oe",
        'œ' => "oe",
        'Ŧ' => "T",
        'ŧ' => "t",
        'ſ' => "s",
        _ => return None,
    };
    Some(replacement)
}

/// Splits `input` into words.
///
/// Words break at separators (anything that is not a letter or digit), at
/// lowercase→uppercase and letter↔digit transitions, and before the last
/// capital of an acronym that is followed by a lowercase letter.
/// Apostrophes are dropped without breaking the word.
pub fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().filter(|&c| !is_apostrophe(c)).collect();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev = CharClass::Separator;

    for (i, &c) in chars.iter().enumerate() {
        let class = classify(c);
        let next = chars
            .get(i + 1)
            .map_or(CharClass::Separator, |&n| classify(n));

        let boundary = match (prev, class) {
            (_, CharClass::Separator) => true,
            (CharClass::Lower, CharClass::Upper) => true,
            (CharClass::Lower | CharClass::Upper, CharClass::Digit)
            | (CharClass::Digit, CharClass::Lower | CharClass::Upper) => true,
            (CharClass::Upper, CharClass::Upper) => next == CharClass::Lower,
            _ => false,
        };

        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        if class != CharClass::Separator {
            current.push(c);
        }
        prev = class;
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts one line to start case.
pub fn start_case(input: &str) -> String {
    words(&deburr(input))
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts every line of `text` to start case, keeping the line structure.
pub fn start_case_lines(text: &str) -> String {
    text.split('\n')
        .map(start_case)
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
