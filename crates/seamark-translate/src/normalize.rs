//! camelCase label normalization.
//!
//! Field labels arrive as analyzer display names ("Engine RPM",
//! "Sats in View") and must become path-safe tokens ("engineRpm",
//! "satsInView"). Tokenization is an explicit character-classification
//! scan over three classes, with no regex engine involved:
//!
//! - an optional initial capital followed by lowercase letters
//! - an all-uppercase run not immediately followed by a lowercase letter
//! - a run of digits
//!
//! The letter classes cover ASCII plus the Latin-1 letter ranges, so
//! labels like "Über Temp" tokenize the same way the analyzer's
//! display layer expects.

use seamark_core::Scalar;

fn is_upper(c: char) -> bool {
    c.is_ascii_uppercase() || ('\u{C0}'..='\u{D6}').contains(&c) || ('\u{D8}'..='\u{DE}').contains(&c)
}

fn is_lower(c: char) -> bool {
    c.is_ascii_lowercase() || ('\u{DF}'..='\u{F6}').contains(&c) || ('\u{F8}'..='\u{FF}').contains(&c)
}

/// Split the input into camelCase tokens.
///
/// Characters outside the three classes (spaces, punctuation) separate
/// tokens and are dropped. An all-uppercase run immediately followed by
/// a lowercase letter surrenders its last capital to the next token, so
/// "GNSSFix" splits into "GNSS" + "Fix".
fn tokenize(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        } else if is_lower(c) {
            let start = i;
            while i < chars.len() && is_lower(chars[i]) {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        } else if is_upper(c) {
            let start = i;
            let mut end = i + 1;
            while end < chars.len() && is_upper(chars[end]) {
                end += 1;
            }
            if end < chars.len() && is_lower(chars[end]) {
                if end - start == 1 {
                    // Single capital heading a lowercase run.
                    while end < chars.len() && is_lower(chars[end]) {
                        end += 1;
                    }
                    tokens.push(chars[start..end].iter().collect());
                    i = end;
                } else {
                    // The last capital belongs to the following token.
                    tokens.push(chars[start..end - 1].iter().collect());
                    i = end - 1;
                }
            } else {
                tokens.push(chars[start..end].iter().collect());
                i = end;
            }
        } else {
            i += 1;
        }
    }

    tokens
}

/// Normalize a label or string value into a camelCase token.
///
/// An input with no recognizable characters yields the empty string.
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (index, token) in tokenize(input).iter().enumerate() {
        let lowered = token.to_lowercase();
        if index == 0 {
            out.push_str(&lowered);
        } else {
            let mut rest = lowered.chars();
            if let Some(first) = rest.next() {
                out.extend(first.to_uppercase());
                out.push_str(rest.as_str());
            }
        }
    }
    out
}

/// Normalize a scalar: strings are camelCased, everything else passes
/// through unchanged.
pub fn normalize(value: &Scalar) -> Scalar {
    match value {
        Scalar::String(s) => Scalar::String(camel_case(s)),
        other => other.clone(),
    }
}
