//! Scalar type classification.

use crate::Tag;

/// Classify a property scalar by the type its text looks like.
///
/// Total and deterministic: anything that is not recognizably null,
/// boolean, or numeric (including invalid UTF-8) is a string.
pub fn classify(value: &[u8]) -> Tag {
    let Ok(text) = std::str::from_utf8(value) else {
        return Tag::Str;
    };
    if is_null(text) {
        Tag::Null
    } else if is_bool(text) {
        Tag::Bool
    } else if is_int(text) {
        Tag::Int
    } else if is_float(text) {
        Tag::Float
    } else {
        Tag::Str
    }
}

fn is_null(text: &str) -> bool {
    matches!(text, "" | "~" | "null" | "Null" | "NULL")
}

fn is_bool(text: &str) -> bool {
    matches!(
        text,
        "true"
            | "True"
            | "TRUE"
            | "false"
            | "False"
            | "FALSE"
            | "yes"
            | "Yes"
            | "YES"
            | "no"
            | "No"
            | "NO"
            | "on"
            | "On"
            | "ON"
            | "off"
            | "Off"
            | "OFF"
    )
}

/// Digits with optional `_` separators, never leading or trailing.
fn is_digits(text: &str, radix: u32) -> bool {
    !text.is_empty()
        && !text.starts_with('_')
        && !text.ends_with('_')
        && !text.contains("__")
        && text.chars().all(|c| c == '_' || c.is_digit(radix))
}

fn strip_sign(text: &str) -> &str {
    text.strip_prefix(['+', '-']).unwrap_or(text)
}

fn is_int(text: &str) -> bool {
    let body = strip_sign(text);
    let prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in prefixed {
        if let Some(digits) = body.strip_prefix(prefix) {
            return is_digits(digits, radix);
        }
    }
    is_digits(body, 10)
}

fn is_float(text: &str) -> bool {
    if matches!(
        text,
        ".inf" | "+.inf" | "-.inf" | ".Inf" | "+.Inf" | "-.Inf" | ".nan" | ".NaN"
    ) {
        return true;
    }

    let body = strip_sign(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };
    if let Some(exponent) = exponent
        && !is_digits(strip_sign(exponent), 10)
    {
        return false;
    }

    match mantissa.split_once('.') {
        Some((whole, fraction)) => {
            (whole.is_empty() || is_digits(whole, 10))
                && (fraction.is_empty() || is_digits(fraction, 10))
                && !(whole.is_empty() && fraction.is_empty())
        }
        // An exponent makes an integer mantissa a float.
        None => exponent.is_some() && is_digits(mantissa, 10),
    }
}
