//! The fixed, cyclic table of token-list transforms.
//!
//! Every transform is a pure mapping applied to the committed base list
//! (generation 0), never to another transform's output, so cycling through
//! the table cannot compound.

use crate::extract::dedupe;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter};

/// Named transforms, in table order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumCount, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Identity
    Original,
    /// Prefix `+` where missing
    AddPlus,
    /// Drop a leading `+`
    RemovePlus,
    /// Strip an optional `+` and the country-code-shaped prefix
    StripCountryCode,
    /// `+` followed by the stripped national part
    PlusStripCountryCode,
}

/// Table order; `TRANSFORM_TABLE[i].index() == i`.
pub const TRANSFORM_TABLE: [TransformKind; TransformKind::COUNT] = [
    TransformKind::Original,
    TransformKind::AddPlus,
    TransformKind::RemovePlus,
    TransformKind::StripCountryCode,
    TransformKind::PlusStripCountryCode,
];

impl TransformKind {
    /// Looks a transform up by its table slot.
    pub fn from_index(index: usize) -> Option<Self> {
        TRANSFORM_TABLE.get(index).copied()
    }

    /// Position in [`TRANSFORM_TABLE`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The transform that follows this one in the cycle.
    pub fn next(self) -> Self {
        TRANSFORM_TABLE[(self.index() + 1) % TransformKind::COUNT]
    }

    /// Label shown to the user after the transform is applied.
    pub fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::AddPlus => "Added '+'",
            Self::RemovePlus => "Removed '+'",
            Self::StripCountryCode => "No country code",
            Self::PlusStripCountryCode => "+ No cc",
        }
    }

    /// Applies the mapping to `base`.
    ///
    /// The result is deduplicated: two distinct base tokens can map to the
    /// same output (`+1555...` and `1555...` under `RemovePlus`), and a
    /// generation never holds a token twice.
    pub fn apply(self, base: &[String]) -> Vec<String> {
        let mapped = base.iter().map(|token| match self {
            Self::Original => token.clone(),
            Self::AddPlus => add_plus(token),
            Self::RemovePlus => token.strip_prefix('+').unwrap_or(token).to_string(),
            Self::StripCountryCode => strip_country_code(token),
            Self::PlusStripCountryCode => format!("+{}", strip_country_code(token)),
        });
        dedupe(mapped)
    }
}

fn add_plus(token: &str) -> String {
    if token.starts_with('+') {
        token.to_string()
    } else {
        format!("+{token}")
    }
}

/// Assigned two-digit calling codes. Calling codes are prefix-free, so the
/// zone digit plus this set is enough to pick a length of 1, 2 or 3.
const TWO_DIGIT_CODES: &[&str] = &[
    "20", "27", "30", "31", "32", "33", "34", "36", "39", "40", "41", "43", "44", "45", "46", "47",
    "48", "49", "51", "52", "53", "54", "55", "56", "57", "58", "60", "61", "62", "63", "64", "65",
    "66", "81", "82", "84", "86", "90", "91", "92", "93", "94", "95", "98",
];

/// Left-anchored strip of an optional `+` and 1 to 3 leading digits.
///
/// Best effort only: the length comes from the calling-code zone structure,
/// not from a numbering plan.
pub fn strip_country_code(token: &str) -> String {
    let digits = token.strip_prefix('+').unwrap_or(token);
    let run = digits
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .take(3)
        .count();
    if run == 0 {
        return token.to_string();
    }
    let code_len = country_code_len(&digits[..run]).min(run);
    digits[code_len..].to_string()
}

fn country_code_len(prefix: &str) -> usize {
    match prefix.as_bytes().first() {
        None => 0,
        Some(b'1') | Some(b'7') => 1,
        Some(_) if prefix.len() >= 2 && TWO_DIGIT_CODES.contains(&&prefix[..2]) => 2,
        Some(_) => 3,
    }
}
