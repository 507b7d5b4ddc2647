//! Currency display and Arabic words restatement of amounts.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

const ONLY_SUFFIX: &str = "فقط";
const DECIMAL_POINT_WORD: &str = "فاصلة";
const ZERO_WORD: &str = "صفر";
const MAX_SPELLED: u64 = 999_999_999_999;
const FRACTION_DIGITS: usize = 2;

/// Currencies a receipt can be issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Currency {
    #[serde(rename = "IQD", alias = "iqd", alias = "دينار عراقي")]
    IraqiDinar,
    #[serde(rename = "USD", alias = "usd", alias = "دولار أمريكي")]
    UsDollar,
}

impl Currency {
    /// Three-letter code shown next to the numeric amount.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IraqiDinar => "IQD",
            Self::UsDollar => "USD",
        }
    }

    /// Full Arabic name used in the words restatement.
    pub fn arabic_name(&self) -> &'static str {
        match self {
            Self::IraqiDinar => "دينار عراقي",
            Self::UsDollar => "دولار أمريكي",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::IraqiDinar
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Why an amount could not be spelled out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordsError {
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount is too large to spell out")]
    TooLarge,
}

/// Both renderings of an amount as they appear on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedAmount {
    /// e.g. `1,500 IQD`
    pub display: String,
    /// Spelled-out restatement; empty when it could not be produced.
    pub words: String,
}

impl FormattedAmount {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            display: AmountFormatter::display(amount, currency),
            words: AmountFormatter::to_words(amount, currency.arabic_name()),
        }
    }
}

/// Formats amounts for the receipt body.
pub struct AmountFormatter;

impl AmountFormatter {
    /// Amount with `,` thousands grouping followed by the currency code,
    /// e.g. `1,500 IQD`.
    pub fn display(amount: Decimal, currency: Currency) -> String {
        format!("{} {}", group_thousands(amount), currency.code())
    }

    /// Spelled-out amount followed by "<currency> فقط".
    ///
    /// Returns an empty string when the amount cannot be spelled out: the
    /// numeric amount is already on the receipt and the words line is only a
    /// cross-check, so a failure here must not block the receipt.
    pub fn to_words(amount: Decimal, currency_name: &str) -> String {
        match Self::try_to_words(amount, currency_name) {
            Ok(words) => words,
            Err(e) => {
                log::debug!("Amount {} left without words restatement: {}", amount, e);
                String::new()
            }
        }
    }

    pub fn try_to_words(amount: Decimal, currency_name: &str) -> Result<String, WordsError> {
        if amount <= Decimal::ZERO {
            return Err(WordsError::NotPositive);
        }

        let amount = amount.normalize();
        let integer = amount.trunc().to_u64().ok_or(WordsError::TooLarge)?;
        if integer > MAX_SPELLED {
            return Err(WordsError::TooLarge);
        }

        let mut words = if integer == 0 {
            ZERO_WORD.to_string()
        } else {
            spell_integer(integer)
        };

        if !amount.fract().is_zero() {
            let fraction = spell_fraction(&fraction_digits(amount))?;
            words = format!("{} {} {}", words, DECIMAL_POINT_WORD, fraction);
        }

        Ok(format!("{} {} {}", words, currency_name, ONLY_SUFFIX))
    }
}

/// Digits after the decimal point of a normalized, non-integral amount.
fn fraction_digits(amount: Decimal) -> String {
    let text = amount.to_string();
    text.split_once('.')
        .map(|(_, frac)| frac.to_string())
        .unwrap_or_default()
}

/// Words for the digits after the decimal point.
///
/// The digits are read in hundredths, so `.5` is spelled as fifty. When more
/// digits are present they are all kept. Each leading zero is spelled out
/// so `.05` and `.5` never read the same.
fn spell_fraction(digits: &str) -> Result<String, WordsError> {
    let mut digits = digits.to_string();
    while digits.len() < FRACTION_DIGITS {
        digits.push('0');
    }

    let significant = digits.trim_start_matches('0');
    let value: u64 = significant.parse().map_err(|_| WordsError::TooLarge)?;
    if value == 0 || value > MAX_SPELLED {
        return Err(WordsError::TooLarge);
    }

    let mut parts = vec![ZERO_WORD.to_string(); digits.len() - significant.len()];
    parts.push(spell_integer(value));
    Ok(parts.join(" "))
}

fn group_thousands(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

// ============================================================================
// Arabic cardinal numbers
// ============================================================================

const ONES: [&str; 10] = [
    "", "واحد", "اثنان", "ثلاثة", "أربعة", "خمسة", "ستة", "سبعة", "ثمانية", "تسعة",
];

const TEENS: [&str; 10] = [
    "عشرة",
    "أحد عشر",
    "اثنا عشر",
    "ثلاثة عشر",
    "أربعة عشر",
    "خمسة عشر",
    "ستة عشر",
    "سبعة عشر",
    "ثمانية عشر",
    "تسعة عشر",
];

const TENS: [&str; 10] = [
    "", "", "عشرون", "ثلاثون", "أربعون", "خمسون", "ستون", "سبعون", "ثمانون", "تسعون",
];

const HUNDREDS: [&str; 10] = [
    "",
    "مائة",
    "مئتان",
    "ثلاثمائة",
    "أربعمائة",
    "خمسمائة",
    "ستمائة",
    "سبعمائة",
    "ثمانمائة",
    "تسعمائة",
];

/// Forms of a scale word: singular, dual, plural (3-10), accusative
/// singular (11-99) and bare singular (100 and up).
struct Scale {
    one: &'static str,
    two: &'static str,
    few: &'static str,
    counted: &'static str,
    many: &'static str,
}

const SCALES: [Scale; 3] = [
    Scale {
        one: "ألف",
        two: "ألفان",
        few: "آلاف",
        counted: "ألفاً",
        many: "ألف",
    },
    Scale {
        one: "مليون",
        two: "مليونان",
        few: "ملايين",
        counted: "مليوناً",
        many: "مليون",
    },
    Scale {
        one: "مليار",
        two: "ملياران",
        few: "مليارات",
        counted: "ملياراً",
        many: "مليار",
    },
];

/// Words for 1..=999.
fn spell_below_thousand(n: u64) -> String {
    let hundreds = (n / 100) as usize;
    let rest = n % 100;

    let rest_words = match rest {
        0 => String::new(),
        1..=9 => ONES[rest as usize].to_string(),
        10..=19 => TEENS[(rest - 10) as usize].to_string(),
        _ => {
            let ones = (rest % 10) as usize;
            let tens = TENS[(rest / 10) as usize];
            if ones == 0 {
                tens.to_string()
            } else {
                format!("{} و{}", ONES[ones], tens)
            }
        }
    };

    match (hundreds, rest_words.is_empty()) {
        (0, _) => rest_words,
        (h, true) => HUNDREDS[h].to_string(),
        (h, false) => format!("{} و{}", HUNDREDS[h], rest_words),
    }
}

fn spell_scaled(count: u64, scale: &Scale) -> String {
    match count {
        1 => scale.one.to_string(),
        2 => scale.two.to_string(),
        3..=10 => format!("{} {}", spell_below_thousand(count), scale.few),
        11..=99 => format!("{} {}", spell_below_thousand(count), scale.counted),
        _ => format!("{} {}", spell_below_thousand(count), scale.many),
    }
}

/// Words for a positive integer up to 999,999,999,999.
fn spell_integer(n: u64) -> String {
    let mut groups = Vec::new();
    let mut remaining = n;
    while remaining > 0 {
        groups.push(remaining % 1000);
        remaining /= 1000;
    }

    let mut parts = Vec::new();
    for (idx, group) in groups.iter().enumerate().rev() {
        if *group == 0 {
            continue;
        }
        let part = if idx == 0 {
            spell_below_thousand(*group)
        } else {
            spell_scaled(*group, &SCALES[idx - 1])
        };
        parts.push(part);
    }

    parts.join(" و")
}
