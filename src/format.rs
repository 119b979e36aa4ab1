//! Display formatting for sizes, quantities and percentages

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whole percentage in `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const FULL: Percent = Percent(100);

    /// Clamp an arbitrary whole percentage into range.
    pub fn new(value: u32) -> Self {
        Percent(value.min(100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// `numerator / denominator` as a percentage rounded half up.
    ///
    /// A zero denominator yields 0%. Ratios above one clamp to 100%.
    /// Computed on integers so large quantities keep full precision.
    pub fn ratio(numerator: u128, denominator: u128) -> Self {
        if denominator == 0 {
            return Percent::ZERO;
        }
        if numerator >= denominator {
            return Percent::FULL;
        }

        // num < den, so every partial sum below stays under den and the
        // quotient is at most 99. Multiplying by 100 as repeated modular
        // addition keeps the result exact for any u128 inputs.
        let (mut quotient, mut rem) = (0u32, 0u128);
        for _ in 0..100 {
            let gap = denominator - numerator;
            if rem >= gap {
                rem -= gap;
                quotient += 1;
            } else {
                rem += numerator;
            }
        }
        // Half up: round when 2 * rem >= den, written without doubling.
        if rem >= denominator - rem {
            quotient += 1;
        }
        Percent::new(quotient)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary units, e.g. `1536` as `"1.5 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    // Float only here, at the display boundary.
    let value = bytes as f64 / scale as f64;
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Format an exact quantity with thousands separators, e.g. `"1,234,567"`.
pub fn format_amount(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a currency quantity, e.g. `"$1,234"`.
pub fn format_currency(value: u128) -> String {
    format!("${}", format_amount(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_234_567_890), "1.15 GB");
        assert_eq!(format_bytes(5 * 1024u64.pow(4)), "5 TB");
        assert_eq!(format_bytes(3 * 1024u64.pow(5)), "3072 TB");
    }

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(1_234_567), "1,234,567");
        assert_eq!(
            format_amount(340_282_366_920_938_463_463_374_607_431_768_211_455),
            "340,282,366,920,938,463,463,374,607,431,768,211,455"
        );
        assert_eq!(format_currency(25_000), "$25,000");
    }

    #[test]
    fn test_percent_ratio() {
        assert_eq!(Percent::ratio(512, 1024).value(), 50);
        assert_eq!(Percent::ratio(1, 3).value(), 33);
        assert_eq!(Percent::ratio(2, 3).value(), 67);
        assert_eq!(Percent::ratio(1, 200).value(), 1);
        assert_eq!(Percent::ratio(0, 0).value(), 0);
        assert_eq!(Percent::ratio(7, 0).value(), 0);
        assert_eq!(Percent::ratio(5, 4).value(), 100);
    }

    #[test]
    fn test_percent_ratio_huge_values() {
        let den = u128::MAX;
        assert_eq!(Percent::ratio(den / 2, den).value(), 50);
        assert_eq!(Percent::ratio(den / 4, den).value(), 25);
        assert_eq!(Percent::ratio(den - 1, den).value(), 100);
        assert_eq!(Percent::ratio(1, den).value(), 0);
    }

    #[test]
    fn test_percent_ratio_large_treasury_amounts() {
        // Withdrawals of 1.5e36 against deposits of 1.6e38 is just under 1%.
        let withdrawals = 1_500_000_000_000_000_000_000_000_000_000_000_000u128;
        let deposits = 160_000_000_000_000_000_000_000_000_000_000_000_000u128;
        assert_eq!(Percent::ratio(withdrawals, deposits).value(), 1);

        // Exactly on the half boundary rounds up.
        let den = 200_000_000_000_000_000_000_000_000_000_000_000_000u128;
        assert_eq!(Percent::ratio(den / 200, den).value(), 1);
        assert_eq!(Percent::ratio(den / 200 - 1, den).value(), 0);
        assert_eq!(Percent::ratio(den / 8 * 5 - 1, den).value(), 62);
        assert_eq!(Percent::ratio(den / 8 * 5, den).value(), 63);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::new(250).to_string(), "100%");
        assert_eq!(Percent::new(42).to_string(), "42%");
    }
}
