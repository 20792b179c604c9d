//! Rounding and text helpers shared by the import and export paths.
//!
//! Fixed-point rounding works on the decimal digits of a value rather than on
//! binary floating point, so `3.015` rounds to `3.02` the way a decimal type
//! would. All rounding is half-to-even.

/// A finite decimal number held as its sign and digit strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalText {
    negative: bool,
    integer: String,
    fraction: String,
}

impl DecimalText {
    /// Parse plain decimal notation: optional sign, digits, optional point and
    /// fraction digits. Surrounding whitespace is ignored. No exponent.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, body) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (integer, fraction) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || !all_digits(fraction) {
            return None;
        }

        Some(Self::from_parts(negative, integer, fraction))
    }

    /// Decimal digits of the shortest text that round-trips `value`.
    /// Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // f64 Display is the shortest round-trip form and never uses an exponent
        Self::parse(&format!("{}", value))
    }

    /// Plain notation first, then anything `f64` accepts (e.g. `1E-05`).
    pub fn parse_lenient(text: &str) -> Option<Self> {
        Self::parse(text).or_else(|| {
            text.trim()
                .parse::<f64>()
                .ok()
                .and_then(Self::from_f64)
        })
    }

    fn from_parts(negative: bool, integer: &str, fraction: &str) -> Self {
        let integer = integer.trim_start_matches('0');
        Self {
            negative,
            integer: if integer.is_empty() {
                "0".to_string()
            } else {
                integer.to_string()
            },
            fraction: fraction.to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.integer.bytes().chain(self.fraction.bytes()).all(|b| b == b'0')
    }

    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            ..self.clone()
        }
    }

    /// Round to `places` fraction digits, ties to the even neighbour.
    pub fn round_half_even(&self, places: usize) -> Self {
        if self.fraction.len() <= places {
            return self.clone();
        }

        let (kept, rest) = self.fraction.split_at(places);
        let rest = rest.as_bytes();
        let round_up = match rest[0] {
            b'6'..=b'9' => true,
            b'5' => {
                let exact_half = rest[1..].iter().all(|&b| b == b'0');
                if exact_half {
                    let last = kept
                        .bytes()
                        .last()
                        .or_else(|| self.integer.bytes().last())
                        .unwrap_or(b'0');
                    (last - b'0') % 2 == 1
                } else {
                    true
                }
            }
            _ => false,
        };

        let mut digits: Vec<u8> = self.integer.bytes().chain(kept.bytes()).collect();
        if round_up {
            increment(&mut digits);
        }
        let split = digits.len() - places;
        let integer = String::from_utf8_lossy(&digits[..split]).into_owned();
        let fraction = String::from_utf8_lossy(&digits[split..]).into_owned();
        Self::from_parts(self.negative, &integer, &fraction)
    }

    /// Render with exactly `places` fraction digits and at least
    /// `min_integer_digits` integer digits (zero padded). A value that is zero
    /// after rounding is rendered without a sign.
    pub fn to_fixed(&self, places: usize, min_integer_digits: usize) -> String {
        let rounded = self.round_half_even(places);
        let mut out = String::new();
        if rounded.negative && !rounded.is_zero() {
            out.push('-');
        }
        for _ in rounded.integer.len()..min_integer_digits {
            out.push('0');
        }
        out.push_str(&rounded.integer);
        if places > 0 {
            out.push('.');
            out.push_str(&rounded.fraction);
            for _ in rounded.fraction.len()..places {
                out.push('0');
            }
        }
        out
    }
}

/// Add one to an ASCII digit string, growing it on carry-out.
fn increment(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Round half-to-even to `places` and render as `00.0…` (at least two integer
/// digits). Non-finite values render as their plain text.
pub fn round_fixed(value: f64, places: u32) -> String {
    match DecimalText::from_f64(value) {
        Some(decimal) => decimal.to_fixed(places as usize, 2),
        None => value.to_string(),
    }
}

/// `round_fixed` of the absolute value.
pub fn round_fixed_abs(value: f64, places: u32) -> String {
    round_fixed(value.abs(), places)
}

/// Round half-to-even on the decimal digits of `value`.
pub fn round_half_even_f64(value: f64, places: u32) -> f64 {
    DecimalText::from_f64(value)
        .map(|d| d.to_fixed(places as usize, 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(value)
}

/// At most `length` characters of `source`.
pub fn truncate(source: &str, length: usize) -> &str {
    match source.char_indices().nth(length) {
        Some((idx, _)) => &source[..idx],
        None => source,
    }
}

/// Trimmed, case-insensitive equality.
pub fn is_same(current: &str, proposed: &str) -> bool {
    current.trim().to_lowercase() == proposed.trim().to_lowercase()
}

pub fn is_diff(current: &str, proposed: &str) -> bool {
    !is_same(current, proposed)
}
