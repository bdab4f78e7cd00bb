//! Textual grammars for the built-in base types.
//!
//! Integers follow the usual base-prefix rules (`0x`, `0b`, `0o`, leading
//! `0`), are parsed wide and then narrowed, so a literal that parses but
//! does not fit the target width reports [`FlagbindError::OutOfRange`]
//! rather than a syntax error. Durations use a composite unit-suffixed
//! grammar (`1h15m`, `1.5s`, `300ms`).

use std::fmt;
use std::time::Duration;

use crate::error::FlagbindError;
use crate::slot::BaseType;

fn invalid(text: &str, expected: &'static str) -> FlagbindError {
    FlagbindError::InvalidSyntax {
        text: text.to_string(),
        expected,
    }
}

fn out_of_range(text: &str, target: &'static str) -> FlagbindError {
    FlagbindError::OutOfRange {
        text: text.to_string(),
        target,
    }
}

pub fn parse_bool(text: &str) -> Result<bool, FlagbindError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(invalid(text, "boolean")),
    }
}

/// Fixed-width integer types with a textual form.
pub trait Integer: BaseType + Copy + fmt::Display + TryFrom<i128> {
    const SIGNED: bool;
}

macro_rules! integer {
    ($($ty:ty => $signed:expr),* $(,)?) => {
        $(impl Integer for $ty {
            const SIGNED: bool = $signed;
        })*
    };
}

integer! {
    i8 => true, i16 => true, i32 => true, i64 => true, isize => true,
    u8 => false, u16 => false, u32 => false, u64 => false, usize => false,
}

pub fn parse_integer<T: Integer>(text: &str) -> Result<T, FlagbindError> {
    let wide = parse_wide_integer(text, T::SIGNED, T::NAME)?;
    T::try_from(wide).map_err(|_| out_of_range(text, T::NAME))
}

fn parse_wide_integer(text: &str, signed: bool, target: &'static str) -> Result<i128, FlagbindError> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') if signed => (true, &text[1..]),
        Some(b'+') if signed => (false, &text[1..]),
        _ => (false, text),
    };

    let prefixed = |lower: &str, upper: &str| {
        body.strip_prefix(lower).or_else(|| body.strip_prefix(upper))
    };
    let (radix, digits) = if let Some(digits) = prefixed("0x", "0X") {
        (16, digits)
    } else if let Some(digits) = prefixed("0b", "0B") {
        (2, digits)
    } else if let Some(digits) = prefixed("0o", "0O") {
        (8, digits)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };

    // Underscores separate digits; after a base prefix one may also lead.
    let leading = radix == 10 && digits.starts_with('_');
    if leading || digits.ends_with('_') || digits.contains("__") {
        return Err(invalid(text, "integer"));
    }
    let digits = digits.replace('_', "");
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid(text, "integer"));
    }

    let magnitude = u128::from_str_radix(&digits, radix).map_err(|_| out_of_range(text, target))?;
    let magnitude = i128::try_from(magnitude).map_err(|_| out_of_range(text, target))?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Floating point types with a textual form.
pub trait Float: BaseType + Copy + fmt::Display {
    fn parse_text(text: &str) -> Result<Self, FlagbindError>;
}

fn parse_wide_float(text: &str) -> Result<f64, FlagbindError> {
    let value: f64 = text.parse().map_err(|_| invalid(text, "floating point"))?;
    let spelled_infinite = text
        .trim_start_matches(['+', '-'])
        .get(..3)
        .is_some_and(|head| head.eq_ignore_ascii_case("inf"));
    if value.is_infinite() && !spelled_infinite {
        return Err(out_of_range(text, "f64"));
    }
    Ok(value)
}

impl Float for f64 {
    fn parse_text(text: &str) -> Result<Self, FlagbindError> {
        parse_wide_float(text)
    }
}

impl Float for f32 {
    fn parse_text(text: &str) -> Result<Self, FlagbindError> {
        let wide = parse_wide_float(text)?;
        let narrow = wide as f32;
        if narrow.is_infinite() && wide.is_finite() {
            return Err(out_of_range(text, "f32"));
        }
        Ok(narrow)
    }
}

const NANOS_PER_SECOND: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3_600 * NANOS_PER_SECOND),
        _ => None,
    }
}

pub fn parse_duration(text: &str) -> Result<Duration, FlagbindError> {
    let (negative, mut rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid(text, "duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let whole_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (whole, after) = rest.split_at(whole_len);
        let (fraction, after) = match after.strip_prefix('.') {
            Some(after_dot) => {
                let len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(len)
            }
            None => ("", after),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid(text, "duration"));
        }

        let unit_len = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        let scale = unit_nanos(unit).ok_or_else(|| invalid(text, "duration"))?;

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range(text, "Duration"))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| out_of_range(text, "Duration"))?;
        let mut place = scale;
        for digit in fraction.bytes() {
            place /= 10;
            if place == 0 {
                break;
            }
            nanos = nanos
                .checked_add(u128::from(digit - b'0') * place)
                .ok_or_else(|| out_of_range(text, "Duration"))?;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| out_of_range(text, "Duration"))?;
        rest = after;
    }

    if negative && total > 0 {
        return Err(out_of_range(text, "Duration"));
    }
    let seconds = u64::try_from(total / NANOS_PER_SECOND).map_err(|_| out_of_range(text, "Duration"))?;
    Ok(Duration::new(seconds, (total % NANOS_PER_SECOND) as u32))
}

/// `value / 10^precision` with trailing fractional zeros dropped.
fn format_fraction(value: u128, precision: u32) -> String {
    let scale = 10u128.pow(precision);
    let (whole, fraction) = (value / scale, value % scale);
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = precision as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    match nanos {
        0 => "0s".to_string(),
        1..1_000 => format!("{nanos}ns"),
        1_000..1_000_000 => format!("{}µs", format_fraction(nanos, 3)),
        1_000_000..NANOS_PER_SECOND => format!("{}ms", format_fraction(nanos, 6)),
        _ => {
            let minute = 60 * NANOS_PER_SECOND;
            let seconds = format_fraction(nanos % minute, 9);
            let minutes = nanos / minute;
            let (hours, minutes) = (minutes / 60, minutes % 60);
            if hours > 0 {
                format!("{hours}h{minutes}m{seconds}s")
            } else if minutes > 0 {
                format!("{minutes}m{seconds}s")
            } else {
                format!("{seconds}s")
            }
        }
    }
}
