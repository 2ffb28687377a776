use crate::error::{Result, SyncError};
use crate::fields::{DisplayTransform, Normalizer};

/// Significant digits kept when rendering a decimal (matches the host's float-to-string).
const SIGNIFICANT_DIGITS: i32 = 14;

/// Reciprocal exposures that are conventionally shown with one decimal (1/1.3, 1/2.5, ...).
const TENTH_STOP_RECIPROCALS: [i64; 4] = [13, 15, 16, 25];

/// Apply a field's write normalizer to a submitted value.
///
/// Numeric normalizers accept `a/b` fractions and plain decimals. A blank
/// numeric input clears the field and normalizes to `""`.
pub fn normalize(normalizer: Normalizer, input: &str) -> Result<String> {
    match normalizer {
        Normalizer::None => Ok(input.to_string()),
        Normalizer::Trim => Ok(input.trim().to_string()),
        Normalizer::Aperture => {
            let trimmed = input.trim();
            if trimmed.is_empty() {
                return Ok(String::new());
            }
            let value = parse_fraction(strip_f_number_prefix(trimmed))?;
            Ok(format_decimal(round_to(value, 2)))
        }
        Normalizer::FractionToDecimalString => {
            if input.trim().is_empty() {
                return Ok(String::new());
            }
            to_decimal_string(input)
        }
    }
}

/// Apply a field's display transform to a stored value.
pub fn display(transform: DisplayTransform, stored: &str) -> String {
    match transform {
        DisplayTransform::None => stored.to_string(),
        DisplayTransform::ExposureToFraction => exposure_to_fraction(stored),
    }
}

/// Parse `"a/b"` or a plain decimal into a finite number.
pub fn parse_fraction(input: &str) -> Result<f64> {
    let s = input.trim();
    let value = match s.split_once('/') {
        Some((num, den)) => {
            if den.contains('/') {
                return Err(invalid(input));
            }
            let num = parse_number(num.trim()).ok_or_else(|| invalid(input))?;
            let den = parse_number(den.trim()).ok_or_else(|| invalid(input))?;
            if den == 0.0 {
                return Err(invalid(input));
            }
            num / den
        }
        None => parse_number(s).ok_or_else(|| invalid(input))?,
    };

    if value.is_finite() { Ok(value) } else { Err(invalid(input)) }
}

/// Fraction → decimal, rendered the way the host stores floats as text.
///
/// ```rust
/// use pix_exif::sync::to_decimal_string;
///
/// assert_eq!(to_decimal_string("1/100").unwrap(), "0.01");
/// assert_eq!(to_decimal_string("50/1").unwrap(), "50");
/// assert!(to_decimal_string("1/0").is_err());
/// ```
pub fn to_decimal_string(input: &str) -> Result<String> {
    parse_fraction(input).map(format_decimal)
}

/// Decimal exposure time → `1/N` notation for display.
///
/// Text that is not a positive number (including an already-fractional
/// `"1/125"`) and exposures of a second or longer are returned unchanged.
///
/// ```rust
/// use pix_exif::sync::exposure_to_fraction;
///
/// assert_eq!(exposure_to_fraction("0.01"), "1/100");
/// assert_eq!(exposure_to_fraction("0.4"), "1/2.5");
/// assert_eq!(exposure_to_fraction("2"), "2");
/// ```
pub fn exposure_to_fraction(stored: &str) -> String {
    let Some(seconds) = parse_number(stored.trim()) else {
        return stored.to_string();
    };
    if seconds <= 0.0 {
        return stored.to_string();
    }

    let reciprocal = 1.0 / seconds;
    if reciprocal <= 1.0 || !reciprocal.is_finite() || reciprocal.round() >= u64::MAX as f64 {
        return stored.to_string();
    }

    let tenths = (reciprocal * 10.0).round() as i64;
    if TENTH_STOP_RECIPROCALS.contains(&tenths) {
        format!("1/{:.1}", tenths as f64 / 10.0)
    } else {
        format!("1/{}", reciprocal.round() as u64)
    }
}

/// Render a float with at most 14 significant digits, no trailing zeros.
///
/// Magnitudes below 1e-4 or from 1e14 up use the host's scientific form,
/// e.g. `1.0E-30`, `1.25E+20`.
pub fn format_decimal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    if !(-4..SIGNIFICANT_DIGITS).contains(&magnitude) {
        return format_scientific(value);
    }

    let decimals = (SIGNIFICANT_DIGITS - 1 - magnitude).clamp(0, 20) as usize;
    let mut out = format!("{value:.decimals$}");

    if out.contains('.') {
        let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
        out.truncate(trimmed);
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}

fn format_scientific(value: f64) -> String {
    let precision = (SIGNIFICANT_DIGITS - 1) as usize;
    let sci = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };

    let mut mantissa = mantissa.trim_end_matches('0').to_string();
    if mantissa.ends_with('.') {
        mantissa.push('0');
    }
    let exponent = exponent.parse::<i32>().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{}", exponent.abs())
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn strip_f_number_prefix(s: &str) -> &str {
    s.strip_prefix("f/")
        .or_else(|| s.strip_prefix("F/"))
        .map(str::trim_start)
        .unwrap_or(s)
}

/// Plain decimal number. Rejects empty text, `inf` and `NaN`.
fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn invalid(input: &str) -> SyncError {
    SyncError::InvalidFractionFormat {
        input: input.to_string(),
    }
}
