use regex::Regex;
use thiserror::Error;

lazy_static! {
    // a count as rendered by the UI: "1,234", "1.2K", "3M"
    static ref COUNT_RE: Regex = Regex::new(r"\d[\d,.]*[kKmM]?").unwrap();
    static ref DIGITS_RE: Regex = Regex::new(r"\d+").unwrap();
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCountError {
    #[error("no_digits: {0:?}")]
    NoDigits(String),
    #[error("invalid_number: {0:?}")]
    InvalidNumber(String),
}

/// Parses a count as Facebook formats it into an integer.
///
/// Thousands separators are dropped, a `k` suffix multiplies by a thousand and
/// an `m` suffix by a million (fractions truncated toward zero). Without a unit
/// the first run of digits is used. The input is expected to have been picked
/// out with [`find_count`] first; anything without digits is an error.
pub fn parse_count(raw: &str) -> Result<u64, ParseCountError> {
    let s = raw.trim().to_lowercase().replace(',', "");

    if s.contains('k') {
        return scaled(&s, 'k', 1_000.0);
    }
    if s.contains('m') {
        return scaled(&s, 'm', 1_000_000.0);
    }

    let digits = DIGITS_RE
        .find(&s)
        .ok_or_else(|| ParseCountError::NoDigits(raw.into()))?;

    digits
        .as_str()
        .parse::<u64>()
        .map_err(|_| ParseCountError::InvalidNumber(raw.into()))
}

fn scaled(s: &str, unit: char, factor: f64) -> Result<u64, ParseCountError> {
    let value = s
        .replace(unit, "")
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseCountError::InvalidNumber(s.into()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(ParseCountError::InvalidNumber(s.into()));
    }

    let scaled = value * factor;
    // u64::MAX rounds up to 2^64 as a float, so anything at or past it is out of range
    if scaled >= u64::MAX as f64 {
        return Err(ParseCountError::InvalidNumber(s.into()));
    }

    Ok(scaled as u64)
}

/// Finds the first count-looking substring in `text` and normalizes it.
pub fn find_count(text: &str) -> Option<u64> {
    let m = COUNT_RE.find(text)?;
    match parse_count(m.as_str()) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("could not parse count in {:?}: {}", text, e);
            None
        }
    }
}
