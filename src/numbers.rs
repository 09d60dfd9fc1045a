use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCountError {
    #[error("empty count text")]
    Empty,
    #[error("no digits in count text: {0:?}")]
    NoDigits(String),
}

/// Parses human-readable counts such as `1,234`, `1.2K` or `3M`.
///
/// Text that does not match the pattern falls back to its first run of
/// digits, so `"12 Followers"` still yields 12.
pub fn parse_count(text: &str) -> Result<u64, ParseCountError> {
    let cleaned: String = text
        .trim()
        .to_uppercase()
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(ParseCountError::Empty);
    }

    let (digits, multiplier) = if let Some(value) = cleaned.strip_suffix('K') {
        (value, 1_000.0)
    } else if let Some(value) = cleaned.strip_suffix('M') {
        (value, 1_000_000.0)
    } else {
        (cleaned.as_str(), 1.0)
    };

    if let Ok(value) = digits.parse::<f64>() {
        if value.is_finite() && value >= 0.0 {
            return Ok((value * multiplier).round() as u64);
        }
    }

    first_digit_run(text).ok_or_else(|| ParseCountError::NoDigits(text.trim().to_string()))
}

/// Lenient variant of [`parse_count`]: anything unparseable is 0.
pub fn parse_number(text: &str) -> u64 {
    parse_count(text).unwrap_or(0)
}

fn first_digit_run(text: &str) -> Option<u64> {
    let run: String = text
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    if run.is_empty() {
        return None;
    }
    Some(run.parse::<u64>().unwrap_or(u64::MAX))
}
