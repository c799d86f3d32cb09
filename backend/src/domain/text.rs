//! Length-bounded text shared by entity validators.

/// Why a bounded text field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextViolation {
    Empty,
    TooLong,
}

/// Trim `raw` and check it is non-empty and at most `max_chars` characters.
pub(crate) fn bounded(raw: &str, max_chars: usize) -> Result<String, TextViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TextViolation::Empty);
    }
    if trimmed.chars().count() > max_chars {
        return Err(TextViolation::TooLong);
    }
    Ok(trimmed.to_owned())
}

/// Trim `raw` and check it is non-empty; no upper bound.
pub(crate) fn required(raw: &str) -> Result<String, TextViolation> {
    bounded(raw, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Postres ", 10, Ok("Postres".to_owned()))]
    #[case("   ", 10, Err(TextViolation::Empty))]
    #[case("ñandú", 5, Ok("ñandú".to_owned()))]
    #[case("ñandúes", 5, Err(TextViolation::TooLong))]
    fn bounded_counts_characters(
        #[case] raw: &str,
        #[case] max: usize,
        #[case] expected: Result<String, TextViolation>,
    ) {
        assert_eq!(bounded(raw, max), expected);
    }
}
