/// Default number of items returned by list endpoints.
pub const DEFAULT_LIMIT: usize = 50;

/// Upper bound on a caller-supplied list limit.
pub const MAX_LIMIT: usize = 200;

pub fn validate_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Trims the value and maps blank strings to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(validate_limit(None), DEFAULT_LIMIT);
        assert_eq!(validate_limit(Some(0)), 1);
        assert_eq!(validate_limit(Some(10_000)), MAX_LIMIT);
        assert_eq!(validate_limit(Some(7)), 7);
    }

    #[test]
    fn blank_optional_becomes_none() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" Font ".into())), Some("Font".into()));
        assert_eq!(normalize_optional(None), None);
    }
}
