//! Checks applied to raw user input before an entity is created or edited.

use crate::date::{parse_date, LocalDate};
use crate::error::ValidationError;

/// Trim a title and reject it if nothing is left.
pub fn parse_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title.to_string())
}

/// Parse a point or cost amount typed by the user.
///
/// Fractional input is floored; the floored value must be positive.
pub fn parse_points(raw: &str) -> Result<u64, ValidationError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(ValidationError::NotANumber(trimmed.to_string()));
    }
    check_points(value.floor() as i64)
}

/// Reject zero and negative amounts.
pub fn check_points(value: i64) -> Result<u64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositivePoints(value));
    }
    Ok(value as u64)
}

/// Parse a bounty deadline. Blank input means the deadline was not given.
pub fn parse_deadline(raw: &str) -> Result<LocalDate, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::MissingDeadline);
    }
    parse_date(raw).map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed() {
        assert_eq!(parse_title("  read  ").unwrap(), "read");
        assert_eq!(parse_title(" \t "), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn points_accept_positive_integers() {
        assert_eq!(parse_points("25").unwrap(), 25);
        assert_eq!(parse_points(" 7 ").unwrap(), 7);
    }

    #[test]
    fn points_floor_fractions() {
        assert_eq!(parse_points("12.9").unwrap(), 12);
        assert_eq!(parse_points("0.5"), Err(ValidationError::NonPositivePoints(0)));
    }

    #[test]
    fn points_reject_non_positive_and_garbage() {
        assert_eq!(parse_points("0"), Err(ValidationError::NonPositivePoints(0)));
        assert_eq!(parse_points("-3"), Err(ValidationError::NonPositivePoints(-3)));
        assert!(matches!(parse_points("abc"), Err(ValidationError::NotANumber(_))));
        assert!(matches!(parse_points(""), Err(ValidationError::NotANumber(_))));
        assert!(matches!(parse_points("inf"), Err(ValidationError::NotANumber(_))));
        assert!(matches!(parse_points("NaN"), Err(ValidationError::NotANumber(_))));
    }

    #[test]
    fn deadline_required() {
        assert_eq!(parse_deadline(""), Err(ValidationError::MissingDeadline));
        assert!(matches!(parse_deadline("31/12/2024"), Err(ValidationError::InvalidDate(_))));
        assert_eq!(parse_deadline("2024-12-31").unwrap().to_string(), "2024-12-31");
    }
}
