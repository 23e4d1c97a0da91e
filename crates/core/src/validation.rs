//! Input validation helpers shared by every entity.

use validator::Validate;

use crate::error::CoreError;
use crate::types::Date;

/// Run `validator` derive rules and flatten failures into one
/// [`CoreError::Validation`] message (`field: code` pairs, sorted by field).
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|errors| {
        let mut parts: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field}: {detail}")
            })
            .collect();
        parts.sort();
        CoreError::Validation(parts.join("; "))
    })
}

/// Reject a blank required string.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_percentage(field: &str, value: i32) -> Result<(), CoreError> {
    if !(0..=100).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

/// Deliverable weights share the percentage range but are fractional.
pub fn validate_weight(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "weight must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

pub fn validate_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative amount, got {value}"
        )));
    }
    Ok(())
}

pub fn validate_opt_amount(field: &str, value: Option<f64>) -> Result<(), CoreError> {
    value.map_or(Ok(()), |v| validate_amount(field, v))
}

/// When both ends are known the end must not precede the start.
pub fn validate_date_range(start: Option<Date>, end: Option<Date>) -> Result<(), CoreError> {
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            return Err(CoreError::Validation(format!(
                "end date {e} is before start date {s}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5))]
        code: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn validate_input_reports_every_field() {
        let bad = Sample {
            code: "TOO-LONG".into(),
            email: "nope".into(),
        };
        let err = validate_input(&bad).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert!(msg.starts_with("code: length"));
            assert!(msg.contains("email: email"));
        });
    }

    #[test]
    fn validate_input_accepts_valid() {
        let ok = Sample {
            code: "P1".into(),
            email: "a@b.org".into(),
        };
        assert!(validate_input(&ok).is_ok());
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_percentage("completion_pct", 0).is_ok());
        assert!(validate_percentage("completion_pct", 100).is_ok());
        assert!(validate_percentage("completion_pct", 101).is_err());
        assert!(validate_percentage("completion_pct", -1).is_err());
    }

    #[test]
    fn weight_rejects_nan_and_out_of_range() {
        assert!(validate_weight(12.5).is_ok());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(100.5).is_err());
    }

    #[test]
    fn amounts_are_non_negative() {
        assert!(validate_amount("budget", 0.0).is_ok());
        assert!(validate_amount("budget", -0.01).is_err());
        assert!(validate_opt_amount("budget", None).is_ok());
    }

    #[test]
    fn date_range_order() {
        let a = NaiveDate::from_ymd_opt(2026, 1, 1);
        let b = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert!(validate_date_range(a, b).is_ok());
        assert!(validate_date_range(b, a).is_err());
        assert!(validate_date_range(None, a).is_ok());
    }

    #[test]
    fn blank_strings_rejected() {
        assert!(require_non_blank("name", "  ").is_err());
        assert!(require_non_blank("name", "Portal").is_ok());
    }

    #[test]
    fn clamp_limit_behaviour() {
        assert_eq!(clamp_limit(None, 5, 50), 5);
        assert_eq!(clamp_limit(Some(500), 5, 50), 50);
        assert_eq!(clamp_limit(Some(0), 5, 50), 1);
        assert_eq!(clamp_offset(Some(-3)), 0);
    }
}
