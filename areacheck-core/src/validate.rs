//! Domain checks applied to a complete form before anything is sent.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::ValidationError;
use crate::region::RegionParameter;

pub const Y_RANGE: RangeInclusive<f64> = -3.0..=3.0;
pub const R_RANGE: RangeInclusive<f64> = RegionParameter::RANGE;

/// A validated (X, Y, R) triple, ready to hand to the evaluator.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// Parse user text as a finite decimal, accepting `,` as the decimal separator.
///
/// Empty (or all-whitespace) text is not a number.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim().replace(',', ".");
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn in_range(text: &str, range: &RangeInclusive<f64>) -> Option<f64> {
    parse_decimal(text).filter(|v| range.contains(v))
}

pub fn validate_y(text: &str) -> Result<f64, ValidationError> {
    in_range(text, &Y_RANGE).ok_or(ValidationError::Y)
}

pub fn validate_r(text: &str) -> Result<f64, ValidationError> {
    in_range(text, &R_RANGE).ok_or(ValidationError::R)
}

/// Checks X, then Y, then R, stopping at the first failure.
pub fn validate(selected_x: &[f64], y: &str, r: &str) -> Result<Point, ValidationError> {
    let x = match selected_x {
        [x] => *x,
        _ => return Err(ValidationError::XSelection { selected: selected_x.len() }),
    };
    let y = validate_y(y)?;
    let r = validate_r(r)?;
    Ok(Point { x, y, r })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("2,5"), Some(2.5));
        assert_eq!(parse_decimal(" 2.5 "), Some(2.5));
        assert_eq!(parse_decimal("-3"), Some(-3.));
        assert_eq!(parse_decimal("+1"), Some(1.));
        assert_eq!(parse_decimal("2."), Some(2.));
        assert_eq!(parse_decimal(".5"), Some(0.5));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("-"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("1.2.3"), None);
    }

    #[test]
    fn test_y_bounds() {
        assert!(validate_y("3.0001").is_err());
        assert!(validate_y("-3.0001").is_err());
        assert_eq!(validate_y("-3"), Ok(-3.));
        assert_eq!(validate_y("3"), Ok(3.));
        assert_eq!(validate_y(""), Err(ValidationError::Y));
    }

    #[test]
    fn test_r_bounds() {
        assert!(validate_r("1.999").is_err());
        assert!(validate_r("5.001").is_err());
        assert_eq!(validate_r("2"), Ok(2.));
        assert_eq!(validate_r("5"), Ok(5.));
    }

    #[test]
    fn test_comma_equivalence() {
        assert_eq!(validate_r("2,5"), validate_r("2.5"));
        assert_eq!(validate_y("-1,25"), validate_y("-1.25"));
    }

    #[test]
    fn test_order_short_circuits() {
        assert_eq!(validate(&[], "", ""), Err(ValidationError::XSelection { selected: 0 }));
        assert_eq!(validate(&[1., 2.], "0", "3"), Err(ValidationError::XSelection { selected: 2 }));
        assert_eq!(validate(&[1.], "9", "9"), Err(ValidationError::Y));
        assert_eq!(validate(&[1.], "0", "9"), Err(ValidationError::R));
        assert_eq!(validate(&[1.], "0", "3"), Ok(Point { x: 1., y: 0., r: 3. }));
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::XSelection { selected: 0 }.to_string(), "choose exactly one X value");
        assert_eq!(ValidationError::Y.to_string(), "Y must be a number from -3 to 3");
        assert_eq!(ValidationError::R.to_string(), "R must be a number from 2 to 5");
    }
}
