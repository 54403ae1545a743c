//! Number formatting utilities.

/// Clamp a percentage into the displayable 0-100 range.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Format a clamped percentage as a whole number with a `%` suffix.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", clamp_percent(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert!((clamp_percent(110.0) - 100.0).abs() < f64::EPSILON);
        assert!((clamp_percent(-10.0) - 0.0).abs() < f64::EPSILON);
        assert!((clamp_percent(55.0) - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_round_trip() {
        // clamp(100 - clamp(p)) == clamp(100 - p) over the whole input range.
        let mut p = 0.0;
        while p <= 200.0 {
            let lhs = clamp_percent(100.0 - clamp_percent(p));
            let rhs = clamp_percent(100.0 - p);
            assert!((lhs - rhs).abs() < f64::EPSILON, "mismatch at {p}");
            p += 0.5;
        }
    }

    #[test]
    fn format_rounds_to_integer() {
        assert_eq!(format_percent(33.4), "33%");
        assert_eq!(format_percent(33.5), "34%");
        assert_eq!(format_percent(120.0), "100%");
    }
}
