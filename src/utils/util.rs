//! # Utility Module
//!
//! Miscellaneous helpers used throughout the crate.
//!
//! ## `clamp`
//!
//! Restricts a value to lie within a range. Every numeric adjustment the
//! mission geometry adjuster makes goes through it, so the documented bounds
//! live in exactly one kind of expression.

/// Clamps a value between a minimum and maximum.
///
/// Works for any partially ordered type, so the same call bounds room counts
/// (`i32`) and probabilities (`f64`).
///
/// # Arguments
///
/// * `value` - The input value to be clamped.
/// * `min` - The minimum allowable value.
/// * `max` - The maximum allowable value.
///
/// # Examples
///
/// ```
/// use dungeon_forge::utils::util::clamp;
///
/// assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
/// assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
/// assert_eq!(clamp(30, 6, 25), 25);
/// ```
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_within_bounds() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(12, 6, 25), 12);
    }

    #[test]
    fn test_clamp_below_bounds() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(2, 6, 25), 6);
    }

    #[test]
    fn test_clamp_above_bounds() {
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(0.61, 0.45, 0.58), 0.58);
    }
}
