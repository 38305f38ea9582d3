/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```
/// # use recycling_robot::assert_interval;
/// let learning_rate = 0.5;
/// assert_interval!(learning_rate, 0.0, 1.0);
/// ```
/// A value of `2.0` would panic with the message "Invalid value for \`learning_rate\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Returns `true` if `value` lies in the closed interval `[0,1]`
pub(crate) fn is_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
