/// Checks that a numerical value is in the provided interval `[a,b]` and returns
/// early with [`Error::OutOfInterval`](crate::Error::OutOfInterval) if not
///
/// ### Example
/// ```ignore
/// let gamma = 2.0;
/// ensure_interval!(gamma, 0.0, 1.0);
/// ```
/// This returns an error that renders as "invalid value 2 for \`gamma\`: must be in the interval \[0, 1\]".
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::OutOfInterval {
                name: stringify!($var),
                value: $var as f64,
                low: $a as f64,
                high: $b as f64,
            });
        }
    };
}

/// Index of the first maximum in `values`
///
/// Ties resolve to the lowest index. NaN entries never win against a number.
///
/// **Panics** if `values` is empty
pub(crate) fn argmax(values: &[f32]) -> usize {
    assert!(!values.is_empty(), "argmax of an empty slice");
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] || (values[best].is_nan() && !v.is_nan()) {
            best = i;
        }
    }
    best
}

/// Largest value in `values`, or `0.0` when empty
pub(crate) fn max(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values[argmax(values)]
    }
}
