pub mod streaming_calculators;
pub mod tuple_range;

pub use tuple_range::{
    TupleRange,
    TupleRangeError,
};

/// Trapezoidal integral of `y` over `x`.
///
/// Both slices must be the same length and `x` sorted ascending,
/// fewer than two points integrate to zero.
pub fn trapezoid_area(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trapezoid_area() {
        // Triangle with base 2 and height 10
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 10.0, 0.0];
        assert!((trapezoid_area(&x, &y) - 10.0).abs() < 1e-12);
        assert_eq!(trapezoid_area(&[1.0], &[5.0]), 0.0);
        assert_eq!(trapezoid_area(&[], &[]), 0.0);
    }
}
