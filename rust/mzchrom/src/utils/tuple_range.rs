use thiserror::Error;

/// TupleRange represents a range defined by a tuple of two elements (T, T).
///
/// It represents a range as closed-closed [a, b], meaning both endpoints are inclusive.
/// Importantly, it ensures that the first element is always less than or equal to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TupleRange<T: Copy + PartialOrd>(T, T);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TupleRangeError<T: Copy + PartialOrd + std::fmt::Debug> {
    #[error(
        "Expected the first element to be less than or equal to the second, got ({0:?}, {1:?})"
    )]
    ExpectedOrderedRange(T, T),
}

impl<T: Copy + PartialOrd + std::fmt::Debug> TupleRange<T> {
    /// Creates a new `TupleRange` ensuring that the first element
    /// is less than or equal to the second.
    ///
    /// NaN endpoints never compare as ordered, so they are rejected too.
    pub fn try_new(left: T, right: T) -> Result<Self, TupleRangeError<T>> {
        match left.partial_cmp(&right) {
            Some(std::cmp::Ordering::Less) | Some(std::cmp::Ordering::Equal) => {
                Ok(Self(left, right))
            }
            _ => Err(TupleRangeError::ExpectedOrderedRange(left, right)),
        }
    }

    pub fn as_tuple(&self) -> (T, T) {
        (self.0, self.1)
    }

    pub fn contains(&self, x: T) -> bool {
        self.0 <= x && x <= self.1
    }

    pub fn start(&self) -> T {
        self.0
    }

    pub fn end(&self) -> T {
        self.1
    }

    /// Smallest range covering both `self` and `other`.
    pub fn span(&self, other: Self) -> Self {
        let left = if other.0 < self.0 { other.0 } else { self.0 };
        let right = if other.1 > self.1 { other.1 } else { self.1 };
        Self(left, right)
    }

    /// Degenerate range holding a single value.
    pub fn singleton(x: T) -> Self {
        Self(x, x)
    }
}

impl TupleRange<f64> {
    pub fn width(&self) -> f64 {
        self.1 - self.0
    }
}

impl<T> TryInto<TupleRange<T>> for (T, T)
where
    T: Copy + PartialOrd + std::fmt::Debug,
{
    type Error = TupleRangeError<T>;

    fn try_into(self) -> Result<TupleRange<T>, Self::Error> {
        TupleRange::try_new(self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_and_nan() {
        assert!(TupleRange::try_new(2.0, 1.0).is_err());
        assert!(TupleRange::try_new(f64::NAN, 1.0).is_err());
        assert!(TupleRange::try_new(1.0, 1.0).is_ok());
    }

    #[test]
    fn test_span_and_contains() {
        let a = TupleRange::try_new(1.0, 2.0).unwrap();
        let b = TupleRange::try_new(1.5, 4.0).unwrap();
        let c = a.span(b);
        assert_eq!(c.as_tuple(), (1.0, 4.0));
        assert!(c.contains(1.0));
        assert!(c.contains(4.0));
        assert!(!c.contains(4.0001));
        assert!((c.width() - 3.0).abs() < 1e-12);
    }
}
