use num_traits::{Float, FromPrimitive};

/// Returns `n` evenly spaced values over `[y_start, y_end]`.
///
/// A single value is `y_start`.
pub fn linspace<T>(y_start: T, y_end: T, n: usize) -> impl Iterator<Item = T>
where
    T: Float + FromPrimitive,
{
    let dy = if n > 1 {
        (y_end - y_start) / T::from(n - 1).unwrap()
    } else {
        T::zero()
    };
    (0..n).map(move |x| y_start + T::from(x).unwrap() * dy)
}
