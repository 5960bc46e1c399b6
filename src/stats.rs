//! Robust statistics used by the noise-floor estimators.
//!
//! The running median is the workhorse: taking the median inside each
//! sliding window rejects narrowband lines before any averaging happens,
//! which is what makes the resulting noise-floor estimate robust.

use alloc::vec::Vec;
use core::cmp::Ordering;
use num_traits::Float;

fn partial_cmp_total<F: Float>(a: &F, b: &F) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

///
/// Compute the mean of the sample `y`.
///
/// Return the mean and the number of points averaged.
///
/// ```
/// use approx::assert_relative_eq;
/// use sft_rs::stats::mean;
///
/// let y = [2.0f64, 4.0, 6.0];
/// assert_relative_eq!(4.0, mean(&y).0);
///
/// let y: &[f64] = &[];
/// assert_eq!((0.0, 0), mean(y));
/// ```
pub fn mean<F: Float>(y: &[F]) -> (F, usize) {
    if y.is_empty() {
        return (F::zero(), 0);
    }
    let sum = y.iter().fold(F::zero(), |acc, &yi| acc + yi);
    (sum / F::from(y.len()).unwrap(), y.len())
}

///
/// Compute the median of the sample `y` via O(n) selection.
///
/// Return the median and the number of points considered. An empty sample
/// yields `(0, 0)`.
///
/// ```
/// use approx::assert_relative_eq;
/// use sft_rs::stats::median;
///
/// let y = [3.0f64, 1.0, 4.0, 2.0, 5.0];
/// assert_relative_eq!(3.0, median(&y).0);
///
/// let y = [4.0f32, 1.0, 3.0, 2.0];
/// assert_relative_eq!(2.5, median(&y).0);
/// ```
pub fn median<F: Float>(y: &[F]) -> (F, usize) {
    let n = y.len();
    if n == 0 {
        return (F::zero(), 0);
    }
    if n == 1 {
        return (y[0], 1);
    }

    let mut scratch = y.to_vec();
    let (lower, upper_mid, _) = scratch.select_nth_unstable_by(n / 2, partial_cmp_total);
    let upper_mid = *upper_mid;
    if n % 2 == 1 {
        (upper_mid, n)
    } else {
        // Even length: the lower middle is the largest of the left partition.
        let lower_mid = lower.iter().copied().fold(F::neg_infinity(), F::max);
        ((lower_mid + upper_mid) / F::from(2).unwrap(), n)
    }
}

///
/// Compute the running median of `x` with window `block_size`: the median of
/// each block of `block_size` consecutive samples, yielding
/// `x.len() - block_size + 1` values.
///
/// Returns an empty vector when `block_size` is zero or exceeds the input
/// length; callers that consider that an error check before calling.
///
/// ```
/// use sft_rs::stats::running_median;
///
/// let x = [1.0f64, 9.0, 2.0, 8.0, 3.0];
/// assert_eq!(running_median(&x, 3), vec![2.0, 8.0, 3.0]);
/// assert!(running_median(&x, 6).is_empty());
/// ```
pub fn running_median<F: Float>(x: &[F], block_size: usize) -> Vec<F> {
    if block_size == 0 || block_size > x.len() {
        return Vec::new();
    }
    x.windows(block_size).map(|w| median(w).0).collect()
}

#[cfg(test)]
mod tests {
    use super::{mean, median, running_median};
    use approx::assert_relative_eq;

    #[test]
    fn median_handles_duplicates_and_unsorted_input() {
        assert_relative_eq!(3.0, median(&[3.0f64, 1.0, 4.0, 2.0, 3.0, 5.0]).0);
        assert_relative_eq!(7.0, median(&[7.0f64]).0);
        assert_eq!(median::<f64>(&[]), (0.0, 0));
    }

    #[test]
    fn running_median_window_equal_to_input_is_one_value() {
        let x = [5.0f64, 1.0, 3.0];
        assert_eq!(running_median(&x, 3), vec![3.0]);
    }

    #[test]
    fn running_median_rejects_a_line_inside_the_window() {
        // A single loud bin must not drag the local floor estimate up.
        let x = [1.0f64, 1.0, 100.0, 1.0, 1.0];
        assert_eq!(running_median(&x, 3), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn mean_of_slice_range() {
        let x = [1.0f64, 2.0, 3.0, 4.0];
        let (avg, n) = mean(&x[1..3]);
        assert_relative_eq!(2.5, avg);
        assert_eq!(n, 2);
    }
}
