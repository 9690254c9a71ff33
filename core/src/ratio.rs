//! Safe ratio utility and descriptive helpers over possibly-undefined values.
//!
//! RULE: every derived ratio in the crate goes through `safe_ratio`.
//! Direct division is forbidden: real days and groups exist with zero
//! spend, zero clicks or zero orders.

use crate::types::Ratio;

/// `numerator / denominator`, or `None` when the denominator is exactly zero.
pub fn safe_ratio(numerator: f64, denominator: f64) -> Ratio {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Headline fallback: undefined renders as zero.
pub fn or_zero(ratio: Ratio) -> f64 {
    ratio.unwrap_or(0.0)
}

/// Mean over the defined values only. `None` if nothing is defined.
pub fn mean<I>(values: I) -> Ratio
where
    I: IntoIterator<Item = Ratio>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    safe_ratio(sum, count as f64)
}

/// Sample (n - 1) standard deviation over the defined values.
/// Needs at least two defined values.
pub fn sample_stddev<I>(values: I) -> Ratio
where
    I: IntoIterator<Item = Ratio>,
{
    let defined: Vec<f64> = values.into_iter().flatten().collect();
    if defined.len() < 2 {
        return None;
    }
    let avg = mean(defined.iter().copied().map(Some))?;
    let sq_dev: f64 = defined.iter().map(|v| (v - avg).powi(2)).sum();
    safe_ratio(sq_dev, (defined.len() - 1) as f64).map(f64::sqrt)
}

/// Coefficient of variation: sample stddev divided by mean.
pub fn coefficient_of_variation<I>(values: I) -> Ratio
where
    I: IntoIterator<Item = Ratio>,
{
    let defined: Vec<Ratio> = values.into_iter().collect();
    let sd = sample_stddev(defined.iter().copied())?;
    let avg = mean(defined)?;
    safe_ratio(sd, avg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_skips_undefined_values() {
        let m = mean([Some(1.0), None, Some(3.0)]);
        assert_eq!(m, Some(2.0));
    }

    #[test]
    fn mean_of_nothing_is_undefined() {
        assert_eq!(mean(Vec::<Ratio>::new()), None);
        assert_eq!(mean([None, None]), None);
    }

    #[test]
    fn sample_stddev_uses_n_minus_one() {
        // values 2, 4, 4, 4, 5, 5, 7, 9: sum of squared deviations = 32
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].map(Some);
        let sd = sample_stddev(values).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12, "got {sd}");
    }

    #[test]
    fn sample_stddev_needs_two_values() {
        assert_eq!(sample_stddev([Some(5.0)]), None);
        assert_eq!(sample_stddev([Some(5.0), None]), None);
    }

    #[test]
    fn coefficient_of_variation_undefined_for_zero_mean() {
        assert_eq!(coefficient_of_variation([Some(-1.0), Some(1.0)]), None);
    }
}
