//! Empirical p-values against a pooled null sample.

/// Fraction of `sorted_null` that is greater than or equal to `observed`.
///
/// `sorted_null` must be ascending. An empty null sample yields NaN.
pub fn empirical_p_value(observed: f64, sorted_null: &[f64]) -> f64 {
    if sorted_null.is_empty() {
        return f64::NAN;
    }
    let below = sorted_null.partition_point(|&x| x < observed);
    (sorted_null.len() - below) as f64 / sorted_null.len() as f64
}

/// Empirical p-value of every observed value against one shared null sample.
///
/// The null sample is a single global reference: every observation is
/// compared against all of it, regardless of position.
pub fn empirical_p_values(observed: &[f64], sorted_null: &[f64]) -> Vec<f64> {
    observed
        .iter()
        .map(|&x| empirical_p_value(x, sorted_null))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_ties_as_extreme() {
        let null = [1.0, 2.0, 2.0, 3.0];
        assert_eq!(empirical_p_value(2.0, &null), 0.75);
        assert_eq!(empirical_p_value(0.0, &null), 1.0);
        assert_eq!(empirical_p_value(3.5, &null), 0.0);
        assert_eq!(empirical_p_value(3.0, &null), 0.25);
    }

    #[test]
    fn test_monotone_in_observed() {
        let null: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 / 10.0).collect();
        let mut sorted = null.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let observed: Vec<f64> = (0..120).map(|i| i as f64 / 10.0).collect();
        let p = empirical_p_values(&observed, &sorted);
        for w in p.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }

    #[test]
    fn test_empty_null_is_nan() {
        assert!(empirical_p_value(1.0, &[]).is_nan());
    }
}
