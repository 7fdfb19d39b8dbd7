//! Normal-distribution approximation and percentile estimators. All
//! functions are total: degenerate inputs map to a neutral 0.5 instead of
//! propagating NaN into the scorers.

/// 1 / sqrt(2 * pi)
const INV_SQRT_2PI: f64 = 0.3989422804014327;

/// Converts an interquartile span into standard deviations
/// (p75 - p25 covers 2 * 0.6745 sigma of a normal distribution).
const IQR_TO_SIGMA: f64 = 2.0 * 0.6745;

/// Standard normal CDF via the Abramowitz & Stegun 26.2.17 rational
/// approximation. Max error below 1e-5 across the real line.
pub fn normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return 0.5;
    }
    if z < 0.0 {
        return 1.0 - normal_cdf(-z);
    }

    const P: f64 = 0.2316419;
    const B1: f64 = 0.319381530;
    const B2: f64 = -0.356563782;
    const B3: f64 = 1.781477937;
    const B4: f64 = -1.821255978;
    const B5: f64 = 1.330274429;

    let t = 1.0 / (1.0 + P * z);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;
    let density = INV_SQRT_2PI * (-0.5 * z * z).exp();
    (1.0 - density * (B1 * t + B2 * t2 + B3 * t3 + B4 * t4 + B5 * t5)).clamp(0.0, 1.0)
}

/// Percentile of `score` inside an institution's published 25th/75th band,
/// assuming the underlying distribution is normal. A collapsed or inverted
/// band returns the neutral 0.5.
pub fn parametric_percentile(score: f64, p25: f64, p75: f64) -> f64 {
    if p75 <= p25 || !score.is_finite() {
        return 0.5;
    }
    let mean = (p25 + p75) / 2.0;
    let sigma = (p75 - p25) / IQR_TO_SIGMA;
    normal_cdf((score - mean) / sigma)
}

/// Percentile of `score` within a non-decreasing historical sample.
/// At or below the minimum is 0, at or above the maximum is 1, and an
/// empty sample is the neutral 0.5.
pub fn empirical_percentile(score: f64, sample: &[f64]) -> f64 {
    let Some((&first, &last)) = sample.first().zip(sample.last()) else {
        return 0.5;
    };
    if score <= first {
        return 0.0;
    }
    if score >= last {
        return 1.0;
    }
    let below = sample.partition_point(|&v| v < score);
    below as f64 / sample.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_is_half_at_zero() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn cdf_matches_normal_table() {
        assert!((normal_cdf(1.0) - 0.841345).abs() < 1e-4);
        assert!((normal_cdf(1.96) - 0.975002).abs() < 1e-4);
        assert!((normal_cdf(3.0) - 0.998650).abs() < 1e-4);
        assert!((normal_cdf(-1.0) - 0.158655).abs() < 1e-4);
    }

    #[test]
    fn cdf_is_symmetric() {
        for z in [0.3, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0] {
            assert!((normal_cdf(z) + normal_cdf(-z) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn cdf_saturates_in_the_tails() {
        assert!(normal_cdf(8.0) > 0.999999);
        assert!(normal_cdf(-8.0) < 0.000001);
    }

    #[test]
    fn parametric_midpoint_is_median() {
        assert!((parametric_percentile(1550.0, 1520.0, 1580.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn parametric_upper_bound_is_75th() {
        assert!((parametric_percentile(1580.0, 1520.0, 1580.0) - 0.75).abs() < 1e-3);
    }

    #[test]
    fn parametric_lower_bound_is_25th() {
        assert!((parametric_percentile(1520.0, 1520.0, 1580.0) - 0.25).abs() < 1e-3);
    }

    #[test]
    fn parametric_is_monotonic_in_score() {
        let mut prev = parametric_percentile(1200.0, 1400.0, 1500.0);
        for score in (1210..1700).step_by(10) {
            let next = parametric_percentile(score as f64, 1400.0, 1500.0);
            assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn parametric_degenerate_band_is_neutral() {
        assert_eq!(parametric_percentile(1500.0, 1580.0, 1520.0), 0.5);
        assert_eq!(parametric_percentile(1500.0, 1550.0, 1550.0), 0.5);
    }

    #[test]
    fn empirical_empty_sample_is_neutral() {
        assert_eq!(empirical_percentile(1400.0, &[]), 0.5);
    }

    #[test]
    fn empirical_extremes_pin_to_zero_and_one() {
        let sample = [1300.0, 1400.0, 1500.0];
        assert_eq!(empirical_percentile(1200.0, &sample), 0.0);
        assert_eq!(empirical_percentile(1300.0, &sample), 0.0);
        assert_eq!(empirical_percentile(1500.0, &sample), 1.0);
        assert_eq!(empirical_percentile(1600.0, &sample), 1.0);
    }

    #[test]
    fn empirical_interior_rank_fraction() {
        let sample = [1300.0, 1350.0, 1400.0, 1450.0, 1500.0, 1550.0, 1600.0];
        let got = empirical_percentile(1450.0, &sample);
        assert!((got - 3.0 / 7.0).abs() < 1e-9);
    }
}
