//! PERT completion-time statistics.
//!
//! The project finish is approximated as normal with mean equal to the
//! critical-path length and variance equal to the summed variance of the
//! critical activities.

use crate::activity::Activity;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probability {
    pub probability: f64,
    /// Infinite when the variance is zero; serialized as `null` in JSON.
    pub zscore: f64,
    pub std_deviation: f64,
}

/// Sum of `((p - o) / 6)^2` over the activities flagged critical.
pub fn project_variance(activities: &[Activity], critical: &[bool]) -> f64 {
    activities
        .iter()
        .zip(critical)
        .filter(|(_, is_critical)| **is_critical)
        .map(|(activity, _)| activity.variance())
        .sum()
}

/// Probability of finishing by `deadline` given mean `project_duration` and
/// `project_variance`.
pub fn calculate_probability(
    project_duration: f64,
    project_variance: f64,
    deadline: f64,
) -> Probability {
    if project_variance == 0.0 {
        let on_time = deadline >= project_duration;
        return Probability {
            probability: if on_time { 1.0 } else { 0.0 },
            zscore: if on_time {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            },
            std_deviation: 0.0,
        };
    }

    let std_deviation = project_variance.sqrt();
    let zscore = (deadline - project_duration) / std_deviation;
    Probability {
        probability: standard_normal_cdf(zscore),
        zscore,
        std_deviation,
    }
}

/// Φ(z) = ½ (1 + erf(z / √2)).
pub fn standard_normal_cdf(z: f64) -> f64 {
    if z == f64::INFINITY {
        return 1.0;
    }
    if z == f64::NEG_INFINITY {
        return 0.0;
    }
    0.5 * (1.0 + libm::erf(z / SQRT_2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_is_exact_at_the_mean() {
        assert_eq!(standard_normal_cdf(0.0), 0.5);
        assert_eq!(calculate_probability(3.0, 1.78, 3.0).probability, 0.5);
    }

    #[test]
    fn cdf_known_values() {
        assert!((standard_normal_cdf(1.0) - 0.8413).abs() < 1e-3);
        assert!((standard_normal_cdf(1.96) - 0.975).abs() < 1e-3);
        assert!((standard_normal_cdf(-1.645) - 0.05).abs() < 1e-3);
    }

    #[test]
    fn zero_variance_is_a_step_function() {
        let early = calculate_probability(12.0, 0.0, 12.0);
        assert_eq!(early.probability, 1.0);
        assert_eq!(early.zscore, f64::INFINITY);
        assert_eq!(early.std_deviation, 0.0);

        let late = calculate_probability(12.0, 0.0, 11.9);
        assert_eq!(late.probability, 0.0);
        assert_eq!(late.zscore, f64::NEG_INFINITY);
    }

    #[test]
    fn deadline_one_sigma_out() {
        let result = calculate_probability(20.0, 4.0, 22.0);
        assert!((result.std_deviation - 2.0).abs() < 1e-12);
        assert!((result.zscore - 1.0).abs() < 1e-12);
        assert!((result.probability - 0.8413).abs() < 1e-3);
    }

    #[test]
    fn only_critical_activities_contribute_variance() {
        let activities = vec![
            Activity::new("A", "").with_estimates(1.0, 2.0, 9.0),
            Activity::new("B", "").with_estimates(0.0, 1.0, 12.0),
        ];
        let variance = project_variance(&activities, &[true, false]);
        assert!((variance - 16.0 / 9.0).abs() < 1e-12);
    }
}
