use crate::config::{
    FLANNERY_COEFFICIENT, FLANNERY_EXPONENT, MIN_RADIUS_CONSTANT, MIN_VALUE_CONSTANT,
    THRESHOLD_RADIUS,
};

/// Flannery-compensated radius scaling for proportional symbols.
///
/// Area-proportional circles make small values look smaller than they are,
/// so the radius grows with a sub-linear power of the value:
///
/// ```text
/// radius = coefficient * (value / min_value) ^ exponent * min_radius
/// ```
///
/// The result never drops below `threshold`, so every symbol stays visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScaler {
    pub threshold: f64,
    pub min_value: f64,
    pub min_radius: f64,
    pub exponent: f64,
    pub coefficient: f64,
}

impl Default for RadiusScaler {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD_RADIUS,
            min_value: MIN_VALUE_CONSTANT,
            min_radius: MIN_RADIUS_CONSTANT,
            exponent: FLANNERY_EXPONENT,
            coefficient: FLANNERY_COEFFICIENT,
        }
    }
}

impl RadiusScaler {
    /// Radius for a raw attribute value.
    ///
    /// Total over every `f64`: the sentinel, zero, negatives and NaN all map
    /// to the threshold.
    pub fn radius(&self, value: f64) -> f64 {
        if !(value > 0.0) || !value.is_finite() {
            return self.threshold;
        }
        let radius = self.coefficient * (value / self.min_value).powf(self.exponent) * self.min_radius;
        radius.max(self.threshold)
    }

    /// Inverse of the unclamped formula: the value that scales to `radius`.
    pub fn value_at_radius(&self, radius: f64) -> f64 {
        self.min_value * (radius / (self.coefficient * self.min_radius)).powf(1.0 / self.exponent)
    }

    /// Smallest value whose symbol is drawn above the threshold
    pub fn floor_value(&self) -> f64 {
        self.value_at_radius(self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sentinel_and_zero_use_threshold() {
        let scaler = RadiusScaler::default();
        assert_eq!(scaler.radius(-1.0), 5.0);
        assert_eq!(scaler.radius(0.0), 5.0);
        assert_eq!(scaler.radius(f64::NAN), 5.0);
    }

    #[test]
    fn test_france_1990() {
        let scaler = RadiusScaler::default();
        let expected = 1.0083 * (75.0f64 / 3.0).powf(0.5715) * 5.0;
        assert!((scaler.radius(75.0) - expected).abs() < 1e-9);
        assert!((scaler.radius(75.0) - 31.73).abs() < 0.01);
    }

    #[test]
    fn test_small_values_clamp_to_threshold() {
        let scaler = RadiusScaler::default();
        // 1% is below the floor value (~2.96)
        assert_eq!(scaler.radius(1.0), 5.0);
        assert_eq!(scaler.radius(0.01), 5.0);
    }

    #[test]
    fn test_floor_value_round_trips_to_threshold() {
        let scaler = RadiusScaler::default();
        let floor = scaler.floor_value();
        assert!((floor - 2.9569).abs() < 1e-3);
        assert!((scaler.radius(floor) - scaler.threshold).abs() < 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_radius_never_below_threshold(v in -10.0f64..1000.0) {
            let scaler = RadiusScaler::default();
            prop_assert!(scaler.radius(v) >= scaler.threshold);
        }

        #[test]
        fn prop_radius_monotonic(a in 0.0f64..500.0, b in 0.0f64..500.0) {
            let scaler = RadiusScaler::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scaler.radius(lo) <= scaler.radius(hi));
        }

        #[test]
        fn prop_clamped_below_floor(v in 0.0001f64..2.9) {
            let scaler = RadiusScaler::default();
            prop_assert_eq!(scaler.radius(v), scaler.threshold);
        }
    }
}
