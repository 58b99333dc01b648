//! Discrete value sets a camera can actually be set to.

use anyhow::Result;
use serde::Serialize;

/// Full and third stops from f/1.0 to f/32.
pub const STANDARD_APERTURES: &[f64] = &[
    1.0, 1.1, 1.2, 1.4, 1.6, 1.8, 2.0, 2.2, 2.5, 2.8, 3.2, 3.5, 4.0, 4.5, 5.0, 5.6, 6.3, 7.1, 8.0,
    9.0, 10.0, 11.0, 13.0, 14.0, 16.0, 18.0, 20.0, 22.0, 25.0, 29.0, 32.0,
];

/// Full-stop shutter times in seconds, 1/8000 s to 48 h.
pub const STANDARD_SHUTTER_SPEEDS: &[f64] = &[
    1.0 / 8000.0,
    1.0 / 4000.0,
    1.0 / 2000.0,
    1.0 / 1000.0,
    1.0 / 500.0,
    1.0 / 250.0,
    1.0 / 125.0,
    1.0 / 60.0,
    1.0 / 30.0,
    1.0 / 15.0,
    1.0 / 8.0,
    1.0 / 4.0,
    1.0 / 2.0,
    1.0,
    2.0,
    4.0,
    8.0,
    15.0,
    30.0,
    60.0,
    120.0,
    240.0,
    480.0,
    900.0,
    1800.0,
    3600.0,
    7200.0,
    14400.0,
    28800.0,
    43200.0,
    86400.0,
    172800.0,
];

pub const STANDARD_ISOS: &[f64] = &[
    50.0, 64.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 320.0, 400.0, 500.0, 640.0, 800.0,
    1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3200.0, 4000.0, 5000.0, 6400.0, 8000.0, 10000.0,
    12800.0, 16000.0, 20000.0, 25600.0,
];

/// Immutable ordered list of legal values for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscreteValueSet {
    values: Vec<f64>,
}

impl DiscreteValueSet {
    /// Build a set from arbitrary values; they must be finite and positive.
    /// Values are sorted ascending and duplicates dropped.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Result<Self> {
        let mut values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            anyhow::bail!("A value set needs at least one value");
        }
        if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            anyhow::bail!("Value set entries must be positive (got {bad})");
        }
        values.sort_by(f64::total_cmp);
        values.dedup();
        Ok(Self { values })
    }

    pub fn standard_apertures() -> Self {
        Self {
            values: STANDARD_APERTURES.to_vec(),
        }
    }

    pub fn standard_shutter_speeds() -> Self {
        Self {
            values: STANDARD_SHUTTER_SPEEDS.to_vec(),
        }
    }

    pub fn standard_isos() -> Self {
        Self {
            values: STANDARD_ISOS.to_vec(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn min(&self) -> f64 {
        self.values[0]
    }

    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Entry with the smallest absolute difference to `target`; ties go to the earlier entry.
    pub fn nearest(&self, target: f64) -> f64 {
        let mut best = self.values[0];
        let mut best_diff = (best - target).abs();
        for &value in &self.values[1..] {
            let diff = (value - target).abs();
            if diff < best_diff {
                best = value;
                best_diff = diff;
            }
        }
        best
    }

    pub fn contains(&self, value: f64) -> bool {
        self.values.iter().any(|v| (v - value).abs() < f64::EPSILON * v.max(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_are_sorted() {
        for set in [
            DiscreteValueSet::standard_apertures(),
            DiscreteValueSet::standard_shutter_speeds(),
            DiscreteValueSet::standard_isos(),
        ] {
            assert!(set.values().windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(DiscreteValueSet::standard_apertures().min(), 1.0);
        assert_eq!(DiscreteValueSet::standard_apertures().max(), 32.0);
        assert_eq!(DiscreteValueSet::standard_shutter_speeds().max(), 172800.0);
        assert_eq!(DiscreteValueSet::standard_isos().max(), 25600.0);
    }

    #[test]
    fn test_nearest() {
        let apertures = DiscreteValueSet::standard_apertures();
        assert_eq!(apertures.nearest(5.5), 5.6);
        assert_eq!(apertures.nearest(0.5), 1.0);
        assert_eq!(apertures.nearest(100.0), 32.0);

        let shutters = DiscreteValueSet::standard_shutter_speeds();
        assert_eq!(shutters.nearest(0.49), 0.5);
        assert_eq!(shutters.nearest(100.0), 120.0);
    }

    #[test]
    fn test_nearest_tie_keeps_earlier_entry() {
        let set = DiscreteValueSet::new([2.0, 4.0]).unwrap();
        assert_eq!(set.nearest(3.0), 2.0);
    }

    #[test]
    fn test_new_sorts_and_validates() {
        let set = DiscreteValueSet::new([400.0, 100.0, 200.0, 100.0]).unwrap();
        assert_eq!(set.values(), &[100.0, 200.0, 400.0]);
        assert!(set.contains(200.0));
        assert!(!set.contains(300.0));

        assert!(DiscreteValueSet::new(Vec::<f64>::new()).is_err());
        assert!(DiscreteValueSet::new([100.0, 0.0]).is_err());
        assert!(DiscreteValueSet::new([f64::NAN]).is_err());
    }
}
