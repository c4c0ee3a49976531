use crate::data::{Dataset, Reading};
use crate::error::{DataError, Result};
use crate::symbols::RadiusScaler;

/// Summary used to size the legend's reference circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataStats {
    /// Smallest value drawn above the threshold radius. Anchors the legend's
    /// smallest circle to the visual floor rather than the data minimum.
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl DataStats {
    /// Statistics over raw values. The sentinel and zero are both excluded
    /// from `max` and `mean`.
    pub fn from_values(values: impl IntoIterator<Item = f64>, scaler: &RadiusScaler) -> Result<Self> {
        let (count, sum, max) = values
            .into_iter()
            .filter_map(|v| match Reading::from_raw(v) {
                Reading::Percent(p) => Some(p),
                Reading::NoData | Reading::Zero => None,
            })
            .fold((0usize, 0.0f64, f64::MIN), |(n, sum, max), v| (n + 1, sum + v, max.max(v)));

        if count == 0 {
            return Err(DataError::NoValidValues);
        }

        Ok(Self {
            min: scaler.floor_value(),
            max,
            mean: sum / count as f64,
        })
    }

    /// Statistics across every country and year of a dataset
    pub fn from_dataset(dataset: &Dataset, scaler: &RadiusScaler) -> Result<Self> {
        Self::from_values(dataset.values(), scaler)
    }
}
