use crate::data::Dataset;
use crate::error::{DataError, Result};
use crate::symbols::{
    place, symbolize, Attribute, Control, DataStats, Legend, Marker, RadiusScaler,
    SequenceController,
};
use tracing::info;

/// Everything derived from one loaded dataset, passed explicitly to the
/// renderer and the controls.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub dataset: Dataset,
    pub scaler: RadiusScaler,
    pub stats: DataStats,
    pub legend: Legend,
    pub sequence: SequenceController,
    markers: Vec<Marker>,
}

impl Atlas {
    /// Compute statistics and legend, then paint the first year
    pub fn new(dataset: Dataset, scaler: RadiusScaler) -> Result<Self> {
        let stats = DataStats::from_dataset(&dataset, &scaler)?;
        let sequence = SequenceController::from_schema(&dataset.schema).ok_or(DataError::NoAttributes)?;
        let legend = Legend::build(&stats, &scaler);

        info!(
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            first_year = sequence.min_year(),
            last_year = sequence.max_year(),
            "dataset statistics"
        );

        let mut atlas = Self {
            dataset,
            scaler,
            stats,
            legend,
            sequence,
            markers: Vec::new(),
        };
        atlas.repaint();
        Ok(atlas)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn current_attribute(&self) -> &Attribute {
        &self.dataset.schema.attributes()[self.sequence.index()]
    }

    pub fn current_year(&self) -> i32 {
        self.sequence.current_year()
    }

    pub fn apply(&mut self, control: Control) {
        self.sequence.apply(control);
        self.repaint();
    }

    pub fn slide(&mut self, position: usize) {
        self.sequence.slide(position);
        self.repaint();
    }

    /// Restyle every country for the active attribute
    fn repaint(&mut self) {
        let index = self.sequence.index();
        let attribute = &self.dataset.schema.attributes()[index];
        self.markers = self
            .dataset
            .countries
            .iter()
            .map(|country| place(country, symbolize(country, index, attribute, &self.scaler)))
            .collect();
    }
}
