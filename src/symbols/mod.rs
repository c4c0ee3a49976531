//! Proportional symbol model: year schema, statistics, radius scaling,
//! per-country styling, the year sequence and the legend.

mod atlas;
mod attributes;
mod legend;
mod marker;
mod scale;
mod sequence;
mod stats;

pub use atlas::Atlas;
pub use attributes::{attribute_year, extract_attributes, Attribute, Schema};
pub use legend::{format_percent, Legend, LegendEntry};
pub use marker::{place, symbolize, Marker, MarkerClass, MarkerStyle, Popup};
pub use scale::RadiusScaler;
pub use sequence::{Control, SequenceController};
pub use stats::DataStats;
