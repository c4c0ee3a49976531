use crate::symbols::{DataStats, MarkerClass, RadiusScaler};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub radius: f64,
    pub class: MarkerClass,
}

/// Reference circles: max, mean and min sized by the scaler, then the two
/// fixed-size categories. Built once per dataset load.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn build(stats: &DataStats, scaler: &RadiusScaler) -> Self {
        let scaled = |name: &str, value: f64| LegendEntry {
            label: format!("{name} {}", format_percent(value)),
            radius: scaler.radius(value),
            class: MarkerClass::Valid,
        };

        let entries = vec![
            scaled("max", stats.max),
            scaled("mean", stats.mean),
            scaled("min", stats.min),
            LegendEntry {
                label: "no nuclear (0%)".to_string(),
                radius: scaler.threshold,
                class: MarkerClass::Zero,
            },
            LegendEntry {
                label: "no data".to_string(),
                radius: scaler.threshold,
                class: MarkerClass::NoData,
            },
        ];

        Self { entries }
    }

    /// Entries drawn as nested circles (the scaled ones)
    pub fn nested(&self) -> impl Iterator<Item = &LegendEntry> {
        self.entries.iter().filter(|e| e.class == MarkerClass::Valid)
    }

    /// Entries drawn as swatches next to the nested circles
    pub fn categories(&self) -> impl Iterator<Item = &LegendEntry> {
        self.entries.iter().filter(|e| e.class != MarkerClass::Valid)
    }

    pub fn max_radius(&self) -> f64 {
        self.entries.iter().map(|e| e.radius).fold(0.0, f64::max)
    }
}

/// One decimal at most, no trailing zero (`75%`, `12.3%`)
pub fn format_percent(value: f64) -> String {
    format!("{}%", (value * 10.0).round() / 10.0)
}
