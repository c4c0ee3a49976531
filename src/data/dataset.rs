use crate::config::NO_DATA_SENTINEL;
use crate::symbols::Schema;

/// Classification of one raw attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// Sentinel, missing, null or unparseable
    NoData,
    /// Country produces no nuclear electricity
    Zero,
    /// Positive share in percent
    Percent(f64),
}

impl Reading {
    pub fn from_raw(value: f64) -> Self {
        if value.is_nan() || value < 0.0 {
            Reading::NoData
        } else if value == 0.0 {
            Reading::Zero
        } else {
            Reading::Percent(value)
        }
    }

    /// Value fed to the radius scaler
    pub fn raw(self) -> f64 {
        match self {
            Reading::NoData => NO_DATA_SENTINEL,
            Reading::Zero => 0.0,
            Reading::Percent(v) => v,
        }
    }
}

/// One country symbol: where it sits and its value for every schema year
#[derive(Debug, Clone)]
pub struct Country {
    pub name: String,
    pub code: Option<String>,
    pub lon: f64,
    pub lat: f64,
    /// Aligned with the dataset schema; already sentinel-normalized
    values: Vec<f64>,
}

impl Country {
    pub fn new(name: impl Into<String>, lon: f64, lat: f64, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            code: None,
            lon,
            lat,
            values,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Raw value at a schema index, the sentinel when out of range
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(NO_DATA_SENTINEL)
    }

    pub fn reading(&self, index: usize) -> Reading {
        Reading::from_raw(self.value(index))
    }
}

/// Everything loaded from the data file
#[derive(Debug, Clone)]
pub struct Dataset {
    pub schema: Schema,
    pub countries: Vec<Country>,
}

impl Dataset {
    pub fn new(schema: Schema, countries: Vec<Country>) -> Self {
        Self { schema, countries }
    }

    /// Every raw value of every country and year
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.countries
            .iter()
            .flat_map(|c| (0..self.schema.len()).map(move |i| c.value(i)))
    }

    /// `(min_lon, min_lat, max_lon, max_lat)` of all symbol positions
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.countries.iter().fold(None, |acc, c| {
            Some(match acc {
                None => (c.lon, c.lat, c.lon, c.lat),
                Some((x0, y0, x1, y1)) => (x0.min(c.lon), y0.min(c.lat), x1.max(c.lon), y1.max(c.lat)),
            })
        })
    }
}
