use crate::config::{NO_DATA_COLOR, VALID_COLOR, ZERO_COLOR};
use crate::data::{Country, Reading};
use crate::symbols::{Attribute, RadiusScaler};
use ratatui::style::Color;

/// Fill category of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerClass {
    NoData,
    Zero,
    Valid,
}

impl MarkerClass {
    pub fn color(self) -> Color {
        match self {
            MarkerClass::NoData => NO_DATA_COLOR,
            MarkerClass::Zero => ZERO_COLOR,
            MarkerClass::Valid => VALID_COLOR,
        }
    }
}

impl From<Reading> for MarkerClass {
    fn from(reading: Reading) -> Self {
        match reading {
            Reading::NoData => MarkerClass::NoData,
            Reading::Zero => MarkerClass::Zero,
            Reading::Percent(_) => MarkerClass::Valid,
        }
    }
}

/// Text shown when a symbol is selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    lines: Vec<String>,
}

impl Popup {
    fn new(country: &str, year: i32, reading: Reading) -> Self {
        let value_line = match reading {
            Reading::NoData => format!("Percent in {year}: No data"),
            Reading::Zero => format!("Percent in {year}: 0%"),
            Reading::Percent(v) => format!("Percent in {year}: {v}%"),
        };
        Self {
            lines: vec![format!("Country: {country}"), value_line],
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Visual state of one country for one attribute
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub class: MarkerClass,
    pub radius: f64,
    pub popup: Popup,
}

/// A styled symbol anchored on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lon: f64,
    pub lat: f64,
    /// Short map label: ISO code when present, else the name
    pub label: String,
    pub style: MarkerStyle,
}

/// Style a country for the attribute at `index` of the schema.
/// Pure: the same inputs always give the same style.
pub fn symbolize(country: &Country, index: usize, attribute: &Attribute, scaler: &RadiusScaler) -> MarkerStyle {
    let reading = country.reading(index);
    MarkerStyle {
        class: reading.into(),
        radius: scaler.radius(reading.raw()),
        popup: Popup::new(&country.name, attribute.year, reading),
    }
}

pub fn place(country: &Country, style: MarkerStyle) -> Marker {
    Marker {
        lon: country.lon,
        lat: country.lat,
        label: country.code.clone().unwrap_or_else(|| country.name.clone()),
        style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(year: i32) -> Attribute {
        Attribute { key: format!("pct_{year}"), year }
    }

    #[test]
    fn test_france_1990() {
        let france = Country::new("France", 2.3, 46.6, vec![75.0]);
        let style = symbolize(&france, 0, &attr(1990), &RadiusScaler::default());
        assert_eq!(style.class, MarkerClass::Valid);
        assert!((style.radius - 31.73).abs() < 0.01);
        assert_eq!(style.popup.lines()[0], "Country: France");
        assert_eq!(style.popup.lines()[1], "Percent in 1990: 75%");
    }

    #[test]
    fn test_fractional_value_keeps_decimals() {
        let c = Country::new("Spain", -3.7, 40.4, vec![20.3]);
        let style = symbolize(&c, 0, &attr(2022), &RadiusScaler::default());
        assert_eq!(style.popup.lines(), ["Country: Spain", "Percent in 2022: 20.3%"]);
    }

    #[test]
    fn test_no_data_and_zero() {
        let scaler = RadiusScaler::default();
        let c = Country::new("Italy", 12.5, 42.5, vec![-1.0, 0.0]);

        let none = symbolize(&c, 0, &attr(1965), &scaler);
        assert_eq!(none.class, MarkerClass::NoData);
        assert_eq!(none.radius, scaler.threshold);
        assert_eq!(none.popup.lines()[1], "Percent in 1965: No data");

        let zero = symbolize(&c, 1, &attr(1966), &scaler);
        assert_eq!(zero.class, MarkerClass::Zero);
        assert_eq!(zero.radius, scaler.threshold);
    }

    #[test]
    fn test_symbolize_is_idempotent() {
        let scaler = RadiusScaler::default();
        let c = Country::new("Sweden", 15.0, 62.0, vec![29.4]);
        let a = symbolize(&c, 0, &attr(2022), &scaler);
        let b = symbolize(&c, 0, &attr(2022), &scaler);
        assert_eq!(a, b);
        assert_eq!(a.radius.to_bits(), b.radius.to_bits());
    }

    #[test]
    fn test_place_prefers_code() {
        let c = Country::new("Germany", 10.4, 51.1, vec![6.0]).with_code("DEU");
        let m = place(&c, symbolize(&c, 0, &attr(2022), &RadiusScaler::default()));
        assert_eq!(m.label, "DEU");
        assert_eq!((m.lon, m.lat), (10.4, 51.1));
    }
}
