// Calibration constants and display palette
//
// - Flannery radius scaling constants
// - Symbol class colors
// - Default paths and view settings

use ratatui::style::Color;

// ============================================================================
// Symbol scaling
// ============================================================================

/// Smallest radius a symbol is ever drawn with. Sentinel and zero values
/// are drawn at exactly this size.
pub const THRESHOLD_RADIUS: f64 = 5.0;

/// Reference value the Flannery formula is anchored on
pub const MIN_VALUE_CONSTANT: f64 = 3.0;

/// Radius of a symbol showing `MIN_VALUE_CONSTANT`, before compensation
pub const MIN_RADIUS_CONSTANT: f64 = 5.0;

/// Flannery perceptual compensation exponent
pub const FLANNERY_EXPONENT: f64 = 0.5715;

/// Flannery compensation coefficient
pub const FLANNERY_COEFFICIENT: f64 = 1.0083;

/// Raw value marking "no data available" for a country/year
pub const NO_DATA_SENTINEL: f64 = -1.0;

// ============================================================================
// Palette
// ============================================================================

/// Fill for countries with no data in the selected year
pub const NO_DATA_COLOR: Color = Color::Gray;

/// Fill for countries producing no nuclear electricity
pub const ZERO_COLOR: Color = Color::Rgb(70, 130, 200);

/// Fill for countries with a positive share
pub const VALID_COLOR: Color = Color::Rgb(255, 200, 0);

/// Ring drawn around the selected symbol
pub const HIGHLIGHT_COLOR: Color = Color::White;

// ============================================================================
// Defaults
// ============================================================================

/// Where the dataset is looked up when no path is given
pub const DEFAULT_DATA_PATH: &str = "data/eu_country_nuclear_pct.geojson";

/// Directory searched for optional Natural Earth basemap files
pub const DEFAULT_BASEMAP_DIR: &str = "data";

/// Braille pixels per radius unit. Braille cells are 2x4 pixels, so symbol
/// radii are halved to keep Europe readable on an ordinary terminal.
pub const DEFAULT_SYMBOL_SCALE: f64 = 0.5;

/// Accepted range for `--symbol-scale`
pub const MIN_SYMBOL_SCALE: f64 = 0.05;
pub const MAX_SYMBOL_SCALE: f64 = 20.0;

/// Marker substring identifying year attributes
pub const ATTRIBUTE_MARKER: &str = "pct";

/// Command-line parser for the symbol scale, rejecting values outside
/// `MIN_SYMBOL_SCALE..=MAX_SYMBOL_SCALE`
pub fn parse_symbol_scale(s: &str) -> Result<f64, String> {
    let scale: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (MIN_SYMBOL_SCALE..=MAX_SYMBOL_SCALE).contains(&scale) {
        Ok(scale)
    } else {
        Err(format!("symbol scale must be between {MIN_SYMBOL_SCALE} and {MAX_SYMBOL_SCALE}"))
    }
}
