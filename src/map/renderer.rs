use crate::braille::BrailleCanvas;
use crate::config::DEFAULT_SYMBOL_SCALE;
use crate::map::geometry::{draw_circle, draw_line, draw_ring};
use crate::map::projection::Viewport;
use crate::symbols::{Marker, MarkerClass};

/// Largest symbol radius in braille pixels, several screens wide
pub const MAX_PIXEL_RADIUS: i32 = 4096;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for basemap data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    /// Select LOD based on zoom level
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }
}

/// Display settings for map layers
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_borders: bool,
    pub show_labels: bool,
    /// Braille pixels per symbol radius unit
    pub symbol_scale: f64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_borders: true,
            show_labels: true,
            symbol_scale: DEFAULT_SYMBOL_SCALE,
        }
    }
}

/// One braille canvas per color, back to front
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub no_data: BrailleCanvas,
    pub zero: BrailleCanvas,
    pub valid: BrailleCanvas,
    pub highlight: BrailleCanvas,
    /// (column, row, text) in character cells
    pub labels: Vec<(u16, u16, String)>,
}

impl MapLayers {
    fn new(width: usize, height: usize) -> Self {
        Self {
            coastlines: BrailleCanvas::new(width, height),
            borders: BrailleCanvas::new(width, height),
            no_data: BrailleCanvas::new(width, height),
            zero: BrailleCanvas::new(width, height),
            valid: BrailleCanvas::new(width, height),
            highlight: BrailleCanvas::new(width, height),
            labels: Vec::new(),
        }
    }

    pub fn symbols(&self, class: MarkerClass) -> &BrailleCanvas {
        match class {
            MarkerClass::NoData => &self.no_data,
            MarkerClass::Zero => &self.zero,
            MarkerClass::Valid => &self.valid,
        }
    }

    fn symbols_mut(&mut self, class: MarkerClass) -> &mut BrailleCanvas {
        match class {
            MarkerClass::NoData => &mut self.no_data,
            MarkerClass::Zero => &mut self.zero,
            MarkerClass::Valid => &mut self.valid,
        }
    }
}

/// Map renderer: multi-resolution basemap plus proportional symbols
pub struct MapRenderer {
    pub coastlines_low: Vec<LineString>,
    pub coastlines_medium: Vec<LineString>,
    pub coastlines_high: Vec<LineString>,
    pub borders_medium: Vec<LineString>,
    pub borders_high: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            coastlines_low: Vec::new(),
            coastlines_medium: Vec::new(),
            coastlines_high: Vec::new(),
            borders_medium: Vec::new(),
            borders_high: Vec::new(),
            settings: DisplaySettings::default(),
        }
    }

    /// Coastlines for the given LOD, falling back to coarser data
    fn get_coastlines(&self, lod: Lod) -> &[LineString] {
        let candidates = match lod {
            Lod::High => [&self.coastlines_high, &self.coastlines_medium, &self.coastlines_low],
            Lod::Medium => [&self.coastlines_medium, &self.coastlines_low, &self.coastlines_high],
            Lod::Low => [&self.coastlines_low, &self.coastlines_medium, &self.coastlines_high],
        };
        candidates
            .into_iter()
            .find(|lines| !lines.is_empty())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn get_borders(&self, lod: Lod) -> &[LineString] {
        match lod {
            Lod::High if !self.borders_high.is_empty() => &self.borders_high,
            _ => &self.borders_medium,
        }
    }

    /// Symbol radius in braille pixels
    pub fn pixel_radius(&self, radius: f64) -> i32 {
        let scaled = (radius * self.settings.symbol_scale).round();
        if scaled.is_nan() {
            return 1;
        }
        scaled.clamp(1.0, MAX_PIXEL_RADIUS as f64) as i32
    }

    /// Render basemap and symbols for a `width` x `height` character area
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        markers: &[Marker],
        selected: Option<usize>,
    ) -> MapLayers {
        let mut layers = MapLayers::new(width, height);
        let lod = Lod::from_zoom(viewport.zoom);

        if self.settings.show_coastlines {
            for line in self.get_coastlines(lod) {
                draw_linestring(&mut layers.coastlines, line, viewport);
            }
        }

        if self.settings.show_borders {
            for line in self.get_borders(lod) {
                draw_linestring(&mut layers.borders, line, viewport);
            }
        }

        for idx in self.draw_order(markers) {
            let marker = &markers[idx];
            let (px, py) = viewport.project(marker.lon, marker.lat);
            let radius = self.pixel_radius(marker.style.radius);
            if !viewport.circle_visible(px, py, radius) {
                continue;
            }

            draw_circle(layers.symbols_mut(marker.style.class), px, py, radius);

            if self.settings.show_labels && px >= 0 && py >= 0 {
                let col = (px.saturating_add(radius) / 2 + 1).min(u16::MAX as i32) as u16;
                let row = (py / 4) as u16;
                layers.labels.push((col, row, marker.label.clone()));
            }
        }

        if let Some(marker) = selected.and_then(|i| markers.get(i)) {
            let (px, py) = viewport.project(marker.lon, marker.lat);
            let radius = self.pixel_radius(marker.style.radius);
            draw_ring(&mut layers.highlight, px, py, radius + 1);
        }

        layers
    }

    /// Largest symbols first so small ones stay on top
    pub fn draw_order(&self, markers: &[Marker]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..markers.len()).collect();
        order.sort_by(|&a, &b| markers[b].style.radius.total_cmp(&markers[a].style.radius));
        order
    }

    /// Index of the symbol under a braille pixel. Where symbols overlap the
    /// smallest (topmost) one wins.
    pub fn marker_at(&self, markers: &[Marker], viewport: &Viewport, px: i32, py: i32) -> Option<usize> {
        self.draw_order(markers).into_iter().rev().find(|&idx| {
            let marker = &markers[idx];
            let (mx, my) = viewport.project(marker.lon, marker.lat);
            let r = self.pixel_radius(marker.style.radius) as i64;
            let (dx, dy) = (px as i64 - mx as i64, py as i64 - my as i64);
            dx * dx + dy * dy <= r * r
        })
    }

    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::High => self.borders_high.push(line),
            Lod::Low | Lod::Medium => self.borders_medium.push(line),
        }
    }

    /// Check if any basemap is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            // Skip segments that jump across the antimeridian
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}
