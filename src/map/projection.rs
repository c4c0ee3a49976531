use std::f64::consts::PI;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 60.0;
const ZOOM_STEP: f64 = 1.5;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (1.0 = whole world across the canvas width)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Normalized Web Mercator x in [0, 1]
#[inline(always)]
fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Normalized Web Mercator y in [0, 1] (0 = north)
#[inline(always)]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-85.0, 85.0).to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Default view over Europe, used before a dataset extent is known
    pub fn europe(width: usize, height: usize) -> Self {
        Self::new(12.0, 52.0, 4.5, width, height)
    }

    /// Frame a lon/lat bounding box, leaving `margin` (fraction of the
    /// canvas) free on every side.
    pub fn fit_bounds(bounds: (f64, f64, f64, f64), margin: f64, width: usize, height: usize) -> Self {
        let (min_lon, min_lat, max_lon, max_lat) = bounds;
        let center_lon = (min_lon + max_lon) / 2.0;

        let span_x = (mercator_x(max_lon) - mercator_x(min_lon)).abs().max(1e-6);
        let span_y = (mercator_y(min_lat) - mercator_y(max_lat)).abs().max(1e-6);
        let usable = (1.0 - 2.0 * margin).max(0.1);

        // Projection scale is zoom * width pixels per normalized unit
        let zoom_x = usable / span_x;
        let zoom_y = usable * height as f64 / (span_y * width.max(1) as f64);
        let zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);

        // Center on the midpoint in projected space, not in degrees
        let mid_y = (mercator_y(min_lat) + mercator_y(max_lat)) / 2.0;
        let center_lat = (PI * (1.0 - 2.0 * mid_y)).sinh().atan().to_degrees();

        Self::new(center_lon, center_lat, zoom, width, height)
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = 360.0 / (self.zoom * self.width.max(1) as f64);
        self.center_lon += dx as f64 * scale;
        self.center_lat -= dy as f64 * scale * 0.5; // Mercator distortion

        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }

        self.center_lat = self.center_lat.clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom by factor keeping the point under (px, py) in place
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.zoom * self.width.max(1) as f64;

        let x = (px as f64 - self.width as f64 / 2.0) / scale + mercator_x(self.center_lon);
        let y = (py as f64 - self.height as f64 / 2.0) / scale + mercator_y(self.center_lat);

        let lon = x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();

        (lon, lat)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let scale = self.zoom * self.width as f64;

        let px = ((mercator_x(lon) - mercator_x(self.center_lon)) * scale + self.width as f64 / 2.0) as i32;
        let py = ((mercator_y(lat) - mercator_y(self.center_lat)) * scale + self.height as f64 / 2.0) as i32;

        (px, py)
    }

    /// Whether a circle of `radius` pixels around (px, py) touches the canvas
    pub fn circle_visible(&self, px: i32, py: i32, radius: i32) -> bool {
        px.saturating_add(radius) >= 0
            && px.saturating_sub(radius) < self.width as i32
            && py.saturating_add(radius) >= 0
            && py.saturating_sub(radius) < self.height as i32
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}
