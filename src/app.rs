use crate::error::DataError;
use crate::map::{MapRenderer, Viewport};
use crate::symbols::{Atlas, Control, Marker};
use crate::ui::{self, ControlHit};
use ratatui::layout::{Position, Rect};
use tracing::{debug, error};

/// Margin kept around the dataset extent when framing it
const FIT_MARGIN: f64 = 0.06;

/// Whether there is anything to map
pub enum LoadState {
    Ready(Box<Atlas>),
    /// The dataset could not be loaded; the message is shown in place of the
    /// map symbols and no sequence controls are offered
    Unavailable(String),
}

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub load: LoadState,
    pub should_quit: bool,
    /// Index into the atlas markers whose popup is open
    pub selected: Option<usize>,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// The current press started on the slider
    slider_drag: bool,
    /// The current press moved the map, so releasing it is not a click
    drag_moved: bool,
    screen: Rect,
}

impl App {
    pub fn new(width: usize, height: usize) -> Self {
        let screen = Rect::new(0, 0, width as u16, height as u16);
        let (px_w, px_h) = map_pixels(screen);
        Self {
            viewport: Viewport::europe(px_w, px_h),
            map_renderer: MapRenderer::new(),
            load: LoadState::Unavailable("no dataset loaded".to_string()),
            should_quit: false,
            selected: None,
            last_mouse: None,
            slider_drag: false,
            drag_moved: false,
            screen,
        }
    }

    /// Install the result of loading the dataset and frame its extent
    pub fn set_atlas(&mut self, atlas: Result<Atlas, DataError>) {
        self.selected = None;
        self.load = match atlas {
            Ok(atlas) => LoadState::Ready(Box::new(atlas)),
            Err(e) => {
                error!(error = %e, "data unavailable");
                LoadState::Unavailable(e.to_string())
            }
        };
        self.reset_view();
    }

    pub fn atlas(&self) -> Option<&Atlas> {
        match &self.load {
            LoadState::Ready(atlas) => Some(atlas.as_ref()),
            LoadState::Unavailable(_) => None,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        self.atlas().map(Atlas::markers).unwrap_or(&[])
    }

    /// Marker whose popup is open
    pub fn selected_marker(&self) -> Option<&Marker> {
        self.selected.and_then(|i| self.markers().get(i))
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        self.screen = Rect::new(0, 0, width as u16, height as u16);
        let (px_w, px_h) = map_pixels(self.screen);
        self.viewport.width = px_w;
        self.viewport.height = px_h;
    }

    /// Frame the dataset, or Europe when nothing is loaded
    pub fn reset_view(&mut self) {
        let (px_w, px_h) = map_pixels(self.screen);
        self.viewport = match self.atlas().and_then(|a| a.dataset.bounds()) {
            Some(bounds) => Viewport::fit_bounds(bounds, FIT_MARGIN, px_w, px_h),
            None => Viewport::europe(px_w, px_h),
        };
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.to_map_pixels(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.to_map_pixels(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Step, jump or wrap through the years. No-op while data is unavailable.
    pub fn handle_control(&mut self, control: Control) {
        if let LoadState::Ready(atlas) = &mut self.load {
            atlas.apply(control);
        }
    }

    /// Move the slider thumb to a terminal column
    pub fn slide_to_column(&mut self, col: u16) {
        let controls = ui::layout(self.screen).controls;
        if let LoadState::Ready(atlas) = &mut self.load {
            let position = controls.slider_position(col, atlas.sequence.len());
            atlas.slide(position);
        }
    }

    /// Open the popup of the symbol under a screen cell, or close it when
    /// the click hits empty map
    pub fn select_at(&mut self, col: u16, row: u16) {
        let Some((px, py)) = self.to_map_pixels(col, row) else {
            return;
        };
        // A character cell spans 2x4 pixels; probe its middle
        let hit = self
            .map_renderer
            .marker_at(self.markers(), &self.viewport, px + 1, py + 2);
        self.selected = hit;
        if let Some(marker) = self.selected_marker() {
            debug!(label = %marker.label, "selected");
        }
    }

    /// Keyboard selection: next country in dataset order
    pub fn cycle_selection(&mut self) {
        let count = self.markers().len();
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Left button pressed: buttons and slider react at once, the map waits
    /// for the release to tell a click from a drag
    pub fn mouse_down(&mut self, col: u16, row: u16) {
        self.drag_moved = false;
        self.slider_drag = false;
        self.last_mouse = None;

        if self.atlas().is_none() {
            self.last_mouse = Some((col, row));
            return;
        }

        let steps = self.atlas().map(|a| a.sequence.len()).unwrap_or(0);
        match ui::layout(self.screen).controls.hit(col, row, steps) {
            Some(ControlHit::Button(control)) => self.handle_control(control),
            Some(ControlHit::Slider(position)) => {
                self.slider_drag = true;
                if let LoadState::Ready(atlas) = &mut self.load {
                    atlas.slide(position);
                }
            }
            None => self.last_mouse = Some((col, row)),
        }
    }

    /// Handle mouse drag: scrub the slider or pan the map
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if self.slider_drag {
            self.slide_to_column(col);
            return;
        }
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - col as i32;
            let dy = last_y as i32 - row as i32;
            if dx != 0 || dy != 0 {
                self.drag_moved = true;
                // Less sensitive when zoomed out
                let scale = if self.viewport.zoom < 4.0 { 2 } else { 3 };
                self.pan(dx * scale, dy * scale);
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Mouse released: a press that never moved is a click on the map
    pub fn end_drag(&mut self, col: u16, row: u16) {
        if self.last_mouse.is_some() && !self.drag_moved {
            self.select_at(col, row);
        }
        self.last_mouse = None;
        self.slider_drag = false;
        self.drag_moved = false;
    }

    /// Terminal cell to braille pixel inside the map frame
    fn to_map_pixels(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let inner = ui::layout(self.screen).map_inner;
        if !inner.contains(Position::new(col, row)) {
            return None;
        }
        Some((((col - inner.x) as i32) * 2, ((row - inner.y) as i32) * 4))
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

/// Braille pixel size of the map frame for a terminal of `screen` size
fn map_pixels(screen: Rect) -> (usize, usize) {
    let inner = ui::layout(screen).map_inner;
    (inner.width as usize * 2, inner.height as usize * 4)
}
