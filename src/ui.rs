use crate::app::{App, LoadState};
use crate::braille::BrailleCanvas;
use crate::config::HIGHLIGHT_COLOR;
use crate::map::{draw_circle, draw_ring, MapLayers, MapRenderer};
use crate::symbols::{Atlas, Control, Legend, MarkerClass};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

/// Where everything sits on screen. Shared by rendering and mouse
/// hit-testing so the two can never disagree.
#[derive(Clone, Copy, Debug)]
pub struct ScreenLayout {
    pub map: Rect,
    pub map_inner: Rect,
    pub controls: ControlsLayout,
    pub status: Rect,
}

/// The sequence control bar: `[◀] ──●── [▶] 1990`
#[derive(Clone, Copy, Debug)]
pub struct ControlsLayout {
    pub area: Rect,
    pub reverse: Rect,
    pub slider: Rect,
    pub forward: Rect,
    pub year: Rect,
}

/// What a click on the control bar means
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlHit {
    Button(Control),
    /// Slider position the click maps to
    Slider(usize),
}

pub fn layout(area: Rect) -> ScreenLayout {
    let [map, controls, status] = Layout::vertical([
        Constraint::Min(3),    // Map
        Constraint::Length(3), // Sequence controls
        Constraint::Length(1), // Status bar
    ])
    .areas(area);

    let controls_inner = Block::default().borders(Borders::ALL).inner(controls);
    let [reverse, slider, forward, year] = Layout::horizontal([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(6),
    ])
    .areas(controls_inner);

    ScreenLayout {
        map,
        map_inner: Block::default().borders(Borders::ALL).inner(map),
        controls: ControlsLayout {
            area: controls,
            reverse,
            slider,
            forward,
            year,
        },
        status,
    }
}

impl ControlsLayout {
    pub fn hit(&self, col: u16, row: u16, steps: usize) -> Option<ControlHit> {
        let pos = Position::new(col, row);
        if self.reverse.contains(pos) {
            Some(ControlHit::Button(Control::Reverse))
        } else if self.forward.contains(pos) {
            Some(ControlHit::Button(Control::Forward))
        } else if self.slider.contains(pos) {
            Some(ControlHit::Slider(self.slider_position(col, steps)))
        } else {
            None
        }
    }

    /// Slider position under a column, clamped to `0..steps`
    pub fn slider_position(&self, col: u16, steps: usize) -> usize {
        if steps <= 1 || self.slider.width <= 1 {
            return 0;
        }
        let span = (self.slider.width - 1) as f64;
        let offset = col.saturating_sub(self.slider.x).min(self.slider.width - 1) as f64;
        (offset * (steps - 1) as f64 / span).round() as usize
    }

    /// Column of the slider thumb for a position
    pub fn slider_column(&self, position: usize, steps: usize) -> u16 {
        if steps <= 1 || self.slider.width <= 1 {
            return self.slider.x;
        }
        let span = (self.slider.width - 1) as f64;
        let offset = (position.min(steps - 1) as f64 * span / (steps - 1) as f64).round() as u16;
        self.slider.x + offset
    }
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let screen = layout(frame.area());

    render_map(frame, app, &screen);

    match &app.load {
        LoadState::Ready(atlas) => {
            render_legend(frame, atlas, &app.map_renderer, screen.map_inner);
            render_popup(frame, app, screen.map_inner);
            render_controls(frame, atlas, &screen.controls);
        }
        LoadState::Unavailable(message) => {
            render_unavailable(frame, message, screen.map_inner);
            let hint = Paragraph::new(Line::from(Span::styled(
                " sequence controls unavailable",
                Style::default().fg(Color::DarkGray),
            )))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
            frame.render_widget(hint, screen.controls.area);
        }
    }

    render_status_bar(frame, app, screen.status);
}

fn render_map(frame: &mut Frame, app: &App, screen: &ScreenLayout) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Nuclear share of electricity ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(block, screen.map);

    let inner = screen.map_inner;

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        app.markers(),
        app.selected,
    );

    frame.render_widget(MapWidget { layers }, inner);
}

/// Copy the set cells of a braille canvas into the buffer at `origin`
fn paint_canvas(canvas: &BrailleCanvas, color: Color, origin: (u16, u16), clip: Rect, buf: &mut Buffer) {
    for row in 0..canvas.height() {
        for col in 0..canvas.width() {
            let Some(ch) = canvas.glyph(col, row) else {
                continue;
            };
            let x = origin.0 + col as u16;
            let y = origin.1 + row as u16;
            if clip.contains(Position::new(x, y)) {
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

/// Braille basemap and symbol layers with labels overlaid
struct MapWidget {
    layers: MapLayers,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let origin = (area.x, area.y);

        // Back to front
        paint_canvas(&self.layers.coastlines, Color::Cyan, origin, area, buf);
        paint_canvas(&self.layers.borders, Color::DarkGray, origin, area, buf);
        for class in [MarkerClass::NoData, MarkerClass::Zero, MarkerClass::Valid] {
            paint_canvas(self.layers.symbols(class), class.color(), origin, area, buf);
        }
        paint_canvas(&self.layers.highlight, HIGHLIGHT_COLOR, origin, area, buf);

        let label_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            let max_len = (area.width - *lx) as usize;
            for (i, ch) in text.chars().take(max_len.min(12)).enumerate() {
                buf[(area.x + *lx + i as u16, area.y + *ly)].set_char(ch).set_style(label_style);
            }
        }
    }
}

/// Label column width reserved next to the legend circles
const LEGEND_LABEL_WIDTH: u16 = 16;

/// Nested reference circles, bottom aligned, plus the two category swatches
struct LegendWidget<'a> {
    legend: &'a Legend,
    year: i32,
    renderer: &'a MapRenderer,
}

impl LegendWidget<'_> {
    /// (columns, rows) of the nested circle canvas
    fn nested_cells(&self) -> (u16, u16) {
        let diameter = 2 * self.renderer.pixel_radius(self.legend.max_radius()) + 1;
        (((diameter + 1) / 2) as u16, ((diameter + 3) / 4) as u16)
    }

    /// (columns, rows) of one category swatch
    fn swatch_cells(&self) -> (u16, u16) {
        let radius = self
            .legend
            .categories()
            .map(|e| self.renderer.pixel_radius(e.radius))
            .max()
            .unwrap_or(1);
        let diameter = 2 * radius + 1;
        (((diameter + 1) / 2) as u16, ((diameter + 3) / 4) as u16)
    }

    /// Outer size including the border
    fn size(&self) -> (u16, u16) {
        let (nested_w, nested_h) = self.nested_cells();
        let (swatch_w, swatch_h) = self.swatch_cells();
        let categories = self.legend.categories().count() as u16;
        let width = nested_w.max(swatch_w) + 1 + LEGEND_LABEL_WIDTH + 2;
        let height = nested_h + categories * swatch_h + 2;
        (width, height)
    }
}

impl Widget for LegendWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" Nuclear % {} ", self.year),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let (nested_w, nested_h) = self.nested_cells();
        let label_x = inner.x + nested_w.max(self.swatch_cells().0) + 1;
        let label_style = Style::default().fg(Color::White);

        // Nested circles share the bottom edge of the canvas
        let max_r = self.renderer.pixel_radius(self.legend.max_radius());
        let bottom = 2 * max_r;
        let mut canvas = BrailleCanvas::new(nested_w as usize, nested_h as usize);
        let mut last_row: Option<u16> = None;
        for entry in self.legend.nested() {
            let r = self.renderer.pixel_radius(entry.radius);
            draw_ring(&mut canvas, max_r, bottom - r, r);

            let top_row = ((bottom - 2 * r) / 4) as u16;
            let row = match last_row {
                Some(prev) if top_row <= prev => prev + 1,
                _ => top_row,
            };
            last_row = Some(row);
            if row < inner.height {
                buf.set_stringn(label_x, inner.y + row, &entry.label, LEGEND_LABEL_WIDTH as usize, label_style);
            }
        }
        paint_canvas(&canvas, MarkerClass::Valid.color(), (inner.x, inner.y), inner, buf);

        let (swatch_w, swatch_h) = self.swatch_cells();
        for (i, entry) in self.legend.categories().enumerate() {
            let r = self.renderer.pixel_radius(entry.radius);
            let mut swatch = BrailleCanvas::new(swatch_w as usize, swatch_h as usize);
            draw_circle(&mut swatch, r, r, r);

            let y = inner.y + nested_h + i as u16 * swatch_h;
            paint_canvas(&swatch, entry.class.color(), (inner.x, y), inner, buf);
            if y < inner.y + inner.height {
                buf.set_stringn(label_x, y, &entry.label, LEGEND_LABEL_WIDTH as usize, label_style);
            }
        }
    }
}

fn render_legend(frame: &mut Frame, atlas: &Atlas, renderer: &MapRenderer, map: Rect) {
    let widget = LegendWidget {
        legend: &atlas.legend,
        year: atlas.current_year(),
        renderer,
    };
    let (width, height) = widget.size();
    if width > map.width || height > map.height {
        return;
    }
    let area = Rect::new(map.x + map.width - width, map.y + map.height - height, width, height);
    frame.render_widget(widget, area);
}

fn render_popup(frame: &mut Frame, app: &App, map: Rect) {
    let Some(marker) = app.selected_marker() else {
        return;
    };

    let lines = marker.style.popup.lines();
    let width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 4).min(map.width);
    let height = (lines.len() as u16 + 2).min(map.height);

    // Open to the right of the symbol, kept inside the map frame
    let mut viewport = app.viewport.clone();
    viewport.width = map.width as usize * 2;
    viewport.height = map.height as usize * 4;
    let (px, py) = viewport.project(marker.lon, marker.lat);
    let radius = app.map_renderer.pixel_radius(marker.style.radius);
    let col = ((px + radius) / 2 + 2).clamp(0, (map.width - width) as i32) as u16;
    let row = (py / 4 - height as i32 / 2).clamp(0, (map.height - height) as i32) as u16;
    let area = Rect::new(map.x + col, map.y + row, width, height);

    let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
    let popup = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(marker.style.class.color())),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn render_unavailable(frame: &mut Frame, message: &str, map: Rect) {
    let width = map.width.min(60);
    let height = map.height.min(6);
    let area = Rect::new(
        map.x + (map.width - width) / 2,
        map.y + (map.height - height) / 2,
        width,
        height,
    );

    let text = vec![
        Line::from(Span::styled(
            "Data unavailable",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::White))),
    ];
    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
    frame.render_widget(Clear, area);
    frame.render_widget(panel, area);
}

fn render_controls(frame: &mut Frame, atlas: &Atlas, controls: &ControlsLayout) {
    let sequence = &atlas.sequence;
    let dim = Style::default().fg(Color::DarkGray);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(dim)
        .title(Line::from(format!(" {} ", sequence.min_year())).left_aligned())
        .title(Line::from(format!(" {} ", sequence.max_year())).right_aligned());
    frame.render_widget(block, controls.area);

    let button = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    frame.render_widget(Paragraph::new(Span::styled("[◀]", button)), controls.reverse);
    frame.render_widget(Paragraph::new(Span::styled(" [▶]", button)), controls.forward);

    let track: String = "─".repeat(controls.slider.width as usize);
    frame.render_widget(Paragraph::new(Span::styled(track, dim)), controls.slider);
    let thumb = controls.slider_column(sequence.index(), sequence.len());
    frame.render_widget(
        Paragraph::new(Span::styled("●", Style::default().fg(MarkerClass::Valid.color()))),
        Rect::new(thumb, controls.slider.y, 1, 1),
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", sequence.current_year()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        controls.year,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let toggle = |on: bool| Style::default().fg(if on { Color::Green } else { Color::DarkGray });
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = Vec::new();
    if let Some(atlas) = app.atlas() {
        spans.push(Span::styled(" Year: ", dim));
        spans.push(Span::styled(atlas.current_year().to_string(), Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(" |", dim));
    }
    spans.extend([
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" ", dim),
        Span::styled(
            if settings.show_borders { "[B]order " } else { "[b]order " },
            toggle(settings.show_borders),
        ),
        Span::styled(
            "[L]abels ",
            toggle(settings.show_labels),
        ),
        Span::styled("| ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | ,/.:year Home/End Tab:select hjkl:pan +/-:zoom r:reset q:quit",
            dim,
        ),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Country, Dataset};
    use crate::symbols::{RadiusScaler, Schema};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen() -> ScreenLayout {
        layout(Rect::new(0, 0, 100, 40))
    }

    #[test]
    fn test_layout_stacks_map_controls_status() {
        let s = screen();
        assert_eq!(s.status.y, 39);
        assert_eq!(s.controls.area.height, 3);
        assert_eq!(s.map_inner, Rect::new(1, 1, 98, 34));
        assert_eq!(s.controls.reverse.y, s.controls.forward.y);
        assert!(s.controls.reverse.x < s.controls.slider.x);
        assert!(s.controls.slider.x < s.controls.forward.x);
    }

    #[test]
    fn test_hit_buttons() {
        let c = screen().controls;
        assert_eq!(c.hit(c.reverse.x, c.reverse.y, 58), Some(ControlHit::Button(Control::Reverse)));
        assert_eq!(c.hit(c.forward.x + 1, c.forward.y, 58), Some(ControlHit::Button(Control::Forward)));
        assert_eq!(c.hit(0, 0, 58), None);
    }

    #[test]
    fn test_slider_mapping_round_trips() {
        let c = screen().controls;
        let steps = 58;
        assert_eq!(c.slider_position(c.slider.x, steps), 0);
        assert_eq!(c.slider_position(c.slider.x + c.slider.width - 1, steps), steps - 1);
        assert_eq!(c.slider_position(c.slider.x + c.slider.width + 10, steps), steps - 1);
        for position in [0, 10, 25, 57] {
            let col = c.slider_column(position, steps);
            assert!(c.slider.contains(Position::new(col, c.slider.y)));
        }
        assert_eq!(c.slider_column(57, steps), c.slider.x + c.slider.width - 1);
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_render_ready_shows_legend_and_controls() {
        let mut app = App::new(100, 40);
        let ds = Dataset::new(
            Schema::from_years([1990, 1991]),
            vec![
                Country::new("France", 2.3, 46.6, vec![75.0, 72.7]).with_code("FRA"),
                Country::new("Italy", 12.5, 42.5, vec![0.0, -1.0]).with_code("ITA"),
            ],
        );
        app.set_atlas(Atlas::new(ds, RadiusScaler::default()));
        app.selected = Some(0);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Nuclear % 1990"));
        assert!(text.contains("no data"));
        assert!(text.contains("Country: France"));
        assert!(text.contains("Percent in 1990: 75%"));
        assert!(text.contains("[◀]"));
    }

    #[test]
    fn test_render_labels_without_popup() {
        let mut app = App::new(100, 40);
        let ds = Dataset::new(
            Schema::from_years([1990]),
            vec![Country::new("France", 2.3, 46.6, vec![75.0]).with_code("FRA")],
        );
        app.set_atlas(Atlas::new(ds, RadiusScaler::default()));

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("FRA"));
        assert!(!text.contains("Country:"));
    }

    #[test]
    fn test_labels_hint_names_toggle_key() {
        let mut app = App::new(160, 40);
        app.map_renderer.toggle_labels();
        assert!(!app.map_renderer.settings.show_labels);

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("[L]abels"));
        assert!(!text.contains("[l]abels"));
    }

    #[test]
    fn test_render_with_oversized_symbols() {
        let mut app = App::new(100, 40);
        app.map_renderer.settings.symbol_scale = 1e12;
        let ds = Dataset::new(
            Schema::from_years([1990]),
            vec![Country::new("France", 2.3, 46.6, vec![75.0]).with_code("FRA")],
        );
        app.set_atlas(Atlas::new(ds, RadiusScaler::default()));
        app.selected = Some(0);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);

        // Legend no longer fits and is skipped; the popup still shows
        assert!(!text.contains("Nuclear % 1990"));
        assert!(text.contains("Country: France"));
    }

    #[test]
    fn test_render_unavailable() {
        let mut app = App::new(100, 40);
        app.set_atlas(Err(crate::error::DataError::NoValidValues));

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Data unavailable"));
        assert!(!text.contains("[◀]"));
    }
}
