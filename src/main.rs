use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use nuclear_map::app::App;
use nuclear_map::config::{parse_symbol_scale, DEFAULT_BASEMAP_DIR, DEFAULT_DATA_PATH, DEFAULT_SYMBOL_SCALE};
use nuclear_map::data;
use nuclear_map::symbols::{Atlas, Control, RadiusScaler};
use nuclear_map::ui;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal map of nuclear share of electricity across Europe
#[derive(Parser, Debug)]
#[command(name = "nuclear-map")]
#[command(version)]
struct Args {
    /// GeoJSON FeatureCollection with Country and pct_<year> properties
    #[arg(short, long, default_value = DEFAULT_DATA_PATH, env = "NUCLEAR_MAP_DATA")]
    data: PathBuf,

    /// Directory with optional Natural Earth coastline/border files
    #[arg(short, long, default_value = DEFAULT_BASEMAP_DIR)]
    basemap: PathBuf,

    /// Braille pixels per symbol radius unit
    #[arg(short, long, default_value_t = DEFAULT_SYMBOL_SCALE, value_parser = parse_symbol_scale)]
    symbol_scale: f64,

    /// Write logs to this file (stdout belongs to the map)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "nuclear_map=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init();
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &args);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Build a fresh app: basemap, dataset, view framed on the data
fn load_app(args: &Args, width: u16, height: u16) -> App {
    let mut app = App::new(width as usize, height as usize);
    app.map_renderer.settings.symbol_scale = args.symbol_scale;

    if data::load_basemap(&mut app.map_renderer, &args.basemap) == 0 {
        info!(dir = %args.basemap.display(), "no basemap files, using built-in outline");
        data::generate_simple_europe(&mut app.map_renderer);
    }

    app.set_atlas(load_atlas(&args.data));
    app
}

fn load_atlas(path: &Path) -> Result<Atlas, nuclear_map::error::DataError> {
    let dataset = data::load_dataset(path)?;
    Atlas::new(dataset, RadiusScaler::default())
}

/// Handle mouse events: controls, selection, panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(mouse.column, mouse.row),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, args: &Args) -> Result<()> {
    let size = terminal.size()?;
    let mut app = load_app(args, size.width, size.height);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Nothing animates; redraw after each event
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Esc => {
                        if app.selected.is_some() {
                            app.clear_selection();
                        } else {
                            app.quit();
                        }
                    }

                    // Sequence
                    KeyCode::Char(',') | KeyCode::Char('<') => app.handle_control(Control::Reverse),
                    KeyCode::Char('.') | KeyCode::Char('>') => app.handle_control(Control::Forward),
                    KeyCode::Home => app.handle_control(Control::First),
                    KeyCode::End => app.handle_control(Control::Last),

                    // Popups
                    KeyCode::Tab => app.cycle_selection(),

                    // Pan with hjkl or arrow keys
                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                    // Zoom
                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    // Layer toggles
                    KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
                    KeyCode::Char('L') => app.map_renderer.toggle_labels(),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
