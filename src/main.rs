use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use dino_map::app::App;
use dino_map::config::Cli;
use dino_map::data::{feature_lines, load_records, load_world};
use dino_map::ui;
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli)?;

    // Records first, then geometry
    let records = load_records(&cli.data).inspect_err(|e| error!("{e:#}"))?;
    let world = load_world(&cli.world_source()).inspect_err(|e| error!("{e:#}"))?;
    let boundaries = feature_lines(&world);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let size = terminal.size()?;
    let mut app = App::new(records, &boundaries, Rect::new(0, 0, size.width, size.height));
    if app.map_renderer.has_data() {
        info!(lines = app.map_renderer.country_line_count(), "country outlines projected");
    } else {
        warn!("world geometry has no boundary lines");
    }
    let result = run(&mut terminal, &mut app);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(ref e) = result {
        error!("{e:#}");
    }
    result
}

/// File logging; stdout belongs to the terminal UI
fn init_logging(cli: &Cli) -> Result<WorkerGuard> {
    let file = File::create(&cli.log_file)
        .with_context(|| format!("creating log file {}", cli.log_file.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(guard)
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Filter by option index, or cycle
        KeyCode::Char(c @ '0'..='9') => {
            if let Some(index) = c.to_digit(10) {
                app.select_filter_index(index as usize, now);
            }
        }
        KeyCode::Tab => app.cycle_filter(true, now),
        KeyCode::BackTab => app.cycle_filter(false, now),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Reset view
        KeyCode::Char('r') => app.reset_view(),

        _ => {}
    }
}

/// Handle mouse events for hover, filter clicks, panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    match mouse.kind {
        MouseEventKind::Moved => app.pointer_moved(mouse.column, mouse.row, now),
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row, now),
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
            app.pointer_moved(mouse.column, mouse.row, now);
        }
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            let now = Instant::now();
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key, now),
                Event::Mouse(mouse) => handle_mouse(app, mouse, now),
                Event::Resize(width, height) => app.resize(Rect::new(0, 0, width, height)),
                _ => {}
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
