use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use skillmap::app::{App, Focus};
use skillmap::map::MapRenderer;
use skillmap::{data, ui};
use std::path::Path;
use std::time::Duration;

fn main() -> Result<()> {
    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn run(terminal: &mut DefaultTerminal) -> Result<()> {
    // Both files are required; there is no fallback geometry or dataset
    let data_dir = Path::new("data");
    let mut renderer = MapRenderer::new();
    data::load_europe(&mut renderer, &data_dir.join("europe.json"))
        .context("loading country geometry")?;
    let postings = data::load_postings(&data_dir.join("postings.json"))
        .context("loading postings")?;

    let mut app = App::new(renderer, postings);

    // Main loop
    loop {
        // The draw pass also adopts terminal resizes via the laid-out
        // map pane size, so Resize events need no handling of their own
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match app.focus {
                    Focus::Search => handle_search_key(&mut app, key.code),
                    Focus::Map => handle_map_key(&mut app, key.code),
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                _ => {}
            }
        }

        // Advance the fly-to animation
        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_map_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Date histogram window
        KeyCode::Char(']') => app.date_chart.zoom_in(),
        KeyCode::Char('[') => app.date_chart.zoom_out(),

        // Search panel
        KeyCode::Char('/') => app.focus = Focus::Search,

        // Layer toggles
        KeyCode::Char('c') | KeyCode::Char('C') => app.map_renderer.toggle_cities(),
        KeyCode::Char('L') => app.map_renderer.toggle_labels(),
        KeyCode::Char('x') | KeyCode::Char('X') => app.map_renderer.toggle_clusters(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.map_renderer.toggle_non_eu(),

        // Reset view
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

        _ => {}
    }
}

fn handle_search_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.leave_search(),
        KeyCode::Enter => app.search_accept(),
        KeyCode::Tab => app.search_cycle(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_char(c),
        _ => {}
    }
}

/// Handle mouse events for panning, zooming and country selection
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for the cursor marker
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click and drag to pan
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        // Right click selects (or deselects) the country under the cursor
        MouseEventKind::Down(MouseButton::Right) => {
            app.select_at(mouse.column, mouse.row);
        }
        _ => {}
    }
}
