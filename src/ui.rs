use crate::app::{App, Focus, MapState};
use crate::charts::{Axis, Histogram};
use crate::data::codes;
use crate::map::MapLayers;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the dashboard: map pane on the left, search box and the three
/// histograms stacked on the right, status bar along the bottom.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ])
        .split(cols[1]);

    render_map(frame, app, cols[0]);
    render_search(frame, app, side[0]);
    render_histogram(frame, &app.date_chart, side[1]);
    render_histogram(frame, &app.skill_chart, side[2]);
    render_histogram(frame, &app.location_chart, side[3]);
    render_status_bar(frame, app, rows[1]);
}

fn render_map(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = match app.focused_country() {
        Some(code) => format!(" {} ", codes::display_name(code)),
        None => " Europe ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Projection and clustering run against the laid-out pane size
    app.ensure_map_size(inner.width as usize, inner.height as usize);

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &app.viewport,
        app.clusters(),
        app.focused_country(),
    );

    // Mouse cursor marker in pane-relative character coords
    let cursor_pos = app.mouse_pos.and_then(|(col, row)| {
        if col > inner.x
            && row > inner.y
            && col < inner.x + inner.width
            && row < inner.y + inner.height
        {
            Some((col - inner.x, row - inner.y))
        } else {
            None
        }
    });

    let map_widget = MapWidget {
        layers,
        cursor_pos,
        flying: matches!(app.state, MapState::FlyingTo { .. }),
        inner_width: inner.width,
        inner_height: inner.height,
    };
    frame.render_widget(map_widget, inner);
}

/// Custom widget overlaying the braille layers and text labels
struct MapWidget {
    layers: MapLayers,
    cursor_pos: Option<(u16, u16)>,
    flying: bool,
    inner_width: u16,
    inner_height: u16,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(
        &self,
        canvas: &crate::braille::BrailleCanvas,
        color: Color,
        area: Rect,
        buf: &mut Buffer,
    ) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: borders, focused country, cluster markers
        self.render_layer(&self.layers.borders, Color::Cyan, area, buf);
        self.render_layer(&self.layers.focus, Color::Yellow, area, buf);
        let cluster_color = if self.flying { Color::Magenta } else { Color::Red };
        self.render_layer(&self.layers.clusters, cluster_color, area, buf);

        let label_style = Style::default().fg(Color::White);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= self.inner_height || *lx >= self.inner_width {
                continue;
            }
            let y = area.y + *ly;
            let max_len = (self.inner_width - *lx) as usize;
            for (i, ch) in text.chars().take(max_len.min(16)).enumerate() {
                let x = area.x + *lx + i as u16;
                if x < area.x + area.width {
                    buf[(x, y)].set_char(ch).set_style(label_style);
                }
            }
        }

        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Search;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused {
            Color::Yellow
        } else {
            Color::DarkGray
        }))
        .title(Span::styled(
            " Skills (/) ",
            Style::default().fg(Color::Cyan),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans: Vec<Span> = Vec::new();
    for tag in app.search.tags() {
        spans.push(Span::styled(
            format!("[{tag}] "),
            Style::default().fg(Color::Green),
        ));
    }
    let query = app.search.query();
    spans.push(Span::styled(
        query.to_string(),
        Style::default().fg(Color::White),
    ));

    // Inline completion hint: the rest of the highlighted suggestion
    if let Some(suggestion) = app.search.highlighted() {
        if let Some(rest) = completion_rest(&suggestion, query) {
            spans.push(Span::styled(rest, Style::default().fg(Color::DarkGray)));
        }
    }
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// The suffix of `suggestion` past the query's last token, the part the
/// completion hint shows.
fn completion_rest(suggestion: &str, query: &str) -> Option<String> {
    let token = query.split_whitespace().last()?;
    let word = suggestion
        .split_whitespace()
        .find(|w| w.len() >= token.len() && w[..token.len()].eq_ignore_ascii_case(token))?;
    Some(format!("{} ({suggestion})", &word[token.len()..]))
}

fn render_histogram(frame: &mut Frame, hist: &Histogram, area: Rect) {
    let title = if hist.is_zoomed() {
        format!(" {} [zoom] ", hist.title)
    } else {
        format!(" {} ", hist.title)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(title, Style::default().fg(Color::Cyan)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 20 || inner.height == 0 {
        return;
    }

    let max = hist.max_value().max(1);
    let name_width = 12usize;
    let bar_width = inner.width as usize - name_width - 7;
    let bar_color = match hist.axis {
        Axis::Temporal => Color::Blue,
        Axis::Categorical => Color::Green,
    };

    let mut lines: Vec<Line> = Vec::new();
    for bin in hist.visible().iter().take(inner.height as usize) {
        let mut name: String = bin.name.chars().take(name_width).collect();
        while name.chars().count() < name_width {
            name.push(' ');
        }
        let filled = (bin.value as usize * bar_width) / max as usize;
        lines.push(Line::from(vec![
            Span::styled(name, Style::default().fg(Color::White)),
            Span::styled("█".repeat(filled), Style::default().fg(bar_color)),
            Span::styled(
                format!(" {}", bin.value),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let toggle = |on: bool, on_text: &'static str, off_text: &'static str| {
        Span::styled(
            if on { on_text } else { off_text },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        )
    };

    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!(" | {} postings ", app.posting_count()),
            Style::default().fg(Color::Magenta),
        ),
        toggle(settings.show_cities, "[C]ities ", "[c]ities "),
        toggle(settings.show_labels, "[L]abels ", "[l]abels "),
        toggle(settings.show_clusters, "[X]clusters ", "[x]clusters "),
        toggle(settings.show_non_eu, "[N]on-eu ", "[n]on-eu "),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | hjkl:pan +/-:zoom [/]:dates rclick:select /:search r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
