use crate::app::App;
use crate::braille::{BrailleCanvas, ColorCanvas, Rgb};
use crate::detail::{Detail, PLACEHOLDER};
use crate::layout::filter_button_rects;
use crate::map::MapLayers;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

/// Colour glyphs are blended against; matches the terminal's dark background
pub const MAP_BACKGROUND: Rgb = Rgb::new(0, 0, 0);

const COUNTRY_COLOR: Color = Color::Rgb(0x8a, 0x9b, 0xa8);
const GRATICULE_COLOR: Color = Color::Rgb(0x3a, 0x3a, 0x3a);

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = &app.layout;
    render_filter_bar(frame, app, layout.filter_bar);
    render_map(frame, app, layout.map);
    render_detail(frame, app.detail(), layout.detail);
    render_stats(frame, app, layout.stats);
    render_status_bar(frame, app, layout.status);
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(panel("Filter"), area);

    let captions = app.filter_captions();
    let rects = filter_button_rects(area, &captions);
    let active = app.filters().active_index();
    for (i, (caption, rect)) in captions.iter().zip(rects).enumerate() {
        if rect.width == 0 {
            continue;
        }
        let style = if i == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray).bg(Color::Rgb(0x26, 0x26, 0x26))
        };
        frame.render_widget(Paragraph::new(Span::styled(caption.as_str(), style)), rect);
    }
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(panel("Dinosaur Fossil Discoveries"), area);

    let inner = app.layout.map_inner;
    let (width, height) = (inner.width as usize, inner.height as usize);

    let layers = app.map_renderer.render(width, height, &app.viewport);
    let mut glyphs = ColorCanvas::new(width, height);
    app.layer().render(&mut glyphs, &app.viewport, MAP_BACKGROUND);

    frame.render_widget(MapWidget { layers, glyphs }, inner);
}

/// Braille map background with the glyph canvas painted on top
struct MapWidget {
    layers: MapLayers,
    glyphs: ColorCanvas,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
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

    fn render_glyphs(&self, area: Rect, buf: &mut Buffer) {
        let rows = self.glyphs.height().min(area.height as usize);
        let cols = self.glyphs.width().min(area.width as usize);
        for row in 0..rows {
            let y = area.y + row as u16;
            let mut col = 0;
            while col < cols {
                let Some((text, color)) = self.glyphs.glyph_at(col, row) else {
                    col += 1;
                    continue;
                };
                let x = area.x + col as u16;
                let room = (area.right() - x) as usize;
                let (next_x, _) = buf.set_stringn(x, y, &text, room, Style::default().fg(color.into()));
                // Wide symbols cover the following cell too
                col = ((next_x - area.x) as usize).max(col + 1);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: graticule, countries, glyphs
        Self::render_layer(&self.layers.graticule, GRATICULE_COLOR, area, buf);
        Self::render_layer(&self.layers.countries, COUNTRY_COLOR, area, buf);
        self.render_glyphs(area, buf);
    }
}

fn render_detail(frame: &mut Frame, detail: &Detail, area: Rect) {
    let label_style = Style::default().fg(Color::DarkGray);
    let lines: Vec<Line> = match detail {
        Detail::Placeholder => vec![Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ))],
        Detail::Record { title, rows } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    title.as_str(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::default(),
            ];
            lines.extend(rows.iter().map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label}: "), label_style),
                    Span::raw(value.as_str()),
                ])
            }));
            lines
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(panel("Details"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.stats();
    let label_style = Style::default().fg(Color::DarkGray);
    let value_style = Style::default().fg(Color::Yellow);
    let lines = vec![
        Line::from(vec![
            Span::styled("Visible: ", label_style),
            Span::styled(stats.visible_count.to_string(), value_style),
        ]),
        Line::from(vec![
            Span::styled("Locations: ", label_style),
            Span::styled(stats.location_count.to_string(), value_style),
        ]),
        Line::from(vec![
            Span::styled("Avg length: ", label_style),
            Span::styled(format!("{} m", stats.avg_length_label()), value_style),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Stats")), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{} records", app.layer().len()),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            " | 0-9/Tab:filter hjkl:pan +/-:zoom r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(status);
    frame.render_widget(paragraph, area);
}
