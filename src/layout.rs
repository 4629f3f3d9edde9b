use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

/// Width of the detail and stats column
const SIDE_PANEL_WIDTH: u16 = 36;

/// Areas of every panel for one terminal size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub filter_bar: Rect,
    pub map: Rect,
    /// Map area inside its border; the Braille canvas covers exactly this
    pub map_inner: Rect,
    pub detail: Rect,
    pub stats: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Filter bar
                Constraint::Min(5),    // Map and side panel
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(SIDE_PANEL_WIDTH)])
            .split(rows[1]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(5)])
            .split(body[1]);

        Self {
            filter_bar: rows[0],
            map: body[0],
            map_inner: body[0].inner(Margin::new(1, 1)),
            detail: side[0],
            stats: side[1],
            status: rows[2],
        }
    }

    /// Braille pixel size of the map canvas
    pub fn canvas_pixels(&self) -> (usize, usize) {
        (
            self.map_inner.width as usize * 2,
            self.map_inner.height as usize * 4,
        )
    }

    /// Terminal cell to Braille pixel on the map canvas (cell centre)
    pub fn cell_to_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let inner = self.map_inner;
        if col < inner.x || row < inner.y || col >= inner.right() || row >= inner.bottom() {
            return None;
        }
        Some((
            (col - inner.x) as i32 * 2 + 1,
            (row - inner.y) as i32 * 4 + 2,
        ))
    }
}

/// Caption of the filter button at `index`; the first ten carry their key
pub fn button_caption(index: usize, label: &str) -> String {
    if index < 10 {
        format!(" {index}:{label} ")
    } else {
        format!(" {label} ")
    }
}

/// Rects of the filter buttons laid out left to right inside the bar's
/// border. Buttons that do not fit get an empty rect.
pub fn filter_button_rects(bar: Rect, captions: &[String]) -> Vec<Rect> {
    let inner = bar.inner(Margin::new(1, 1));
    let mut x = inner.x;
    captions
        .iter()
        .map(|caption| {
            let width = caption.chars().count() as u16;
            if inner.height == 0 || x.saturating_add(width) > inner.right() {
                x = inner.right();
                return Rect::new(inner.right(), inner.y, 0, 0);
            }
            let rect = Rect::new(x, inner.y, width, 1);
            x += width + 1;
            rect
        })
        .collect()
}

/// Index of the button containing terminal cell `(col, row)`
pub fn button_at(rects: &[Rect], col: u16, row: u16) -> Option<usize> {
    rects.iter().position(|r| {
        r.width > 0 && col >= r.x && col < r.right() && row >= r.y && row < r.bottom()
    })
}
