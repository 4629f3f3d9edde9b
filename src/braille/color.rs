use super::canvas::{braille_char, dot_bit, Plot};

/// 24-bit colour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (alpha is dropped)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::new(it.next()??, it.next()??, it.next()??))
            }
            6 | 8 => Some(Self::new(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            _ => None,
        }
    }

    /// Composite this colour at `alpha` over `background`
    pub fn blend_over(self, background: Rgb, alpha: f64) -> Rgb {
        let a = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
        Rgb::new(mix(self.r, background.r), mix(self.g, background.g), mix(self.b, background.b))
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

/// One character cell of a [`ColorCanvas`]
#[derive(Clone, Copy, Default)]
pub struct ColorCell {
    pub bits: u8,
    pub color: Option<Rgb>,
    /// Overlay symbol that replaces the Braille pattern
    pub symbol: Option<&'static str>,
    pub symbol_color: Option<Rgb>,
    symbol_stroke: u32,
}

/// Braille canvas with one colour per character cell.
///
/// Painting uses a pen colour; the last shape to touch a cell owns its
/// colour, which gives painter's-algorithm layering for overlapping glyphs.
pub struct ColorCanvas {
    width: usize,
    height: usize,
    cells: Vec<ColorCell>,
    pen: Rgb,
    stroke: u32,
}

impl ColorCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![ColorCell::default(); width * height],
            pen: Rgb::new(255, 255, 255),
            stroke: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Start a new stroke in `color`; each glyph paints with its own stroke
    pub fn set_pen(&mut self, color: Rgb) {
        self.pen = color;
        self.stroke = self.stroke.wrapping_add(1);
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&ColorCell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col)
    }

    /// Place an overlay symbol in the cell containing pixel `(x, y)`
    pub fn put_symbol(&mut self, x: i32, y: i32, symbol: &'static str, color: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        let (cx, cy) = (x as usize / 2, y as usize / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }
        let cell = &mut self.cells[cy * self.width + cx];
        cell.symbol = Some(symbol);
        cell.symbol_color = Some(color);
        cell.symbol_stroke = self.stroke;
    }

    /// Character and colour to show for a cell, if anything was painted
    pub fn glyph_at(&self, col: usize, row: usize) -> Option<(String, Rgb)> {
        let cell = self.cell(col, row)?;
        if let (Some(symbol), Some(color)) = (cell.symbol, cell.symbol_color) {
            return Some((symbol.to_string(), color));
        }
        if cell.bits == 0 {
            return None;
        }
        Some((braille_char(cell.bits).to_string(), cell.color?))
    }
}

impl Plot for ColorCanvas {
    #[inline(always)]
    fn plot(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }
        let cell = &mut self.cells[cy * self.width + cx];
        // A later shape painted over a marker hides it
        if cell.symbol.is_some() && cell.symbol_stroke != self.stroke {
            cell.symbol = None;
        }
        cell.bits |= dot_bit(x, y);
        cell.color = Some(self.pen);
    }
}
