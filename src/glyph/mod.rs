mod scale;
mod style;

pub use scale::{SizeScale, MAX_SIZE, MIN_SIZE};
pub use style::{
    type_color, type_icon, DietShape, TypeMarker, CORNER_RADIUS, DEFAULT_COLOR, FALLBACK_EMOJI,
};

use std::time::{Duration, Instant};

use glam::DVec2;

use crate::braille::{ColorCanvas, Rgb};
use crate::data::FossilRecord;
use crate::filter::{Filter, FILTER_TRANSITION};
use crate::map::geometry::{fill_circle, fill_rounded_square, fill_triangle};
use crate::map::{Mercator, SceneGrid, Viewport};
use crate::transition::Tween;

/// Scale of a hovered glyph
pub const HOVER_SCALE: f64 = 1.45;
/// Duration of the hover grow and shrink
pub const HOVER_TRANSITION: Duration = Duration::from_millis(200);

/// Bucket size of the hit-test grid, scene units
const GRID_CELL: f64 = 64.0;
/// Extra margin around each indexed box so pointer slack never misses
const GRID_MARGIN: f64 = 16.0;

const MARKER_COLOR: Rgb = Rgb::new(255, 255, 255);

/// The visual group for one record: a diet shape with a type marker on top
#[derive(Clone, Debug)]
pub struct Glyph {
    pub record: FossilRecord,
    /// Scene position of the record's coordinates
    pub position: DVec2,
    /// Output of the size scale; NaN for a degenerate glyph
    pub size: f64,
    pub shape: DietShape,
    pub color: Rgb,
    pub marker: TypeMarker,
    pub opacity: Tween,
    pub scale: Tween,
}

impl Glyph {
    pub fn new(record: FossilRecord, projection: &Mercator, sizes: &SizeScale) -> Self {
        let position = projection.project(record.lng, record.lat);
        let size = sizes.size(record.length_m);
        Self {
            position,
            size,
            shape: DietShape::for_diet(&record.diet),
            color: type_color(&record.kind).unwrap_or(DEFAULT_COLOR),
            marker: TypeMarker::for_type(&record.kind),
            opacity: Tween::still(1.0),
            scale: Tween::still(1.0),
            record,
        }
    }

    /// `translate(position) scale(k)`
    pub fn transform(&self) -> (DVec2, f64) {
        (self.position, self.scale.value())
    }

    /// Not drawn and never hit: the size or position is not a number
    pub fn is_degenerate(&self) -> bool {
        !(self.size.is_finite() && self.position.is_finite())
    }

    /// Largest unscaled half-extent of shape and marker
    fn half_extent(&self) -> f64 {
        self.shape
            .half_extent(self.size)
            .max(self.marker.extent(self.size) / 2.0)
    }

    /// Whether scene point `p` falls on the glyph, allowing `slack` scene
    /// units of tolerance around its outline
    pub fn contains(&self, p: DVec2, slack: f64) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let k = self.scale.value();
        let offset = (p - self.position) / k;
        let inside =
            |o: DVec2| self.shape.contains(o, self.size) || self.marker.contains(o, self.size);
        if inside(offset) {
            return true;
        }
        if slack <= 0.0 {
            return false;
        }
        let pulled = offset - offset.normalize_or_zero() * (slack / k).min(offset.length());
        inside(pulled)
    }

    fn draw(&self, canvas: &mut ColorCanvas, viewport: &Viewport, background: Rgb) {
        let opacity = self.opacity.value();
        canvas.set_pen(
            self.color
                .blend_over(background, self.shape.fill_opacity() * opacity),
        );

        let center = viewport.project_f(self.position);
        let px = viewport.scale() * self.scale.value();
        match self.shape {
            DietShape::Circle | DietShape::DefaultCircle => {
                fill_circle(canvas, center.x, center.y, self.size * px)
            }
            DietShape::RoundedSquare => fill_rounded_square(
                canvas,
                center.x,
                center.y,
                self.size * px,
                CORNER_RADIUS * px,
            ),
            DietShape::Triangle => fill_triangle(
                canvas,
                center.x,
                center.y,
                self.shape.half_extent(self.size) * px,
            ),
        }

        canvas.put_symbol(
            center.x.floor() as i32,
            center.y.floor() as i32,
            self.marker.symbol(),
            MARKER_COLOR.blend_over(background, opacity),
        );
    }
}

/// All glyphs with their draw order and hit-test index.
///
/// Glyph `i` corresponds to record `i` of the loaded table. Draw order is a
/// permutation of glyph indices, painted first to last.
pub struct GlyphLayer {
    glyphs: Vec<Glyph>,
    draw_order: Vec<usize>,
    /// Position of each glyph within `draw_order`
    rank: Vec<usize>,
    grid: SceneGrid,
}

impl GlyphLayer {
    pub fn new(records: Vec<FossilRecord>, projection: &Mercator) -> Self {
        let sizes = SizeScale::from_records(&records);
        let glyphs: Vec<Glyph> = records
            .into_iter()
            .map(|record| Glyph::new(record, projection, &sizes))
            .collect();

        // Index boxes at hover scale so a grown glyph stays findable
        let grid = SceneGrid::build(
            glyphs.iter().map(|g| {
                let reach = DVec2::splat(g.half_extent() * HOVER_SCALE + GRID_MARGIN);
                (g.position - reach, g.position + reach)
            }),
            GRID_CELL,
        );

        let draw_order: Vec<usize> = (0..glyphs.len()).collect();
        let rank = draw_order.clone();
        Self {
            glyphs,
            draw_order,
            rank,
            grid,
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn get(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    /// Start the opacity transition towards `filter`'s targets
    pub fn apply_filter(&mut self, filter: &Filter, now: Instant) {
        for glyph in &mut self.glyphs {
            let target = filter.target_opacity(&glyph.record.kind);
            glyph.opacity.retarget(target, now, FILTER_TRANSITION);
        }
    }

    /// Step every tween
    pub fn advance(&mut self, now: Instant) {
        for glyph in &mut self.glyphs {
            glyph.opacity.advance(now);
            glyph.scale.advance(now);
        }
    }

    pub fn opacity_running(&self) -> bool {
        self.glyphs.iter().any(|g| g.opacity.is_running())
    }

    /// Topmost glyph under scene point `p`
    pub fn hit_test(&self, p: DVec2, slack: f64) -> Option<usize> {
        let slack = slack.min(GRID_MARGIN);
        self.grid
            .query_point(p)
            .iter()
            .copied()
            .filter(|&i| self.glyphs[i].contains(p, slack))
            .max_by_key(|&i| self.rank[i])
    }

    /// Move a glyph to the top of the draw order
    pub fn raise(&mut self, index: usize) {
        let Some(&at) = self.rank.get(index) else {
            return;
        };
        self.draw_order.remove(at);
        self.draw_order.push(index);
        for (pos, &i) in self.draw_order.iter().enumerate().skip(at) {
            self.rank[i] = pos;
        }
    }

    pub fn hover_enter(&mut self, index: usize, now: Instant) {
        self.raise(index);
        if let Some(glyph) = self.glyphs.get_mut(index) {
            glyph.scale.retarget(HOVER_SCALE, now, HOVER_TRANSITION);
        }
    }

    pub fn hover_leave(&mut self, index: usize, now: Instant) {
        if let Some(glyph) = self.glyphs.get_mut(index) {
            glyph.scale.retarget(1.0, now, HOVER_TRANSITION);
        }
    }

    /// Records of glyphs currently shown, by opacity
    pub fn visible_records(&self) -> impl Iterator<Item = &FossilRecord> {
        self.glyphs
            .iter()
            .filter(|g| g.opacity.value() > 0.5)
            .map(|g| &g.record)
    }

    /// Paint every glyph in draw order
    pub fn render(&self, canvas: &mut ColorCanvas, viewport: &Viewport, background: Rgb) {
        for &i in &self.draw_order {
            let glyph = &self.glyphs[i];
            if glyph.is_degenerate() {
                continue;
            }
            let (x, y) = viewport.project(glyph.position);
            let reach = (glyph.half_extent() * glyph.scale.value() * viewport.scale()).ceil() as i32;
            if !viewport.line_might_be_visible((x - reach, y - reach), (x + reach, y + reach)) {
                continue;
            }
            glyph.draw(canvas, viewport, background);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Diet, DinoType};

    fn record(name: &str, kind: &str, diet: &str, length: f64, lng: f64, lat: f64) -> FossilRecord {
        FossilRecord {
            name: name.into(),
            kind: DinoType::parse(kind),
            diet: Diet::parse(diet),
            length_m: length,
            max_ma: 70.0,
            min_ma: 65.0,
            lng,
            lat,
            region: "Asia".into(),
            family: None,
        }
    }

    fn layer(records: Vec<FossilRecord>) -> GlyphLayer {
        GlyphLayer::new(records, &Mercator::world_scene())
    }

    #[test]
    fn test_glyph_styling() {
        let layer = layer(vec![
            record("a", "sauropod", "herbivorous", 20.0, 0.0, 0.0),
            record("b", "pterosaur", "piscivorous", 5.0, 10.0, 10.0),
        ]);
        let a = &layer.glyphs()[0];
        assert_eq!(a.shape, DietShape::RoundedSquare);
        assert_eq!(a.marker, TypeMarker::Icon("S"));
        assert_eq!(a.size, MAX_SIZE);

        let b = &layer.glyphs()[1];
        assert_eq!(b.color, DEFAULT_COLOR);
        assert_eq!(b.marker, TypeMarker::Emoji);
        assert_eq!(b.shape, DietShape::DefaultCircle);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut layer = layer(vec![
            record("a", "sauropod", "carnivorous", 10.0, 0.0, 0.0),
            record("b", "ornithopod", "carnivorous", 10.0, 0.0, 0.0),
            record("c", "ornithopod", "carnivorous", 10.0, 60.0, 0.0),
        ]);
        let centre = layer.glyphs()[0].position;
        assert_eq!(layer.hit_test(centre, 0.0), Some(1));

        layer.raise(0);
        assert_eq!(layer.draw_order(), &[1, 2, 0]);
        assert_eq!(layer.hit_test(centre, 0.0), Some(0));

        // Between the two clusters
        assert_eq!(layer.hit_test(centre + DVec2::new(100.0, 0.0), 0.0), None);
    }

    #[test]
    fn test_slack_extends_hit_area() {
        let layer = layer(vec![record("a", "sauropod", "carnivorous", 10.0, 0.0, 0.0)]);
        let glyph = &layer.glyphs()[0];
        // Icon box reaches 1.1 * size along each axis
        let edge = glyph.position + DVec2::new(glyph.size * 1.1 + 2.0, 0.0);
        assert_eq!(layer.hit_test(edge, 0.0), None);
        assert_eq!(layer.hit_test(edge, 3.0), Some(0));
    }

    #[test]
    fn test_degenerate_glyph_is_skipped() {
        let layer = layer(vec![record("a", "sauropod", "carnivorous", f64::NAN, 0.0, 0.0)]);
        let glyph = &layer.glyphs()[0];
        assert!(glyph.is_degenerate());
        assert_eq!(layer.hit_test(glyph.position, 5.0), None);

        let viewport = Viewport::fit(160, 96);
        let mut canvas = ColorCanvas::new(80, 24);
        layer.render(&mut canvas, &viewport, Rgb::new(0, 0, 0));
        assert!((0..24).all(|row| (0..80).all(|col| canvas.glyph_at(col, row).is_none())));
    }

    #[test]
    fn test_filter_transition() {
        let mut layer = layer(vec![
            record("a", "sauropod", "carnivorous", 10.0, 0.0, 0.0),
            record("b", "ornithopod", "carnivorous", 10.0, 20.0, 0.0),
        ]);
        let t0 = Instant::now();
        layer.apply_filter(&Filter::Type(DinoType::Sauropod), t0);
        assert!(layer.opacity_running());
        // Opacity only moves as time passes
        assert_eq!(layer.visible_records().count(), 2);

        layer.advance(t0 + FILTER_TRANSITION);
        assert!(!layer.opacity_running());
        assert_eq!(layer.glyphs()[0].opacity.value(), 1.0);
        assert_eq!(layer.glyphs()[1].opacity.value(), 0.08);
        let visible: Vec<_> = layer.visible_records().map(|r| r.name.as_str()).collect();
        assert_eq!(visible, vec!["a"]);
    }

    #[test]
    fn test_hover_round_trip() {
        let mut layer = layer(vec![
            record("a", "sauropod", "carnivorous", 10.0, 0.0, 0.0),
            record("b", "ornithopod", "carnivorous", 10.0, 20.0, 0.0),
        ]);
        let before = layer.glyphs()[0].transform();
        let t0 = Instant::now();

        layer.hover_enter(0, t0);
        assert_eq!(layer.draw_order(), &[1, 0]);
        layer.advance(t0 + HOVER_TRANSITION);
        assert_eq!(layer.glyphs()[0].transform(), (before.0, HOVER_SCALE));

        let t1 = t0 + HOVER_TRANSITION;
        layer.hover_leave(0, t1);
        layer.advance(t1 + HOVER_TRANSITION);
        assert_eq!(layer.glyphs()[0].transform(), before);
        // Raised glyph stays on top
        assert_eq!(layer.draw_order(), &[1, 0]);
    }

    #[test]
    fn test_render_paints_colour_and_marker() {
        let layer = layer(vec![record("a", "sauropod", "carnivorous", 10.0, 0.0, 0.0)]);
        let viewport = Viewport::fit(280, 150);
        let mut canvas = ColorCanvas::new(140, 38);
        let background = Rgb::new(0, 0, 0);
        layer.render(&mut canvas, &viewport, background);

        let (x, y) = viewport.project(layer.glyphs()[0].position);
        let (symbol, _) = canvas
            .glyph_at(x as usize / 2, y as usize / 4)
            .expect("marker cell");
        assert_eq!(symbol, "S");

        let shape_colour = Rgb::new(0x11, 0xa0, 0xd0).blend_over(background, 0.9);
        let painted = (0..38)
            .flat_map(|row| (0..140).map(move |col| (col, row)))
            .filter_map(|(col, row)| canvas.glyph_at(col, row))
            .any(|(_, colour)| colour == shape_colour);
        assert!(painted);
    }
}
