use glam::DVec2;
use rayon::prelude::*;

use crate::braille::BrailleCanvas;
use crate::map::geometry::draw_line;
use crate::map::graticule::graticule;
use crate::map::projection::{Mercator, Viewport};

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// A line already projected into scene coordinates
pub type SceneLine = Vec<DVec2>;

/// Rendered background layers, one canvas per colour
pub struct MapLayers {
    pub countries: BrailleCanvas,
    pub graticule: BrailleCanvas,
}

/// Static world background: country outlines and the graticule.
///
/// Geometry is projected once at construction; rendering only maps the
/// cached scene coordinates through the viewport.
pub struct MapRenderer {
    countries: Vec<SceneLine>,
    graticule: Vec<SceneLine>,
}

impl MapRenderer {
    pub fn new(boundaries: &[LineString], projection: &Mercator) -> Self {
        Self {
            countries: project_lines(boundaries, projection),
            graticule: project_lines(&graticule(), projection),
        }
    }

    /// Number of projected boundary lines
    pub fn country_line_count(&self) -> usize {
        self.countries.len()
    }

    /// Check if any country geometry is loaded
    pub fn has_data(&self) -> bool {
        !self.countries.is_empty()
    }

    /// Render all map features into fresh canvases of the given character size
    pub fn render(&self, width: usize, height: usize, viewport: &Viewport) -> MapLayers {
        let mut countries = BrailleCanvas::new(width, height);
        let mut graticule = BrailleCanvas::new(width, height);

        for line in &self.graticule {
            draw_scene_line(&mut graticule, line, viewport);
        }
        for line in &self.countries {
            draw_scene_line(&mut countries, line, viewport);
        }

        MapLayers {
            countries,
            graticule,
        }
    }
}

/// Project lon/lat lines into the scene in parallel, splitting wherever a
/// segment jumps across the antimeridian.
fn project_lines(lines: &[LineString], projection: &Mercator) -> Vec<SceneLine> {
    lines
        .par_iter()
        .flat_map_iter(|line| split_antimeridian(line, projection))
        .filter(|line| line.len() >= 2)
        .collect()
}

fn split_antimeridian(line: &LineString, projection: &Mercator) -> Vec<SceneLine> {
    let mut parts = Vec::new();
    let mut current: SceneLine = Vec::with_capacity(line.len());
    let mut prev_lon: Option<f64> = None;

    for &(lon, lat) in line {
        if !(lon.is_finite() && lat.is_finite()) {
            continue;
        }
        if let Some(prev) = prev_lon {
            if (lon - prev).abs() > 180.0 {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(projection.project(lon, lat));
        prev_lon = Some(lon);
    }
    parts.push(current);
    parts
}

/// Draw a projected line with viewport culling
fn draw_scene_line(canvas: &mut BrailleCanvas, line: &SceneLine, viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;

    for &point in line {
        let (px, py) = viewport.project(point);

        if let Some((prev_x, prev_y)) = prev {
            if viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}
