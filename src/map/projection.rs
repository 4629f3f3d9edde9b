use glam::DVec2;
use std::f64::consts::FRAC_PI_4;

/// Fixed scene size all geometry is projected into
pub const SCENE_WIDTH: f64 = 1400.0;
pub const SCENE_HEIGHT: f64 = 750.0;

/// Latitudes beyond this are pinned before projecting (Mercator diverges at the poles)
const MAX_LAT: f64 = 89.9;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 20.0;

/// Spherical Mercator into scene coordinates, matching d3's `geoMercator`:
/// `x = k·λ + tx`, `y = -k·ln(tan(π/4 + φ/2)) + ty` with λ, φ in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mercator {
    pub scale: f64,
    pub translate: DVec2,
}

impl Mercator {
    pub fn new(scale: f64, translate: DVec2) -> Self {
        Self { scale, translate }
    }

    /// The world view used for the fossil map: scale 180, centred
    /// horizontally and shifted down so the northern continents fit.
    pub fn world_scene() -> Self {
        Self::new(180.0, DVec2::new(SCENE_WIDTH / 2.0, SCENE_HEIGHT / 1.6))
    }

    /// Project (lon, lat) in degrees to scene coordinates
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> DVec2 {
        let lambda = lon.to_radians();
        let phi = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
        let x = lambda;
        let y = -(FRAC_PI_4 + phi / 2.0).tan().ln();
        DVec2::new(x, y) * self.scale + self.translate
    }

    /// Inverse of [`Mercator::project`], returns (lon, lat) in degrees
    pub fn invert(&self, p: DVec2) -> (f64, f64) {
        let q = (p - self.translate) / self.scale;
        let lon = q.x.to_degrees();
        let lat = (2.0 * (-q.y).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
        (lon, lat)
    }
}

impl Default for Mercator {
    fn default() -> Self {
        Self::world_scene()
    }
}

/// Viewport mapping the scene onto the Braille pixel grid of the terminal.
/// At zoom 1 the whole scene is fitted into the canvas, preserving aspect.
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Scene point shown at the canvas centre
    pub center: DVec2,
    /// Zoom level (higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center: DVec2, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// Whole-scene view
    pub fn fit(width: usize, height: usize) -> Self {
        Self::new(DVec2::new(SCENE_WIDTH / 2.0, SCENE_HEIGHT / 2.0), 1.0, width, height)
    }

    /// Braille pixels per scene unit at the current zoom
    #[inline]
    pub fn scale(&self) -> f64 {
        let base = (self.width as f64 / SCENE_WIDTH).min(self.height as f64 / SCENE_HEIGHT);
        base * self.zoom
    }

    #[inline]
    fn half_canvas(&self) -> DVec2 {
        DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Scene point to sub-pixel canvas position
    #[inline]
    pub fn project_f(&self, p: DVec2) -> DVec2 {
        (p - self.center) * self.scale() + self.half_canvas()
    }

    /// Scene point to canvas pixel
    #[inline]
    pub fn project(&self, p: DVec2) -> (i32, i32) {
        let q = self.project_f(p);
        (q.x.floor() as i32, q.y.floor() as i32)
    }

    /// Canvas pixel back to a scene point (pixel centre)
    pub fn unproject(&self, px: i32, py: i32) -> DVec2 {
        let q = DVec2::new(px as f64 + 0.5, py as f64 + 0.5);
        (q - self.half_canvas()) / self.scale() + self.center
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.scale();
        if scale <= 0.0 {
            return;
        }
        self.center += DVec2::new(dx as f64, dy as f64) / scale;

        // Keep the centre over the scene
        self.center.x = self.center.x.clamp(0.0, SCENE_WIDTH);
        self.center.y = self.center.y.clamp(0.0, SCENE_HEIGHT);
    }

    /// Zoom in by a factor
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    /// Zoom out by a factor
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by factor keeping the scene point under (px, py) fixed
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let anchor = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let scale = self.scale();
        if scale <= 0.0 {
            return;
        }
        let offset = DVec2::new(px as f64 + 0.5, py as f64 + 0.5) - self.half_canvas();
        self.center = anchor - offset / scale;
        self.center.x = self.center.x.clamp(0.0, SCENE_WIDTH);
        self.center.y = self.center.y.clamp(0.0, SCENE_HEIGHT);
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0
            && min_x < self.width as i32
            && max_y >= 0
            && min_y < self.height as i32
    }
}
