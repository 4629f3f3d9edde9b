use std::time::Instant;

use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::data::FossilRecord;
use crate::detail::Detail;
use crate::filter::{Filter, FilterController};
use crate::glyph::GlyphLayer;
use crate::layout::{button_at, button_caption, filter_button_rects, AppLayout};
use crate::map::{LineString, MapRenderer, Mercator, Viewport};
use crate::stats::Stats;

/// Pointer tolerance around glyph outlines, in Braille pixels
const HOVER_SLACK_PX: f64 = 1.5;

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub layout: AppLayout,
    pub should_quit: bool,
    projection: Mercator,
    layer: GlyphLayer,
    filters: FilterController,
    hovered: Option<usize>,
    detail: Detail,
    stats: Stats,
    /// Set by a filter selection, cleared once its opacity batch completes
    stats_pending: bool,
    /// Last mouse position for drag tracking
    last_mouse: Option<(u16, u16)>,
}

impl App {
    pub fn new(records: Vec<FossilRecord>, boundaries: &[LineString], area: Rect) -> Self {
        let projection = Mercator::world_scene();
        let layout = AppLayout::new(area);
        let (width, height) = layout.canvas_pixels();

        let filters = FilterController::new(&records);
        let layer = GlyphLayer::new(records, &projection);
        let stats = Stats::compute(layer.visible_records());
        info!(
            visible = stats.visible_count,
            locations = stats.location_count,
            avg_length = %stats.avg_length_label(),
            "initial stats"
        );

        Self {
            viewport: Viewport::fit(width, height),
            map_renderer: MapRenderer::new(boundaries, &projection),
            layout,
            should_quit: false,
            projection,
            layer,
            filters,
            hovered: None,
            detail: Detail::Placeholder,
            stats,
            stats_pending: false,
            last_mouse: None,
        }
    }

    /// Update layout and viewport size when the terminal resizes
    pub fn resize(&mut self, area: Rect) {
        self.layout = AppLayout::new(area);
        let (width, height) = self.layout.canvas_pixels();
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn layer(&self) -> &GlyphLayer {
        &self.layer
    }

    pub fn filters(&self) -> &FilterController {
        &self.filters
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn detail(&self) -> &Detail {
        &self.detail
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Whether a filter transition is still waiting to refresh the stats
    pub fn stats_pending(&self) -> bool {
        self.stats_pending
    }

    /// Captions of the filter buttons, in option order
    pub fn filter_captions(&self) -> Vec<String> {
        self.filters
            .options()
            .iter()
            .enumerate()
            .map(|(i, filter)| button_caption(i, &filter.label()))
            .collect()
    }

    /// Make `filter` the active option and start its opacity transition.
    /// Returns false when `filter` is not one of the options.
    pub fn select_filter(&mut self, filter: &Filter, now: Instant) -> bool {
        if self.filters.select(filter).is_none() {
            return false;
        }
        self.start_filter_transition(now);
        true
    }

    pub fn select_filter_index(&mut self, index: usize, now: Instant) -> bool {
        if self.filters.select_index(index).is_none() {
            return false;
        }
        self.start_filter_transition(now);
        true
    }

    pub fn cycle_filter(&mut self, forward: bool, now: Instant) {
        self.filters.cycle(forward);
        self.start_filter_transition(now);
    }

    fn start_filter_transition(&mut self, now: Instant) {
        let filter = self.filters.active().clone();
        info!(filter = %filter, "filter selected");
        self.layer.apply_filter(&filter, now);
        // Supersedes any batch still in flight
        self.stats_pending = true;
    }

    /// Advance animations to `now`. Returns true when the stats were
    /// recomputed because a filter transition finished.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.layer.advance(now);
        if !self.stats_pending || self.layer.opacity_running() {
            return false;
        }
        self.stats_pending = false;
        self.stats = Stats::compute(self.layer.visible_records());
        info!(
            filter = %self.filters.active(),
            visible = self.stats.visible_count,
            locations = self.stats.location_count,
            avg_length = %self.stats.avg_length_label(),
            "stats recomputed"
        );
        true
    }

    /// Hover whatever glyph lies under terminal cell `(col, row)`
    pub fn pointer_moved(&mut self, col: u16, row: u16, now: Instant) {
        let hit = self.layout.cell_to_pixel(col, row).and_then(|(px, py)| {
            let scale = self.viewport.scale();
            if scale <= 0.0 {
                return None;
            }
            let p = self.viewport.unproject(px, py);
            self.layer.hit_test(p, HOVER_SLACK_PX / scale)
        });
        self.set_hover(hit, now);
    }

    /// Move the hover to `target`, leaving the previous glyph first
    pub fn set_hover(&mut self, target: Option<usize>, now: Instant) {
        if target == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            self.layer.hover_leave(previous, now);
            self.detail = Detail::Placeholder;
        }
        if let Some(glyph) = target.and_then(|i| self.layer.get(i)) {
            debug!(name = %glyph.record.name, "hover");
            self.detail = Detail::for_record(&glyph.record);
        }
        if let Some(index) = target {
            self.layer.hover_enter(index, now);
        }
        self.hovered = target;
    }

    /// Left button press: a filter button selects, the map starts a drag
    pub fn mouse_down(&mut self, col: u16, row: u16, now: Instant) {
        let rects = filter_button_rects(self.layout.filter_bar, &self.filter_captions());
        if let Some(index) = button_at(&rects, col, row) {
            self.select_filter_index(index, now);
            return;
        }
        if self.layout.cell_to_pixel(col, row).is_some() {
            self.last_mouse = Some((col, row));
        }
    }

    /// Pan so the map follows the pointer
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = (last_col as i32 - col as i32) * 2;
            let dy = (last_row as i32 - row as i32) * 4;
            self.pan(dx, dy);
            self.last_mouse = Some((col, row));
        }
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom in towards a terminal cell on the map
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.layout.cell_to_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom out from a terminal cell on the map
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.layout.cell_to_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Back to the whole-scene view
    pub fn reset_view(&mut self) {
        let (width, height) = self.layout.canvas_pixels();
        self.viewport = Viewport::fit(width, height);
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Geographic position under the viewport centre
    pub fn center_coords(&self) -> String {
        let (lon, lat) = self.projection.invert(self.viewport.center);
        format!(
            "{:.1}°{}, {:.1}°{}",
            lat.abs(),
            if lat >= 0.0 { "N" } else { "S" },
            lon.abs(),
            if lon >= 0.0 { "E" } else { "W" }
        )
    }
}
