use glam::DVec2;
use std::collections::HashMap;

/// Spatial hash over scene coordinates using conservative approximation.
/// Each item's bounding box is indexed into every cell it overlaps,
/// guaranteeing no false negatives while allowing false positives
/// (eliminated by the exact shape test during hit-testing).
pub struct SceneGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl SceneGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, p: DVec2) -> (i32, i32) {
        let x = (p.x / self.cell_size).floor() as i32;
        let y = (p.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from item bounding boxes `(min, max)`; the item index is its
    /// position in the iterator. Boxes with non-finite corners are skipped.
    pub fn build(bboxes: impl Iterator<Item = (DVec2, DVec2)>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, (min, max)) in bboxes.enumerate() {
            if !(min.is_finite() && max.is_finite()) {
                continue;
            }
            let min_cell = grid.to_cell(min);
            let max_cell = grid.to_cell(max);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Candidate item indices whose boxes may contain `p`
    pub fn query_point(&self, p: DVec2) -> &[usize] {
        if !p.is_finite() {
            return &[];
        }
        self.cells
            .get(&self.to_cell(p))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
