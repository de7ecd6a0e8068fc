//! Uniform grid geometry shared by the egui and plotters renderers.

/// Axis-aligned rectangle in pixels: (left, top, right, bottom).
pub type CellRect = (f32, f32, f32, f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub left: f32,
    pub top: f32,
    pub cell_w: f32,
    pub cell_h: f32,
    pub cols: usize,
    pub rows: usize,
    /// Inset applied on every side of a cell.
    pub gap: f32,
}

impl GridLayout {
    /// Split `width` x `height` starting at (`left`, `top`) into equal cells.
    pub fn fit(left: f32, top: f32, width: f32, height: f32, cols: usize, rows: usize) -> Self {
        let cell_w = if cols == 0 { 0.0 } else { width.max(0.0) / cols as f32 };
        let cell_h = if rows == 0 { 0.0 } else { height.max(0.0) / rows as f32 };
        Self {
            left,
            top,
            cell_w,
            cell_h,
            cols,
            rows,
            gap: 0.0,
        }
    }

    /// Same grid with square cells, centered horizontally in the original width.
    pub fn squared(self) -> Self {
        let side = self.cell_w.min(self.cell_h);
        let spare = (self.cell_w - side) * self.cols as f32;
        Self {
            left: self.left + spare / 2.0,
            cell_w: side,
            cell_h: side,
            ..self
        }
    }

    pub fn with_gap(self, gap: f32) -> Self {
        Self { gap, ..self }
    }

    pub fn height(&self) -> f32 {
        self.cell_h * self.rows as f32
    }

    pub fn cell_rect(&self, col: usize, row: usize) -> CellRect {
        let x0 = self.left + col as f32 * self.cell_w;
        let y0 = self.top + row as f32 * self.cell_h;
        (
            x0 + self.gap,
            y0 + self.gap,
            x0 + self.cell_w - self.gap,
            y0 + self.cell_h - self.gap,
        )
    }

    pub fn cell_center(&self, col: usize, row: usize) -> (f32, f32) {
        (
            self.left + (col as f32 + 0.5) * self.cell_w,
            self.top + (row as f32 + 0.5) * self.cell_h,
        )
    }

    /// Cell under a point, if any.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if self.cell_w <= 0.0 || self.cell_h <= 0.0 || x < self.left || y < self.top {
            return None;
        }
        let col = ((x - self.left) / self.cell_w) as usize;
        let row = ((y - self.top) / self.cell_h) as usize;
        (col < self.cols && row < self.rows).then_some((col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_divides_evenly() {
        let grid = GridLayout::fit(10.0, 20.0, 100.0, 50.0, 4, 5);
        assert_eq!(grid.cell_w, 25.0);
        assert_eq!(grid.cell_h, 10.0);
        assert_eq!(grid.cell_rect(1, 2), (35.0, 40.0, 60.0, 50.0));
        assert_eq!(grid.cell_center(0, 0), (22.5, 25.0));
    }

    #[test]
    fn hit_testing() {
        let grid = GridLayout::fit(0.0, 0.0, 100.0, 100.0, 10, 10);
        assert_eq!(grid.cell_at(5.0, 5.0), Some((0, 0)));
        assert_eq!(grid.cell_at(99.0, 31.0), Some((9, 3)));
        assert_eq!(grid.cell_at(100.0, 10.0), None);
        assert_eq!(grid.cell_at(-1.0, 10.0), None);
    }

    #[test]
    fn squared_cells_are_centered() {
        let grid = GridLayout::fit(0.0, 0.0, 200.0, 50.0, 4, 2).squared();
        assert_eq!(grid.cell_w, 25.0);
        assert_eq!(grid.cell_h, 25.0);
        assert_eq!(grid.left, 50.0);
        assert_eq!(grid.cell_rect(3, 1), (125.0, 25.0, 150.0, 50.0));
    }

    #[test]
    fn gap_insets_cells() {
        let grid = GridLayout::fit(0.0, 0.0, 20.0, 20.0, 2, 2).with_gap(1.0);
        assert_eq!(grid.cell_rect(1, 1), (11.0, 11.0, 19.0, 19.0));
    }

    #[test]
    fn empty_grid_has_no_cells() {
        let grid = GridLayout::fit(0.0, 0.0, 100.0, 100.0, 0, 0);
        assert_eq!(grid.cell_at(1.0, 1.0), None);
    }
}
