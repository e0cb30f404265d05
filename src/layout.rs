//! Grid layout planning: the image-count to grid-shape policy.
//!
//! The poster canvas is partitioned into a fixed grid chosen solely from
//! the number of sampled images. The mapping is a policy table, not a
//! computation: small counts get shapes that read well on a portrait
//! poster (a pair side by side, a strip of three), larger counts settle
//! into the densest supported grid, 3×3.
//!
//! Cell geometry uses integer division; remainder pixels along the right
//! and bottom edges stay background. At poster resolution the sliver is
//! invisible and redistributing it would misalign cell seams.

/// A fixed (rows, cols) partition of the poster canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    /// Number of cells in the grid.
    pub fn capacity(self) -> usize {
        (self.rows * self.cols) as usize
    }

    /// Row-major cell coordinates for placement index `i`:
    /// left-to-right, top-to-bottom.
    pub fn cell(self, index: usize) -> (u32, u32) {
        let i = index as u32;
        (i / self.cols, i % self.cols)
    }

    /// Pixel size of one cell on a canvas of the given dimensions.
    ///
    /// Integer division: remainder pixels at the right/bottom edge are
    /// left unused by design.
    pub fn cell_size(self, canvas_width: u32, canvas_height: u32) -> (u32, u32) {
        (canvas_width / self.cols, canvas_height / self.rows)
    }
}

/// Grid shape for a sample of `count` images.
///
/// Deterministic and total for `count ≥ 1`. Counts above 9 still map to
/// 3×3; callers cap the sample size upstream, and any excess placements
/// simply never land on the canvas. `count == 0` is a caller precondition
/// violation; an empty sample means the group is skipped long before
/// layout runs.
pub fn grid_shape(count: usize) -> GridShape {
    debug_assert!(count >= 1, "grid_shape requires at least one image");
    let (rows, cols) = match count {
        1 => (1, 1),
        2 => (1, 2),
        3 => (1, 3),
        4 => (2, 2),
        5 | 6 => (2, 3),
        // 7 and 8 leave trailing blank cells, accepted.
        _ => (3, 3),
    };
    GridShape { rows, cols }
}
