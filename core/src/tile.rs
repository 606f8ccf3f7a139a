use rand::seq::SliceRandom;
use rand::Rng;

use crate::geom::{distance, Rect};
use crate::grid::GridSize;
use crate::layout::PuzzleLayout;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub snapped: bool,
}

impl Tile {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn target_bounds(&self) -> Rect {
        Rect::new(self.target_x, self.target_y, self.w, self.h)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.bounds().contains(x, y)
    }

    pub fn distance_to_target(&self) -> f32 {
        distance([self.x, self.y], [self.target_x, self.target_y])
    }

    pub(crate) fn snap_to_target(&mut self) {
        self.x = self.target_x;
        self.y = self.target_y;
        self.snapped = true;
    }
}

/// Source-image rectangle for one cell, in natural image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub sx: u32,
    pub sy: u32,
    pub sw: u32,
    pub sh: u32,
}

pub fn source_crop(
    row: u32,
    col: u32,
    grid: GridSize,
    image_width: u32,
    image_height: u32,
) -> CropRect {
    let cols = grid.cols.max(1);
    let rows = grid.rows.max(1);
    CropRect {
        sx: (col as u64 * image_width as u64 / cols as u64) as u32,
        sy: (row as u64 * image_height as u64 / rows as u64) as u32,
        sw: image_width.div_ceil(cols),
        sh: image_height.div_ceil(rows),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CellMetrics {
    cell_w: f32,
    cell_h: f32,
    tile_w: f32,
    tile_h: f32,
}

fn cell_metrics(grid: GridSize, puzzle: Rect) -> CellMetrics {
    let cell_w = puzzle.w / grid.cols.max(1) as f32;
    let cell_h = puzzle.h / grid.rows.max(1) as f32;
    CellMetrics {
        cell_w,
        cell_h,
        tile_w: cell_w.ceil(),
        tile_h: cell_h.ceil(),
    }
}

fn target_for(row: u32, col: u32, puzzle: Rect, metrics: CellMetrics) -> (f32, f32) {
    (
        (puzzle.x + col as f32 * metrics.cell_w).floor(),
        (puzzle.y + row as f32 * metrics.cell_h).floor(),
    )
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, start: f32, extent: f32, size: f32) -> f32 {
    let span = (extent - size).max(0.0);
    (start + rng.random::<f32>() * span).floor()
}

/// Fresh, unsnapped tile set scattered over the pool in shuffled draw order.
pub fn build_tiles<R: Rng + ?Sized>(
    grid: GridSize,
    layout: &PuzzleLayout,
    rng: &mut R,
) -> Vec<Tile> {
    let metrics = cell_metrics(grid, layout.puzzle);
    let pool = layout.pool;
    let mut tiles = Vec::with_capacity(grid.tile_count());
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let (target_x, target_y) = target_for(row, col, layout.puzzle, metrics);
            let x = sample_axis(rng, pool.x, pool.w, metrics.tile_w);
            let y = sample_axis(rng, pool.y, pool.h, metrics.tile_h);
            tiles.push(Tile {
                row,
                col,
                x,
                y,
                w: metrics.tile_w,
                h: metrics.tile_h,
                target_x,
                target_y,
                snapped: false,
            });
        }
    }
    tiles.shuffle(rng);
    tiles
}

/// Follows a new puzzle region without rebuilding. Snapped tiles stay glued
/// to their cell; loose tiles keep their position but pick up the new size.
pub fn retarget_tiles(tiles: &mut [Tile], grid: GridSize, layout: &PuzzleLayout) {
    let metrics = cell_metrics(grid, layout.puzzle);
    for tile in tiles.iter_mut() {
        let (target_x, target_y) = target_for(tile.row, tile.col, layout.puzzle, metrics);
        tile.target_x = target_x;
        tile.target_y = target_y;
        tile.w = metrics.tile_w;
        tile.h = metrics.tile_h;
        if tile.snapped {
            tile.x = target_x;
            tile.y = target_y;
        }
    }
}

/// Topmost unsnapped tile under the point; later entries draw on top.
pub fn pick_tile(tiles: &[Tile], x: f32, y: f32) -> Option<usize> {
    tiles
        .iter()
        .enumerate()
        .rev()
        .find(|(_, tile)| !tile.snapped && tile.contains(x, y))
        .map(|(index, _)| index)
}

pub fn all_snapped(tiles: &[Tile]) -> bool {
    !tiles.is_empty() && tiles.iter().all(|tile| tile.snapped)
}
