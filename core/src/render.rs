use crate::drag::DragSession;
use crate::geom::Rect;
use crate::grid::GridSize;
use crate::layout::PuzzleLayout;
use crate::surface::{Fill, Shadow, SourceImage, Stroke, Surface};
use crate::tile::{source_crop, Tile};

pub const PUZZLE_BACKGROUND: Fill = Fill {
    color: "#1e293b",
    alpha: 1.0,
    shadow: Some(Shadow {
        color: "rgba(0,0,0,0.4)",
        blur: 14.0,
    }),
};
pub const PUZZLE_FRAME: Stroke = Stroke::solid("#38bdf8", 2.0);
pub const GRID_LINE: Stroke = Stroke::solid("rgba(56, 189, 248, 0.3)", 1.0);
pub const TILE_BORDER: Stroke = Stroke {
    color: "#000",
    width: 1.0,
    alpha: 0.2,
    dash: None,
};
pub const SNAPPED_TINT: Fill = Fill {
    color: "#fff",
    alpha: 0.06,
    shadow: None,
};
pub const TARGET_NEAR: Stroke = Stroke {
    color: "#10b981",
    width: 2.0,
    alpha: 1.0,
    dash: Some([5.0, 5.0]),
};
pub const TARGET_FAR: Stroke = Stroke {
    color: "#ef4444",
    ..TARGET_NEAR
};
pub const TILE_CORNER_RADIUS: f32 = 8.0;

/// Everything one frame needs, borrowed from the engine.
pub struct Scene<'a> {
    pub width: f32,
    pub height: f32,
    pub layout: PuzzleLayout,
    pub grid: GridSize,
    pub tiles: &'a [Tile],
    pub show_grid: bool,
    pub drag: Option<&'a DragSession>,
    pub snap_threshold: f32,
}

pub fn draw_scene<S: Surface>(surface: &mut S, image: &S::Image, scene: &Scene<'_>) {
    surface.clear(scene.width, scene.height);
    draw_board(surface, scene);
    if scene.show_grid {
        draw_grid_lines(surface, scene.layout.puzzle, scene.grid);
    }
    let (image_w, image_h) = image.natural_size();
    for tile in scene.tiles {
        let crop = source_crop(tile.row, tile.col, scene.grid, image_w, image_h);
        surface.draw_image_clipped(image, crop, tile.bounds(), TILE_CORNER_RADIUS);
        if scene.show_grid {
            let inset = Rect::new(tile.x + 0.5, tile.y + 0.5, tile.w - 1.0, tile.h - 1.0);
            surface.stroke_rect(inset, &TILE_BORDER);
        }
        if tile.snapped {
            surface.fill_rect(tile.bounds(), &SNAPPED_TINT);
        }
    }
    if let Some(tile) = scene.drag.and_then(|drag| scene.tiles.get(drag.tile)) {
        let stroke = if tile.distance_to_target() < scene.snap_threshold {
            &TARGET_NEAR
        } else {
            &TARGET_FAR
        };
        surface.stroke_rect(tile.target_bounds(), stroke);
    }
}

fn draw_board<S: Surface>(surface: &mut S, scene: &Scene<'_>) {
    let puzzle = scene.layout.puzzle;
    surface.fill_rect(puzzle, &PUZZLE_BACKGROUND);
    if scene.show_grid {
        surface.stroke_rect(puzzle, &PUZZLE_FRAME);
    }
}

fn draw_grid_lines<S: Surface>(surface: &mut S, puzzle: Rect, grid: GridSize) {
    let cell_w = puzzle.w / grid.cols.max(1) as f32;
    let cell_h = puzzle.h / grid.rows.max(1) as f32;
    for col in 1..grid.cols {
        let x = puzzle.x + col as f32 * cell_w;
        surface.stroke_line([x, puzzle.y], [x, puzzle.bottom()], &GRID_LINE);
    }
    for row in 1..grid.rows {
        let y = puzzle.y + row as f32 * cell_h;
        surface.stroke_line([puzzle.x, y], [puzzle.right(), y], &GRID_LINE);
    }
}
