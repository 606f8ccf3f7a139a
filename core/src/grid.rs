use crate::error::EngineError;
use crate::layout::Orientation;

pub const DEFAULT_ROWS: u32 = 5;
pub const DEFAULT_COLS: u32 = 6;
pub const DEFAULT_SNAP_THRESHOLD: f32 = 18.0;

pub const LANDSCAPE_IMAGE_FOLDER: &str = "1920x1080";
pub const PORTRAIT_IMAGE_FOLDER: &str = "1440x1920";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub fn new(rows: u32, cols: u32) -> Result<Self, EngineError> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::EmptyGrid { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

/// What the host needs to start a puzzle for one orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    pub rows: u32,
    pub cols: u32,
    pub image_folder: &'static str,
}

impl PuzzleConfig {
    pub fn grid(&self) -> GridSize {
        GridSize {
            rows: self.rows,
            cols: self.cols,
        }
    }
}

pub fn puzzle_config_for(orientation: Orientation) -> PuzzleConfig {
    match orientation {
        Orientation::Landscape => PuzzleConfig {
            rows: 5,
            cols: 6,
            image_folder: LANDSCAPE_IMAGE_FOLDER,
        },
        Orientation::Portrait => PuzzleConfig {
            rows: 6,
            cols: 5,
            image_folder: PORTRAIT_IMAGE_FOLDER,
        },
    }
}

pub fn puzzle_config_for_viewport(width: f32, height: f32) -> PuzzleConfig {
    puzzle_config_for(Orientation::from_viewport(width, height))
}

pub fn grid_label(grid: GridSize) -> String {
    format!("{} pieces ({}x{})", grid.tile_count(), grid.cols, grid.rows)
}
