pub mod drag;
pub mod engine;
pub mod error;
pub mod geom;
pub mod grid;
pub mod layout;
pub mod manifest;
pub mod phrases;
pub mod preload;
pub mod render;
pub mod settings;
pub mod surface;
pub mod tile;

pub use drag::{DragSession, DragState, ReleaseOutcome};
pub use engine::{EngineHooks, EngineOptions, Lifecycle, PuzzleEngine};
pub use error::EngineError;
pub use geom::Rect;
pub use grid::{
    grid_label, puzzle_config_for, puzzle_config_for_viewport, GridSize, PuzzleConfig,
    DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SNAP_THRESHOLD,
};
pub use layout::{compute_layout, Orientation, PuzzleLayout};
pub use manifest::{pick_next_image, AudioManifest, ImageManifest, ManifestError};
pub use phrases::{PhrasePicker, FALLBACK_PHRASE};
pub use preload::{PreloadPhase, PreloadPlan, PreloadProgress};
pub use settings::Settings;
pub use surface::{Fill, Shadow, SourceImage, Stroke, Surface};
pub use tile::{CropRect, Tile};
