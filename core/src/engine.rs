use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::drag::{DragSession, DragState, ReleaseOutcome};
use crate::error::EngineError;
use crate::grid::{GridSize, DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SNAP_THRESHOLD};
use crate::layout::{compute_layout, Orientation, PuzzleLayout};
use crate::render::{draw_scene, Scene};
use crate::surface::{SourceImage, Surface};
use crate::tile::{all_snapped, build_tiles, pick_tile, retarget_tiles, Tile};

#[derive(Clone)]
pub struct EngineHooks {
    pub on_snap: Rc<dyn Fn()>,
    pub on_complete: Rc<dyn Fn()>,
    pub on_orientation_change: Rc<dyn Fn(u32, u32)>,
}

impl EngineHooks {
    pub fn empty() -> Self {
        Self {
            on_snap: Rc::new(|| {}),
            on_complete: Rc::new(|| {}),
            on_orientation_change: Rc::new(|_, _| {}),
        }
    }
}

impl Default for EngineHooks {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Clone)]
pub struct EngineOptions {
    pub rows: u32,
    pub cols: u32,
    pub snap_threshold: f32,
    /// Seeds tile scatter and shuffle.
    pub seed: u64,
    pub hooks: EngineHooks,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            seed: 0,
            hooks: EngineHooks::empty(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

pub struct PuzzleEngine<S: Surface> {
    surface: S,
    image: S::Image,
    grid: GridSize,
    snap_threshold: f32,
    hooks: EngineHooks,
    rng: SmallRng,
    lifecycle: Lifecycle,
    orientation: Orientation,
    width: f32,
    height: f32,
    layout: PuzzleLayout,
    tiles: Vec<Tile>,
    drag: DragState,
    show_grid: bool,
    generation: u64,
}

impl<S: Surface> PuzzleEngine<S> {
    pub fn new(surface: S, image: S::Image, options: EngineOptions) -> Result<Self, EngineError> {
        let (width, height) = image.natural_size();
        if width == 0 || height == 0 {
            return Err(EngineError::EmptyImage { width, height });
        }
        let grid = GridSize::new(options.rows, options.cols)?;
        Ok(Self {
            surface,
            image,
            grid,
            snap_threshold: options.snap_threshold,
            hooks: options.hooks,
            rng: SmallRng::seed_from_u64(options.seed),
            lifecycle: Lifecycle::Created,
            orientation: Orientation::Landscape,
            width: 0.0,
            height: 0.0,
            layout: PuzzleLayout::default(),
            tiles: Vec::new(),
            drag: DragState::Idle,
            show_grid: true,
            generation: 0,
        })
    }

    pub fn mount(&mut self, orientation: Orientation) -> Result<(), EngineError> {
        if self.lifecycle != Lifecycle::Created {
            return Err(EngineError::AlreadyMounted);
        }
        self.lifecycle = Lifecycle::Mounted;
        self.resize(orientation);
        Ok(())
    }

    /// Safe to call any number of times, mounted or not.
    pub fn unmount(&mut self) {
        self.lifecycle = Lifecycle::Unmounted;
        self.drag = DragState::Idle;
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn resize(&mut self, orientation: Orientation) {
        if !self.is_mounted() {
            return;
        }
        let (width, height) = self.surface.resize();
        self.width = width;
        self.height = height;
        self.orientation = orientation;
        self.relayout();
    }

    fn relayout(&mut self) {
        let (image_w, image_h) = self.image.natural_size();
        self.layout = compute_layout(self.width, self.height, image_w, image_h, self.orientation);
        if self.tiles.is_empty() {
            self.rebuild_tiles();
        } else {
            retarget_tiles(&mut self.tiles, self.grid, &self.layout);
        }
    }

    fn rebuild_tiles(&mut self) {
        self.show_grid = true;
        self.tiles = build_tiles(self.grid, &self.layout, &mut self.rng);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns `Ok(false)` when the grid is unchanged.
    pub fn update_grid_config(&mut self, rows: u32, cols: u32) -> Result<bool, EngineError> {
        if !self.is_mounted() {
            return Err(EngineError::NotMounted);
        }
        if self.grid.rows == rows && self.grid.cols == cols {
            return Ok(false);
        }
        self.grid = GridSize::new(rows, cols)?;
        self.tiles.clear();
        self.drag = DragState::Idle;
        self.show_grid = true;
        self.relayout();
        (self.hooks.on_orientation_change)(rows, cols);
        Ok(true)
    }

    /// Starts a drag on the topmost loose tile under the point. Ignored while
    /// another drag is live.
    pub fn press_at(&mut self, x: f32, y: f32) -> bool {
        if !self.is_mounted() || self.drag.is_dragging() {
            return false;
        }
        let Some(index) = pick_tile(&self.tiles, x, y) else {
            return false;
        };
        let tile = self.tiles.remove(index);
        self.tiles.push(tile);
        self.drag = DragState::Dragging(DragSession {
            tile: self.tiles.len() - 1,
            offset_x: x - tile.x,
            offset_y: y - tile.y,
        });
        true
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let Some(session) = self.drag.session().copied() else {
            return false;
        };
        let Some(tile) = self.tiles.get_mut(session.tile) else {
            return false;
        };
        let (origin_x, origin_y) = session.origin_for(x, y);
        tile.x = origin_x;
        tile.y = origin_y;
        true
    }

    pub fn release(&mut self) -> ReleaseOutcome {
        if !self.is_mounted() {
            return ReleaseOutcome::Ignored;
        }
        let Some(session) = self.drag.take() else {
            return ReleaseOutcome::Ignored;
        };
        let Some(tile) = self.tiles.get_mut(session.tile) else {
            return ReleaseOutcome::Ignored;
        };
        let distance = tile.distance_to_target();
        let (row, col) = (tile.row, tile.col);
        if distance >= self.snap_threshold {
            return ReleaseOutcome::Dropped { row, col, distance };
        }
        tile.snap_to_target();
        (self.hooks.on_snap)();
        let completed = all_snapped(&self.tiles);
        if completed {
            self.show_grid = false;
            (self.hooks.on_complete)();
        }
        ReleaseOutcome::Snapped {
            row,
            col,
            distance,
            completed,
        }
    }

    /// Draws one frame. Keeps drawing after completion so the finished
    /// picture stays on screen.
    pub fn render_frame(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let scene = Scene {
            width: self.width,
            height: self.height,
            layout: self.layout,
            grid: self.grid,
            tiles: &self.tiles,
            show_grid: self.show_grid,
            drag: self.drag.session(),
            snap_threshold: self.snap_threshold,
        };
        draw_scene(&mut self.surface, &self.image, &scene);
        true
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn layout(&self) -> PuzzleLayout {
        self.layout
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn snap_threshold(&self) -> f32 {
        self.snap_threshold
    }

    pub fn is_complete(&self) -> bool {
        all_snapped(&self.tiles)
    }

    pub fn snapped_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.snapped).count()
    }

    /// Bumped on every full tile rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
