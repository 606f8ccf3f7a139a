use std::cell::Cell;
use std::rc::Rc;

use calm_puzzle_core::render::{TARGET_FAR, TARGET_NEAR};
use calm_puzzle_core::{
    CropRect, EngineError, EngineHooks, EngineOptions, Fill, Lifecycle, Orientation,
    PuzzleEngine, Rect, ReleaseOutcome, SourceImage, Stroke, Surface,
};

struct Picture {
    width: u32,
    height: u32,
}

impl SourceImage for Picture {
    fn natural_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, PartialEq)]
enum Op {
    Clear,
    Fill(&'static str),
    Stroke(&'static str),
    Line,
    Image,
}

struct RecordingSurface {
    size: Rc<Cell<(f32, f32)>>,
    ops: Vec<Op>,
}

impl Surface for RecordingSurface {
    type Image = Picture;

    fn resize(&mut self) -> (f32, f32) {
        self.size.get()
    }

    fn clear(&mut self, _width: f32, _height: f32) {
        self.ops.clear();
        self.ops.push(Op::Clear);
    }

    fn fill_rect(&mut self, _rect: Rect, fill: &Fill) {
        self.ops.push(Op::Fill(fill.color));
    }

    fn stroke_rect(&mut self, _rect: Rect, stroke: &Stroke) {
        self.ops.push(Op::Stroke(stroke.color));
    }

    fn stroke_line(&mut self, _from: [f32; 2], _to: [f32; 2], _stroke: &Stroke) {
        self.ops.push(Op::Line);
    }

    fn draw_image_clipped(&mut self, _image: &Picture, _crop: CropRect, _dest: Rect, _radius: f32) {
        self.ops.push(Op::Image);
    }
}

#[derive(Default)]
struct Counters {
    snaps: Rc<Cell<u32>>,
    completions: Rc<Cell<u32>>,
    grid_changes: Rc<Cell<Option<(u32, u32)>>>,
}

impl Counters {
    fn hooks(&self) -> EngineHooks {
        let snaps = Rc::clone(&self.snaps);
        let completions = Rc::clone(&self.completions);
        let grid_changes = Rc::clone(&self.grid_changes);
        EngineHooks {
            on_snap: Rc::new(move || snaps.set(snaps.get() + 1)),
            on_complete: Rc::new(move || completions.set(completions.get() + 1)),
            on_orientation_change: Rc::new(move |rows, cols| grid_changes.set(Some((rows, cols)))),
        }
    }
}

fn mounted_engine(counters: &Counters) -> (PuzzleEngine<RecordingSurface>, Rc<Cell<(f32, f32)>>) {
    let size = Rc::new(Cell::new((1000.0, 800.0)));
    let surface = RecordingSurface {
        size: Rc::clone(&size),
        ops: Vec::new(),
    };
    let image = Picture {
        width: 1920,
        height: 1080,
    };
    let options = EngineOptions {
        seed: 2024,
        hooks: counters.hooks(),
        ..EngineOptions::default()
    };
    let mut engine = PuzzleEngine::new(surface, image, options).unwrap();
    engine.mount(Orientation::Landscape).unwrap();
    (engine, size)
}

/// Grabs the topmost loose tile one pixel inside its corner and returns its
/// index after the grab.
fn grab_topmost(engine: &mut PuzzleEngine<RecordingSurface>) -> usize {
    let tile = *engine
        .tiles()
        .iter()
        .rev()
        .find(|tile| !tile.snapped)
        .expect("a loose tile");
    assert!(engine.press_at(tile.x + 1.0, tile.y + 1.0));
    engine.tiles().len() - 1
}

fn drop_at_offset(engine: &mut PuzzleEngine<RecordingSurface>, dx: f32, dy: f32) -> ReleaseOutcome {
    let index = grab_topmost(engine);
    let tile = engine.tiles()[index];
    assert!(engine.move_to(tile.target_x + dx + 1.0, tile.target_y + dy + 1.0));
    engine.release()
}

#[test]
fn release_within_threshold_snaps_exactly() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);
    assert_eq!(engine.tiles().len(), 30);

    let outcome = drop_at_offset(&mut engine, 10.0, 0.0);
    let tile = *engine.tiles().last().unwrap();
    assert!(matches!(
        outcome,
        ReleaseOutcome::Snapped { distance, completed: false, .. } if distance == 10.0
    ));
    assert!(tile.snapped);
    assert_eq!((tile.x, tile.y), (tile.target_x, tile.target_y));
    assert_eq!(counters.snaps.get(), 1);
    assert!(engine.drag_session().is_none());
}

#[test]
fn release_beyond_threshold_leaves_tile() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);

    let outcome = drop_at_offset(&mut engine, 25.0, 0.0);
    let tile = *engine.tiles().last().unwrap();
    assert!(matches!(outcome, ReleaseOutcome::Dropped { distance, .. } if distance == 25.0));
    assert!(!tile.snapped);
    assert_eq!((tile.x, tile.y), (tile.target_x + 25.0, tile.target_y));
    assert_eq!(counters.snaps.get(), 0);

    let outcome = drop_at_offset(&mut engine, 0.0, 18.0);
    assert!(matches!(outcome, ReleaseOutcome::Dropped { .. }));
}

#[test]
fn completion_fires_once_and_hides_overlay() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);

    let mut last = ReleaseOutcome::Ignored;
    for _ in 0..30 {
        last = drop_at_offset(&mut engine, 0.0, 0.0);
    }
    assert!(matches!(last, ReleaseOutcome::Snapped { completed: true, .. }));
    assert!(engine.is_complete());
    assert_eq!(engine.snapped_count(), 30);
    assert_eq!(counters.snaps.get(), 30);
    assert_eq!(counters.completions.get(), 1);
    assert!(!engine.show_grid());

    let corner = engine.layout().puzzle;
    assert!(!engine.press_at(corner.x + 1.0, corner.y + 1.0));
    assert_eq!(engine.release(), ReleaseOutcome::Ignored);
    assert_eq!(counters.completions.get(), 1);

    assert!(engine.render_frame());
    assert!(!engine.surface().ops.contains(&Op::Line));
}

#[test]
fn stale_input_after_unmount_is_ignored() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);
    grab_topmost(&mut engine);
    let before = engine.tiles().to_vec();

    engine.unmount();
    assert_eq!(engine.lifecycle(), Lifecycle::Unmounted);
    assert!(!engine.move_to(5.0, 5.0));
    assert_eq!(engine.release(), ReleaseOutcome::Ignored);
    assert!(!engine.press_at(before[0].x + 1.0, before[0].y + 1.0));
    assert!(!engine.render_frame());
    assert_eq!(engine.tiles(), before.as_slice());

    engine.unmount();
    assert_eq!(engine.update_grid_config(6, 5), Err(EngineError::NotMounted));
    assert_eq!(engine.mount(Orientation::Landscape), Err(EngineError::AlreadyMounted));
}

#[test]
fn same_grid_update_is_a_no_op() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);
    drop_at_offset(&mut engine, 0.0, 0.0);
    grab_topmost(&mut engine);

    let generation = engine.generation();
    let tiles_ptr = engine.tiles().as_ptr();
    let before = engine.tiles().to_vec();

    assert_eq!(engine.update_grid_config(5, 6), Ok(false));
    assert_eq!(engine.generation(), generation);
    assert_eq!(engine.tiles().as_ptr(), tiles_ptr);
    assert_eq!(engine.tiles(), before.as_slice());
    assert!(engine.drag_session().is_some());
    assert_eq!(counters.grid_changes.get(), None);
}

#[test]
fn changed_grid_rebuilds_tiles() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);
    for _ in 0..30 {
        drop_at_offset(&mut engine, 0.0, 0.0);
    }
    assert!(!engine.show_grid());
    let generation = engine.generation();

    assert_eq!(engine.update_grid_config(6, 5), Ok(true));
    assert_eq!(engine.generation(), generation + 1);
    assert_eq!((engine.grid().rows, engine.grid().cols), (6, 5));
    assert_eq!(engine.tiles().len(), 30);
    assert!(engine.tiles().iter().all(|tile| !tile.snapped));
    assert!(engine.show_grid());
    assert!(!engine.is_complete());
    assert_eq!(counters.grid_changes.get(), Some((6, 5)));

    assert_eq!(
        engine.update_grid_config(0, 5),
        Err(EngineError::EmptyGrid { rows: 0, cols: 5 })
    );
    assert_eq!(engine.tiles().len(), 30);
}

#[test]
fn construction_validates_inputs() {
    let surface = || RecordingSurface {
        size: Rc::new(Cell::new((100.0, 100.0))),
        ops: Vec::new(),
    };
    let empty = PuzzleEngine::new(
        surface(),
        Picture {
            width: 0,
            height: 10,
        },
        EngineOptions::default(),
    );
    assert_eq!(
        empty.err(),
        Some(EngineError::EmptyImage {
            width: 0,
            height: 10
        })
    );

    let no_rows = PuzzleEngine::new(
        surface(),
        Picture {
            width: 10,
            height: 10,
        },
        EngineOptions {
            rows: 0,
            ..EngineOptions::default()
        },
    );
    assert_eq!(no_rows.err(), Some(EngineError::EmptyGrid { rows: 0, cols: 6 }));
}

#[test]
fn input_before_mount_is_ignored() {
    let mut engine = PuzzleEngine::new(
        RecordingSurface {
            size: Rc::new(Cell::new((800.0, 600.0))),
            ops: Vec::new(),
        },
        Picture {
            width: 400,
            height: 300,
        },
        EngineOptions::default(),
    )
    .unwrap();
    assert_eq!(engine.lifecycle(), Lifecycle::Created);
    assert!(engine.tiles().is_empty());
    assert!(!engine.press_at(10.0, 10.0));
    assert!(!engine.render_frame());
    assert_eq!(engine.update_grid_config(2, 2), Err(EngineError::NotMounted));
    engine.unmount();
    assert_eq!(engine.mount(Orientation::Landscape), Err(EngineError::AlreadyMounted));
}

#[test]
fn frame_draws_outline_last_while_dragging() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);
    let index = grab_topmost(&mut engine);
    let tile = engine.tiles()[index];

    assert!(engine.render_frame());
    let ops = &engine.surface().ops;
    assert_eq!(ops.first(), Some(&Op::Clear));
    assert_eq!(ops.iter().filter(|op| **op == Op::Image).count(), 30);
    assert_eq!(ops.iter().filter(|op| **op == Op::Line).count(), 4 + 5);
    assert_eq!(ops.last(), Some(&Op::Stroke(TARGET_FAR.color)));

    assert!(engine.move_to(tile.target_x + 3.0, tile.target_y + 3.0));
    assert!(engine.render_frame());
    assert_eq!(engine.surface().ops.last(), Some(&Op::Stroke(TARGET_NEAR.color)));
}

#[test]
fn resize_retargets_snapped_tiles() {
    let counters = Counters::default();
    let (mut engine, size) = mounted_engine(&counters);
    drop_at_offset(&mut engine, 0.0, 0.0);
    let generation = engine.generation();

    size.set((600.0, 900.0));
    engine.resize(Orientation::Portrait);
    assert_eq!(engine.orientation(), Orientation::Portrait);
    assert_eq!(engine.generation(), generation);
    let puzzle = engine.layout().puzzle;
    assert_eq!(puzzle.w, 588.0);

    let snapped = *engine.tiles().last().unwrap();
    assert!(snapped.snapped);
    assert_eq!((snapped.x, snapped.y), (snapped.target_x, snapped.target_y));
    assert!(puzzle.contains(snapped.target_x, snapped.target_y));
    assert_eq!(snapped.w, (588.0f32 / 6.0).ceil());
}

fn cell_of(engine: &PuzzleEngine<RecordingSurface>, index: usize) -> (u32, u32) {
    let tile = engine.tiles()[index];
    (tile.row, tile.col)
}

/// Drags the tile at `index` by its corner so its origin lands on `(x, y)`,
/// away from the pool and from every target.
fn park(engine: &mut PuzzleEngine<RecordingSurface>, index: usize, x: f32, y: f32) -> (u32, u32) {
    let tile = engine.tiles()[index];
    assert!(engine.press_at(tile.x + 1.0, tile.y + 1.0));
    assert!(engine.move_to(x + 1.0, y + 1.0));
    assert!(matches!(engine.release(), ReleaseOutcome::Dropped { .. }));
    cell_of(engine, engine.tiles().len() - 1)
}

/// Leaves two loose tiles far apart: the first parked sits second from the
/// top, the second parked on top.
fn park_two(engine: &mut PuzzleEngine<RecordingSurface>) -> ((u32, u32), (u32, u32)) {
    let top = engine.tiles().len() - 1;
    let lower = park(engine, top, 3000.0, 3000.0);
    let upper = park(engine, top - 1, 6000.0, 3000.0);
    assert_eq!(cell_of(engine, top - 1), lower);
    (lower, upper)
}

#[test]
fn press_brings_lower_tile_to_front() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);
    let (lower, _) = park_two(&mut engine);
    let count = engine.tiles().len();

    assert!(engine.press_at(3007.0, 3005.0));
    assert_eq!(engine.tiles().len(), count);
    assert_eq!(cell_of(&engine, count - 1), lower);
    let session = *engine.drag_session().unwrap();
    assert_eq!(session.tile, count - 1);
    assert_eq!((session.offset_x, session.offset_y), (7.0, 5.0));

    assert!(engine.move_to(3107.0, 3205.0));
    let tile = engine.tiles()[count - 1];
    assert_eq!((tile.x, tile.y), (3100.0, 3200.0));
}

#[test]
fn second_press_during_drag_is_ignored() {
    let counters = Counters::default();
    let (mut engine, _) = mounted_engine(&counters);
    let (lower, upper) = park_two(&mut engine);

    assert!(engine.press_at(3001.0, 3001.0));
    let session = *engine.drag_session().unwrap();
    let order: Vec<(u32, u32)> = engine.tiles().iter().map(|tile| (tile.row, tile.col)).collect();

    assert!(!engine.press_at(6001.0, 3001.0));
    assert_eq!(engine.drag_session(), Some(&session));
    let after: Vec<(u32, u32)> = engine.tiles().iter().map(|tile| (tile.row, tile.col)).collect();
    assert_eq!(after, order);
    assert_eq!(after[after.len() - 1], lower);
    assert_eq!(after[after.len() - 2], upper);

    assert!(engine.move_to(3101.0, 3001.0));
    let dragged = engine.tiles()[session.tile];
    assert_eq!((dragged.row, dragged.col), lower);
    assert_eq!(dragged.x, 3100.0);
}
