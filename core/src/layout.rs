use crate::geom::Rect;

pub const PORTRAIT_WIDTH_FRAC: f32 = 0.98;
pub const PORTRAIT_TOP_SPACE: f32 = 0.0;
pub const PORTRAIT_POOL_GAP: f32 = 6.0;
pub const PORTRAIT_POOL_MARGIN: f32 = 2.0;
pub const PORTRAIT_POOL_BOTTOM_PAD: f32 = 10.0;
pub const PORTRAIT_POOL_MIN_H: f32 = 50.0;
pub const PORTRAIT_POOL_MAX_H: f32 = 80.0;

pub const LANDSCAPE_WIDTH_FRAC: f32 = 0.8;
pub const LANDSCAPE_TOP_SPACE: f32 = 60.0;
pub const LANDSCAPE_BOTTOM_SPACE: f32 = 120.0;
pub const LANDSCAPE_POOL_GAP: f32 = 12.0;
pub const LANDSCAPE_POOL_MARGIN: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Square viewports count as portrait.
    pub fn from_viewport(width: f32, height: f32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

/// Where the assembled picture lives and where loose tiles wait.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PuzzleLayout {
    pub puzzle: Rect,
    pub pool: Rect,
}

struct RegionPolicy {
    width_frac: f32,
    top_space: f32,
    vertical_budget: f32,
}

fn region_policy(height: f32, orientation: Orientation) -> RegionPolicy {
    match orientation {
        Orientation::Portrait => RegionPolicy {
            width_frac: PORTRAIT_WIDTH_FRAC,
            top_space: PORTRAIT_TOP_SPACE,
            vertical_budget: height
                - PORTRAIT_TOP_SPACE
                - PORTRAIT_POOL_GAP
                - PORTRAIT_POOL_MIN_H
                - PORTRAIT_POOL_BOTTOM_PAD,
        },
        Orientation::Landscape => RegionPolicy {
            width_frac: LANDSCAPE_WIDTH_FRAC,
            top_space: LANDSCAPE_TOP_SPACE,
            vertical_budget: height - LANDSCAPE_TOP_SPACE - LANDSCAPE_BOTTOM_SPACE,
        },
    }
}

fn puzzle_region(
    width: f32,
    height: f32,
    image_width: u32,
    image_height: u32,
    orientation: Orientation,
) -> Rect {
    let policy = region_policy(height, orientation);
    let image_w = image_width.max(1) as f32;
    let image_h = image_height.max(1) as f32;
    let budget = policy.vertical_budget.floor().max(0.0);
    let mut pw = (width * policy.width_frac).floor().max(0.0);
    let mut ph = (pw * image_h / image_w).floor();
    if ph > budget {
        ph = budget;
        pw = (ph * image_w / image_h).floor();
    }
    let px = ((width - pw) / 2.0).floor();
    Rect::new(px, policy.top_space, pw, ph)
}

fn pool_region(width: f32, height: f32, puzzle: Rect, orientation: Orientation) -> Rect {
    match orientation {
        Orientation::Portrait => {
            let pool_y = puzzle.bottom() + PORTRAIT_POOL_GAP;
            let pool_h = (height - pool_y - PORTRAIT_POOL_BOTTOM_PAD)
                .max(PORTRAIT_POOL_MIN_H)
                .min(PORTRAIT_POOL_MAX_H);
            Rect::new(
                PORTRAIT_POOL_MARGIN,
                pool_y,
                (width - PORTRAIT_POOL_MARGIN * 2.0).max(0.0),
                pool_h,
            )
        }
        Orientation::Landscape => {
            let pool_y = puzzle.bottom() + LANDSCAPE_POOL_GAP;
            let pool_h = (height - pool_y - LANDSCAPE_POOL_MARGIN).max(0.0);
            Rect::new(
                LANDSCAPE_POOL_MARGIN,
                pool_y,
                (width - LANDSCAPE_POOL_MARGIN * 2.0).max(0.0),
                pool_h,
            )
        }
    }
}

/// Largest puzzle region that keeps the image aspect ratio inside the chrome
/// reserved for `orientation`, with the pool strip below it.
pub fn compute_layout(
    width: f32,
    height: f32,
    image_width: u32,
    image_height: u32,
    orientation: Orientation,
) -> PuzzleLayout {
    let width = width.max(0.0);
    let height = height.max(0.0);
    let puzzle = puzzle_region(width, height, image_width, image_height, orientation);
    let pool = pool_region(width, height, puzzle, orientation);
    PuzzleLayout { puzzle, pool }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: (u32, u32) = (1920, 1080);
    const TALL: (u32, u32) = (1440, 1920);

    #[test]
    fn landscape_width_constrained() {
        let layout = compute_layout(1000.0, 1000.0, HD.0, HD.1, Orientation::Landscape);
        assert_eq!(layout.puzzle, Rect::new(100.0, 60.0, 800.0, 450.0));
        assert_eq!(layout.pool.y, 60.0 + 450.0 + 12.0);
        assert_eq!(layout.pool.x, 8.0);
        assert_eq!(layout.pool.w, 984.0);
        assert_eq!(layout.pool.h, 1000.0 - 522.0 - 8.0);
    }

    #[test]
    fn landscape_falls_back_to_height() {
        let layout = compute_layout(1280.0, 600.0, HD.0, HD.1, Orientation::Landscape);
        assert_eq!(layout.puzzle.h, 420.0);
        assert_eq!(layout.puzzle.w, (420.0f32 * 1920.0 / 1080.0).floor());
        let centered_left = ((1280.0 - layout.puzzle.w) / 2.0).floor();
        assert_eq!(layout.puzzle.x, centered_left);
    }

    #[test]
    fn portrait_pool_strip_is_clamped() {
        let layout = compute_layout(400.0, 900.0, TALL.0, TALL.1, Orientation::Portrait);
        assert_eq!(layout.puzzle.w, 392.0);
        assert_eq!(layout.puzzle.y, 0.0);
        assert_eq!(layout.pool.h, PORTRAIT_POOL_MAX_H);
        assert_eq!(layout.pool.y, layout.puzzle.bottom() + PORTRAIT_POOL_GAP);

        let short = compute_layout(400.0, 560.0, TALL.0, TALL.1, Orientation::Portrait);
        assert!(short.pool.h >= PORTRAIT_POOL_MIN_H);
        assert!(short.pool.bottom() <= 560.0);
    }

    #[test]
    fn regions_never_overlap() {
        let sizes = [
            (1920.0, 1080.0),
            (1280.0, 600.0),
            (390.0, 844.0),
            (320.0, 480.0),
            (800.0, 800.0),
        ];
        for (w, h) in sizes {
            for orientation in [Orientation::Landscape, Orientation::Portrait] {
                for image in [HD, TALL] {
                    let layout = compute_layout(w, h, image.0, image.1, orientation);
                    assert!(
                        !layout.puzzle.intersects(&layout.pool),
                        "overlap at {w}x{h} {orientation:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn aspect_ratio_follows_image() {
        let layout = compute_layout(1600.0, 900.0, HD.0, HD.1, Orientation::Landscape);
        let expected = 1920.0 / 1080.0;
        assert!((layout.puzzle.w / layout.puzzle.h - expected).abs() < 0.01);
    }

    #[test]
    fn layout_is_idempotent() {
        let a = compute_layout(1024.0, 768.0, HD.0, HD.1, Orientation::Landscape);
        let b = compute_layout(1024.0, 768.0, HD.0, HD.1, Orientation::Landscape);
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_surface_has_no_negative_sizes() {
        let layout = compute_layout(10.0, 10.0, HD.0, HD.1, Orientation::Landscape);
        assert!(layout.puzzle.w >= 0.0 && layout.puzzle.h >= 0.0);
        assert!(layout.pool.w >= 0.0 && layout.pool.h >= 0.0);
    }
}
