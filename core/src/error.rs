#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("drawing surface has no 2D context")]
    UnsupportedSurface,
    #[error("source image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("grid needs at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u32, cols: u32 },
    #[error("engine is already mounted")]
    AlreadyMounted,
    #[error("engine is not mounted")]
    NotMounted,
}
