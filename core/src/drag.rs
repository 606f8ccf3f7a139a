/// The grabbed tile and where inside it the pointer took hold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Index into the tile array. The grabbed tile is moved to the end at
    /// grab time and nothing reorders tiles while a drag is live.
    pub tile: usize,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl DragSession {
    pub fn origin_for(&self, pointer_x: f32, pointer_y: f32) -> (f32, f32) {
        (
            (pointer_x - self.offset_x).round(),
            (pointer_y - self.offset_y).round(),
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    pub fn take(&mut self) -> Option<DragSession> {
        match std::mem::take(self) {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReleaseOutcome {
    /// Nothing was being dragged.
    Ignored,
    Dropped {
        row: u32,
        col: u32,
        distance: f32,
    },
    Snapped {
        row: u32,
        col: u32,
        distance: f32,
        completed: bool,
    },
}
