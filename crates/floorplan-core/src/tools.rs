//! Tool selection and the draw/place gesture state.

use crate::plan::OpeningKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Wall,
    Window,
    Door,
}

impl ToolKind {
    /// The interaction mode this tool puts the session in.
    pub fn mode(self) -> Mode {
        match self {
            ToolKind::Wall => Mode::DrawWall,
            ToolKind::Window => Mode::PlaceWindow,
            ToolKind::Door => Mode::PlaceDoor,
        }
    }
}

/// Interaction mode of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    #[default]
    Idle,
    DrawWall,
    PlaceWindow,
    PlaceDoor,
    Editing,
}

impl Mode {
    /// Opening kind placed in this mode, if it is a placement mode.
    pub fn opening_kind(self) -> Option<OpeningKind> {
        match self {
            Mode::PlaceWindow => Some(OpeningKind::Window),
            Mode::PlaceDoor => Some(OpeningKind::Door),
            _ => None,
        }
    }

    /// Whether single-pointer gestures draw a wall or place an opening.
    pub fn is_drawing(self) -> bool {
        matches!(self, Mode::DrawWall | Mode::PlaceWindow | Mode::PlaceDoor)
    }
}

/// State of a draw or place gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Waiting for a pointer to go down.
    #[default]
    Idle,
    /// A segment is being dragged out.
    Active {
        /// Snapped start point.
        start: Point,
        /// Snapped current point, used only for the preview.
        current: Point,
    },
}

impl ToolState {
    pub fn is_active(&self) -> bool {
        matches!(self, ToolState::Active { .. })
    }

    /// The preview segment, if a gesture is in progress.
    pub fn segment(&self) -> Option<(Point, Point)> {
        match *self {
            ToolState::Active { start, current } => Some((start, current)),
            ToolState::Idle => None,
        }
    }
}
