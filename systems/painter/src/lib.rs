#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure paint system that turns pointer interactions into board edit commands.
//!
//! The system is independent of any UI toolkit. Adapters translate their own
//! input callbacks into [`PointerEvent`] values and feed them to
//! [`PaintController::handle`] together with the current [`ToolSelection`].

use board_maker_core::{CellCoord, Command, PieceKind, TerrainKind};
use log::debug;

/// Tool state chosen by the user in the editor palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolSelection {
    terrain: TerrainKind,
    piece: Option<PieceKind>,
}

impl ToolSelection {
    /// Creates a selection with explicit field values.
    #[must_use]
    pub const fn new(terrain: TerrainKind, piece: Option<PieceKind>) -> Self {
        Self { terrain, piece }
    }

    /// Selects a terrain brush and leaves piece mode.
    pub fn select_terrain(&mut self, terrain: TerrainKind) {
        self.terrain = terrain;
        self.piece = None;
    }

    /// Selects a piece type, entering piece mode.
    pub fn select_piece(&mut self, piece: PieceKind) {
        self.piece = Some(piece);
    }

    /// Leaves piece mode, keeping the last terrain brush.
    pub fn clear_piece(&mut self) {
        self.piece = None;
    }

    /// Terrain brush used in terrain mode.
    #[must_use]
    pub const fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    /// Selected piece type, if piece mode is active.
    #[must_use]
    pub const fn piece(&self) -> Option<PieceKind> {
        self.piece
    }

    /// Active mode; a selected piece type takes precedence over the terrain brush.
    #[must_use]
    pub const fn mode(&self) -> PaintMode {
        match self.piece {
            Some(kind) => PaintMode::Piece(kind),
            None => PaintMode::Terrain(self.terrain),
        }
    }
}

impl Default for ToolSelection {
    fn default() -> Self {
        Self {
            terrain: TerrainKind::Grass,
            piece: None,
        }
    }
}

/// Mutually exclusive editing modes derived from a [`ToolSelection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintMode {
    /// Pointer edits paint terrain.
    Terrain(TerrainKind),
    /// Pointer edits place a piece.
    Piece(PieceKind),
}

impl PaintMode {
    fn edit_at(self, cell: CellCoord) -> Command {
        match self {
            Self::Terrain(terrain) => Command::SetCell { cell, terrain },
            Self::Piece(kind) => Command::PlacePiece { kind, cell },
        }
    }
}

/// Pointer interactions reported by adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    /// The pointer was pressed over a cell.
    Down(CellCoord),
    /// The pointer moved onto a cell.
    Enter(CellCoord),
    /// The pointer was released, anywhere including outside the grid.
    Up,
    /// A click landed on a cell without an accompanying drag.
    Click(CellCoord),
}

/// Drag state tracked between pointer events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    /// No stroke in progress.
    #[default]
    Idle,
    /// A stroke started and has not been released.
    Dragging,
}

/// Computes the drag state that follows `state` after `event`.
#[must_use]
pub const fn transition(state: DragState, event: PointerEvent) -> DragState {
    match event {
        PointerEvent::Down(_) => DragState::Dragging,
        PointerEvent::Up => DragState::Idle,
        PointerEvent::Enter(_) | PointerEvent::Click(_) => state,
    }
}

/// Paint system that translates pointer events into edit commands.
#[derive(Clone, Debug, Default)]
pub struct PaintController {
    state: DragState,
}

impl PaintController {
    /// Creates a new controller in the idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Current drag state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Consumes a pointer event and emits the resulting edit commands.
    ///
    /// The mode is read from `tools` at every visited cell, so changing the
    /// selection mid-stroke takes effect on the next cell. Entering cells while
    /// dragging only paints in terrain mode; pieces are never drag-placed.
    pub fn handle(&mut self, event: PointerEvent, tools: &ToolSelection, out: &mut Vec<Command>) {
        let previous = self.state;
        self.state = transition(previous, event);
        if previous != self.state {
            debug!("paint stroke {previous:?} -> {:?}", self.state);
        }

        match event {
            PointerEvent::Down(cell) | PointerEvent::Click(cell) => {
                out.push(tools.mode().edit_at(cell));
            }
            PointerEvent::Enter(cell) => {
                if previous != DragState::Dragging {
                    return;
                }
                if let PaintMode::Terrain(terrain) = tools.mode() {
                    out.push(Command::SetCell { cell, terrain });
                }
            }
            PointerEvent::Up => {}
        }
    }
}
