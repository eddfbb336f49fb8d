#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Board Maker.
//!
//! The [`Board`] owns the terrain grid and the set of placed pieces. Every edit
//! flows through [`apply`], which mutates the board and reports the outcome as
//! [`Event`] values. Read access goes through the [`query`] module.

mod pieces;
pub mod resize;

use board_maker_core::{
    BoardSize, CellCoord, Command, EditRejection, Event, Piece, PieceKind, TerrainKind,
};
use log::debug;
use thiserror::Error;

use crate::pieces::PieceRegistry;

/// Represents the authoritative state of one level under edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    cells: Vec<TerrainKind>,
    pieces: PieceRegistry,
}

impl Board {
    /// Creates a board of the given size with default terrain and no pieces.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![TerrainKind::Default; size.cell_count()],
            pieces: PieceRegistry::new(),
        }
    }

    /// Assembles a board from terrain rows and pieces, validating every invariant.
    ///
    /// Pieces sharing a coordinate collapse so that the last one wins.
    pub fn from_parts(
        size: BoardSize,
        rows: Vec<Vec<TerrainKind>>,
        pieces: impl IntoIterator<Item = Piece>,
    ) -> Result<Self, BoardShapeError> {
        let expected_rows = usize_from(size.height());
        if rows.len() != expected_rows {
            return Err(BoardShapeError::RowCount {
                expected: expected_rows,
                actual: rows.len(),
            });
        }

        let width = usize_from(size.width());
        let mut cells = Vec::with_capacity(size.cell_count());
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(BoardShapeError::RowLength {
                    row: index,
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }

        let mut registry = PieceRegistry::new();
        for piece in pieces {
            if !size.contains(piece.cell()) {
                return Err(BoardShapeError::PieceOutOfBounds { piece });
            }
            let _ = registry.place(piece);
        }

        Ok(Self {
            size,
            cells,
            pieces: registry,
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.size.contains(cell) {
            let row = usize_from(cell.row());
            let column = usize_from(cell.column());
            Some(row * usize_from(self.size.width()) + column)
        } else {
            None
        }
    }

    fn terrain(&self, cell: CellCoord) -> Option<TerrainKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardSize::default())
    }
}

/// Reasons a board could not be assembled from raw parts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardShapeError {
    /// The number of terrain rows disagrees with the board height.
    #[error("expected {expected} terrain rows but found {actual}")]
    RowCount {
        /// Row count implied by the board height.
        expected: usize,
        /// Row count actually supplied.
        actual: usize,
    },
    /// A terrain row disagrees with the board width.
    #[error("terrain row {row} has {actual} cells but the board is {expected} wide")]
    RowLength {
        /// Zero-based index of the offending row.
        row: usize,
        /// Cell count implied by the board width.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },
    /// A piece lies outside the board.
    #[error("{} piece at {} lies outside the board", .piece.kind(), .piece.cell())]
    PieceOutOfBounds {
        /// Offending piece.
        piece: Piece,
    },
}

/// Applies the provided command to the board, reporting the outcome as events.
pub fn apply(board: &mut Board, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetCell { cell, terrain } => match board.index(cell) {
            Some(index) => {
                board.cells[index] = terrain;
                debug!("painted {cell} with {terrain}");
                out_events.push(Event::CellPainted { cell, terrain });
            }
            None => {
                debug!("rejected paint outside the board at {cell}");
                out_events.push(Event::CellPaintRejected {
                    cell,
                    terrain,
                    reason: EditRejection::OutOfBounds,
                });
            }
        },
        Command::FillAll { terrain } => {
            board.cells.fill(terrain);
            debug!("filled {} board with {terrain}", board.size);
            out_events.push(Event::BoardFilled { terrain });
        }
        Command::PlacePiece { kind, cell } => {
            if !board.size.contains(cell) {
                debug!("rejected {kind} placement outside the board at {cell}");
                out_events.push(Event::PiecePlacementRejected {
                    kind,
                    cell,
                    reason: EditRejection::OutOfBounds,
                });
                return;
            }
            let piece = Piece::new(kind, cell);
            let replaced = board.pieces.place(piece);
            debug!("placed {kind} at {cell}");
            out_events.push(Event::PiecePlaced { piece, replaced });
        }
        Command::Resize { size } => {
            let from = board.size;
            let (resized, dropped) = resize::resize(board, size);
            *board = resized;
            debug!(
                "resized board from {from} to {size}, dropping {} pieces",
                dropped.len()
            );
            out_events.push(Event::BoardResized {
                from,
                to: size,
                dropped,
            });
        }
    }
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use board_maker_core::{BoardSize, CellCoord, Piece, PieceKind, TerrainKind};

    use super::Board;

    /// Current board dimensions.
    #[must_use]
    pub fn size(board: &Board) -> BoardSize {
        board.size
    }

    /// Terrain held by the cell, or `None` outside the board.
    #[must_use]
    pub fn terrain_at(board: &Board, cell: CellCoord) -> Option<TerrainKind> {
        board.terrain(cell)
    }

    /// Kind of piece occupying the cell, or `None` when the cell is empty.
    #[must_use]
    pub fn piece_at(board: &Board, cell: CellCoord) -> Option<PieceKind> {
        board.pieces.kind_at(cell)
    }

    /// Placed pieces in placement order.
    #[must_use]
    pub fn pieces(board: &Board) -> Vec<Piece> {
        board.pieces.iter().collect()
    }

    /// Iterator over terrain rows from top to bottom.
    pub fn rows(board: &Board) -> impl Iterator<Item = &[TerrainKind]> {
        board.cells.chunks(super::usize_from(board.size.width()))
    }

    /// Owned copy of the terrain grid in row-major order.
    #[must_use]
    pub fn terrain_rows(board: &Board) -> Vec<Vec<TerrainKind>> {
        rows(board).map(<[TerrainKind]>::to_vec).collect()
    }
}

// Edges never exceed `MAX_BOARD_EDGE`.
fn usize_from(value: u32) -> usize {
    value as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32) -> BoardSize {
        BoardSize::new(width, height).expect("valid size")
    }

    #[test]
    fn new_board_is_default_terrain_without_pieces() {
        let board = Board::default();
        assert_eq!(query::size(&board), size(8, 8));
        assert!(query::pieces(&board).is_empty());
        for row in query::rows(&board) {
            assert_eq!(row.len(), 8);
            assert!(row.iter().all(|cell| *cell == TerrainKind::Default));
        }
        assert_eq!(query::rows(&board).count(), 8);
    }

    #[test]
    fn set_cell_paints_exactly_one_cell() {
        let mut board = Board::new(size(3, 2));
        let mut events = Vec::new();
        let cell = CellCoord::new(2, 1);

        apply(
            &mut board,
            Command::SetCell {
                cell,
                terrain: TerrainKind::Water,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::CellPainted {
                cell,
                terrain: TerrainKind::Water
            }]
        );
        assert_eq!(
            query::terrain_rows(&board),
            vec![
                vec![TerrainKind::Default; 3],
                vec![TerrainKind::Default, TerrainKind::Default, TerrainKind::Water],
            ]
        );
    }

    #[test]
    fn set_cell_out_of_bounds_is_rejected() {
        let mut board = Board::new(size(2, 2));
        let before = board.clone();
        let mut events = Vec::new();

        apply(
            &mut board,
            Command::SetCell {
                cell: CellCoord::new(2, 0),
                terrain: TerrainKind::Grass,
            },
            &mut events,
        );

        assert_eq!(board, before);
        assert_eq!(
            events,
            vec![Event::CellPaintRejected {
                cell: CellCoord::new(2, 0),
                terrain: TerrainKind::Grass,
                reason: EditRejection::OutOfBounds,
            }]
        );
    }

    #[test]
    fn fill_all_keeps_dimensions() {
        let mut board = Board::new(size(5, 3));
        let mut events = Vec::new();

        apply(
            &mut board,
            Command::FillAll {
                terrain: TerrainKind::Mountain,
            },
            &mut events,
        );

        assert_eq!(query::size(&board), size(5, 3));
        assert!(query::rows(&board).flatten().all(|cell| *cell == TerrainKind::Mountain));
    }

    #[test]
    fn repeated_identical_placement_is_idempotent() {
        let mut board = Board::default();
        let mut events = Vec::new();
        let cell = CellCoord::new(4, 4);

        for _ in 0..3 {
            apply(
                &mut board,
                Command::PlacePiece {
                    kind: PieceKind::Rook,
                    cell,
                },
                &mut events,
            );
        }

        assert_eq!(query::pieces(&board), &[Piece::new(PieceKind::Rook, cell)]);
    }

    #[test]
    fn placement_with_different_kind_replaces_occupant() {
        let mut board = Board::default();
        let mut events = Vec::new();
        let cell = CellCoord::new(1, 2);

        apply(
            &mut board,
            Command::PlacePiece {
                kind: PieceKind::Pawn,
                cell,
            },
            &mut events,
        );
        apply(
            &mut board,
            Command::PlacePiece {
                kind: PieceKind::Bishop,
                cell,
            },
            &mut events,
        );

        let at_cell = query::pieces(&board)
            .iter()
            .filter(|piece| piece.cell() == cell)
            .count();
        assert_eq!(at_cell, 1);
        assert_eq!(query::piece_at(&board, cell), Some(PieceKind::Bishop));
        assert_eq!(
            events.last(),
            Some(&Event::PiecePlaced {
                piece: Piece::new(PieceKind::Bishop, cell),
                replaced: Some(PieceKind::Pawn),
            })
        );
    }

    #[test]
    fn placement_out_of_bounds_is_rejected() {
        let mut board = Board::new(size(2, 2));
        let mut events = Vec::new();

        apply(
            &mut board,
            Command::PlacePiece {
                kind: PieceKind::King,
                cell: CellCoord::new(0, 2),
            },
            &mut events,
        );

        assert!(query::pieces(&board).is_empty());
        assert!(matches!(
            events.as_slice(),
            [Event::PiecePlacementRejected {
                reason: EditRejection::OutOfBounds,
                ..
            }]
        ));
    }

    #[test]
    fn piece_at_reports_none_for_empty_cells() {
        let board = Board::default();
        assert_eq!(query::piece_at(&board, CellCoord::new(0, 0)), None);
        assert_eq!(query::terrain_at(&board, CellCoord::new(8, 0)), None);
    }

    #[test]
    fn from_parts_rejects_ragged_rows() {
        let rows = vec![
            vec![TerrainKind::Grass, TerrainKind::Grass],
            vec![TerrainKind::Grass],
        ];
        let error = Board::from_parts(size(2, 2), rows, []).expect_err("ragged rows");
        assert_eq!(
            error,
            BoardShapeError::RowLength {
                row: 1,
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn from_parts_rejects_pieces_outside_the_grid() {
        let rows = vec![vec![TerrainKind::Default; 2]; 2];
        let piece = Piece::new(PieceKind::Pawn, CellCoord::new(2, 0));
        let error = Board::from_parts(size(2, 2), rows, [piece]).expect_err("out of bounds");
        assert_eq!(error, BoardShapeError::PieceOutOfBounds { piece });
    }

    #[test]
    fn from_parts_collapses_duplicate_coordinates() {
        let rows = vec![vec![TerrainKind::Default; 3]; 3];
        let cell = CellCoord::new(1, 1);
        let board = Board::from_parts(
            size(3, 3),
            rows,
            [
                Piece::new(PieceKind::Pawn, cell),
                Piece::new(PieceKind::Queen, cell),
            ],
        )
        .expect("valid parts");
        assert_eq!(query::pieces(&board), &[Piece::new(PieceKind::Queen, cell)]);
    }

    #[test]
    fn from_parts_handles_a_piece_on_every_cell_of_the_largest_board() {
        let edge = board_maker_core::MAX_BOARD_EDGE;
        let rows = vec![vec![TerrainKind::Grass; edge as usize]; edge as usize];
        let pieces = (0..edge).flat_map(|row| {
            (0..edge).map(move |column| Piece::new(PieceKind::Pawn, CellCoord::new(column, row)))
        });

        let started = std::time::Instant::now();
        let board = Board::from_parts(size(edge, edge), rows, pieces).expect("valid parts");
        let elapsed = started.elapsed();

        assert_eq!(query::pieces(&board).len(), (edge * edge) as usize);
        assert_eq!(
            query::piece_at(&board, CellCoord::new(edge - 1, edge - 1)),
            Some(PieceKind::Pawn)
        );
        assert!(
            elapsed < std::time::Duration::from_secs(5),
            "assembling a full board took {elapsed:?}"
        );
    }
}
