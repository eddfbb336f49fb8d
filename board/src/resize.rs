//! Resize engine that recomputes a board at new dimensions.
//!
//! Cells that exist in both the old and the new grid keep their terrain; cells
//! that only exist in the new grid start as [`TerrainKind::Default`]. Pieces
//! outside the new bounds are discarded and growing never invents pieces.

use std::fmt;

use board_maker_core::{BoardSize, CellCoord, Piece, TerrainKind, MAX_BOARD_EDGE};
use thiserror::Error;

use crate::{pieces::PieceRegistry, Board};

/// Produces a new board of the target size, preserving overlapping content.
///
/// Returns the resized board together with the pieces that were dropped.
#[must_use]
pub fn resize(board: &Board, size: BoardSize) -> (Board, Vec<Piece>) {
    let mut cells = Vec::with_capacity(size.cell_count());
    for row in 0..size.height() {
        for column in 0..size.width() {
            let terrain = board
                .terrain(CellCoord::new(column, row))
                .unwrap_or_default();
            cells.push(terrain);
        }
    }

    let mut pieces: PieceRegistry = board.pieces.clone();
    let dropped = pieces.retain_within(size);

    let resized = Board {
        size,
        cells,
        pieces,
    };
    (resized, dropped)
}

/// Board edge named in a dimension input error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Number of columns.
    Width,
    /// Number of rows.
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => f.write_str("width"),
            Self::Height => f.write_str("height"),
        }
    }
}

/// Reasons free-text dimension input was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DimensionInputError {
    /// The field was empty or whitespace.
    #[error("{axis} must not be empty")]
    Empty {
        /// Edge whose input was empty.
        axis: Axis,
    },
    /// The field did not contain a whole number.
    #[error("{axis} '{input}' is not a whole number")]
    NotANumber {
        /// Edge whose input failed to parse.
        axis: Axis,
        /// Raw text supplied by the user.
        input: String,
    },
    /// The number falls outside `1..=MAX_BOARD_EDGE`.
    #[error("{axis} {value} must be between 1 and {}", MAX_BOARD_EDGE)]
    OutOfRange {
        /// Edge whose value was out of range.
        axis: Axis,
        /// Parsed value.
        value: i64,
    },
}

/// Parses user-entered width and height text into a board size.
///
/// Input is trimmed; anything other than a whole number in
/// `1..=MAX_BOARD_EDGE` is rejected rather than defaulted.
pub fn parse_dimensions(width: &str, height: &str) -> Result<BoardSize, DimensionInputError> {
    let width = parse_edge(Axis::Width, width)?;
    let height = parse_edge(Axis::Height, height)?;
    BoardSize::new(width, height).ok_or(DimensionInputError::OutOfRange {
        axis: Axis::Width,
        value: i64::from(width),
    })
}

fn parse_edge(axis: Axis, input: &str) -> Result<u32, DimensionInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DimensionInputError::Empty { axis });
    }

    let value = trimmed
        .parse::<i64>()
        .map_err(|_| DimensionInputError::NotANumber {
            axis,
            input: input.to_owned(),
        })?;

    match u32::try_from(value) {
        Ok(edge) if (1..=MAX_BOARD_EDGE).contains(&edge) => Ok(edge),
        _ => Err(DimensionInputError::OutOfRange { axis, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{apply, query};
    use board_maker_core::{Command, Event, PieceKind};

    fn size(width: u32, height: u32) -> BoardSize {
        BoardSize::new(width, height).expect("valid size")
    }

    fn painted_board(width: u32, height: u32) -> Board {
        let mut board = Board::new(size(width, height));
        let mut events = Vec::new();
        for row in 0..height {
            for column in 0..width {
                let terrain = TerrainKind::ALL[((column + row) % 4) as usize];
                apply(
                    &mut board,
                    Command::SetCell {
                        cell: CellCoord::new(column, row),
                        terrain,
                    },
                    &mut events,
                );
            }
        }
        board
    }

    fn assert_overlap_preserved(original: &Board, resized: &Board) {
        let old = query::size(original);
        let new = query::size(resized);
        for row in 0..new.height() {
            for column in 0..new.width() {
                let cell = CellCoord::new(column, row);
                let expected = if column < old.width() && row < old.height() {
                    query::terrain_at(original, cell)
                } else {
                    Some(TerrainKind::Default)
                };
                assert_eq!(query::terrain_at(resized, cell), expected, "cell {cell}");
            }
        }
    }

    #[test]
    fn resize_preserves_overlap_in_every_direction() {
        let original = painted_board(5, 4);
        for (width, height) in [(5, 4), (3, 2), (7, 6), (2, 9), (9, 1)] {
            let (resized, _) = resize(&original, size(width, height));
            assert_eq!(query::size(&resized), size(width, height));
            assert_eq!(query::rows(&resized).count(), height as usize);
            assert!(query::rows(&resized).all(|row| row.len() == width as usize));
            assert_overlap_preserved(&original, &resized);
        }
    }

    #[test]
    fn shrinking_drops_pieces_outside_new_bounds() {
        let mut board = Board::default();
        let mut events = Vec::new();
        apply(
            &mut board,
            Command::PlacePiece {
                kind: PieceKind::Knight,
                cell: CellCoord::new(5, 5),
            },
            &mut events,
        );

        let (resized, dropped) = resize(&board, size(4, 4));

        assert!(query::pieces(&resized).is_empty());
        assert_eq!(
            dropped,
            vec![Piece::new(PieceKind::Knight, CellCoord::new(5, 5))]
        );
    }

    #[test]
    fn every_surviving_piece_fits_the_new_bounds() {
        let mut board = Board::new(size(6, 6));
        let mut events = Vec::new();
        for index in 0..6 {
            apply(
                &mut board,
                Command::PlacePiece {
                    kind: PieceKind::ALL[index as usize],
                    cell: CellCoord::new(index, 5 - index),
                },
                &mut events,
            );
        }

        for (width, height) in [(1, 1), (3, 4), (6, 2), (10, 10)] {
            let (resized, _) = resize(&board, size(width, height));
            for piece in query::pieces(&resized) {
                assert!(piece.cell().column() < width);
                assert!(piece.cell().row() < height);
            }
        }
    }

    #[test]
    fn growing_keeps_pieces_and_adds_none() {
        let mut board = Board::new(size(2, 2));
        let mut events = Vec::new();
        apply(
            &mut board,
            Command::PlacePiece {
                kind: PieceKind::Queen,
                cell: CellCoord::new(1, 1),
            },
            &mut events,
        );

        let (resized, dropped) = resize(&board, size(5, 5));

        assert!(dropped.is_empty());
        assert_eq!(query::pieces(&resized), query::pieces(&board));
    }

    #[test]
    fn resize_command_reports_dropped_pieces() {
        let mut board = Board::default();
        let mut events = Vec::new();
        apply(
            &mut board,
            Command::PlacePiece {
                kind: PieceKind::Pawn,
                cell: CellCoord::new(7, 0),
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut board,
            Command::Resize { size: size(4, 8) },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::BoardResized {
                from: size(8, 8),
                to: size(4, 8),
                dropped: vec![Piece::new(PieceKind::Pawn, CellCoord::new(7, 0))],
            }]
        );
        assert_eq!(query::size(&board), size(4, 8));
    }

    #[test]
    fn parse_dimensions_accepts_padded_numbers() {
        assert_eq!(parse_dimensions(" 12 ", "3"), Ok(size(12, 3)));
    }

    #[test]
    fn parse_dimensions_rejects_empty_input() {
        assert_eq!(
            parse_dimensions("", "8"),
            Err(DimensionInputError::Empty { axis: Axis::Width })
        );
        assert_eq!(
            parse_dimensions("8", "   "),
            Err(DimensionInputError::Empty { axis: Axis::Height })
        );
    }

    #[test]
    fn parse_dimensions_rejects_non_numeric_input() {
        assert_eq!(
            parse_dimensions("8", "ten"),
            Err(DimensionInputError::NotANumber {
                axis: Axis::Height,
                input: "ten".to_owned(),
            })
        );
        assert!(parse_dimensions("4.5", "4").is_err());
    }

    #[test]
    fn parse_dimensions_rejects_zero_and_negative_values() {
        assert_eq!(
            parse_dimensions("0", "8"),
            Err(DimensionInputError::OutOfRange {
                axis: Axis::Width,
                value: 0,
            })
        );
        assert_eq!(
            parse_dimensions("8", "-3"),
            Err(DimensionInputError::OutOfRange {
                axis: Axis::Height,
                value: -3,
            })
        );
        assert!(parse_dimensions("8", "257").is_err());
    }
}
