//! Plain-text board preview.

use std::fmt::Write as _;

use board_maker_board::{query, Board};
use board_maker_core::TerrainKind;

const fn glyph(terrain: TerrainKind) -> char {
    match terrain {
        TerrainKind::Default => '.',
        TerrainKind::Grass => '"',
        TerrainKind::Water => '~',
        TerrainKind::Mountain => '^',
    }
}

/// Renders one line per row; a piece's letter replaces the terrain glyph beneath it.
pub(crate) fn render(board: &Board) -> String {
    let size = query::size(board);
    let mut grid: Vec<Vec<char>> = query::rows(board)
        .map(|row| row.iter().copied().map(glyph).collect())
        .collect();

    for piece in query::pieces(board) {
        let cell = piece.cell();
        if let Some(slot) = usize::try_from(cell.row())
            .ok()
            .zip(usize::try_from(cell.column()).ok())
            .and_then(|(row, column)| grid.get_mut(row)?.get_mut(column))
        {
            *slot = piece.kind().letter();
        }
    }

    let mut out = String::with_capacity(size.cell_count() + grid.len());
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}

/// Renders the glyph legend shown under previews.
pub(crate) fn legend() -> String {
    let mut out = String::new();
    for terrain in TerrainKind::ALL {
        let _ = write!(out, "{} {terrain}  ", glyph(terrain));
    }
    out.truncate(out.trim_end().len());
    out
}
