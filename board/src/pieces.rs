//! Authoritative piece state management utilities.

use std::collections::BTreeMap;

use board_maker_core::{BoardSize, CellCoord, Piece, PieceKind};

/// Registry that stores placed pieces and enforces one piece per cell.
///
/// Pieces are kept in placement order. Replacing an occupant removes it and
/// appends the newcomer, so the most recent placement always sorts last.
#[derive(Clone, Debug, Default)]
pub(crate) struct PieceRegistry {
    entries: BTreeMap<u64, Piece>,
    occupancy: BTreeMap<CellCoord, u64>,
    next_sequence: u64,
}

impl PieceRegistry {
    /// Creates an empty piece registry.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            occupancy: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    /// Places the piece, returning the kind of any occupant it replaced.
    pub(crate) fn place(&mut self, piece: Piece) -> Option<PieceKind> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let replaced = self
            .occupancy
            .insert(piece.cell(), sequence)
            .and_then(|previous| self.entries.remove(&previous))
            .map(|previous| previous.kind());
        let _ = self.entries.insert(sequence, piece);
        replaced
    }

    /// Returns the kind of piece occupying the cell, if any.
    pub(crate) fn kind_at(&self, cell: CellCoord) -> Option<PieceKind> {
        self.occupancy
            .get(&cell)
            .and_then(|sequence| self.entries.get(sequence))
            .map(Piece::kind)
    }

    /// Removes every piece outside the provided bounds, returning the removed pieces.
    pub(crate) fn retain_within(&mut self, size: BoardSize) -> Vec<Piece> {
        let mut dropped = Vec::new();
        self.entries.retain(|_, piece| {
            let inside = size.contains(piece.cell());
            if !inside {
                dropped.push(*piece);
            }
            inside
        });
        self.occupancy.retain(|cell, _| size.contains(*cell));
        dropped
    }

    /// Pieces in placement order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.entries.values().copied()
    }
}

impl PartialEq for PieceRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.iter().eq(other.iter())
    }
}

impl Eq for PieceRegistry {}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(kind: PieceKind, column: u32, row: u32) -> Piece {
        Piece::new(kind, CellCoord::new(column, row))
    }

    fn pieces(registry: &PieceRegistry) -> Vec<Piece> {
        registry.iter().collect()
    }

    #[test]
    fn registry_starts_empty() {
        let registry = PieceRegistry::new();
        assert!(pieces(&registry).is_empty());
        assert_eq!(registry.kind_at(CellCoord::new(0, 0)), None);
    }

    #[test]
    fn placing_on_occupied_cell_replaces_and_moves_to_back() {
        let mut registry = PieceRegistry::new();
        assert_eq!(registry.place(piece(PieceKind::Rook, 1, 1)), None);
        assert_eq!(registry.place(piece(PieceKind::Pawn, 2, 2)), None);
        assert_eq!(
            registry.place(piece(PieceKind::Queen, 1, 1)),
            Some(PieceKind::Rook)
        );

        assert_eq!(
            pieces(&registry),
            vec![piece(PieceKind::Pawn, 2, 2), piece(PieceKind::Queen, 1, 1)]
        );
        assert_eq!(registry.kind_at(CellCoord::new(1, 1)), Some(PieceKind::Queen));
    }

    #[test]
    fn equality_ignores_placement_history() {
        let mut replaced = PieceRegistry::new();
        let _ = replaced.place(piece(PieceKind::Pawn, 0, 0));
        let _ = replaced.place(piece(PieceKind::King, 0, 0));

        let mut direct = PieceRegistry::new();
        let _ = direct.place(piece(PieceKind::King, 0, 0));

        assert_eq!(replaced, direct);
    }

    #[test]
    fn retain_within_reports_dropped_pieces() {
        let mut registry = PieceRegistry::new();
        let _ = registry.place(piece(PieceKind::King, 0, 0));
        let _ = registry.place(piece(PieceKind::Knight, 5, 1));
        let _ = registry.place(piece(PieceKind::Bishop, 1, 5));

        let size = BoardSize::new(4, 4).expect("valid size");
        let dropped = registry.retain_within(size);

        assert_eq!(
            dropped,
            vec![piece(PieceKind::Knight, 5, 1), piece(PieceKind::Bishop, 1, 5)]
        );
        assert_eq!(pieces(&registry), vec![piece(PieceKind::King, 0, 0)]);
        assert_eq!(registry.kind_at(CellCoord::new(5, 1)), None);
    }
}
