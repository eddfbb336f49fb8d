#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Board Maker editor.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative board, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired edits, the board executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what actually changed. Rejected edits surface as events rather
//! than errors so that callers can treat every pointer interaction uniformly.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Largest number of cells permitted along either board edge.
pub const MAX_BOARD_EDGE: u32 = 256;

/// Dimensions applied to a freshly created board.
pub const DEFAULT_BOARD_SIZE: BoardSize = BoardSize {
    width: 8,
    height: 8,
};

/// Surface type painted onto a single grid cell.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    /// Blank cell that every new or grown region starts with.
    #[default]
    Default,
    /// Grass surface.
    Grass,
    /// Water surface.
    Water,
    /// Mountain surface.
    Mountain,
}

impl TerrainKind {
    /// Every terrain kind in palette order.
    pub const ALL: [TerrainKind; 4] = [Self::Default, Self::Grass, Self::Water, Self::Mountain];

    /// Wire name of the terrain kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grass => "grass",
            Self::Water => "water",
            Self::Mountain => "mountain",
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerrainKind {
    type Err = UnknownKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownKindError::Terrain(value.to_owned()))
    }
}

/// Type of piece that can be placed on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    /// Pawn piece.
    Pawn,
    /// Rook piece.
    Rook,
    /// Knight piece.
    Knight,
    /// Bishop piece.
    Bishop,
    /// Queen piece.
    Queen,
    /// King piece.
    King,
}

impl PieceKind {
    /// Every piece kind in palette order.
    pub const ALL: [PieceKind; 6] = [
        Self::Pawn,
        Self::Rook,
        Self::Knight,
        Self::Bishop,
        Self::Queen,
        Self::King,
    ];

    /// Wire name of the piece kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// Single-letter label used when presenting the piece on a tile.
    ///
    /// Knights use `N` so that they never collide with kings.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceKind {
    type Err = UnknownKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownKindError::Piece(value.to_owned()))
    }
}

/// Error produced when a terrain or piece name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnknownKindError {
    /// The provided name does not match any terrain kind.
    Terrain(String),
    /// The provided name does not match any piece kind.
    Piece(String),
}

impl fmt::Display for UnknownKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terrain(name) => write!(f, "unknown terrain kind '{name}'"),
            Self::Piece(name) => write!(f, "unknown piece kind '{name}'"),
        }
    }
}

impl Error for UnknownKindError {}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Columns grow along `x`, rows grow along `y`; both are zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Dimensions of a board measured in whole cells.
///
/// Both edges are always in `1..=MAX_BOARD_EDGE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardSize {
    width: u32,
    height: u32,
}

impl BoardSize {
    /// Creates a size descriptor, rejecting empty or oversized edges.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || width > MAX_BOARD_EDGE || height > MAX_BOARD_EDGE {
            return None;
        }
        Some(Self { width, height })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within `[0, width) x [0, height)`.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Total number of cells covered by the size.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        DEFAULT_BOARD_SIZE
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Piece placed on the board, serialised as `{"type", "x", "y"}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    kind: PieceKind,
    x: u32,
    y: u32,
}

impl Piece {
    /// Creates a piece of the given kind anchored at the cell.
    #[must_use]
    pub const fn new(kind: PieceKind, cell: CellCoord) -> Self {
        Self {
            kind,
            x: cell.column(),
            y: cell.row(),
        }
    }

    /// Kind of the piece.
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Cell occupied by the piece.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }
}

/// Commands that express all permissible board edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Paints a single cell with the provided terrain.
    SetCell {
        /// Cell to repaint.
        cell: CellCoord,
        /// Terrain applied to the cell.
        terrain: TerrainKind,
    },
    /// Paints every cell with the provided terrain, keeping dimensions.
    FillAll {
        /// Terrain applied to every cell.
        terrain: TerrainKind,
    },
    /// Places a piece, replacing any piece already occupying the cell.
    PlacePiece {
        /// Kind of piece to place.
        kind: PieceKind,
        /// Cell the piece should occupy.
        cell: CellCoord,
    },
    /// Recomputes the board at new dimensions, preserving overlapping content.
    Resize {
        /// Target dimensions.
        size: BoardSize,
    },
}

/// Events reported by the board after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a single cell changed terrain.
    CellPainted {
        /// Cell that was painted.
        cell: CellCoord,
        /// Terrain the cell now holds.
        terrain: TerrainKind,
    },
    /// Reports that a cell paint request was rejected.
    CellPaintRejected {
        /// Cell named in the request.
        cell: CellCoord,
        /// Terrain requested for the cell.
        terrain: TerrainKind,
        /// Specific reason the edit failed.
        reason: EditRejection,
    },
    /// Confirms that every cell was painted.
    BoardFilled {
        /// Terrain now held by every cell.
        terrain: TerrainKind,
    },
    /// Confirms that a piece was placed.
    PiecePlaced {
        /// Piece that now occupies the cell.
        piece: Piece,
        /// Kind of piece that previously occupied the cell, if any.
        replaced: Option<PieceKind>,
    },
    /// Reports that a piece placement request was rejected.
    PiecePlacementRejected {
        /// Kind of piece named in the request.
        kind: PieceKind,
        /// Cell named in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: EditRejection,
    },
    /// Confirms that the board changed dimensions.
    BoardResized {
        /// Dimensions before the resize.
        from: BoardSize,
        /// Dimensions after the resize.
        to: BoardSize,
        /// Pieces discarded because they fell outside the new bounds.
        dropped: Vec<Piece>,
    },
}

/// Reasons a board edit may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditRejection {
    /// The requested cell lies outside the board.
    OutOfBounds,
}

/// Lightweight listing entry describing a saved level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    /// Identifier of the saved level.
    pub level_id: LevelId,
    /// Display name of the saved level.
    pub name: String,
}

/// Opaque identifier assigned to a saved level.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
    /// Wraps an explicitly supplied identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Derives the identifier used for a level created at the given Unix time.
    #[must_use]
    pub fn from_unix_millis(millis: u128) -> Self {
        Self(format!("level_{millis}"))
    }

    /// Borrows the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
