#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Canonical level document shared between the editor, the store and exported files.
//!
//! [`serialize`] snapshots a board into a [`LevelDocument`]; [`parse`] validates
//! a received JSON value and rebuilds a board from it.

mod parse;

use std::time::{SystemTime, UNIX_EPOCH};

use board_maker_board::{query, Board};
use board_maker_core::{LevelId, LevelSummary, Piece, TerrainKind};
use serde::{Deserialize, Serialize};

pub use crate::parse::{parse, parse_str, InvalidLevelData, ParsedLevel};

/// Serialised form of a board plus identifying metadata.
///
/// Field order matches the wire layout: `level_id`, `name`, `width`, `height`,
/// `terrain`, `enemy_pieces`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDocument {
    /// Identifier assigned when the document was produced.
    pub level_id: LevelId,
    /// Display name; omitted from exported files that were never named.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Terrain grid, `height` rows of `width` cells.
    pub terrain: Vec<Vec<TerrainKind>>,
    /// Pieces placed on the board.
    pub enemy_pieces: Vec<Piece>,
}

impl LevelDocument {
    /// Listing entry for the document, falling back to the identifier for unnamed levels.
    #[must_use]
    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            level_id: self.level_id.clone(),
            name: self
                .name
                .clone()
                .unwrap_or_else(|| self.level_id.to_string()),
        }
    }
}

/// Creation instant from which a document's identifier and default name derive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelStamp {
    unix_millis: u128,
}

impl LevelStamp {
    /// Captures the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        Self { unix_millis }
    }

    /// Uses an explicit Unix timestamp measured in milliseconds.
    #[must_use]
    pub const fn from_unix_millis(unix_millis: u128) -> Self {
        Self { unix_millis }
    }

    /// Identifier minted for documents created at this instant.
    #[must_use]
    pub fn level_id(&self) -> LevelId {
        LevelId::from_unix_millis(self.unix_millis)
    }

    /// Name given to documents saved at this instant without a user-provided name.
    #[must_use]
    pub fn default_name(&self) -> String {
        format!("Level_{}", self.unix_millis)
    }
}

/// Snapshots the board into a level document ready to be saved.
///
/// Dimensions always come from the board itself. A blank `name` is replaced
/// by the stamp's default name; any other name is stored exactly as given.
#[must_use]
pub fn serialize(board: &Board, name: &str, stamp: LevelStamp) -> LevelDocument {
    let name = if is_blank(name) {
        stamp.default_name()
    } else {
        name.to_owned()
    };
    snapshot(board, stamp.level_id(), Some(name))
}

/// Snapshots the board into a downloadable document.
///
/// Unlike [`serialize`], a blank name is left out instead of defaulted.
#[must_use]
pub fn export(board: &Board, name: &str, stamp: LevelStamp) -> LevelDocument {
    let name = (!is_blank(name)).then(|| name.to_owned());
    snapshot(board, stamp.level_id(), name)
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// Snapshots the board under an explicit identifier and name.
#[must_use]
pub fn snapshot(board: &Board, level_id: LevelId, name: Option<String>) -> LevelDocument {
    let size = query::size(board);
    LevelDocument {
        level_id,
        name,
        width: size.width(),
        height: size.height(),
        terrain: query::terrain_rows(board),
        enemy_pieces: query::pieces(board),
    }
}

/// Renders the document as indented JSON, the format used for exported files.
pub fn to_pretty_json(document: &LevelDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// File name under which an exported document is written.
#[must_use]
pub fn export_file_name(document: &LevelDocument) -> String {
    format!("{}.json", document.level_id)
}
