//! Validation of received level documents.

use board_maker_board::{Board, BoardShapeError};
use board_maker_core::{BoardSize, LevelId, Piece, TerrainKind, MAX_BOARD_EDGE};
use log::debug;
use serde_json::{Map, Value};
use thiserror::Error;

/// Board rebuilt from a received document, plus whatever metadata it carried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLevel {
    /// Board described by the document.
    pub board: Board,
    /// Identifier, when the document carried one.
    pub level_id: Option<LevelId>,
    /// Display name, when the document carried a non-empty one.
    pub name: Option<String>,
}

/// Reasons a received document could not be turned into a board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidLevelData {
    /// The text was not valid JSON.
    #[error("level data is not valid JSON: {0}")]
    Json(String),
    /// The top-level value was not a JSON object.
    #[error("level data must be a JSON object")]
    NotAnObject,
    /// The `terrain` field was absent or null.
    #[error("level data has no terrain")]
    MissingTerrain,
    /// The `terrain` field was an empty sequence.
    #[error("level terrain is empty")]
    EmptyTerrain,
    /// A terrain row was not a non-empty sequence.
    #[error("terrain row {row} is not a non-empty sequence of cells")]
    NotAGrid {
        /// Zero-based index of the offending row; row 0 when `terrain` itself is not a sequence.
        row: usize,
    },
    /// A terrain row differed in length from the first row.
    #[error("terrain row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
    /// A terrain cell held an unknown value.
    #[error("terrain cell ({column}, {row}) holds unknown value {value}")]
    UnknownTerrain {
        /// Zero-based column of the cell.
        column: usize,
        /// Zero-based row of the cell.
        row: usize,
        /// Offending JSON value rendered as text.
        value: String,
    },
    /// A declared dimension was not a positive integer.
    #[error("declared {field} {value} is not a positive integer")]
    InvalidDimension {
        /// Name of the offending field.
        field: &'static str,
        /// Offending JSON value rendered as text.
        value: String,
    },
    /// A declared dimension disagreed with the terrain grid.
    #[error("declared {field} {declared} does not match the terrain grid ({actual})")]
    DimensionMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// Value declared by the document.
        declared: u64,
        /// Value measured from the terrain grid.
        actual: usize,
    },
    /// The grid exceeded the largest supported board.
    #[error("terrain grid {width}x{height} exceeds the {}-cell edge limit", MAX_BOARD_EDGE)]
    TooLarge {
        /// Measured column count.
        width: usize,
        /// Measured row count.
        height: usize,
    },
    /// The `enemy_pieces` field was malformed.
    #[error("enemy pieces are malformed: {0}")]
    InvalidPieces(String),
    /// The assembled board violated a board invariant.
    #[error(transparent)]
    Shape(#[from] BoardShapeError),
}

/// Parses JSON text into a board. See [`parse`].
pub fn parse_str(text: &str) -> Result<ParsedLevel, InvalidLevelData> {
    let value: Value =
        serde_json::from_str(text).map_err(|error| InvalidLevelData::Json(error.to_string()))?;
    parse(&value)
}

/// Validates a received document and rebuilds the board it describes.
///
/// `terrain` must be a non-empty, rectangular grid of known terrain names.
/// Declared `width`/`height` are optional; when present they must match the
/// grid. `enemy_pieces` defaults to no pieces.
pub fn parse(document: &Value) -> Result<ParsedLevel, InvalidLevelData> {
    let object = document.as_object().ok_or(InvalidLevelData::NotAnObject)?;

    let rows = parse_terrain(object)?;
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);

    check_declared(object, "width", width)?;
    check_declared(object, "height", height)?;

    let size = u32::try_from(width)
        .ok()
        .zip(u32::try_from(height).ok())
        .and_then(|(width, height)| BoardSize::new(width, height))
        .ok_or(InvalidLevelData::TooLarge { width, height })?;

    let pieces = match object.get("enemy_pieces") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<Piece>>(value.clone())
            .map_err(|error| InvalidLevelData::InvalidPieces(error.to_string()))?,
    };

    let board = Board::from_parts(size, rows, pieces)?;
    let level_id = object
        .get("level_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(LevelId::new);
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(str::to_owned);

    debug!("parsed {size} level {level_id:?}");
    Ok(ParsedLevel {
        board,
        level_id,
        name,
    })
}

fn parse_terrain(object: &Map<String, Value>) -> Result<Vec<Vec<TerrainKind>>, InvalidLevelData> {
    let raw_rows = match object.get("terrain") {
        None | Some(Value::Null) => return Err(InvalidLevelData::MissingTerrain),
        Some(Value::Array(rows)) => rows,
        Some(_) => return Err(InvalidLevelData::NotAGrid { row: 0 }),
    };
    if raw_rows.is_empty() {
        return Err(InvalidLevelData::EmptyTerrain);
    }

    let mut rows = Vec::with_capacity(raw_rows.len());
    let mut expected = None;
    for (row_index, raw_row) in raw_rows.iter().enumerate() {
        let cells = match raw_row {
            Value::Array(cells) if !cells.is_empty() => cells,
            _ => return Err(InvalidLevelData::NotAGrid { row: row_index }),
        };
        let expected = *expected.get_or_insert(cells.len());
        if cells.len() != expected {
            return Err(InvalidLevelData::RaggedRow {
                row: row_index,
                expected,
                actual: cells.len(),
            });
        }

        let row = cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                cell.as_str()
                    .and_then(|name| name.parse::<TerrainKind>().ok())
                    .ok_or_else(|| InvalidLevelData::UnknownTerrain {
                        column,
                        row: row_index,
                        value: cell.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn check_declared(
    object: &Map<String, Value>,
    field: &'static str,
    actual: usize,
) -> Result<(), InvalidLevelData> {
    let declared = match object.get(field) {
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value
            .as_u64()
            .filter(|declared| *declared > 0)
            .ok_or_else(|| InvalidLevelData::InvalidDimension {
                field,
                value: value.to_string(),
            })?,
    };

    if u64::try_from(actual).map_or(true, |actual| actual != declared) {
        return Err(InvalidLevelData::DimensionMismatch {
            field,
            declared,
            actual,
        });
    }
    Ok(())
}
