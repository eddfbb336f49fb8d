#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Editing session that ties the board, tool palette and persistence together.
//!
//! [`EditorSession`] is the single owner of everything an editing session
//! mutates. Adapters hold one session and pass it by reference; nothing here
//! depends on a rendering surface, so the whole editing flow runs headlessly.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use board_maker_board::{
    apply, query,
    resize::{parse_dimensions, DimensionInputError},
    Board,
};
use board_maker_core::{
    BoardSize, CellCoord, Command, Event, LevelId, LevelSummary, PieceKind, TerrainKind,
};
use board_maker_document::{
    export, export_file_name, parse, parse_str, serialize, to_pretty_json, InvalidLevelData,
    LevelStamp, ParsedLevel,
};
use board_maker_store_client::{LevelStore, StoreError};
use board_maker_system_painter::{PaintController, PointerEvent, ToolSelection};
use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;

/// Failures surfaced to the user by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A received level document was malformed.
    #[error("invalid level data: {0}")]
    InvalidLevelData(#[from] InvalidLevelData),
    /// The level store failed or could not be reached.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Width/height input could not be turned into a board size.
    #[error("cannot resize: {0}")]
    Dimensions(#[from] DimensionInputError),
    /// A level file could not be read or written.
    #[error("level file {} could not be accessed: {source}", .path.display())]
    File {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// A level document could not be encoded.
    #[error("level could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Explicit state of one editing session.
#[derive(Debug, Default)]
pub struct EditorSession {
    board: Board,
    tools: ToolSelection,
    painter: PaintController,
    level_name: String,
    levels: Vec<LevelSummary>,
}

impl EditorSession {
    /// Starts a session on a default 8x8 board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session on an empty board of the given size.
    #[must_use]
    pub fn with_size(size: BoardSize) -> Self {
        Self {
            board: Board::new(size),
            ..Self::default()
        }
    }

    /// Starts a session and lists the store's saved levels.
    ///
    /// A store that cannot be listed is logged and leaves the list empty.
    #[must_use]
    pub fn open(store: &dyn LevelStore) -> Self {
        let mut session = Self::new();
        if let Err(error) = session.refresh_levels(store) {
            warn!("could not list saved levels: {error}");
        }
        session
    }

    /// Starts a session like [`EditorSession::open`], failing if the store
    /// cannot be listed.
    pub fn connect(store: &dyn LevelStore) -> Result<Self, SessionError> {
        let mut session = Self::new();
        let _ = session.refresh_levels(store)?;
        Ok(session)
    }

    /// Board under edit.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current tool palette selection.
    #[must_use]
    pub fn tools(&self) -> &ToolSelection {
        &self.tools
    }

    /// Paint controller tracking the current stroke.
    #[must_use]
    pub fn painter(&self) -> &PaintController {
        &self.painter
    }

    /// Name the level will be saved under; may be blank.
    #[must_use]
    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    /// Sets the name the level will be saved under.
    pub fn set_level_name(&mut self, name: impl Into<String>) {
        self.level_name = name.into();
    }

    /// Saved levels as of the last refresh.
    #[must_use]
    pub fn levels(&self) -> &[LevelSummary] {
        &self.levels
    }

    /// Selects a terrain brush, leaving piece mode.
    pub fn select_terrain(&mut self, terrain: TerrainKind) {
        self.tools.select_terrain(terrain);
    }

    /// Selects a piece type, entering piece mode.
    pub fn select_piece(&mut self, piece: PieceKind) {
        self.tools.select_piece(piece);
    }

    /// Leaves piece mode so pointer edits paint terrain again.
    pub fn edit_terrain(&mut self) {
        self.tools.clear_piece();
    }

    /// Feeds one pointer interaction through the paint controller.
    pub fn pointer(&mut self, event: PointerEvent) -> Vec<Event> {
        let mut commands = Vec::new();
        self.painter.handle(event, &self.tools, &mut commands);
        self.execute(commands)
    }

    /// Presses the pointer over a cell.
    pub fn pointer_down(&mut self, cell: CellCoord) -> Vec<Event> {
        self.pointer(PointerEvent::Down(cell))
    }

    /// Moves the pointer onto a cell.
    pub fn pointer_enter(&mut self, cell: CellCoord) -> Vec<Event> {
        self.pointer(PointerEvent::Enter(cell))
    }

    /// Releases the pointer.
    pub fn pointer_up(&mut self) -> Vec<Event> {
        self.pointer(PointerEvent::Up)
    }

    /// Clicks a cell.
    pub fn click(&mut self, cell: CellCoord) -> Vec<Event> {
        self.pointer(PointerEvent::Click(cell))
    }

    /// Paints every cell with the selected terrain brush.
    pub fn fill_all(&mut self) -> Vec<Event> {
        let terrain = self.tools.terrain();
        self.execute(vec![Command::FillAll { terrain }])
    }

    /// Resizes the board to an already validated size.
    pub fn resize(&mut self, size: BoardSize) -> Vec<Event> {
        self.execute(vec![Command::Resize { size }])
    }

    /// Resizes the board from free-text width and height fields.
    ///
    /// Invalid input leaves the board untouched.
    pub fn resize_from_input(
        &mut self,
        width: &str,
        height: &str,
    ) -> Result<Vec<Event>, SessionError> {
        let size = parse_dimensions(width, height)?;
        Ok(self.resize(size))
    }

    /// Replaces the board wholesale, ending any stroke in progress.
    pub fn replace_board(&mut self, board: Board) {
        self.board = board;
        self.painter = PaintController::new();
    }

    /// Saves the board under a freshly minted identifier and refreshes the level list.
    pub fn save(&mut self, store: &dyn LevelStore) -> Result<LevelId, SessionError> {
        self.save_at(store, LevelStamp::now())
    }

    /// Saves the board using the provided creation stamp. See [`Self::save`].
    ///
    /// A failed save leaves the board and its unsaved edits in place.
    pub fn save_at(
        &mut self,
        store: &dyn LevelStore,
        stamp: LevelStamp,
    ) -> Result<LevelId, SessionError> {
        let document = serialize(&self.board, &self.level_name, stamp);
        store.save(&document)?;
        info!("saved level {}", document.level_id);

        if let Err(error) = self.refresh_levels(store) {
            warn!("saved level but could not refresh the level list: {error}");
        }
        Ok(document.level_id)
    }

    /// Reloads the saved-level list from the store.
    pub fn refresh_levels(
        &mut self,
        store: &dyn LevelStore,
    ) -> Result<&[LevelSummary], SessionError> {
        self.levels = store.list()?;
        debug!("store lists {} levels", self.levels.len());
        Ok(&self.levels)
    }

    /// Fetches a saved level and replaces the board with it.
    ///
    /// The board is only replaced once the fetched document validates.
    pub fn load(
        &mut self,
        store: &dyn LevelStore,
        level_id: &LevelId,
    ) -> Result<ParsedMetadata, SessionError> {
        let document = store.fetch(level_id)?;
        self.load_document(&document)
    }

    /// Validates a level document and replaces the board with it.
    pub fn load_document(&mut self, document: &Value) -> Result<ParsedMetadata, SessionError> {
        let parsed = parse(document)?;
        Ok(self.adopt(parsed))
    }

    /// Reads a level file from disk and replaces the board with it.
    pub fn load_file(&mut self, path: &Path) -> Result<ParsedMetadata, SessionError> {
        let text = fs::read_to_string(path).map_err(|source| SessionError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = parse_str(&text)?;
        Ok(self.adopt(parsed))
    }

    /// Writes the board as `{level_id}.json` into `directory`.
    pub fn download(&self, directory: &Path) -> Result<PathBuf, SessionError> {
        self.download_at(directory, LevelStamp::now())
    }

    /// Writes the board using the provided creation stamp. See [`Self::download`].
    pub fn download_at(
        &self,
        directory: &Path,
        stamp: LevelStamp,
    ) -> Result<PathBuf, SessionError> {
        let document = export(&self.board, &self.level_name, stamp);
        let contents = to_pretty_json(&document)?;
        let path = directory.join(export_file_name(&document));
        fs::write(&path, contents).map_err(|source| SessionError::File {
            path: path.clone(),
            source,
        })?;
        info!("wrote {}", path.display());
        Ok(path)
    }

    fn adopt(&mut self, parsed: ParsedLevel) -> ParsedMetadata {
        let size = query::size(&parsed.board);
        info!("loaded {size} level {:?}", parsed.level_id);
        self.replace_board(parsed.board);
        ParsedMetadata {
            level_id: parsed.level_id,
            name: parsed.name,
        }
    }

    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(&mut self.board, command, &mut events);
        }
        events
    }
}

/// Identifying metadata carried by a loaded level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMetadata {
    /// Identifier, when the document carried one.
    pub level_id: Option<LevelId>,
    /// Display name, when the document carried one.
    pub name: Option<String>,
}
