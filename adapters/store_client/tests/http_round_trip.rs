use std::thread;

use board_maker_board::{apply, Board};
use board_maker_core::{CellCoord, Command, LevelId, PieceKind, TerrainKind};
use board_maker_document::{parse, serialize, LevelStamp};
use board_maker_store::{MemoryRepository, StoreServer};
use board_maker_store_client::{HttpLevelStore, LevelStore, StoreError};

fn spawn_server() -> String {
    let server = StoreServer::bind("127.0.0.1:0", Box::new(MemoryRepository::new()), "/api")
        .expect("bind ephemeral port");
    let addr = server.local_addr().expect("tcp listener");
    let _handle = thread::spawn(move || server.run());
    format!("http://{addr}/api")
}

fn spawn_store() -> HttpLevelStore {
    HttpLevelStore::new(spawn_server())
}

fn painted_board() -> Board {
    let mut board = Board::default();
    let mut events = Vec::new();
    apply(
        &mut board,
        Command::FillAll {
            terrain: TerrainKind::Water,
        },
        &mut events,
    );
    apply(
        &mut board,
        Command::PlacePiece {
            kind: PieceKind::Queen,
            cell: CellCoord::new(2, 6),
        },
        &mut events,
    );
    board
}

#[test]
fn saved_level_is_listed_and_fetchable() {
    let store = spawn_store();
    let board = painted_board();
    let document = serialize(&board, "Lake", LevelStamp::from_unix_millis(100));

    store.save(&document).expect("save succeeds");

    let summaries = store.list().expect("list succeeds");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].level_id, document.level_id);
    assert_eq!(summaries[0].name, "Lake");

    let fetched = store.fetch(&document.level_id).expect("fetch succeeds");
    let parsed = parse(&fetched).expect("stored level is valid");
    assert_eq!(parsed.board, board);
}

#[test]
fn listing_is_most_recent_first() {
    let store = spawn_store();
    for (millis, name) in [(1, "old"), (2, "new")] {
        let document = serialize(&Board::default(), name, LevelStamp::from_unix_millis(millis));
        store.save(&document).expect("save succeeds");
    }

    let names: Vec<String> = store
        .list()
        .expect("list succeeds")
        .into_iter()
        .map(|summary| summary.name)
        .collect();
    assert_eq!(names, vec!["new".to_owned(), "old".to_owned()]);
}

#[test]
fn missing_level_is_not_found() {
    let store = spawn_store();
    let missing = LevelId::new("level_404");

    let error = store.fetch(&missing).expect_err("nothing saved");

    assert_eq!(error, StoreError::NotFound(missing));
}

#[test]
fn duplicate_save_is_a_persistence_failure() {
    let store = spawn_store();
    let document = serialize(&Board::default(), "twice", LevelStamp::from_unix_millis(9));
    store.save(&document).expect("first save succeeds");

    let error = store.save(&document).expect_err("same id twice");

    assert_eq!(
        error,
        StoreError::PersistenceFailure {
            status: 500,
            message: "Failed to save level".to_owned(),
        }
    );
}

#[test]
fn unnamed_level_is_a_validation_failure() {
    let store = spawn_store();
    let mut document = serialize(&Board::default(), "named", LevelStamp::from_unix_millis(3));
    document.name = None;

    let error = store.save(&document).expect_err("name is required");

    assert_eq!(
        error,
        StoreError::ValidationFailure("Missing level data".to_owned())
    );
}

#[test]
fn responses_allow_cross_origin_browsers() {
    let base = spawn_server();

    let listing = ureq::get(&format!("{base}/levels"))
        .call()
        .expect("list succeeds");
    assert_eq!(listing.header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(listing.header("Content-Type"), Some("application/json"));

    let preflight = ureq::request("OPTIONS", &format!("{base}/levels"))
        .call()
        .expect("preflight succeeds");
    assert_eq!(preflight.status(), 204);
    assert_eq!(
        preflight.header("Access-Control-Allow-Methods"),
        Some("GET, POST, OPTIONS")
    );
    assert_eq!(
        preflight.header("Access-Control-Allow-Headers"),
        Some("Content-Type")
    );
}
