use board_maker_board::{apply, query, Board};
use board_maker_core::{BoardSize, CellCoord, Command, PieceKind, TerrainKind};
use board_maker_document::{parse, parse_str, serialize, to_pretty_json, LevelStamp};

fn sample_board(width: u32, height: u32) -> Board {
    let size = BoardSize::new(width, height).expect("valid size");
    let mut board = Board::new(size);
    let mut events = Vec::new();
    for row in 0..height {
        for column in 0..width {
            let terrain = TerrainKind::ALL[((column * 3 + row) % 4) as usize];
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
    for (index, kind) in PieceKind::ALL.into_iter().enumerate() {
        let index = index as u32;
        apply(
            &mut board,
            Command::PlacePiece {
                kind,
                cell: CellCoord::new(index % width, (index * 2) % height),
            },
            &mut events,
        );
    }
    board
}

#[test]
fn parse_restores_serialized_terrain_and_pieces() {
    let stamp = LevelStamp::from_unix_millis(42);
    for (width, height) in [(1, 1), (8, 8), (3, 7), (12, 2)] {
        let board = sample_board(width, height);
        let document = serialize(&board, "Round trip", stamp);
        let value = serde_json::to_value(&document).expect("serialize");

        let parsed = parse(&value).expect("serialized documents always parse");

        assert_eq!(
            query::terrain_rows(&parsed.board),
            query::terrain_rows(&board)
        );
        assert_eq!(query::pieces(&parsed.board), query::pieces(&board));
        assert_eq!(parsed.board, board);
        assert_eq!(parsed.level_id, Some(document.level_id.clone()));
        assert_eq!(parsed.name.as_deref(), Some("Round trip"));
    }
}

#[test]
fn exported_file_contents_parse_back() {
    let board = sample_board(4, 4);
    let document = serialize(&board, "", LevelStamp::from_unix_millis(7));
    let text = to_pretty_json(&document).expect("pretty json");

    let parsed = parse_str(&text).expect("exported file parses");

    assert_eq!(parsed.board, board);
    assert_eq!(parsed.name.as_deref(), Some("Level_7"));
}
