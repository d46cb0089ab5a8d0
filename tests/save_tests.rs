//! Save file codec tests against hand-written files

use std::time::Instant;

use term_tetris::core::save::{decode, encode, read_save, write_save};
use term_tetris::core::{GameState, SaveError, SavedCell};
use term_tetris::types::{GameMode, PieceKind, Rotation, MIN_SPEED};

/// A paused game: S piece (index 4) East at (2, 7), next O, three locked cells
const PAUSED_GAME: &str = "\
3
1450
1.2450001
4
2
1
7
0
1
0
3
20
0
5
21
0
5
21
1
0
";

#[test]
fn test_decode_hand_written_file() {
    let data = decode(PAUSED_GAME).unwrap();

    assert_eq!(data.level, 3);
    assert_eq!(data.score, 1450);
    assert!((data.speed - 1.245).abs() < 1e-5);
    assert_eq!(data.current, PieceKind::S);
    assert_eq!((data.col, data.row), (2, 7));
    assert_eq!(data.rotation, Rotation::East);
    assert_eq!(data.drop_cooldown, 0);
    assert!(data.paused);
    assert!(!data.new_game);
    assert_eq!(data.next, PieceKind::O);
    assert_eq!(
        data.cells,
        vec![
            SavedCell { row: 20, col: 0, kind: PieceKind::T },
            SavedCell { row: 21, col: 0, kind: PieceKind::T },
            SavedCell { row: 21, col: 1, kind: PieceKind::I },
        ]
    );
}

#[test]
fn test_encode_reproduces_canonical_text() {
    let text = "1\n0\n1.0\n0\n3\n0\n1\n25\n0\n0\n6\n21\n9\n2\n";
    assert_eq!(encode(&decode(text).unwrap()), text);
}

#[test]
fn test_empty_board_has_no_cell_lines() {
    let data = decode("1\n0\n1.0\n3\n4\n0\n0\n0\n0\n0\n1\n").unwrap();
    assert!(data.cells.is_empty());
    assert_eq!(encode(&data).lines().count(), 11);
}

#[test]
fn test_file_round_trip() {
    let path = std::env::temp_dir().join(format!("term-tetris-codec-{}.txt", std::process::id()));
    let data = decode(PAUSED_GAME).unwrap();

    write_save(&path, &data).unwrap();
    let back = read_save(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(back, Some(data));
}

#[test]
fn test_missing_file_is_none() {
    let path = std::env::temp_dir().join("term-tetris-no-such-save-file.txt");
    let _ = std::fs::remove_file(&path);
    assert!(read_save(&path).unwrap().is_none());
}

#[test]
fn test_empty_input_names_the_first_field() {
    match decode("") {
        Err(SaveError::MissingField { field, line }) => {
            assert_eq!(field, "level");
            assert_eq!(line, 1);
        }
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_rotation_out_of_range() {
    let err = decode("1\n0\n1.0\n0\n3\n4\n1\n0\n0\n0\n0\n").unwrap_err();
    assert!(matches!(
        err,
        SaveError::OutOfRange {
            field: "current rotation",
            value: 4
        }
    ));
    assert!(err.to_string().contains("current rotation"));
}

#[test]
fn test_flag_must_be_zero_or_one() {
    let err = decode("1\n0\n1.0\n0\n3\n0\n1\n0\n2\n0\n0\n").unwrap_err();
    assert!(matches!(err, SaveError::OutOfRange { field: "paused flag", .. }));
}

#[test]
fn test_java_exponent_speed_restores_a_slow_game() {
    let text = PAUSED_GAME.replacen("1.2450001", "1.0E-5", 1);
    let data = decode(&text).unwrap();
    assert_eq!(data.speed, 1.0e-5);

    let mut game = GameState::new(1);
    game.restore_at(data, Instant::now());

    assert_eq!(game.mode(), GameMode::Paused);
    assert_eq!(game.speed(), 1.0e-5);
    assert_eq!(game.clock().cycles_per_second(), 1.0e-5);
}

#[test]
fn test_speed_below_floor_is_rejected() {
    let text = PAUSED_GAME.replacen("1.2450001", "1e-30", 1);
    assert!(matches!(
        decode(&text).unwrap_err(),
        SaveError::InvalidNumber { field: "speed", line: 3, .. }
    ));

    let floor = PAUSED_GAME.replacen("1.2450001", &MIN_SPEED.to_string(), 1);
    assert_eq!(decode(&floor).unwrap().speed, MIN_SPEED);
}
