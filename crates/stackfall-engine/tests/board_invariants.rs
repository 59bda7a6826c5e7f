//! Property tests for board and session invariants under random play.

use proptest::prelude::*;
use stackfall_engine::{
    Action, Board, Cell, DropOutcome, GameConfig, GameSession, Piece, PieceSeed, ShapeKind,
};

#[derive(Debug, Clone, Copy)]
enum Step {
    Input(Action),
    Tick,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Input(Action::MoveLeft)),
        Just(Step::Input(Action::MoveRight)),
        Just(Step::Input(Action::Rotate)),
        Just(Step::Input(Action::MoveDown)),
        Just(Step::Tick),
    ]
}

fn shape() -> impl Strategy<Value = ShapeKind> {
    prop::sample::select(ShapeKind::ALL.to_vec())
}

fn count_cells(board: &Board, pred: impl Fn(Cell) -> bool) -> usize {
    board
        .row_cells()
        .flatten()
        .filter(|cell| pred(**cell))
        .count()
}

fn assert_falling_matches_active(board: &Board) {
    let falling = count_cells(board, Cell::is_falling);
    match board.active_piece() {
        Some(piece) => {
            assert_eq!(falling, 4);
            for &(row, col) in piece.blocks() {
                assert!(board.cell_at(row, col).is_falling());
            }
        }
        None => assert_eq!(falling, 0),
    }
}

proptest! {
    #[test]
    fn random_play_keeps_exactly_one_falling_piece(
        seed in any::<u128>(),
        steps in prop::collection::vec(step(), 1..300),
    ) {
        let mut session = GameSession::with_seed(GameConfig::default(), PieceSeed::from_u128(seed)).unwrap();
        for step in steps {
            match step {
                Step::Input(action) => {
                    session.apply(action);
                }
                Step::Tick => {
                    session.tick();
                }
            }
            assert_falling_matches_active(session.board());
            if session.session_state().is_game_over() {
                break;
            }
        }
    }

    #[test]
    fn rejected_moves_leave_board_unchanged(
        kind in shape(),
        moves in prop::collection::vec(0..3_u8, 1..60),
    ) {
        let mut board = Board::from_ascii(
            "
            ........
            ........
            ........
            ........
            ..O.....
            ..OO..I.
            JJOO..I.
            ",
        );
        board.spawn(&Piece::new(kind)).unwrap();

        for m in moves {
            let before = board.clone();
            let moved = match m {
                0 => board.move_left(),
                1 => board.move_right(),
                _ => board.rotate(),
            };
            if moved {
                prop_assert_ne!(&board, &before);
            } else {
                prop_assert_eq!(&board, &before);
            }
            assert_falling_matches_active(&board);
        }
    }

    #[test]
    fn locking_adds_four_blocks(
        kind in shape(),
        shifts in -4_i32..4,
    ) {
        let mut board = Board::default();
        board.spawn(&Piece::new(kind)).unwrap();
        for _ in 0..shifts.unsigned_abs() {
            if shifts < 0 {
                board.move_left();
            } else {
                board.move_right();
            }
        }
        while board.move_down() == DropOutcome::Moved {}

        prop_assert!(board.all_locked());
        prop_assert_eq!(count_cells(&board, Cell::is_locked), 4);
        prop_assert_eq!(board.clear_completed_lines(), 0);
    }

    #[test]
    fn clearing_removes_complete_rows_and_keeps_order(
        grid in prop::collection::vec(
            prop::collection::vec(prop::bool::weighted(0.85), 6),
            4..12,
        ),
    ) {
        let render = |row: &Vec<bool>| -> String {
            row.iter().map(|&filled| if filled { 'T' } else { '.' }).collect()
        };
        let art = grid.iter().map(render).collect::<Vec<_>>().join("\n");
        let mut board = Board::from_ascii(&art);

        let kept: Vec<String> = grid
            .iter()
            .filter(|row| !row.iter().all(|&filled| filled))
            .map(render)
            .collect();
        let complete = grid.len() - kept.len();
        let expected = std::iter::repeat_n("......".to_owned(), complete)
            .chain(kept)
            .collect::<Vec<_>>()
            .join("\n");

        prop_assert_eq!(board.clear_completed_lines(), complete);
        prop_assert_eq!(board.to_string(), expected);
        prop_assert_eq!(board.clear_completed_lines(), 0);
    }
}

#[test]
fn seeded_sessions_replay_identically() {
    let config = GameConfig {
        rows: 12,
        cols: 8,
        ..GameConfig::default()
    };
    let seed = PieceSeed::from_u128(0xdead_beef);
    let mut a = GameSession::with_seed(config, seed).unwrap();
    let mut b = GameSession::with_seed(config, seed).unwrap();

    let inputs = [Action::MoveLeft, Action::Rotate, Action::MoveRight, Action::MoveDown];
    for i in 0..500 {
        let action = inputs[i % inputs.len()];
        assert_eq!(a.apply(action), b.apply(action));
        assert_eq!(a.tick(), b.tick());
        assert_eq!(a.board(), b.board());
    }
    assert_eq!(a.stats(), b.stats());
}
