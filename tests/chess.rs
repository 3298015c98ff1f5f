use gambit::chess::board::Board;
use gambit::chess::core::{Coordinate, Player, BOARD_WIDTH};
use gambit::chess::movegen::legal_moves;
use gambit::chess::moves::perft;
use gambit::chess::state::GameState;
use itertools::Itertools;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition, Role};

const KIWIPETE: &str = "
    r...k..r
    p.ppqpb.
    bn..pnp.
    ...PN...
    .p..P...
    ..N..Q.p
    PPPBBPPP
    R...K..R
";

const ENDGAME: &str = "
    ........
    ..p.....
    ...p....
    KP.....r
    .R...p.k
    ........
    ....P.P.
    ........
";

fn setup(diagram: &str) -> Board {
    Board::from_diagram(Player::White, Player::White, diagram)
        .expect("parsing legal diagram: {diagram}")
}

/// Square name as seen by White when White plays from the bottom.
fn square_name(square: Coordinate) -> String {
    let file = char::from(b'a' + square.y());
    let rank = BOARD_WIDTH - square.x();
    format!("{file}{rank}")
}

/// Moves in UCI notation. Promotions are always to a queen.
fn uci_moves(board: &Board) -> Vec<String> {
    legal_moves(board)
        .unwrap()
        .into_iter()
        .map(|(from, to)| {
            let promotion = board.piece_at(from).unwrap().is_pawn()
                && to.x() == board.promotion_row(board.side_to_move());
            format!(
                "{}{}{}",
                square_name(from),
                square_name(to),
                if promotion { "q" } else { "" }
            )
        })
        .sorted()
        .collect()
}

fn shakmaty_moves(position: &Chess) -> Vec<String> {
    position
        .legal_moves()
        .iter()
        .filter(|m| matches!(m.promotion(), None | Some(Role::Queen)))
        .map(|m| m.to_uci(CastlingMode::Standard).to_string())
        .sorted()
        .collect()
}

#[test]
fn perft_starting_position() {
    let board = Board::new(Player::White);
    assert_eq!(perft(&board, 0), Ok(1));
    assert_eq!(perft(&board, 1), Ok(20));
    assert_eq!(perft(&board, 2), Ok(400));
    assert_eq!(perft(&board, 3), Ok(8902));
}

#[test]
fn perft_matches_shakmaty() {
    for human in [Player::White, Player::Black] {
        let board = Board::new(human);
        for depth in 1..=3 {
            assert_eq!(
                perft(&board, depth),
                Ok(shakmaty::perft(&Chess::default(), u32::from(depth)))
            );
        }
    }
}

#[test]
fn perft_kiwipete() {
    let board = setup(KIWIPETE);
    assert_eq!(perft(&board, 1), Ok(48));
    assert_eq!(perft(&board, 2), Ok(2039));
}

#[test]
fn perft_endgame() {
    let board = setup(ENDGAME);
    assert_eq!(perft(&board, 1), Ok(14));
    assert_eq!(perft(&board, 2), Ok(191));
    assert_eq!(perft(&board, 3), Ok(2812));
}

#[test]
fn kiwipete_moves() {
    let board = setup(KIWIPETE);
    let moves = uci_moves(&board);
    assert!(moves.contains(&"e1g1".to_string()));
    assert!(moves.contains(&"e1c1".to_string()));
    assert!(moves.contains(&"e2a6".to_string()));
    assert!(moves.contains(&"d5e6".to_string()));
    assert_eq!(moves.len(), 48);
}

// Plays random games and compares the legal moves with shakmaty after every
// ply.
#[test]
fn random_playouts_match_shakmaty() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..20 {
        let mut board = Board::new(Player::White);
        let mut position = Chess::default();
        for _ in 0..150 {
            let moves = uci_moves(&board);
            assert_eq!(moves, shakmaty_moves(&position), "position:\n{board:?}");
            match board.state() {
                GameState::Checkmate => {
                    assert!(position.is_checkmate());
                    break;
                },
                GameState::Stalemate => {
                    assert!(position.is_stalemate());
                    break;
                },
                GameState::Check => assert!(position.is_check(), "position:\n{board:?}"),
                _ => assert!(!position.is_check()),
            }
            let Some(chosen) = moves.choose(&mut rng) else {
                break;
            };
            let (from, to) = legal_moves(&board)
                .unwrap()
                .into_iter()
                .find(|&(from, to)| {
                    chosen.starts_with(&format!("{}{}", square_name(from), square_name(to)))
                })
                .unwrap();
            let turns = board.turns_played();
            let _ = board.apply_move(from, to).unwrap();
            assert_eq!(board.turns_played(), turns + 1);

            let played = position
                .legal_moves()
                .into_iter()
                .find(|m| &m.to_uci(CastlingMode::Standard).to_string() == chosen)
                .unwrap();
            position.play_unchecked(&played);
        }
    }
}

#[test]
fn orientation_does_not_change_rules() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let mut white = Board::new(Player::White);
        let mut black = Board::new(Player::Black);
        for _ in 0..60 {
            let moves = legal_moves(&white).unwrap();
            // The black-oriented board is the white one flipped vertically.
            let mirrored: Vec<_> = legal_moves(&black)
                .unwrap()
                .into_iter()
                .map(|(from, to)| (flip(from), flip(to)))
                .sorted()
                .collect();
            assert_eq!(moves.iter().copied().sorted().collect::<Vec<_>>(), mirrored);
            let Some(&(from, to)) = moves.choose(&mut rng) else {
                break;
            };
            let white_outcome = white.apply_move(from, to).unwrap();
            let black_outcome = black.apply_move(flip(from), flip(to)).unwrap();
            assert_eq!(white_outcome.state, black_outcome.state);
            assert_eq!(white_outcome.flags, black_outcome.flags);
        }
    }
}

fn flip(square: Coordinate) -> Coordinate {
    Coordinate::new(BOARD_WIDTH - 1 - square.x(), square.y()).unwrap()
}
