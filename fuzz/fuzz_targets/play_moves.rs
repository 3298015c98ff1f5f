#![no_main]
use gambit::chess::board::Board;
use gambit::chess::core::{Coordinate, Player};
use gambit::chess::movegen::legal_moves;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

// Every pair of bytes selects a square to move from and a square to move to.
fuzz_target!(|data: &[u8]| {
    let mut board = Board::new(Player::White);
    for chunk in data.chunks_exact(2) {
        let decode = |byte: u8| Coordinate::new((byte >> 3) & 7, byte & 7).unwrap();
        let (from, to) = (decode(chunk[0]), decode(chunk[1]));
        let legal = legal_moves(&board).unwrap().contains(&(from, to));
        let before = board.clone();
        match board.apply_move(from, to) {
            Ok(outcome) => {
                assert!(legal);
                assert_eq!(board.turns_played(), before.turns_played() + 1);
                assert_eq!(board.side_to_move(), !before.side_to_move());
                assert_eq!(outcome.piece.owner, before.side_to_move());
            },
            Err(_) => {
                assert!(!legal);
                assert_eq!(board, before);
            },
        }
    }
});
