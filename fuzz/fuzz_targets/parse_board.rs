#![no_main]
use gambit::chess::board::Board;
use gambit::chess::core::Player;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::from_diagram(Player::White, Player::White, input) else {
        return;
    };
    let printed = board.to_string();
    let reparsed = Board::from_diagram(Player::White, Player::White, &printed)
        .expect("printed diagrams should be accepted");
    assert_eq!(reparsed.to_string(), printed);
});
