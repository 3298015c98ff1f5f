//! Criterion benchmarks measure time of move generation and perft calculation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gambit::chess::board::Board;
use gambit::chess::core::Player;
use gambit::chess::movegen::legal_moves;
use gambit::chess::moves::perft;
use shakmaty::{Chess, Position as ShakmatyPosition};

const POSITIONS: [&str; 3] = [
    // Kiwipete.
    "
    r...k..r
    p.ppqpb.
    bn..pnp.
    ...PN...
    .p..P...
    ..N..Q.p
    PPPBBPPP
    R...K..R
    ",
    "
    ........
    ..p.....
    ...p....
    KP.....r
    .R...p.k
    ........
    ....P.P.
    ........
    ",
    "
    r....rk.
    .pp.qppp
    p.np.n..
    ..b.p.B.
    ..B.P.b.
    P.NP.N..
    .PP.QPPP
    R....RK.
    ",
];

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    let mut boards = vec![Board::new(Player::White)];
    for diagram in POSITIONS {
        boards.push(Board::from_diagram(Player::White, Player::White, diagram).unwrap());
    }
    group.throughput(criterion::Throughput::Elements(boards.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("movegen_gambit", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    let _ = std::hint::black_box(legal_moves(board).unwrap());
                }
            });
        },
    );
    // Shakmaty is a bitboard engine: a reference point, not a target.
    let reference = Chess::default();
    group.bench_function("movegen_reference_shakmaty", |b| {
        b.iter(|| std::hint::black_box(reference.legal_moves()));
    });
    group.finish();
}

criterion_group! {
    name = movegen;
    config = Criterion::default().sample_size(100);
    targets = movegen_bench
}

// This acts both as performance and correctness test.
fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    for (board, depth, nodes) in &[
        (Board::new(Player::White), 3, 8_902),
        (Board::new(Player::Black), 4, 197_281),
        (
            Board::from_diagram(Player::White, Player::White, POSITIONS[1]).unwrap(),
            4,
            43_238,
        ),
    ] {
        group.throughput(criterion::Throughput::Elements(*nodes));
        group.bench_with_input(
            BenchmarkId::new("perft", format!("depth {depth}, nodes {nodes}")),
            depth,
            |b, &depth| {
                b.iter(|| {
                    assert_eq!(perft(board, depth), Ok(*nodes));
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = perft_group;
    config = Criterion::default().sample_size(10);
    targets = perft_bench
}

criterion_main!(movegen, perft_group);
