use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bear_chess::game_state::chess_types::GameState;
use bear_chess::search::board_scoring::PieceSquareScorer;
use bear_chess::search::iterative_deepening::{search, SearchLimits, StopSignal};
use bear_chess::search::transposition_table::TranspositionTable;

const POSITIONS: &[(&str, &str)] = &[
    (
        "startpos",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("rook_endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_fixed_depth_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_fixed_depth");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    for (name, fen) in POSITIONS {
        let game = GameState::from_fen(fen).expect("benchmark FEN should parse");
        for depth in [3u8, 4] {
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{name}_d{depth}")),
                &depth,
                |b, &depth| {
                    b.iter(|| {
                        // Fresh table per run so every sample does the same work.
                        let mut tt = TranspositionTable::new(1 << 16);
                        let result = search(
                            black_box(&game),
                            &PieceSquareScorer,
                            &mut tt,
                            SearchLimits::depth(depth),
                            &StopSignal::new(),
                        );
                        assert_eq!(result.depth, depth);
                        result.nodes
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(search_benches, bench_fixed_depth_search);
criterion_main!(search_benches);
