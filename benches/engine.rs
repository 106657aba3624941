use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folha::engine::perft;
use folha::moves::{generate_pseudo_legal_moves, init_magic_bitboards, All, MoveList};
use folha::search::{Search, SearchConfig, SearchLimits};
use folha::{GameHistory, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_movegen(c: &mut Criterion) {
    init_magic_bitboards();

    for (name, fen) in [("startpos", folha::STARTPOS_FEN), ("kiwipete", KIWIPETE)] {
        let pos = Position::from_fen(fen).expect("FEN válido");
        c.bench_function(&format!("movegen_{}", name), |b| {
            b.iter(|| {
                let mut list = MoveList::new();
                generate_pseudo_legal_moves::<All>(black_box(&pos), &mut list);
                list.len()
            });
        });
    }
}

fn bench_perft(c: &mut Criterion) {
    init_magic_bitboards();

    c.bench_function("perft_startpos_4", |b| {
        let mut pos = Position::startpos();
        b.iter(|| perft(black_box(&mut pos), 4));
    });

    c.bench_function("perft_kiwipete_3", |b| {
        let mut pos = Position::from_fen(KIWIPETE).expect("FEN válido");
        b.iter(|| perft(black_box(&mut pos), 3));
    });
}

fn bench_search(c: &mut Criterion) {
    init_magic_bitboards();

    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for (name, fen) in [("startpos", folha::STARTPOS_FEN), ("kiwipete", KIWIPETE)] {
        let pos = Position::from_fen(fen).expect("FEN válido");
        group.bench_function(format!("depth5_{}", name), |b| {
            let mut search = Search::with_config(SearchConfig { hash_mb: 16, ..SearchConfig::default() });
            b.iter(|| {
                search.new_game();
                search.best_move(black_box(&pos), &GameHistory::new(), &SearchLimits::depth(5))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_movegen, bench_perft, bench_search);
criterion_main!(benches);
