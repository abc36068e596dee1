use criterion::*;

use oxono_ai::rules::{find_winning_line, valid_moves};
use oxono_ai::{test_positions, AIConfig, MatchState, MinimaxAI, Symbol};

fn criterion_move_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    for (name, notation) in [
        ("start", test_positions::START),
        ("start_8", test_positions::START_8),
        ("threat", test_positions::THREAT),
    ] {
        let mut state = MatchState::from_notation(notation).unwrap();
        group.bench_function(BenchmarkId::new("totem", name), |b| {
            b.iter(|| valid_moves(black_box(state.board()), Symbol::O))
        });
        group.bench_function(BenchmarkId::new("candidates", name), |b| {
            b.iter(|| black_box(state.candidate_moves()))
        });
    }

    group.finish();
}

fn criterion_win_scan(c: &mut Criterion) {
    let state = MatchState::from_notation(test_positions::FULL_BUT_ONE).unwrap();
    c.bench_function("win_scan", |b| {
        b.iter(|| find_winning_line(black_box(state.board())))
    });
}

fn criterion_minimax(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");
    group.sample_size(10);

    for depth in 1..4 {
        let ai = MinimaxAI::new(&AIConfig {
            depth,
            ..Default::default()
        });
        let mut state = MatchState::from_notation(test_positions::SMALL_1).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| ai.best_move(black_box(&mut state)))
        });
    }

    group.finish();
}

criterion_group! {
    name = search;
    config = Criterion::default();
    targets = criterion_move_generation, criterion_win_scan, criterion_minimax
}

criterion_main!(search);
