use criterion::{criterion_group, criterion_main, Criterion, SamplingMode};
use std::time::Duration;
use uttt_common::games::ultimate_tictactoe::{
    Evaluator, GameState, Move, Player, SearchEngine, SearchLimits,
};

fn fixed_depth(player: Player, depth: u32) -> SearchEngine {
    SearchEngine::new(
        player,
        Evaluator::default(),
        SearchLimits {
            time_budget: Duration::from_secs(600),
            max_depth: Some(depth),
        },
    )
}

fn mid_game_state() -> GameState {
    let moves = [
        Move::new(1, 1, 1, 1), Move::new(1, 1, 0, 0), Move::new(0, 0, 1, 1),
        Move::new(1, 1, 2, 2), Move::new(2, 2, 1, 1), Move::new(1, 1, 0, 2),
        Move::new(0, 2, 1, 1), Move::new(1, 1, 2, 0), Move::new(2, 0, 1, 1),
        Move::new(1, 1, 1, 0), Move::new(1, 0, 0, 0), Move::new(0, 0, 2, 2),
    ];
    let mut state = GameState::new();
    for mv in moves {
        state.apply_move(mv).expect("bench position must be legal");
    }
    state
}

fn bench_depth_four_opening() {
    let state = GameState::new().after_move(Move::new(1, 1, 1, 1)).unwrap();
    fixed_depth(Player::O, 4).choose_move(&state);
}

fn bench_depth_five_mid_game() {
    let state = mid_game_state();
    fixed_depth(state.current_player(), 5).choose_move(&state);
}

fn bench_self_play_10_moves() {
    let mut state = GameState::new();
    for _ in 0..10 {
        let player = state.current_player();
        match fixed_depth(player, 3).choose_move(&state) {
            Some(mv) => state.apply_move(mv).unwrap(),
            None => break,
        }
    }
}

fn search_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    group
        .sampling_mode(SamplingMode::Flat)
        .sample_size(10)
        .measurement_time(Duration::from_secs(120));

    group.bench_function("depth_4_opening", |b| {
        b.iter(bench_depth_four_opening)
    });

    group.bench_function("depth_5_mid_game", |b| {
        b.iter(bench_depth_five_mid_game)
    });

    group.bench_function("self_play_10_moves", |b| {
        b.iter(bench_self_play_10_moves)
    });

    group.finish();
}

criterion_group!(benches, search_bench);
criterion_main!(benches);
