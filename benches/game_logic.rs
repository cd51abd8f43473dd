use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{get_spawn_shape, Engine, EngineConfig, Grid, RandomSource};
use blockfall::types::{DropOrigin, PieceKind};

fn bench_line_clear(c: &mut Criterion) {
    let mut grid = Grid::new(10, 25);
    // Fill bottom 4 rows
    for y in 21..25 {
        for x in 0..10 {
            grid.set(x, y, 1);
        }
    }

    c.bench_function("clear_4_lines", |b| {
        b.iter(|| black_box(&grid).clear_full_rows())
    });
}

fn bench_intersects(c: &mut Criterion) {
    let grid = Grid::new(10, 25);
    let shape = get_spawn_shape(PieceKind::T);

    c.bench_function("intersects", |b| {
        b.iter(|| grid.intersects(black_box(&shape), black_box(4), black_box(10)))
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut engine = Engine::new(EngineConfig::default(), RandomSource::new(12345)).unwrap();

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            if engine.is_game_over() {
                engine.new_game();
            }
            black_box(engine.hard_drop());
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let mut engine = Engine::new(EngineConfig::default(), RandomSource::new(12345)).unwrap();

    // Each move recomputes the ghost
    c.bench_function("move_with_ghost", |b| {
        b.iter(|| {
            if !engine.move_right() {
                while engine.move_left() {}
            }
        })
    });
}

fn bench_soft_drop(c: &mut Criterion) {
    let mut engine = Engine::new(EngineConfig::default(), RandomSource::new(12345)).unwrap();

    c.bench_function("soft_drop_tick", |b| {
        b.iter(|| {
            if engine.is_game_over() {
                engine.new_game();
            }
            black_box(engine.soft_drop(DropOrigin::Timer));
        })
    });
}

criterion_group!(
    benches,
    bench_line_clear,
    bench_intersects,
    bench_hard_drop,
    bench_try_move,
    bench_soft_drop
);
criterion_main!(benches);
