use criterion::{black_box, criterion_group, criterion_main, Criterion};
use contrast_tetris::core::{Board, GameEngine, GameSnapshot, PieceFactory};
use contrast_tetris::term::{FrameBuffer, GameView, Viewport};
use contrast_tetris::types::{ColorSpec, ContrastVariant, Rgb};

fn bench_advance(c: &mut Criterion) {
    let mut engine = GameEngine::with_seed(12345);
    let _ = engine.start();

    c.bench_function("advance_16ms", |b| {
        b.iter(|| {
            engine.advance(black_box(16));
            while engine.poll_event().is_some() {}
            if engine.is_game_over() {
                let _ = engine.reset();
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new(10, 20);
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.fill(x, y, ColorSpec::solid(Rgb::WHITE), None);
                }
            }
            let rows = board.full_rows();
            board.clear_and_collapse(black_box(&rows));
        })
    });
}

fn bench_piece_factory(c: &mut Criterion) {
    let mut factory = PieceFactory::default();

    c.bench_function("factory_next_striped", |b| {
        b.iter(|| factory.next(black_box(ContrastVariant::VeryHighContrast), 0))
    });
}

fn bench_move_and_rotate(c: &mut Criterion) {
    let mut engine = GameEngine::with_seed(12345);
    let _ = engine.start();

    c.bench_function("move_rotate", |b| {
        b.iter(|| {
            let _ = engine.move_right();
            let _ = engine.rotate();
            let _ = engine.move_left();
            while engine.poll_event().is_some() {}
        })
    });
}

fn bench_snapshot_render(c: &mut Criterion) {
    let mut engine = GameEngine::with_seed(12345);
    let _ = engine.start();
    let mut snap = GameSnapshot::default();
    let viewport = Viewport::new(80, 50);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    c.bench_function("snapshot_into_render_into", |b| {
        b.iter(|| {
            engine.snapshot_into(&mut snap);
            GameView::fit(viewport, snap.cols, snap.rows).render_into(&snap, viewport, &mut fb);
            black_box(&fb);
        })
    });
}

criterion_group!(
    benches,
    bench_advance,
    bench_line_clear,
    bench_piece_factory,
    bench_move_and_rotate,
    bench_snapshot_render
);
criterion_main!(benches);
