// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Vec2;
use understory_card_stack::{CardStack, Deck, NoObserver, StackConfig, StackInput};

const FRAME: StackInput = StackInput::Frame {
    dt: Duration::from_millis(16),
};

fn new_stack(n: u32) -> CardStack<u32, NoObserver> {
    CardStack::new((0..n).collect::<Deck<u32>>(), NoObserver, StackConfig::default())
        .expect("default config is valid")
}

fn swipe_all(stack: &mut CardStack<u32, NoObserver>) -> usize {
    let mut frames = 0;
    while stack.has_more() {
        let session = stack.session_id();
        stack.handle(StackInput::GestureBegan { session });
        stack.handle(StackInput::GestureEnded {
            session,
            translation: Vec2::new(-200.0, 0.0),
            velocity: Vec2::ZERO,
        });
        while !stack.is_settled() {
            black_box(stack.handle(FRAME));
            frames += 1;
        }
    }
    frames
}

fn bench_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack");
    for &n in &[16u32, 128] {
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("swipe_through_n{}", n), |b| {
            b.iter_batched(
                || new_stack(n),
                |mut stack| black_box(swipe_all(&mut stack)),
                BatchSize::SmallInput,
            )
        });
    }

    group.bench_function("drag_and_layout_frame", |b| {
        let mut stack = new_stack(8);
        let session = stack.session_id();
        stack.handle(StackInput::GestureBegan { session });
        let mut x = 0.0;
        b.iter(|| {
            x = (x + 3.0) % 90.0;
            stack.handle(StackInput::GestureMoved {
                session,
                translation: Vec2::new(x, x * 0.25),
            });
            let layers = stack.layers();
            black_box(layers.len());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_stack);
criterion_main!(benches);
