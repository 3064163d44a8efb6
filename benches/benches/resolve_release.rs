// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Size, Vec2};
use understory_swipe::resolver::{exit_target, release_in, resolve};
use understory_swipe::types::{SwipeDirections, Thresholds};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn next_vec2(&mut self, range: f64) -> Vec2 {
        Vec2::new(
            (self.next_f64() - 0.5) * 2.0 * range,
            (self.next_f64() - 0.5) * 2.0 * range,
        )
    }
}

fn gen_releases(count: usize) -> Vec<(Vec2, Vec2)> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| (rng.next_vec2(400.0), rng.next_vec2(1200.0)))
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let thresholds = Thresholds::for_viewport(Size::new(390.0, 844.0));
    for &n in &[256usize, 4096] {
        let releases = gen_releases(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("resolve_n{}", n), |b| {
            b.iter(|| {
                let swipes = releases
                    .iter()
                    .filter(|(t, v)| resolve(*t, *v, &thresholds).is_swipe())
                    .count();
                black_box(swipes);
            })
        });
        group.bench_function(format!("release_masked_exit_n{}", n), |b| {
            let viewport = Size::new(390.0, 844.0);
            b.iter(|| {
                let mut acc = Vec2::ZERO;
                for (t, v) in &releases {
                    let r = release_in(*t, *v, &thresholds, SwipeDirections::HORIZONTAL);
                    if let Some(d) = r.outcome.direction() {
                        acc += exit_target(d, *t, viewport, 1.5);
                    }
                }
                black_box(acc);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
