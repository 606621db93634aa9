// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Point;
use understory_drilldown::{LayoutConfig, Node, NodeId, Scene, SceneConfig, Tree, layout};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn weight(&mut self) -> f64 {
        1.0 + f64::from(self.next_u32() % 1000) / 100.0
    }
}

/// Three-level forest with `fanout` children per node (more than nine
/// exercises the sibling cut).
fn forest(fanout: usize, seed: u64) -> Vec<Node> {
    let mut rng = Lcg::new(seed);
    let level = |depth: u32, rng: &mut Lcg| -> Vec<Node> {
        (0..fanout)
            .map(|i| Node::new(format!("n{depth}_{i}"), rng.weight()).with_level(depth))
            .collect()
    };
    let mut roots = level(1, &mut rng);
    for root in &mut roots {
        let mut mid = level(2, &mut rng);
        for node in &mut mid {
            node.children = level(3, &mut rng);
        }
        root.children = mid;
    }
    roots
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("drilldown/layout");
    let config = LayoutConfig::default();

    for fanout in [3_usize, 9, 16] {
        let tree = Tree::from_nodes(forest(fanout, 0x5eed));
        group.throughput(Throughput::Elements(tree.node_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fanout), &tree, |b, tree| {
            b.iter(|| black_box(layout(tree.roots(), &config)));
        });
    }

    group.finish();
}

fn bench_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("drilldown/edit");

    for fanout in [3_usize, 9] {
        let scene = Scene::new(forest(fanout, 7), SceneConfig::default())
            .expect("three levels are mapped");
        group.bench_with_input(
            BenchmarkId::new("add_then_remove", fanout),
            &scene,
            |b, scene| {
                b.iter_batched(
                    || {
                        let mut scene = scene.clone();
                        scene.click(NodeId::new(1));
                        scene
                    },
                    |mut scene| {
                        let _ = scene.add_node(5.0, "added");
                        let _ = scene.remove_node(0);
                        black_box(scene);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("drilldown/navigation");
    let scene =
        Scene::new(forest(9, 11), SceneConfig::default()).expect("three levels are mapped");

    group.bench_function("drill_and_back", |b| {
        b.iter_batched(
            || scene.clone(),
            |mut scene| {
                // The heaviest child always sits under the view center.
                let center = Point::new(400.0, 300.0);
                scene.click_at(center);
                scene.click_at(center);
                scene.click_background();
                scene.click_background();
                black_box(scene);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("hit_test_grid", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for y in (0..600).step_by(20) {
                for x in (0..800).step_by(20) {
                    hits += usize::from(
                        scene
                            .hit_test(Point::new(f64::from(x), f64::from(y)))
                            .is_some(),
                    );
                }
            }
            black_box(hits)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_layout, bench_edit, bench_navigation);
criterion_main!(benches);
