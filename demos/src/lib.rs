// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the drill-down demos.

use understory_drilldown::{Node, Scene};

/// The bundled sample hierarchy.
pub const CATALOG_JSON: &str = include_str!("../data/catalog.json");

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `debug`).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    // A second call (another demo in the same process) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Parses a hierarchy in the `[{ name, weight, level, children? }]` shape.
pub fn load_nodes(json: &str) -> Result<Vec<Node>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Prints the circles visible under the active scope.
pub fn print_visible(scene: &Scene) {
    println!("scope {:?}:", scene.scope());
    for id in scene.visible_ids() {
        if let Some(c) = scene.layout().circle(*id) {
            println!(
                "  {:>10} r={:<7} at ({:.0}, {:.0}) fill #{:06x}",
                c.name,
                c.radius,
                c.center.x,
                c.center.y,
                c.fill()
            );
        }
    }
    let t = scene.camera_transform();
    println!(
        "  camera: scale {:.5}, translate ({:.1}, {:.1}), {} ms, gen {}",
        t.scale,
        t.translate.x,
        t.translate.y,
        t.duration.as_millis(),
        t.generation
    );
}
