// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drill-down walkthrough.
//!
//! Load the bundled catalog, drill two levels in by clicking at the view
//! center, add and remove nodes in the active scope, then back out.
//!
//! Run:
//! - `cargo run -p understory_drilldown_demos --example drilldown_walkthrough`
//! - `RUST_LOG=trace cargo run -p understory_drilldown_demos --example drilldown_walkthrough`

use kurbo::Point;
use understory_drilldown::{Scene, SceneConfig};
use understory_drilldown_demos::{CATALOG_JSON, init_tracing, load_nodes, print_visible};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let nodes = load_nodes(CATALOG_JSON)?;
    let mut scene = Scene::new(nodes, SceneConfig::default())?;
    println!("{} circles laid out", scene.layout().len());
    print_visible(&scene);

    // The heaviest member of every scope sits in the center slot.
    let center = Point::new(400.0, 300.0);
    for _ in 0..2 {
        if let Some(step) = scene.click_at(center) {
            println!("\n{:?} -> scope {:?}", step.action, step.scope);
        }
        print_visible(&scene);
    }

    if let Some(id) = scene.add_node(4.0, "bmw-i4")? {
        println!("\nadded {id:?}");
    }
    if let Some(removed) = scene.remove_node(1)? {
        println!("removed {:?}", removed.name);
    }
    print_visible(&scene);

    while !scene.scope().is_root() {
        let step = scene.click_background();
        println!("\nbackground -> scope {:?}", step.scope);
    }
    print_visible(&scene);

    Ok(())
}
