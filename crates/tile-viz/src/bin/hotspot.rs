use macroquad::prelude::*;
use tile_tree::{FeatureSet, TileTreeBuilder, TilingOptions};
use tile_viz::scene::generate_hotspot;
use tile_viz::{MapCamera, TreeNavigator};

#[macroquad::main("Tile Tree Hotspot")]
async fn main() {
    println!("Generating hotspot scene...");
    let records = generate_hotspot(3000, 2000.0, [700.0, 1300.0], 9);

    let set = match FeatureSet::from_weighted(records) {
        Ok(set) => set,
        Err(err) => {
            eprintln!("invalid scene: {err}");
            return;
        }
    };

    // Shallow depth limit so the cluster ends in overflow leaves.
    let options = TilingOptions::default()
        .with_capacity(20)
        .with_max_tile_size(1000.0)
        .with_max_depth(5);
    let tree = match TileTreeBuilder::new(options).build_set(&set) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("tiling failed: {err}");
            return;
        }
    };
    let overflow: Vec<_> = tree.overflow_tiles().collect();
    println!(
        "Tile tree built: {} tiles, depth {}, {} overflow leaves",
        tree.tile_count(),
        tree.depth(),
        overflow.len()
    );
    for node in &overflow {
        if let Some(id) = node.tile() {
            println!("  overflow {id}: {} features", node.features().len());
        }
    }

    let mut camera = MapCamera::fit(tree.extent());
    let mut navigator = TreeNavigator::new();

    loop {
        camera.update();
        navigator.update(&tree);

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera2d());

        navigator.render(&tree, camera.pixel_size());

        set_default_camera();

        draw_text(
            &format!("Tile Tree Hotspot - {} features", tree.feature_count()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!("Depth: {} | Overflow leaves: {}", tree.depth(), overflow.len()),
            10.0,
            45.0,
            18.0,
            if overflow.is_empty() { GRAY } else { RED },
        );

        navigator.draw_ui(&tree, 70.0);

        next_frame().await
    }
}
