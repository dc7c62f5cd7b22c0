use macroquad::prelude::*;
use tile_tree::{FeatureSet, TileTreeBuilder, TilingOptions};
use tile_viz::scene::generate_city;
use tile_viz::{MapCamera, TreeNavigator};

#[macroquad::main("Tile Tree City")]
async fn main() {
    println!("Generating city...");
    let records = generate_city(12, 250.0, 42);

    let set = match FeatureSet::from_weighted(records) {
        Ok(set) => set,
        Err(err) => {
            eprintln!("invalid scene: {err}");
            return;
        }
    };
    println!("Created {} buildings", set.len());

    let options = TilingOptions::default()
        .with_capacity(12)
        .with_max_tile_size(1000.0)
        .with_parallel(true);
    let tree = match TileTreeBuilder::new(options.clone()).build_set(&set) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("tiling failed: {err}");
            return;
        }
    };
    println!(
        "Tile tree built: {} tiles, depth {}",
        tree.tile_count(),
        tree.depth()
    );

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
            &format!("Tile Tree City - {} buildings in {} tiles", tree.feature_count(), tree.tile_count()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Depth: {} | capacity {} | top-level size {}",
                tree.depth(),
                options.capacity,
                options.max_tile_size
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(&tree, 70.0);

        draw_text(&format!("FPS: {}", get_fps()), 10.0, screen_height() - 10.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
