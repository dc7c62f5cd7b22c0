//! Synthetic building layouts for the visualizer binaries.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tile_tree::WeightedBox;

/// Generates a city of `blocks` x `blocks` street blocks, each filled with
/// a handful of buildings. A few towers get an explicit weight so they
/// rank first regardless of footprint.
pub fn generate_city(blocks: usize, block_size: f64, seed: u64) -> Vec<WeightedBox> {
    let mut rng = StdRng::seed_from_u64(seed);
    let street = block_size * 0.15;
    let mut boxes = Vec::new();

    for by in 0..blocks {
        for bx in 0..blocks {
            let x0 = bx as f64 * block_size + street;
            let y0 = by as f64 * block_size + street;
            let usable = block_size - 2.0 * street;

            let count = rng.random_range(2..9);
            for n in 0..count {
                let w = rng.random_range(0.05..0.4) * usable;
                let h = rng.random_range(0.05..0.4) * usable;
                let x = x0 + rng.random_range(0.0..usable - w);
                let y = y0 + rng.random_range(0.0..usable - h);
                let height = rng.random_range(3.0..40.0);

                let mut record = WeightedBox::new(
                    format!("b{bx}-{by}-{n}"),
                    [x, y, 0.0],
                    [x + w, y + h, height],
                );
                if rng.random_bool(0.02) {
                    record = record.with_weight(w * h * 100.0);
                }
                boxes.push(record);
            }
        }
    }

    boxes
}

/// Generates a sparse background with one very dense cluster around
/// `center`, the layout that drives subdivision to its depth limit.
pub fn generate_hotspot(count: usize, spread: f64, center: [f64; 2], seed: u64) -> Vec<WeightedBox> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut boxes = Vec::with_capacity(count);

    for n in 0..count {
        let (x, y, size) = if n % 10 == 0 {
            (
                rng.random_range(0.0..spread),
                rng.random_range(0.0..spread),
                rng.random_range(5.0..30.0),
            )
        } else {
            (
                center[0] + rng.random_range(-0.5..0.5),
                center[1] + rng.random_range(-0.5..0.5),
                rng.random_range(0.01..0.2),
            )
        };
        boxes.push(WeightedBox::new(
            format!("f{n}"),
            [x, y, 0.0],
            [x + size, y + size, size],
        ));
    }

    boxes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_is_deterministic_and_inside_blocks() {
        let a = generate_city(4, 100.0, 7);
        let b = generate_city(4, 100.0, 7);
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(&b).all(|(a, b)| a.id == b.id && a.xmin == b.xmin));
        assert!(a.iter().all(|r| r.xmin >= 0.0 && r.xmax <= 400.0 && r.ymax <= 400.0));
    }

    #[test]
    fn hotspot_is_mostly_clustered() {
        let boxes = generate_hotspot(200, 1000.0, [500.0, 500.0], 3);
        let clustered = boxes
            .iter()
            .filter(|r| (r.xmin - 500.0).abs() <= 0.5 && (r.ymin - 500.0).abs() <= 0.5)
            .count();
        assert_eq!(boxes.len(), 200);
        assert!(clustered >= 180);
    }
}
