//! Level-of-detail tile tree construction.
//!
//! Partitions a set of weighted 3D footprints into a hierarchy of square
//! tiles. Each feature is assigned to exactly one tile: the coarsest one
//! whose cell contains its center and that still has room for it. Features
//! are expected in descending importance, so heavier features surface at
//! shallower levels.
//!
//! # Example
//!
//! ```
//! use tile_tree::{FeatureSet, TileTreeBuilder, TilingOptions, WeightedBox};
//!
//! let records = vec![
//!     WeightedBox::new("a", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
//!     WeightedBox::new("b", [40.0, 40.0, 0.0], [42.0, 42.0, 3.0]),
//! ];
//! let set = FeatureSet::from_weighted(records).unwrap();
//!
//! let options = TilingOptions::default().with_capacity(1).with_max_tile_size(100.0);
//! let tree = TileTreeBuilder::new(options).build_set(&set).unwrap();
//!
//! assert_eq!(tree.feature_count(), 2);
//! ```

mod error;
mod extent;
mod feature;
mod options;
mod provider;
pub mod tiling;

pub use error::TilingError;
pub use extent::{
    aggregate_extent, compute_cell_extent, grid_dimension, BoundingBox, BoundingBox3D, MAX_GRID_DIMENSION,
};
pub use feature::Feature;
pub use options::{
    TilingOptions, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH, DEFAULT_MAX_TILE_SIZE, MAX_SUPPORTED_DEPTH,
};
pub use provider::{FeatureSet, WeightedBox};
pub use tiling::{
    CancelFlag, CollectingVisitor, FnVisitor, LevelStats, TileId, TileNode, TileTree,
    TileTreeBuilder, TileVisitor,
};
