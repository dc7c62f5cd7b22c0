//! Level-of-detail tile tree.
//!
//! Space is covered by a grid of square top-level tiles. Each tile keeps the
//! first `capacity` features whose center it contains, in importance order,
//! and pushes the rest down into its four quadrants, recursively:
//!
//! - Coarse tiles carry the heaviest features and are loaded first
//! - Finer tiles refine only the areas that actually need it
//! - Every feature lives in exactly one tile
//!
//! # Example
//!
//! ```
//! use tile_tree::{BoundingBox, BoundingBox3D, Feature, TileTreeBuilder, TilingOptions};
//! use tile_tree::tiling::CollectingVisitor;
//!
//! let features: Vec<Feature> = (0..8)
//!     .map(|i| {
//!         let x = i as f64 * 10.0;
//!         BoundingBox3D::new(format!("f{i}"), [x, 0.0, 0.0], [x + 1.0, 1.0, 1.0]).into()
//!     })
//!     .collect();
//! let extent = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
//!
//! let builder = TileTreeBuilder::new(TilingOptions::default().with_capacity(2).with_max_tile_size(100.0));
//! let tree = builder.build(&features, &extent).unwrap();
//!
//! // Walk tiles depth-first, the order an encoder writes them in
//! let mut visitor = CollectingVisitor::new();
//! tree.traverse(&mut visitor);
//! assert_eq!(visitor.ids().len(), 8);
//! ```
//!
//! # Architecture
//!
//! - [`TileTreeBuilder`]: validates parameters and partitions features
//! - [`TileTree`]: owns the root and answers whole-tree queries
//! - [`TileNode`]: one tile with its cell, features and refining children
//! - [`TileVisitor`]: visitor trait for depth-first traversal

mod builder;
mod node;
mod tree;
mod visitor;

pub use builder::{CancelFlag, TileTreeBuilder};
pub use node::{Nodes, TileId, TileNode};
pub use tree::{LevelStats, TileTree};
pub use visitor::{CollectingVisitor, FnVisitor, TileVisitor};
