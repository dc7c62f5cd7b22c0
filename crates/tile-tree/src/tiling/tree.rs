//! Tile tree container and whole-tree queries.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Feature};

use super::node::{Nodes, TileId, TileNode};
use super::visitor::TileVisitor;

/// Node and feature counts for one level of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    pub level: u32,
    pub tiles: usize,
    pub features: usize,
}

/// A level-of-detail tile tree.
///
/// The tree is built once by a [`TileTreeBuilder`](super::TileTreeBuilder)
/// and is read-only afterwards. Consumers walk it depth-first, either with
/// [`iter`](Self::iter) or with a [`TileVisitor`]:
///
/// ```ignore
/// tree.traverse(&mut encoder_visitor);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TileTree {
    root: TileNode,
}

impl TileTree {
    pub(crate) fn from_root(root: TileNode) -> Self {
        Self { root }
    }

    /// Creates a tree with no tiles covering the given extent.
    pub fn empty(extent: BoundingBox) -> Self {
        Self::from_root(TileNode::root(extent, Vec::new()))
    }

    /// Returns the aggregating root node.
    #[inline]
    pub fn root(&self) -> &TileNode {
        &self.root
    }

    /// The overall extent the top-level grid was laid over.
    #[inline]
    pub fn extent(&self) -> &BoundingBox {
        self.root.extent()
    }

    /// Returns `true` if the tree contains no tiles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }

    /// Returns the total number of features in the tree.
    pub fn feature_count(&self) -> usize {
        self.root.feature_count()
    }

    /// Returns the number of nodes, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Returns the number of tiles, not counting the root.
    pub fn tile_count(&self) -> usize {
        self.root.node_count() - 1
    }

    /// Returns the number of tile levels (0 for an empty tree).
    pub fn depth(&self) -> usize {
        self.root.depth() - 1
    }

    /// Iterates over all nodes depth-first, starting with the root at depth 0.
    pub fn iter(&self) -> Nodes<'_> {
        self.root.iter()
    }

    /// Iterates over tiles only, skipping the root.
    pub fn tiles(&self) -> impl Iterator<Item = &TileNode> + '_ {
        self.iter().skip(1).map(|(node, _)| node)
    }

    /// Traverses the tree depth-first in pre-order.
    ///
    /// The visitor sees the root first (depth 0), then each top-level tile
    /// followed by its refinements.
    pub fn traverse<V: TileVisitor>(&self, visitor: &mut V) {
        for (node, depth) in self.iter() {
            visitor.visit(node, depth);
        }
    }

    /// Returns the address of the tile holding the given feature.
    pub fn find_feature(&self, id: &str) -> Option<TileId> {
        self.tiles()
            .find(|node| node.features().iter().any(|f| f.id() == id))
            .and_then(TileNode::tile)
    }

    /// Collects every feature in the tree, in traversal order.
    pub fn collect_features(&self) -> Vec<Feature> {
        let mut result = Vec::with_capacity(self.feature_count());
        for (node, _) in self.iter() {
            result.extend(node.features().iter().cloned());
        }
        result
    }

    /// Returns tile and feature counts per level, shallowest first.
    pub fn level_stats(&self) -> Vec<LevelStats> {
        let mut stats: Vec<LevelStats> = Vec::new();
        for node in self.tiles() {
            let Some(tile) = node.tile() else { continue };
            let level = tile.level as usize;
            if stats.len() <= level {
                stats.extend((stats.len()..=level).map(|l| LevelStats {
                    level: l as u32,
                    tiles: 0,
                    features: 0,
                }));
            }
            stats[level].tiles += 1;
            stats[level].features += node.features().len();
        }
        stats
    }

    /// Returns the leaves that were cut off by the depth limit.
    pub fn overflow_tiles(&self) -> impl Iterator<Item = &TileNode> + '_ {
        self.tiles().filter(|node| node.is_overflow())
    }
}
