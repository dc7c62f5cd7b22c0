//! Tile tree node implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Feature};

/// Address of a tile in the hierarchy.
///
/// Top-level grid cell `(x, y)` has level 0. Quadrant `(i, j)` of tile
/// `(x, y)` at level `l` is `(2x + i, 2y + j)` at level `l + 1`, so the
/// coordinates of a level always form one uniform grid over the extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    pub level: u32,
    pub x: u64,
    pub y: u64,
}

impl TileId {
    pub fn new(level: u32, x: u64, y: u64) -> Self {
        Self { level, x, y }
    }

    /// Address of quadrant `(i, j)` of this tile.
    #[inline]
    pub fn child(&self, i: usize, j: usize) -> TileId {
        debug_assert!(i < 2 && j < 2, "quadrant index out of range");
        TileId {
            level: self.level + 1,
            x: self.x * 2 + i as u64,
            y: self.y * 2 + j as u64,
        }
    }

    /// Address of the enclosing tile, `None` for top-level tiles.
    pub fn parent(&self) -> Option<TileId> {
        (self.level > 0).then(|| TileId {
            level: self.level - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.x, self.y)
    }
}

/// A node in the tile tree.
///
/// A node is either a leaf holding at most `capacity` features, or an
/// internal node holding the `capacity` most important features of its cell
/// with non-empty children covering the rest. The root is a pure aggregator:
/// it has no features and no address, only top-level tiles as children.
///
/// # Overflow leaves
///
/// A cell that still overflows at the configured maximum depth is emitted as
/// a leaf holding all of its features. Such leaves report
/// [`is_overflow`](Self::is_overflow) and are the only nodes that may exceed
/// the capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct TileNode {
    /// Tile address, `None` for the root.
    tile: Option<TileId>,

    /// Spatial cell covered by this node.
    extent: BoundingBox,

    /// Features assigned directly to this node, most important first.
    features: Vec<Feature>,

    /// Non-empty refining tiles, in row-major order.
    children: Vec<TileNode>,

    overflow: bool,
}

impl TileNode {
    pub(crate) fn root(extent: BoundingBox, children: Vec<TileNode>) -> Self {
        Self {
            tile: None,
            extent,
            features: Vec::new(),
            children,
            overflow: false,
        }
    }

    pub(crate) fn new(
        tile: TileId,
        extent: BoundingBox,
        features: Vec<Feature>,
        children: Vec<TileNode>,
    ) -> Self {
        Self {
            tile: Some(tile),
            extent,
            features,
            children,
            overflow: false,
        }
    }

    pub(crate) fn overflow_leaf(tile: TileId, extent: BoundingBox, features: Vec<Feature>) -> Self {
        Self {
            tile: Some(tile),
            extent,
            features,
            children: Vec::new(),
            overflow: true,
        }
    }

    #[inline]
    pub fn tile(&self) -> Option<TileId> {
        self.tile
    }

    #[inline]
    pub fn extent(&self) -> &BoundingBox {
        &self.extent
    }

    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[inline]
    pub fn children(&self) -> &[TileNode] {
        &self.children
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.tile.is_none()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this leaf was cut off by the depth limit and may
    /// hold more features than the capacity.
    #[inline]
    pub fn is_overflow(&self) -> bool {
        self.overflow
    }

    /// Returns the total number of features in this subtree.
    pub fn feature_count(&self) -> usize {
        self.features.len()
            + self
                .children
                .iter()
                .map(TileNode::feature_count)
                .sum::<usize>()
    }

    /// Returns the number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TileNode::node_count).sum::<usize>()
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TileNode::depth).max().unwrap_or(0)
    }

    /// Iterates over this node and all descendants in depth-first
    /// pre-order, yielding each node with its depth relative to `self`.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![(self, 0)],
        }
    }
}

/// Depth-first pre-order iterator over a subtree, see [`TileNode::iter`].
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    stack: Vec<(&'a TileNode, usize)>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (&'a TileNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundingBox3D;

    fn feature(id: &str) -> Feature {
        BoundingBox3D::new(id, [0.0; 3], [1.0; 3]).into()
    }

    fn cell() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn tile_id_child_and_parent() {
        let id = TileId::new(2, 3, 5);
        let child = id.child(1, 0);

        assert_eq!(child, TileId::new(3, 7, 10));
        assert_eq!(child.parent(), Some(id));
        assert_eq!(TileId::new(0, 4, 4).parent(), None);
        assert_eq!(id.to_string(), "2/3/5");
    }

    #[test]
    fn root_is_empty_aggregator() {
        let root = TileNode::root(cell(), Vec::new());

        assert!(root.is_root());
        assert!(root.is_leaf());
        assert_eq!(root.feature_count(), 0);
        assert_eq!(root.node_count(), 1);
        assert_eq!(root.depth(), 1);
    }

    #[test]
    fn counts_are_recursive() {
        let id = TileId::new(0, 0, 0);
        let grandchild = TileNode::new(id.child(0, 0).child(1, 1), cell(), vec![feature("d")], Vec::new());
        let child = TileNode::new(id.child(0, 0), cell(), vec![feature("c")], vec![grandchild]);
        let top = TileNode::new(id, cell(), vec![feature("a"), feature("b")], vec![child]);
        let root = TileNode::root(cell(), vec![top]);

        assert_eq!(root.feature_count(), 4);
        assert_eq!(root.node_count(), 4);
        assert_eq!(root.depth(), 4);
        assert!(!root.children()[0].is_leaf());
    }

    #[test]
    fn iter_is_preorder_with_depth() {
        let a = TileId::new(0, 0, 0);
        let b = TileId::new(0, 1, 0);
        let a_child = TileNode::new(a.child(0, 0), cell(), vec![feature("a1")], Vec::new());
        let root = TileNode::root(
            cell(),
            vec![
                TileNode::new(a, cell(), vec![feature("a0")], vec![a_child]),
                TileNode::new(b, cell(), vec![feature("b0")], Vec::new()),
            ],
        );

        let visited: Vec<(Option<TileId>, usize)> =
            root.iter().map(|(node, depth)| (node.tile(), depth)).collect();

        assert_eq!(
            visited,
            vec![
                (None, 0),
                (Some(a), 1),
                (Some(a.child(0, 0)), 2),
                (Some(b), 1),
            ]
        );
    }

    #[test]
    fn overflow_leaf_is_flagged() {
        let leaf = TileNode::overflow_leaf(TileId::new(5, 0, 0), cell(), vec![feature("a"), feature("b")]);
        assert!(leaf.is_overflow());
        assert!(leaf.is_leaf());
    }
}
