//! Visitor pattern for tile tree traversal.
//!
//! Visitors let consumers such as tile encoders process nodes in the
//! tree's depth-first order without owning the traversal logic.

use super::node::TileNode;

/// Visitor for processing nodes during tile tree traversal.
///
/// Common uses include:
/// - Encoding one payload per tile
/// - Writing a manifest entry per tile
/// - Collecting statistics
pub trait TileVisitor {
    /// Called once per node in depth-first pre-order.
    ///
    /// `depth` is 0 for the root, 1 for top-level tiles, and increases by one
    /// per subdivision.
    fn visit(&mut self, node: &TileNode, depth: usize);
}

/// A simple visitor that collects the ids of all visited features.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<String>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected ids.
    pub fn into_ids(self) -> Vec<String> {
        self.collected
    }

    /// Returns a reference to the collected ids.
    pub fn ids(&self) -> &[String] {
        &self.collected
    }
}

impl TileVisitor for CollectingVisitor {
    fn visit(&mut self, node: &TileNode, _depth: usize) {
        self.collected
            .extend(node.features().iter().map(|f| f.id().to_owned()));
    }
}

/// A visitor that calls a closure for each node.
pub struct FnVisitor<F>
where
    F: FnMut(&TileNode, usize),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&TileNode, usize),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> TileVisitor for FnVisitor<F>
where
    F: FnMut(&TileNode, usize),
{
    fn visit(&mut self, node: &TileNode, depth: usize) {
        (self.func)(node, depth);
    }
}
