//! JSON report describing a built tile tree.
//!
//! This is an inspection format for people and scripts, not a tileset
//! manifest.

use serde::Serialize;
use tile_tree::{BoundingBox, FeatureSet, LevelStats, TileId, TileNode, TileTree, TilingOptions};

#[derive(Debug, Serialize)]
pub struct Report {
    /// Features read from the input.
    pub features: usize,
    /// Features that ended up in a tile.
    pub placed: usize,
    pub tiles: usize,
    pub depth: usize,
    pub extent: BoundingBox,
    pub options: TilingOptions,
    pub levels: Vec<LevelStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overflow_tiles: Vec<TileId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<TileOutline>>,
}

/// One tile with its features and refinements.
#[derive(Debug, Serialize)]
pub struct TileOutline {
    pub tile: TileId,
    pub extent: BoundingBox,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub overflow: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TileOutline>,
}

impl TileOutline {
    fn from_children(node: &TileNode) -> Vec<TileOutline> {
        node.children().iter().filter_map(TileOutline::from_node).collect()
    }

    fn from_node(node: &TileNode) -> Option<TileOutline> {
        Some(TileOutline {
            tile: node.tile()?,
            extent: *node.extent(),
            features: node.features().iter().map(|f| f.id().to_owned()).collect(),
            overflow: node.is_overflow(),
            children: Self::from_children(node),
        })
    }
}

impl Report {
    pub fn new(set: &FeatureSet, tree: &TileTree, options: &TilingOptions, outline: bool) -> Self {
        Self {
            features: set.len(),
            placed: tree.feature_count(),
            tiles: tree.tile_count(),
            depth: tree.depth(),
            extent: *tree.extent(),
            options: options.clone(),
            levels: tree.level_stats(),
            overflow_tiles: tree.overflow_tiles().filter_map(TileNode::tile).collect(),
            outline: outline.then(|| TileOutline::from_children(tree.root())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_tree::{TileTreeBuilder, WeightedBox};

    fn sample() -> (FeatureSet, TileTree, TilingOptions) {
        let set = FeatureSet::from_weighted(vec![
            WeightedBox::new("big", [0.0, 0.0, 0.0], [20.0, 20.0, 5.0]),
            WeightedBox::new("small", [2.0, 2.0, 0.0], [3.0, 3.0, 1.0]),
            WeightedBox::new("east", [150.0, 5.0, 0.0], [152.0, 7.0, 1.0]),
        ])
        .unwrap();
        let options = TilingOptions::default().with_capacity(1).with_max_tile_size(100.0);
        let tree = TileTreeBuilder::new(options.clone()).build_set(&set).unwrap();
        (set, tree, options)
    }

    #[test]
    fn summary_counts() {
        let (set, tree, options) = sample();
        let report = Report::new(&set, &tree, &options, false);

        assert_eq!(report.features, 3);
        assert_eq!(report.placed, 3);
        assert_eq!(report.tiles, 3);
        assert_eq!(report.depth, 2);
        assert!(report.overflow_tiles.is_empty());
        assert!(report.outline.is_none());
    }

    #[test]
    fn outline_mirrors_tree() {
        let (set, tree, options) = sample();
        let report = Report::new(&set, &tree, &options, true);
        let outline = report.outline.unwrap();

        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].tile, TileId::new(0, 0, 0));
        assert_eq!(outline[0].features, vec!["big"]);
        assert_eq!(outline[0].children[0].features, vec!["small"]);
        assert_eq!(outline[1].features, vec!["east"]);
    }

    #[test]
    fn serializes_without_empty_fields() {
        let (set, tree, options) = sample();
        let json = serde_json::to_value(Report::new(&set, &tree, &options, true)).unwrap();

        assert_eq!(json["tiles"], 3);
        assert!(json.get("overflow_tiles").is_none());
        assert!(json["outline"][1].get("children").is_none());
        assert!(json["outline"][1].get("overflow").is_none());
        assert_eq!(json["levels"][1]["features"], 1);
    }
}
