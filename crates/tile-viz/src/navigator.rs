//! Tile tree navigation utilities for interactive visualization.

use macroquad::prelude::*;
use tile_tree::{TileNode, TileTree};

use crate::{draw_cell, draw_footprint, level_color};

/// Number keys select children; the root can have more, but only the
/// first nine are reachable from the keyboard.
const CHILD_KEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

/// Interactive tile tree navigator for exploring the hierarchy.
pub struct TreeNavigator {
    path: Vec<usize>,
}

impl Default for TreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Returns the child indices taken from the root.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to navigate to the given child. Returns true if successful.
    pub fn go_child(&mut self, tree: &TileTree, index: usize) -> bool {
        let exists = self
            .current_node(tree)
            .is_some_and(|node| index < node.children().len());
        if exists {
            self.path.push(index);
        }
        exists
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Returns to the root node.
    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self, tree: &TileTree) -> bool {
        let mut changed = false;

        for (index, key) in CHILD_KEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                changed |= self.go_child(tree, index);
            }
        }
        if is_key_pressed(KeyCode::P) {
            changed |= self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// Returns the node at the current path, or None if the tree changed
    /// underneath the navigator.
    pub fn current_node<'a>(&self, tree: &'a TileTree) -> Option<&'a TileNode> {
        get_node_at_path(tree.root(), &self.path)
    }

    /// Renders the features and tile outlines of the current subtree.
    /// Footprints are drawn coarse-to-fine so detail tiles end up on top.
    pub fn render(&self, tree: &TileTree, pixel_size: f32) {
        let Some(node) = self.current_node(tree) else {
            return;
        };
        for (tile, _) in node.iter() {
            for feature in tile.features() {
                draw_footprint(feature, pixel_size * 2.0);
            }
        }
        for (tile, _) in node.iter() {
            if let Some(id) = tile.tile() {
                let color = if tile.is_overflow() { RED } else { level_color(id.level) };
                draw_cell(tile.extent(), pixel_size * 1.5, color);
            }
        }
        if !node.is_root() {
            draw_cell(node.extent(), pixel_size * 4.0, YELLOW);
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, tree: &TileTree, y_offset: f32) {
        let (label, own, subtree, children, is_leaf, is_overflow) = match self.current_node(tree) {
            Some(node) => (
                node.tile().map_or_else(|| "root".to_string(), |id| id.to_string()),
                node.features().len(),
                node.feature_count(),
                node.children().len(),
                node.is_leaf(),
                node.is_overflow(),
            ),
            None => ("?".to_string(), 0, 0, 0, true, false),
        };

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|i| (i + 1).to_string())
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(
            &format!("Tile {}: {} own / {} in subtree", label, own, subtree),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        let status = if is_overflow {
            "Overflow leaf (depth limit)".to_string()
        } else if is_leaf {
            "(leaf)".to_string()
        } else {
            format!("Children: [1-{}]", children.min(CHILD_KEYS.len()))
        };
        draw_text(
            &status,
            10.0,
            y_offset + 40.0,
            18.0,
            if is_overflow {
                RED
            } else if is_leaf {
                ORANGE
            } else {
                GREEN
            },
        );
        draw_text("[P]arent | [R]oot | drag to pan, scroll to zoom", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}

/// Navigates to a node following the path, returns None if path is invalid.
fn get_node_at_path<'a>(root: &'a TileNode, path: &[usize]) -> Option<&'a TileNode> {
    path.iter().try_fold(root, |node, &index| node.children().get(index))
}
