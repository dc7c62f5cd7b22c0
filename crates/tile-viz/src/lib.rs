//! Shared visualization utilities for the tile tree inspector binaries.

use std::hash::{Hash, Hasher};

use macroquad::prelude::*;
use nalgebra::Point2;
use tile_tree::{BoundingBox, Feature};

pub mod navigator;
pub mod scene;

pub use navigator::TreeNavigator;

/// Outline colors per tile level, cycled for deep trees.
const LEVEL_COLORS: [Color; 6] = [WHITE, SKYBLUE, LIME, GOLD, ORANGE, PINK];

/// Generates a deterministic color from a feature id using hashing.
pub fn feature_color(id: &str) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    // Extract RGB from hash bytes, keeping colors away from black
    let r = (((hash >> 16) & 0xFF) as u8).max(60);
    let g = (((hash >> 8) & 0xFF) as u8).max(60);
    let b = ((hash & 0xFF) as u8).max(60);

    Color::from_rgba(r, g, b, 200)
}

/// Outline color for tiles at the given level.
pub fn level_color(level: u32) -> Color {
    LEVEL_COLORS[level as usize % LEVEL_COLORS.len()]
}

/// Converts a nalgebra point to a macroquad vector.
#[inline]
pub fn to_vec2(point: Point2<f64>) -> Vec2 {
    vec2(point.x as f32, point.y as f32)
}

/// Draws the outline of a tile cell.
pub fn draw_cell(extent: &BoundingBox, thickness: f32, color: Color) {
    draw_rectangle_lines(
        extent.xmin() as f32,
        extent.ymin() as f32,
        extent.width() as f32,
        extent.height() as f32,
        thickness,
        color,
    );
}

/// Draws a feature's 2D footprint with a dot on the center that decided
/// its tile.
pub fn draw_footprint(feature: &Feature, dot_radius: f32) {
    let footprint = feature.bounding_box().to_2d();
    let color = feature_color(feature.id());
    draw_rectangle(
        footprint.xmin() as f32,
        footprint.ymin() as f32,
        footprint.width() as f32,
        footprint.height() as f32,
        color,
    );
    let center = to_vec2(feature.center_2d());
    draw_circle(center.x, center.y, dot_radius, BLACK);
}

/// Pan-and-zoom camera looking down on the XY plane, with Y pointing up.
pub struct MapCamera {
    /// World point at the center of the screen.
    pub center: Vec2,
    /// Visible world width.
    pub width: f32,
    /// Fraction of the view width zoomed per scroll step
    pub zoom_speed: f32,
    last_mouse: Option<Vec2>,
}

impl MapCamera {
    /// Creates a camera showing the whole extent with a small margin.
    pub fn fit(extent: &BoundingBox) -> Self {
        let span = extent.width().max(extent.height()).max(1.0) as f32;
        Self {
            center: to_vec2(extent.center()),
            width: span * 1.1,
            zoom_speed: 0.1,
            last_mouse: None,
        }
    }

    /// Visible world height, following the window's aspect ratio.
    pub fn height(&self) -> f32 {
        self.width * screen_height() / screen_width()
    }

    /// World size of one screen pixel, for constant-width lines.
    pub fn pixel_size(&self) -> f32 {
        self.width / screen_width()
    }

    /// Updates camera state from user input (mouse drag pans, scroll zooms).
    pub fn update(&mut self) {
        let mouse = Vec2::from(mouse_position());
        if is_mouse_button_down(MouseButton::Left) {
            if let Some(last) = self.last_mouse {
                let delta = (mouse - last) * self.pixel_size();
                self.center.x -= delta.x;
                self.center.y += delta.y;
            }
            self.last_mouse = Some(mouse);
        } else {
            self.last_mouse = None;
        }

        let scroll = mouse_wheel().1;
        if scroll != 0.0 {
            let factor = 1.0 - scroll.signum() * self.zoom_speed;
            self.width = (self.width * factor).max(1.0e-3);
        }
    }

    /// Converts to macroquad's Camera2D for rendering.
    pub fn to_camera2d(&self) -> Camera2D {
        let (w, h) = (self.width, self.height());
        let mut camera = Camera2D::from_display_rect(Rect::new(
            self.center.x - w * 0.5,
            self.center.y - h * 0.5,
            w,
            h,
        ));
        // Display rects are Y-down; maps are Y-up.
        camera.zoom.y = camera.zoom.y.abs();
        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_color_is_stable_and_bright() {
        let a = feature_color("building-1");
        assert_eq!(a, feature_color("building-1"));
        assert!(a.r >= 60.0 / 255.0 && a.g >= 60.0 / 255.0 && a.b >= 60.0 / 255.0);
    }

    #[test]
    fn level_colors_cycle() {
        assert_eq!(level_color(0), level_color(LEVEL_COLORS.len() as u32));
        assert_ne!(level_color(0), level_color(1));
    }
}
