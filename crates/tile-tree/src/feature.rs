//! Features: the unit of assignment in a tile tree.

use std::fmt;
use std::sync::Arc;

use nalgebra::Point2;

use crate::BoundingBox3D;

/// A feature placed in the tile tree.
///
/// A feature is a cheap, shared handle to an immutable [`BoundingBox3D`].
/// Cloning it copies the handle, not the box, so every tile owns its own
/// feature list without duplicating input data.
#[derive(Clone, PartialEq)]
pub struct Feature {
    bbox: Arc<BoundingBox3D>,
}

impl Feature {
    pub fn new(bbox: BoundingBox3D) -> Self {
        Self { bbox: Arc::new(bbox) }
    }

    /// The identifier copied from the source box.
    #[inline]
    pub fn id(&self) -> &str {
        self.bbox.id()
    }

    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox3D {
        &self.bbox
    }

    /// The point used to decide which tile the feature falls into.
    #[inline]
    pub fn center_2d(&self) -> Point2<f64> {
        self.bbox.center_2d()
    }
}

impl From<BoundingBox3D> for Feature {
    fn from(bbox: BoundingBox3D) -> Self {
        Self::new(bbox)
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Feature").field(&self.id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_the_box() {
        let feature = Feature::new(BoundingBox3D::new("f1", [0.0, 0.0, 0.0], [2.0, 4.0, 1.0]));
        let copy = feature.clone();

        assert!(Arc::ptr_eq(&feature.bbox, &copy.bbox));
        assert_eq!(copy.id(), "f1");
        assert_eq!(copy.center_2d(), Point2::new(1.0, 2.0));
    }

    #[test]
    fn debug_shows_id() {
        let feature: Feature = BoundingBox3D::new("house-7", [0.0; 3], [1.0; 3]).into();
        assert_eq!(format!("{feature:?}"), "Feature(\"house-7\")");
    }
}
