//! Axis-aligned extents and the tile grid arithmetic built on them.

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

use crate::TilingError;

/// A 2D axis-aligned rectangle describing one tile cell (or the overall
/// extent of a dataset).
///
/// Containment is half-open: a point is inside iff
/// `xmin <= x < xmax` and `ymin <= y < ymax`. Adjacent cells therefore
/// never both claim a point lying on their shared edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

impl BoundingBox {
    /// Creates a rectangle from its bounds.
    ///
    /// # Panics (debug builds only)
    /// Panics if `min > max` on either axis.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        debug_assert!(
            !(xmin > xmax) && !(ymin > ymax),
            "BoundingBox min must not exceed max"
        );
        Self { xmin, ymin, xmax, ymax }
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Returns the midpoint of the rectangle.
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.xmin + self.xmax) * 0.5,
            (self.ymin + self.ymax) * 0.5,
        )
    }

    /// Returns `true` if all bounds are finite and `min <= max` on both axes.
    pub fn is_valid(&self) -> bool {
        [self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|v| v.is_finite())
            && self.xmin <= self.xmax
            && self.ymin <= self.ymax
    }

    /// Half-open point containment test.
    #[inline]
    pub fn contains(&self, point: Point2<f64>) -> bool {
        self.xmin <= point.x && point.x < self.xmax && self.ymin <= point.y && point.y < self.ymax
    }

    /// Returns one quarter of this rectangle.
    ///
    /// `i` selects the column (0 = west, 1 = east) and `j` the row
    /// (0 = south, 1 = north). The split happens at the midpoint, which is
    /// computed once so that the four quarters share their inner edges
    /// exactly and reuse the parent's outer edges.
    pub fn quadrant(&self, i: usize, j: usize) -> BoundingBox {
        debug_assert!(i < 2 && j < 2, "quadrant index out of range");
        let mid = self.center();
        let (xmin, xmax) = if i == 0 { (self.xmin, mid.x) } else { (mid.x, self.xmax) };
        let (ymin, ymax) = if j == 0 { (self.ymin, mid.y) } else { (mid.y, self.ymax) };
        BoundingBox { xmin, ymin, xmax, ymax }
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            xmin: self.xmin.min(other.xmin),
            ymin: self.ymin.min(other.ymin),
            xmax: self.xmax.max(other.xmax),
            ymax: self.ymax.max(other.ymax),
        }
    }

    /// Returns `true` if the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.xmin < other.xmax
            && other.xmin < self.xmax
            && self.ymin < other.ymax
            && other.ymin < self.ymax
    }
}

/// Axis-aligned 3D bounds of one input feature, tagged with its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    id: String,
    xmin: f64,
    ymin: f64,
    zmin: f64,
    xmax: f64,
    ymax: f64,
    zmax: f64,
}

impl BoundingBox3D {
    /// Creates a box from its minimum and maximum corners.
    ///
    /// # Panics (debug builds only)
    /// Panics if the box is malformed; use [`try_new`](Self::try_new) for
    /// untrusted input.
    pub fn new(id: impl Into<String>, min: [f64; 3], max: [f64; 3]) -> Self {
        let bbox = Self::from_parts(id.into(), min, max);
        debug_assert!(bbox.validate().is_ok(), "BoundingBox3D is malformed");
        bbox
    }

    /// Creates a box, rejecting non-finite bounds and inverted axes.
    pub fn try_new(id: impl Into<String>, min: [f64; 3], max: [f64; 3]) -> Result<Self, TilingError> {
        let bbox = Self::from_parts(id.into(), min, max);
        bbox.validate()?;
        Ok(bbox)
    }

    fn from_parts(id: String, min: [f64; 3], max: [f64; 3]) -> Self {
        Self {
            id,
            xmin: min[0],
            ymin: min[1],
            zmin: min[2],
            xmax: max[0],
            ymax: max[1],
            zmax: max[2],
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TilingError> {
        let axes = [
            ("x", self.xmin, self.xmax),
            ("y", self.ymin, self.ymax),
            ("z", self.zmin, self.zmax),
        ];
        for (axis, min, max) in axes {
            if !min.is_finite() || !max.is_finite() {
                return Err(TilingError::invalid(format!(
                    "box '{}' has a non-finite {axis} bound",
                    self.id
                )));
            }
            if min > max {
                return Err(TilingError::invalid(format!(
                    "box '{}' has {axis}min {min} greater than {axis}max {max}",
                    self.id
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn min(&self) -> Point3<f64> {
        Point3::new(self.xmin, self.ymin, self.zmin)
    }

    #[inline]
    pub fn max(&self) -> Point3<f64> {
        Point3::new(self.xmax, self.ymax, self.zmax)
    }

    /// Midpoint of each axis.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min(), &self.max())
    }

    /// Center projected onto the XY plane; this is what tile assignment uses.
    #[inline]
    pub fn center_2d(&self) -> Point2<f64> {
        self.center().xy()
    }

    /// Projection of the box onto the XY plane.
    pub fn to_2d(&self) -> BoundingBox {
        BoundingBox::new(self.xmin, self.ymin, self.xmax, self.ymax)
    }

    #[inline]
    pub fn extent_x(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn extent_y(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Area of the 2D footprint, the default importance weight.
    #[inline]
    pub fn footprint_area(&self) -> f64 {
        self.extent_x() * self.extent_y()
    }
}

/// Computes the rectangle of grid cell `(grid_x, grid_y)` in a grid of
/// square cells anchored at the lower corner of `origin`.
pub fn compute_cell_extent(origin: &BoundingBox, cell_size: f64, grid_x: usize, grid_y: usize) -> BoundingBox {
    let x0 = origin.xmin + grid_x as f64 * cell_size;
    let y0 = origin.ymin + grid_y as f64 * cell_size;
    let x1 = origin.xmin + (grid_x + 1) as f64 * cell_size;
    let y1 = origin.ymin + (grid_y + 1) as f64 * cell_size;
    BoundingBox::new(x0, y0, x1, y1)
}

/// Largest number of top-level cells along one axis.
pub const MAX_GRID_DIMENSION: usize = 1 << 30;

/// Number of half-open cells of `cell_size` needed to cover the closed
/// interval `[min, min + span]`.
///
/// This is `ceil(span / cell_size)` except when `span` is an exact
/// multiple of the cell size (including zero), where one more cell is
/// needed to hold points lying on the far edge.
///
/// Fails with [`TilingError::InvalidArgument`] when the ratio is not finite
/// or the axis would need more than [`MAX_GRID_DIMENSION`] cells.
pub fn grid_dimension(span: f64, cell_size: f64) -> Result<usize, TilingError> {
    let cells = (span / cell_size).floor();
    if !cells.is_finite() || cells < 0.0 || cells >= MAX_GRID_DIMENSION as f64 {
        return Err(TilingError::invalid(format!(
            "a span of {span} needs more than {MAX_GRID_DIMENSION} cells of size {cell_size}"
        )));
    }
    Ok(cells as usize + 1)
}

/// Returns the smallest 2D rectangle spanning every box, or `None` when
/// there are no boxes.
pub fn aggregate_extent<'a, I>(boxes: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a BoundingBox3D>,
{
    boxes
        .into_iter()
        .map(BoundingBox3D::to_2d)
        .reduce(|acc, b| acc.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_extent_offsets_from_origin() {
        let origin = BoundingBox::new(100.0, 200.0, 500.0, 400.0);
        let cell = compute_cell_extent(&origin, 50.0, 2, 3);

        assert_eq!(cell, BoundingBox::new(200.0, 350.0, 250.0, 400.0));
        assert_eq!(cell.width(), 50.0);
        assert_eq!(cell.height(), 50.0);
    }

    #[test]
    fn adjacent_cells_share_edges() {
        let origin = BoundingBox::new(0.3, 0.7, 10.0, 10.0);
        for x in 0..5 {
            let a = compute_cell_extent(&origin, 0.1, x, 0);
            let b = compute_cell_extent(&origin, 0.1, x + 1, 0);
            assert_eq!(a.xmax(), b.xmin());
        }
    }

    #[test]
    fn containment_is_half_open() {
        let cell = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

        assert!(cell.contains(Point2::new(0.0, 0.0)));
        assert!(cell.contains(Point2::new(5.0, 9.999)));
        assert!(!cell.contains(Point2::new(10.0, 5.0)));
        assert!(!cell.contains(Point2::new(5.0, 10.0)));
        assert!(!cell.contains(Point2::new(-0.001, 5.0)));
    }

    #[test]
    fn boundary_point_belongs_to_exactly_one_cell() {
        let origin = BoundingBox::new(0.0, 0.0, 30.0, 30.0);
        let point = Point2::new(10.0, 20.0);

        let owners: Vec<(usize, usize)> = (0..3)
            .flat_map(|x| (0..3).map(move |y| (x, y)))
            .filter(|&(x, y)| compute_cell_extent(&origin, 10.0, x, y).contains(point))
            .collect();

        assert_eq!(owners, vec![(1, 2)]);
    }

    #[test]
    fn quadrants_tile_parent() {
        let parent = BoundingBox::new(1.0, 2.0, 5.0, 10.0);
        let sw = parent.quadrant(0, 0);
        let se = parent.quadrant(1, 0);
        let nw = parent.quadrant(0, 1);
        let ne = parent.quadrant(1, 1);

        assert_eq!(sw, BoundingBox::new(1.0, 2.0, 3.0, 6.0));
        assert_eq!(ne, BoundingBox::new(3.0, 6.0, 5.0, 10.0));
        assert_eq!(sw.xmax(), se.xmin());
        assert_eq!(sw.ymax(), nw.ymin());

        let quads = [sw, se, nw, ne];
        for (a, qa) in quads.iter().enumerate() {
            for qb in &quads[a + 1..] {
                assert!(!qa.overlaps(qb));
            }
        }
        let area: f64 = quads.iter().map(|q| q.width() * q.height()).sum();
        assert_eq!(area, parent.width() * parent.height());
        assert_eq!(quads.iter().fold(sw, |acc, q| acc.union(q)), parent);
    }

    #[test]
    fn grid_dimension_covers_closed_interval() {
        assert_eq!(grid_dimension(10.0, 4.0), Ok(3));
        assert_eq!(grid_dimension(0.5, 4.0), Ok(1));
        assert_eq!(grid_dimension(0.0, 4.0), Ok(1));
        // Exact multiple: the far edge needs its own cell.
        assert_eq!(grid_dimension(8.0, 4.0), Ok(3));
    }

    #[test]
    fn grid_dimension_rejects_unrepresentable_grids() {
        let huge = BoundingBox::new(-1e308, -1e308, 1e308, 1e308);
        assert!(huge.width().is_infinite());
        assert!(matches!(
            grid_dimension(huge.width(), 2000.0),
            Err(TilingError::InvalidArgument(_))
        ));
        assert!(matches!(grid_dimension(1e18, 1e-2), Err(TilingError::InvalidArgument(_))));
        assert!(matches!(grid_dimension(f64::NAN, 1.0), Err(TilingError::InvalidArgument(_))));

        let last = (MAX_GRID_DIMENSION - 1) as f64;
        assert_eq!(grid_dimension(last, 1.0), Ok(MAX_GRID_DIMENSION));
        assert!(grid_dimension(last + 1.0, 1.0).is_err());
    }

    #[test]
    fn box_derived_values() {
        let b = BoundingBox3D::new("b", [0.0, 2.0, -1.0], [4.0, 4.0, 1.0]);

        assert_eq!(b.id(), "b");
        assert_eq!(b.center(), Point3::new(2.0, 3.0, 0.0));
        assert_eq!(b.center_2d(), Point2::new(2.0, 3.0));
        assert_eq!(b.extent_x(), 4.0);
        assert_eq!(b.extent_y(), 2.0);
        assert_eq!(b.footprint_area(), 8.0);
        assert_eq!(b.to_2d(), BoundingBox::new(0.0, 2.0, 4.0, 4.0));
    }

    #[test]
    fn try_new_rejects_malformed_boxes() {
        let inverted = BoundingBox3D::try_new("x", [1.0, 0.0, 0.0], [0.0, 1.0, 1.0]);
        assert!(matches!(inverted, Err(TilingError::InvalidArgument(_))));

        let nan = BoundingBox3D::try_new("y", [0.0, f64::NAN, 0.0], [1.0, 1.0, 1.0]);
        assert!(matches!(nan, Err(TilingError::InvalidArgument(_))));

        let flat = BoundingBox3D::try_new("z", [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        assert!(flat.is_ok());
    }

    #[test]
    fn aggregate_extent_spans_all_boxes() {
        let boxes = vec![
            BoundingBox3D::new("a", [0.0, 5.0, 0.0], [1.0, 6.0, 1.0]),
            BoundingBox3D::new("b", [-3.0, 2.0, 0.0], [-2.0, 9.0, 4.0]),
        ];

        assert_eq!(aggregate_extent(&boxes), Some(BoundingBox::new(-3.0, 2.0, 1.0, 9.0)));
        assert_eq!(aggregate_extent(&[]), None);
    }

    #[test]
    fn validity_check() {
        assert!(BoundingBox::new(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!BoundingBox::new(0.0, 0.0, f64::INFINITY, 1.0).is_valid());
    }
}
