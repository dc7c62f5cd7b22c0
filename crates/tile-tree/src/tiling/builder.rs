//! Tile tree construction.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::Point2;
use rayon::prelude::*;

use crate::{
    compute_cell_extent, grid_dimension, BoundingBox, Feature, FeatureSet, TilingError,
    TilingOptions,
};

use super::node::{TileId, TileNode};
use super::tree::TileTree;

/// Shared flag for cancelling a build in progress.
///
/// Every cell checks the flag before doing any work, so a cancelled build
/// stops promptly and returns [`TilingError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One cell waiting to become a node.
struct CellJob {
    tile: TileId,
    extent: BoundingBox,
    features: Vec<Feature>,
}

/// Builds [`TileTree`]s from importance-ordered features.
///
/// # Ordering contract
///
/// When a cell overflows, the builder keeps the *first* `capacity` features
/// in the order they were given and pushes the rest down. It never re-sorts.
/// Callers must pass features in descending importance;
/// [`FeatureSet::from_weighted`] does that.
///
/// # Concurrency
///
/// Sibling cells share no data, so with [`TilingOptions::parallel`] they are
/// built on the rayon pool. Results are collected in grid order and the
/// output is identical to a sequential build.
#[derive(Debug, Clone, Default)]
pub struct TileTreeBuilder {
    options: TilingOptions,
    cancel: Option<CancelFlag>,
}

impl TileTreeBuilder {
    pub fn new(options: TilingOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    /// Attaches a flag that aborts the build when set.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    #[inline]
    pub fn options(&self) -> &TilingOptions {
        &self.options
    }

    /// Builds a tree over a feature set, using the set's own extent as the
    /// grid origin.
    pub fn build_set(&self, set: &FeatureSet) -> Result<TileTree, TilingError> {
        match set.extent() {
            Some(extent) => self.build(set.features(), &extent),
            None => {
                self.options.validate()?;
                Ok(TileTree::empty(BoundingBox::new(0.0, 0.0, 0.0, 0.0)))
            }
        }
    }

    /// Builds a tree over `features`, laying the top-level grid over
    /// `extent`.
    ///
    /// Features whose center falls outside `extent` are left out of the
    /// tree. All arguments are validated before any partitioning starts.
    pub fn build(&self, features: &[Feature], extent: &BoundingBox) -> Result<TileTree, TilingError> {
        self.options.validate()?;
        if !extent.is_valid() {
            return Err(TilingError::invalid(format!(
                "extent {extent:?} is not a finite rectangle with min <= max"
            )));
        }

        let _span = tracing::info_span!("build_tile_tree", features = features.len()).entered();

        // floor + 1 rather than ceil: an extent that is an exact multiple of
        // the tile size gets an extra column so centers on its far edge stay
        // inside the half-open grid.
        let cell_size = self.options.max_tile_size;
        let cols = grid_dimension(extent.width(), cell_size)?;
        let rows = grid_dimension(extent.height(), cell_size)?;
        check_address_space(cols.max(rows), self.options.max_depth)?;

        let (buckets, outside) = bucket_top_level(features, extent, cell_size, cols, rows);
        if outside > 0 {
            tracing::debug!(outside, "features with centers outside the extent were skipped");
        }
        tracing::debug!(cols, rows, occupied = buckets.len(), "top-level grid laid out");

        let jobs = buckets
            .into_iter()
            .map(|((y, x), features)| CellJob {
                tile: TileId::new(0, x as u64, y as u64),
                extent: compute_cell_extent(extent, cell_size, x, y),
                features,
            })
            .collect();
        let children = self.build_cells(jobs, 0)?;

        let tree = TileTree::from_root(TileNode::root(*extent, children));
        tracing::debug!(
            tiles = tree.tile_count(),
            depth = tree.depth(),
            "tile tree built"
        );
        Ok(tree)
    }

    fn check_cancelled(&self) -> Result<(), TilingError> {
        match &self.cancel {
            Some(flag) if flag.is_cancelled() => Err(TilingError::Cancelled),
            _ => Ok(()),
        }
    }

    fn build_cells(&self, jobs: Vec<CellJob>, depth: u32) -> Result<Vec<TileNode>, TilingError> {
        if self.options.parallel {
            jobs.into_par_iter()
                .map(|job| self.build_cell(job, depth))
                .collect()
        } else {
            jobs.into_iter()
                .map(|job| self.build_cell(job, depth))
                .collect()
        }
    }

    /// Turns one non-empty cell into a node, subdividing if it overflows.
    fn build_cell(&self, job: CellJob, depth: u32) -> Result<TileNode, TilingError> {
        self.check_cancelled()?;

        let CellJob {
            tile,
            extent,
            mut features,
        } = job;
        let capacity = self.options.capacity;

        if features.len() <= capacity {
            return Ok(TileNode::new(tile, extent, features, Vec::new()));
        }

        if depth >= self.options.max_depth {
            tracing::warn!(
                %tile,
                features = features.len(),
                capacity,
                "depth limit reached, emitting oversized leaf"
            );
            return Ok(TileNode::overflow_leaf(tile, extent, features));
        }

        let pushed_down = features.split_off(capacity);
        tracing::trace!(%tile, kept = features.len(), pushed_down = pushed_down.len(), "subdividing tile");

        let children = self.build_cells(divide(tile, &extent, pushed_down), depth + 1)?;
        Ok(TileNode::new(tile, extent, features, children))
    }
}

/// Ensures every tile down to `max_depth` has a `u64` address.
///
/// Level `d` coordinates run up to `cells * 2^d - 1` along an axis.
fn check_address_space(cells: usize, max_depth: u32) -> Result<(), TilingError> {
    if (cells as u128) << max_depth > 1u128 << 64 {
        return Err(TilingError::invalid(format!(
            "a grid of {cells} cells per axis cannot be subdivided {max_depth} levels deep"
        )));
    }
    Ok(())
}

/// Splits overflow features among the four quadrants of a cell, in
/// row-major quadrant order, dropping empty quadrants.
fn divide(tile: TileId, extent: &BoundingBox, features: Vec<Feature>) -> Vec<CellJob> {
    let mut jobs: Vec<CellJob> = [(0, 0), (1, 0), (0, 1), (1, 1)]
        .into_iter()
        .map(|(i, j)| CellJob {
            tile: tile.child(i, j),
            extent: extent.quadrant(i, j),
            features: Vec::new(),
        })
        .collect();

    for feature in features {
        let center = feature.center_2d();
        if let Some(job) = jobs.iter_mut().find(|job| job.extent.contains(center)) {
            job.features.push(feature);
        }
    }

    jobs.retain(|job| !job.features.is_empty());
    jobs
}

/// Groups features by the top-level cell containing their center.
///
/// Buckets are keyed by `(row, column)` so iteration is row-major, and each
/// bucket keeps the incoming feature order. Returns the buckets and the
/// number of features that fell outside the grid.
fn bucket_top_level(
    features: &[Feature],
    extent: &BoundingBox,
    cell_size: f64,
    cols: usize,
    rows: usize,
) -> (BTreeMap<(usize, usize), Vec<Feature>>, usize) {
    let mut buckets: BTreeMap<(usize, usize), Vec<Feature>> = BTreeMap::new();
    let mut outside = 0;

    for feature in features {
        match locate_cell(feature.center_2d(), extent, cell_size, cols, rows) {
            Some((x, y)) => buckets.entry((y, x)).or_default().push(feature.clone()),
            None => outside += 1,
        }
    }

    (buckets, outside)
}

/// Finds the grid cell whose half-open rectangle contains `point`.
fn locate_cell(
    point: Point2<f64>,
    extent: &BoundingBox,
    cell_size: f64,
    cols: usize,
    rows: usize,
) -> Option<(usize, usize)> {
    let x = locate_axis(point.x, extent.xmin(), cell_size, cols)?;
    let y = locate_axis(point.y, extent.ymin(), cell_size, rows)?;
    debug_assert!(compute_cell_extent(extent, cell_size, x, y).contains(point));
    Some((x, y))
}

/// Finds the cell index along one axis.
///
/// The division gives a guess that can be off by one through rounding, so
/// the neighbours are checked against the same bounds that
/// [`compute_cell_extent`] produces.
fn locate_axis(value: f64, origin: f64, cell_size: f64, count: usize) -> Option<usize> {
    let guess = ((value - origin) / cell_size).floor().max(0.0) as usize;
    [guess.saturating_sub(1), guess, guess.saturating_add(1)]
        .into_iter()
        .filter(|&index| index < count)
        .find(|&index| {
            let lo = origin + index as f64 * cell_size;
            let hi = origin + (index + 1) as f64 * cell_size;
            lo <= value && value < hi
        })
}
