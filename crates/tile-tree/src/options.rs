//! Static parameters of a tile tree build.

use serde::{Deserialize, Serialize};

use crate::TilingError;

/// Default maximum number of features held directly by one tile.
pub const DEFAULT_CAPACITY: usize = 50;

/// Default edge length of a top-level tile, in input units.
pub const DEFAULT_MAX_TILE_SIZE: f64 = 2000.0;

/// Default limit on subdivision depth below the top-level grid.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Deepest subdivision accepted by [`TilingOptions::validate`].
///
/// Wide top-level grids leave fewer levels; the builder rejects a depth
/// whose tile addresses would not fit in `u64`.
pub const MAX_SUPPORTED_DEPTH: u32 = 40;

/// Parameters controlling how features are partitioned into tiles.
///
/// Options can be assembled with the `with_*` setters or deserialized from
/// a config file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingOptions {
    /// Maximum features kept directly by a tile before the rest are pushed
    /// down into its quadrants.
    pub capacity: usize,

    /// Edge length of the top-level grid cells. Each subdivision halves it.
    pub max_tile_size: f64,

    /// Maximum subdivision depth below the top-level grid.
    ///
    /// A cell at this depth that still overflows becomes an oversized leaf
    /// holding all of its features. This only triggers on degenerate input
    /// such as many features sharing one center.
    pub max_depth: u32,

    /// Build sibling cells on the rayon thread pool.
    pub parallel: bool,
}

impl Default for TilingOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_tile_size: DEFAULT_MAX_TILE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            parallel: false,
        }
    }
}

impl TilingOptions {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_tile_size(mut self, max_tile_size: f64) -> Self {
        self.max_tile_size = max_tile_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks that the options describe a build that terminates.
    pub fn validate(&self) -> Result<(), TilingError> {
        if self.capacity == 0 {
            return Err(TilingError::invalid("capacity must be at least 1"));
        }
        if !self.max_tile_size.is_finite() || self.max_tile_size <= 0.0 {
            return Err(TilingError::invalid(format!(
                "max tile size must be positive and finite, got {}",
                self.max_tile_size
            )));
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(TilingError::invalid(format!(
                "max depth {} exceeds the supported maximum of {MAX_SUPPORTED_DEPTH}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = TilingOptions::default();
        assert_eq!(options.capacity, DEFAULT_CAPACITY);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = TilingOptions::default().with_capacity(0).validate().unwrap_err();
        assert!(matches!(err, TilingError::InvalidArgument(_)));
    }

    #[test]
    fn bad_tile_sizes_are_rejected() {
        for size in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = TilingOptions::default().with_max_tile_size(size).validate();
            assert!(
                matches!(result, Err(TilingError::InvalidArgument(_))),
                "tile size {size} should be rejected"
            );
        }
    }

    #[test]
    fn excessive_depth_is_rejected() {
        let options = TilingOptions::default().with_max_depth(MAX_SUPPORTED_DEPTH + 1);
        assert!(matches!(options.validate(), Err(TilingError::InvalidArgument(_))));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let options: TilingOptions =
            serde_json::from_str(r#"{ "capacity": 10, "parallel": true }"#).unwrap();

        assert_eq!(options.capacity, 10);
        assert!(options.parallel);
        assert_eq!(options.max_tile_size, DEFAULT_MAX_TILE_SIZE);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
