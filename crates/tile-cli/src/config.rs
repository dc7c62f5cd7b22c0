use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tile_tree::TilingOptions;

/// `tile-tree` - builds a level-of-detail tile tree from weighted 3D boxes.
///
/// Reads a JSON array of `{id, xmin, ymin, zmin, xmax, ymax, zmax, weight?}`
/// records, partitions them into tiles and prints a JSON report describing
/// the resulting hierarchy.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// JSON file holding the array of weighted boxes.
    #[arg(long, env = "TILE_INPUT")]
    pub input: PathBuf,

    /// JSON file with tiling options. Flags given on the command line
    /// override its values.
    #[arg(long, env = "TILE_OPTIONS")]
    pub options: Option<PathBuf>,

    /// Maximum number of features held directly by one tile.
    #[arg(long, env = "TILE_CAPACITY")]
    pub capacity: Option<usize>,

    /// Edge length of the top-level tiles, in input units.
    #[arg(long, env = "TILE_MAX_TILE_SIZE")]
    pub max_tile_size: Option<f64>,

    /// Maximum subdivision depth below the top-level grid.
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Build sibling tiles in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Keep the input order instead of sorting by weight. The file must
    /// already list features from most to least important.
    #[arg(long)]
    pub presorted: bool,

    /// Abort the build if it takes longer than this many seconds.
    #[arg(long)]
    pub time_budget_secs: Option<u64>,

    /// Include the full tile outline in the report.
    #[arg(long)]
    pub outline: bool,

    /// Write the report to this file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Resolves the effective tiling options: defaults, then the options
    /// file, then command-line overrides.
    pub fn tiling_options(&self) -> anyhow::Result<TilingOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading options file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing options file {}", path.display()))?
            }
            None => TilingOptions::default(),
        };

        if let Some(capacity) = self.capacity {
            options.capacity = capacity;
        }
        if let Some(max_tile_size) = self.max_tile_size {
            options.max_tile_size = max_tile_size;
        }
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        if self.parallel {
            options.parallel = true;
        }

        options.validate()?;
        Ok(options)
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_secs.map(Duration::from_secs)
    }
}
