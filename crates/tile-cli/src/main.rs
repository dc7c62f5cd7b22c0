mod config;
mod report;

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tile_tree::{BoundingBox3D, CancelFlag, FeatureSet, TileTreeBuilder, WeightedBox};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::report::Report;

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let config = Config::parse();
    tracing::info!(config = ?config, "tile tree starting");

    let options = config.tiling_options()?;
    let set = load_features(&config.input, config.presorted)?;
    tracing::info!(features = set.len(), extent = ?set.extent(), "features loaded");

    let cancel = CancelFlag::new();
    if let Some(budget) = config.time_budget() {
        let watchdog = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(budget);
            watchdog.cancel();
        });
    }

    let started = Instant::now();
    let tree = TileTreeBuilder::new(options.clone())
        .with_cancel(cancel)
        .build_set(&set)
        .context("building tile tree")?;
    tracing::info!(
        tiles = tree.tile_count(),
        depth = tree.depth(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tile tree built"
    );

    let report = Report::new(&set, &tree, &options, config.outline);
    let json = serde_json::to_string_pretty(&report)?;
    match &config.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Reads weighted boxes from a JSON file and orders them for tiling.
fn load_features(path: &Path, presorted: bool) -> anyhow::Result<FeatureSet> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<WeightedBox> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let set = if presorted {
        let boxes = records
            .into_iter()
            .map(|r| {
                BoundingBox3D::try_new(r.id, [r.xmin, r.ymin, r.zmin], [r.xmax, r.ymax, r.zmax])
            })
            .collect::<Result<Vec<_>, _>>()?;
        FeatureSet::from_presorted(boxes)?
    } else {
        FeatureSet::from_weighted(records)?
    };
    Ok(set)
}
