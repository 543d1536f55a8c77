use anyhow::{Context, Result};
use pangatikan::{merge_stats, outline_filter, BoundaryCollection, Category, ChoroplethPackage, StatsTable};
use tracing::{info, warn};

use crate::commands::{load_config, write_json};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::MergeArgs) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let category: Category = args.category.parse().context("Invalid --category")?;

    info!(path = %args.boundaries.display(), "loading boundaries");
    let raw = BoundaryCollection::read_geojson(&args.boundaries)?;

    info!(path = %args.stats.display(), "loading village statistics");
    let stats = StatsTable::read_json(&args.stats)?;

    let villages = config.village_filter().apply(&raw);
    if villages.is_empty() {
        warn!(parent = %config.parent_code, "no boundary matched the village allow-list");
    }

    let outcome = merge_stats(&villages, &stats, &config.keys);
    if outcome.unmatched > 0 {
        warn!(unmatched = outcome.unmatched, "villages without statistics are drawn with zero counts");
    }

    let package = ChoroplethPackage::build(&outcome, category, config.centroid)
        .with_reported_average(args.reported_average);

    info!(features = package.features.len(), average = package.average, category = %category, "writing package");
    write_json(args.output.as_deref(), &package.to_json())?;

    if let Some(outline_path) = &args.outline {
        let outline = outline_filter(&raw, &config.parent_code, &config.keys);
        info!(features = outline.len(), "writing outline to {}", outline_path.display());
        write_json(Some(outline_path.as_path()), &outline.to_geojson())?;
    }

    Ok(())
}
