use std::path::PathBuf;

/// Village welfare choropleth CLI
#[derive(clap::Parser, Debug)]
#[command(name = "pangatikan", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Deployment config (JSON); built-in Pangatikan defaults otherwise
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Merge village statistics onto boundaries and write the styled map package
    Merge(MergeArgs),

    /// Print the legend of a category
    Legend(LegendArgs),

    /// Aggregate classified household records into per-village statistics
    Summarize(SummarizeArgs),
}

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Boundary GeoJSON FeatureCollection
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// Village statistics JSON (bare object or {"rekap_per_desa": {...}})
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub stats: PathBuf,

    /// Category to color by: sangat_rentan, rentan, tidak_rentan, indeks_desa
    #[arg(short = 'k', long, default_value = "sangat_rentan")]
    pub category: String,

    /// Backend-reported average index, shown instead of the computed one
    #[arg(long = "average")]
    pub reported_average: Option<f64>,

    /// Output package file, stdout when omitted
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write the sub-district outline as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub outline: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct LegendArgs {
    /// Category name
    pub category: String,
}

#[derive(clap::Args, Debug)]
pub struct SummarizeArgs {
    /// Household records JSON array ({"desa", "kategori_kerentanan"})
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub households: PathBuf,

    /// Output statistics file, stdout when omitted
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Village to report headline totals for, "SEMUA" for all
    #[arg(long, default_value = "SEMUA")]
    pub desa: String,
}
