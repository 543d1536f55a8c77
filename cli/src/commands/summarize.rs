use anyhow::Result;
use pangatikan::{summarize_villages, DashboardTotals, HouseholdRecord, Vulnerability};
use serde_json::json;
use tracing::info;

use crate::commands::write_json;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::SummarizeArgs) -> Result<()> {
    info!(path = %args.households.display(), "loading household records");
    let records = HouseholdRecord::read_json(&args.households)?;

    let table = summarize_villages(&records);
    info!(villages = table.len(), "writing village statistics");
    write_json(args.output.as_deref(), &json!({ "rekap_per_desa": table.to_json() }))?;

    let totals = DashboardTotals::compute(&records, &args.desa);
    info!(desa = %totals.filter_desa, total_keluarga = totals.total_keluarga, "household totals");
    for class in Vulnerability::ALL {
        info!("  {:<14} {:>6} ({:.1}%)", class.label(), totals.count(class), totals.share(class));
    }

    Ok(())
}
