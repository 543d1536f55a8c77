use anyhow::{Context, Result};
use pangatikan::Category;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::LegendArgs) -> Result<()> {
    let category: Category = args.category.parse().context("Invalid category")?;

    println!("{}", category.title());
    for entry in category.scheme().legend() {
        println!("  {}  {}  {}", entry.tier, entry.color, entry.label);
    }

    Ok(())
}
