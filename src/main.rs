use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

use telco_catalog::{
    combined_summary, export, Catalog, Generator, GeneratorConfig, ServiceType,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("generate") => run_generate(&args[2..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("Telco Catalog v{}", telco_catalog::VERSION);
    println!();
    println!("Usage:");
    println!("  telco-catalog generate [COUNT] [--seed N] [--out DIR]");
    println!();
    println!("Generates a synthetic B2B customer dataset and writes it as");
    println!("businesses.json (embedded form) and businesses.csv (flat form).");
    println!();
    println!("For the HTTP API: cargo run --bin telco-server --features server");
}

fn run_generate(args: &[String]) -> Result<()> {
    let mut count: usize = 1000;
    let mut seed: Option<u64> = None;
    let mut out_dir = PathBuf::from(".");

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().context("--seed requires a value")?;
                seed = Some(value.parse().context("--seed must be an integer")?);
            }
            "--out" => {
                let value = iter.next().context("--out requires a value")?;
                out_dir = PathBuf::from(value);
            }
            other => {
                count = other
                    .parse()
                    .with_context(|| format!("unexpected argument: {}", other))?;
            }
        }
    }

    println!("🏢 Generating {} businesses...", count);

    let generator = Generator::new(GeneratorConfig::default());
    let businesses = generator.generate(count, seed)?;

    let catalog = Catalog::new();
    catalog.load(businesses)?;
    let (business_count, service_count) = catalog.counts();
    println!("✓ Catalog loaded: {} businesses, {} services", business_count, service_count);

    let dataset = catalog.all_businesses();
    fs::create_dir_all(&out_dir)?;

    let json_path = out_dir.join("businesses.json");
    fs::write(&json_path, export::to_json(&dataset)?)?;
    println!("✓ Wrote {}", json_path.display());

    let csv_path = out_dir.join("businesses.csv");
    fs::write(&csv_path, export::to_csv(&dataset)?)?;
    println!("✓ Wrote {}", csv_path.display());

    let summary = combined_summary(&catalog, None);
    println!();
    println!("Total monthly revenue: ${:.2}", summary.overall.total_monthly_revenue);
    println!(
        "Average per customer:  ${:.2}",
        summary.overall.average_revenue_per_customer
    );

    println!("\nService breakdown:");
    for ty in ServiceType::ALL {
        if let Some(revenue) = summary.revenue.by_service_type.get(ty.as_str()) {
            println!("  {}: ${:.2}/month active", ty.as_str(), revenue);
        }
    }

    Ok(())
}
