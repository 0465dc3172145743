//! Solar Finance CLI
//!
//! Runs the project finance model from the command line: assumption
//! overrides come from a JSON file, project defaults from the seed CSVs.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use solar_finance::project::loader::DEFAULT_DATA_PATH;
use solar_finance::{resolve, FinanceEngine, FinanceRequest, ProjectBook};

#[derive(Debug, Parser)]
#[command(name = "solar_finance", about = "Run the project finance cash-flow model")]
struct Args {
    /// Project id whose stored economics/incentives seed the defaults
    #[arg(long)]
    project_id: Option<u32>,

    /// Directory containing the project seed CSVs
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// JSON file with assumption overrides (request shape)
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Write the yearly cash-flow rows to this CSV file
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("Solar Finance v0.1.0");
    println!("====================\n");

    let request: FinanceRequest = match &args.inputs {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading inputs file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing inputs file {}", path.display()))?
        }
        None => FinanceRequest::default(),
    };

    let defaults = match args.project_id {
        Some(project_id) => {
            let book = ProjectBook::load_from(&args.data_dir)
                .with_context(|| format!("loading seed data from {}", args.data_dir.display()))?;
            let Some(project) = book.find(project_id) else {
                bail!("project {} not found", project_id);
            };
            println!("Project: {} ({})", project.project_name, project.id);
            book.defaults_for(project_id)
        }
        None => None,
    };

    let assumptions = resolve(&request, defaults.as_ref());
    println!(
        "  Capacity: {:.0} kW   Capex: ${:.0}   Horizon: {} years",
        assumptions.system.dc_kw, assumptions.system.total_capex, assumptions.analysis.term_years
    );
    println!(
        "  PPA: ${}/MWh   Debt: {:.0}%   Discount: {:.1}%\n",
        assumptions.revenue.ppa_price_mwh,
        assumptions.debt.debt_fraction * 100.0,
        assumptions.analysis.discount_rate * 100.0
    );

    let engine = FinanceEngine::new(assumptions);
    let projection = engine.project();
    let result = engine.run();

    // Print yearly table
    println!("Projection ({} years):", projection.rows.len());
    println!(
        "{:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Year", "Energy Rev", "REC Rev", "Opex", "Lease", "Debt Svc", "Net Levered"
    );
    println!("{}", "-".repeat(84));

    for row in &projection.rows {
        println!(
            "{:>4} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            row.year,
            row.energy_revenue,
            row.rec_revenue,
            row.opex,
            row.lease,
            row.debt_service,
            row.net_levered,
        );
    }

    // Write full rows to CSV
    if let Some(path) = &args.out {
        let mut file = File::create(path)
            .with_context(|| format!("creating output file {}", path.display()))?;

        writeln!(
            file,
            "Year,YieldMWh,EnergyRevenue,RECRevenue,Opex,Lease,CashBeforeDebt,DebtService,Salvage,NetUnlevered,NetLevered"
        )?;

        for row in &projection.rows {
            writeln!(
                file,
                "{},{:.4},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                row.year,
                row.yield_mwh,
                row.energy_revenue,
                row.rec_revenue,
                row.opex,
                row.lease,
                row.cash_before_debt,
                row.debt_service,
                row.salvage,
                row.net_unlevered,
                row.net_levered,
            )?;
        }

        println!("\nFull rows written to: {}", path.display());
    }

    // Print summary
    let outputs = &result.outputs;
    println!("\nSummary:");
    println!("  Net Upfront: ${:.2}", projection.net_upfront);
    println!("  ITC Credit: ${:.2}", outputs.itc_credit);
    println!("  NPV (unlevered): ${:.2}", outputs.npv_unlevered);
    println!("  NPV (levered): ${:.2}", outputs.npv_levered);
    match outputs.unlevered_irr {
        Some(irr) => println!("  IRR (unlevered): {:.2}%", irr),
        None => println!("  IRR (unlevered): n/a"),
    }
    match outputs.levered_irr {
        Some(irr) => println!("  IRR (levered): {:.2}%", irr),
        None => println!("  IRR (levered): n/a"),
    }
    match outputs.min_dscr {
        Some(dscr) => println!("  Min DSCR: {:.2}", dscr),
        None => println!("  Min DSCR: n/a"),
    }

    Ok(())
}
