//! Underwriting CLI
//!
//! Runs projections, renders the underwriting memo and processes batches of
//! assumptions files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use underwriting_model::projection::{ProjectionConfig, DEFAULT_SALE_COST_RATE};
use underwriting_model::report::{
    write_annual_csv, write_memo, write_monthly_csv, write_result,
};
use underwriting_model::{load_assumptions, ProjectionResult, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "underwrite", version)]
#[command(about = "Monthly cash-flow projection and returns for real-estate underwriting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project one assumptions file and write the result snapshot
    Run {
        /// Assumptions JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Result JSON (monthly rows, annual rollup, metrics)
        #[arg(short, long)]
        output: PathBuf,

        /// Optional monthly rows as CSV
        #[arg(long)]
        monthly_csv: Option<PathBuf>,

        /// Optional annual rollup as CSV
        #[arg(long)]
        annual_csv: Option<PathBuf>,

        /// Sale cost as a share of terminal value
        #[arg(long, default_value_t = DEFAULT_SALE_COST_RATE)]
        sale_cost: f64,
    },

    /// Render the underwriting memo for an assumptions file
    Memo {
        #[arg(short, long)]
        input: PathBuf,

        /// Markdown output
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Project many assumptions files in parallel
    Batch {
        /// Directory receiving one `<stem>.json` result per input
        #[arg(long)]
        output_dir: PathBuf,

        /// Assumptions JSON files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_SALE_COST_RATE)]
        sale_cost: f64,
    },
}

fn runner(sale_cost: f64) -> Result<ScenarioRunner> {
    if !(0.0..1.0).contains(&sale_cost) {
        bail!("--sale-cost must be in [0, 1), got {}", sale_cost);
    }
    Ok(ScenarioRunner::with_config(ProjectionConfig {
        sale_cost_rate: sale_cost,
        ..Default::default()
    }))
}

fn print_summary(label: &str, result: &ProjectionResult) {
    let m = &result.metrics;
    println!("{}", label);
    println!("  Months projected:     {}", result.monthly.len());
    println!("  Unlevered IRR (mo):   {:.6} ({:?})", m.unlevered_irr, m.unlevered_irr_status);
    println!("  Levered IRR (mo):     {:.6} ({:?})", m.levered_irr, m.levered_irr_status);
    println!("  Unlevered multiple:   {:.3}x", m.unlevered_equity_multiple);
    println!("  Levered multiple:     {:.3}x", m.levered_equity_multiple);
    println!("  Levered profit:       ${:.2}", m.levered_profit);
    println!("  Terminal value:       ${:.2}", m.terminal_value);
    println!("  Total hold costs:     ${:.2}", m.total_hold_costs);
}

fn run(
    input: &Path,
    output: &Path,
    monthly_csv: Option<&Path>,
    annual_csv: Option<&Path>,
    sale_cost: f64,
) -> Result<()> {
    let runner = runner(sale_cost)?;
    let assumptions = load_assumptions(input)
        .with_context(|| format!("Failed to load assumptions from {}", input.display()))?;

    let start = Instant::now();
    let result = runner.run(&assumptions);
    info!("Projection finished in {:?}", start.elapsed());

    write_result(output, &result)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    if let Some(path) = monthly_csv {
        write_monthly_csv(path, &result.monthly)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = annual_csv {
        write_annual_csv(path, &result.annual)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    print_summary(&input.display().to_string(), &result);
    Ok(())
}

fn memo(input: &Path, output: &Path) -> Result<()> {
    let assumptions = load_assumptions(input)
        .with_context(|| format!("Failed to load assumptions from {}", input.display()))?;
    write_memo(output, &assumptions)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Memo written to {}", output.display());
    Ok(())
}

fn batch(output_dir: &Path, inputs: &[PathBuf], sale_cost: f64) -> Result<()> {
    let runner = runner(sale_cost)?;

    let start = Instant::now();
    let runs = runner.run_files(inputs);
    info!("Projected {} files in {:?}", runs.len(), start.elapsed());

    let mut failures = 0;
    for run in &runs {
        let result = match &run.result {
            Ok(result) => result,
            Err(e) => {
                error!("{}: {}", run.path.display(), e);
                failures += 1;
                continue;
            }
        };

        let stem = run
            .path
            .file_stem()
            .map_or_else(|| "result".into(), |s| s.to_string_lossy());
        let output = output_dir.join(format!("{}.json", stem));
        write_result(&output, result)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        print_summary(&run.path.display().to_string(), result);
    }

    if failures > 0 {
        bail!("{} of {} inputs failed", failures, runs.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            input,
            output,
            monthly_csv,
            annual_csv,
            sale_cost,
        } => run(
            &input,
            &output,
            monthly_csv.as_deref(),
            annual_csv.as_deref(),
            sale_cost,
        ),
        Command::Memo { input, output } => memo(&input, &output),
        Command::Batch {
            output_dir,
            inputs,
            sale_cost,
        } => batch(&output_dir, &inputs, sale_cost),
    }
}
