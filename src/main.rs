use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use u_provision::formulation::{FinishLinkage, ModelOptions};
use u_provision::logging;
use u_provision::models::{Asset, Component, Instance, Schedule};
use u_provision::solver::{BruteForceSolver, MicroLpSolver, MilpSolver, SolverConfig};
use u_provision::{PlanKpi, Planner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SolverKind {
    Microlp,
    BruteForce,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Linkage {
    PerPeriod,
    Aggregated,
}

impl From<Linkage> for FinishLinkage {
    fn from(value: Linkage) -> Self {
        match value {
            Linkage::PerPeriod => FinishLinkage::PerPeriod,
            Linkage::Aggregated => FinishLinkage::Aggregated,
        }
    }
}

/// Plans repairs and replacement orders for asset components.
#[derive(Debug, Parser)]
#[command(name = "u-provision", version)]
struct Args {
    /// Instance JSON file; the built-in sample instance when omitted.
    #[arg(long)]
    instance: Option<PathBuf>,

    /// MILP backend.
    #[arg(long, value_enum, default_value_t = SolverKind::Microlp)]
    solver: SolverKind,

    /// Solver time budget in milliseconds.
    ///
    /// Honored by `brute-force` only; `microlp` has no time limit and
    /// runs to completion.
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Form of the finish-time rows.
    #[arg(long, value_enum, default_value_t = Linkage::PerPeriod)]
    linkage: Linkage,

    /// Allow actions to finish after the last period.
    #[arg(long)]
    no_horizon_gating: bool,

    /// Print the schedule as JSON.
    #[arg(long)]
    json: bool,

    /// Print plan metrics.
    #[arg(long)]
    kpi: bool,
}

fn sample_instance() -> Instance {
    Instance::new(
        vec![Asset::new(10, 0.5), Asset::new(5, 1.0)],
        vec![
            Component::from_tables(vec![1, 2], vec![3, 4], 1, 3.0),
            Component::from_tables(vec![3, 4], vec![5, 2], 1, 2.5),
            Component::from_tables(vec![5, 6], vec![2, 8], 2, 2.0),
        ],
        100,
    )
}

fn load_instance(path: &Path) -> Result<Instance> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse instance {}", path.display()))
}

fn print_schedule(instance: &Instance, schedule: &Schedule) {
    for c in instance.component_ids() {
        println!();
        for a in instance.asset_ids() {
            if let Some(plan) = schedule.get(a, c) {
                println!(
                    "Asset {}, Component {}, Choice = {}, Start = {}",
                    a.index() + 1,
                    c.index() + 1,
                    plan.choice,
                    plan.start
                );
            }
        }
    }
    println!(
        "\nSolution status = {} and model status = {}",
        schedule.solution_status, schedule.model_status
    );
}

fn print_kpi(kpi: &PlanKpi) {
    println!();
    println!("Repairs = {}, Orders = {}", kpi.repairs, kpi.orders);
    println!(
        "Order cost = {:.2}, Delay cost = {:.2}, Total cost = {:.2}",
        kpi.order_cost, kpi.delay_cost, kpi.total_cost
    );
    println!(
        "Total delay = {}, Max delay = {}, On-time rate = {:.0}%",
        kpi.total_delay,
        kpi.max_delay,
        kpi.on_time_rate * 100.0
    );
    for (i, completion) in kpi.completions.iter().enumerate() {
        if let Some(period) = completion {
            println!("Asset {} completes at {}", i + 1, period);
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let instance = match &args.instance {
        Some(path) => load_instance(path)?,
        None => sample_instance(),
    };
    info!(
        assets = instance.asset_count(),
        components = instance.component_count(),
        periods = instance.period_count(),
        "instance loaded"
    );

    let options = ModelOptions::default()
        .with_finish_linkage(args.linkage.into())
        .with_horizon_gating(!args.no_horizon_gating);
    let mut config = SolverConfig::default();
    if let Some(limit) = args.time_limit_ms {
        config = config.with_time_limit_ms(limit);
    }
    let planner = Planner::new().with_options(options).with_config(config);

    let solver: Box<dyn MilpSolver> = match args.solver {
        SolverKind::Microlp => Box::new(MicroLpSolver::new()),
        SolverKind::BruteForce => Box::new(BruteForceSolver::new()),
    };
    let schedule = planner
        .plan(&instance, solver.as_ref())
        .context("planning failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule).context("failed to serialize schedule")?);
    } else {
        print_schedule(&instance, &schedule);
    }

    if args.kpi {
        let kpi = PlanKpi::calculate(&schedule, &instance);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&kpi).context("failed to serialize metrics")?);
        } else {
            print_kpi(&kpi);
        }
    }

    Ok(())
}
