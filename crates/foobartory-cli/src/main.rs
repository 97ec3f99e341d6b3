//! foobartory: run the factory until the worker pool reaches its goal.
//!
//! # Usage
//!
//! ```text
//! foobartory --goal 30 --time-scale 0.01 --seed 42
//! foobartory --config factory.json --json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use foobartory_core::{Dispatcher, FactoryConfig, RunReport};
use tracing::info;

#[derive(Parser)]
#[command(name = "foobartory", about = "Foo/bar factory simulation")]
struct Cli {
    /// JSON config file. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Workers spawned at start.
    #[arg(long)]
    initial_workers: Option<usize>,

    /// Stop once the pool has this many workers.
    #[arg(long)]
    goal: Option<usize>,

    /// Multiplier on every task duration (0 = no waiting).
    #[arg(long)]
    time_scale: Option<f64>,

    /// Seed for a reproducible random source.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<FactoryConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                FactoryConfig::from_json_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => FactoryConfig::default(),
        };

        if let Some(n) = self.initial_workers {
            config.initial_worker_count = n;
        }
        if let Some(n) = self.goal {
            config.goal_worker_count = n;
        }
        if let Some(scale) = self.time_scale {
            config.time_scale = scale;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,foobartory_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    let dispatcher = Dispatcher::builder(config)
        .build()
        .context("building dispatcher")?;
    let report = dispatcher.run().await.context("factory run failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        summarize(&report);
    }
    Ok(())
}

fn summarize(report: &RunReport) {
    let elapsed = report.finished_at - report.started_at;
    let l = &report.ledger;
    info!(
        run = %report.run_id,
        workers = report.pool_size,
        goal = report.goal_worker_count,
        elapsed_ms = elapsed.num_milliseconds(),
        "goal reached"
    );
    info!(
        foo = l.foo,
        bar = l.bar,
        foobar = l.foobar,
        money = l.money,
        "remaining stock"
    );
    info!(
        mine_foo = report.tasks_issued.mine_foo,
        mine_bar = report.tasks_issued.mine_bar,
        process = report.tasks_issued.process,
        sell = report.tasks_issued.sell,
        buy_worker = report.tasks_issued.buy_worker,
        process_failed = report.outcomes_applied.process_failed,
        "tasks issued"
    );
}
