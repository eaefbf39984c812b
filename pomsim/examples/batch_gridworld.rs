use anyhow::Result;
use clap::Parser;
use log::info;
use pomsim::{
    core::{
        record::{Record, REWARD_KEY},
        BatchConfig, BatchRunner, Deterministic, Policy, Process, Sim,
    },
    models::{FullyObservableUpdater, FunctionPolicy, GridAction, GridState, GridWorld, RandomPolicy},
};

type GridPolicy = Box<dyn Policy<GridWorld, Deterministic<GridState>> + Send>;

/// Compares a random policy with a greedy one on the grid world.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of worker threads.
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Number of runs per policy.
    #[arg(long, default_value_t = 100)]
    runs: u64,

    /// Maximum number of steps of a run.
    #[arg(long, default_value_t = 200)]
    max_steps: usize,

    /// Reports progress of the batch.
    #[arg(long, default_value_t = false)]
    show_progress: bool,

    /// Saves the result table as CSV.
    #[arg(long)]
    csv: Option<String>,
}

/// Heads to the +10 cell at (9, 3).
fn greedy_action(b: &Deterministic<GridState>) -> GridAction {
    match b.state() {
        GridState::At(pos) if pos.x < 9 => GridAction::Right,
        GridState::At(pos) if pos.x > 9 => GridAction::Left,
        GridState::At(pos) if pos.y < 3 => GridAction::Up,
        _ => GridAction::Down,
    }
}

fn sims(args: &Args) -> Result<Vec<Sim<GridWorld, GridPolicy, FullyObservableUpdater>>> {
    let grid = GridWorld::default();
    let mut sims = vec![];

    for seed in 0..args.runs {
        let random: GridPolicy = Box::new(RandomPolicy::from_process(&grid, seed)?);
        let greedy: GridPolicy = Box::new(FunctionPolicy::new(greedy_action));
        for (name, policy) in [("random", random), ("greedy", greedy)] {
            sims.push(
                Sim::builder()
                    .process(grid.clone())
                    .policy(policy)
                    .updater(FullyObservableUpdater)
                    .max_steps(args.max_steps)
                    .seed(seed)
                    .metadata("policy", name)
                    .metadata("seed", seed as i64)
                    .build()?,
            );
        }
    }

    Ok(sims)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = BatchConfig::default()
        .n_workers(args.workers)
        .show_progress(args.show_progress);
    let table = BatchRunner::new(config).run_with(sims(&args)?, |sim, history| {
        let mut record = Record::empty();
        record.insert("n_steps", history.n_steps());
        let reached = sim.process.is_terminal(history.final_state());
        record.insert("reached_terminal", reached as i64);
        Ok(record)
    })?;

    for name in ["random", "greedy"] {
        let rows = table
            .rows()
            .iter()
            .filter(|row| row.get_string("policy").map_or(false, |p| p == name))
            .cloned()
            .collect::<Vec<_>>();
        let summary = pomsim::core::record::ResultTable::new(rows).summarize(REWARD_KEY)?;
        info!(
            "{}: mean reward = {:.3} (sem {:.3}), over {} runs",
            name,
            summary.get_scalar("reward_mean")?,
            summary.get_scalar("reward_sem")?,
            summary.get_integer("reward_count")?
        );
    }

    if let Some(path) = args.csv {
        table.save_csv(&path)?;
        info!("Saved {} rows to {}", table.len(), path);
    }

    Ok(())
}
