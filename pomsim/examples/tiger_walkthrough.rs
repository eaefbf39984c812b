use anyhow::Result;
use clap::Parser;
use log::info;
use pomsim::{
    core::{
        DiscreteBelief, HistoryRecorder, RolloutSimulator, SimulatorConfig, StepFields,
        StepThroughSimulator,
    },
    models::{DiscreteUpdater, FunctionPolicy, TigerAction, TigerPomdp, TigerState},
};

/// Walks through the tiger problem with a policy that always listens.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of steps of each run.
    #[arg(long, default_value_t = 5)]
    max_steps: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fields shown in the step-through, e.g., "s,a,o,r".
    #[arg(long, default_value = "s,a,o,r,bp")]
    fields: String,
}

fn listen() -> FunctionPolicy<impl FnMut(&DiscreteBelief<TigerState>) -> TigerAction> {
    FunctionPolicy::new(|_: &DiscreteBelief<TigerState>| TigerAction::Listen)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let pomdp = TigerPomdp::default();
    let updater = DiscreteUpdater;
    let config = SimulatorConfig::default()
        .max_steps(args.max_steps)
        .seed(args.seed);

    info!("Step-through");
    let fields: StepFields = args.fields.parse()?;
    let mut policy = listen();
    for record in StepThroughSimulator::new(config.clone())
        .run(&pomdp, &mut policy, &updater)?
        .fields(fields.clone())
    {
        let record = record?;
        let line = fields
            .as_slice()
            .iter()
            .map(|f| {
                let v = record
                    .get(f.name())
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                format!("{} = {}", f.name(), v)
            })
            .collect::<Vec<_>>()
            .join(", ");
        info!("{}", line);
    }

    let reward = RolloutSimulator::new(config.clone()).simulate(&pomdp, &mut listen(), &updater)?;
    info!("Rollout: discounted reward = {}", reward);

    let history = HistoryRecorder::new(config).simulate(&pomdp, &mut listen(), &updater)?;
    info!(
        "History: {} steps, discounted reward = {}, undiscounted reward = {}",
        history.n_steps(),
        history.discounted_reward(),
        history.undiscounted_reward()
    );
    for step in history.each_step(&"t,o,bp".parse::<StepFields>()?) {
        info!("{:?}", step);
    }
    info!("Final belief: {:?}", history.final_belief());

    Ok(())
}
