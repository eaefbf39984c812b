use anyhow::Result;
use pomsim::{
    core::{
        record::{Record, ResultTable, ERROR_KEY, REWARD_KEY},
        BatchConfig, BatchRunner, DiscreteBelief, Policy, RolloutSimulator, Sim, SimulatorConfig,
    },
    models::{DiscreteUpdater, FunctionPolicy, RandomPolicy, TigerAction, TigerPomdp, TigerState},
};
use tempdir::TempDir;
use test_log::test;

type TigerPolicy = Box<dyn Policy<TigerPomdp, DiscreteBelief<TigerState>> + Send>;
type TigerSim = Sim<TigerPomdp, TigerPolicy, DiscreteUpdater>;

/// Opens a door once the belief is confident enough.
fn threshold(b: &DiscreteBelief<TigerState>) -> TigerAction {
    match b.prob_at(0) {
        p if p > 0.9 => TigerAction::OpenRight,
        p if p < 0.1 => TigerAction::OpenLeft,
        _ => TigerAction::Listen,
    }
}

fn policy(name: &str, seed: u64) -> Result<TigerPolicy> {
    let policy: TigerPolicy = match name {
        "listen" => Box::new(FunctionPolicy::new(|_: &DiscreteBelief<TigerState>| {
            TigerAction::Listen
        })),
        "threshold" => Box::new(FunctionPolicy::new(threshold)),
        _ => Box::new(RandomPolicy::from_process(&TigerPomdp::default(), seed)?),
    };
    Ok(policy)
}

fn tiger_sims(n: u64) -> Result<Vec<TigerSim>> {
    let mut sims = vec![];
    for seed in 0..n {
        for name in ["listen", "threshold", "random"] {
            sims.push(
                Sim::builder()
                    .process(TigerPomdp::default())
                    .policy(policy(name, seed)?)
                    .updater(DiscreteUpdater)
                    .max_steps(20)
                    .seed(seed)
                    .metadata("policy", name)
                    .metadata("seed", seed as i64)
                    .build()?,
            );
        }
    }
    Ok(sims)
}

#[test]
fn test_rows_follow_input_order() -> Result<()> {
    let table = BatchRunner::new(BatchConfig::default().n_workers(4)).run(tiger_sims(10)?)?;
    assert_eq!(table.len(), 30);
    assert_eq!(table.n_failed(), 0);

    for (ix, mut sim) in tiger_sims(10)?.into_iter().enumerate() {
        let row = &table[ix];
        assert_eq!(row.get_integer("seed")?, (ix / 3) as i64);
        assert_eq!(row.get_string("policy")?, ["listen", "threshold", "random"][ix % 3]);

        let config = SimulatorConfig::default().max_steps(20).seed(sim.seed);
        let r = RolloutSimulator::new(config).simulate(&sim.process, &mut sim.policy, &sim.updater)?;
        assert_eq!(row.get_scalar(REWARD_KEY)?, r);
    }

    let sequential = BatchRunner::new(BatchConfig::default().n_workers(1)).run(tiger_sims(10)?)?;
    assert_eq!(sequential.rows(), table.rows());
    Ok(())
}

#[test]
fn test_failing_model_is_isolated() -> Result<()> {
    let mut sims = tiger_sims(2)?;
    sims[1].process = TigerPomdp::default().p_listen_correctly(1.5);

    let table = BatchRunner::new(BatchConfig::default().n_workers(3)).run(sims)?;
    assert_eq!(table.len(), 6);
    assert_eq!(table.n_failed(), 1);

    let errors = table.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, 1);
    assert!(errors[0].1.contains("p_listen_correctly"));
    assert_eq!(table[1].get_string("policy")?, "threshold");

    let rewards = table.scalars(REWARD_KEY)?;
    assert_eq!(rewards.len(), 5);
    assert_eq!(table.summarize(REWARD_KEY)?.get_integer("reward_count")?, 5);
    Ok(())
}

#[test]
fn test_analysis_and_csv() -> Result<()> {
    let table = BatchRunner::new(BatchConfig::default().n_workers(2)).run_with(
        tiger_sims(3)?,
        |_, history| {
            let n_listen = history
                .action_hist()
                .into_iter()
                .filter(|a| **a == TigerAction::Listen)
                .count();
            let mut record = Record::empty();
            record.insert("n_listen", n_listen);
            record.insert("undiscounted_reward", history.undiscounted_reward());
            Ok(record)
        },
    )?;
    assert_eq!(
        table.columns(),
        vec!["n_listen", "policy", "reward", "seed", "undiscounted_reward"]
    );
    for row in table.rows().iter().filter(|r| r.get_string("policy").unwrap() == "listen") {
        assert_eq!(row.get_integer("n_listen")?, 20);
        assert_eq!(row.get_scalar("undiscounted_reward")?, -20.0);
    }

    let dir = TempDir::new("batch_csv")?;
    let path = dir.path().join("results.csv");
    table.save_csv(&path)?;

    let mut rdr = csv::Reader::from_path(&path)?;
    let header: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    assert_eq!(header, table.columns());
    let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(rows.len(), table.len());

    let ix_reward = header.iter().position(|h| h == REWARD_KEY).unwrap();
    for (row, record) in rows.iter().zip(table.rows()) {
        let r: f64 = row[ix_reward].parse()?;
        assert_eq!(r, record.get_scalar(REWARD_KEY)?);
    }
    assert!(!header.iter().any(|h| h == ERROR_KEY));
    Ok(())
}

#[test]
fn test_summary_of_subtable() -> Result<()> {
    let table = BatchRunner::new(BatchConfig::default().n_workers(2)).run(tiger_sims(5)?)?;
    let listen: Vec<Record> = table
        .rows()
        .iter()
        .filter(|r| r.get_string("policy").map_or(false, |p| p == "listen"))
        .cloned()
        .collect();
    let summary = ResultTable::new(listen).summarize(REWARD_KEY)?;

    // Listening always earns the same reward.
    let expected = (0..20).fold((0.0, 1.0), |(r, d), _| (r - d, d * 0.95)).0;
    assert_eq!(summary.get_integer("reward_count")?, 5);
    assert!((summary.get_scalar("reward_mean")? - expected).abs() < 1e-9);
    assert!(summary.get_scalar("reward_std")?.abs() < 1e-9);
    assert_eq!(summary.get_scalar("reward_min")?, summary.get_scalar("reward_max")?);
    Ok(())
}

#[test]
fn test_reserved_columns() -> Result<()> {
    let err = Sim::builder()
        .process(TigerPomdp::default())
        .policy(policy("listen", 0)?)
        .updater(DiscreteUpdater)
        .max_steps(5)
        .metadata(ERROR_KEY, "none")
        .build()
        .err();
    assert!(err.map_or(false, |e| e.to_string().contains("reserved key")));

    let table = BatchRunner::new(BatchConfig::default().n_workers(2))
        .run_with(tiger_sims(1)?, |_, history| {
            Ok(Record::from_scalar(REWARD_KEY, history.undiscounted_reward()))
        })?;
    assert_eq!(table.n_failed(), 3);
    assert!(table.scalars(REWARD_KEY)?.is_empty());
    Ok(())
}
