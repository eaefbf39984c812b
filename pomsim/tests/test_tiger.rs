use anyhow::Result;
use pomsim::{
    core::{
        error::SimError, Belief, DiscreteBelief, HistoryRecorder, RolloutSimulator,
        SimulatorConfig, StepFields, StepThroughSimulator,
    },
    models::{DiscreteUpdater, FunctionPolicy, TigerAction, TigerPomdp, TigerState},
};
use tempdir::TempDir;
use test_log::test;

fn listen() -> FunctionPolicy<impl FnMut(&DiscreteBelief<TigerState>) -> TigerAction> {
    FunctionPolicy::new(|_: &DiscreteBelief<TigerState>| TigerAction::Listen)
}

#[test]
fn test_stepthrough_and_history_agree() -> Result<()> {
    let pomdp = TigerPomdp::default();
    let config = SimulatorConfig::default().max_steps(5).seed(42);

    let mut policy = listen();
    let mut iter =
        StepThroughSimulator::new(config.clone()).run(&pomdp, &mut policy, &DiscreteUpdater)?;
    let mut rewards = vec![];
    for step in &mut iter {
        let step = step?;
        assert_eq!(step.act, TigerAction::Listen);
        assert_eq!(step.state, step.next_state);
        rewards.push(step.reward);
    }
    let (_, stepthrough_belief) = iter.into_state_belief();

    let history = HistoryRecorder::new(config).simulate(&pomdp, &mut listen(), &DiscreteUpdater)?;
    assert_eq!(history.n_steps(), 5);
    assert_eq!(rewards, vec![-1.0; 5]);
    assert_eq!(history.reward_hist(), rewards);
    assert_eq!(history.final_belief(), &stepthrough_belief);
    assert_eq!(history.belief_hist().len(), 5);
    assert_eq!(history.state_hist().len(), 6);

    // The belief only moves towards the side heard.
    for step in history.steps() {
        let before = step.belief.pdf(&TigerState::TigerLeft);
        let after = step.next_belief.pdf(&TigerState::TigerLeft);
        match step.obs {
            pomsim::models::TigerObs::HearLeft => assert!(after > before),
            pomsim::models::TigerObs::HearRight => assert!(after < before),
        }
    }
    Ok(())
}

#[test]
fn test_listening_forever_converges() -> Result<()> {
    let pomdp = TigerPomdp::default().r_listen(-5.0);
    let rollout = |max_steps: usize| -> Result<f64> {
        let config = SimulatorConfig::default().max_steps(max_steps).seed(0);
        RolloutSimulator::new(config).simulate(&pomdp, &mut listen(), &DiscreteUpdater)
    };

    // -5 (1 - 0.95^5) / (1 - 0.95)
    let expected_5 = -5.0 * (1.0 + 0.95 + 0.9025 + 0.857375 + 0.81450625);
    assert!((rollout(5)? - expected_5).abs() < 1e-9);

    // -5 / (1 - 0.95)
    let r = rollout(1_000_000)?;
    assert!((r + 100.0).abs() < 1e-6, "r = {}", r);
    Ok(())
}

#[test]
fn test_eps_cutoff_matches_long_rollout() -> Result<()> {
    let pomdp = TigerPomdp::default().r_listen(-5.0);
    let config = SimulatorConfig::default().seed(3).eps(1e-12);
    let r = RolloutSimulator::new(config).simulate(&pomdp, &mut listen(), &DiscreteUpdater)?;
    assert!((r + 100.0).abs() < 1e-9, "r = {}", r);
    Ok(())
}

#[test]
fn test_selected_fields() -> Result<()> {
    let pomdp = TigerPomdp::default();
    let mut policy = listen();
    let records = StepThroughSimulator::new(SimulatorConfig::default().max_steps(3).seed(1))
        .run(&pomdp, &mut policy, &DiscreteUpdater)?
        .fields("a,r".parse()?)
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(records.len(), 3);
    for record in records {
        assert_eq!(record.len(), 2);
        assert_eq!(record.get_string("a")?, "Listen");
        assert_eq!(record.get_scalar("r")?, -1.0);
    }

    let err = "a,reward".parse::<StepFields>().unwrap_err();
    assert!(matches!(err, SimError::UnknownStepField(name) if name == "reward"));
    Ok(())
}

#[test]
fn test_config_from_yaml() -> Result<()> {
    let dir = TempDir::new("tiger_config")?;
    let path = dir.path().join("simulator.yaml");
    std::fs::write(&path, "max_steps: 7\nseed: 5\neps: ~\ncapture_errors: false\nshow_progress: false\n")?;

    let config = SimulatorConfig::load(&path)?;
    assert_eq!(config, SimulatorConfig::default().max_steps(7).seed(5));
    let history =
        HistoryRecorder::new(config).simulate(&TigerPomdp::default(), &mut listen(), &DiscreteUpdater)?;
    assert_eq!(history.n_steps(), 7);
    Ok(())
}

#[test]
fn test_runs_must_be_bounded() {
    // Listening never reaches a terminal state.
    let pomdp = TigerPomdp::default();
    let is_config_error =
        |e: anyhow::Error| matches!(e.downcast_ref::<SimError>(), Some(SimError::Config(_)));

    let err = RolloutSimulator::default()
        .simulate(&pomdp, &mut listen(), &DiscreteUpdater)
        .err();
    assert!(err.map_or(false, is_config_error));
    let err = HistoryRecorder::default()
        .simulate(&pomdp, &mut listen(), &DiscreteUpdater)
        .err();
    assert!(err.map_or(false, is_config_error));

    let pomdp = TigerPomdp {
        discount: 1.5,
        ..TigerPomdp::default()
    };
    let err = RolloutSimulator::new(SimulatorConfig::default().max_steps(2000))
        .simulate(&pomdp, &mut listen(), &DiscreteUpdater)
        .err();
    assert!(err.map_or(false, is_config_error));
}
