//! Parallel execution of simulation descriptors.
use super::{BatchConfig, Sim};
use crate::{
    error::SimError,
    progress::Progress,
    record::{check_reserved, Record, ResultTable, ERROR_KEY, REWARD_KEY},
    simulator::{HistoryOf, HistoryRecorder, RolloutSimulator, SimulatorConfig},
    Policy, Process, Updater,
};
use anyhow::Result;
use crossbeam_channel::{bounded, unbounded};
use log::{debug, info, warn};
use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
    thread,
};

/// Signature of per-run analysis functions.
pub type AnalysisFn<P, Pol, U> = fn(&Sim<P, Pol, U>, &HistoryOf<P, U>) -> Result<Record>;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs batches of [`Sim`]s, possibly on multiple worker threads.
///
/// ```mermaid
/// graph LR
///     A[Vec of Sim] -->|"(index, Sim)"|W1[Worker 1]
///     A -->|"(index, Sim)"|W2[Worker n]
///     W1 -->|"(index, Record)"|T[ResultTable]
///     W2 -->|"(index, Record)"|T
/// ```
///
/// The result table has one row per descriptor, in the order of the input,
/// whatever the order in which the runs complete. A row holds the metadata
/// of its descriptor and the discounted reward under [`REWARD_KEY`].
///
/// A failing run does not abort the others: its row holds the metadata and
/// the error message under [`ERROR_KEY`]. Panics of a run are caught and
/// recorded in the same way.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    /// Constructs the runner.
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Configuration of the runner.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Runs the simulations and returns their discounted rewards.
    pub fn run<P, Pol, U>(&self, sims: Vec<Sim<P, Pol, U>>) -> Result<ResultTable>
    where
        P: Process + Send,
        Pol: Policy<P, U::Belief> + Send,
        U: Updater<P> + Send,
    {
        self.execute(sims, None::<&AnalysisFn<P, Pol, U>>)
    }

    /// Runs the simulations, merging the output of `analysis` into each row.
    ///
    /// `analysis` is called with the descriptor and the full history after
    /// each run completes, possibly on several threads at once. An error
    /// returned by `analysis`, or a returned record using [`REWARD_KEY`] or
    /// [`ERROR_KEY`], marks the row as failed.
    pub fn run_with<P, Pol, U, F>(&self, sims: Vec<Sim<P, Pol, U>>, analysis: F) -> Result<ResultTable>
    where
        P: Process + Send,
        Pol: Policy<P, U::Belief> + Send,
        U: Updater<P> + Send,
        F: Fn(&Sim<P, Pol, U>, &HistoryOf<P, U>) -> Result<Record> + Sync,
    {
        self.execute(sims, Some(&analysis))
    }

    fn execute<P, Pol, U, F>(
        &self,
        sims: Vec<Sim<P, Pol, U>>,
        analysis: Option<&F>,
    ) -> Result<ResultTable>
    where
        P: Process + Send,
        Pol: Policy<P, U::Belief> + Send,
        U: Updater<P> + Send,
        F: Fn(&Sim<P, Pol, U>, &HistoryOf<P, U>) -> Result<Record> + Sync,
    {
        if self.config.n_workers == 0 {
            return Err(SimError::Config("n_workers must be positive".to_string()).into());
        }

        let n_sims = sims.len();
        let n_workers = self.config.n_workers.min(n_sims).max(1);
        let progress = match self.config.show_progress {
            true => Progress::begin("Simulations", Some(n_sims)),
            false => Progress::disabled(),
        };
        info!("Runs {} simulations on {} worker(s)", n_sims, n_workers);

        let mut rows: Vec<Option<Record>> = vec![None; n_sims];

        if n_workers == 1 {
            for (ix, sim) in sims.into_iter().enumerate() {
                rows[ix] = Some(run_one(ix, sim, analysis));
                progress.advance(1);
            }
        } else {
            let (job_s, job_r) = bounded::<(usize, Sim<P, Pol, U>)>(n_workers);
            let (row_s, row_r) = unbounded::<(usize, Record)>();

            thread::scope(|scope| {
                for id in 0..n_workers {
                    let job_r = job_r.clone();
                    let row_s = row_s.clone();
                    let progress = &progress;
                    scope.spawn(move || {
                        for (ix, sim) in job_r.iter() {
                            let row = run_one(ix, sim, analysis);
                            progress.advance(1);
                            if row_s.send((ix, row)).is_err() {
                                break;
                            }
                        }
                        debug!("Stopped worker {}", id);
                    });
                }
                drop(job_r);
                drop(row_s);

                for job in sims.into_iter().enumerate() {
                    if job_s.send(job).is_err() {
                        warn!("All workers stopped before the batch was dispatched");
                        break;
                    }
                }
                drop(job_s);

                for (ix, row) in row_r.iter() {
                    rows[ix] = Some(row);
                }
            });
        }

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(ix, row)| {
                row.unwrap_or_else(|| {
                    Record::from_slice(&[(ERROR_KEY, format!("simulation {} was not run", ix).into())])
                })
            })
            .collect();
        let table = ResultTable::new(rows);
        if table.n_failed() > 0 {
            warn!("{} of {} simulations failed", table.n_failed(), n_sims);
        }

        Ok(table)
    }
}

/// Runs a simulation and returns its result row.
fn run_one<P, Pol, U, F>(ix: usize, mut sim: Sim<P, Pol, U>, analysis: Option<&F>) -> Record
where
    P: Process,
    Pol: Policy<P, U::Belief>,
    U: Updater<P>,
    F: Fn(&Sim<P, Pol, U>, &HistoryOf<P, U>) -> Result<Record>,
{
    let result = catch_unwind(AssertUnwindSafe(|| simulate(&mut sim, analysis)))
        .unwrap_or_else(|payload| {
            Err(SimError::WorkerPanic {
                index: ix,
                message: panic_message(payload.as_ref()),
            }
            .into())
        });

    match result {
        Ok(record) => sim.metadata.merge(record),
        Err(e) => {
            warn!("Simulation {} failed: {:#}", ix, e);
            let mut row = sim.metadata;
            row.insert(ERROR_KEY, format!("{:#}", e));
            row
        }
    }
}

fn simulate<P, Pol, U, F>(sim: &mut Sim<P, Pol, U>, analysis: Option<&F>) -> Result<Record>
where
    P: Process,
    Pol: Policy<P, U::Belief>,
    U: Updater<P>,
    F: Fn(&Sim<P, Pol, U>, &HistoryOf<P, U>) -> Result<Record>,
{
    check_reserved(&sim.metadata, "metadata")?;
    let config = SimulatorConfig::default()
        .max_steps(sim.max_steps)
        .seed(sim.seed);

    match analysis {
        None => {
            let r = RolloutSimulator::new(config).simulate(&sim.process, &mut sim.policy, &sim.updater)?;
            Ok(Record::from_scalar(REWARD_KEY, r))
        }
        Some(f) => {
            let history =
                HistoryRecorder::new(config).simulate(&sim.process, &mut sim.policy, &sim.updater)?;
            let analysed = f(&*sim, &history)?;
            check_reserved(&analysed, "analysis output")?;
            Ok(Record::from_scalar(REWARD_KEY, history.discounted_reward()).merge(analysed))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
