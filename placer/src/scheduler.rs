use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use rand::{RngCore, SeedableRng, rngs::SmallRng};
use rand_xoshiro::SplitMix64;
use tracing::{debug, info, warn};

use crate::config::PlacementConfig;
use crate::error::{PlacerError, PlacerResult};
use crate::picker::CandidateSource;
use crate::sequence::{OutputSample, SequenceBuilder};

/// Split `[0, total)` into `workers` contiguous shards of `total / workers`
/// indices each. The remainder is not assigned to anyone.
pub fn partition(total: u64, workers: usize) -> Vec<Range<u64>> {
    let workers = workers as u64;
    if workers == 0 {
        return Vec::new();
    }
    let shard = total / workers;
    (0..workers).map(|i| i * shard..(i + 1) * shard).collect()
}

/// Independent, reproducible seed for one worker's generator.
pub fn worker_seed(global_seed: u64, worker: usize) -> u64 {
    SplitMix64::seed_from_u64(global_seed.wrapping_add(worker as u64)).next_u64()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub requested: u64,
    pub produced: u64,
    /// Tail of the requested range left over by the even split.
    pub dropped: u64,
    pub labels: u64,
    pub short_samples: u64,
}

/// Fixed pool of OS threads, one per shard, each with its own rng.
pub struct Scheduler {
    workers: usize,
    seed: u64,
}

impl Scheduler {
    pub fn new(workers: usize, seed: u64) -> PlacerResult<Self> {
        if workers == 0 {
            return Err(PlacerError::invalid_config("worker count must be at least 1"));
        }
        Ok(Self { workers, seed })
    }

    /// Number of samples a run over `total` requested samples will emit.
    pub fn planned(&self, total: u64) -> u64 {
        total / self.workers as u64 * self.workers as u64
    }

    /// Build every sample in every shard and hand each one to `emit`.
    ///
    /// `emit` runs on the worker threads. The first error it returns stops that
    /// worker, the others stop after their current sample, and the error is
    /// returned once all workers have joined. An invalid `cfg` or a worker that
    /// cannot be spawned is reported through the same error type.
    pub fn run<S, E, EmitErr, P>(
        &self,
        source: &S,
        cfg: &PlacementConfig,
        total: u64,
        emit: E,
        on_progress: P,
    ) -> Result<RunSummary, EmitErr>
    where
        S: CandidateSource,
        E: Fn(OutputSample) -> Result<(), EmitErr> + Sync,
        EmitErr: From<PlacerError> + Send,
        P: Fn() + Sync,
    {
        let builder = SequenceBuilder::new(source, cfg)?;

        let shards = partition(total, self.workers);
        let planned = self.planned(total);
        let dropped = total - planned;
        info!(
            workers = self.workers,
            seed = self.seed,
            shard_size = total / self.workers as u64,
            planned,
            "starting workers"
        );
        if dropped > 0 {
            warn!(dropped, "requested count is not a multiple of the worker count; tail is skipped");
        }

        let produced = AtomicU64::new(0);
        let labels = AtomicU64::new(0);
        let short_samples = AtomicU64::new(0);
        let failed = AtomicBool::new(false);

        let (spawn_error, results) = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(shards.len());
            let mut spawn_error = None;

            for (worker, range) in shards.into_iter().enumerate() {
                let seed = worker_seed(self.seed, worker);
                let (builder, emit, on_progress) = (&builder, &emit, &on_progress);
                let (produced, labels, short_samples, failed) =
                    (&produced, &labels, &short_samples, &failed);

                let spawned = thread::Builder::new()
                    .name(format!("seqsynth-worker-{worker}"))
                    .spawn_scoped(scope, move || -> Result<(), EmitErr> {
                        debug!(worker, start = range.start, end = range.end, seed, "worker started");
                        let mut rng = SmallRng::seed_from_u64(seed);
                        for index in range {
                            if failed.load(Ordering::Relaxed) {
                                debug!(worker, index, "stopping after failure elsewhere");
                                return Ok(());
                            }
                            let sample = builder.build(index, &mut rng);
                            let placed = sample.entries.len() as u64;
                            let short = sample.is_short();
                            if let Err(e) = emit(sample) {
                                failed.store(true, Ordering::Relaxed);
                                return Err(e);
                            }
                            labels.fetch_add(placed, Ordering::Relaxed);
                            if short {
                                short_samples.fetch_add(1, Ordering::Relaxed);
                            }
                            produced.fetch_add(1, Ordering::Relaxed);
                            on_progress();
                        }
                        debug!(worker, "worker finished");
                        Ok(())
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        failed.store(true, Ordering::Relaxed);
                        spawn_error = Some(PlacerError::from(e));
                        break;
                    }
                }
            }

            let results: Vec<Result<(), EmitErr>> = handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect();
            (spawn_error, results)
        });

        if let Some(e) = spawn_error {
            return Err(e.into());
        }
        for result in results {
            result?;
        }

        Ok(RunSummary {
            requested: total,
            produced: produced.into_inner(),
            dropped,
            labels: labels.into_inner(),
            short_samples: short_samples.into_inner(),
        })
    }
}
