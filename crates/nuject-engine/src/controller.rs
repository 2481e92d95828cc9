//! Run orchestration: drives the injector for N events and streams them out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nuject_core::{ErrorInfo, Event, FinalStateSampler, InjectError, RngHandle};
use nuject_xs::CrossSectionProvider;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::determinism;
use crate::injector::Injector;
use crate::kinematics::KinematicsSampler;
use crate::sink::OutputSink;

/// Controller lifecycle. `Finished` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Configuration and table validated; ready to run.
    Configured,
    /// Event loop in progress.
    Running,
    /// All requested events emitted (or a cooperative cancel honoured).
    Finished,
    /// A run-fatal error was encountered; partial output already flushed
    /// stays on disk and is the caller's bookkeeping to mark incomplete.
    Failed,
}

/// Summary returned to callers after a run completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Events the configuration asked for.
    pub events_requested: usize,
    /// Events actually generated and appended (lower only after a cancel).
    pub events_generated: usize,
    /// Sum of all emitted weights.
    pub total_weight: f64,
    /// Mean emitted weight (0 when nothing was generated).
    pub mean_weight: f64,
    /// Transient per-event retries spent across the run.
    pub retries: usize,
}

/// Drives the injector for a configured number of events, forwarding each
/// finished event record to the output sink.
pub struct Controller {
    config: RunConfig,
    injector: Injector,
    master_seed: u64,
    phase: Phase,
    cancel: Arc<AtomicBool>,
}

impl Controller {
    /// Validates the configuration, loads the cross-section table, and
    /// builds the run. Any table problem surfaces here, before any event
    /// exists.
    pub fn new(config: RunConfig) -> Result<Self, InjectError> {
        config.validate()?;
        let provider = CrossSectionProvider::load(&config.table.path)?;
        let channel = config.build_channel()?;
        if let Some((final_1, final_2)) = provider.table().final_state() {
            if (final_1, final_2) != (channel.final_type_1, channel.final_type_2) {
                return Err(InjectError::Configuration(
                    ErrorInfo::new(
                        "channel-table-mismatch",
                        "cross-section table was produced for a different final state",
                    )
                    .with_context("configured", format!("{:?}", (channel.final_type_1, channel.final_type_2)))
                    .with_context("table", format!("{:?}", (final_1, final_2)))
                    .with_context("path", config.table.path.display().to_string()),
                ));
            }
        }
        Self::with_sampler(config, Arc::new(provider))
    }

    /// Builds the run around an externally supplied final-state sampler,
    /// bypassing the table load. Used for alternative channel physics and
    /// synthetic samplers in tests.
    pub fn with_sampler(
        config: RunConfig,
        sampler: Arc<dyn FinalStateSampler>,
    ) -> Result<Self, InjectError> {
        config.validate()?;
        let channel = config.build_channel()?;
        let injector = Injector::new(
            channel,
            config.build_spectrum()?,
            config.build_acceptance()?,
            config.build_geometry()?,
            KinematicsSampler::new(sampler),
            config.normalization,
        );
        Ok(Self {
            master_seed: config.seed_policy.master_seed,
            config,
            injector,
            phase: Phase::Configured,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The validated configuration this run executes.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Cooperative stop signal, checked between event generations. An
    /// in-flight event finishes normally; nothing partial is ever emitted.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs the configured event loop, streaming every event to `sink`.
    ///
    /// On success the sink is closed and the controller finishes; on any
    /// run-fatal error the controller transitions to `Failed` and the error
    /// carries the offending event index.
    pub fn run(&mut self, sink: &mut dyn OutputSink) -> Result<RunSummary, InjectError> {
        if self.phase != Phase::Configured {
            return Err(InjectError::Configuration(
                ErrorInfo::new("controller-phase", "controller can only run once")
                    .with_context("phase", format!("{:?}", self.phase)),
            ));
        }
        self.phase = Phase::Running;
        let outcome = self.generate_all(sink).and_then(|summary| {
            sink.close()?;
            Ok(summary)
        });
        match outcome {
            Ok(summary) => {
                self.phase = Phase::Finished;
                Ok(summary)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                Err(err)
            }
        }
    }

    fn generate_all(&self, sink: &mut dyn OutputSink) -> Result<RunSummary, InjectError> {
        if self.config.workers > 1 {
            self.generate_parallel(sink)
        } else {
            self.generate_sequential(sink)
        }
    }

    fn generate_event(&self, index: usize) -> Result<(Event, usize), InjectError> {
        let seed = determinism::event_seed(self.master_seed, index as u64);
        let mut rng = RngHandle::from_seed(seed);
        self.injector
            .generate(&mut rng)
            .map_err(|err| err.with_context("event_index", index.to_string()))
    }

    fn generate_sequential(&self, sink: &mut dyn OutputSink) -> Result<RunSummary, InjectError> {
        let requested = self.config.events;
        let mut summary = RunSummary {
            events_requested: requested,
            events_generated: 0,
            total_weight: 0.0,
            mean_weight: 0.0,
            retries: 0,
        };
        for index in 0..requested {
            if self.cancel.load(Ordering::Relaxed) {
                break;
            }
            let (event, retries) = self.generate_event(index)?;
            sink.append(&event)?;
            summary.events_generated += 1;
            summary.total_weight += event.one_weight;
            summary.retries += retries;
        }
        finalize(summary)
    }

    /// Batched parallel path. Events within a batch are generated on a
    /// dedicated worker pool and drained through the single sink; per-event
    /// seeding makes the result identical to the sequential path up to
    /// ordering inside each batch.
    fn generate_parallel(&self, sink: &mut dyn OutputSink) -> Result<RunSummary, InjectError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|err| {
                InjectError::Configuration(
                    ErrorInfo::new("worker-pool", err.to_string())
                        .with_context("workers", self.config.workers.to_string()),
                )
            })?;
        let requested = self.config.events;
        let batch_size = self.config.workers * 32;
        let mut summary = RunSummary {
            events_requested: requested,
            events_generated: 0,
            total_weight: 0.0,
            mean_weight: 0.0,
            retries: 0,
        };
        let mut start = 0;
        while start < requested {
            if self.cancel.load(Ordering::Relaxed) {
                break;
            }
            let end = (start + batch_size).min(requested);
            let batch: Result<Vec<(Event, usize)>, InjectError> = pool.install(|| {
                (start..end)
                    .into_par_iter()
                    .map(|index| self.generate_event(index))
                    .collect()
            });
            for (event, retries) in batch? {
                sink.append(&event)?;
                summary.events_generated += 1;
                summary.total_weight += event.one_weight;
                summary.retries += retries;
            }
            start = end;
        }
        finalize(summary)
    }
}

fn finalize(mut summary: RunSummary) -> Result<RunSummary, InjectError> {
    if summary.events_generated > 0 {
        summary.mean_weight = summary.total_weight / summary.events_generated as f64;
    }
    Ok(summary)
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("phase", &self.phase)
            .field("events", &self.config.events)
            .field("master_seed", &self.master_seed)
            .finish_non_exhaustive()
    }
}
