//! Frame-count sweep driver.
//!
//! A sweep replays one trace against all three replacement policies at a
//! ladder of frame counts and records the page-fault rate at each rung.
//! The ladder is derived from the trace itself: the largest frame table
//! tried is the trace's unique-page count times a headroom multiple, and
//! the rung spacing divides that range into at most `max_points` steps.
//!
//! Rungs are independent (each gets fresh policy instances), so the
//! driver fans them out across worker threads. Every policy instance
//! stays confined to the thread that created it.

mod report;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use log::{debug, info};
use parking_lot::Mutex;

use crate::common::config::{DEFAULT_HEADROOM, DEFAULT_SWEEP_POINTS};
use crate::common::{Error, Result};
use crate::policy::{ClockPolicy, LruPolicy, RandomPolicy, ReplacementPolicy};
use crate::trace::{unique_pages, TraceEvent};

pub use report::{Report, TraceSeries};

/// Sweep parameters. One explicit value, passed to [`run_sweep`].
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Upper bound on the number of rungs in the ladder.
    pub max_points: usize,

    /// Multiple of the trace's unique-page count that sizes the largest
    /// frame table tried.
    pub headroom: f64,

    /// Rungs below this frame count are dropped from the ladder.
    pub min_frames: usize,

    /// Seed for the Random policy. When set, every rung derives its own
    /// sub-seed from it and the sweep is reproducible; when unset, each
    /// rung seeds from OS entropy.
    pub seed: Option<u64>,

    /// Number of worker threads to fan rungs across.
    pub threads: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_SWEEP_POINTS,
            headroom: DEFAULT_HEADROOM,
            min_frames: 1,
            seed: None,
            threads: thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl SweepConfig {
    /// Compute the ladder of frame counts for a trace with
    /// `unique_pages` distinct pages.
    ///
    /// Multiples of the step, starting at the step, up to the first
    /// multiple at or above the headroom-scaled maximum.
    pub fn frame_counts(&self, unique_pages: usize) -> Vec<usize> {
        let max_frames = ((unique_pages as f64 * self.headroom).ceil() as usize).max(1);
        let step = max_frames.div_ceil(self.max_points.max(1)).max(1);

        (1..)
            .map(|rung| rung * step)
            .take_while(|&frames| frames < max_frames + step)
            .filter(|&frames| frames >= self.min_frames)
            .collect()
    }
}

/// Fault rates measured for the three policies at every rung.
///
/// Parallel vectors, ascending by frame count; rates are percentages of
/// the trace's total access count.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub frame_counts: Vec<usize>,
    pub rand: Vec<f64>,
    pub lru: Vec<f64>,
    pub clock: Vec<f64>,
}

/// One rung: all three policies replayed at a single frame count.
struct RungPoint {
    frames: usize,
    rand: f64,
    lru: f64,
    clock: f64,
}

/// Run a full sweep of `events` under `config`.
///
/// # Errors
/// - [`Error::EmptyTrace`] if `events` is empty
/// - Construction errors surfaced from the policies
pub fn run_sweep(events: &[TraceEvent], config: &SweepConfig) -> Result<SweepResult> {
    if events.is_empty() {
        return Err(Error::EmptyTrace);
    }

    let unique = unique_pages(events);
    let ladder = config.frame_counts(unique);
    info!(
        "sweep: {} accesses, {} unique pages, {} rungs up to {} frames",
        events.len(),
        unique,
        ladder.len(),
        ladder.last().copied().unwrap_or(0)
    );

    let next = AtomicUsize::new(0);
    let points: Mutex<Vec<(usize, Result<RungPoint>)>> =
        Mutex::new(Vec::with_capacity(ladder.len()));
    let workers = config.threads.clamp(1, ladder.len().max(1));

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(&frames) = ladder.get(index) else {
                    break;
                };

                debug!("sweep: measuring {} frames", frames);
                let point = measure_rung(events, frames, rung_seed(config.seed, frames));
                points.lock().push((frames, point));
            });
        }
    });

    let mut collected = points.into_inner();
    collected.sort_by_key(|(frames, _)| *frames);

    let mut result = SweepResult {
        frame_counts: Vec::with_capacity(collected.len()),
        rand: Vec::with_capacity(collected.len()),
        lru: Vec::with_capacity(collected.len()),
        clock: Vec::with_capacity(collected.len()),
    };

    for (_, point) in collected {
        let point = point?;
        result.frame_counts.push(point.frames);
        result.rand.push(point.rand);
        result.lru.push(point.lru);
        result.clock.push(point.clock);
    }

    Ok(result)
}

/// Derive a per-rung seed so seeded sweeps are reproducible regardless
/// of how rungs land on worker threads.
fn rung_seed(seed: Option<u64>, frames: usize) -> Option<u64> {
    seed.map(|s| s ^ (frames as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

/// Replay the whole trace through fresh instances of all three policies.
fn measure_rung(events: &[TraceEvent], frames: usize, seed: Option<u64>) -> Result<RungPoint> {
    let mut rand = match seed {
        Some(s) => RandomPolicy::with_seed(frames, s)?,
        None => RandomPolicy::new(frames)?,
    };
    let mut lru = LruPolicy::new(frames)?;
    let mut clock = ClockPolicy::new(frames)?;

    for event in events {
        rand.access(event.page, event.kind.is_write())?;
        lru.access(event.page, event.kind.is_write())?;
        clock.access(event.page, event.kind.is_write())?;
    }

    let accesses = events.len() as u64;
    Ok(RungPoint {
        frames,
        rand: rand.counters().fault_rate(accesses),
        lru: lru.counters().fault_rate(accesses),
        clock: clock.counters().fault_rate(accesses),
    })
}
