//! Page-replacement policy implementations.
//!
//! All three policies share one behavioral contract, the
//! [`ReplacementPolicy`] trait: resident-page bookkeeping plus
//! fault/read/write accounting. They differ only in how a victim frame is
//! chosen once every frame holds a page.
//!
//! - [`RandomPolicy`] - use-bit-filtered random victim walk
//! - [`LruPolicy`] - least-recently-used via a logical clock
//! - [`ClockPolicy`] - second-chance circular scan
//!
//! A driver can hold any of them behind `Box<dyn ReplacementPolicy>`;
//! [`PolicyKind`] builds one from a runtime selection.

mod clock;
mod lru;
mod random;
mod stats;

use std::fmt;
use std::str::FromStr;

use crate::common::{PageId, Result};

pub use clock::ClockPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;
pub use stats::{Counters, CounterSnapshot};

/// The uniform access contract shared by all replacement policies.
///
/// A policy owns one fixed-size frame table plus three monotonic counters.
/// Calls must be strictly sequential against a given instance; there is no
/// interior locking because an instance is exclusively owned by its driver.
pub trait ReplacementPolicy {
    /// Simulate one memory access to `page`.
    ///
    /// On a hit the policy updates its recency metadata and, for a write,
    /// sets the frame's dirty flag. On a miss it counts a page fault,
    /// selects a victim frame, writes the victim back if dirty, and loads
    /// the new page (one backing-store read).
    ///
    /// # Errors
    /// Returns [`Error::InvalidPageId`](crate::Error::InvalidPageId) for
    /// the reserved sentinel page id. Nothing is mutated on error.
    fn access(&mut self, page: PageId, is_write: bool) -> Result<()>;

    /// Total page faults so far. Monotonically non-decreasing.
    fn page_faults(&self) -> u64;

    /// Total simulated backing-store reads. Equal to [`page_faults`]
    /// at all times: every fault loads exactly one page.
    ///
    /// [`page_faults`]: ReplacementPolicy::page_faults
    fn disk_reads(&self) -> u64;

    /// Total simulated backing-store writes (dirty-page write-backs).
    fn disk_writes(&self) -> u64;

    /// Snapshot of all three counters.
    fn counters(&self) -> CounterSnapshot;

    /// Number of frames this policy was constructed with.
    fn frame_count(&self) -> usize;

    /// Toggle emission of per-event observability lines (fault, eviction,
    /// write-back). Never alters counters or victim selection.
    fn set_debug(&mut self, enabled: bool);

    /// Simulate a read access. Thin wrapper over [`access`].
    ///
    /// [`access`]: ReplacementPolicy::access
    fn read(&mut self, page: PageId) -> Result<()> {
        self.access(page, false)
    }

    /// Simulate a write access. Thin wrapper over [`access`].
    ///
    /// [`access`]: ReplacementPolicy::access
    fn write(&mut self, page: PageId) -> Result<()> {
        self.access(page, true)
    }

    /// Turn debug output on.
    fn enable_debug(&mut self) {
        self.set_debug(true);
    }

    /// Turn debug output off.
    fn disable_debug(&mut self) {
        self.set_debug(false);
    }
}

/// The closed set of replacement policies, for runtime selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Random,
    Lru,
    Clock,
}

impl PolicyKind {
    /// All variants, in the order results are conventionally reported.
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Random, PolicyKind::Lru, PolicyKind::Clock];

    /// Short lowercase name, as used in trace reports and on the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Random => "rand",
            PolicyKind::Lru => "lru",
            PolicyKind::Clock => "clock",
        }
    }

    /// Build a boxed policy instance with `frame_count` frames.
    ///
    /// # Errors
    /// Fails with [`Error::InvalidFrameCount`](crate::Error::InvalidFrameCount)
    /// if `frame_count` is zero.
    pub fn build(self, frame_count: usize) -> Result<Box<dyn ReplacementPolicy>> {
        Ok(match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(frame_count)?),
            PolicyKind::Lru => Box::new(LruPolicy::new(frame_count)?),
            PolicyKind::Clock => Box::new(ClockPolicy::new(frame_count)?),
        })
    }

    /// Build a boxed policy instance with an explicit RNG seed.
    ///
    /// Only [`RandomPolicy`] consumes the seed; LRU and Clock are
    /// deterministic and ignore it.
    pub fn build_seeded(self, frame_count: usize, seed: u64) -> Result<Box<dyn ReplacementPolicy>> {
        Ok(match self {
            PolicyKind::Random => Box::new(RandomPolicy::with_seed(frame_count, seed)?),
            PolicyKind::Lru => Box::new(LruPolicy::new(frame_count)?),
            PolicyKind::Clock => Box::new(ClockPolicy::new(frame_count)?),
        })
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rand" | "random" => Ok(PolicyKind::Random),
            "lru" => Ok(PolicyKind::Lru),
            "clock" => Ok(PolicyKind::Clock),
            other => Err(format!(
                "unknown policy {other:?} (expected rand, lru, or clock)"
            )),
        }
    }
}
