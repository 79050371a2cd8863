//! Random replacement policy.
//!
//! Victim selection is a use-bit-filtered random walk: the policy keeps
//! one tentative candidate frame, and on a fault it re-rolls the
//! candidate while the drawn frame's use bit is set, clearing each bit it
//! lands on. The walk stops at the first frame whose use bit is already
//! cleared.
//!
//! The walk is deliberately NOT uniform sampling over the zero-bit
//! frames: recently used frames both dodge eviction once and perturb
//! which frame the walk settles on. The victim distribution this produces
//! is part of the policy's observable behavior and is preserved as is.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use log::debug;

use crate::common::{Error, PageId, Result};
use crate::policy::{CounterSnapshot, Counters, ReplacementPolicy};

/// Random replacement policy over a fixed frame table.
///
/// Construct with [`RandomPolicy::with_seed`] when reproducible victim
/// choices are needed (tests, seeded sweeps); [`RandomPolicy::new`] seeds
/// from OS entropy.
pub struct RandomPolicy {
    /// Resident page per frame; `None` means the frame is empty.
    pages: Vec<Option<PageId>>,

    /// Dirty flag per frame, set when the resident page is written.
    dirty: Vec<bool>,

    /// Use bit per frame, filtering the random victim walk.
    use_bits: Vec<bool>,

    /// Tentative victim candidate for the next fault.
    candidate: usize,

    rng: StdRng,
    counters: Counters,
    debug: bool,
}

impl RandomPolicy {
    /// Create a Random policy with `frame_count` empty frames, seeded
    /// from OS entropy.
    ///
    /// # Errors
    /// Fails with [`Error::InvalidFrameCount`] if `frame_count` is zero.
    pub fn new(frame_count: usize) -> Result<Self> {
        Self::with_rng(frame_count, StdRng::from_entropy())
    }

    /// Create a Random policy with an explicit seed.
    ///
    /// Two instances built with the same frame count and seed make
    /// identical victim choices for identical access sequences.
    pub fn with_seed(frame_count: usize, seed: u64) -> Result<Self> {
        Self::with_rng(frame_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(frame_count: usize, mut rng: StdRng) -> Result<Self> {
        if frame_count == 0 {
            return Err(Error::InvalidFrameCount(frame_count));
        }

        let candidate = rng.gen_range(0..frame_count);

        Ok(Self {
            pages: vec![None; frame_count],
            dirty: vec![false; frame_count],
            use_bits: vec![false; frame_count],
            candidate,
            rng,
            counters: Counters::new(),
            debug: false,
        })
    }

    /// Walk random candidates until one with a cleared use bit turns up,
    /// clearing the bits of the frames passed over. Each iteration clears
    /// one set bit, so the walk examines at most `frame_count` set bits.
    fn settle_candidate(&mut self) {
        while self.use_bits[self.candidate] {
            self.use_bits[self.candidate] = false;
            self.candidate = self.rng.gen_range(0..self.pages.len());
        }
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn access(&mut self, page: PageId, is_write: bool) -> Result<()> {
        if !page.is_valid() {
            return Err(Error::InvalidPageId);
        }

        // Hit: mark the frame used, no counter changes.
        if let Some(frame) = self.pages.iter().position(|p| *p == Some(page)) {
            self.use_bits[frame] = true;
            if is_write {
                self.dirty[frame] = true;
            }
            return Ok(());
        }

        self.counters.record_fault();
        self.settle_candidate();
        let victim = self.candidate;

        if self.debug {
            match self.pages[victim] {
                Some(old) => debug!(
                    "rand: fault on {}, evicting {} (frame {})",
                    page, old, victim
                ),
                None => debug!("rand: fault on {}, loading into free frame {}", page, victim),
            }
        }

        if self.dirty[victim] {
            self.counters.record_disk_write();
            self.dirty[victim] = false;
            if self.debug {
                debug!("rand: frame {} dirty, wrote back", victim);
            }
        }

        self.pages[victim] = Some(page);
        self.counters.record_disk_read();
        self.use_bits[victim] = true;
        self.dirty[victim] = is_write;

        // Fresh starting candidate for the next fault.
        self.candidate = self.rng.gen_range(0..self.pages.len());

        Ok(())
    }

    fn page_faults(&self) -> u64 {
        self.counters.page_faults()
    }

    fn disk_reads(&self) -> u64 {
        self.counters.disk_reads()
    }

    fn disk_writes(&self) -> u64 {
        self.counters.disk_writes()
    }

    fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    fn frame_count(&self) -> usize {
        self.pages.len()
    }

    fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }
}
