//! LRU (Least-Recently-Used) replacement policy.
//!
//! Recency is tracked with a logical clock in the style of Lamport
//! timestamps: the clock ticks once per access, and every hit or load
//! stamps the touched frame with the current value. The victim is the
//! frame with the smallest stamp.

use log::debug;

use crate::common::{Error, PageId, Result};
use crate::policy::{CounterSnapshot, Counters, ReplacementPolicy};

/// LRU replacement policy over a fixed frame table.
///
/// Per-frame state lives in parallel vectors indexed by frame number:
/// the resident page (if any), the dirty flag, and the last-access
/// timestamp.
pub struct LruPolicy {
    /// Resident page per frame; `None` means the frame is empty.
    pages: Vec<Option<PageId>>,

    /// Dirty flag per frame, set when the resident page is written.
    dirty: Vec<bool>,

    /// Logical timestamp of each frame's most recent touch.
    stamps: Vec<u64>,

    /// Monotonic logical clock, incremented once per access (hit or miss).
    clock: u64,

    counters: Counters,
    debug: bool,
}

impl LruPolicy {
    /// Create an LRU policy with `frame_count` empty frames.
    ///
    /// # Errors
    /// Fails with [`Error::InvalidFrameCount`] if `frame_count` is zero.
    pub fn new(frame_count: usize) -> Result<Self> {
        if frame_count == 0 {
            return Err(Error::InvalidFrameCount(frame_count));
        }

        Ok(Self {
            pages: vec![None; frame_count],
            dirty: vec![false; frame_count],
            stamps: vec![0; frame_count],
            clock: 0,
            counters: Counters::new(),
            debug: false,
        })
    }

    /// Pick the frame to load into: the lowest-index empty frame if any,
    /// otherwise the frame with the minimum timestamp.
    ///
    /// The minimum scan uses strict `<`, so on equal stamps the lowest
    /// frame index wins.
    fn replaceable_frame(&self) -> usize {
        if let Some(empty) = self.pages.iter().position(Option::is_none) {
            return empty;
        }

        let mut victim = 0;
        let mut lowest = self.stamps[0];

        for (frame, &stamp) in self.stamps.iter().enumerate() {
            if stamp < lowest {
                victim = frame;
                lowest = stamp;
            }
        }

        victim
    }
}

impl ReplacementPolicy for LruPolicy {
    fn access(&mut self, page: PageId, is_write: bool) -> Result<()> {
        if !page.is_valid() {
            return Err(Error::InvalidPageId);
        }

        self.clock += 1;

        // Hit: restamp the frame, no counter changes.
        if let Some(frame) = self.pages.iter().position(|p| *p == Some(page)) {
            self.stamps[frame] = self.clock;
            if is_write {
                self.dirty[frame] = true;
            }
            return Ok(());
        }

        self.counters.record_fault();
        let victim = self.replaceable_frame();

        if self.debug {
            match self.pages[victim] {
                Some(old) => debug!(
                    "lru: t={} fault on {}, replacing {} (frame {})",
                    self.clock, page, old, victim
                ),
                None => debug!(
                    "lru: t={} fault on {}, loading into free frame {}",
                    self.clock, page, victim
                ),
            }
        }

        if self.dirty[victim] {
            self.counters.record_disk_write();
            self.dirty[victim] = false;
            if self.debug {
                debug!("lru: t={} frame {} dirty, wrote back", self.clock, victim);
            }
        }

        self.pages[victim] = Some(page);
        self.counters.record_disk_read();
        self.stamps[victim] = self.clock;
        self.dirty[victim] = is_write;

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
