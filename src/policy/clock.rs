//! Clock (second-chance) replacement policy.
//!
//! A circular hand sweeps the frame table. Frames touched since the
//! hand's last visit carry a use bit; the hand clears use bits as it
//! passes and evicts the first frame it finds with the bit already
//! cleared.

use log::debug;

use crate::common::{Error, PageId, Result};
use crate::policy::{CounterSnapshot, Counters, ReplacementPolicy};

/// Clock replacement policy over a fixed frame table.
///
/// The hand is a plain index into the table; arithmetic wraps modulo the
/// frame count. Empty frames get no special treatment: they start with
/// the use bit cleared, so from a fresh instance the hand fills frames in
/// index order before any real eviction happens.
pub struct ClockPolicy {
    /// Resident page per frame; `None` means the frame is empty.
    pages: Vec<Option<PageId>>,

    /// Dirty flag per frame, set when the resident page is written.
    dirty: Vec<bool>,

    /// Second-chance use bit per frame.
    use_bits: Vec<bool>,

    /// The clock hand: next frame the victim search will examine.
    hand: usize,

    counters: Counters,
    debug: bool,
}

impl ClockPolicy {
    /// Create a Clock policy with `frame_count` empty frames.
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
            use_bits: vec![false; frame_count],
            hand: 0,
            counters: Counters::new(),
            debug: false,
        })
    }

    fn advance_hand(&mut self) {
        self.hand = (self.hand + 1) % self.pages.len();
    }

    /// Sweep until the hand rests on a frame with a cleared use bit,
    /// stripping use bits along the way. Terminates within one full lap
    /// past the last set bit.
    fn park_hand_on_victim(&mut self) {
        while self.use_bits[self.hand] {
            self.use_bits[self.hand] = false;
            self.advance_hand();
        }
    }
}

impl ReplacementPolicy for ClockPolicy {
    fn access(&mut self, page: PageId, is_write: bool) -> Result<()> {
        if !page.is_valid() {
            return Err(Error::InvalidPageId);
        }

        // Hit: give the frame its second chance, no counter changes.
        if let Some(frame) = self.pages.iter().position(|p| *p == Some(page)) {
            self.use_bits[frame] = true;
            if is_write {
                self.dirty[frame] = true;
            }
            return Ok(());
        }

        self.counters.record_fault();
        self.park_hand_on_victim();

        if self.debug {
            match self.pages[self.hand] {
                Some(old) => debug!(
                    "clock: fault on {}, evicting {} (frame {})",
                    page, old, self.hand
                ),
                None => debug!(
                    "clock: fault on {}, loading into free frame {}",
                    page, self.hand
                ),
            }
        }

        if self.dirty[self.hand] {
            self.counters.record_disk_write();
            self.dirty[self.hand] = false;
            if self.debug {
                debug!("clock: frame {} dirty, wrote back", self.hand);
            }
        }

        self.pages[self.hand] = Some(page);
        self.counters.record_disk_read();
        self.use_bits[self.hand] = true;
        self.dirty[self.hand] = is_write;

        // Next search starts just past the frame we loaded.
        self.advance_hand();

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_frames() {
        assert!(matches!(
            ClockPolicy::new(0),
            Err(Error::InvalidFrameCount(0))
        ));
    }

    #[test]
    fn test_fills_frames_in_index_order() {
        let mut mmu = ClockPolicy::new(3).unwrap();

        mmu.read(PageId::new(1)).unwrap();
        mmu.read(PageId::new(2)).unwrap();
        mmu.read(PageId::new(3)).unwrap();

        assert_eq!(mmu.pages, vec![
            Some(PageId::new(1)),
            Some(PageId::new(2)),
            Some(PageId::new(3)),
        ]);
        assert_eq!(mmu.page_faults(), 3);
        assert_eq!(mmu.hand, 0);
    }

    #[test]
    fn test_second_chance_wraps_to_first_frame() {
        let mut mmu = ClockPolicy::new(3).unwrap();

        mmu.read(PageId::new(1)).unwrap();
        mmu.read(PageId::new(2)).unwrap();
        mmu.read(PageId::new(3)).unwrap();

        // All use bits set. The hand clears frames 0, 1, 2, wraps, and
        // frame 0 (page 1) is the first it finds still cleared.
        mmu.read(PageId::new(4)).unwrap();

        assert_eq!(mmu.pages[0], Some(PageId::new(4)));
        assert_eq!(mmu.pages[1], Some(PageId::new(2)));
        assert_eq!(mmu.pages[2], Some(PageId::new(3)));
        assert_eq!(mmu.page_faults(), 4);
        assert_eq!(mmu.hand, 1);
    }

    #[test]
    fn test_recently_used_frame_survives() {
        let mut mmu = ClockPolicy::new(2).unwrap();

        mmu.read(PageId::new(1)).unwrap(); // frame 0, hand -> 1
        mmu.read(PageId::new(2)).unwrap(); // frame 1, hand -> 0
        mmu.read(PageId::new(1)).unwrap(); // hit, use bit back on

        // Hand clears frame 0's use bit and moves on; frame 1 is evicted.
        mmu.read(PageId::new(3)).unwrap();

        assert_eq!(mmu.pages[0], Some(PageId::new(1)));
        assert_eq!(mmu.pages[1], Some(PageId::new(3)));
    }

    #[test]
    fn test_dirty_write_back_on_eviction() {
        let mut mmu = ClockPolicy::new(1).unwrap();

        mmu.write(PageId::new(1)).unwrap();
        assert_eq!(mmu.disk_writes(), 0);

        mmu.read(PageId::new(2)).unwrap();
        assert_eq!(mmu.disk_writes(), 1);

        mmu.read(PageId::new(3)).unwrap();
        assert_eq!(mmu.disk_writes(), 1);
    }

    #[test]
    fn test_hit_does_not_move_hand() {
        let mut mmu = ClockPolicy::new(3).unwrap();

        mmu.read(PageId::new(1)).unwrap();
        let hand = mmu.hand;

        mmu.read(PageId::new(1)).unwrap();
        mmu.write(PageId::new(1)).unwrap();

        assert_eq!(mmu.hand, hand);
        assert_eq!(mmu.page_faults(), 1);
    }

    #[test]
    fn test_invalid_page_rejected_without_mutation() {
        let mut mmu = ClockPolicy::new(2).unwrap();
        mmu.read(PageId::new(1)).unwrap();

        let hand = mmu.hand;
        assert!(mmu.write(PageId::INVALID).is_err());

        assert_eq!(mmu.hand, hand);
        assert_eq!(mmu.page_faults(), 1);
        assert_eq!(mmu.disk_writes(), 0);
    }
}
