//! Configuration constants for pagesim.

/// Number of low address bits that fall inside a page (4KB pages).
///
/// Trace files carry raw virtual addresses; shifting right by this many
/// bits yields the page number the engine operates on. 12 bits matches
/// the 4096-byte page size used by the traces this simulator was built
/// against (and by most operating systems).
pub const PAGE_OFFSET_BITS: u32 = 12;

/// Size of a page in bytes (4KB).
pub const PAGE_SIZE: usize = 1 << PAGE_OFFSET_BITS;

/// Default maximum number of frame-count rungs in a sweep.
///
/// The sweep driver divides the largest frame table it will try by this
/// value to obtain the step between successive frame counts.
pub const DEFAULT_SWEEP_POINTS: usize = 1000;

/// Default multiple applied to a trace's unique-page count to size the
/// largest frame table in a sweep.
///
/// A value above 1.0 leaves headroom past the point where every page
/// fits, so the fault-rate curves flatten out visibly at the right edge.
pub const DEFAULT_HEADROOM: f64 = 1.2;
