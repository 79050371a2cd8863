//! Memory-trace ingestion.
//!
//! A trace is line-oriented text, usually gzip-compressed: each line is a
//! whitespace-separated pair `<hexadecimal address> <R|W>`, and blank
//! lines are skipped. Raw addresses are canonicalized to page numbers
//! before the engine ever sees them; the policies only deal in
//! [`PageId`]s.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use log::info;

use crate::common::{Error, PageId, Result};

/// Whether an access reads or writes its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    /// True for [`AccessKind::Write`].
    #[inline]
    pub fn is_write(self) -> bool {
        matches!(self, AccessKind::Write)
    }
}

/// One canonicalized memory access: a page number plus read/write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    pub page: PageId,
    pub kind: AccessKind,
}

/// Read a trace file into memory.
///
/// Files ending in `.gz` are decompressed transparently; anything else is
/// read as plain text.
///
/// # Errors
/// - I/O errors opening or reading the file
/// - [`Error::TraceParse`] for malformed lines (with 1-based line number)
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<TraceEvent>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let events = if path.extension().is_some_and(|ext| ext == "gz") {
        parse_trace(BufReader::new(GzDecoder::new(file)))?
    } else {
        parse_trace(BufReader::new(file))?
    };

    info!(
        "loaded {} accesses ({} unique pages) from {}",
        events.len(),
        unique_pages(&events),
        path.display()
    );

    Ok(events)
}

/// Parse trace lines from any buffered reader.
///
/// Accepts an optional `0x`/`0X` prefix on addresses. Extra whitespace
/// between or around the two fields is ignored, as are blank lines.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TraceEvent>> {
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;

        let mut fields = line.split_whitespace();
        let Some(address) = fields.next() else {
            continue; // blank line
        };
        let op = fields.next().ok_or_else(|| Error::TraceParse {
            line: line_no,
            reason: "missing access type after address".to_string(),
        })?;

        let hex = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .unwrap_or(address);
        let raw = u64::from_str_radix(hex, 16).map_err(|e| Error::TraceParse {
            line: line_no,
            reason: format!("bad address {address:?}: {e}"),
        })?;

        let kind = match op {
            "R" => AccessKind::Read,
            "W" => AccessKind::Write,
            other => {
                return Err(Error::TraceParse {
                    line: line_no,
                    reason: format!("unknown access type {other:?} (expected R or W)"),
                })
            }
        };

        events.push(TraceEvent {
            page: PageId::from_address(raw),
            kind,
        });
    }

    Ok(events)
}

/// Number of distinct pages touched by a trace.
///
/// The sweep driver sizes its largest frame table from this.
pub fn unique_pages(events: &[TraceEvent]) -> usize {
    events
        .iter()
        .map(|event| event.page)
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_basic_lines() {
        let input = "0041f7a0 R\n13f5e2c0 R\n004758a0 W\n";
        let events = parse_trace(Cursor::new(input)).unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].page, PageId::new(0x41f));
        assert_eq!(events[0].kind, AccessKind::Read);
        assert_eq!(events[2].page, PageId::new(0x475));
        assert_eq!(events[2].kind, AccessKind::Write);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let input = "0041f7a0 R\n\n   \n004758a0 W\n";
        let events = parse_trace(Cursor::new(input)).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_hex_prefix_accepted() {
        let events = parse_trace(Cursor::new("0x2000 R\n")).unwrap();
        assert_eq!(events[0].page, PageId::new(2));
    }

    #[test]
    fn test_bad_address_reports_line() {
        let input = "0041f7a0 R\nzzzz R\n";
        match parse_trace(Cursor::new(input)) {
            Err(Error::TraceParse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected TraceParse, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_access_type_rejected() {
        match parse_trace(Cursor::new("1000 X\n")) {
            Err(Error::TraceParse { line, reason }) => {
                assert_eq!(line, 1);
                assert!(reason.contains("X"));
            }
            other => panic!("expected TraceParse, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_access_type_rejected() {
        assert!(matches!(
            parse_trace(Cursor::new("1000\n")),
            Err(Error::TraceParse { line: 1, .. })
        ));
    }

    #[test]
    fn test_unique_pages() {
        let input = "1000 R\n1fff W\n2000 R\n1000 R\n";
        let events = parse_trace(Cursor::new(input)).unwrap();

        // 0x1000 and 0x1fff share page 1; 0x2000 is page 2.
        assert_eq!(unique_pages(&events), 2);
    }
}
