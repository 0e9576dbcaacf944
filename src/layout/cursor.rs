//! The offset cursor.

use crate::error::{Error, Result};
use serde::Serialize;

/// One reserved interval `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reservation {
    /// First offset of the interval
    pub start: usize,

    /// Number of offsets reserved
    pub length: usize,
}

impl Reservation {
    /// One past the last reserved offset.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Tracks the offset immediately after the last inserted content.
///
/// The cursor only moves forward. Every call to [`Cursor::reserve`] is
/// recorded so element starts can be recovered later.
#[derive(Debug, Clone)]
pub struct Cursor {
    origin: usize,
    end: usize,
    history: Vec<Reservation>,
}

impl Cursor {
    /// Create a cursor starting at `origin`.
    pub fn new(origin: usize) -> Self {
        Self {
            origin,
            end: origin,
            history: Vec::new(),
        }
    }

    /// Offset the cursor started at.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Offset where the next element starts.
    pub fn current_end(&self) -> usize {
        self.end
    }

    /// Reserve `length` offsets and return where they start.
    pub fn reserve(&mut self, length: usize) -> Result<usize> {
        let start = self.end;
        self.end = start.checked_add(length).ok_or_else(|| {
            Error::OffsetConsistencyFault(format!(
                "reserving {} offsets at {} overflows",
                length, start
            ))
        })?;
        self.history.push(Reservation { start, length });
        Ok(start)
    }

    /// All reservations in order.
    pub fn history(&self) -> &[Reservation] {
        &self.history
    }

    /// Start of the `index`-th reservation.
    pub fn start_of(&self, index: usize) -> Option<usize> {
        self.history.get(index).map(|r| r.start)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_advances() {
        let mut cursor = Cursor::new(1);
        assert_eq!(cursor.reserve(6).unwrap(), 1);
        assert_eq!(cursor.reserve(0).unwrap(), 7);
        assert_eq!(cursor.reserve(5).unwrap(), 7);
        assert_eq!(cursor.current_end(), 12);
        assert_eq!(cursor.origin(), 1);
    }

    #[test]
    fn test_kth_start_is_prefix_sum() {
        let lengths = [3usize, 1, 14, 0, 9, 2];
        let mut cursor = Cursor::default();
        for len in lengths {
            cursor.reserve(len).unwrap();
        }
        for k in 0..lengths.len() {
            let expected: usize = lengths[..k].iter().sum();
            assert_eq!(cursor.start_of(k), Some(expected));
        }
        assert_eq!(cursor.history()[2].end(), 18);
    }

    #[test]
    fn test_overflow_is_fault() {
        let mut cursor = Cursor::new(usize::MAX - 1);
        let err = cursor.reserve(2).unwrap_err();
        assert!(matches!(err, Error::OffsetConsistencyFault(_)));
        assert_eq!(cursor.current_end(), usize::MAX - 1);
        assert!(cursor.history().is_empty());
    }
}
