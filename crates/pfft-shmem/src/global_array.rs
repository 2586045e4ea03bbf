//! Typed handles into the shared heap and the capabilities that access them.
//!
//! A [`GlobalArray`] is a plain `Copy` descriptor (owner rank, segment id,
//! length). It carries no access rights by itself: reads go through an
//! [`ArrayReader`], writes through a [`PartitionWriter`] that is bound to the
//! index range the writing rank owns for the current phase.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::element::Element;
use crate::error::ShmemError;
use crate::stats::CommStats;

/// Identifier of a segment in the shared heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(pub(crate) u64);

impl SegmentId {
    /// Raw identifier value.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Backing storage of one allocation.
pub(crate) struct Segment {
    pub(crate) owner: usize,
    words: Box<[AtomicU64]>,
}

impl Segment {
    pub(crate) fn new(owner: usize, len: usize) -> Self {
        Self {
            owner,
            words: (0..len).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.words.len()
    }

    fn check(&self, index: usize) -> Result<&AtomicU64, ShmemError> {
        self.words.get(index).ok_or(ShmemError::OutOfBounds {
            index,
            len: self.words.len(),
        })
    }

    fn check_range(&self, range: &Range<usize>) -> Result<&[AtomicU64], ShmemError> {
        if range.start > range.end {
            return Err(ShmemError::OutOfBounds {
                index: range.start,
                len: self.words.len(),
            });
        }
        self.words.get(range.clone()).ok_or(ShmemError::OutOfBounds {
            index: range.end.saturating_sub(1),
            len: self.words.len(),
        })
    }

    pub(crate) fn load<T: Element>(&self, index: usize) -> Result<T, ShmemError> {
        Ok(T::from_word(self.check(index)?.load(Ordering::Relaxed)))
    }

    pub(crate) fn load_range<T: Element>(&self, range: Range<usize>) -> Result<Vec<T>, ShmemError> {
        Ok(self
            .check_range(&range)?
            .iter()
            .map(|w| T::from_word(w.load(Ordering::Relaxed)))
            .collect())
    }

    pub(crate) fn store<T: Element>(&self, index: usize, value: T) -> Result<(), ShmemError> {
        self.check(index)?.store(value.to_word(), Ordering::Relaxed);
        Ok(())
    }
}

/// Typed handle to an array in the shared heap.
pub struct GlobalArray<T: Element> {
    owner: usize,
    segment: SegmentId,
    len: usize,
    marker: PhantomData<fn() -> T>,
}

impl<T: Element> GlobalArray<T> {
    pub(crate) fn new(owner: usize, segment: SegmentId, len: usize) -> Self {
        Self {
            owner,
            segment,
            len,
            marker: PhantomData,
        }
    }

    /// Segment in the shared heap.
    #[must_use]
    pub fn segment(&self) -> SegmentId {
        self.segment
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements (never true for a live handle).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Element> Clone for GlobalArray<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Element> Copy for GlobalArray<T> {}

impl<T: Element> PartialEq for GlobalArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.segment == other.segment && self.len == other.len
    }
}

impl<T: Element> Eq for GlobalArray<T> {}

impl<T: Element> fmt::Debug for GlobalArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalArray")
            .field("owner", &self.owner)
            .field("segment", &self.segment)
            .field("len", &self.len)
            .finish()
    }
}

impl<T: Element> fmt::Display for GlobalArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}[{}])", self.owner, self.segment, self.len)
    }
}

/// Read capability: any rank, any index.
pub struct ArrayReader<'pe, T: Element> {
    handle: GlobalArray<T>,
    segment: Arc<Segment>,
    stats: &'pe CommStats,
}

impl<'pe, T: Element> ArrayReader<'pe, T> {
    pub(crate) fn new(handle: GlobalArray<T>, segment: Arc<Segment>, stats: &'pe CommStats) -> Self {
        Self {
            handle,
            segment,
            stats,
        }
    }

    /// The array being read.
    #[must_use]
    pub fn handle(&self) -> GlobalArray<T> {
        self.handle
    }

    /// One-sided read of a single element.
    pub fn rget(&self, index: usize) -> Result<T, ShmemError> {
        let value = self.segment.load(index)?;
        self.stats.record_gets(1);
        Ok(value)
    }

    /// One-sided read of a contiguous range.
    pub fn rget_range(&self, range: Range<usize>) -> Result<Vec<T>, ShmemError> {
        let values = self.segment.load_range(range)?;
        self.stats.record_gets(values.len());
        Ok(values)
    }
}

/// Write capability bound to the index range a rank owns for one phase.
pub struct PartitionWriter<'pe, T: Element> {
    rank: usize,
    handle: GlobalArray<T>,
    owned: Range<usize>,
    segment: Arc<Segment>,
    stats: &'pe CommStats,
}

impl<'pe, T: Element> PartitionWriter<'pe, T> {
    pub(crate) fn new(
        rank: usize,
        handle: GlobalArray<T>,
        owned: Range<usize>,
        segment: Arc<Segment>,
        stats: &'pe CommStats,
    ) -> Result<Self, ShmemError> {
        if owned.start > owned.end || owned.end > segment.len() {
            return Err(ShmemError::OutOfBounds {
                index: owned.end.max(owned.start),
                len: segment.len(),
            });
        }
        Ok(Self {
            rank,
            handle,
            owned,
            segment,
            stats,
        })
    }

    /// The array being written.
    #[must_use]
    pub fn handle(&self) -> GlobalArray<T> {
        self.handle
    }

    fn check_owned(&self, index: usize) -> Result<(), ShmemError> {
        if self.owned.contains(&index) {
            Ok(())
        } else {
            Err(ShmemError::NotOwned {
                rank: self.rank,
                index,
                start: self.owned.start,
                end: self.owned.end,
            })
        }
    }

    /// One-sided write of a single owned element.
    pub fn rput(&self, index: usize, value: T) -> Result<(), ShmemError> {
        self.check_owned(index)?;
        self.segment.store(index, value)?;
        self.stats.record_puts(1);
        Ok(())
    }

    /// One-sided write of `values` starting at owned index `start`.
    pub fn rput_range(&self, start: usize, values: &[T]) -> Result<(), ShmemError> {
        if values.is_empty() {
            return Ok(());
        }
        self.check_owned(start)?;
        self.check_owned(start + values.len() - 1)?;
        for (i, &value) in values.iter().enumerate() {
            self.segment.store(start + i, value)?;
        }
        self.stats.record_puts(values.len());
        Ok(())
    }
}
