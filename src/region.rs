use crate::error::Error;

/// The value reported for both ends of a span whose group did not
/// participate in a match.
pub const UNSET: isize = -1;

/// A `(start, end)` pair of byte offsets into a haystack.
///
/// A span always satisfies `start <= end`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    /// The inclusive start byte offset.
    pub start: usize,
    /// The exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true when this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns this span as a range, suitable for slicing the haystack.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }
}

impl From<Span> for core::ops::Range<usize> {
    fn from(span: Span) -> core::ops::Range<usize> {
        span.range()
    }
}

/// A reusable record of the spans matched by every group of one search.
///
/// Index `0` is the overall match, index `i` the `i`th group. A region is
/// mutated in place by [`Pattern::search`](crate::Pattern::search) and
/// [`Pattern::match_at`](crate::Pattern::match_at), and every span is reset
/// to unset before each call. So after a call that finds no match, no span
/// from an earlier match is visible.
///
/// Regions are not shared between concurrent searches. Each thread that
/// searches with a shared pattern should own its own region.
pub struct Region {
    raw: onig::Region,
    len: usize,
}

impl Region {
    /// Creates an empty region. It grows to fit the first pattern it is
    /// used with.
    ///
    /// [`Pattern::region`](crate::Pattern::region) should usually be
    /// preferred since it creates a region already sized for the pattern.
    pub fn new() -> Region {
        Region { raw: onig::Region::new(), len: 0 }
    }

    pub(crate) fn with_groups(len: usize) -> Region {
        let mut region =
            Region { raw: onig::Region::with_capacity(len), len: 0 };
        region.reset(len);
        region
    }

    /// Returns the number of groups this region has room for, including the
    /// overall match at index `0`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when this region has not yet been sized for a pattern.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the span of the group at index `i`.
    ///
    /// `None` is returned both when the group did not participate in the most
    /// recent match and when `i` is out of range. Use [`Region::span`] to
    /// tell those apart.
    pub fn get(&self, i: usize) -> Option<Span> {
        if i >= self.len {
            return None;
        }
        self.raw.pos(i).map(|(start, end)| Span { start, end })
    }

    /// Returns the span of the group at index `i`, or `None` if the group did
    /// not participate in the most recent match.
    ///
    /// An index outside `0..len()` is rejected with an
    /// [`ErrorKind::Bounds`](crate::ErrorKind::Bounds) error.
    pub fn span(&self, i: usize) -> Result<Option<Span>, Error> {
        if i >= self.len {
            let message =
                format!("group index {} out of range 0..{}", i, self.len);
            return Err(Error::bounds(&message));
        }
        Ok(self.get(i))
    }

    /// Returns the span of group `i` as a pair of signed offsets, with
    /// `(UNSET, UNSET)` (that is, `(-1, -1)`) for a group that did not
    /// participate.
    pub fn span_or_unset(&self, i: usize) -> Result<(isize, isize), Error> {
        Ok(match self.span(i)? {
            // Offsets always fit since they index an in-memory slice.
            Some(span) => (span.start as isize, span.end as isize),
            None => (UNSET, UNSET),
        })
    }

    /// Returns an iterator over the span of every group, in index order.
    pub fn iter(&self) -> Spans<'_> {
        Spans { region: self, next: 0 }
    }

    /// Resets every span to unset.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Sizes this region for `len` groups and unsets every span.
    pub(crate) fn reset(&mut self, len: usize) {
        if self.raw.len() < len {
            self.raw.reserve(len);
        }
        self.raw.clear();
        self.len = len;
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut onig::Region {
        &mut self.raw
    }
}

impl Default for Region {
    fn default() -> Region {
        Region::new()
    }
}

impl core::fmt::Debug for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// An iterator over the spans of a [`Region`].
///
/// `None` is yielded for groups that did not participate in the match.
#[derive(Debug)]
pub struct Spans<'r> {
    region: &'r Region,
    next: usize,
}

impl<'r> Iterator for Spans<'r> {
    type Item = Option<Span>;

    fn next(&mut self) -> Option<Option<Span>> {
        if self.next >= self.region.len() {
            return None;
        }
        let span = self.region.get(self.next);
        self.next += 1;
        Some(span)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.region.len() - self.next;
        (len, Some(len))
    }
}

impl<'r> ExactSizeIterator for Spans<'r> {}

impl<'r> core::iter::FusedIterator for Spans<'r> {}
