use std::sync::Arc;

use crate::{
    error::Error,
    names::NameDirectory,
    options::SearchOptions,
    pattern::Pattern,
    region::{Region, Span},
    search::checked_haystack,
};

/// Higher level searches that allocate their own [`Region`].
///
/// These are convenient when a region isn't being reused, and they can be
/// called concurrently from many threads on one shared `Pattern`.
impl Pattern {
    /// Returns the leftmost match in `haystack`, if any.
    pub fn find<'h>(
        &self,
        haystack: &'h [u8],
    ) -> Result<Option<Match<'h>>, Error> {
        self.find_at(haystack, 0)
    }

    /// Returns the first match starting at or after `start`.
    pub fn find_at<'h>(
        &self,
        haystack: &'h [u8],
        start: usize,
    ) -> Result<Option<Match<'h>>, Error> {
        let mut region = self.region();
        if self.search(haystack, start, SearchOptions::NONE, &mut region)?
            .is_none()
        {
            return Ok(None);
        }
        Ok(region.get(0).map(|span| Match::new(haystack, span)))
    }

    /// Returns the spans of every group for the leftmost match in
    /// `haystack`, if any.
    pub fn captures<'h>(
        &self,
        haystack: &'h [u8],
    ) -> Result<Option<Captures<'h>>, Error> {
        self.captures_at(haystack, 0)
    }

    /// Returns the spans of every group for the first match starting at or
    /// after `start`.
    pub fn captures_at<'h>(
        &self,
        haystack: &'h [u8],
        start: usize,
    ) -> Result<Option<Captures<'h>>, Error> {
        let mut region = self.region();
        if self.search(haystack, start, SearchOptions::NONE, &mut region)?
            .is_none()
        {
            return Ok(None);
        }
        Ok(Some(Captures::new(haystack, &region, self.shared_names())))
    }

    /// Returns an iterator over successive non-overlapping matches.
    ///
    /// After an empty match, the next search begins one character later. An
    /// empty match that ends where the previous match ended is skipped.
    ///
    /// The haystack is validated once, up front. Errors from the engine are
    /// yielded by the iterator, after which it stops.
    pub fn find_iter<'r, 'h>(
        &'r self,
        haystack: &'h [u8],
    ) -> Result<Matches<'r, 'h>, Error> {
        self.find_iter_at(haystack, 0, SearchOptions::NONE)
    }

    /// Like [`Pattern::find_iter`], but the first search begins at `start`
    /// and every search uses `options`.
    pub fn find_iter_at<'r, 'h>(
        &'r self,
        haystack: &'h [u8],
        start: usize,
        options: SearchOptions,
    ) -> Result<Matches<'r, 'h>, Error> {
        Ok(Matches { it: Searcher::new(self, haystack, start, options)? })
    }

    /// Returns an iterator over the captures of successive non-overlapping
    /// matches. Iteration follows the same rules as [`Pattern::find_iter`].
    pub fn captures_iter<'r, 'h>(
        &'r self,
        haystack: &'h [u8],
    ) -> Result<CaptureMatches<'r, 'h>, Error> {
        self.captures_iter_at(haystack, 0, SearchOptions::NONE)
    }

    /// Like [`Pattern::captures_iter`], but the first search begins at
    /// `start` and every search uses `options`.
    pub fn captures_iter_at<'r, 'h>(
        &'r self,
        haystack: &'h [u8],
        start: usize,
        options: SearchOptions,
    ) -> Result<CaptureMatches<'r, 'h>, Error> {
        let it = Searcher::new(self, haystack, start, options)?;
        Ok(CaptureMatches { it })
    }

    /// Reads `rdr` to the end and reports whether the pattern matches
    /// anywhere in what was read.
    ///
    /// Input that is not UTF-8, or an engine failure, is reported as an
    /// I/O error of kind [`std::io::ErrorKind::InvalidData`].
    pub fn is_match_reader<R: std::io::Read>(
        &self,
        rdr: R,
    ) -> std::io::Result<bool> {
        Ok(self.find_reader(rdr)?.is_some())
    }

    /// Reads `rdr` to the end and returns the span of the leftmost match in
    /// what was read.
    ///
    /// Errors are reported as for [`Pattern::is_match_reader`].
    pub fn find_reader<R: std::io::Read>(
        &self,
        mut rdr: R,
    ) -> std::io::Result<Option<Span>> {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        let found = self.find(&buf).map_err(|err| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, err)
        })?;
        Ok(found.map(|m| m.span()))
    }
}

/// A single match of a pattern in a haystack.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Match<'h> {
    haystack: &'h [u8],
    start: usize,
    end: usize,
}

impl<'h> Match<'h> {
    fn new(haystack: &'h [u8], span: Span) -> Match<'h> {
        Match { haystack, start: span.start, end: span.end }
    }

    /// Returns the byte offset of the start of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the byte offset of the end of the match.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns true if this match is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the length of this match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns the span of this match.
    pub fn span(&self) -> Span {
        Span { start: self.start, end: self.end }
    }

    /// Returns the range of this match.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }

    /// Returns the matched bytes.
    pub fn as_bytes(&self) -> &'h [u8] {
        &self.haystack[self.range()]
    }
}

impl<'h> core::fmt::Debug for Match<'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Match")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("bytes", &String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

/// The group spans of one match, detached from any [`Region`].
///
/// Index `0` is always the overall match.
#[derive(Clone)]
pub struct Captures<'h> {
    haystack: &'h [u8],
    spans: Vec<Option<Span>>,
    names: Arc<NameDirectory>,
}

impl<'h> Captures<'h> {
    fn new(
        haystack: &'h [u8],
        region: &Region,
        names: &Arc<NameDirectory>,
    ) -> Captures<'h> {
        Captures {
            haystack,
            spans: region.iter().collect(),
            names: Arc::clone(names),
        }
    }

    /// Returns the match for group `i`, or `None` if the group did not
    /// participate or `i` is out of range.
    pub fn get(&self, i: usize) -> Option<Match<'h>> {
        self.pos(i).map(|span| Match::new(self.haystack, span))
    }

    /// Returns the match for the group named `name`.
    ///
    /// When several groups share the name, the first one that participated
    /// in this match is used.
    pub fn name(&self, name: &str) -> Option<Match<'h>> {
        let i = self.index_of(name.as_bytes())?;
        self.get(i)
    }

    /// Returns the span of group `i`.
    pub fn pos(&self, i: usize) -> Option<Span> {
        self.spans.get(i).copied().flatten()
    }

    /// Returns the group index that `name` resolves to in this match.
    pub fn index_of(&self, name: &[u8]) -> Option<usize> {
        let entry = self.names.get(name)?;
        Some(entry.resolve_by(|i| self.pos(i).is_some()))
    }

    /// Returns the number of groups, including group `0`.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns an iterator over every group's match in index order.
    pub fn iter<'c>(&'c self) -> impl Iterator<Item = Option<Match<'h>>> + 'c {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Returns an iterator over every group name of the pattern, paired with
    /// what that name matched in this match.
    ///
    /// Names are yielded in the order of their lowest group index, and each
    /// resolves as [`Captures::name`] does.
    pub fn iter_named<'c>(
        &'c self,
    ) -> impl Iterator<Item = (&'c str, Option<Match<'h>>)> + 'c {
        self.names.iter().map(move |entry| {
            let i = entry.resolve_by(|i| self.pos(i).is_some());
            (entry.name(), self.get(i))
        })
    }
}

impl<'h> core::fmt::Debug for Captures<'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_list().entries(self.spans.iter()).finish()
    }
}

/// The iteration state shared by [`Matches`] and [`CaptureMatches`].
struct Searcher<'r, 'h> {
    re: &'r Pattern,
    haystack: &'h [u8],
    hay: &'h str,
    options: SearchOptions,
    region: Region,
    last_end: usize,
    last_match: Option<usize>,
}

impl<'r, 'h> Searcher<'r, 'h> {
    fn new(
        re: &'r Pattern,
        haystack: &'h [u8],
        start: usize,
        options: SearchOptions,
    ) -> Result<Self, Error> {
        let hay = checked_haystack(haystack, start)?;
        Ok(Searcher {
            re,
            haystack,
            hay,
            options,
            region: re.region(),
            last_end: start,
            last_match: None,
        })
    }

    /// Runs the next search. On success, `self.region` holds the match.
    fn advance(&mut self) -> Option<Result<Span, Error>> {
        loop {
            if self.last_end > self.hay.len() {
                return None;
            }
            let from = self.last_end;
            let found = self.re.search_str(
                self.hay,
                from,
                self.options,
                Some(&mut self.region),
            );
            let span = match found {
                Err(err) => {
                    self.last_end = self.hay.len() + 1;
                    return Some(Err(err));
                }
                Ok(None) => {
                    self.last_end = self.hay.len() + 1;
                    return None;
                }
                Ok(Some(_)) => self.region.get(0)?,
            };
            // A match that ends at or before `from` (possible with `\K` in a
            // look-behind) would be found again, so step past it like an
            // empty match.
            if span.is_empty() || span.end <= from {
                self.last_end = next_char(self.hay, span.end.max(from));
                // Don't accept empty matches immediately following a match.
                if Some(span.end) == self.last_match {
                    continue;
                }
            } else {
                self.last_end = span.end;
            }
            self.last_match = Some(span.end);
            return Some(Ok(span));
        }
    }
}

/// Returns the offset of the character after the one at `at`, or `at + 1`
/// at the end of the haystack.
fn next_char(hay: &str, at: usize) -> usize {
    at + hay[at..].chars().next().map_or(1, |c| c.len_utf8())
}

/// An iterator over successive non-overlapping matches.
///
/// This is created by [`Pattern::find_iter`].
pub struct Matches<'r, 'h> {
    it: Searcher<'r, 'h>,
}

impl<'r, 'h> Iterator for Matches<'r, 'h> {
    type Item = Result<Match<'h>, Error>;

    fn next(&mut self) -> Option<Result<Match<'h>, Error>> {
        let haystack = self.it.haystack;
        self.it.advance().map(|r| r.map(|span| Match::new(haystack, span)))
    }
}

impl<'r, 'h> core::iter::FusedIterator for Matches<'r, 'h> {}

impl<'r, 'h> core::fmt::Debug for Matches<'r, 'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Matches")
            .field("pattern", &self.it.re.as_str())
            .field("last_end", &self.it.last_end)
            .field("options", &self.it.options)
            .finish()
    }
}

/// An iterator over the captures of successive non-overlapping matches.
///
/// This is created by [`Pattern::captures_iter`].
pub struct CaptureMatches<'r, 'h> {
    it: Searcher<'r, 'h>,
}

impl<'r, 'h> Iterator for CaptureMatches<'r, 'h> {
    type Item = Result<Captures<'h>, Error>;

    fn next(&mut self) -> Option<Result<Captures<'h>, Error>> {
        match self.it.advance()? {
            Err(err) => Some(Err(err)),
            Ok(_) => Some(Ok(Captures::new(
                self.it.haystack,
                &self.it.region,
                self.it.re.shared_names(),
            ))),
        }
    }
}

impl<'r, 'h> core::iter::FusedIterator for CaptureMatches<'r, 'h> {}

impl<'r, 'h> core::fmt::Debug for CaptureMatches<'r, 'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("CaptureMatches")
            .field("pattern", &self.it.re.as_str())
            .field("last_end", &self.it.last_end)
            .field("options", &self.it.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findall(re: &Pattern, hay: &str) -> Vec<(usize, usize)> {
        re.find_iter(hay.as_bytes())
            .unwrap()
            .map(|m| m.unwrap())
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    #[test]
    fn empty_pattern_empty_match() {
        let re = Pattern::new(b"").unwrap();
        assert_eq!(vec![(0, 0)], findall(&re, ""));
    }

    #[test]
    fn empty_pattern_nonempty_haystack() {
        let re = Pattern::new(b"").unwrap();
        assert_eq!(vec![(0, 0), (1, 1), (2, 2), (3, 3)], findall(&re, "abc"));
    }

    #[test]
    fn one_zero_length_match() {
        let re = Pattern::new(br"\d*").unwrap();
        assert_eq!(vec![(0, 0), (1, 2), (3, 4)], findall(&re, "a1b2"));
    }

    #[test]
    fn many_zero_length_match() {
        let re = Pattern::new(br"\d*").unwrap();
        assert_eq!(
            vec![(0, 0), (1, 2), (3, 3), (4, 4), (5, 6)],
            findall(&re, "a1bbb2")
        );
    }

    #[test]
    fn empty_matches_step_over_whole_characters() {
        let re = Pattern::new(b"").unwrap();
        // 'é' and 'ü' are two bytes each.
        assert_eq!(vec![(0, 0), (2, 2), (4, 4)], findall(&re, "éü"));
    }

    #[test]
    fn non_overlapping() {
        let re = Pattern::new(b"a(b*)").unwrap();
        assert_eq!(vec![(0, 3), (3, 4), (4, 6)], findall(&re, "abbaab"));
    }

    #[test]
    fn captures_detach_from_region() {
        let re = Pattern::new(br"(\w)(\d)?").unwrap();
        let all: Vec<Captures<'_>> = re
            .captures_iter(b"a1b")
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].get(2).map(|m| m.as_bytes()), Some(&b"1"[..]));
        assert_eq!(all[1].get(1).map(|m| m.as_bytes()), Some(&b"b"[..]));
        assert!(all[1].get(2).is_none());
    }

    #[test]
    fn keep_in_lookbehind_still_advances() {
        let re = Pattern::new(br"(?<=\Ka)").unwrap();
        assert_eq!(vec![(0, 1), (1, 2)], findall(&re, "aa"));
    }

    #[test]
    fn iteration_from_offset_with_options() {
        let re = Pattern::new(br"^\w").unwrap();
        let got: Vec<_> = re
            .find_iter_at(b"ab\ncd", 1, SearchOptions::NONE)
            .unwrap()
            .map(|m| m.unwrap().range())
            .collect();
        assert_eq!(got, vec![3..4]);

        let got = re
            .find_iter_at(b"ab\ncd", 0, SearchOptions::NOTBOL)
            .unwrap()
            .map(|m| m.unwrap().range())
            .collect::<Vec<_>>();
        assert_eq!(got, vec![3..4]);

        assert!(re.find_iter_at(b"ab", 3, SearchOptions::NONE).is_err());
    }

    #[test]
    fn named_groups_of_one_match() {
        let re = Pattern::new(br"(?<y>\d+)-(?<m>\d+)|(?<m>x)").unwrap();
        let caps = re.captures(b"x").unwrap().unwrap();
        let named: Vec<(&str, Option<&[u8]>)> = caps
            .iter_named()
            .map(|(name, m)| (name, m.map(|m| m.as_bytes())))
            .collect();
        assert_eq!(named, vec![("y", None), ("m", Some(&b"x"[..]))]);
    }

    #[test]
    fn reader_searches() {
        let re = Pattern::new(br"\d+").unwrap();
        let span = re.find_reader(&b"abc 123"[..]).unwrap();
        assert_eq!(span.map(|s| s.range()), Some(4..7));
        assert!(!re.is_match_reader(&b"abc"[..]).unwrap());

        let err = re.is_match_reader(&b"\xFF"[..]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn find_reports_no_match() {
        let re = Pattern::new(b"z").unwrap();
        assert!(re.find(b"abc").unwrap().is_none());
        assert!(re.captures(b"abc").unwrap().is_none());
    }
}
