use crate::{
    error::{Error, ErrorKind},
    options::SearchOptions,
    pattern::Pattern,
    region::Region,
};

/// Searching and anchored matching.
///
/// All offsets, both given and returned, are byte offsets into the haystack.
/// The haystack must be valid UTF-8 (it may contain NUL bytes), and starting
/// offsets must fall on a character boundary with `start <= haystack.len()`.
///
/// None of these routines can be interrupted. A pathological pattern can keep
/// the calling thread busy for as long as the engine runs; use
/// [`PatternBuilder::retry_limit`](crate::PatternBuilder::retry_limit) to
/// bound the work done per search, or run searches on a worker that can be
/// abandoned.
impl Pattern {
    /// Searches `haystack` for the first match starting at or after `start`,
    /// scanning forward to the end of the haystack.
    ///
    /// On a match, the byte offset at which the match begins is returned and
    /// `region` holds the overall match at index `0` and every group's span
    /// at subsequent indices. `Ok(None)` means no match was found; in that
    /// case every span in `region` is unset.
    ///
    /// The region is reset before the search, so it can be reused for any
    /// number of calls.
    ///
    /// The returned offset is always the start of the overall span in
    /// `region`. These differ from the engine's scan position only when
    /// `\K` is used inside a look-around, which can put the start of the
    /// match before `start`.
    ///
    /// # Example
    ///
    /// ```
    /// use rubex::{Pattern, SearchOptions};
    ///
    /// let re = Pattern::new(br"(\d+)-(\d+)").unwrap();
    /// let mut region = re.region();
    /// let hay = b"id 42-7 end";
    /// let start = re.search(hay, 0, SearchOptions::NONE, &mut region);
    /// assert_eq!(start.unwrap(), Some(3));
    /// assert_eq!(region.get(0).map(|s| s.range()), Some(3..7));
    /// assert_eq!(region.get(1).map(|s| s.range()), Some(3..5));
    /// assert_eq!(region.get(2).map(|s| s.range()), Some(6..7));
    /// ```
    pub fn search(
        &self,
        haystack: &[u8],
        start: usize,
        options: SearchOptions,
        region: &mut Region,
    ) -> Result<Option<usize>, Error> {
        region.reset(self.captures_len());
        let hay = checked_haystack(haystack, start)?;
        self.search_str(hay, start, options, Some(region))
    }

    /// Tests whether the pattern matches at exactly `at`.
    ///
    /// On a match, the length in bytes of the match is returned and `region`
    /// is populated as for [`Pattern::search`]. `Ok(None)` means the pattern
    /// does not match at `at`, and every span in `region` is unset.
    pub fn match_at(
        &self,
        haystack: &[u8],
        at: usize,
        options: SearchOptions,
        region: &mut Region,
    ) -> Result<Option<usize>, Error> {
        region.reset(self.captures_len());
        let hay = checked_haystack(haystack, at)?;
        let result = self.raw().match_with_param(
            hay,
            at,
            options.to_onig(),
            Some(region.as_raw_mut()),
            self.match_param(),
        );
        match result {
            Ok(Some(len)) => {
                trace!("match at {} of length {}", at, len);
                Ok(Some(len))
            }
            Ok(None) => {
                trace!("no match at {}", at);
                region.clear();
                Ok(None)
            }
            Err(err) => {
                trace!("match at {} failed: {}", at, err.description());
                region.clear();
                Err(Error::engine(ErrorKind::Search, &err))
            }
        }
    }

    /// Returns true when the pattern matches anywhere in `haystack`.
    pub fn is_match(&self, haystack: &[u8]) -> Result<bool, Error> {
        self.is_match_at(haystack, 0)
    }

    /// Returns true when the pattern matches anywhere in `haystack` at or
    /// after `start`.
    pub fn is_match_at(
        &self,
        haystack: &[u8],
        start: usize,
    ) -> Result<bool, Error> {
        let hay = checked_haystack(haystack, start)?;
        let found = self.search_str(hay, start, SearchOptions::NONE, None)?;
        Ok(found.is_some())
    }

    /// The search routine shared by every unanchored search, once the
    /// haystack and start offset have been validated.
    pub(crate) fn search_str(
        &self,
        hay: &str,
        start: usize,
        options: SearchOptions,
        mut region: Option<&mut Region>,
    ) -> Result<Option<usize>, Error> {
        let groups = self.captures_len();
        let raw_region = region.as_mut().map(|region| {
            region.reset(groups);
            region.as_raw_mut()
        });
        let result = self.raw().search_with_param(
            hay,
            start,
            hay.len(),
            options.to_onig(),
            raw_region,
            self.match_param(),
        );
        match result {
            Ok(Some(pos)) => {
                trace!("search from {} matched at {}", start, pos);
                // `\K` inside a look-around moves the recorded start of the
                // overall match away from the position the engine returns.
                // The region is authoritative.
                let at = region
                    .as_ref()
                    .and_then(|region| region.get(0))
                    .map_or(pos, |span| span.start);
                Ok(Some(at))
            }
            Ok(None) => {
                trace!("search from {} found no match", start);
                if let Some(region) = region {
                    region.clear();
                }
                Ok(None)
            }
            Err(err) => {
                trace!("search from {} failed: {}", start, err.description());
                if let Some(region) = region {
                    region.clear();
                }
                Err(Error::engine(ErrorKind::Search, &err))
            }
        }
    }

    fn match_param(&self) -> onig::MatchParam {
        let mut param = onig::MatchParam::default();
        let limits = self.limits();
        if let Some(limit) = limits.retry {
            param.set_retry_limit_in_match(limit);
        }
        if let Some(limit) = limits.stack {
            param.set_match_stack_limit(limit);
        }
        param
    }
}

/// Validates a haystack and starting offset, returning the haystack as a
/// string.
pub(crate) fn checked_haystack(
    haystack: &[u8],
    start: usize,
) -> Result<&str, Error> {
    if start > haystack.len() {
        let message = format!(
            "start offset {} exceeds haystack length {}",
            start,
            haystack.len(),
        );
        return Err(Error::bounds(&message));
    }
    let hay = core::str::from_utf8(haystack).map_err(|err| {
        Error::invalid_utf8(ErrorKind::Search, "haystack", err)
    })?;
    if !hay.is_char_boundary(start) {
        let message =
            format!("start offset {} is inside a UTF-8 sequence", start);
        return Err(Error::bounds(&message));
    }
    Ok(hay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;

    #[test]
    fn start_past_end_is_a_bounds_error() {
        let re = Pattern::new(b"a").unwrap();
        let mut region = re.region();
        let err = re
            .search(b"abc", 4, SearchOptions::NONE, &mut region)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
        assert_eq!(err.code(), code::INVALID_ARGUMENT);
    }

    #[test]
    fn start_at_end_is_allowed() {
        let re = Pattern::new(b"$").unwrap();
        let mut region = re.region();
        let got = re.search(b"abc", 3, SearchOptions::NONE, &mut region);
        assert_eq!(got.unwrap(), Some(3));
    }

    #[test]
    fn start_inside_code_point() {
        let re = Pattern::new(b".").unwrap();
        let mut region = re.region();
        let hay = "é".as_bytes();
        let err =
            re.search(hay, 1, SearchOptions::NONE, &mut region).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn invalid_utf8_haystack_is_a_search_error() {
        let re = Pattern::new(b"a").unwrap();
        let mut region = re.region();
        let err = re
            .search(b"a\xFFa", 0, SearchOptions::NONE, &mut region)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Search);
        assert_eq!(err.code(), code::INVALID_CODE_POINT_VALUE);
    }

    #[test]
    fn match_is_anchored() {
        let re = Pattern::new(br"\d+").unwrap();
        let mut region = re.region();
        let hay = b"ab123";
        assert_eq!(
            re.match_at(hay, 0, SearchOptions::NONE, &mut region).unwrap(),
            None
        );
        assert_eq!(
            re.match_at(hay, 2, SearchOptions::NONE, &mut region).unwrap(),
            Some(3)
        );
        assert_eq!(region.get(0).map(|s| s.range()), Some(2..5));
    }

    #[test]
    fn keep_in_lookahead_reports_region_start() {
        let re = Pattern::new(br"a(?=b\K)").unwrap();
        let mut region = re.region();
        let got = re.search(b"xab", 0, SearchOptions::NONE, &mut region);
        assert_eq!(got.unwrap(), Some(2));
        assert_eq!(region.get(0).map(|s| s.range()), Some(2..2));
        let m = re.find(b"xab").unwrap().unwrap();
        assert_eq!(m.range(), 2..2);
    }

    #[test]
    fn keep_in_lookbehind_reports_region_start() {
        let re = Pattern::new(br"(?<=\Ka)b").unwrap();
        let mut region = re.region();
        let got = re.search(b"xab", 0, SearchOptions::NONE, &mut region);
        assert_eq!(got.unwrap(), Some(1));
        assert_eq!(region.get(0).map(|s| s.range()), Some(1..3));
    }
}
