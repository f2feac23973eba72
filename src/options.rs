use crate::error::{code, Error, ErrorKind};

/// A set of compile time options.
///
/// The bit values are identical to Oniguruma's `ONIG_OPTION_*` constants, so
/// a bitset received over the foreign-call boundary can be passed through
/// [`Options::from_bits`] unchanged.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Options(u32);

impl Options {
    /// No options.
    pub const NONE: Options = Options(0);
    /// Case insensitive matching.
    pub const IGNORECASE: Options = Options(1 << 0);
    /// Extended syntax: whitespace is ignored and `#` starts a comment.
    pub const EXTEND: Options = Options(1 << 1);
    /// `.` matches a newline. (This is Oniguruma's meaning of "multiline",
    /// which other engines call "dot all".)
    pub const MULTILINE: Options = Options(1 << 2);
    /// `^` and `$` only match at the start and end of the haystack.
    pub const SINGLELINE: Options = Options(1 << 3);
    /// Report the longest match instead of the leftmost-first one.
    pub const FIND_LONGEST: Options = Options(1 << 4);
    /// Ignore empty matches.
    pub const FIND_NOT_EMPTY: Options = Options(1 << 5);
    /// Clear `SINGLELINE`, which some syntaxes enable by default.
    pub const NEGATE_SINGLE_LINE: Options = Options(1 << 6);
    /// Only named groups capture.
    pub const DONT_CAPTURE_GROUP: Options = Options(1 << 7);
    /// Plain groups capture even when named groups are present.
    pub const CAPTURE_GROUP: Options = Options(1 << 8);

    const ALL: u32 = (1 << 9) - 1;

    /// Builds an option set from raw bits, rejecting bits that are not
    /// compile time options.
    pub fn from_bits(bits: u32) -> Result<Options, Error> {
        if bits & !Options::ALL != 0 {
            let message = format!(
                "{}: unknown compile option bits 0x{:X}",
                crate::error::describe(code::INVALID_ARGUMENT),
                bits & !Options::ALL,
            );
            return Err(Error::new(
                ErrorKind::Compile,
                code::INVALID_ARGUMENT,
                &message,
            ));
        }
        Ok(Options(bits))
    }

    /// Returns the raw bits of this option set.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns true when every option in `other` is also in `self`.
    pub fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn set(&mut self, other: Options, yes: bool) {
        if yes {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    pub(crate) fn to_onig(self) -> onig::RegexOptions {
        onig::RegexOptions::from_bits_truncate(self.0)
    }
}

impl core::ops::BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}

impl core::fmt::Debug for Options {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        const NAMES: &[(Options, &str)] = &[
            (Options::IGNORECASE, "IGNORECASE"),
            (Options::EXTEND, "EXTEND"),
            (Options::MULTILINE, "MULTILINE"),
            (Options::SINGLELINE, "SINGLELINE"),
            (Options::FIND_LONGEST, "FIND_LONGEST"),
            (Options::FIND_NOT_EMPTY, "FIND_NOT_EMPTY"),
            (Options::NEGATE_SINGLE_LINE, "NEGATE_SINGLE_LINE"),
            (Options::DONT_CAPTURE_GROUP, "DONT_CAPTURE_GROUP"),
            (Options::CAPTURE_GROUP, "CAPTURE_GROUP"),
        ];
        if self.0 == 0 {
            return write!(f, "NONE");
        }
        let mut first = true;
        for &(opt, name) in NAMES {
            if self.contains(opt) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A set of per-search options.
///
/// Like [`Options`], the bit values match Oniguruma's.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SearchOptions(u32);

impl SearchOptions {
    /// No options.
    pub const NONE: SearchOptions = SearchOptions(0);
    /// The start of the haystack is not the beginning of a line.
    pub const NOTBOL: SearchOptions = SearchOptions(1 << 9);
    /// The end of the haystack is not the end of a line.
    pub const NOTEOL: SearchOptions = SearchOptions(1 << 10);

    const ALL: u32 = (1 << 9) | (1 << 10);

    /// Builds a search option set from raw bits, rejecting unknown bits.
    pub fn from_bits(bits: u32) -> Result<SearchOptions, Error> {
        if bits & !SearchOptions::ALL != 0 {
            let message = format!(
                "{}: unknown search option bits 0x{:X}",
                crate::error::describe(code::INVALID_ARGUMENT),
                bits & !SearchOptions::ALL,
            );
            return Err(Error::bounds(&message));
        }
        Ok(SearchOptions(bits))
    }

    /// Returns the raw bits of this option set.
    pub fn bits(self) -> u32 {
        self.0
    }

    pub(crate) fn to_onig(self) -> onig::SearchOptions {
        onig::SearchOptions::from_bits_truncate(self.0)
    }
}

impl core::ops::BitOr for SearchOptions {
    type Output = SearchOptions;

    fn bitor(self, rhs: SearchOptions) -> SearchOptions {
        SearchOptions(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_match_engine_values() {
        assert_eq!(
            Options::IGNORECASE.bits(),
            onig::RegexOptions::REGEX_OPTION_IGNORECASE.bits()
        );
        assert_eq!(
            Options::MULTILINE.bits(),
            onig::RegexOptions::REGEX_OPTION_MULTILINE.bits()
        );
        assert_eq!(
            Options::CAPTURE_GROUP.bits(),
            onig::RegexOptions::REGEX_OPTION_CAPTURE_GROUP.bits()
        );
        assert_eq!(
            SearchOptions::NOTBOL.bits(),
            onig::SearchOptions::SEARCH_OPTION_NOTBOL.bits()
        );
    }

    #[test]
    fn unknown_bits_are_rejected() {
        let err = Options::from_bits(1 << 20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
        assert_eq!(err.code(), code::INVALID_ARGUMENT);

        let err = SearchOptions::from_bits(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn set_and_clear() {
        let mut opts = Options::NONE;
        opts.set(Options::IGNORECASE, true);
        opts |= Options::EXTEND;
        assert!(opts.contains(Options::IGNORECASE | Options::EXTEND));
        opts.set(Options::IGNORECASE, false);
        assert!(!opts.contains(Options::IGNORECASE));
        assert_eq!(format!("{:?}", opts), "EXTEND");
    }
}
