use std::sync::Arc;

use crate::{
    error::{Error, ErrorKind},
    names::NameDirectory,
    options::Options,
    region::Region,
};

/// The character encoding of every pattern and haystack.
///
/// This is fixed to UTF-8 for the whole process. All offsets reported by
/// this crate are byte offsets into UTF-8 text; callers that need character
/// indices must convert them. Text in any other encoding must be transcoded
/// before it reaches this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Encoding {
    /// UTF-8.
    Utf8,
}

/// The pattern grammar handed to the engine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Syntax {
    /// The engine's default syntax.
    #[default]
    Default,
    /// Ruby syntax.
    Ruby,
    /// Perl syntax.
    Perl,
    /// Perl syntax with named groups.
    PerlNg,
    /// Java syntax.
    Java,
}

impl Syntax {
    fn to_onig(self) -> &'static onig::Syntax {
        match self {
            Syntax::Default => onig::Syntax::default(),
            Syntax::Ruby => onig::Syntax::ruby(),
            Syntax::Perl => onig::Syntax::perl(),
            Syntax::PerlNg => onig::Syntax::perl_ng(),
            Syntax::Java => onig::Syntax::java(),
        }
    }
}

impl core::str::FromStr for Syntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Syntax, String> {
        let syntax = match s {
            "default" => Syntax::Default,
            "ruby" => Syntax::Ruby,
            "perl" => Syntax::Perl,
            "perl-ng" => Syntax::PerlNg,
            "java" => Syntax::Java,
            unk => return Err(format!("unrecognized syntax '{}'", unk)),
        };
        Ok(syntax)
    }
}

/// Limits passed to the engine for every search with a pattern.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Limits {
    pub(crate) retry: Option<u32>,
    pub(crate) stack: Option<u32>,
}

/// A compiled pattern.
///
/// A `Pattern` is immutable once compiled. It may be shared by reference
/// (for example through an `Arc`) between threads; every thread then
/// searches with its own [`Region`], created by [`Pattern::region`].
///
/// The engine allocations backing a pattern are released exactly once, when
/// the pattern is dropped.
pub struct Pattern {
    source: Box<str>,
    options: Options,
    syntax: Syntax,
    limits: Limits,
    captures_len: usize,
    names: Arc<NameDirectory>,
    raw: onig::Regex,
}

impl Pattern {
    /// Compiles a pattern with default options.
    ///
    /// The pattern must be valid UTF-8.
    pub fn new(pattern: &[u8]) -> Result<Pattern, Error> {
        PatternBuilder::new(pattern).build()
    }

    /// Compiles a pattern with the given option set.
    pub fn with_options(
        pattern: &[u8],
        options: Options,
    ) -> Result<Pattern, Error> {
        PatternBuilder::new(pattern).options(options).build()
    }

    /// Returns a new region sized for this pattern's groups, with every span
    /// unset.
    ///
    /// A region can be reused for any number of searches with this pattern.
    pub fn region(&self) -> Region {
        Region::with_groups(self.captures_len)
    }

    /// Returns the number of groups in this pattern, including the implicit
    /// group `0` for the overall match.
    ///
    /// Valid group indices are `0..captures_len()`.
    pub fn captures_len(&self) -> usize {
        self.captures_len
    }

    /// Returns the number of capturing groups, not counting group `0`.
    pub fn num_subexp(&self) -> usize {
        self.captures_len - 1
    }

    /// Returns the directory of named groups in this pattern.
    pub fn names(&self) -> &NameDirectory {
        &self.names
    }

    /// Returns the source of this pattern.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the options this pattern was compiled with.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Returns the syntax this pattern was compiled with.
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Returns the encoding of this pattern, which is always UTF-8.
    pub fn encoding(&self) -> Encoding {
        Encoding::Utf8
    }

    pub(crate) fn raw(&self) -> &onig::Regex {
        &self.raw
    }

    pub(crate) fn limits(&self) -> Limits {
        self.limits
    }

    pub(crate) fn shared_names(&self) -> &Arc<NameDirectory> {
        &self.names
    }
}

impl core::fmt::Display for Pattern {
    /// Shows the original pattern.
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("options", &self.options)
            .field("syntax", &self.syntax)
            .field("captures_len", &self.captures_len)
            .field("names", &self.names)
            .finish()
    }
}

/// Compiles a pattern and returns it along with a region sized for it.
///
/// This is the usual entry point when a pattern is compiled for repeated
/// searching: the region can be passed to every subsequent call to
/// [`Pattern::search`] or [`Pattern::match_at`].
pub fn compile(
    pattern: &[u8],
    options: Options,
) -> Result<(Pattern, Region), Error> {
    let pattern = Pattern::with_options(pattern, options)?;
    let region = pattern.region();
    Ok((pattern, region))
}

/// A configurable builder for a [`Pattern`].
#[derive(Clone, Debug)]
pub struct PatternBuilder {
    pattern: Vec<u8>,
    options: Options,
    syntax: Syntax,
    limits: Limits,
}

impl PatternBuilder {
    /// Creates a new builder for the given pattern with default options.
    pub fn new(pattern: &[u8]) -> PatternBuilder {
        PatternBuilder {
            pattern: pattern.to_vec(),
            options: Options::NONE,
            syntax: Syntax::Default,
            limits: Limits::default(),
        }
    }

    /// Compiles the pattern.
    ///
    /// Every exit path releases whatever the engine allocated, whether or not
    /// compilation succeeds.
    pub fn build(&self) -> Result<Pattern, Error> {
        let source = core::str::from_utf8(&self.pattern).map_err(|err| {
            Error::invalid_utf8(ErrorKind::Compile, "pattern", err)
        })?;
        let raw = onig::Regex::with_options(
            source,
            self.options.to_onig(),
            self.syntax.to_onig(),
        )
        .map_err(|err| {
            debug!(
                "failed to compile {:?}: code {}: {}",
                source,
                err.code(),
                err.description(),
            );
            Error::engine(ErrorKind::Compile, &err)
        })?;
        let names = NameDirectory::new(&raw);
        let captures_len = raw.captures_len() + 1;
        debug!(
            "compiled {:?} ({:?}): {} groups, {} names",
            source,
            self.options,
            captures_len,
            names.len(),
        );
        Ok(Pattern {
            source: source.into(),
            options: self.options,
            syntax: self.syntax,
            limits: self.limits,
            captures_len,
            names: Arc::new(names),
            raw,
        })
    }

    /// Replaces the whole option set.
    pub fn options(&mut self, options: Options) -> &mut PatternBuilder {
        self.options = options;
        self
    }

    /// Enables or disables case insensitive matching.
    pub fn case_insensitive(&mut self, yes: bool) -> &mut PatternBuilder {
        self.options.set(Options::IGNORECASE, yes);
        self
    }

    /// Enables or disables Oniguruma's multiline mode, in which `.` also
    /// matches `\n`.
    pub fn multi_line(&mut self, yes: bool) -> &mut PatternBuilder {
        self.options.set(Options::MULTILINE, yes);
        self
    }

    /// Enables or disables extended syntax, where whitespace is insignificant
    /// and `#` begins a comment.
    pub fn extended(&mut self, yes: bool) -> &mut PatternBuilder {
        self.options.set(Options::EXTEND, yes);
        self
    }

    /// Report the longest match at the leftmost position instead of the
    /// first one found.
    pub fn find_longest(&mut self, yes: bool) -> &mut PatternBuilder {
        self.options.set(Options::FIND_LONGEST, yes);
        self
    }

    /// Never report empty matches.
    pub fn find_not_empty(&mut self, yes: bool) -> &mut PatternBuilder {
        self.options.set(Options::FIND_NOT_EMPTY, yes);
        self
    }

    /// Make plain groups capture even when named groups are present.
    pub fn capture_group(&mut self, yes: bool) -> &mut PatternBuilder {
        self.options.set(Options::CAPTURE_GROUP, yes);
        self
    }

    /// Make only named groups capture.
    pub fn dont_capture_group(&mut self, yes: bool) -> &mut PatternBuilder {
        self.options.set(Options::DONT_CAPTURE_GROUP, yes);
        self
    }

    /// Sets the pattern grammar.
    pub fn syntax(&mut self, syntax: Syntax) -> &mut PatternBuilder {
        self.syntax = syntax;
        self
    }

    /// Caps the number of backtracking retries the engine may perform in a
    /// single match attempt. Exceeding the limit makes the search fail with
    /// an [`ErrorKind::Search`] error.
    ///
    /// `None` (the default) uses the engine's built in limit.
    pub fn retry_limit(&mut self, limit: Option<u32>) -> &mut PatternBuilder {
        self.limits.retry = limit;
        self
    }

    /// Caps the size of the engine's backtracking stack. Exceeding the limit
    /// makes the search fail with an [`ErrorKind::Search`] error.
    pub fn stack_limit(&mut self, limit: Option<u32>) -> &mut PatternBuilder {
        self.limits.stack = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn pattern_is_shareable() {
        assert_send_sync::<Pattern>();
    }

    #[test]
    fn good_pattern() {
        let re = Pattern::new(b"yeah").unwrap();
        assert_eq!(re.as_str(), "yeah");
        assert_eq!(re.captures_len(), 1);
        assert_eq!(re.num_subexp(), 0);
        assert_eq!(re.encoding(), Encoding::Utf8);
    }

    #[test]
    fn bad_pattern() {
        let err = Pattern::new(b"yeah(abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
        assert!(err.code() < 0);
        assert!(!err.message().is_empty());
    }

    #[test]
    fn invalid_utf8_pattern() {
        let err = Pattern::new(b"a\xFFb").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
        assert_eq!(err.code(), crate::error::code::INVALID_CODE_POINT_VALUE);
    }

    #[test]
    fn builder_sets_options() {
        let re = PatternBuilder::new(b"abc")
            .case_insensitive(true)
            .extended(true)
            .build()
            .unwrap();
        assert!(re.options().contains(Options::IGNORECASE | Options::EXTEND));
    }

    #[test]
    fn syntax_from_str() {
        assert_eq!("perl-ng".parse::<Syntax>(), Ok(Syntax::PerlNg));
        assert!("emacs".parse::<Syntax>().is_err());
    }

    #[test]
    fn companion_region_is_sized_and_unset() {
        let (re, region) = compile(br"(\d+)-(\d+)", Options::NONE).unwrap();
        assert_eq!(re.captures_len(), 3);
        assert_eq!(region.len(), 3);
        assert!(region.iter().all(|span| span.is_none()));
    }
}
