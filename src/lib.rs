/*!
A regex matching core built on the Oniguruma engine.

This crate compiles patterns once and then runs any number of searches with
them, recording the span of every capture group in a caller owned
[`Region`]. It also keeps a directory of named groups for each pattern, so
that a name can be resolved to the group index that actually participated
in a match, even when the name is reused across alternation branches.

All patterns and haystacks are UTF-8 and every offset is a byte offset.

# Example

```
use rubex::{Options, SearchOptions};

let (re, mut region) = rubex::compile(
    br"(?<year>\d{4})-(?<month>\d{2})",
    Options::NONE,
)?;
let start = re.search(b"due 2024-05", 0, SearchOptions::NONE, &mut region)?;
assert_eq!(start, Some(4));

let month = re.names().lookup(b"month", &region).unwrap();
assert_eq!(region.get(month).map(|s| s.range()), Some(9..11));
# Ok::<(), rubex::Error>(())
```

# Errors

Every fallible routine returns a [`Error`] with a kind, an Oniguruma error
code and a bounded message. A search that finds nothing is not an error: it
returns `Ok(None)`.

# Crate features

* **logging** - Emits compile and search diagnostics through the `log`
crate. Disabled by default.
*/

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

pub use crate::{
    error::{code, describe, Error, ErrorKind, MAX_ERROR_MESSAGE_LEN},
    escape::quote,
    find::{CaptureMatches, Captures, Match, Matches},
    names::{NameDirectory, NameEntry},
    options::{Options, SearchOptions},
    pattern::{compile, Encoding, Pattern, PatternBuilder, Syntax},
    region::{Region, Span, Spans, UNSET},
};

#[macro_use]
mod macros;

mod error;
mod escape;
mod expand;
mod find;
mod names;
mod options;
mod pattern;
mod region;
mod search;

/// Compiles `pattern` with default options and reports whether it matches
/// anywhere in `haystack`.
///
/// This is meant for one-off tests. Compiling is far more expensive than
/// searching, so a pattern used more than once should be compiled once with
/// [`Pattern::new`].
pub fn is_match(pattern: &[u8], haystack: &[u8]) -> Result<bool, Error> {
    Pattern::new(pattern)?.is_match(haystack)
}
