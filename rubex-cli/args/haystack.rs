use std::path::PathBuf;

use {
    anyhow::Context,
    bstr::{BStr, BString, ByteSlice, ByteVec},
    lexopt::{Arg, Parser, ValueExt},
};

use crate::args::{Configurable, Usage};

/// The one haystack a command searches: either inline via `-y/--haystack`
/// or a file named by a positional argument.
#[derive(Debug, Default)]
pub struct Config {
    kind: Option<Kind>,
}

impl Config {
    /// Passes the haystack to `f`. A file is memory mapped rather than read
    /// onto the heap.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&BStr) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        match self.kind {
            Some(Kind::Inline(ref haystack)) => f(haystack.as_bstr()),
            Some(Kind::Path(ref path)) => {
                let file = std::fs::File::open(path).with_context(|| {
                    format!("failed to open {}", path.display())
                })?;
                // SAFETY: The mapping is only ever read, and is dropped
                // before this function returns. Like any mmap, this assumes
                // the file isn't truncated underneath us while searching.
                let mmap = unsafe {
                    memmap2::Mmap::map(&file).with_context(|| {
                        format!("failed to mmap {}", path.display())
                    })?
                };
                f(<&BStr>::from(&*mmap))
            }
            None => anyhow::bail!(
                "haystack is required via the -y/--haystack flag \
                 or via a positional argument",
            ),
        }
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('y') | Arg::Long("haystack") => {
                anyhow::ensure!(
                    self.kind.is_none(),
                    "only one haystack is allowed",
                );
                let hay = p.value().context("-y/--haystack needs a value")?;
                let hay = hay
                    .string()
                    .context("-y/--haystack must be valid UTF-8")?;
                let hay = Vec::unescape_bytes(&hay);
                self.kind = Some(Kind::Inline(BString::from(hay)));
            }
            Arg::Value(ref mut v) => {
                anyhow::ensure!(
                    self.kind.is_none(),
                    "only one haystack is allowed",
                );
                let path = PathBuf::from(std::mem::take(v));
                self.kind = Some(Kind::Path(path));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[Usage::new(
            "-y, --haystack <haystack>",
            "Provide an inline haystack on the command line.",
            r#"
Provides the haystack itself on the command line, rather than a path to a file
holding it.

The value may use escape sequences, so "-y 'a\x00\t'" is the byte sequence
0x61 0x00 0x09. Searches require the unescaped haystack to be valid UTF-8, but
it may contain NUL bytes.

Exactly one haystack is permitted: either this flag or a file path given as a
positional argument.
"#,
        )];
        USAGES
    }
}

/// Paths are only opened once the haystack is needed, so that files can be
/// memory mapped for exactly as long as a search runs.
#[derive(Debug)]
enum Kind {
    Inline(BString),
    Path(PathBuf),
}
