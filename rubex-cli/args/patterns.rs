use std::path::PathBuf;

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

use crate::args::{Configurable, Usage};

/// Reads the pattern to compile from the command line.
///
/// Patterns come from `-p/--pattern` and `-f/--pattern-file`. Several
/// patterns are combined into one alternation, since a compiled pattern
/// always holds exactly one expression.
#[derive(Debug, Default)]
pub struct Config {
    patterns: Vec<String>,
    fixed_strings: bool,
}

impl Config {
    /// Returns the single pattern described by this configuration.
    ///
    /// Each pattern is wrapped in a non-capturing group before they are
    /// joined, so that a pattern like `a|b` doesn't leak into its neighbors.
    pub fn get(&self) -> anyhow::Result<String> {
        let mut pats = self.patterns.clone();
        if self.fixed_strings {
            pats = pats.iter().map(|p| rubex::quote(p)).collect();
        }
        match pats.len() {
            0 => anyhow::bail!(
                "a pattern is required via the -p/--pattern or \
                 -f/--pattern-file flags",
            ),
            1 => Ok(pats.pop().unwrap_or_default()),
            _ => {
                let groups: Vec<String> =
                    pats.iter().map(|p| format!("(?:{})", p)).collect();
                Ok(groups.join("|"))
            }
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
            Arg::Short('p') | Arg::Long("pattern") => {
                let pat = p.value().context("-p/--pattern needs a value")?;
                let pat = pat
                    .string()
                    .context("-p/--pattern must be valid UTF-8")?;
                self.patterns.push(pat);
            }
            Arg::Short('F') | Arg::Long("fixed-strings") => {
                self.fixed_strings = true;
            }
            Arg::Short('f') | Arg::Long("pattern-file") => {
                let path =
                    PathBuf::from(p.value().context("-f/--pattern-file")?);
                let contents =
                    std::fs::read_to_string(&path).with_context(|| {
                        format!("failed to read {}", path.display())
                    })?;
                self.patterns.extend(contents.lines().map(|x| x.to_string()));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-p, --pattern <pattern>",
                "Add a pattern to this command.",
                r#"
Adds a pattern to the command. The pattern must be valid UTF-8.

When more than one pattern is given, by this flag or by -f/--pattern-file,
they are combined into a single alternation, each wrapped in a non-capturing
group.
"#,
            ),
            Usage::new(
                "-f, --pattern-file <path>",
                "Read patterns from the file given.",
                r#"
Reads patterns, one per line, from the file given. Every pattern is combined
with the others as described for -p/--pattern.
"#,
            ),
            Usage::new(
                "-F, --fixed-strings",
                "Interpret all patterns literally.",
                r#"
When set, every pattern is quoted before it is compiled, so that meta
characters like '+' or '(' match themselves.
"#,
            ),
        ];
        USAGES
    }
}
