use {
    anyhow::Context,
    lexopt::{Arg, Parser},
    rubex::{Pattern, PatternBuilder, SearchOptions, Syntax},
};

use crate::args::{self, Configurable, Usage};

/// Compile options, pattern syntax and engine limits.
#[derive(Debug, Default)]
pub struct Config {
    case_insensitive: bool,
    multi_line: bool,
    extended: bool,
    longest: bool,
    capture_group: bool,
    syntax: Syntax,
    retry_limit: Option<u32>,
    stack_limit: Option<u32>,
}

impl Config {
    /// Compiles `pattern` with every option in this configuration.
    pub fn build(&self, pattern: &str) -> anyhow::Result<Pattern> {
        let mut builder = PatternBuilder::new(pattern.as_bytes());
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .extended(self.extended)
            .find_longest(self.longest)
            .capture_group(self.capture_group)
            .syntax(self.syntax)
            .retry_limit(self.retry_limit)
            .stack_limit(self.stack_limit);
        builder
            .build()
            .with_context(|| format!("failed to compile pattern '{pattern}'"))
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('i') | Arg::Long("case-insensitive") => {
                self.case_insensitive = true;
            }
            Arg::Short('m') | Arg::Long("multi-line") => {
                self.multi_line = true;
            }
            Arg::Short('x') | Arg::Long("extended") => {
                self.extended = true;
            }
            Arg::Long("longest") => {
                self.longest = true;
            }
            Arg::Long("capture-group") => {
                self.capture_group = true;
            }
            Arg::Long("syntax") => {
                self.syntax = args::parse(p, "--syntax")?;
            }
            Arg::Long("retry-limit") => {
                self.retry_limit = args::parse_maybe(p, "--retry-limit")?;
            }
            Arg::Long("stack-limit") => {
                self.stack_limit = args::parse_maybe(p, "--stack-limit")?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-i, --case-insensitive",
                "Enable case insensitive matching.",
                r#"
Compiles the pattern with the IGNORECASE option.
"#,
            ),
            Usage::new(
                "-m, --multi-line",
                "Make '.' match a newline.",
                r#"
Compiles the pattern with the MULTILINE option. Note that this follows
Oniguruma's meaning of "multiline": '.' also matches '\n'. The anchors '^' and
'$' match at line boundaries regardless of this flag.
"#,
            ),
            Usage::new(
                "-x, --extended",
                "Ignore whitespace and allow # comments.",
                r#"
Compiles the pattern with the EXTEND option, in which whitespace in the
pattern is insignificant and '#' starts a comment that runs to the end of the
line.
"#,
            ),
            Usage::new(
                "--longest",
                "Report the longest match.",
                r#"
Compiles the pattern with the FIND_LONGEST option, so that the longest match
at the leftmost position is reported instead of the first one found.
"#,
            ),
            Usage::new(
                "--capture-group",
                "Let plain groups capture beside named ones.",
                r#"
By default, when a pattern contains named groups, its plain groups do not
capture. This flag makes them capture too.
"#,
            ),
            Usage::new(
                "--syntax <syntax>",
                "One of: default, ruby, perl, perl-ng, java.",
                r#"
Selects the pattern grammar. The default is Oniguruma's default syntax, which
is Ruby's.
"#,
            ),
            Usage::new(
                "--retry-limit <limit>",
                "Cap backtracking per match attempt.",
                r#"
Caps the number of backtracking retries the engine may perform in a single
match attempt. A search that exceeds it fails with an error instead of running
on. The value 'none' (the default) uses the engine's built in limit.
"#,
            ),
            Usage::new(
                "--stack-limit <limit>",
                "Cap the backtracking stack size.",
                r#"
Caps the size of the engine's backtracking stack. A search that exceeds it
fails with an error. The value 'none' (the default) means no cap.
"#,
            ),
        ];
        USAGES
    }
}

/// Where and how a search runs.
#[derive(Debug, Default)]
pub struct Search {
    pub start: usize,
    pub anchored: bool,
    notbol: bool,
    noteol: bool,
}

impl Search {
    pub fn options(&self) -> SearchOptions {
        let mut options = SearchOptions::NONE;
        if self.notbol {
            options = options | SearchOptions::NOTBOL;
        }
        if self.noteol {
            options = options | SearchOptions::NOTEOL;
        }
        options
    }
}

impl Configurable for Search {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("start") => {
                self.start = args::parse(p, "--start")?;
            }
            Arg::Short('a') | Arg::Long("anchored") => {
                self.anchored = true;
            }
            Arg::Long("notbol") => {
                self.notbol = true;
            }
            Arg::Long("noteol") => {
                self.noteol = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "--start <offset>",
                "Begin searching at this byte offset.",
                r#"
Sets the byte offset at which the search begins. It must not exceed the
length of the haystack and must not fall inside a UTF-8 sequence.
"#,
            ),
            Usage::new(
                "-a, --anchored",
                "Only report a match beginning exactly at --start.",
                r#"
Tests whether the pattern matches at exactly the --start offset instead of
searching forward for the first match. At most one match is reported.
"#,
            ),
            Usage::new(
                "--notbol",
                "Don't treat the start of the haystack as a line start.",
                r#"
Searches with the NOTBOL option, so that '^' does not match at the very
beginning of the haystack.
"#,
            ),
            Usage::new(
                "--noteol",
                "Don't treat the end of the haystack as a line end.",
                r#"
Searches with the NOTEOL option, so that '$' does not match at the very end of
the haystack.
"#,
            ),
        ];
        USAGES
    }
}
