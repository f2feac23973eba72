use std::io::{stdout, Write};

use {
    bstr::ByteSlice,
    lexopt::{Arg, Parser},
    rubex::{Pattern, Span},
};

use crate::{
    args::{self, Configurable, Usage},
    util::{self, Table},
};

const USAGE: &'static str = "\
Searches a haystack and prints every match along with its groups.

Each match is printed on its own line as a list of groups. Every group shows
its index, its name (if it has one), its byte span and the bytes it matched,
or NONE if it did not participate in the match.

USAGE:
    rubex-cli find [-p <pattern> ...] <haystack-path>
    rubex-cli find [-p <pattern> ...] -y <haystack>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    let mut common = args::common::Config::default();
    let mut patterns = args::patterns::Config::default();
    let mut haystack = args::haystack::Config::default();
    let mut flags = args::flags::Config::default();
    let mut search = args::flags::Search::default();
    let mut find = Config::default();
    args::configure(
        p,
        USAGE,
        &mut [
            &mut common,
            &mut patterns,
            &mut haystack,
            &mut flags,
            &mut search,
            &mut find,
        ],
    )?;

    let pattern = patterns.get()?;
    let mut table = Table::empty();
    let (re, time) = util::timeitr(|| flags.build(&pattern))?;
    table.add("compile time", time);
    table.add("groups", re.captures_len());
    table.add("names", re.names().len());

    let mut out = stdout();
    haystack.with(|hay| {
        let (matches, time) = util::timeitr(|| {
            let mut matches = vec![];
            for _ in 0..find.repeat() {
                matches = search_all(&re, hay, &search)?;
            }
            Ok::<_, anyhow::Error>(matches)
        })?;
        table.add("search time", time);
        table.add("total matches", matches.len());
        if common.table() {
            table.print(&mut out)?;
        }
        if common.quiet {
            return Ok(());
        }
        let names = group_names(&re);
        if find.count {
            let mut counts = vec![0u64; re.captures_len()];
            for spans in matches.iter() {
                for (i, span) in spans.iter().enumerate() {
                    if span.is_some() {
                        counts[i] += 1;
                    }
                }
            }
            write!(out, "{{ ")?;
            for (i, count) in counts.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write_label(&mut out, i, names[i])?;
                write!(out, "{count}")?;
            }
            writeln!(out, " }}")?;
            return Ok(());
        }
        for spans in matches.iter() {
            write!(out, "{{ ")?;
            let mut first = true;
            for (i, span) in spans.iter().enumerate() {
                if span.is_none() && !common.verbose && i > 0 {
                    continue;
                }
                if !first {
                    write!(out, ", ")?;
                }
                first = false;
                write_label(&mut out, i, names[i])?;
                match *span {
                    None => write!(out, "NONE")?,
                    Some(sp) => {
                        let bytes = hay[sp.range()].escape_bytes();
                        write!(out, "{}..{}/{}", sp.start, sp.end, bytes)?;
                    }
                }
            }
            writeln!(out, " }}")?;
        }
        Ok(())
    })
}

/// Runs every search over `hay`, returning the spans of each match.
///
/// Unanchored searches go through the library's own iterator, so the CLI
/// steps over empty matches exactly as the library does.
fn search_all(
    re: &Pattern,
    hay: &[u8],
    search: &args::flags::Search,
) -> anyhow::Result<Vec<Vec<Option<Span>>>> {
    let options = search.options();
    if search.anchored {
        let mut region = re.region();
        let mut matches = vec![];
        if re.match_at(hay, search.start, options, &mut region)?.is_some() {
            matches.push(region.iter().collect());
        }
        return Ok(matches);
    }
    let mut matches = vec![];
    for caps in re.captures_iter_at(hay, search.start, options)? {
        let caps = caps?;
        log::trace!("match at {:?}", caps.pos(0));
        matches.push((0..caps.len()).map(|i| caps.pos(i)).collect());
    }
    Ok(matches)
}

/// Returns the name of every group, indexed by group.
fn group_names(re: &Pattern) -> Vec<Option<&str>> {
    let mut names = vec![None; re.captures_len()];
    for entry in re.names() {
        for &i in entry.indices() {
            if let Some(slot) = names.get_mut(i) {
                *slot = Some(entry.name());
            }
        }
    }
    names
}

fn write_label<W: Write>(
    mut out: W,
    index: usize,
    name: Option<&str>,
) -> std::io::Result<()> {
    match name {
        Some(name) => write!(out, "{index}/{name}: "),
        None => write!(out, "{index}: "),
    }
}

#[derive(Debug, Default)]
struct Config {
    count: bool,
    repeat: Option<u32>,
}

impl Config {
    fn repeat(&self) -> u32 {
        self.repeat.unwrap_or(1)
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('c') | Arg::Long("count") => {
                self.count = true;
            }
            Arg::Long("repeat") => {
                self.repeat = Some(args::parse(p, "--repeat")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[
            Usage::new(
                "-c, --count",
                "Show how often each group matched.",
                r#"
Prints, for every group, the number of matches in which it participated,
instead of printing the matches themselves.
"#,
            ),
            Usage::new(
                "--repeat <count>",
                "Repeat the search this many times.",
                r#"
Repeats the whole search this many times. The default is 1. This is useful
when the search is too fast to time reliably. Matches are only printed once.
"#,
            ),
        ];
        USAGES
    }
}
