use std::io::{stdout, Write};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

use crate::{
    args::{self, Configurable, Usage},
    util::{self, Table},
};

const USAGE: &'static str = "\
Replaces every match in a haystack and prints the result.

In the replacement template, \\0 through \\9 refer to numbered groups,
\\k<name> to a named group and \\\\ to a literal backslash. Groups that did not
participate expand to nothing.

USAGE:
    rubex-cli replace [-p <pattern> ...] -r <template> <haystack-path>
    rubex-cli replace [-p <pattern> ...] -r <template> -y <haystack>

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
    let mut replace = Config::default();
    args::configure(
        p,
        USAGE,
        &mut [
            &mut common,
            &mut patterns,
            &mut haystack,
            &mut flags,
            &mut replace,
        ],
    )?;

    let template = replace
        .template
        .as_deref()
        .context("a template is required via the -r/--replacement flag")?;
    let pattern = patterns.get()?;
    let mut table = Table::empty();
    let (re, time) = util::timeitr(|| flags.build(&pattern))?;
    table.add("compile time", time);

    let mut out = stdout();
    haystack.with(|hay| {
        let mut count = 0usize;
        let (replaced, time) = util::timeitr(|| {
            re.replace_all_with(hay, |caps, dst| {
                count += 1;
                caps.expand(template.as_bytes(), dst);
            })
        })?;
        table.add("replace time", time);
        table.add("replacements", count);
        if common.table() {
            // Keep the table off stdout, which may be piped elsewhere.
            table.print(std::io::stderr())?;
        }
        if !common.quiet {
            out.write_all(&replaced)?;
        }
        Ok(())
    })
}

#[derive(Debug, Default)]
struct Config {
    template: Option<String>,
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('r') | Arg::Long("replacement") => {
                let v = p.value().context("-r/--replacement needs a value")?;
                let v = v
                    .string()
                    .context("-r/--replacement must be valid UTF-8")?;
                self.template = Some(v);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[Usage::new(
            "-r, --replacement <template>",
            "The template each match is replaced with.",
            r#"
Sets the template that replaces every match. \0 through \9 expand to the
numbered groups of the match, \k<name> to a named group (the branch that
participated, when the name is used more than once) and \\ to a literal
backslash. Any other backslash is copied unchanged.
"#,
        )];
        USAGES
    }
}
