use std::io::{stdout, Write};

use {bstr::ByteSlice, lexopt::Parser, rubex::ErrorKind};

use crate::{
    args,
    util::{self, Table},
};

const USAGE: &'static str = "\
Prints the named-group directory of a pattern.

Each name is printed on its own line, followed by the ascending indices of
the groups it backs. Names are listed in order of their lowest index. With
--verbose, the directory is also printed in its encoded form, as handed
across the C API.

USAGE:
    rubex-cli names [-p <pattern> ...]

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    let mut common = args::common::Config::default();
    let mut patterns = args::patterns::Config::default();
    let mut flags = args::flags::Config::default();
    args::configure(p, USAGE, &mut [&mut common, &mut patterns, &mut flags])?;

    let pattern = patterns.get()?;
    let mut table = Table::empty();
    let (re, time) = util::timeitr(|| flags.build(&pattern))?;
    table.add("compile time", time);
    table.add("groups", re.captures_len());
    table.add("names", re.names().len());
    table.add("encoded length", re.names().encoded_len());

    let mut out = stdout();
    if common.table() {
        table.print(&mut out)?;
    }
    if common.quiet {
        return Ok(());
    }
    for entry in re.names() {
        writeln!(out, "{}: {:?}", entry.name(), entry.indices())?;
    }
    if common.verbose {
        let encoded = encode(&re)?;
        writeln!(out, "{}", encoded.as_bstr())?;
    }
    Ok(())
}

/// Encodes the directory, growing the buffer whenever it is too small.
fn encode(re: &rubex::Pattern) -> anyhow::Result<Vec<u8>> {
    let mut buf = vec![0; 16];
    loop {
        match re.names().write_to(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                return Ok(buf);
            }
            Err(err) => match err.kind() {
                ErrorKind::BufferTooSmall { required } => {
                    log::debug!(
                        "name buffer of {} bytes too small, need {}",
                        buf.len(),
                        required,
                    );
                    buf.resize(required, 0);
                }
                _ => return Err(err.into()),
            },
        }
    }
}
