use std::io::{stdout, Write};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

use crate::args::{self, Configurable, Usage};

const USAGE: &'static str = "\
Prints each argument escaped so that, compiled as a pattern, it matches
itself literally.

USAGE:
    rubex-cli quote <text> ...

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    let mut texts = Texts::default();
    args::configure(p, USAGE, &mut [&mut texts])?;
    let mut out = stdout();
    for text in texts.0.iter() {
        writeln!(out, "{}", rubex::quote(text))?;
    }
    Ok(())
}

/// Every positional argument, in order.
#[derive(Debug, Default)]
struct Texts(Vec<String>);

impl Configurable for Texts {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Value(ref mut v) => {
                let v = std::mem::take(v);
                self.0.push(v.string().context("text must be valid UTF-8")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[]
    }
}
