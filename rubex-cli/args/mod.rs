use std::{
    fmt::{Debug, Display, Write},
    str::FromStr,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

pub mod common;
pub mod flags;
pub mod haystack;
pub mod patterns;

/// A group of related command line flags.
///
/// Each command builds the groups it needs and hands them all to
/// [`configure`], which offers every argument to each group in turn.
pub trait Configurable: Debug {
    /// Consumes `arg` (and its value, if any, from `p`) when this group
    /// recognizes it. Returns false for arguments it doesn't know.
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool>;

    fn usage(&self) -> &[Usage];
}

/// Parses every remaining argument in `p` into `targets`.
///
/// `-h` and `--help` turn `usage` into an error, with `%options%` replaced by
/// the short or long documentation of every target's flags.
pub fn configure(
    p: &mut Parser,
    usage: &str,
    targets: &mut [&mut dyn Configurable],
) -> anyhow::Result<()> {
    while let Some(arg) = p.next()? {
        if let Arg::Short('h') | Arg::Long("help") = arg {
            let long = arg == Arg::Long("help");
            anyhow::bail!("{}", help(usage, targets, long));
        }
        // Detach the argument from the parser's borrow so that targets can
        // pull a value out of `p` while looking at it.
        let long_flag: Option<String> = match arg {
            Arg::Long(name) => Some(name.to_string()),
            _ => None,
        };
        let mut arg = match (long_flag.as_deref(), arg) {
            (Some(flag), _) => Arg::Long(flag),
            (None, Arg::Short(c)) => Arg::Short(c),
            (None, Arg::Value(value)) => Arg::Value(value),
            (None, Arg::Long(_)) => unreachable!(),
        };
        let mut recognized = false;
        for t in targets.iter_mut() {
            if t.configure(p, &mut arg)? {
                recognized = true;
                break;
            }
        }
        if !recognized {
            return Err(arg.unexpected().into());
        }
    }
    Ok(())
}

fn help(usage: &str, targets: &[&mut dyn Configurable], long: bool) -> String {
    let mut usages: Vec<Usage> =
        targets.iter().flat_map(|t| t.usage().iter().copied()).collect();
    usages.sort_by_key(|u| {
        u.format.split_once(", ").map(|(_, long)| long).unwrap_or(u.format)
    });
    let options =
        if long { Usage::long(&usages) } else { Usage::short(&usages) };
    usage.replace("%options%", &options).trim().to_string()
}

/// Parses the next argument as a command name. A missing command, `-h` or
/// `--help` all turn `usage` into an error.
pub fn next_as_command(usage: &str, p: &mut Parser) -> anyhow::Result<String> {
    let usage = usage.trim();
    let arg = match p.next()? {
        Some(arg) => arg,
        None => anyhow::bail!("{usage}"),
    };
    let cmd = match arg {
        Arg::Value(cmd) => cmd.string()?,
        Arg::Short('h') | Arg::Long("help") => anyhow::bail!("{usage}"),
        arg => return Err(arg.unexpected().into()),
    };
    Ok(cmd)
}

/// Parses the next `p.value()` into `T`, naming `flag_name` in any error.
pub fn parse<T>(p: &mut Parser, flag_name: &'static str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let value = string_value(p, flag_name)?;
    value.parse().map_err(|err| anyhow::Error::msg(err).context(flag_name))
}

/// Like `parse`, but the value "none" means absent. Used for limits.
pub fn parse_maybe<T>(
    p: &mut Parser,
    flag_name: &'static str,
) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let value = string_value(p, flag_name)?;
    if value == "none" {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|err| anyhow::Error::msg(err).context(flag_name))
}

fn string_value(
    p: &mut Parser,
    flag_name: &'static str,
) -> anyhow::Result<String> {
    let osv = p.value().context(flag_name)?;
    osv.string().context(flag_name)
}

/// The documentation of one flag.
///
/// `Usage::short` and `Usage::long` format a list of these into the OPTIONS
/// section of a command's help.
#[derive(Clone, Copy, Debug)]
pub struct Usage {
    /// How the flag is written, for example, `-p, --pattern <pattern>`.
    pub format: &'static str,
    /// A one line description.
    pub short: &'static str,
    /// A description of any length. Paragraphs are separated by blank lines.
    pub long: &'static str,
}

impl Usage {
    pub const fn new(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { format, short, long }
    }

    /// Formats a two column table of each flag and its short description.
    pub fn short(usages: &[Usage]) -> String {
        const MIN_SPACE: usize = 2;

        let mut result = String::new();
        let max_len = match usages.iter().map(|u| u.format.len()).max() {
            None => return result,
            Some(len) => len,
        };
        for usage in usages.iter() {
            let padding = " ".repeat(MIN_SPACE + max_len - usage.format.len());
            // Writing to a String never fails.
            let _ = writeln!(
                result,
                "    {}{}{}",
                usage.format, padding, usage.short
            );
        }
        result
    }

    /// Formats each flag followed by its long description, wrapped and
    /// indented beneath it.
    pub fn long(usages: &[Usage]) -> String {
        let wrap_opts = textwrap::Options::new(79)
            .initial_indent("        ")
            .subsequent_indent("        ");
        let mut result = String::new();
        for (i, usage) in usages.iter().enumerate() {
            if i > 0 {
                result.push('\n');
            }
            let _ = writeln!(result, "    {}", usage.format);
            for (i, paragraph) in usage.long.trim().split("\n\n").enumerate() {
                if i > 0 {
                    result.push('\n');
                }
                let flattened = paragraph.replace('\n', " ");
                for line in textwrap::wrap(&flattened, &wrap_opts) {
                    result.push_str(&line);
                    result.push('\n');
                }
            }
        }
        result
    }
}
