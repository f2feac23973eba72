mod find;
mod names;
mod quote;
mod replace;

const USAGE: &'static str = "\
A tool for compiling Oniguruma patterns with rubex and trying them out.

USAGE:
    rubex-cli <command> ...

COMMANDS:
    find     Search a haystack and print every match with its groups.
    names    Print the named-group directory of a pattern.
    quote    Print text escaped so that it matches literally.
    replace  Replace every match in a haystack using a template.
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "find" => find::run(p),
        "names" => names::run(p),
        "quote" => quote::run(p),
        "replace" => replace::run(p),
        unk => anyhow::bail!("unrecognized command '{unk}'"),
    }
}
