use lexopt::{Arg, Parser};

use crate::args::{Configurable, Usage};

/// Output knobs shared by every command.
#[derive(Debug, Default)]
pub struct Config {
    pub quiet: bool,
    pub verbose: bool,
    pub no_table: bool,
}

impl Config {
    pub fn table(&self) -> bool {
        !self.no_table
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('q') | Arg::Long("quiet") => {
                self.quiet = true;
            }
            Arg::Long("verbose") => {
                self.verbose = true;
            }
            Arg::Long("no-table") => {
                self.no_table = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-q, --quiet",
                "Suppress some output.",
                r#"
Suppresses the main output of a command, leaving only the table of
information (unless --no-table is also given). For example, 'rubex-cli find
-q' reports how many matches were found and how long the search took without
printing each match.
"#,
            ),
            Usage::new(
                "--verbose",
                "Add more output.",
                r#"
Adds output beyond the normal amount. For example, 'rubex-cli names --verbose'
also prints the encoded name directory, and 'rubex-cli find --verbose' prints
every group of each match, including groups that did not participate.
"#,
            ),
            Usage::new(
                "--no-table",
                "Omit any table of information from the output.",
                r#"
Most commands print a table of information about the compiled pattern and
the time taken by each step. Passing this flag suppresses that table.
"#,
            ),
        ];
        USAGES
    }
}
