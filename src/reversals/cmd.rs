use anyhow::Result;
use clap::Args;

use crate::filespec::{self, FileSpec};
use crate::opts::WorkbookOpts;

#[derive(Debug, Args)]
pub struct Command {
    #[command(flatten)]
    workbook: WorkbookOpts,
    /// Also write the matched posting ids, one per line, to this file. "-"
    /// writes to stdout.
    #[arg(long = "ids")]
    ids: Option<FileSpec>,
}

impl Command {
    pub fn run(&self) -> Result<()> {
        let (config, mut workbook) = self.workbook.load()?;

        let ids = super::mark_reversals(&mut workbook, &config);

        self.workbook.save(&workbook)?;
        if let Some(ids_file) = &self.ids {
            filespec::write_lines(ids_file, &ids)?;
        }
        Ok(())
    }
}
