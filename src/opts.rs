use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::filespec::FileSpec;
use crate::table::csvdir;
use crate::table::workbook::Workbook;

/// Options common to commands that update a workbook directory.
#[derive(Debug, Args)]
pub struct WorkbookOpts {
    /// Workbook directory: one CSV file per table, plus an optional
    /// workbook.ron manifest.
    pub workbook: PathBuf,
    /// RON configuration file. "-" reads from stdin. Built-in defaults apply
    /// when omitted.
    #[arg(short = 'c', long = "config")]
    pub config: Option<FileSpec>,
    /// Directory to save the updated workbook to. Defaults to updating the
    /// input workbook in place.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

impl WorkbookOpts {
    pub fn load(&self) -> Result<(Config, Workbook)> {
        let config = Config::load(self.config.as_ref())?;
        let workbook = csvdir::load_dir(&self.workbook, config.encoding()?)?;
        Ok((config, workbook))
    }

    pub fn save(&self, workbook: &Workbook) -> Result<()> {
        csvdir::save_dir(workbook, self.output_dir())
    }

    fn output_dir(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.workbook)
    }
}
