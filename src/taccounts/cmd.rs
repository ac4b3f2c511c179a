use anyhow::Result;
use clap::Args;
use log::{info, warn};

use crate::opts::WorkbookOpts;

#[derive(Debug, Args)]
pub struct Command {
    #[command(flatten)]
    workbook: WorkbookOpts,
}

impl Command {
    pub fn run(&self) -> Result<()> {
        let (config, mut workbook) = self.workbook.load()?;

        let report = super::build_t_accounts(&mut workbook, &config);
        if !report.skipped.is_empty() {
            let skipped: Vec<String> = report
                .skipped
                .iter()
                .map(|s| format!("{} {} -> {}", s.posting_id, s.side, s.table))
                .collect();
            warn!(
                "{} posting sides were not written to a t-account: {}.",
                skipped.len(),
                skipped.join(", ")
            );
        }
        info!(
            "Wrote {} rows across {} t-accounts.",
            report.rows_written,
            report.balances.len()
        );

        self.workbook.save(&workbook)
    }
}
