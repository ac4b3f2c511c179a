//! Highlights reversal pairs in the postings source table.

use log::{info, warn};

use crate::config::Config;
use crate::posting::read_postings;
use crate::table::{RowSink, RowSource};

pub mod cmd;
pub mod matcher;

/// Clears old highlights on the postings source table, then highlights the
/// rows of every matched reversal pair. Returns the matched posting ids.
pub fn mark_reversals<W: RowSource + RowSink>(workbook: &mut W, config: &Config) -> Vec<String> {
    let table = &config.tables.postings_source;
    if let Err(e) = workbook.clear_highlights(table) {
        warn!("Unable to clear highlights: {}.", e);
    }

    let postings = read_postings(&*workbook, config);
    let ids = matcher::find_reversals(&postings);

    match workbook.highlight_rows(table, &ids) {
        Ok(count) => info!("Highlighted {} rows in the {} table.", count, table),
        Err(e) => warn!("Unable to highlight reversals: {}.", e),
    }
    ids
}
