//! The tabular interface the pipelines read postings from and write results
//! to.

use thiserror::Error;

use crate::anchor::Anchor;
use crate::cell::Row;

pub mod csvdir;
pub mod workbook;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table {0:?} not found")]
    MissingTable(String),
    #[error("table {0:?} already exists")]
    DuplicateTable(String),
    #[error("table {table:?} has no column {key}")]
    ColumnOutOfRange { table: String, key: usize },
}

pub trait RowSource {
    /// Returns the data rows of the named table, excluding its header.
    fn read_table(&self, name: &str) -> Result<Vec<Row>, TableError>;
}

pub trait RowSink {
    /// Deletes all existing rows of the table, then appends `rows` in order.
    fn replace_rows(&mut self, name: &str, rows: Vec<Row>) -> Result<(), TableError>;

    fn append_row(&mut self, name: &str, row: Row) -> Result<(), TableError>;

    /// Stable sort of the table's rows by the cell at column `key`.
    fn resort(&mut self, name: &str, key: usize, ascending: bool) -> Result<(), TableError>;

    /// Highlights every row whose first cell equals one of `ids`. Returns
    /// the number of rows highlighted.
    fn highlight_rows(&mut self, name: &str, ids: &[String]) -> Result<usize, TableError>;

    fn clear_highlights(&mut self, name: &str) -> Result<(), TableError>;

    fn create_table(
        &mut self,
        sheet: &str,
        anchor: Anchor,
        name: &str,
        headers: &[&str],
    ) -> Result<(), TableError>;

    /// Sets the label shown above the table.
    fn set_title(&mut self, name: &str, title: String) -> Result<(), TableError>;

    /// Deletes every table on the sheet, returning how many were deleted.
    fn delete_tables(&mut self, sheet: &str) -> usize;
}
