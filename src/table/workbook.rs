//! In-memory workbook of named tables.

use crate::anchor::Anchor;
use crate::cell::{Cell, Row};
use crate::table::{RowSink, RowSource, TableError};

static EMPTY_CELL: Cell = Cell::Empty;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub sheet: String,
    pub anchor: Anchor,
    pub title: Option<String>,
    pub headers: Vec<String>,
    rows: Vec<TableRow>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct TableRow {
    cells: Row,
    highlighted: bool,
}

impl Table {
    pub fn new<S: Into<String>>(name: S, sheet: S, anchor: Anchor, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sheet: sheet.into(),
            anchor,
            title: None,
            headers,
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().map(|r| &r.cells)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, cells: Row) {
        self.rows.push(TableRow {
            cells,
            highlighted: false,
        });
    }

    /// Indices of highlighted rows, in row order.
    pub fn highlighted(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.highlighted)
            .map(|(i, _)| i)
            .collect()
    }

    /// Marks the row at `index` highlighted. Returns false if there is no
    /// such row.
    pub fn highlight(&mut self, index: usize) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.highlighted = true;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Workbook {
    tables: Vec<Table>,
    deleted: Vec<String>,
}

impl Workbook {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table, TableError> {
        self.tables
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| TableError::MissingTable(name.to_string()))
    }

    /// Names of tables deleted since the workbook was loaded.
    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }

    pub fn insert_table(&mut self, table: Table) -> Result<(), TableError> {
        if self.table(&table.name).is_some() {
            return Err(TableError::DuplicateTable(table.name));
        }
        self.deleted.retain(|name| name != &table.name);
        self.tables.push(table);
        Ok(())
    }
}

impl RowSource for Workbook {
    fn read_table(&self, name: &str) -> Result<Vec<Row>, TableError> {
        self.table(name)
            .map(|t| t.rows().cloned().collect())
            .ok_or_else(|| TableError::MissingTable(name.to_string()))
    }
}

impl RowSink for Workbook {
    fn replace_rows(&mut self, name: &str, rows: Vec<Row>) -> Result<(), TableError> {
        let table = self.table_mut(name)?;
        table.rows.clear();
        for row in rows {
            table.push_row(row);
        }
        Ok(())
    }

    fn append_row(&mut self, name: &str, row: Row) -> Result<(), TableError> {
        self.table_mut(name)?.push_row(row);
        Ok(())
    }

    fn resort(&mut self, name: &str, key: usize, ascending: bool) -> Result<(), TableError> {
        let table = self.table_mut(name)?;
        if key >= table.headers.len() {
            return Err(TableError::ColumnOutOfRange {
                table: name.to_string(),
                key,
            });
        }
        table.rows.sort_by(|a, b| {
            let a = a.cells.get(key).unwrap_or(&EMPTY_CELL);
            let b = b.cells.get(key).unwrap_or(&EMPTY_CELL);
            if ascending {
                a.sort_cmp(b)
            } else {
                b.sort_cmp(a)
            }
        });
        Ok(())
    }

    fn highlight_rows(&mut self, name: &str, ids: &[String]) -> Result<usize, TableError> {
        let table = self.table_mut(name)?;
        let mut count = 0;
        for row in &mut table.rows {
            let matched = row
                .cells
                .first()
                .map_or(false, |first| ids.iter().any(|id| first.matches_text(id)));
            if matched {
                row.highlighted = true;
                count += 1;
            }
        }
        Ok(count)
    }

    fn clear_highlights(&mut self, name: &str) -> Result<(), TableError> {
        for row in &mut self.table_mut(name)?.rows {
            row.highlighted = false;
        }
        Ok(())
    }

    fn create_table(
        &mut self,
        sheet: &str,
        anchor: Anchor,
        name: &str,
        headers: &[&str],
    ) -> Result<(), TableError> {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        self.insert_table(Table::new(name, sheet, anchor, headers))
    }

    fn set_title(&mut self, name: &str, title: String) -> Result<(), TableError> {
        self.table_mut(name)?.title = Some(title);
        Ok(())
    }

    fn delete_tables(&mut self, sheet: &str) -> usize {
        let (deleted, kept): (Vec<Table>, Vec<Table>) = std::mem::take(&mut self.tables)
            .into_iter()
            .partition(|t| t.sheet == sheet);
        self.tables = kept;
        self.deleted.extend(deleted.iter().map(|t| t.name.clone()));
        deleted.len()
    }
}
