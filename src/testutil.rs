use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::anchor::Anchor;
use crate::cell::{Cell, Row};
use crate::posting::Posting;
use crate::table::csvdir::read_csv;
use crate::table::workbook::{Table, Workbook};

pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| Cell::from_field(c)).collect()
}

/// Adds a table parsed from (indented) CSV text, header record first.
pub fn add_csv_table(wb: &mut Workbook, sheet: &str, name: &str, csv_text: &str) {
    let text = textwrap::dedent(csv_text);
    let (headers, rows) = read_csv(text.trim().as_bytes(), None).expect("test CSV did not parse");
    let mut table = Table::new(name, sheet, Anchor::default(), headers);
    for r in rows {
        table.push_row(r);
    }
    wb.insert_table(table).expect("insert_table");
}

pub fn format_rows<'a, I: IntoIterator<Item = &'a Row>>(rows: I) -> String {
    let mut result = String::new();
    for r in rows {
        let cells: Vec<String> = r.iter().map(ToString::to_string).collect();
        result.push_str(&cells.join(","));
        result.push('\n');
    }
    result
}

/// Compares table rows against dedented CSV-like text.
#[macro_export]
macro_rules! assert_rows_eq {
    ($want:expr, $got:expr) => {
        let want_str = textwrap::dedent($want).trim_start().to_string();
        let got_str = crate::testutil::format_rows($got);
        if want_str != got_str {
            text_diff::assert_diff(&want_str, &got_str, "\n", 0);
        }
    };
}

pub struct PostingBuilder {
    posting: Posting,
}

impl PostingBuilder {
    pub fn new(id: &str) -> Self {
        PostingBuilder {
            posting: Posting {
                posting_id: id.to_string(),
                transfer_id: String::new(),
                linked_id: None,
                debit_account: "1000".to_string(),
                debit_account_name: "Bank".to_string(),
                credit_account: "2000".to_string(),
                credit_account_name: "Payables".to_string(),
                effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
                event_type: "EVENT".to_string(),
                posting_type: "X".to_string(),
                amount: Decimal::new(100, 0),
                currency: "ZAR".to_string(),
            },
        }
    }

    pub fn linked(mut self, id: &str) -> Self {
        self.posting.linked_id = Some(id.to_string());
        self
    }

    pub fn debit(mut self, code: &str, name: &str) -> Self {
        self.posting.debit_account = code.to_string();
        self.posting.debit_account_name = name.to_string();
        self
    }

    pub fn credit(mut self, code: &str, name: &str) -> Self {
        self.posting.credit_account = code.to_string();
        self.posting.credit_account_name = name.to_string();
        self
    }

    pub fn date(mut self, y: i32, m: u32, d: u32) -> Self {
        self.posting.effective_date = NaiveDate::from_ymd_opt(y, m, d).expect("date");
        self
    }

    pub fn posting_type(mut self, t: &str) -> Self {
        self.posting.posting_type = t.to_string();
        self
    }

    pub fn amount(mut self, units: i64) -> Self {
        self.posting.amount = Decimal::new(units, 0);
        self
    }

    pub fn build(self) -> Posting {
        self.posting
    }
}
