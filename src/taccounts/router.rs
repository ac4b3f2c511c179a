//! Writes each posting into the T-account tables of its debit and credit
//! accounts.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::cell::{Cell, Row};
use crate::config::TableNames;
use crate::posting::Posting;
use crate::table::{RowSink, TableError};

pub const T_ACCOUNT_HEADERS: [&str; 6] = [
    "PostingId",
    "EffectiveDate",
    "EventType",
    "PostingType",
    "Debit",
    "Credit",
];

/// T-account tables are kept sorted by effective date.
const SORT_KEY: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    fn account<'a>(&self, posting: &'a Posting) -> &'a str {
        match self {
            Side::Debit => &posting.debit_account,
            Side::Credit => &posting.credit_account,
        }
    }

    /// The T-account row for `posting`, with the amount in this side's slot.
    pub fn row(&self, posting: &Posting) -> Row {
        let amount = Cell::Number(posting.amount);
        let (debit, credit) = match self {
            Side::Debit => (amount, Cell::Empty),
            Side::Credit => (Cell::Empty, amount),
        };
        vec![
            Cell::from(posting.posting_id.as_str()),
            Cell::from(posting.effective_date.to_string()),
            Cell::from(posting.event_type.as_str()),
            Cell::from(posting.posting_type.as_str()),
            debit,
            credit,
        ]
    }

    fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Side::Debit => amount,
            Side::Credit => -amount,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Side::Debit => f.write_str("debit"),
            Side::Credit => f.write_str("credit"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSide {
    pub posting_id: String,
    pub side: Side,
    pub table: String,
}

#[derive(Debug, Default)]
pub struct RoutingReport {
    pub rows_written: usize,
    pub skipped: Vec<SkippedSide>,
    /// Debits minus credits written per account code.
    pub balances: BTreeMap<String, Decimal>,
}

/// Appends both sides of every posting to their T-account tables. A side
/// whose table cannot be found is skipped and the other side is still
/// written.
pub fn route_postings(
    postings: &[Posting],
    sink: &mut dyn RowSink,
    tables: &TableNames,
) -> RoutingReport {
    info!("Populating {} postings to t-accounts.", postings.len());
    let mut report = RoutingReport::default();

    for posting in postings {
        for side in [Side::Debit, Side::Credit] {
            let code = side.account(posting);
            let table = tables.t_account_table(code);
            match append_sorted(sink, &table, side.row(posting)) {
                Ok(()) => {
                    report.rows_written += 1;
                    *report.balances.entry(code.to_string()).or_default() +=
                        side.signed(posting.amount);
                }
                Err(e) => {
                    warn!(
                        "Unable to write {} side of posting {}: {}.",
                        side, posting.posting_id, e
                    );
                    report.skipped.push(SkippedSide {
                        posting_id: posting.posting_id.clone(),
                        side,
                        table,
                    });
                }
            }
        }
        debug!(
            "Populated t-accounts with posting {} ({} {}, transfer {}).",
            posting.posting_id, posting.amount, posting.currency, posting.transfer_id
        );
    }

    for (code, balance) in &report.balances {
        debug!("Account {} balance {}.", code, balance);
    }
    report
}

fn append_sorted(sink: &mut dyn RowSink, table: &str, row: Row) -> Result<(), TableError> {
    sink.append_row(table, row)?;
    sink.resort(table, SORT_KEY, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::table::workbook::Workbook;
    use crate::testutil::PostingBuilder;

    fn workbook_with_accounts(codes: &[&str]) -> Workbook {
        let mut wb = Workbook::new();
        let tables = TableNames::default();
        for code in codes {
            wb.create_table(
                "t_accounts",
                Anchor::default(),
                &tables.t_account_table(code),
                &T_ACCOUNT_HEADERS,
            )
            .expect("create_table");
        }
        wb
    }

    #[test]
    fn writes_both_sides_sorted_by_date() {
        let mut wb = workbook_with_accounts(&["1000", "2000"]);
        let postings = vec![
            PostingBuilder::new("2").date(2024, 3, 1).amount(30).build(),
            PostingBuilder::new("1").date(2024, 1, 15).amount(15).build(),
            PostingBuilder::new("3")
                .date(2024, 2, 1)
                .amount(5)
                .debit("2000", "Payables")
                .credit("1000", "Bank")
                .build(),
        ];

        let report = route_postings(&postings, &mut wb, &TableNames::default());

        assert_eq!(6, report.rows_written);
        assert!(report.skipped.is_empty());
        assert_rows_eq!(
            r#"
            1,2024-01-15,EVENT,X,15,
            3,2024-02-01,EVENT,X,,5
            2,2024-03-01,EVENT,X,30,
            "#,
            wb.table("account_1000").unwrap().rows()
        );
        assert_rows_eq!(
            r#"
            1,2024-01-15,EVENT,X,,15
            3,2024-02-01,EVENT,X,5,
            2,2024-03-01,EVENT,X,,30
            "#,
            wb.table("account_2000").unwrap().rows()
        );
        assert_eq!(Some(&Decimal::new(40, 0)), report.balances.get("1000"));
        assert_eq!(Some(&Decimal::new(-40, 0)), report.balances.get("2000"));
    }

    #[test]
    fn missing_credit_table_still_writes_debit() {
        let mut wb = workbook_with_accounts(&["1000"]);
        let postings = vec![PostingBuilder::new("7")
            .debit("1000", "Bank")
            .credit("9999", "Unknown")
            .build()];

        let report = route_postings(&postings, &mut wb, &TableNames::default());

        assert_eq!(1, report.rows_written);
        assert_eq!(
            vec![SkippedSide {
                posting_id: "7".to_string(),
                side: Side::Credit,
                table: "account_9999".to_string(),
            }],
            report.skipped
        );
        assert_rows_eq!(
            r#"
            7,2024-01-01,EVENT,X,100,
            "#,
            wb.table("account_1000").unwrap().rows()
        );
    }

    #[test]
    fn missing_debit_table_still_writes_credit() {
        let mut wb = workbook_with_accounts(&["2000"]);
        let postings = vec![PostingBuilder::new("8").debit("9999", "Unknown").build()];

        let report = route_postings(&postings, &mut wb, &TableNames::default());

        assert_eq!(1, report.rows_written);
        assert_eq!(Side::Debit, report.skipped[0].side);
        assert_rows_eq!(
            r#"
            8,2024-01-01,EVENT,X,,100
            "#,
            wb.table("account_2000").unwrap().rows()
        );
    }
}
