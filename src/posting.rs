//! Decoding of postings source rows into `Posting` records.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::cell::{Cell, Row};
use crate::config::{ColumnLayout, Config};
use crate::table::RowSource;

/// Date formats accepted for text date cells, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Serial day numbers accepted as dates: 1927-05-18 to 9999-12-31. Smaller
/// numbers are more likely a bare year than a date.
const SERIAL_MIN: u64 = 10_000;
const SERIAL_MAX: u64 = 2_958_465;

lazy_static! {
    static ref GROUPED_AMOUNT: Regex = Regex::new(r"^[-+]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap();
}

/// Day zero of spreadsheet serial dates.
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("row has {width} cells, missing column {index} ({field})")]
    MissingColumn {
        field: &'static str,
        index: usize,
        width: usize,
    },
    #[error("bad {field} value {value:?}: {reason}")]
    BadValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl DecodeError {
    fn bad_value(field: &'static str, cell: &Cell, reason: impl ToString) -> Self {
        DecodeError::BadValue {
            field,
            value: cell.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Posting {
    pub posting_id: String,
    pub transfer_id: String,
    /// The posting this one reverses or is reversed by.
    pub linked_id: Option<String>,
    pub debit_account: String,
    pub debit_account_name: String,
    pub credit_account: String,
    pub credit_account_name: String,
    pub effective_date: NaiveDate,
    pub event_type: String,
    pub posting_type: String,
    pub amount: Decimal,
    pub currency: String,
}

/// Reads and decodes the postings source table. A missing table yields no
/// postings.
pub fn read_postings(source: &dyn RowSource, config: &Config) -> Vec<Posting> {
    let name = &config.tables.postings_source;
    match source.read_table(name) {
        Ok(rows) => {
            info!("Extracted {} rows from the {} table.", rows.len(), name);
            load_postings(&rows, config)
        }
        Err(e) => {
            warn!("Unable to read postings: {}.", e);
            Vec::new()
        }
    }
}

/// Decodes every row in order. Rows that fail to decode are logged and
/// skipped.
pub fn load_postings(rows: &[Row], config: &Config) -> Vec<Posting> {
    let mut postings = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        match decode_row(row, config) {
            Ok(posting) => postings.push(posting),
            Err(e) => warn!("Skipping postings row {}: {}.", i + 1, e),
        }
    }
    info!("Parsed {} postings from {} rows.", postings.len(), rows.len());
    postings
}

pub fn decode_row(row: &[Cell], config: &Config) -> Result<Posting, DecodeError> {
    let cols: &ColumnLayout = &config.columns;
    if row.len() < cols.required_width() {
        let (field, index) = cols
            .required_fields()
            .into_iter()
            .filter(|(_, index)| *index >= row.len())
            .min_by_key(|(_, index)| *index)
            .unwrap_or(("row", row.len()));
        return Err(DecodeError::MissingColumn {
            field,
            index,
            width: row.len(),
        });
    }

    let posting_id = text_at(row, cols.posting_id, "posting id")?;
    let linked_cell = cell_at(row, cols.linked_id, "linked id")?;
    let linked_id = if linked_cell.is_empty() || linked_cell.matches_text(&config.no_link_sentinel)
    {
        None
    } else {
        Some(linked_cell.to_string())
    };

    Ok(Posting {
        transfer_id: text_at(row, cols.transfer_id, "transfer id")?,
        linked_id,
        debit_account: text_at(row, cols.debit_account, "debit account")?,
        debit_account_name: name_at(row, cols.debit_account_name, "debit account name", &posting_id),
        credit_account: text_at(row, cols.credit_account, "credit account")?,
        credit_account_name: name_at(
            row,
            cols.credit_account_name,
            "credit account name",
            &posting_id,
        ),
        effective_date: parse_date(cell_at(row, cols.effective_date, "effective date")?)?,
        event_type: text_at(row, cols.event_type, "event type")?,
        posting_type: text_at(row, cols.posting_type, "posting type")?,
        amount: parse_amount(cell_at(row, cols.amount, "amount")?)?,
        currency: config.currency.clone(),
        posting_id,
    })
}

fn cell_at<'a>(row: &'a [Cell], index: usize, field: &'static str) -> Result<&'a Cell, DecodeError> {
    row.get(index).ok_or(DecodeError::MissingColumn {
        field,
        index,
        width: row.len(),
    })
}

fn text_at(row: &[Cell], index: usize, field: &'static str) -> Result<String, DecodeError> {
    cell_at(row, index, field).map(ToString::to_string)
}

/// Account names are optional: a row too short to hold one gets an empty
/// name.
fn name_at(row: &[Cell], index: Option<usize>, field: &'static str, posting_id: &str) -> String {
    match index {
        None => String::new(),
        Some(index) => match row.get(index) {
            Some(cell) => cell.to_string(),
            None => {
                warn!(
                    "Posting {} has no {} (column {}).",
                    posting_id, field, index
                );
                String::new()
            }
        },
    }
}

pub fn parse_amount(cell: &Cell) -> Result<Decimal, DecodeError> {
    const FIELD: &str = "amount";
    match cell {
        Cell::Number(d) => Ok(*d),
        Cell::Text(s) if s.contains(',') => {
            if !GROUPED_AMOUNT.is_match(s) {
                return Err(DecodeError::bad_value(
                    FIELD,
                    cell,
                    "commas must separate groups of three digits",
                ));
            }
            Decimal::from_str(&s.replace(',', "")).map_err(|e| DecodeError::bad_value(FIELD, cell, e))
        }
        Cell::Text(s) if !s.is_empty() => {
            Decimal::from_str(s).map_err(|e| DecodeError::bad_value(FIELD, cell, e))
        }
        _ => Err(DecodeError::bad_value(FIELD, cell, "expected a number")),
    }
}

/// Parses an ISO-style date or a spreadsheet serial day number.
pub fn parse_date(cell: &Cell) -> Result<NaiveDate, DecodeError> {
    const FIELD: &str = "effective date";
    match cell {
        Cell::Number(d) => serial_date(*d).ok_or_else(|| {
            DecodeError::bad_value(FIELD, cell, "serial day number out of range")
        }),
        Cell::Text(s) if !s.is_empty() => {
            if let Some(date) = DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            {
                return Ok(date);
            }
            match Decimal::from_str(s) {
                Ok(d) => serial_date(d).ok_or_else(|| {
                    DecodeError::bad_value(FIELD, cell, "serial day number out of range")
                }),
                Err(_) => Err(DecodeError::bad_value(
                    FIELD,
                    cell,
                    "expected YYYY-MM-DD, YYYY/MM/DD or a serial day number",
                )),
            }
        }
        _ => Err(DecodeError::bad_value(FIELD, cell, "expected a date")),
    }
}

/// Serial numbers may carry a time of day as a fraction, which is dropped.
fn serial_date(serial: Decimal) -> Option<NaiveDate> {
    let days = serial.trunc().to_u64()?;
    if !(SERIAL_MIN..=SERIAL_MAX).contains(&days) {
        return None;
    }
    serial_epoch().checked_add_days(Days::new(days))
}
