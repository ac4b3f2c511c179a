//! Placement of T-account tables into display columns on the sheet.

use log::debug;

use crate::accounts::Account;
use crate::anchor::{Anchor, AnchorError};
use crate::config::LayoutConfig;

/// Number of display columns to spread `n` T-accounts over: 2 for an even
/// count, 3 for an odd multiple of three, otherwise `default_columns`.
pub fn column_count(n: usize, default_columns: usize) -> usize {
    if n % 2 == 0 {
        debug!("Number of columns for {} t-accounts calculated as 2.", n);
        return 2;
    }
    if n % 3 == 0 {
        debug!("Number of columns for {} t-accounts calculated as 3.", n);
        return 3;
    }
    debug!(
        "Using default ({}) columns for {} t-accounts.",
        default_columns, n
    );
    default_columns
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
    pub accounts: usize,
    pub columns: usize,
    /// `ceil(accounts / columns)`; no column holds more than this.
    pub first_column_count: usize,
}

impl LayoutPlan {
    pub fn new(accounts: usize, default_columns: usize) -> Self {
        let columns = column_count(accounts, default_columns);
        Self {
            accounts,
            columns,
            first_column_count: (accounts + columns - 1) / columns,
        }
    }

    /// Accounts per display column. Columns fill in order up to
    /// `first_column_count` each, so the counts always sum to `accounts`.
    pub fn column_counts(&self) -> Vec<usize> {
        let mut remaining = self.accounts;
        (0..self.columns)
            .map(|_| {
                let count = remaining.min(self.first_column_count);
                remaining -= count;
                count
            })
            .collect()
    }
}

/// Where one account's title and table go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement<'a> {
    pub account: &'a Account,
    /// Zero-based display column.
    pub column: usize,
    pub title: Anchor,
    /// The table's header row sits directly below its title.
    pub table: Anchor,
}

pub fn placements<'a>(
    accounts: &'a [Account],
    plan: &LayoutPlan,
    layout: &LayoutConfig,
) -> Result<Vec<Placement<'a>>, AnchorError> {
    let mut result = Vec::with_capacity(accounts.len());
    let mut next = 0;
    for (column, count) in plan.column_counts().into_iter().enumerate() {
        let letters = layout
            .display_columns
            .get(column)
            .ok_or_else(|| AnchorError::BadColumn(format!("display column {}", column + 1)))?;
        let mut title = Anchor::new(letters, layout.starting_row)?;
        for (i, account) in accounts[next..next + count].iter().enumerate() {
            if i > 0 {
                title = title.down(layout.rows_skipped)?;
            }
            result.push(Placement {
                account,
                column,
                table: title.down(1)?,
                title: title.clone(),
            });
        }
        next += count;
    }
    Ok(result)
}
