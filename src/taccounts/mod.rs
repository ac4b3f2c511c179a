//! Builds one T-account table per ledger account and fills them from the
//! postings source table.

use log::{debug, info, warn};

use crate::accounts::{unique_accounts, Account};
use crate::config::Config;
use crate::posting::read_postings;
use crate::table::{RowSink, RowSource};

pub mod cmd;
pub mod layout;
pub mod router;

use layout::LayoutPlan;
use router::{route_postings, RoutingReport, T_ACCOUNT_HEADERS};

/// Runs the whole T-account pipeline against `workbook`. Problems with
/// individual tables are logged and never abort the run.
pub fn build_t_accounts<W: RowSource + RowSink>(workbook: &mut W, config: &Config) -> RoutingReport {
    let postings = read_postings(&*workbook, config);

    let accounts = unique_accounts(&postings);
    populate_reference_accounts(workbook, &accounts, &config.tables.accounts);
    create_t_accounts(workbook, &accounts, config);

    route_postings(&postings, workbook, &config.tables)
}

fn populate_reference_accounts(sink: &mut dyn RowSink, accounts: &[Account], table: &str) {
    let rows = accounts.iter().map(Account::to_row).collect();
    match sink.replace_rows(table, rows) {
        Ok(()) => info!(
            "Wrote {} accounts to the {} reference table.",
            accounts.len(),
            table
        ),
        Err(e) => warn!("Unable to populate reference accounts: {}.", e),
    }
}

fn create_t_accounts(sink: &mut dyn RowSink, accounts: &[Account], config: &Config) {
    let sheet = &config.tables.t_account_sheet;
    let deleted = sink.delete_tables(sheet);
    info!("Deleted {} existing tables on sheet {}.", deleted, sheet);

    let plan = LayoutPlan::new(accounts.len(), config.layout.default_columns);
    info!(
        "Laying out {} t-accounts over {} columns: {:?}.",
        plan.accounts,
        plan.columns,
        plan.column_counts()
    );
    let placements = match layout::placements(accounts, &plan, &config.layout) {
        Ok(placements) => placements,
        Err(e) => {
            warn!("Unable to lay out t-accounts: {}.", e);
            return;
        }
    };

    for placement in placements {
        let name = config.tables.t_account_table(&placement.account.code);
        debug!(
            "Creating table {} at {} in column {} (title at {}).",
            name,
            placement.table,
            placement.column + 1,
            placement.title
        );
        if let Err(e) = sink.create_table(sheet, placement.table, &name, &T_ACCOUNT_HEADERS) {
            warn!("Unable to create t-account table: {}.", e);
            continue;
        }
        if let Err(e) = sink.set_title(&name, placement.account.label()) {
            warn!("Unable to set t-account title: {}.", e);
        }
    }
}
