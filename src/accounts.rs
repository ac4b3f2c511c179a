//! Unique general-ledger accounts referenced by a set of postings.

use itertools::Itertools;
use log::info;

use crate::cell::{Cell, Row};
use crate::posting::Posting;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub code: String,
    pub name: String,
}

impl Account {
    pub fn new<S: Into<String>>(code: S, name: S) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Label shown above the account's T-account table.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }

    pub fn to_row(&self) -> Row {
        vec![Cell::from(self.code.as_str()), Cell::from(self.name.as_str())]
    }
}

/// Collects the debit accounts of all postings followed by their credit
/// accounts, keeping the first occurrence of each account code. Later
/// occurrences of a code are dropped even when their names differ.
pub fn unique_accounts(postings: &[Posting]) -> Vec<Account> {
    let debits = postings
        .iter()
        .map(|p| Account::new(p.debit_account.as_str(), p.debit_account_name.as_str()));
    let credits = postings
        .iter()
        .map(|p| Account::new(p.credit_account.as_str(), p.credit_account_name.as_str()));

    let accounts: Vec<Account> = debits
        .chain(credits)
        .unique_by(|account| account.code.clone())
        .collect();

    info!(
        "Identified {} unique accounts from {} postings.",
        accounts.len(),
        postings.len()
    );
    accounts
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::testutil::PostingBuilder;

    fn posting(id: &str, debit: (&str, &str), credit: (&str, &str)) -> Posting {
        PostingBuilder::new(id)
            .debit(debit.0, debit.1)
            .credit(credit.0, credit.1)
            .build()
    }

    #[test]
    fn empty_postings() {
        assert!(unique_accounts(&[]).is_empty());
    }

    #[test]
    fn debits_then_credits_first_seen_order() {
        let postings = vec![
            posting("1", ("2000", "Payables"), ("1000", "Bank")),
            posting("2", ("3000", "Revenue"), ("2000", "Payables")),
            posting("3", ("2000", "Payables"), ("4000", "Fees")),
        ];
        assert_eq!(
            vec![
                Account::new("2000", "Payables"),
                Account::new("3000", "Revenue"),
                Account::new("1000", "Bank"),
                Account::new("4000", "Fees"),
            ],
            unique_accounts(&postings)
        );
    }

    #[test]
    fn first_name_wins() {
        let postings = vec![
            posting("1", ("1000", "Bank"), ("2000", "Payables")),
            posting("2", ("2000", "Creditors"), ("1000", "Cash at bank")),
        ];
        let accounts = unique_accounts(&postings);
        assert_eq!(
            vec![Account::new("1000", "Bank"), Account::new("2000", "Creditors")],
            accounts
        );
    }

    #[test]
    fn codes_are_unique_and_idempotent() {
        let postings: Vec<Posting> = (0..40)
            .map(|i| {
                let debit = format!("{}", 1000 + (i * 7) % 13);
                let credit = format!("{}", 1000 + (i * 5) % 11);
                posting(&i.to_string(), (debit.as_str(), "d"), (credit.as_str(), "c"))
            })
            .collect();

        let first = unique_accounts(&postings);
        let codes: HashSet<&str> = first.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(first.len(), codes.len());
        assert!(first.len() <= postings.len() * 2);
        assert_eq!(first, unique_accounts(&postings));
    }

    #[test]
    fn label_and_row() {
        let account = Account::new("1000", "Bank");
        assert_eq!("1000 - Bank", account.label());
        assert_eq!(vec![Cell::from("1000"), Cell::from("Bank")], account.to_row());
    }
}
