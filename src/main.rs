use anyhow::Result;
use clap::{Parser, Subcommand};

#[cfg(test)]
#[macro_use]
mod testutil;

mod accounts;
mod anchor;
mod cell;
mod config;
mod filespec;
mod opts;
mod posting;
mod reversals;
mod table;
mod taccounts;

#[derive(Debug, Parser)]
/// Builds T-account tables and finds reversals in accounting posting exports.
struct Command {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Derives the unique accounts from the postings table, writes them to
    /// the accounts reference table, and builds one T-account table per
    /// account filled with its debit and credit rows.
    #[command(name = "t-accounts")]
    TAccounts(taccounts::cmd::Command),
    /// Highlights postings in the postings table that are reversed by the
    /// posting they link to.
    #[command(name = "reversals")]
    Reversals(reversals::cmd::Command),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cmd = Command::parse();
    use SubCommand::*;
    match cmd.subcmd {
        TAccounts(cmd) => cmd.run(),
        Reversals(cmd) => cmd.run(),
    }
}
