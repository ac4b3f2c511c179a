//! Run configuration, read from a RON file.
//!
//! Every section has defaults matching the standard postings export, so an
//! empty file (or no file at all) is a valid configuration:
//!
//! ```ron
//! (
//!     currency: "ZAR",
//!     columns: (debit_account_name: Some(9), credit_account_name: Some(12)),
//!     tables: (postings_source: "postings_source"),
//!     layout: (display_columns: ["B", "I", "P"], rows_skipped: 5),
//! )
//! ```

use anyhow::{anyhow, bail, Context, Result};
use encoding_rs::Encoding;
use serde_derive::Deserialize;

use crate::anchor;
use crate::filespec::FileSpec;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnLayout,
    pub tables: TableNames,
    pub layout: LayoutConfig,
    /// Currency assigned to every loaded posting.
    pub currency: String,
    /// Linked id value meaning "no linked posting".
    pub no_link_sentinel: String,
    /// Encoding label for reading workbook CSV files (e.g. "windows-1252").
    /// `None` detects UTF-8/UTF-16 by byte order mark.
    pub encoding: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: Default::default(),
            tables: Default::default(),
            layout: Default::default(),
            currency: "ZAR".to_string(),
            no_link_sentinel: "0".to_string(),
            encoding: None,
        }
    }
}

impl Config {
    /// Reads the configuration from `file_spec`, or returns the defaults.
    pub fn load(file_spec: Option<&FileSpec>) -> Result<Self> {
        let config = match file_spec {
            Some(fs) => {
                ron::de::from_reader(fs.reader()?).with_context(|| format!("parsing {}", fs))?
            }
            None => Config::default(),
        };
        config.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        let config: Config = ron::de::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for column in &self.layout.display_columns {
            anchor::check_column(column)?;
        }
        let needed = self.layout.default_columns.max(3);
        if self.layout.display_columns.len() < needed {
            bail!(
                "layout needs at least {} display columns, got {}",
                needed,
                self.layout.display_columns.len()
            );
        }
        if self.layout.default_columns == 0 {
            bail!("layout default_columns must be at least 1");
        }
        if self.layout.starting_row == 0 {
            bail!("layout starting_row must be at least 1");
        }
        if self.layout.rows_skipped == 0 {
            bail!("layout rows_skipped must be at least 1");
        }
        self.encoding()?;
        Ok(())
    }

    pub fn encoding(&self) -> Result<Option<&'static Encoding>> {
        self.encoding
            .as_ref()
            .map(|label| {
                Encoding::for_label(label.as_bytes())
                    .ok_or_else(|| anyhow!("unknown encoding label {:?}", label))
            })
            .transpose()
    }
}

/// Zero-based positions of the posting fields within a postings row.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub posting_id: usize,
    pub posting_type: usize,
    pub event_type: usize,
    pub amount: usize,
    pub transfer_id: usize,
    pub linked_id: usize,
    pub effective_date: usize,
    pub debit_account: usize,
    pub credit_account: usize,
    pub debit_account_name: Option<usize>,
    pub credit_account_name: Option<usize>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            posting_id: 0,
            posting_type: 1,
            event_type: 2,
            amount: 3,
            transfer_id: 4,
            linked_id: 5,
            effective_date: 6,
            debit_account: 8,
            credit_account: 11,
            debit_account_name: Some(9),
            credit_account_name: Some(12),
        }
    }
}

impl ColumnLayout {
    /// Required fields and their positions, in field order.
    pub fn required_fields(&self) -> [(&'static str, usize); 9] {
        [
            ("posting id", self.posting_id),
            ("posting type", self.posting_type),
            ("event type", self.event_type),
            ("amount", self.amount),
            ("transfer id", self.transfer_id),
            ("linked id", self.linked_id),
            ("effective date", self.effective_date),
            ("debit account", self.debit_account),
            ("credit account", self.credit_account),
        ]
    }

    /// Minimum row width holding every required field.
    pub fn required_width(&self) -> usize {
        self.required_fields()
            .iter()
            .map(|(_, index)| index + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub postings_source: String,
    /// Reference table receiving the unique `[code, name]` accounts.
    pub accounts: String,
    /// Sheet holding the generated T-account tables.
    pub t_account_sheet: String,
    pub t_account_prefix: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            postings_source: "postings_source".to_string(),
            accounts: "accounts".to_string(),
            t_account_sheet: "t_accounts".to_string(),
            t_account_prefix: "account_".to_string(),
        }
    }
}

impl TableNames {
    pub fn t_account_table(&self, code: &str) -> String {
        format!("{}{}", self.t_account_prefix, code)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Column count used when the account count divides by neither 2 nor 3.
    pub default_columns: usize,
    /// Sheet columns that each display column of T-accounts starts at.
    pub display_columns: Vec<String>,
    pub starting_row: u32,
    /// Rows between the titles of consecutive T-accounts in a column.
    pub rows_skipped: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_columns: 2,
            display_columns: vec!["B".to_string(), "I".to_string(), "P".to_string()],
            starting_row: 1,
            rows_skipped: 5,
        }
    }
}
