//! Spreadsheet cell references ("B2") used to place tables and labels.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    static ref CELL_REF: Regex = Regex::new(r"^([A-Z]{1,3})([1-9][0-9]*)$").unwrap();
    static ref COLUMN: Regex = Regex::new(r"^[A-Z]{1,3}$").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnchorError {
    #[error("invalid cell reference {0:?}")]
    BadReference(String),
    #[error("invalid column letters {0:?}")]
    BadColumn(String),
    #[error("row numbers start at 1")]
    ZeroRow,
    #[error("{0} rows below {1} is past the last row")]
    RowOverflow(u32, String),
}

/// Top-left cell of a table or label on a sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Anchor {
    column: String,
    row: u32,
}

impl Anchor {
    pub fn new(column: &str, row: u32) -> Result<Self, AnchorError> {
        check_column(column)?;
        if row == 0 {
            return Err(AnchorError::ZeroRow);
        }
        Ok(Self {
            column: column.to_string(),
            row,
        })
    }

    /// The anchor `n` rows further down the same column.
    pub fn down(&self, n: u32) -> Result<Self, AnchorError> {
        let row = self
            .row
            .checked_add(n)
            .ok_or_else(|| AnchorError::RowOverflow(n, self.to_string()))?;
        Ok(Self {
            column: self.column.clone(),
            row,
        })
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self {
            column: "A".to_string(),
            row: 1,
        }
    }
}

/// Checks that `s` is a valid column name such as "B" or "AA".
pub fn check_column(s: &str) -> Result<(), AnchorError> {
    if COLUMN.is_match(s) {
        Ok(())
    } else {
        Err(AnchorError::BadColumn(s.to_string()))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for Anchor {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = CELL_REF
            .captures(s)
            .ok_or_else(|| AnchorError::BadReference(s.to_string()))?;
        let row: u32 = captures[2]
            .parse()
            .map_err(|_| AnchorError::BadReference(s.to_string()))?;
        Anchor::new(&captures[1], row)
    }
}

impl TryFrom<String> for Anchor {
    type Error = AnchorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Anchor> for String {
    fn from(a: Anchor) -> Self {
        a.to_string()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("B2" => Ok("B2".to_string()); "simple")]
    #[test_case("AA10" => Ok("AA10".to_string()); "double letters")]
    #[test_case("b2" => Err(AnchorError::BadReference("b2".to_string())); "lowercase")]
    #[test_case("B0" => Err(AnchorError::BadReference("B0".to_string())); "zero row")]
    #[test_case("2B" => Err(AnchorError::BadReference("2B".to_string())); "reversed")]
    fn parse(s: &str) -> Result<String, AnchorError> {
        s.parse::<Anchor>().map(|a| a.to_string())
    }

    #[test]
    fn down_and_display() {
        let a = Anchor::new("I", 1).unwrap();
        assert_eq!(Ok("I6".to_string()), a.down(5).map(|a| a.to_string()));
        let last = Anchor::new("I", u32::MAX).unwrap();
        assert_eq!(
            Err(AnchorError::RowOverflow(1, format!("I{}", u32::MAX))),
            last.down(1)
        );
        assert_eq!(Err(AnchorError::ZeroRow), Anchor::new("I", 0));
        assert_eq!(
            Err(AnchorError::BadColumn("I1".to_string())),
            Anchor::new("I1", 3)
        );
    }

    #[test]
    fn ron_round_trip_uses_reference_string() {
        let a = Anchor::new("P", 11).unwrap();
        let s = ron::ser::to_string(&a).unwrap();
        assert_eq!("\"P11\"", s);
        let back: Anchor = ron::de::from_str(&s).unwrap();
        assert_eq!(a, back);
    }
}
