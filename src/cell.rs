//! Cell values as they appear in table rows.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// One row of a table, in column order.
pub type Row = Vec<Cell>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Bool(bool),
    Empty,
}

impl Cell {
    /// Converts a raw CSV field. Non-empty fields are kept as text so that
    /// identifiers such as account codes keep any leading zeros.
    pub fn from_field(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns true if the cell's display form equals `s`.
    pub fn matches_text(&self, s: &str) -> bool {
        match self {
            Cell::Text(t) => t == s,
            Cell::Empty => s.is_empty(),
            other => other.to_string() == s,
        }
    }

    /// Ordering used when re-sorting tables. Numbers (and numeric text)
    /// compare by value, other text lexically, and empty cells sort last.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        use Cell::*;
        match (self.sort_class(), other.sort_class()) {
            (SortClass::Number(a), SortClass::Number(b)) => a.cmp(&b),
            (SortClass::Text(a), SortClass::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
        .then_with(|| match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            _ => Ordering::Equal,
        })
    }

    fn sort_class(&self) -> SortClass<'_> {
        match self {
            Cell::Number(d) => SortClass::Number(*d),
            Cell::Text(s) if s.is_empty() => SortClass::Empty,
            Cell::Text(s) => match Decimal::from_str(s) {
                Ok(d) => SortClass::Number(d),
                Err(_) => SortClass::Text(s),
            },
            Cell::Bool(_) => SortClass::Bool,
            Cell::Empty => SortClass::Empty,
        }
    }
}

enum SortClass<'a> {
    Number(Decimal),
    Text(&'a str),
    Bool,
    Empty,
}

impl SortClass<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortClass::Number(_) => 0,
            SortClass::Text(_) => 1,
            SortClass::Bool => 2,
            SortClass::Empty => 3,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use Cell::*;
        match self {
            Text(s) => f.write_str(s),
            Number(d) => write!(f, "{}", d),
            Bool(true) => f.write_str("TRUE"),
            Bool(false) => f.write_str("FALSE"),
            Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Decimal> for Cell {
    fn from(d: Decimal) -> Self {
        Cell::Number(d)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn num(s: &str) -> Cell {
        Cell::Number(Decimal::from_str(s).unwrap())
    }

    #[test_case(Cell::from("2024-01-01"), Cell::from("2024-02-01") => Ordering::Less; "iso dates")]
    #[test_case(Cell::from("10"), Cell::from("9") => Ordering::Greater; "numeric text")]
    #[test_case(num("2.50"), Cell::from("2.5") => Ordering::Equal; "number against numeric text")]
    #[test_case(Cell::Empty, Cell::from("a") => Ordering::Greater; "empty sorts last")]
    #[test_case(num("100"), Cell::from("abc") => Ordering::Less; "numbers before text")]
    #[test_case(Cell::Bool(false), Cell::Bool(true) => Ordering::Less; "booleans")]
    fn sort_cmp(a: Cell, b: Cell) -> Ordering {
        a.sort_cmp(&b)
    }

    #[test]
    fn display() {
        assert_eq!("100.00", num("100.00").to_string());
        assert_eq!("TRUE", Cell::Bool(true).to_string());
        assert_eq!("", Cell::Empty.to_string());
        assert_eq!("0042", Cell::from_field("0042").to_string());
    }

    #[test]
    fn matches_text() {
        assert!(Cell::from("7").matches_text("7"));
        assert!(num("7").matches_text("7"));
        assert!(!Cell::from("70").matches_text("7"));
        assert!(Cell::from_field("").matches_text(""));
    }
}
