//! Seat code grammar: `<RowLetters><Column>`.
//!
//! Rows are zero-based and written in bijective base-26 (`A`..`Z`, `AA`,
//! `AB`, ...). Columns are one-based decimal numbers without leading zeros.
//! Parsing is case-insensitive and ignores surrounding whitespace; formatting
//! always produces uppercase.

use std::fmt;
use std::str::FromStr;

use crate::error::SeatCodeError;

/// A parsed seat position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatCode {
    row: u32,
    column: u32,
}

impl SeatCode {
    /// Build a seat from a zero-based row and one-based column.
    ///
    /// # Errors
    ///
    /// Returns [`SeatCodeError::InvalidColumn`] when `column` is zero.
    pub fn new(row: u32, column: u32) -> Result<Self, SeatCodeError> {
        if column == 0 {
            return Err(SeatCodeError::InvalidColumn(format!("{}0", row_letters(row))));
        }
        Ok(Self { row, column })
    }

    #[must_use]
    pub const fn row(self) -> u32 {
        self.row
    }

    #[must_use]
    pub const fn column(self) -> u32 {
        self.column
    }
}

impl fmt::Display for SeatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", row_letters(self.row), self.column)
    }
}

impl FromStr for SeatCode {
    type Err = SeatCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, column) = parse_seat(s)?;
        Ok(Self { row, column })
    }
}

/// Format a zero-based row and one-based column as a seat code.
///
/// `format_seat(0, 1)` is `A1`, `format_seat(26, 3)` is `AA3`.
#[must_use]
pub fn format_seat(row: u32, column: u32) -> String {
    format!("{}{column}", row_letters(row))
}

/// Parse a seat code into `(row, column)`.
///
/// # Errors
///
/// Returns a [`SeatCodeError`] describing the first grammar violation.
pub fn parse_seat(code: &str) -> Result<(u32, u32), SeatCodeError> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err(SeatCodeError::Empty);
    }

    let split = normalized
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(normalized.len());
    let (letters, digits) = normalized.split_at(split);

    if letters.is_empty() {
        return Err(SeatCodeError::MissingRow(normalized));
    }
    if digits.is_empty() {
        return Err(SeatCodeError::MissingColumn(normalized));
    }
    if let Some(found) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(SeatCodeError::UnexpectedCharacter {
            code: normalized,
            found,
        });
    }
    if digits.starts_with('0') {
        return Err(SeatCodeError::InvalidColumn(normalized));
    }

    let row = letters_to_row(letters).ok_or_else(|| SeatCodeError::OutOfRange(normalized.clone()))?;
    let column: u32 = digits
        .parse()
        .map_err(|_| SeatCodeError::OutOfRange(normalized.clone()))?;

    Ok((row, column))
}

fn row_letters(row: u32) -> String {
    let mut n = u64::from(row) + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        // n % 26 < 26, always fits in a u8.
        #[allow(clippy::cast_possible_truncation)]
        out.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    out.iter().rev().collect()
}

fn letters_to_row(letters: &str) -> Option<u32> {
    let mut acc: u64 = 0;
    for b in letters.bytes() {
        acc = acc.checked_mul(26)?.checked_add(u64::from(b - b'A') + 1)?;
        if acc > u64::from(u32::MAX) + 1 {
            return None;
        }
    }
    u32::try_from(acc - 1).ok()
}
